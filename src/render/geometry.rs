use std::f64::consts::{PI, TAU};

use crate::foundation::core::{DMat4, DVec3};

/// Scratch geometry for a single shape command.
///
/// Points are read as triangles (triples) for filled shapes and as segments (pairs) for lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryBuffer {
    points: Vec<DVec3>,
}

impl GeometryBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw points in insertion order.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Return `true` when no points have been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop every point, keeping the allocation.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Complete triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.points.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Complete segments.
    pub fn edges(&self) -> impl Iterator<Item = [DVec3; 2]> + '_ {
        self.points.chunks_exact(2).map(|e| [e[0], e[1]])
    }

    /// Transform every point in place by `m`.
    pub fn transform(&mut self, m: &DMat4) {
        for p in &mut self.points {
            *p = m.transform_point3(*p);
        }
    }

    /// Append one segment.
    pub fn add_edge(&mut self, a: DVec3, b: DVec3) {
        self.points.push(a);
        self.points.push(b);
    }

    /// Append a triangle wound counter-clockwise as seen from outside, i.e. facing away from
    /// `inside`. Degenerate triangles are dropped.
    pub fn add_triangle_facing_out(&mut self, a: DVec3, b: DVec3, c: DVec3, inside: DVec3) {
        let normal = (b - a).cross(c - a);
        // Relative test: pole points computed from sin(PI) are only equal up to rounding.
        let scale = (b - a).length() * (c - a).length();
        let area = normal.length();
        if area.is_nan() || area <= scale * 1e-12 {
            return;
        }
        let centroid = (a + b + c) / 3.0;
        self.points.push(a);
        if normal.dot(centroid - inside) >= 0.0 {
            self.points.push(b);
            self.points.push(c);
        } else {
            self.points.push(c);
            self.points.push(b);
        }
    }

    fn add_quad_facing_out(&mut self, q: [DVec3; 4], inside: DVec3) {
        self.add_triangle_facing_out(q[0], q[1], q[2], inside);
        self.add_triangle_facing_out(q[0], q[2], q[3], inside);
    }

    /// Box with its top-left-front corner at `(x, y, z)`, extending `+x`, `-y` and `-z`.
    pub fn add_box(&mut self, x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) {
        let (x0, x1) = (x, x + width);
        let (y0, y1) = (y, y - height);
        let (z0, z1) = (z, z - depth);
        let center = DVec3::new((x0 + x1) / 2.0, (y0 + y1) / 2.0, (z0 + z1) / 2.0);
        let v = |px: f64, py: f64, pz: f64| DVec3::new(px, py, pz);

        let faces = [
            // front, back
            [v(x0, y0, z0), v(x1, y0, z0), v(x1, y1, z0), v(x0, y1, z0)],
            [v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)],
            // left, right
            [v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)],
            [v(x1, y0, z0), v(x1, y0, z1), v(x1, y1, z1), v(x1, y1, z0)],
            // top, bottom
            [v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)],
            [v(x0, y1, z0), v(x1, y1, z0), v(x1, y1, z1), v(x0, y1, z1)],
        ];
        for face in faces {
            self.add_quad_facing_out(face, center);
        }
    }

    /// Latitude/longitude sphere with `steps` subdivisions in each direction.
    pub fn add_sphere(&mut self, cx: f64, cy: f64, cz: f64, radius: f64, steps: usize) {
        let steps = steps.max(3);
        let center = DVec3::new(cx, cy, cz);
        let point = |lat: usize, lon: usize| {
            let theta = PI * lat as f64 / steps as f64;
            let phi = TAU * lon as f64 / steps as f64;
            center
                + radius
                    * DVec3::new(theta.cos(), theta.sin() * phi.cos(), theta.sin() * phi.sin())
        };

        for lat in 0..steps {
            for lon in 0..steps {
                let next = (lon + 1) % steps;
                self.add_quad_facing_out(
                    [
                        point(lat, lon),
                        point(lat + 1, lon),
                        point(lat + 1, next),
                        point(lat, next),
                    ],
                    center,
                );
            }
        }
    }

    /// Torus around the y axis through `(cx, cy, cz)`.
    ///
    /// `tube_radius` is the cross-section radius, `ring_radius` the distance from the center to
    /// the middle of the tube.
    pub fn add_torus(
        &mut self,
        cx: f64,
        cy: f64,
        cz: f64,
        tube_radius: f64,
        ring_radius: f64,
        steps: usize,
    ) {
        let steps = steps.max(3);
        let center = DVec3::new(cx, cy, cz);
        let point = |ring: usize, tube: usize| {
            let phi = TAU * ring as f64 / steps as f64;
            let theta = TAU * tube as f64 / steps as f64;
            let reach = tube_radius * theta.cos() + ring_radius;
            center + DVec3::new(phi.cos() * reach, tube_radius * theta.sin(), -phi.sin() * reach)
        };
        // Middle of the tube at the quad's mid-longitude.
        let tube_center = |ring: usize| {
            let phi = TAU * (ring as f64 + 0.5) / steps as f64;
            center + DVec3::new(phi.cos() * ring_radius, 0.0, -phi.sin() * ring_radius)
        };

        for ring in 0..steps {
            let ring_next = (ring + 1) % steps;
            let inside = tube_center(ring);
            for tube in 0..steps {
                let tube_next = (tube + 1) % steps;
                self.add_quad_facing_out(
                    [
                        point(ring, tube),
                        point(ring_next, tube),
                        point(ring_next, tube_next),
                        point(ring, tube_next),
                    ],
                    inside,
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
