use crate::foundation::core::{DVec3, Rgb8};
use crate::foundation::error::ReelResult;
use crate::foundation::math::channel_u8;
use crate::render::geometry::GeometryBuffer;
use crate::render::target::FrameTarget;
use crate::script::Constants;

/// Point light: a direction toward the light and its RGB intensity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointLight {
    /// Vector pointing from the surface toward the light.
    pub location: [f64; 3],
    /// Per-channel intensity, `0..=255`.
    pub color: [f64; 3],
}

/// View and lighting parameters handed to the rasterizer with every filled shape.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Shading {
    /// Vector pointing from the scene toward the viewer.
    pub view: [f64; 3],
    /// Ambient light per channel, `0..=255`.
    pub ambient: [f64; 3],
    /// The single scene light.
    pub light: PointLight,
    /// Exponent of the specular term.
    pub specular_exponent: i32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            view: [0.0, 0.0, 1.0],
            ambient: [50.0, 50.0, 50.0],
            light: PointLight {
                location: [0.5, 0.75, 1.0],
                color: [255.0, 255.0, 255.0],
            },
            specular_exponent: 4,
        }
    }
}

impl Shading {
    /// Flat color of a surface with outward `normal` under this shading setup.
    pub fn shade(&self, normal: DVec3, material: &Constants) -> Rgb8 {
        let n = normal.normalize_or_zero();
        let l = DVec3::from_array(self.light.location).normalize_or_zero();
        let v = DVec3::from_array(self.view).normalize_or_zero();

        let n_dot_l = n.dot(l);
        let diffuse = n_dot_l.max(0.0);
        // No highlight on surfaces facing away from the light.
        let specular = if n_dot_l > 0.0 {
            let reflected = 2.0 * n_dot_l * n - l;
            reflected.dot(v).max(0.0).powi(self.specular_exponent)
        } else {
            0.0
        };

        let [ka, kd, ks] = material.by_term();
        let channel = |c: usize| {
            self.ambient[c] * ka[c]
                + self.light.color[c] * kd[c] * diffuse
                + self.light.color[c] * ks[c] * specular
        };
        Rgb8::new(channel_u8(channel(0)), channel_u8(channel(1)), channel_u8(channel(2)))
    }
}

/// Draws scratch geometry into a frame's image and depth buffers.
pub trait Rasterizer {
    /// Fill every triangle in `polygons` using `material` under `shading`.
    fn draw_polygons(
        &mut self,
        polygons: &GeometryBuffer,
        target: &mut FrameTarget,
        shading: &Shading,
        material: &Constants,
    ) -> ReelResult<()>;

    /// Draw every segment in `edges` as an unlit wireframe.
    fn draw_lines(
        &mut self,
        edges: &GeometryBuffer,
        target: &mut FrameTarget,
        color: Rgb8,
    ) -> ReelResult<()>;
}

/// CPU rasterizer: back-face culling, flat shading, z-buffered fills and Bresenham lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    /// Create a rasterizer.
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn draw_polygons(
        &mut self,
        polygons: &GeometryBuffer,
        target: &mut FrameTarget,
        shading: &Shading,
        material: &Constants,
    ) -> ReelResult<()> {
        let view = DVec3::from_array(shading.view);
        for tri in polygons.triangles() {
            let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            if normal.dot(view) <= 0.0 {
                continue;
            }
            let color = shading.shade(normal, material);
            fill_triangle(target, tri, color);
        }
        Ok(())
    }

    fn draw_lines(
        &mut self,
        edges: &GeometryBuffer,
        target: &mut FrameTarget,
        color: Rgb8,
    ) -> ReelResult<()> {
        let canvas = target.canvas();
        for [a, b] in edges.edges() {
            if let Some((a, b)) = clip_segment(a, b, canvas.width, canvas.height) {
                draw_line(target, a, b, color);
            }
        }
        Ok(())
    }
}

fn edge(a: DVec3, b: DVec3, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn fill_triangle(target: &mut FrameTarget, tri: [DVec3; 3], color: Rgb8) {
    let [a, b, c] = tri;
    let area = edge(a, b, c.x, c.y);
    if area == 0.0 || !area.is_finite() {
        return;
    }

    let canvas = target.canvas();
    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as i64;
    let max_x = a.x.max(b.x).max(c.x).ceil().min(f64::from(canvas.width) - 1.0) as i64;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as i64;
    let max_y = a.y.max(b.y).max(c.y).ceil().min(f64::from(canvas.height) - 1.0) as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f64, y as f64);
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let z = w0 * a.z + w1 * b.z + w2 * c.z;
            target.plot(x, y, z, color);
        }
    }
}

/// Liang-Barsky clip of `a..b` against the pixel box `[0, w-1] x [0, h-1]`, interpolating z.
///
/// Segments with non-finite coordinates, or entirely outside the box, are dropped.
fn clip_segment(a: DVec3, b: DVec3, w: u32, h: u32) -> Option<(DVec3, DVec3)> {
    let d = b - a;
    if !a.is_finite() || !b.is_finite() || !d.is_finite() {
        return None;
    }
    let (max_x, max_y) = (f64::from(w) - 1.0, f64::from(h) - 1.0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, a.x),
        (d.x, max_x - a.x),
        (-d.y, a.y),
        (d.y, max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    // Rounding on very long segments can land just outside the box.
    let clamp = |p: DVec3| DVec3::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y), p.z);
    Some((clamp(a + d * t0), clamp(a + d * t1)))
}

fn draw_line(target: &mut FrameTarget, a: DVec3, b: DVec3, color: Rgb8) {
    let (mut x, mut y) = (a.x.round() as i64, a.y.round() as i64);
    let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let steps = dx.max(-dy).max(1) as f64;

    let mut err = dx + dy;
    let mut taken = 0.0;
    loop {
        let z = a.z + (b.z - a.z) * (taken / steps);
        target.plot(x, y, z, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        taken += 1.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
