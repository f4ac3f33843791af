use image::RgbImage;

use crate::foundation::core::{Canvas, Rgb8};

/// Image buffer plus depth buffer shared by every draw call of one frame.
///
/// Screen coordinates have `y` growing upward: `y = 0` is the bottom row of the image. Larger `z`
/// is closer to the viewer.
#[derive(Clone, Debug)]
pub struct FrameTarget {
    canvas: Canvas,
    image: RgbImage,
    depth: Vec<f64>,
}

impl FrameTarget {
    /// Target cleared to `background` with an empty depth buffer.
    pub fn new(canvas: Canvas, background: Rgb8) -> Self {
        Self {
            canvas,
            image: RgbImage::from_pixel(
                canvas.width,
                canvas.height,
                image::Rgb([background.r, background.g, background.b]),
            ),
            depth: vec![f64::NEG_INFINITY; canvas.pixel_count()],
        }
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Borrow the color buffer.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take the color buffer.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Depth stored at screen position `(x, y)`.
    pub fn depth_at(&self, x: i64, y: i64) -> Option<f64> {
        self.index(x, y).map(|(i, _)| self.depth[i])
    }

    /// Color stored at screen position `(x, y)`.
    pub fn color_at(&self, x: i64, y: i64) -> Option<Rgb8> {
        self.index(x, y).map(|(_, (col, row))| {
            let p = self.image.get_pixel(col, row);
            Rgb8::new(p[0], p[1], p[2])
        })
    }

    /// Depth-tested write. Returns `true` when the pixel was updated.
    pub fn plot(&mut self, x: i64, y: i64, z: f64, color: Rgb8) -> bool {
        let Some((i, (col, row))) = self.index(x, y) else {
            return false;
        };
        if z.is_nan() || z <= self.depth[i] {
            return false;
        }
        self.depth[i] = z;
        self.image
            .put_pixel(col, row, image::Rgb([color.r, color.g, color.b]));
        true
    }

    fn index(&self, x: i64, y: i64) -> Option<(usize, (u32, u32))> {
        let w = i64::from(self.canvas.width);
        let h = i64::from(self.canvas.height);
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        let row = (h - 1 - y) as u32;
        let col = x as u32;
        Some(((row as usize) * (w as usize) + col as usize, (col, row)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
