//! Built-in placeholder renderer.
//!
//! Writes an inert PNG standing in for a diagram that could not be exported:
//! a light canvas with a framed border, a header band and three linked boxes
//! suggesting a diagram. It never reads the source, so it cannot fail on
//! malformed input; only the write can fail.

use super::backend::{RenderError, RenderJob, RenderOutput, Renderer};
use image::{ImageFormat, Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([0xf8, 0xf9, 0xfa]);
const ACCENT: Rgb<u8> = Rgb([0x00, 0x7c, 0xba]);
const MUTED: Rgb<u8> = Rgb([0x6c, 0x75, 0x7d]);

const MARGIN: u32 = 20;
const BORDER: u32 = 3;

pub struct PlaceholderRenderer {
    width: u32,
    height: u32,
}

impl PlaceholderRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MARGIN * 4),
            height: height.max(MARGIN * 4),
        }
    }

    /// Draw the placeholder canvas.
    pub fn draw(&self) -> RgbImage {
        let (w, h) = (self.width, self.height);
        let mut img = RgbImage::from_pixel(w, h, BACKGROUND);

        // frame
        let (left, top, right, bottom) = (MARGIN, MARGIN, w - MARGIN, h - MARGIN);
        fill_rect(&mut img, left, top, right, top + BORDER, ACCENT);
        fill_rect(&mut img, left, bottom - BORDER, right, bottom, ACCENT);
        fill_rect(&mut img, left, top, left + BORDER, bottom, ACCENT);
        fill_rect(&mut img, right - BORDER, top, right, bottom, ACCENT);

        // header band
        let band = (h / 10).max(BORDER);
        fill_rect(&mut img, left, top, right, top + band, ACCENT);

        // three boxes on a connector line
        let inner_w = right - left;
        let box_w = inner_w / 6;
        let box_h = (bottom - top) / 5;
        let mid_y = top + band + (bottom - top - band) / 2;
        let line_y = mid_y.saturating_sub(BORDER / 2);
        fill_rect(
            &mut img,
            left + inner_w / 6,
            line_y,
            right - inner_w / 6,
            line_y + BORDER,
            MUTED,
        );
        for i in 0..3 {
            let cx = left + inner_w * (2 * i + 1) / 6;
            let x0 = cx.saturating_sub(box_w / 2);
            let y0 = mid_y.saturating_sub(box_h / 2);
            outline_rect(&mut img, x0, y0, x0 + box_w, y0 + box_h, MUTED);
        }

        img
    }
}

/// Fill `[x0, x1) × [y0, y1)`, clipped to the image.
fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let (x1, y1) = (x1.min(img.width()), y1.min(img.height()));
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn outline_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    fill_rect(img, x0, y0, x1, y0 + BORDER, color);
    fill_rect(img, x0, y1.saturating_sub(BORDER), x1, y1, color);
    fill_rect(img, x0, y0, x0 + BORDER, y1, color);
    fill_rect(img, x1.saturating_sub(BORDER), y0, x1, y1, color);
}

impl Renderer for PlaceholderRenderer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn render(&self, job: &RenderJob) -> Result<RenderOutput, RenderError> {
        self.draw()
            .save_with_format(&job.png, ImageFormat::Png)
            .map_err(|e| {
                RenderError::Failed(format!("Failed to write {}: {e}", job.png.display()))
            })?;
        Ok(RenderOutput { svg: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn canvas_has_configured_size() {
        let img = PlaceholderRenderer::new(1200, 900).draw();
        assert_eq!(img.dimensions(), (1200, 900));
    }

    #[test]
    fn tiny_sizes_are_raised() {
        let img = PlaceholderRenderer::new(1, 1).draw();
        assert_eq!(img.dimensions(), (MARGIN * 4, MARGIN * 4));
    }

    #[test]
    fn frame_and_background_colors() {
        let img = PlaceholderRenderer::new(400, 300).draw();
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*img.get_pixel(MARGIN, MARGIN), ACCENT);
        assert_eq!(*img.get_pixel(400 - MARGIN - 1, 300 - MARGIN - 1), ACCENT);
    }

    #[test]
    fn writes_decodable_png() {
        let tmp = TempDir::new().unwrap();
        let job = RenderJob {
            id: "a".into(),
            source: tmp.path().join("missing.drawio"),
            png: tmp.path().join("a.png"),
            svg: tmp.path().join("a.svg"),
        };

        let out = PlaceholderRenderer::new(320, 240).render(&job).unwrap();
        assert!(!out.svg);
        assert!(!job.svg.exists());
        assert_eq!(image::image_dimensions(&job.png).unwrap(), (320, 240));
    }

    #[test]
    fn unwritable_target_fails() {
        let tmp = TempDir::new().unwrap();
        let job = RenderJob {
            id: "a".into(),
            source: tmp.path().join("a.drawio"),
            png: tmp.path().join("no-such-dir/a.png"),
            svg: tmp.path().join("no-such-dir/a.svg"),
        };
        assert!(PlaceholderRenderer::new(100, 100).render(&job).is_err());
    }
}
