use image::{DynamicImage, RgbaImage};

use crate::color::Color;
use crate::rect::Rect;

/// Decoded pixel grid ready for rectangle extraction
pub struct PixelGrid {
    pixels: RgbaImage,
    has_alpha: bool,
}

impl PixelGrid {
    pub fn from_image(img: &DynamicImage) -> Self {
        Self {
            pixels: img.to_rgba8(),
            has_alpha: img.color().has_alpha(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Unit rectangles for every visible pixel, row-major (y outer, x inner).
    ///
    /// Pixels whose alpha is present and zero are skipped. Any other alpha is
    /// discarded, so partially transparent pixels come out fully opaque.
    /// Each call starts a fresh pass over the grid.
    pub fn rects(&self) -> PixelRects<'_> {
        PixelRects {
            grid: self,
            x: 0,
            y: 0,
        }
    }
}

/// Lazy iterator returned by [`PixelGrid::rects`]
#[derive(Clone)]
pub struct PixelRects<'a> {
    grid: &'a PixelGrid,
    x: u32,
    y: u32,
}

impl Iterator for PixelRects<'_> {
    type Item = Rect;

    fn next(&mut self) -> Option<Self::Item> {
        let (width, height) = self.grid.dimensions();
        if width == 0 {
            return None;
        }

        while self.y < height {
            let (x, y) = (self.x, self.y);
            self.x += 1;
            if self.x == width {
                self.x = 0;
                self.y += 1;
            }

            let pixel = self.grid.pixels.get_pixel(x, y);
            if self.grid.has_alpha && pixel[3] == 0 {
                continue;
            }
            return Some(Rect::pixel(
                i64::from(x),
                i64::from(y),
                Color::from_channels(&pixel.0),
            ));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn test_row_major_order() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([1, 0, 0]));
        img.put_pixel(1, 0, Rgb([2, 0, 0]));
        img.put_pixel(0, 1, Rgb([3, 0, 0]));
        img.put_pixel(1, 1, Rgb([4, 0, 0]));
        let grid = PixelGrid::from_image(&DynamicImage::ImageRgb8(img));

        let coords: Vec<_> = grid.rects().map(|r| (r.x, r.y, r.fill.r)).collect();
        assert_eq!(coords, vec![(0, 0, 1), (1, 0, 2), (0, 1, 3), (1, 1, 4)]);
        assert!(grid.rects().all(|r| r.width == 1 && r.height == 1));
    }

    #[test]
    fn test_transparent_pixel_is_skipped() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        let grid = PixelGrid::from_image(&DynamicImage::ImageRgba8(img));

        assert_eq!(grid.rects().count(), 0);
    }

    #[test]
    fn test_partial_alpha_is_kept_as_opaque() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 0]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 1]));
        img.put_pixel(2, 0, Rgba([10, 20, 30, 255]));
        let grid = PixelGrid::from_image(&DynamicImage::ImageRgba8(img));

        let rects: Vec<_> = grid.rects().collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].x, 1);
        assert_eq!(rects[0].fill.to_string(), "#0a141e");
    }

    #[test]
    fn test_rects_restart() {
        let grid = PixelGrid::from_image(&DynamicImage::ImageRgb8(RgbImage::new(3, 2)));

        assert_eq!(grid.rects().count(), 6);
        assert_eq!(grid.rects().count(), 6);
    }

    #[test]
    fn test_grayscale_expands_to_rgb() {
        let img = image::GrayImage::from_pixel(1, 1, image::Luma([0x7f]));
        let grid = PixelGrid::from_image(&DynamicImage::ImageLuma8(img));

        let rect = grid.rects().next().unwrap();
        assert_eq!(rect.fill.to_string(), "#7f7f7f");
    }
}
