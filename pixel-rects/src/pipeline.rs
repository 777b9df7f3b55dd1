use std::path::Path;

use image::DynamicImage;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::extractor::PixelGrid;
use crate::merger::{drop_black, merge_rects};
use crate::rect::Offset;
use crate::svg::{SvgDocument, ViewBox};
use crate::translate::translate_svg;

/// Counts collected while converting one image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VectorizeStats {
    pub width: u32,
    pub height: u32,
    pub opaque_pixels: usize,
    pub merged_rects: usize,
    pub black_rects: usize,
    pub emitted_rects: usize,
}

/// Finished SVG text plus conversion statistics
#[derive(Debug, Clone)]
pub struct Vectorized {
    pub svg: String,
    pub stats: VectorizeStats,
}

/// Convert a decoded image into a rect-per-run SVG document.
///
/// Pixels become unit rects, horizontal same-color runs are merged per row,
/// black runs are dropped, and the serialized document is shifted by `offset`.
pub fn vectorize(img: &DynamicImage, offset: Offset) -> Result<Vectorized> {
    let grid = PixelGrid::from_image(img);
    let (width, height) = grid.dimensions();

    let pixels: Vec<_> = grid.rects().collect();
    let opaque_pixels = pixels.len();

    let merged = merge_rects(pixels)?;
    let merged_rects = merged.len();
    let visible = drop_black(merged);

    let stats = VectorizeStats {
        width,
        height,
        opaque_pixels,
        merged_rects,
        black_rects: merged_rects - visible.len(),
        emitted_rects: visible.len(),
    };

    let doc = SvgDocument::new(ViewBox::from_dimensions(width, height), visible);
    let svg = translate_svg(&doc.to_svg_string()?, offset)?;

    debug!(
        "Vectorized {}x{} image: {} pixels -> {} runs ({} black dropped)",
        width, height, stats.opaque_pixels, stats.merged_rects, stats.black_rects
    );

    Ok(Vectorized { svg, stats })
}

/// Decode an image file and vectorize it
pub fn vectorize_file(path: &Path, offset: Offset) -> Result<Vectorized> {
    let img = image::open(path)?;
    vectorize(&img, offset)
}

/// Re-merge an existing rect document, keeping its `viewBox` verbatim
pub fn consolidate_svg(svg: &str) -> Result<String> {
    let doc = SvgDocument::parse(svg)?;
    let before = doc.rects.len();

    let rects = drop_black(merge_rects(doc.rects)?);
    debug!("Consolidated {} rects into {}", before, rects.len());

    SvgDocument::new(doc.view_box, rects).to_svg_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::rect::Rect;
    use image::{Rgba, RgbaImage};

    fn image_from_row(pixels: &[[u8; 4]]) -> DynamicImage {
        let mut img = RgbaImage::new(pixels.len() as u32, 1);
        for (x, px) in pixels.iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgba(*px));
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_red_red_green_document() {
        let img = image_from_row(&[[255, 0, 0, 255], [255, 0, 0, 255], [0, 255, 0, 255]]);
        let out = vectorize(&img, Offset::default()).unwrap();
        let doc = SvgDocument::parse(&out.svg).unwrap();

        assert_eq!(doc.view_box.as_str(), "0 0 3 1");
        assert_eq!(
            doc.rects,
            vec![
                Rect {
                    x: 0,
                    y: 0,
                    width: 2,
                    height: 1,
                    fill: Color::new(255, 0, 0)
                },
                Rect::pixel(2, 0, Color::new(0, 255, 0)),
            ]
        );
        assert_eq!(out.stats.opaque_pixels, 3);
        assert_eq!(out.stats.emitted_rects, 2);
    }

    #[test]
    fn test_black_row_leaves_empty_document() {
        let img = image_from_row(&[[0, 0, 0, 255], [0, 0, 0, 255]]);
        let out = vectorize(&img, Offset::default()).unwrap();

        assert!(!out.svg.contains("<rect"));
        assert!(!out.svg.contains("#000000"));
        assert_eq!(out.stats.merged_rects, 1);
        assert_eq!(out.stats.black_rects, 1);
        assert_eq!(out.stats.emitted_rects, 0);
    }

    #[test]
    fn test_transparent_image_has_no_rects() {
        let img = image_from_row(&[[12, 34, 56, 0]]);
        let out = vectorize(&img, Offset::default()).unwrap();

        assert_eq!(out.stats.opaque_pixels, 0);
        assert!(SvgDocument::parse(&out.svg).unwrap().rects.is_empty());
    }

    #[test]
    fn test_offset_is_applied() {
        let img = image_from_row(&[[9, 9, 9, 255]]);
        let out = vectorize(&img, Offset::new(4, 5)).unwrap();
        let rect = &SvgDocument::parse(&out.svg).unwrap().rects[0];

        assert_eq!((rect.x, rect.y), (4, 5));
    }

    #[test]
    fn test_consolidate_pixel_document() {
        let svg = concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 4 1">"#,
            r#"<rect x="0" y="0" width="1" height="1" style="fill:#ff0000;"></rect>"#,
            r#"<rect x="1" y="0" width="1" height="1" style="fill:#ff0000;"></rect>"#,
            r#"<rect x="2" y="0" width="1" height="1" style="fill:#000000;"></rect>"#,
            r#"<rect x="3" y="0" width="1" height="1" style="fill:#000000;"></rect>"#,
            "</svg>"
        );
        let consolidated = consolidate_svg(svg).unwrap();
        let doc = SvgDocument::parse(&consolidated).unwrap();

        assert_eq!(doc.view_box.as_str(), "0 0 4 1");
        assert_eq!(doc.rects.len(), 1);
        assert_eq!(doc.rects[0].width, 2);

        assert_eq!(consolidate_svg(&consolidated).unwrap(), consolidated);
    }

    #[test]
    fn test_consolidate_keeps_rect_at_i64_max() {
        let svg = concat!(
            r#"<svg viewBox="0 0 1 1">"#,
            r#"<rect x="9223372036854775807" y="0" width="1" height="1" style="fill:#ff0000;"/>"#,
            r#"<rect x="0" y="0" width="1" height="1" style="fill:#ff0000;"/>"#,
            "</svg>"
        );
        let doc = SvgDocument::parse(&consolidate_svg(svg).unwrap()).unwrap();

        let xs: Vec<_> = doc.rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![i64::MAX, 0]);
    }

    #[test]
    fn test_consolidate_rejects_run_wider_than_u32() {
        let svg = concat!(
            r#"<svg viewBox="0 0 1 1">"#,
            r#"<rect x="0" y="3" width="4294967295" height="1" style="fill:#ff0000;"/>"#,
            r#"<rect x="4294967295" y="3" width="4294967295" height="1" style="fill:#ff0000;"/>"#,
            "</svg>"
        );

        assert!(matches!(
            consolidate_svg(svg),
            Err(crate::VectorizeError::CoordinateOverflow { x: 0, y: 3 })
        ));
    }

    #[test]
    fn test_missing_file_is_an_image_error() {
        let err = vectorize_file(Path::new("does/not/exist.png"), Offset::default()).unwrap_err();

        assert!(matches!(err, crate::VectorizeError::Image(_)));
    }
}
