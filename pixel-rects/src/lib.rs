//! Raster-to-SVG conversion that emits one `<rect>` per horizontal color run.
//!
//! Every visible pixel of an image becomes a unit rectangle, contiguous
//! same-color rectangles within a row are merged, pure black runs are
//! dropped, and the result is written as a `viewBox`-scaled SVG document.

pub mod color;
pub mod error;
pub mod extractor;
pub mod merger;
pub mod pipeline;
pub mod rect;
pub mod svg;
pub mod translate;

pub use color::Color;
pub use error::{Result, VectorizeError};
pub use extractor::{PixelGrid, PixelRects};
pub use merger::{drop_black, group_rows, merge_row, merge_rects, Row};
pub use pipeline::{consolidate_svg, vectorize, vectorize_file, VectorizeStats, Vectorized};
pub use rect::{Offset, Rect};
pub use svg::{SvgDocument, ViewBox, SVG_NAMESPACE};
pub use translate::translate_svg;
