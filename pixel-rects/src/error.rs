use image::ImageError;

/// Error types for vectorizing images and rewriting rect documents
#[derive(Debug, thiserror::Error)]
pub enum VectorizeError {
    #[error("Image decoding error: {0}")]
    Image(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed SVG: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document has no root <svg> element")]
    MissingRoot,

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Coordinate overflow at rect ({x}, {y})")]
    CoordinateOverflow { x: i64, y: i64 },

    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

impl From<quick_xml::events::attributes::AttrError> for VectorizeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        VectorizeError::Xml(err.into())
    }
}

pub type Result<T> = std::result::Result<T, VectorizeError>;
