use std::fmt;
use std::io;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::color::Color;
use crate::error::{Result, VectorizeError};
use crate::rect::{Offset, Rect};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// `viewBox` attribute value, kept verbatim from its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBox(String);

impl ViewBox {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// `0 0 W H` for a freshly converted image
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self(format!("0 0 {} {}", width, height))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rect-only SVG document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub view_box: ViewBox,
    pub rects: Vec<Rect>,
}

impl SvgDocument {
    pub fn new(view_box: ViewBox, rects: Vec<Rect>) -> Self {
        Self { view_box, rects }
    }

    /// Serialize as `<svg xmlns viewBox>` with one self-closing `<rect>` per entry.
    ///
    /// The root deliberately carries no `width`/`height`; scaling is driven by
    /// `viewBox` alone.
    pub fn to_svg_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", SVG_NAMESPACE));
        root.push_attribute(("viewBox", self.view_box.as_str()));
        writer.write_event(Event::Start(root))?;

        for rect in &self.rects {
            writer.write_event(Event::Empty(rect_element(rect)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("svg")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| VectorizeError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Read a rect document back into structured form.
    ///
    /// The root must be `<svg>` with a `viewBox`. Every `rect` element, at any
    /// depth, needs integer `x`, `y`, `width`, `height` and a fill.
    pub fn parse(svg: &str) -> Result<Self> {
        let mut reader = Reader::from_str(svg);
        let mut view_box = None;
        let mut rects = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(elem) | Event::Empty(elem) => {
                    if view_box.is_none() {
                        view_box = Some(root_view_box(&elem)?);
                    } else if elem.local_name().as_ref() == b"rect" {
                        rects.push(parse_rect(&elem)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let view_box = view_box.ok_or(VectorizeError::MissingRoot)?;
        Ok(Self { view_box, rects })
    }

    pub fn translated(&self, offset: Offset) -> Result<Self> {
        Ok(Self {
            view_box: self.view_box.clone(),
            rects: self
                .rects
                .iter()
                .map(|r| r.translated(offset))
                .collect::<Result<_>>()?,
        })
    }
}

fn rect_element(rect: &Rect) -> BytesStart<'static> {
    let mut elem = BytesStart::new("rect");
    elem.push_attribute(("x", rect.x.to_string().as_str()));
    elem.push_attribute(("y", rect.y.to_string().as_str()));
    elem.push_attribute(("width", rect.width.to_string().as_str()));
    elem.push_attribute(("height", rect.height.to_string().as_str()));
    elem.push_attribute(("style", format!("fill:{};", rect.fill).as_str()));
    elem
}

/// Validate the document root and return its `viewBox`
pub(crate) fn root_view_box(elem: &BytesStart<'_>) -> Result<ViewBox> {
    if elem.local_name().as_ref() != b"svg" {
        return Err(VectorizeError::MissingRoot);
    }
    attribute(elem, "svg", "viewBox")?
        .map(ViewBox::new)
        .ok_or(VectorizeError::MissingAttribute {
            element: "svg",
            attribute: "viewBox",
        })
}

/// Raw attribute value by local name
pub(crate) fn attribute(
    elem: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
) -> Result<Option<String>> {
    for attr in elem.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() != name.as_bytes() {
            continue;
        }
        let value = std::str::from_utf8(&attr.value).map_err(|_| {
            VectorizeError::InvalidAttribute {
                element,
                attribute: name,
                value: String::from_utf8_lossy(&attr.value).into_owned(),
            }
        })?;
        return Ok(Some(value.to_string()));
    }
    Ok(None)
}

/// Required attribute parsed into `T`
pub(crate) fn parse_attribute<T: std::str::FromStr>(
    elem: &BytesStart<'_>,
    element: &'static str,
    name: &'static str,
) -> Result<T> {
    let value = attribute(elem, element, name)?.ok_or(VectorizeError::MissingAttribute {
        element,
        attribute: name,
    })?;
    value
        .trim()
        .parse()
        .map_err(|_| VectorizeError::InvalidAttribute {
            element,
            attribute: name,
            value,
        })
}

fn parse_rect(elem: &BytesStart<'_>) -> Result<Rect> {
    Ok(Rect {
        x: parse_attribute(elem, "rect", "x")?,
        y: parse_attribute(elem, "rect", "y")?,
        width: parse_attribute(elem, "rect", "width")?,
        height: parse_attribute(elem, "rect", "height")?,
        fill: parse_fill(elem)?,
    })
}

/// Fill from the `style` declaration list, falling back to a `fill` attribute
fn parse_fill(elem: &BytesStart<'_>) -> Result<Color> {
    let from_style = attribute(elem, "rect", "style")?.and_then(|style| {
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            (name.trim() == "fill").then(|| value.trim().to_string())
        })
    });

    let fill = match from_style {
        Some(fill) => fill,
        None => attribute(elem, "rect", "fill")?.ok_or(VectorizeError::MissingAttribute {
            element: "rect",
            attribute: "fill",
        })?,
    };

    fill.parse()
}
