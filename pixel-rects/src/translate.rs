use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::{Result, VectorizeError};
use crate::rect::Offset;
use crate::svg::{parse_attribute, root_view_box};

/// Shift every `<rect>` in a serialized document by `offset`.
///
/// Only the `x` and `y` attributes of rect elements are rewritten; every
/// other event is copied through unchanged, so translating by `(0, 0)`
/// reproduces the input.
pub fn translate_svg(svg: &str, offset: Offset) -> Result<String> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut seen_root = false;
    let mut moved = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(elem) if !seen_root => {
                root_view_box(&elem)?;
                seen_root = true;
                writer.write_event(Event::Start(elem))?;
            }
            Event::Empty(elem) if !seen_root => {
                root_view_box(&elem)?;
                seen_root = true;
                writer.write_event(Event::Empty(elem))?;
            }
            Event::Start(elem) if elem.local_name().as_ref() == b"rect" => {
                writer.write_event(Event::Start(shift_rect(&elem, offset)?))?;
                moved += 1;
            }
            Event::Empty(elem) if elem.local_name().as_ref() == b"rect" => {
                writer.write_event(Event::Empty(shift_rect(&elem, offset)?))?;
                moved += 1;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if !seen_root {
        return Err(VectorizeError::MissingRoot);
    }
    debug!("Translated {} rects by ({}, {})", moved, offset.dx, offset.dy);

    String::from_utf8(writer.into_inner()).map_err(|e| {
        VectorizeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn shift_rect(elem: &BytesStart<'_>, offset: Offset) -> Result<BytesStart<'static>> {
    let x: i64 = parse_attribute(elem, "rect", "x")?;
    let y: i64 = parse_attribute(elem, "rect", "y")?;
    let overflow = || VectorizeError::CoordinateOverflow { x, y };
    let new_x = x.checked_add(offset.dx).ok_or_else(overflow)?.to_string();
    let new_y = y.checked_add(offset.dy).ok_or_else(overflow)?.to_string();

    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut shifted = BytesStart::new(name);
    for attr in elem.attributes() {
        let attr = attr?;
        match attr.key.local_name().as_ref() {
            b"x" => shifted.push_attribute(("x", new_x.as_str())),
            b"y" => shifted.push_attribute(("y", new_y.as_str())),
            _ => shifted.push_attribute(Attribute {
                key: attr.key,
                value: attr.value,
            }),
        }
    }
    Ok(shifted)
}
