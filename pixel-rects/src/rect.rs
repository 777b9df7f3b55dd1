use serde::Serialize;

use crate::color::Color;
use crate::error::{Result, VectorizeError};

/// Axis-aligned filled rectangle in image pixel coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub fill: Color,
}

impl Rect {
    /// Unit rectangle covering a single source pixel
    pub fn pixel(x: i64, y: i64, fill: Color) -> Self {
        Self {
            x,
            y,
            width: 1,
            height: 1,
            fill,
        }
    }

    /// Exclusive end of the horizontal extent, `None` past `i64::MAX`
    pub fn right(&self) -> Option<i64> {
        self.x.checked_add(i64::from(self.width))
    }

    pub fn translated(&self, offset: Offset) -> Result<Self> {
        let overflow = || VectorizeError::CoordinateOverflow {
            x: self.x,
            y: self.y,
        };
        Ok(Self {
            x: self.x.checked_add(offset.dx).ok_or_else(overflow)?,
            y: self.y.checked_add(offset.dy).ok_or_else(overflow)?,
            ..self.clone()
        })
    }
}

/// Constant shift applied to every rectangle position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
}

impl Offset {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Opposite shift; `None` when a component is `i64::MIN`
    pub fn inverse(&self) -> Option<Self> {
        Some(Self::new(self.dx.checked_neg()?, self.dy.checked_neg()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_unit() {
        let rect = Rect::pixel(3, 4, Color::new(1, 2, 3));
        assert_eq!((rect.width, rect.height), (1, 1));
        assert_eq!(rect.right(), Some(4));
    }

    #[test]
    fn test_translate_and_back() {
        let rect = Rect {
            x: 2,
            y: 0,
            width: 5,
            height: 1,
            fill: Color::new(0, 255, 0),
        };
        let offset = Offset::new(-7, 3);

        let moved = rect.translated(offset).unwrap();
        assert_eq!((moved.x, moved.y), (-5, 3));
        assert_eq!(moved.width, 5);
        assert_eq!(moved.translated(offset.inverse().unwrap()).unwrap(), rect);
    }

    #[test]
    fn test_extreme_coordinates_do_not_wrap() {
        let rect = Rect {
            x: i64::MAX,
            y: 0,
            width: 1,
            height: 1,
            fill: Color::new(1, 2, 3),
        };

        assert_eq!(rect.right(), None);
        assert!(matches!(
            rect.translated(Offset::new(1, 0)),
            Err(VectorizeError::CoordinateOverflow { x: i64::MAX, y: 0 })
        ));
        assert_eq!(Offset::new(i64::MIN, 0).inverse(), None);
    }
}
