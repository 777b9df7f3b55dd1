use std::collections::BTreeMap;

use tracing::debug;

use crate::color::Color;
use crate::error::{Result, VectorizeError};
use crate::rect::Rect;

/// All rectangles sharing a single y coordinate, in encounter order
#[derive(Debug, Clone)]
pub struct Row {
    pub y: i64,
    pub min_x: i64,
    pub max_x: i64,
    pub rects: Vec<Rect>,
}

impl Row {
    fn new(first: Rect) -> Self {
        Self {
            y: first.y,
            min_x: first.x,
            max_x: first.right().unwrap_or(i64::MAX),
            rects: vec![first],
        }
    }

    fn push(&mut self, rect: Rect) {
        self.min_x = self.min_x.min(rect.x);
        self.max_x = self.max_x.max(rect.right().unwrap_or(i64::MAX));
        self.rects.push(rect);
    }
}

/// Horizontal run being accumulated while scanning a row
struct Run {
    x: i64,
    width: u32,
    fill: Color,
}

impl Run {
    fn start(rect: &Rect) -> Self {
        Self {
            x: rect.x,
            width: rect.width,
            fill: rect.fill,
        }
    }

    fn continues_with(&self, rect: &Rect) -> bool {
        self.x.checked_add(i64::from(self.width)) == Some(rect.x) && rect.fill == self.fill
    }

    fn extend(&mut self, rect: &Rect) -> Result<()> {
        self.width = self
            .width
            .checked_add(rect.width)
            .ok_or(VectorizeError::CoordinateOverflow {
                x: self.x,
                y: rect.y,
            })?;
        Ok(())
    }

    /// Close the run, borrowing y and height from the rectangle that ended it
    fn close(self, closer: &Rect) -> Rect {
        Rect {
            x: self.x,
            y: closer.y,
            width: self.width,
            height: closer.height,
            fill: self.fill,
        }
    }
}

/// Group rectangles by y, rows ordered by ascending y
pub fn group_rows<I>(rects: I) -> BTreeMap<i64, Row>
where
    I: IntoIterator<Item = Rect>,
{
    let mut rows: BTreeMap<i64, Row> = BTreeMap::new();
    for rect in rects {
        match rows.get_mut(&rect.y) {
            Some(row) => row.push(rect),
            None => {
                rows.insert(rect.y, Row::new(rect));
            }
        }
    }
    rows
}

/// Collapse contiguous same-fill rectangles of one row into runs.
///
/// Input must be ordered left to right. Widths and heights are read from the
/// rectangles, so already-merged rows can be fed back in. A run whose width
/// would exceed `u32::MAX` is a `CoordinateOverflow` error.
pub fn merge_row(row: &Row) -> Result<Vec<Rect>> {
    let mut merged = Vec::new();
    let mut run: Option<Run> = None;

    for rect in &row.rects {
        if let Some(current) = run.as_mut() {
            if current.continues_with(rect) {
                current.extend(rect)?;
                continue;
            }
        }

        if let Some(done) = run.take() {
            if done.width > 0 {
                merged.push(done.close(rect));
            }
        }
        run = Some(Run::start(rect));
    }

    if let (Some(done), Some(last)) = (run, row.rects.last()) {
        if done.width > 0 {
            merged.push(done.close(last));
        } else if row.rects.len() == 1 {
            merged.push(last.clone());
        }
    }

    Ok(merged)
}

/// Merge horizontal runs row by row and concatenate rows in ascending y
pub fn merge_rects<I>(rects: I) -> Result<Vec<Rect>>
where
    I: IntoIterator<Item = Rect>,
{
    let rows = group_rows(rects);
    let mut merged = Vec::new();

    for row in rows.values() {
        let before = merged.len();
        merged.extend(merge_row(row)?);
        debug!(
            "Row y={} spans [{}, {}): {} rects -> {} runs",
            row.y,
            row.min_x,
            row.max_x,
            row.rects.len(),
            merged.len() - before
        );
    }

    Ok(merged)
}

/// Remove pure black rectangles before serialization
pub fn drop_black(rects: Vec<Rect>) -> Vec<Rect> {
    rects.into_iter().filter(|r| !r.fill.is_black()).collect()
}
