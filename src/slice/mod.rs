//! # Slicing
//!
//! Translates every access pattern of a triangular map into positions of the linear buffer, and
//! decides whether the pattern can be served by a view (a `Range` of positions) or has to be
//! copied (a `Gather`).
//!
//! Rows of the triangle (fixed depth, or equivalently fixed level) are stored contiguously, as is
//! any number of rows taken from the top. Those are views. Everything keyed by start, end or an
//! arbitrary window of coordinates cuts across rows and is gathered into a copy.
use std::ops::Range;

use itertools::iproduct;

pub use selection::{BlockSelection, Selection};

use crate::error::{Error, Result};
use crate::index::{size_from_width, Triangle};

mod selection;

/// Element positions of an access pattern that has to be copied, arranged row-major in `shape`.
///
/// Patterns served by a view return the contiguous `Range` of element positions instead.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gather {
    /// Shape of the index array; the value shape is appended to it in the result.
    pub shape: Vec<usize>,
    /// Element positions, as many as the product of `shape`.
    pub indices: Vec<usize>,
}

impl Gather {
    /// Number of elements addressed.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no elements are addressed.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Positions of the row at a level.
///
/// # Errors
///
/// `InvalidLevel` unless `1 <= level <= width`.
pub fn level_slice(triangle: &Triangle, level: usize) -> Result<Range<usize>> {
    if level == 0 || level > triangle.width() {
        return Err(Error::InvalidLevel { level, width: triangle.width() });
    }

    Ok(triangle.row(triangle.width() - level))
}

/// Positions of the row at a depth.
///
/// # Errors
///
/// `InvalidDepth` unless `depth < width`.
pub fn depth_slice(triangle: &Triangle, depth: usize) -> Result<Range<usize>> {
    if depth >= triangle.width() {
        return Err(Error::InvalidDepth { depth, width: triangle.width() });
    }

    Ok(triangle.row(depth))
}

/// Positions of the top `rows` rows, which form a triangle of width `rows` themselves.
///
/// # Errors
///
/// `InvalidDepth` if there are fewer than `rows` rows.
pub fn top(triangle: &Triangle, rows: usize) -> Result<Range<usize>> {
    if rows > triangle.width() {
        return Err(Error::InvalidDepth { depth: rows, width: triangle.width() });
    }

    Ok(0..size_from_width(rows))
}

/// Spans sharing a start, ordered by increasing end.
///
/// # Arguments
///
/// * `start`: Shared start, below the width.
/// * `selection`: Which of the `width - start` ends to keep.
///
/// # Errors
///
/// `IndexRange` for a start at or beyond the width, `SelectionOutOfRange` for a selection that
/// doesn't fit.
pub fn start_slice(triangle: &Triangle, start: usize, selection: &Selection) -> Result<Gather> {
    triangle.validate(start, start.saturating_add(1))?;

    let ends = (start + 1..=triangle.width()).collect::<Vec<_>>();
    let (positions, keep) = selection.positions(ends.len())?;
    let indices = positions.into_iter()
        .map(|p| triangle.linear_index(start, ends[p]))
        .collect::<Vec<_>>();

    Ok(gather_1d(indices, keep))
}

/// Spans sharing an end, ordered by increasing start.
///
/// # Arguments
///
/// * `end`: Shared end, in `1..=width`.
/// * `selection`: Which of the `end` starts to keep.
///
/// # Errors
///
/// `IndexRange` for an end outside of `1..=width`, `SelectionOutOfRange` for a selection that
/// doesn't fit.
pub fn end_slice(triangle: &Triangle, end: usize, selection: &Selection) -> Result<Gather> {
    triangle.validate(end.saturating_sub(1), end)?;

    let (positions, keep) = selection.positions(end)?;
    let indices = positions.into_iter()
        .map(|start| triangle.linear_index(start, end))
        .collect::<Vec<_>>();

    Ok(gather_1d(indices, keep))
}

/// All start slices cut to the same length, side by side.
///
/// Column `c` holds the spans starting at `c`; row `r` of it is the span `(c, c + level - r)`, so
/// the first row holds the spans of length `level` and the last row the spans of length one.
///
/// # Errors
///
/// `InvalidLevel` unless `1 <= level <= width`, `SelectionOutOfRange` for a selection that doesn't
/// fit the `level` by `width - level + 1` grid.
pub fn start_block(triangle: &Triangle, level: usize, selection: &BlockSelection) -> Result<Gather> {
    block(triangle, level, selection, |row, column| (column, column + level - row))
}

/// All end slices cut to the same length, side by side.
///
/// Column `c` holds the spans ending at `c + level`; row `r` of it is the span
/// `(c + r, c + level)`, so the first row holds the spans of length `level` and the last row the
/// spans of length one.
///
/// # Errors
///
/// As for `start_block`.
pub fn end_block(triangle: &Triangle, level: usize, selection: &BlockSelection) -> Result<Gather> {
    block(triangle, level, selection, |row, column| (column + row, column + level))
}

fn block(
    triangle: &Triangle,
    level: usize,
    selection: &BlockSelection,
    span: impl Fn(usize, usize) -> (usize, usize),
) -> Result<Gather> {
    if level == 0 || level > triangle.width() {
        return Err(Error::InvalidLevel { level, width: triangle.width() });
    }

    let (rows, keep_rows) = selection.rows.positions(level)?;
    let (columns, keep_columns) = selection.columns.positions(triangle.width() - level + 1)?;

    let mut shape = Vec::with_capacity(2);
    if keep_rows {
        shape.push(rows.len());
    }
    if keep_columns {
        shape.push(columns.len());
    }
    let indices = iproduct!(rows, columns)
        .map(|(row, column)| {
            let (start, end) = span(row, column);
            triangle.linear_index(start, end)
        })
        .collect();

    Ok(Gather { shape, indices })
}

/// Arbitrary spans.
///
/// # Errors
///
/// `IndexRange` listing all invalid spans, `ShapeMismatch` if the slices don't pair up.
pub fn spans(triangle: &Triangle, starts: &[usize], ends: &[usize]) -> Result<Gather> {
    let indices = triangle.linear_indices(starts, ends)?;

    Ok(Gather { shape: vec![indices.len()], indices })
}

/// The sub-triangle below the span `(window.start, window.end)`, optionally thinned out.
///
/// Starting at the depth of the window itself, every row contributes the spans that lie within the
/// window, taking every `step`-th of them. The result is always a copy and, for a step of one, the
/// triangle of width `window.end - window.start`.
///
/// # Errors
///
/// `IndexRange` for a window that isn't a valid span, `SelectionOutOfRange` for a zero step.
pub fn window(triangle: &Triangle, window: Range<usize>, step: usize) -> Result<Vec<usize>> {
    triangle.validate(window.start, window.end)?;
    if step == 0 {
        return Err(Error::SelectionOutOfRange {
            selection: Selection::stepped(window, step).to_string(),
            len: triangle.width(),
        });
    }

    let start_depth = triangle.depth(window.start, window.end);
    let mut indices = Vec::new();
    for depth in start_depth..triangle.width() {
        let row = triangle.row(depth);
        let positions = (window.start..=window.start + (depth - start_depth)).step_by(step);
        indices.extend(positions.map(|p| row.start + p));
    }

    Ok(indices)
}

fn gather_1d(indices: Vec<usize>, keep: bool) -> Gather {
    let shape = if keep { vec![indices.len()] } else { Vec::new() };

    Gather { shape, indices }
}
