//! # Index arithmetic
//!
//! A triangular map of width `n` stores `N = n * (n + 1) / 2` values, one for every span
//! `(start, end)` with `0 <= start < end <= n`. The spans are laid out row by row, starting with
//! the single full-width span at the top (here with `n = 6`, `N = 21`):
//!
//! ```text
//!                        /\         depth  level
//!                       /0 \            0      6
//!                      /\  /\
//!                     /1 \/ 2\          1      5
//!                    /\  /\  /\
//!                   /3 \/4 \/5 \        2      4
//!                  /\  /\  /\  /\
//!                 /6 \/7 \/8 \/9 \      3      3
//!                /\  /\  /\  /\  /\
//!               /10\/11\/12\/13\/14\    4      2
//!              /\  /\  /\  /\  /\  /\
//!             /15\/16\/17\/18\/19\/20\  5      1
//!             |   |   |   |   |   |   |
//! start/end:  0   1   2   3   4   5   6
//! ```
//!
//! The row of a span is its `depth = n - (end - start)`; the dual `level = n - depth` is the
//! length of the span. The row at `depth` holds `depth + 1` spans, ordered by their start, so
//! `(start, end)` lives at `depth * (depth + 1) / 2 + end - level`.
use std::ops::Range;

use crate::error::{Error, Result};

/// Number of values in a triangular map of width `n`.
pub const fn size_from_width(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Width of the triangular map that stores exactly `size` values.
///
/// # Errors
///
/// `InvalidSize` if no integer width fits, that is, `size` is not a triangular number.
pub fn width_from_size(size: usize) -> Result<usize> {
    let discriminant = size.checked_mul(8)
        .and_then(|v| v.checked_add(1))
        .ok_or(Error::InvalidSize { size })?;
    let width = (discriminant.isqrt() - 1) / 2;

    if size_from_width(width) == size {
        Ok(width)
    } else {
        Err(Error::InvalidSize { size })
    }
}

/// Element-wise `size_from_width`.
pub fn sizes_from_widths(widths: &[usize]) -> Vec<usize> {
    widths.iter().map(|&width| size_from_width(width)).collect()
}

/// Element-wise `width_from_size`.
///
/// # Errors
///
/// `InvalidSize` for the first size that is not a triangular number.
pub fn widths_from_sizes(sizes: &[usize]) -> Result<Vec<usize>> {
    sizes.iter().map(|&size| width_from_size(size)).collect()
}

/// The coordinate systems of a triangle of fixed width.
///
/// All methods taking spans assume them to be valid (see `validate`), which is checked in debug
/// builds only. Use the `TriangularMap` methods for checked access.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Triangle {
    width: usize,
}

impl Triangle {
    /// Create the coordinate system for a triangle with `width` values in the bottom row.
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    /// Derive the triangle that exactly covers a buffer of `size` values.
    pub fn from_size(size: usize) -> Result<Self> {
        width_from_size(size).map(Self::new)
    }

    /// Number of values in the bottom row.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Total number of values.
    pub const fn size(&self) -> usize {
        size_from_width(self.width)
    }

    /// Whether `0 <= start < end <= width`.
    pub const fn contains(&self, start: usize, end: usize) -> bool {
        start < end && end <= self.width
    }

    /// Check a span.
    ///
    /// # Errors
    ///
    /// `IndexRange` naming the span if it doesn't lie inside the triangle.
    pub fn validate(&self, start: usize, end: usize) -> Result<()> {
        if self.contains(start, end) {
            Ok(())
        } else {
            Err(Error::IndexRange { width: self.width, spans: vec![(start, end)] })
        }
    }

    /// Depth of a span, `0` for the full span and `width - 1` for spans of length one.
    pub fn depth(&self, start: usize, end: usize) -> usize {
        debug_assert!(start < end && end - start <= self.width);

        self.width - (end - start)
    }

    /// Level of the row at the given depth, which is the length of its spans.
    pub fn level(&self, depth: usize) -> usize {
        debug_assert!(depth <= self.width);

        self.width - depth
    }

    /// Level of the row containing a span.
    pub fn level_of_span(&self, start: usize, end: usize) -> usize {
        self.level(self.depth(start, end))
    }

    /// Level from either one coordinate (a depth) or two (a span).
    ///
    /// This is the dynamic counterpart of `level` and `level_of_span` for callers that collect
    /// coordinates at runtime.
    ///
    /// # Errors
    ///
    /// `UnsupportedArgumentCount` for any other number of coordinates, `InvalidDepth` or
    /// `IndexRange` for coordinates outside of the triangle.
    pub fn level_from(&self, coordinates: &[usize]) -> Result<usize> {
        match *coordinates {
            [depth] if depth < self.width => Ok(self.level(depth)),
            [depth] => Err(Error::InvalidDepth { depth, width: self.width }),
            [start, end] => {
                self.validate(start, end)?;
                Ok(self.level_of_span(start, end))
            },
            _ => Err(Error::UnsupportedArgumentCount { got: coordinates.len() }),
        }
    }

    /// Position of a span in the linear buffer.
    pub fn linear_index(&self, start: usize, end: usize) -> usize {
        debug_assert!(self.contains(start, end));

        let depth = self.depth(start, end);
        let level = self.level(depth);
        size_from_width(depth) + end - level
    }

    /// The span stored at a position of the linear buffer; inverse of `linear_index`.
    pub fn span(&self, linear: usize) -> (usize, usize) {
        debug_assert!(linear < self.size());

        // The row is the largest depth whose first position doesn't exceed `linear`.
        let depth = ((8 * linear + 1).isqrt() - 1) / 2;
        let start = linear - size_from_width(depth);
        (start, start + self.level(depth))
    }

    /// Contiguous range of linear positions holding the row at `depth`.
    pub fn row(&self, depth: usize) -> Range<usize> {
        debug_assert!(depth < self.width);

        let level = self.level(depth);
        self.linear_index(0, level)..self.linear_index(self.width - level, self.width) + 1
    }

    /// All spans in buffer order.
    pub fn spans(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
        (0..self.width).flat_map(move |depth| {
            let level = self.level(depth);
            (0..=self.width - level).map(move |start| (start, start + level))
        })
    }

    /// Check many spans at once.
    ///
    /// # Arguments
    ///
    /// * `starts`: Start indices, parallel to `ends` or of length one.
    /// * `ends`: End indices, parallel to `starts` or of length one.
    ///
    /// # Errors
    ///
    /// A single `IndexRange` listing every invalid span, or `ShapeMismatch` if the slices can't be
    /// paired up.
    pub fn validate_all(&self, starts: &[usize], ends: &[usize]) -> Result<()> {
        let invalid = broadcast(starts, ends)?
            .filter(|&(start, end)| !self.contains(start, end))
            .collect::<Vec<_>>();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(Error::IndexRange { width: self.width, spans: invalid })
        }
    }

    /// Element-wise `depth`.
    pub fn depths(&self, starts: &[usize], ends: &[usize]) -> Result<Vec<usize>> {
        self.validate_all(starts, ends)?;
        Ok(broadcast(starts, ends)?.map(|(start, end)| self.depth(start, end)).collect())
    }

    /// Element-wise `level_of_span`.
    pub fn levels(&self, starts: &[usize], ends: &[usize]) -> Result<Vec<usize>> {
        self.validate_all(starts, ends)?;
        Ok(broadcast(starts, ends)?.map(|(start, end)| self.level_of_span(start, end)).collect())
    }

    /// Element-wise `level`, for depths of existing rows.
    ///
    /// # Errors
    ///
    /// `InvalidDepth` for the first depth that is not below the width.
    pub fn levels_of_depths(&self, depths: &[usize]) -> Result<Vec<usize>> {
        depths.iter()
            .map(|&depth| if depth < self.width {
                Ok(self.level(depth))
            } else {
                Err(Error::InvalidDepth { depth, width: self.width })
            })
            .collect()
    }

    /// Element-wise `linear_index`.
    pub fn linear_indices(&self, starts: &[usize], ends: &[usize]) -> Result<Vec<usize>> {
        self.validate_all(starts, ends)?;
        Ok(broadcast(starts, ends)?.map(|(start, end)| self.linear_index(start, end)).collect())
    }
}

/// Pair up parallel start and end indices, repeating a slice of length one.
///
/// # Errors
///
/// `ShapeMismatch` if the lengths differ and neither is one.
pub fn broadcast<'a>(
    starts: &'a [usize],
    ends: &'a [usize],
) -> Result<impl Iterator<Item=(usize, usize)> + 'a> {
    let len = match (starts.len(), ends.len()) {
        (left, right) if left == right => left,
        (1, right) => right,
        (left, 1) => left,
        (left, right) => return Err(Error::ShapeMismatch { left, right }),
    };

    Ok((0..len).map(move |i| {
        let start = if starts.len() == 1 { starts[0] } else { starts[i] };
        let end = if ends.len() == 1 { ends[0] } else { ends[i] };
        (start, end)
    }))
}

#[cfg(test)]
mod test;
