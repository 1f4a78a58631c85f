//! # Secondary selections
//!
//! Start and end slices produce a one-dimensional array of spans, blocks a two-dimensional grid.
//! Before any value is read, these index arrays can be narrowed down along each axis.
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use itertools::Itertools;

use crate::error::{Error, Result};

/// Positions to keep along one axis of an index array.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum Selection {
    /// Every position.
    #[default]
    All,
    /// A single position; the axis is dropped from the result.
    At(usize),
    /// Positions `start, start + step, ...` below `end` (or the axis length if `None`).
    ///
    /// Bounds beyond the axis are clamped, so a range never fails for being too long.
    Range {
        /// First position.
        start: usize,
        /// Exclusive upper bound.
        end: Option<usize>,
        /// Distance between positions, at least one.
        step: usize,
    },
    /// Arbitrary positions, in the given order, possibly repeated.
    Indices(Vec<usize>),
}

impl Selection {
    /// A range with a step.
    pub fn stepped(range: Range<usize>, step: usize) -> Self {
        Self::Range { start: range.start, end: Some(range.end), step }
    }

    /// Resolve the selection against an axis.
    ///
    /// # Arguments
    ///
    /// * `len`: Length of the axis.
    ///
    /// # Return value
    ///
    /// The selected positions and whether the axis remains a dimension of the result.
    ///
    /// # Errors
    ///
    /// `SelectionOutOfRange` if a single position or an explicit index doesn't exist, or if a
    /// range has a zero step.
    pub fn positions(&self, len: usize) -> Result<(Vec<usize>, bool)> {
        let out_of_range = || Error::SelectionOutOfRange { selection: self.to_string(), len };

        match self {
            Selection::All => Ok(((0..len).collect(), true)),
            &Selection::At(i) if i < len => Ok((vec![i], false)),
            Selection::At(_) => Err(out_of_range()),
            &Selection::Range { step: 0, .. } => Err(out_of_range()),
            &Selection::Range { start, end, step } => {
                let end = end.map_or(len, |end| end.min(len));
                Ok(((start.min(end)..end).step_by(step).collect(), true))
            },
            Selection::Indices(indices) if indices.iter().all(|&i| i < len) => {
                Ok((indices.clone(), true))
            },
            Selection::Indices(_) => Err(out_of_range()),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, ".."),
            Selection::At(i) => write!(f, "{i}"),
            Selection::Range { start, end, step } => {
                write!(f, "{start}..")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                if *step != 1 {
                    write!(f, " step {step}")?;
                }
                Ok(())
            },
            Selection::Indices(indices) => write!(f, "[{}]", indices.iter().join(", ")),
        }
    }
}

impl From<RangeFull> for Selection {
    fn from(_: RangeFull) -> Self {
        Selection::All
    }
}

impl From<usize> for Selection {
    fn from(i: usize) -> Self {
        Selection::At(i)
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Selection::stepped(range, 1)
    }
}

impl From<RangeFrom<usize>> for Selection {
    fn from(range: RangeFrom<usize>) -> Self {
        Selection::Range { start: range.start, end: None, step: 1 }
    }
}

impl From<RangeTo<usize>> for Selection {
    fn from(range: RangeTo<usize>) -> Self {
        Selection::Range { start: 0, end: Some(range.end), step: 1 }
    }
}

impl From<RangeInclusive<usize>> for Selection {
    fn from(range: RangeInclusive<usize>) -> Self {
        let (start, end) = range.into_inner();
        // An inclusive end of `usize::MAX` covers every position.
        Selection::Range { start, end: end.checked_add(1), step: 1 }
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Selection::Indices(indices)
    }
}

impl From<&[usize]> for Selection {
    fn from(indices: &[usize]) -> Self {
        Selection::Indices(indices.to_vec())
    }
}

/// Row and column selection of a block.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct BlockSelection {
    /// Selection along the first axis (offsets within a slice).
    pub rows: Selection,
    /// Selection along the second axis (which slice).
    pub columns: Selection,
}

impl BlockSelection {
    /// Combine a row and a column selection.
    pub fn new(rows: impl Into<Selection>, columns: impl Into<Selection>) -> Self {
        Self { rows: rows.into(), columns: columns.into() }
    }
}

impl From<RangeFull> for BlockSelection {
    fn from(_: RangeFull) -> Self {
        Self::default()
    }
}

impl<R: Into<Selection>, C: Into<Selection>> From<(R, C)> for BlockSelection {
    fn from((rows, columns): (R, C)) -> Self {
        Self::new(rows, columns)
    }
}
