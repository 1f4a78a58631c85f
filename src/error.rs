//! # Error reporting
//!
//! All operations on a triangular map either succeed completely or fail before touching the
//! buffer. The failures are contract violations of the caller and are reported with the values
//! that caused them.
use itertools::Itertools;
use thiserror::Error;

/// Everything that can go wrong when building or addressing a triangular map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No integer width `n` satisfies `n * (n + 1) / 2 == size`.
    #[error("{size} is not a valid size for a triangular map")]
    InvalidSize {
        /// Number of elements that was offered.
        size: usize,
    },

    /// At least one `(start, end)` pair violates `0 <= start < end <= width`.
    ///
    /// For batched access, every failing pair is listed.
    #[error(
        "invalid indices for triangular map with width {width}: {}",
        spans.iter().map(|(start, end)| format!("({start}, {end})")).join(", ")
    )]
    IndexRange {
        /// Width of the map that was addressed.
        width: usize,
        /// The offending pairs.
        spans: Vec<(usize, usize)>,
    },

    /// A flattening order that does not read `[+-](s|e|l)[+-](s|e|l)` or that pairs dimensions
    /// other than `s/e`, `e/s` and `l/s`.
    #[error("invalid order '{order}': {reason}")]
    InvalidOrder {
        /// The order as given.
        order: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A level was requested from neither a depth nor a `(start, end)` pair.
    #[error("expected one coordinate (depth) or two (start, end) to compute a level but got {got}")]
    UnsupportedArgumentCount {
        /// Number of coordinates supplied.
        got: usize,
    },

    /// Parallel index slices that can't be broadcast against each other.
    #[error("can't broadcast {left} start indices against {right} end indices")]
    ShapeMismatch {
        /// Number of start indices.
        left: usize,
        /// Number of end indices.
        right: usize,
    },

    /// A level outside of `1..=width`.
    #[error("level {level} is out of range for triangular map with width {width}")]
    InvalidLevel {
        /// Requested level.
        level: usize,
        /// Width of the map.
        width: usize,
    },

    /// A depth outside of `0..width` (or `0..=width` when counting rows from the top).
    #[error("depth {depth} is out of range for triangular map with width {width}")]
    InvalidDepth {
        /// Requested depth.
        depth: usize,
        /// Width of the map.
        width: usize,
    },

    /// A secondary selection addresses positions that the sliced axis doesn't have.
    #[error("selection {selection} is out of range for an axis of length {len}")]
    SelectionOutOfRange {
        /// Description of the selection.
        selection: String,
        /// Length of the axis it was applied to.
        len: usize,
    },

    /// The number of values to write doesn't match the number of addressed elements.
    #[error("expected {expected} values (or one element of {element} to broadcast) but got {got}")]
    ValueCountMismatch {
        /// Number of scalar values needed.
        expected: usize,
        /// Number of scalar values in a single element.
        element: usize,
        /// Number of scalar values supplied.
        got: usize,
    },

    /// A value shape containing a zero extent.
    #[error("value shape {shape:?} describes empty elements")]
    InvalidValueShape {
        /// The declared shape.
        shape: Vec<usize>,
    },

    /// The buffer length is not a multiple of the number of scalars per element.
    #[error("buffer of length {len} can't hold whole elements of shape {shape:?}")]
    ValueShapeMismatch {
        /// Length of the buffer.
        len: usize,
        /// The declared shape.
        shape: Vec<usize>,
    },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
