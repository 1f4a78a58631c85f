//! # Triangular maps
//!
//! A triangular map holds one value for every sub-interval `(start, end)` of a sequence of length
//! `n`, as needed by dynamic programs over spans such as chart parsers. The `n * (n + 1) / 2`
//! values live in a single flat buffer, row by row from the full span at the top down to the spans
//! of length one at the bottom.
//!
//! Rows can be read and written in place, as can any number of rows taken from the top. Slices by
//! start or end, blocks of such slices and sub-triangles are copied.
//!
//! ```
//! use triangular_map::TriangularMap;
//!
//! let mut map = TriangularMap::filled(3, 0);
//! map.set(0, 2, &[5]).unwrap();
//!
//! assert_eq!(map.get(0, 2), Ok(&[5][..]));
//! assert_eq!(map.dslice(1), Ok(&[5, 0][..]));
//! ```
#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod map;
pub mod pretty;
pub mod slice;
pub mod storage;
pub mod values;

pub use error::{Error, Result};
pub use index::Triangle;
pub use map::{Axis, Options, Order, TriangularMap};
pub use pretty::{PrettyOptions, ValueFormat};
pub use slice::{BlockSelection, Selection};
pub use storage::{Storage, StorageMut};
pub use values::Values;
