//! # Flattening
//!
//! A map can be read out in any order that walks over one family of slices (outer axis) and, within
//! each slice, over its spans (inner axis). Orders are written as two signed letters, such as
//! `"-l+s"`: the outer axis first, then the inner one. `s` stands for start, `e` for end and `l`
//! for level; `-` reverses the direction along an axis and `+` (or no sign) keeps it.
use std::fmt;
use std::str::FromStr;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::map::TriangularMap;
use crate::storage::Storage;
use crate::values::Values;

/// Coordinate used to walk over a map.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Start of a span.
    Start,
    /// End of a span.
    End,
    /// Length of a span.
    Level,
}

impl Axis {
    fn letter(self) -> char {
        match self {
            Axis::Start => 's',
            Axis::End => 'e',
            Axis::Level => 'l',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            's' => Some(Axis::Start),
            'e' => Some(Axis::End),
            'l' => Some(Axis::Level),
            _ => None,
        }
    }
}

/// Order in which `flatten` visits the spans of a map.
///
/// Only three pairs of axes are meaningful: starts within end slices, ends within start slices
/// and starts within rows.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String"),
)]
pub struct Order {
    outer: Axis,
    outer_reversed: bool,
    inner: Axis,
    inner_reversed: bool,
}

impl Order {
    /// Combine an outer and an inner axis.
    ///
    /// # Errors
    ///
    /// `InvalidOrder` unless the pair is `(Start, End)`, `(End, Start)` or `(Level, Start)`.
    pub fn new(outer: Axis, outer_reversed: bool, inner: Axis, inner_reversed: bool) -> Result<Self> {
        let order = Self { outer, outer_reversed, inner, inner_reversed };

        match (outer, inner) {
            (Axis::Start, Axis::End) | (Axis::End, Axis::Start) | (Axis::Level, Axis::Start) => Ok(order),
            (outer, inner) if outer == inner => Err(Error::InvalidOrder {
                order: order.to_string(),
                reason: "the same axis can't be both outer and inner".to_string(),
            }),
            _ => Err(Error::InvalidOrder {
                order: order.to_string(),
                reason: "supported combinations are start/end, end/start and level/start".to_string(),
            }),
        }
    }

    /// Axis of the slices.
    pub fn outer(&self) -> Axis {
        self.outer
    }

    /// Axis within each slice.
    pub fn inner(&self) -> Axis {
        self.inner
    }
}

impl Default for Order {
    /// Rows from the top down, each ordered by start: the order of the buffer.
    fn default() -> Self {
        Self { outer: Axis::Level, outer_reversed: true, inner: Axis::Start, inner_reversed: false }
    }
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(order: &str) -> Result<Self> {
        let malformed = || Error::InvalidOrder {
            order: order.to_string(),
            reason: "expected two axes out of 's', 'e' and 'l', each optionally preceded by '+' or '-'"
                .to_string(),
        };

        let mut chars = order.chars().peekable();
        let mut next_axis = || {
            let reversed = match chars.peek() {
                Some('-') => { chars.next(); true },
                Some('+') => { chars.next(); false },
                _ => false,
            };
            chars.next().and_then(Axis::from_letter).map(|axis| (axis, reversed))
        };

        let (outer, outer_reversed) = next_axis().ok_or_else(malformed)?;
        let (inner, inner_reversed) = next_axis().ok_or_else(malformed)?;
        if chars.next().is_some() {
            return Err(malformed());
        }

        Self::new(outer, outer_reversed, inner, inner_reversed)
    }
}

impl TryFrom<String> for Order {
    type Error = Error;

    fn try_from(order: String) -> Result<Self> {
        order.parse()
    }
}

impl From<Order> for String {
    fn from(order: Order) -> Self {
        order.to_string()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |reversed| if reversed { '-' } else { '+' };
        write!(
            f, "{}{}{}{}",
            sign(self.outer_reversed), self.outer.letter(), sign(self.inner_reversed), self.inner.letter(),
        )
    }
}

impl<T: Clone, S: Storage<Value=T>> TriangularMap<S> {
    /// Copy all values into a one-dimensional array, in the order described by `order`.
    ///
    /// # Arguments
    ///
    /// * `order`: Order string such as `"-l+s"`, see `Order`.
    ///
    /// # Return value
    ///
    /// Values of shape `[size, value_shape..]`.
    ///
    /// # Errors
    ///
    /// `InvalidOrder` if the string doesn't describe a supported order.
    pub fn flatten(&self, order: &str) -> Result<Values<T>> {
        self.flatten_with(order.parse()?)
    }

    /// Copy all values into a one-dimensional array, in the given order.
    pub fn flatten_with(&self, order: Order) -> Result<Values<T>> {
        debug!("flattening map of width {} in order {}", self.width(), order);
        let n = self.width();

        let mut slices = match order.outer {
            Axis::Start => (0..n)
                .map(|start| self.sslice(start, ..).map(Values::into_vec))
                .collect::<Result<Vec<_>>>()?,
            Axis::End => (1..=n)
                .map(|end| self.eslice(end, ..).map(Values::into_vec))
                .collect::<Result<Vec<_>>>()?,
            Axis::Level => (1..=n)
                .map(|level| self.lslice(level).map(<[T]>::to_vec))
                .collect::<Result<Vec<_>>>()?,
        };
        if order.outer_reversed {
            slices.reverse();
        }

        let mut data = Vec::with_capacity(self.size() * self.value_size());
        for slice in slices {
            if order.inner_reversed {
                for element in slice.chunks(self.value_size()).rev() {
                    data.extend_from_slice(element);
                }
            } else {
                data.extend(slice);
            }
        }

        Ok(Values::new(self.result_shape(vec![self.size()]), data))
    }
}
