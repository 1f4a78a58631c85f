//! # Owned results
//!
//! Accesses that can't be served by a contiguous view copy the addressed values into a `Values`:
//! a row-major buffer together with its shape. The shape is the shape of the index array the
//! values were gathered with, followed by the value shape of the map.
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major owned array of scalars.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Values<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Values<T> {
    /// Wrap data in a shape.
    ///
    /// # Arguments
    ///
    /// * `shape`: Extent of every dimension; the empty shape holds a single scalar.
    /// * `data`: Row-major values, as many as the product of the extents.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());

        Self { shape, data }
    }

    /// Extent of every dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of scalars.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there are no scalars.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The scalars, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Give up the shape.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The scalar at a full coordinate, if it is in bounds.
    pub fn get(&self, coordinate: &[usize]) -> Option<&T> {
        if coordinate.len() != self.shape.len() {
            return None;
        }

        let mut linear = 0;
        for (&i, &extent) in coordinate.iter().zip(&self.shape) {
            if i >= extent {
                return None;
            }
            linear = linear * extent + i;
        }

        self.data.get(linear)
    }
}

impl<T, const N: usize> Index<[usize; N]> for Values<T> {
    type Output = T;

    fn index(&self, coordinate: [usize; N]) -> &T {
        match self.get(&coordinate) {
            Some(value) => value,
            None => panic!("coordinate {:?} out of bounds for shape {:?}", coordinate, self.shape),
        }
    }
}
