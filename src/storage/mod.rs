//! # Storage back-ends
//!
//! The triangular map doesn't care where its values live, as long as they can be read and written
//! by position, viewed as a contiguous range, and gathered into a new buffer by a list of
//! positions. Every position here addresses a whole element, which occupies `value_size`
//! consecutive scalars of the underlying buffer.
//!
//! Owned buffers (`Vec<T>`, `Box<[T]>`) and borrowed ones (`&[T]`, `&mut [T]`) are supported. The
//! borrowed ones are what views are made of: a map over `&mut [T]` writes straight into the buffer
//! of the map it was taken from.
use std::ops::Range;

/// Read access to a flat buffer of scalars.
pub trait Storage {
    /// Scalar stored in the buffer.
    type Value;

    /// All scalars, element-major.
    fn as_slice(&self) -> &[Self::Value];

    /// Number of scalars stored.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether no scalars are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The scalars of the element at `index`.
    fn read(&self, index: usize, value_size: usize) -> &[Self::Value] {
        debug_assert!((index + 1) * value_size <= self.len());

        &self.as_slice()[index * value_size..(index + 1) * value_size]
    }

    /// Zero-copy view of the elements in `range`.
    fn view(&self, range: Range<usize>, value_size: usize) -> &[Self::Value] {
        debug_assert!(range.start <= range.end);
        debug_assert!(range.end * value_size <= self.len());

        &self.as_slice()[range.start * value_size..range.end * value_size]
    }

    /// Copy the elements at `indices`, in order, into a new buffer.
    ///
    /// Indices may repeat; every occurrence is copied.
    fn gather(&self, indices: &[usize], value_size: usize) -> Vec<Self::Value>
    where
        Self::Value: Clone,
    {
        let mut values = Vec::with_capacity(indices.len() * value_size);
        for &index in indices {
            values.extend_from_slice(self.read(index, value_size));
        }

        values
    }
}

/// Write access to a flat buffer of scalars.
pub trait StorageMut: Storage {
    /// All scalars, element-major, mutably.
    fn as_mut_slice(&mut self) -> &mut [Self::Value];

    /// The scalars of the element at `index`, mutably.
    fn read_mut(&mut self, index: usize, value_size: usize) -> &mut [Self::Value] {
        debug_assert!((index + 1) * value_size <= self.len());

        &mut self.as_mut_slice()[index * value_size..(index + 1) * value_size]
    }

    /// Zero-copy mutable view of the elements in `range`.
    fn view_mut(&mut self, range: Range<usize>, value_size: usize) -> &mut [Self::Value] {
        debug_assert!(range.start <= range.end);
        debug_assert!(range.end * value_size <= self.len());

        &mut self.as_mut_slice()[range.start * value_size..range.end * value_size]
    }

    /// Overwrite the element at `index`.
    fn write(&mut self, index: usize, value: &[Self::Value])
    where
        Self::Value: Clone,
    {
        self.read_mut(index, value.len()).clone_from_slice(value);
    }

    /// Write elements to `indices`.
    ///
    /// # Arguments
    ///
    /// * `indices`: Element positions, written in order (a repeated position keeps the last value).
    /// * `values`: Either one element per index, or a single element written to every index.
    /// * `value_size`: Number of scalars per element.
    fn scatter(&mut self, indices: &[usize], values: &[Self::Value], value_size: usize)
    where
        Self::Value: Clone,
    {
        debug_assert!(values.len() == indices.len() * value_size || values.len() == value_size);

        let broadcast = values.len() != indices.len() * value_size;
        for (i, &index) in indices.iter().enumerate() {
            let value = if broadcast { values } else { &values[i * value_size..(i + 1) * value_size] };
            self.read_mut(index, value_size).clone_from_slice(value);
        }
    }
}

impl<T> Storage for Vec<T> {
    type Value = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> StorageMut for Vec<T> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Storage for Box<[T]> {
    type Value = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> StorageMut for Box<[T]> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Storage for &[T] {
    type Value = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> Storage for &mut [T] {
    type Value = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> StorageMut for &mut [T] {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}
