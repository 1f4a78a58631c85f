//! # Triangular maps
//!
//! `TriangularMap` wraps a flat buffer and addresses it by span. It is the entry point of the
//! crate: coordinates are checked and translated by the `index` module, access patterns are
//! planned by the `slice` module, and the resulting positions are read from or written to the
//! storage.
//!
//! Row-wise access (`dslice`, `lslice`, `top`) borrows the buffer. Everything else copies.
use std::ops::{Index, IndexMut, Range};

use itertools::Itertools;
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use flatten::{Axis, Order};

use crate::error::{Error, Result};
use crate::index::{size_from_width, Triangle};
use crate::slice::{self, BlockSelection, Gather, Selection};
use crate::storage::{Storage, StorageMut};
use crate::values::Values;

mod flatten;

/// Configuration of a map that is fixed at construction.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// Read every distinct position of a block once and expand the result afterwards, instead of
    /// reading every cell of the block grid directly.
    ///
    /// Both ways produce the same values; this only changes how often each element is read.
    pub linearise_blocks: bool,
}

impl Options {
    /// Set `linearise_blocks`.
    pub fn with_linearise_blocks(mut self, linearise_blocks: bool) -> Self {
        self.linearise_blocks = linearise_blocks;
        self
    }
}

/// Values for all spans `(start, end)` with `0 <= start < end <= width`, stored in a flat buffer.
///
/// Each value (element) has the same shape, `value_shape`, and occupies `value_size` consecutive
/// scalars of the buffer; scalar maps have the empty value shape.
///
/// # Aliasing
///
/// Views (`dslice`, `lslice`, `top` and their `_mut` variants) borrow the map, so the borrow
/// checker keeps them from being written concurrently. The map does no synchronization of its own:
/// if the storage is shared in some other way, serializing writers is up to the caller.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TriangularMap<S> {
    storage: S,
    triangle: Triangle,
    value_shape: Vec<usize>,
    value_size: usize,
    options: Options,
}

impl<T> TriangularMap<Vec<T>> {
    /// Create a scalar map by computing the value of every span.
    ///
    /// # Arguments
    ///
    /// * `width`: Width of the map.
    /// * `f`: Called once per span, in buffer order.
    pub fn from_fn(width: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let triangle = Triangle::new(width);
        let data = triangle.spans().map(|(start, end)| f(start, end)).collect();

        Self::from_parts(data, triangle, Vec::new(), Options::default())
    }

    /// Create a scalar map with the same value for every span.
    pub fn filled(width: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_parts(vec![value; size_from_width(width)], Triangle::new(width), Vec::new(), Options::default())
    }
}

impl<T, S: Storage<Value=T>> TriangularMap<S> {
    /// Wrap a buffer of scalars.
    ///
    /// # Errors
    ///
    /// `InvalidSize` if the length of the buffer is not a triangular number.
    pub fn new(storage: S) -> Result<Self> {
        Self::with_options(storage, &[], Options::default())
    }

    /// Wrap a buffer of elements of a fixed shape.
    ///
    /// # Errors
    ///
    /// See `with_options`.
    pub fn with_value_shape(storage: S, value_shape: &[usize]) -> Result<Self> {
        Self::with_options(storage, value_shape, Options::default())
    }

    /// Wrap a buffer.
    ///
    /// # Arguments
    ///
    /// * `storage`: Element-major scalars.
    /// * `value_shape`: Shape of every element. It is authoritative: the buffer has to consist of
    ///   whole elements of this shape.
    /// * `options`: Fixed configuration.
    ///
    /// # Errors
    ///
    /// `InvalidValueShape` for a shape with a zero extent, `ValueShapeMismatch` if the buffer
    /// doesn't hold whole elements and `InvalidSize` if the number of elements is not a triangular
    /// number.
    pub fn with_options(storage: S, value_shape: &[usize], options: Options) -> Result<Self> {
        let value_size = value_shape.iter().product::<usize>();
        if value_size == 0 {
            return Err(Error::InvalidValueShape { shape: value_shape.to_vec() });
        }
        if storage.len() % value_size != 0 {
            return Err(Error::ValueShapeMismatch { len: storage.len(), shape: value_shape.to_vec() });
        }
        let triangle = Triangle::from_size(storage.len() / value_size)?;

        debug!(
            "wrapping {} values as triangular map of width {} with value shape {:?}",
            storage.len(), triangle.width(), value_shape,
        );
        Ok(Self::from_parts(storage, triangle, value_shape.to_vec(), options))
    }

    fn from_parts(storage: S, triangle: Triangle, value_shape: Vec<usize>, options: Options) -> Self {
        let value_size = value_shape.iter().product();
        debug_assert_eq!(storage.len(), triangle.size() * value_size);

        Self { storage, triangle, value_shape, value_size, options }
    }

    /// Give up the map, keeping what is needed to rebuild it with `with_options`.
    pub fn into_raw_parts(self) -> (S, Vec<usize>, Options) {
        (self.storage, self.value_shape, self.options)
    }

    /// Give up the map, keeping only the buffer.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The underlying buffer.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Coordinate system of this map.
    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Number of values in the bottom row.
    pub fn width(&self) -> usize {
        self.triangle.width()
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.triangle.size()
    }

    /// Shape of a single element.
    pub fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }

    /// Number of scalars in a single element.
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Configuration fixed at construction.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Checked position of a span in the linear buffer.
    pub fn linear_index(&self, start: usize, end: usize) -> Result<usize> {
        self.triangle.validate(start, end)?;

        Ok(self.triangle.linear_index(start, end))
    }

    /// The element of a span.
    ///
    /// # Errors
    ///
    /// `IndexRange` unless `0 <= start < end <= width`.
    pub fn get(&self, start: usize, end: usize) -> Result<&[T]> {
        let index = self.linear_index(start, end)?;

        Ok(self.storage.read(index, self.value_size))
    }

    /// Copy the elements of many spans.
    ///
    /// # Arguments
    ///
    /// * `starts`, `ends`: Parallel span coordinates; a slice of length one is repeated.
    ///
    /// # Return value
    ///
    /// Values of shape `[number of spans, value_shape..]`.
    ///
    /// # Errors
    ///
    /// `IndexRange` listing every invalid span, `ShapeMismatch` for slices that don't pair up.
    pub fn gather(&self, starts: &[usize], ends: &[usize]) -> Result<Values<T>>
    where
        T: Clone,
    {
        let gather = slice::spans(&self.triangle, starts, ends)?;

        Ok(self.copy_out(gather))
    }

    /// View of the row of spans of length `level`, ordered by start.
    ///
    /// # Errors
    ///
    /// `InvalidLevel` unless `1 <= level <= width`.
    pub fn lslice(&self, level: usize) -> Result<&[T]> {
        let range = slice::level_slice(&self.triangle, level)?;

        Ok(self.storage.view(range, self.value_size))
    }

    /// View of the row at `depth`, ordered by start.
    ///
    /// # Errors
    ///
    /// `InvalidDepth` unless `depth < width`.
    pub fn dslice(&self, depth: usize) -> Result<&[T]> {
        let range = slice::depth_slice(&self.triangle, depth)?;

        Ok(self.storage.view(range, self.value_size))
    }

    /// The whole map, borrowed.
    pub fn view(&self) -> TriangularMap<&[T]> {
        TriangularMap {
            storage: self.storage.as_slice(),
            triangle: self.triangle,
            value_shape: self.value_shape.clone(),
            value_size: self.value_size,
            options: self.options,
        }
    }

    /// The top rows of the map, borrowed.
    ///
    /// # Arguments
    ///
    /// * `depth`: Number of rows to keep, `None` for all of them. Keeping `d` rows results in a map
    ///   of width `d`.
    ///
    /// # Errors
    ///
    /// `InvalidDepth` if `depth` exceeds the width.
    pub fn top(&self, depth: Option<usize>) -> Result<TriangularMap<&[T]>> {
        let rows = depth.unwrap_or(self.width());
        let range = slice::top(&self.triangle, rows)?;

        Ok(TriangularMap {
            storage: self.storage.view(range, self.value_size),
            triangle: Triangle::new(rows),
            value_shape: self.value_shape.clone(),
            value_size: self.value_size,
            options: self.options,
        })
    }

    /// Copy the spans starting at `start`, ordered by increasing end.
    ///
    /// # Arguments
    ///
    /// * `start`: Shared start of the spans, below the width.
    /// * `selection`: Which of the ends to keep, for example `..`, `1..3` or a single position.
    ///
    /// # Errors
    ///
    /// `IndexRange` for an invalid start, `SelectionOutOfRange` for a selection that doesn't fit.
    pub fn sslice(&self, start: usize, selection: impl Into<Selection>) -> Result<Values<T>>
    where
        T: Clone,
    {
        let gather = slice::start_slice(&self.triangle, start, &selection.into())?;

        Ok(self.copy_out(gather))
    }

    /// Copy the spans ending at `end`, ordered by increasing start.
    ///
    /// # Errors
    ///
    /// `IndexRange` unless `1 <= end <= width`, `SelectionOutOfRange` for a selection that doesn't
    /// fit.
    pub fn eslice(&self, end: usize, selection: impl Into<Selection>) -> Result<Values<T>>
    where
        T: Clone,
    {
        let gather = slice::end_slice(&self.triangle, end, &selection.into())?;

        Ok(self.copy_out(gather))
    }

    /// Copy the block of start slices of length `level`.
    ///
    /// See `slice::start_block` for the layout of the block.
    ///
    /// # Errors
    ///
    /// `InvalidLevel` unless `1 <= level <= width`, `SelectionOutOfRange` for a selection that
    /// doesn't fit.
    pub fn sblock(&self, level: usize, selection: impl Into<BlockSelection>) -> Result<Values<T>>
    where
        T: Clone,
    {
        let gather = slice::start_block(&self.triangle, level, &selection.into())?;

        Ok(self.copy_block(gather))
    }

    /// Copy the block of end slices of length `level`.
    ///
    /// See `slice::end_block` for the layout of the block.
    ///
    /// # Errors
    ///
    /// As for `sblock`.
    pub fn eblock(&self, level: usize, selection: impl Into<BlockSelection>) -> Result<Values<T>>
    where
        T: Clone,
    {
        let gather = slice::end_block(&self.triangle, level, &selection.into())?;

        Ok(self.copy_block(gather))
    }

    /// Copy the sub-triangle below a span into a new map.
    ///
    /// # Errors
    ///
    /// `IndexRange` if `window` is not a valid span.
    pub fn submap(&self, window: Range<usize>) -> Result<TriangularMap<Vec<T>>>
    where
        T: Clone,
    {
        self.submap_step(window, 1)
    }

    /// Copy every `step`-th element of each row of the sub-triangle below a span into a new map.
    ///
    /// # Errors
    ///
    /// `IndexRange` if `window` is not a valid span, `SelectionOutOfRange` for a zero step and
    /// `InvalidSize` if the thinned out rows don't add up to a triangle.
    pub fn submap_step(&self, window: Range<usize>, step: usize) -> Result<TriangularMap<Vec<T>>>
    where
        T: Clone,
    {
        debug!("extracting window {:?} with step {} from map of width {}", window, step, self.width());
        let indices = slice::window(&self.triangle, window, step)?;

        let data = self.storage.gather(&indices, self.value_size);
        TriangularMap::with_options(data, &self.value_shape, self.options)
    }

    /// Copy the map into an owned buffer with the same configuration.
    pub fn copy(&self) -> TriangularMap<Vec<T>>
    where
        T: Clone,
    {
        TriangularMap {
            storage: self.storage.as_slice().to_vec(),
            triangle: self.triangle,
            value_shape: self.value_shape.clone(),
            value_size: self.value_size,
            options: self.options,
        }
    }

    /// All spans with their elements, in buffer order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item=((usize, usize), &'a [T])>
    where
        T: 'a,
    {
        self.triangle.spans().zip(self.storage.as_slice().chunks(self.value_size))
    }

    fn result_shape(&self, mut shape: Vec<usize>) -> Vec<usize> {
        shape.extend_from_slice(&self.value_shape);
        shape
    }

    fn copy_out(&self, gather: Gather) -> Values<T>
    where
        T: Clone,
    {
        let Gather { shape, indices } = gather;
        trace!("gathering {} elements into shape {:?}", indices.len(), shape);

        let data = self.storage.gather(&indices, self.value_size);
        Values::new(self.result_shape(shape), data)
    }

    fn copy_block(&self, gather: Gather) -> Values<T>
    where
        T: Clone,
    {
        if !self.options.linearise_blocks {
            return self.copy_out(gather);
        }
        let Gather { shape, indices } = gather;

        let distinct = indices.iter().copied().sorted_unstable().dedup().collect::<Vec<_>>();
        trace!("gathering {} distinct elements for a block of shape {:?}", distinct.len(), shape);
        let gathered = self.storage.gather(&distinct, self.value_size);

        let mut data = Vec::with_capacity(indices.len() * self.value_size);
        for index in &indices {
            let position = match distinct.binary_search(index) {
                Ok(position) => position,
                Err(_) => unreachable!("every index is among the distinct indices"),
            };
            data.extend_from_slice(&gathered[position * self.value_size..(position + 1) * self.value_size]);
        }

        Values::new(self.result_shape(shape), data)
    }
}

impl<T, S: StorageMut<Value=T>> TriangularMap<S> {
    /// The element of a span, mutably.
    ///
    /// # Errors
    ///
    /// `IndexRange` unless `0 <= start < end <= width`.
    pub fn get_mut(&mut self, start: usize, end: usize) -> Result<&mut [T]> {
        let index = self.linear_index(start, end)?;

        Ok(self.storage.read_mut(index, self.value_size))
    }

    /// Overwrite the element of a span.
    ///
    /// # Errors
    ///
    /// `IndexRange` for an invalid span and `ValueCountMismatch` if `value` is not one element.
    pub fn set(&mut self, start: usize, end: usize, value: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let index = self.linear_index(start, end)?;
        if value.len() != self.value_size {
            return Err(Error::ValueCountMismatch {
                expected: self.value_size,
                element: self.value_size,
                got: value.len(),
            });
        }

        self.storage.write(index, value);
        Ok(())
    }

    /// Overwrite the elements of many spans.
    ///
    /// # Arguments
    ///
    /// * `starts`, `ends`: Parallel span coordinates; a slice of length one is repeated.
    /// * `values`: One element per span, or a single element for all of them.
    ///
    /// # Errors
    ///
    /// `IndexRange` listing every invalid span, `ShapeMismatch` for slices that don't pair up and
    /// `ValueCountMismatch` for the wrong number of values. Nothing is written on error.
    pub fn scatter(&mut self, starts: &[usize], ends: &[usize], values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let gather = slice::spans(&self.triangle, starts, ends)?;

        self.write(gather, values)
    }

    /// Mutable view of the row of spans of length `level`.
    ///
    /// # Errors
    ///
    /// `InvalidLevel` unless `1 <= level <= width`.
    pub fn lslice_mut(&mut self, level: usize) -> Result<&mut [T]> {
        let range = slice::level_slice(&self.triangle, level)?;

        Ok(self.storage.view_mut(range, self.value_size))
    }

    /// Mutable view of the row at `depth`.
    ///
    /// # Errors
    ///
    /// `InvalidDepth` unless `depth < width`.
    pub fn dslice_mut(&mut self, depth: usize) -> Result<&mut [T]> {
        let range = slice::depth_slice(&self.triangle, depth)?;

        Ok(self.storage.view_mut(range, self.value_size))
    }

    /// The whole map, borrowed mutably.
    pub fn view_mut(&mut self) -> TriangularMap<&mut [T]> {
        TriangularMap {
            storage: self.storage.as_mut_slice(),
            triangle: self.triangle,
            value_shape: self.value_shape.clone(),
            value_size: self.value_size,
            options: self.options,
        }
    }

    /// The top rows of the map, borrowed mutably. Writes go to this map's buffer.
    ///
    /// # Errors
    ///
    /// `InvalidDepth` if `depth` exceeds the width.
    pub fn top_mut(&mut self, depth: Option<usize>) -> Result<TriangularMap<&mut [T]>> {
        let rows = depth.unwrap_or(self.width());
        let range = slice::top(&self.triangle, rows)?;

        Ok(TriangularMap {
            storage: self.storage.view_mut(range, self.value_size),
            triangle: Triangle::new(rows),
            value_shape: self.value_shape.clone(),
            value_size: self.value_size,
            options: self.options,
        })
    }

    /// Overwrite the spans starting at `start`; see `sslice`.
    ///
    /// # Errors
    ///
    /// As for `sslice`, and `ValueCountMismatch` for the wrong number of values.
    pub fn set_sslice(&mut self, start: usize, selection: impl Into<Selection>, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let gather = slice::start_slice(&self.triangle, start, &selection.into())?;

        self.write(gather, values)
    }

    /// Overwrite the spans ending at `end`; see `eslice`.
    ///
    /// # Errors
    ///
    /// As for `eslice`, and `ValueCountMismatch` for the wrong number of values.
    pub fn set_eslice(&mut self, end: usize, selection: impl Into<Selection>, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let gather = slice::end_slice(&self.triangle, end, &selection.into())?;

        self.write(gather, values)
    }

    /// Overwrite a block of start slices; see `sblock`.
    ///
    /// # Errors
    ///
    /// As for `sblock`, and `ValueCountMismatch` for the wrong number of values.
    pub fn set_sblock(&mut self, level: usize, selection: impl Into<BlockSelection>, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let gather = slice::start_block(&self.triangle, level, &selection.into())?;

        self.write(gather, values)
    }

    /// Overwrite a block of end slices; see `eblock`.
    ///
    /// # Errors
    ///
    /// As for `eblock`, and `ValueCountMismatch` for the wrong number of values.
    pub fn set_eblock(&mut self, level: usize, selection: impl Into<BlockSelection>, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let gather = slice::end_block(&self.triangle, level, &selection.into())?;

        self.write(gather, values)
    }

    fn write(&mut self, gather: Gather, values: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let expected = gather.len() * self.value_size;
        if values.len() != expected && values.len() != self.value_size {
            return Err(Error::ValueCountMismatch {
                expected,
                element: self.value_size,
                got: values.len(),
            });
        }

        self.storage.scatter(&gather.indices, values, self.value_size);
        Ok(())
    }
}

impl<T, S: Storage<Value=T>> Index<(usize, usize)> for TriangularMap<S> {
    type Output = [T];

    fn index(&self, (start, end): (usize, usize)) -> &[T] {
        match self.get(start, end) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T, S: StorageMut<Value=T>> IndexMut<(usize, usize)> for TriangularMap<S> {
    fn index_mut(&mut self, (start, end): (usize, usize)) -> &mut [T] {
        match self.get_mut(start, end) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}
