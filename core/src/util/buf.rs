//! Two-dimensional buffers.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};
use core::iter::repeat;
use core::ops::{Index, IndexMut};

/// A rectangular 2D buffer that owns its elements, backed by a `Vec`.
///
/// `Buf2` stores its elements contiguously, in row-major order, such that
/// element (x, y) maps to the element at index
/// ```text
/// buf.width() * y + x
/// ```
/// in the backing vector. Used for framebuffers, textures, and colormaps.
///
/// # Examples
/// ```
/// # use facet_core::util::buf::Buf2;
/// // Elements initialized with `Default::default()`
/// let mut buf = Buf2::new_default(4, 4);
/// // Indexing with [x, y] yields the element at row y, column x:
/// buf[[2, 1]] = 123;
/// // Indexing with a usize i yields the row i as a slice:
/// assert_eq!(&buf[1], &[0, 0, 123, 0]);
/// assert_eq!(buf[1][2], 123)
/// ```
#[derive(Clone, PartialEq)]
pub struct Buf2<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
}

impl<T> Buf2<T> {
    /// Returns a buffer with size `w` × `h`, with elements initialized
    /// with values from `init` in row-major order.
    ///
    /// # Panics
    /// If there are fewer than `w * h` elements in `init`.
    pub fn new<I>(w: usize, h: usize, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let data: Vec<_> = init.into_iter().take(w * h).collect();
        assert_eq!(data.len(), w * h, "too few elements for {w}×{h} buffer");
        Self { w, h, data }
    }

    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `T::default()`.
    pub fn new_default(w: usize, h: usize) -> Self
    where
        T: Clone + Default,
    {
        Self::new(w, h, repeat(T::default()))
    }

    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `init_fn(x, y)` where x is the column index
    /// and y the row index of the element being initialized.
    pub fn new_with<F>(w: usize, h: usize, mut init_fn: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(init_fn(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Returns the backing data of `self` as a linear slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns the backing data of `self` as a linear mutable slice.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns a reference to the element at (x, y), or `None` if the
    /// position is out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.to_index_checked(x, y).map(|i| &self.data[i])
    }
    /// Returns a mutable reference to the element at (x, y), or `None`
    /// if the position is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.to_index_checked(x, y).map(|i| &mut self.data[i])
    }

    /// Returns an iterator over the rows of `self`.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks panics on zero size
        self.data.chunks(self.w.max(1))
    }
    /// Returns an iterator over the rows of `self` as mutable slices.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.data.chunks_mut(self.w.max(1))
    }

    /// Fills the buffer with clones of `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }

    #[inline]
    fn to_index_checked(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.w && y < self.h).then(|| y * self.w + x)
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn position_out_of_bounds(&self, x: usize, y: usize) -> ! {
        panic!(
            "position (x={x}, y={y}) out of bounds (0..{}, 0..{})",
            self.w, self.h
        )
    }
}

impl<T> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf2")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl<T> Index<usize> for Buf2<T> {
    type Output = [T];

    /// Returns a reference to the row of `self` at index `i`.
    #[inline]
    fn index(&self, i: usize) -> &[T] {
        &self.data[i * self.w..][..self.w]
    }
}

impl<T> IndexMut<usize> for Buf2<T> {
    /// Returns a mutable reference to the row of `self` at index `i`.
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut [T] {
        let w = self.w;
        &mut self.data[i * w..][..w]
    }
}

impl<T> Index<[usize; 2]> for Buf2<T> {
    type Output = T;

    /// Returns a reference to the element at position [x, y].
    ///
    /// # Panics
    /// If the position is out of bounds of `self`.
    #[inline]
    fn index(&self, [x, y]: [usize; 2]) -> &T {
        if x >= self.w || y >= self.h {
            self.position_out_of_bounds(x, y);
        }
        &self.data[y * self.w + x]
    }
}

impl<T> IndexMut<[usize; 2]> for Buf2<T> {
    /// Returns a mutable reference to the element at position [x, y].
    ///
    /// # Panics
    /// If the position is out of bounds of `self`.
    #[inline]
    fn index_mut(&mut self, [x, y]: [usize; 2]) -> &mut T {
        if x >= self.w || y >= self.h {
            self.position_out_of_bounds(x, y);
        }
        &mut self.data[y * self.w + x]
    }
}
