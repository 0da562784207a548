//! Row-major 2-D matrix used for label images, channels and affinity tables.

use std::ops::{Index, IndexMut};

use crate::{Error, Result};

/// Pixel coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
}

impl Pixel {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(Error::SizeMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Self::from_vec(n_rows, n_cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.rows, "row index out of bounds");
        let start = y * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, y: usize, x: usize) -> Option<&T> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        self.data.get(y * self.cols + x)
    }

    pub fn get_mut(&mut self, y: usize, x: usize) -> Option<&mut T> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        self.data.get_mut(y * self.cols + x)
    }

    pub fn same_size<U>(&self, other: &Matrix<U>) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Matrix<T> {
    pub fn new_fill(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T: Ord + Copy> Matrix<T> {
    /// Largest element, `None` for an empty matrix.
    pub fn max_value(&self) -> Option<T> {
        self.data.iter().copied().max()
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    /// Index by `(row, col)`.
    fn index(&self, (y, x): (usize, usize)) -> &T {
        assert!(x < self.cols && y < self.rows, "matrix index out of bounds");
        &self.data[y * self.cols + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (y, x): (usize, usize)) -> &mut T {
        assert!(x < self.cols && y < self.rows, "matrix index out of bounds");
        &mut self.data[y * self.cols + x]
    }
}

impl<T> Index<Pixel> for Matrix<T> {
    type Output = T;

    fn index(&self, p: Pixel) -> &T {
        &self[(p.y, p.x)]
    }
}

impl<T> IndexMut<Pixel> for Matrix<T> {
    fn index_mut(&mut self, p: Pixel) -> &mut T {
        &mut self[(p.y, p.x)]
    }
}
