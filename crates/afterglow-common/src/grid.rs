//! Dense row-major grids indexed by angular and radial cell indices.

use crate::error::{AfterglowError, AfterglowResult};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// 2D grid indexed `[(theta, r)]`; each radial row is contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGrid<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Clone> MeshGrid<T> {
    /// Grid of shape `(rows, cols)` filled with `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> MeshGrid<T> {
    /// Assemble a grid from per-row vectors of equal length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> AfterglowResult<Self> {
        let n_rows = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * cols);
        for row in rows {
            if row.len() != cols {
                return Err(AfterglowError::ShapeMismatch {
                    expected: vec![n_rows, cols],
                    actual: vec![n_rows, row.len()],
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            rows: n_rows,
            cols,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, j: usize) -> &[T] {
        &self.data[j * self.cols..(j + 1) * self.cols]
    }

    pub fn row_mut(&mut self, j: usize) -> &mut [T] {
        &mut self.data[j * self.cols..(j + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }
}

impl<T> Index<(usize, usize)> for MeshGrid<T> {
    type Output = T;

    fn index(&self, (j, k): (usize, usize)) -> &T {
        debug_assert!(j < self.rows && k < self.cols);
        &self.data[j * self.cols + k]
    }
}

impl<T> IndexMut<(usize, usize)> for MeshGrid<T> {
    fn index_mut(&mut self, (j, k): (usize, usize)) -> &mut T {
        debug_assert!(j < self.rows && k < self.cols);
        &mut self.data[j * self.cols + k]
    }
}

/// 3D grid indexed `[(phi, theta, r)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGrid3<T> {
    data: Vec<T>,
    shape: (usize, usize, usize),
}

impl<T: Clone> MeshGrid3<T> {
    pub fn filled(shape: (usize, usize, usize), value: T) -> Self {
        Self {
            data: vec![value; shape.0 * shape.1 * shape.2],
            shape,
        }
    }
}

impl<T> MeshGrid3<T> {
    pub fn shape(&self) -> (usize, usize, usize) {
        self.shape
    }

    /// Radial row at `(phi, theta)`.
    pub fn row(&self, i: usize, j: usize) -> &[T] {
        let start = self.offset(i, j, 0);
        &self.data[start..start + self.shape.2]
    }

    pub fn row_mut(&mut self, i: usize, j: usize) -> &mut [T] {
        let start = self.offset(i, j, 0);
        let len = self.shape.2;
        &mut self.data[start..start + len]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.shape.0 && j < self.shape.1 && k < self.shape.2);
        (i * self.shape.1 + j) * self.shape.2 + k
    }
}

impl<T> Index<(usize, usize, usize)> for MeshGrid3<T> {
    type Output = T;

    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        &self.data[self.offset(i, j, k)]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for MeshGrid3<T> {
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        let offset = self.offset(i, j, k);
        &mut self.data[offset]
    }
}

macro_rules! impl_reductions {
    ($grid:ident) => {
        impl<T: Float> $grid<T> {
            /// Smallest finite-or-infinite value, ignoring NaN.
            pub fn min(&self) -> T {
                self.data.iter().fold(T::infinity(), |acc, &v| acc.min(v))
            }

            /// Largest value, ignoring NaN.
            pub fn max(&self) -> T {
                self.data.iter().fold(T::neg_infinity(), |acc, &v| acc.max(v))
            }
        }
    };
}

impl_reductions!(MeshGrid);
impl_reductions!(MeshGrid3);

pub fn create_array<T: Clone>(len: usize, value: T) -> Vec<T> {
    vec![value; len]
}

pub fn create_array_like<T: Clone, U>(like: &[U], value: T) -> Vec<T> {
    vec![value; like.len()]
}

pub fn create_grid<T: Clone>(theta_size: usize, r_size: usize, value: T) -> MeshGrid<T> {
    MeshGrid::filled(theta_size, r_size, value)
}

pub fn create_grid_like<T: Clone, U>(like: &MeshGrid<U>, value: T) -> MeshGrid<T> {
    let (rows, cols) = like.shape();
    MeshGrid::filled(rows, cols, value)
}

pub fn create_3d_grid<T: Clone>(
    phi_size: usize,
    theta_size: usize,
    r_size: usize,
    value: T,
) -> MeshGrid3<T> {
    MeshGrid3::filled((phi_size, theta_size, r_size), value)
}

pub fn create_3d_grid_like<T: Clone, U>(like: &MeshGrid3<U>, value: T) -> MeshGrid3<T> {
    MeshGrid3::filled(like.shape(), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut grid = create_grid(2, 3, 0.0);
        grid[(1, 2)] = 5.0;
        assert_eq!(grid.row(1), &[0.0, 0.0, 5.0]);
        assert_eq!(grid.as_slice()[5], 5.0);
    }

    #[test]
    fn test_like_helpers_copy_shape() {
        let grid = create_grid(4, 7, 2.5);
        let flags = create_grid_like(&grid, true);
        assert_eq!(flags.shape(), (4, 7));
        assert!(flags.as_slice().iter().all(|&f| f));
        let row = create_array(5, -1.0);
        assert_eq!(create_array_like(&row, 0u8), vec![0u8; 5]);
    }

    #[test]
    fn test_from_rows_shape_mismatch() {
        let err = MeshGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(err, Err(AfterglowError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_min_max() {
        let grid = MeshGrid::from_rows(vec![vec![1.0, -2.0], vec![7.5, 0.0]]).unwrap();
        assert_eq!(grid.min(), -2.0);
        assert_eq!(grid.max(), 7.5);
    }

    #[test]
    fn test_3d_like() {
        let mut base = create_3d_grid(2, 3, 4, 1.0f64);
        base[(1, 2, 3)] = 9.0;
        assert_eq!(base.row(1, 2)[3], 9.0);
        let like: MeshGrid3<bool> = create_3d_grid_like(&base, false);
        assert_eq!(like.shape(), (2, 3, 4));
        assert_eq!(base.max(), 9.0);
        assert_eq!(base.min(), 1.0);
    }
}
