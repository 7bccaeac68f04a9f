//! Dense integer matrices with Kronecker composition.
//!
//! Elements live in a single row-major buffer: entry (r, c) is at
//! `r * cols + c`. This is enough for the generator matrix (over {0, 1})
//! and the decoder's transform series (over {-1, 0, 1}).
//!
//! # Example
//! ```
//! use rm_sim_core::matrix::Matrix;
//!
//! let h = Matrix::from_rows(&[vec![1, 1], vec![1, -1]]).unwrap();
//! let i2 = Matrix::<i32>::identity(2);
//! let h2 = i2.kronecker(&h);
//! assert_eq!((h2.rows(), h2.cols()), (4, 4));
//! assert_eq!(h2.vec_mul(&[1, 1, 1, 1]), vec![2, 0, 2, 0]);
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::ops::{Add, Mul};

/// Scalar types a `Matrix` can hold.
pub trait Element:
    Copy + PartialEq + fmt::Debug + fmt::Display + Add<Output = Self> + Mul<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
}

macro_rules! impl_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
            }
        )*
    };
}

impl_element!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::ZERO; rows * cols],
        }
    }

    /// n × n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.set(i, i, T::ONE);
        }
        matrix
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    /// Returns `Error::InvalidWordLength` if the rows are not all the same
    /// length as the first one.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for row in rows {
            if row.len() != cols {
                return Err(Error::InvalidWordLength {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at (row, col).
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[row * self.cols + col] = value;
    }

    /// Borrow one row as a slice.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Kronecker product `self ⊗ other`.
    ///
    /// For `self` of shape r1 × c1 and `other` of shape r2 × c2 the result is
    /// (r1·r2) × (c1·c2), with block (i, j) equal to `self[i][j] · other`:
    /// entry `(i·r2 + k, j·c2 + l) = self[i][j] · other[k][l]`.
    pub fn kronecker(&self, other: &Matrix<T>) -> Matrix<T> {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut result = Matrix::zeros(rows, cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                let a = self.get(i, j);
                if a == T::ZERO {
                    continue;
                }
                for k in 0..other.rows {
                    let dst = (i * other.rows + k) * cols + j * other.cols;
                    let src = other.row(k);
                    for (l, &b) in src.iter().enumerate() {
                        result.data[dst + l] = a * b;
                    }
                }
            }
        }

        result
    }

    /// Row vector times matrix: `result[i] = Σ_j vector[j] · self[j][i]`.
    ///
    /// # Panics
    /// Panics if `vector.len() != self.rows()`.
    pub fn vec_mul(&self, vector: &[T]) -> Vec<T> {
        assert_eq!(vector.len(), self.rows, "vector length must equal row count");

        let mut result = vec![T::ZERO; self.cols];
        for (j, &v) in vector.iter().enumerate() {
            if v == T::ZERO {
                continue;
            }
            for (acc, &m) in result.iter_mut().zip(self.row(j)) {
                *acc = *acc + v * m;
            }
        }
        result
    }
}

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let line: Vec<String> = self.row(r).iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join("  "))?;
        }
        Ok(())
    }
}
