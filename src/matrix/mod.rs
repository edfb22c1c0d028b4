//! Matrix engine: Vandermonde/Cauchy/systematic-RS generation, submatrix
//! extraction, GF(256) Gaussian inversion, and the matrix-vector multiply
//! that both pipelines' hot paths reduce to.

pub mod cache;

pub use cache::{MatrixCache, MatrixKind, DEFAULT_MATRIX_CACHE};

use crate::error::FieldError;
use crate::gf;

/// A dense matrix of GF(256) elements, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<gf::GfElement>,
}

impl Matrix {
    pub fn zero(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Matrix {
        let mut m = Matrix::zero(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Build a matrix from row-major data. Panics if `data.len() != rows *
    /// cols`; this is a programmer-facing constructor, not part of the
    /// validated public pipeline surface.
    pub fn from_rows(rows: usize, cols: usize, data: Vec<gf::GfElement>) -> Matrix {
        assert_eq!(data.len(), rows * cols, "matrix data length mismatch");
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> gf::GfElement {
        self.data[r * self.cols + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: gf::GfElement) {
        self.data[r * self.cols + c] = v;
    }

    pub fn row(&self, r: usize) -> &[gf::GfElement] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// A raw Vandermonde matrix: `n` rows, `k` columns, row `i` being
    /// `[alpha_i^0, .., alpha_i^{k-1}]` with `alpha_i = exp(i)` (a distinct
    /// non-zero power of the primitive element for every row, so any square
    /// submatrix drawn from distinct rows is invertible as long as `n <=
    /// 256`).
    pub fn vandermonde(k: usize, n: usize) -> Matrix {
        let mut m = Matrix::zero(n, k);
        for i in 0..n {
            let alpha = gf::pow(2, i as u32);
            for j in 0..k {
                m.set(i, j, gf::pow(alpha, j as u32));
            }
        }
        m
    }

    /// The systematic Reed-Solomon encoding matrix: `data_shards + parity_shards`
    /// rows by `data_shards` columns, identity on the top `data_shards` rows
    /// (so data shards pass through unchanged) and, for parity row `i`,
    /// column `j`, the value `exp(data_shards + i)^j`.
    pub fn systematic_rs(data_shards: usize, parity_shards: usize) -> Matrix {
        let total = data_shards + parity_shards;
        let mut m = Matrix::zero(total, data_shards);
        for i in 0..data_shards {
            m.set(i, i, 1);
        }
        for i in 0..parity_shards {
            let alpha = gf::pow(2, (data_shards + i) as u32);
            for j in 0..data_shards {
                m.set(data_shards + i, j, gf::pow(alpha, j as u32));
            }
        }
        m
    }

    /// A Cauchy matrix: `C[i][j] = inv(x_i XOR y_j)` for disjoint evaluation
    /// sets `x` (size `n`) and `y` (size `k`). Requires `k + n <= 256`
    /// because `x` and `y` are drawn from disjoint prefixes of `[0, 256)`.
    pub fn cauchy(k: usize, n: usize) -> Result<Matrix, FieldError> {
        if k + n > 256 {
            return Err(FieldError::DimensionMismatch);
        }
        let xs: Vec<gf::GfElement> = (0..n as u32).map(|v| v as gf::GfElement).collect();
        let ys: Vec<gf::GfElement> = (n as u32..(n + k) as u32).map(|v| v as gf::GfElement).collect();

        let mut m = Matrix::zero(n, k);
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                let denom = gf::add(x, y);
                m.set(i, j, gf::inv(denom)?);
            }
        }
        Ok(m)
    }

    /// Extract the rows at `indices` (in the given order) as a new matrix.
    /// Rows are cloned; the source matrix is untouched.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut out = Matrix::zero(indices.len(), self.cols);
        for (new_r, &old_r) in indices.iter().enumerate() {
            out.data[new_r * self.cols..(new_r + 1) * self.cols]
                .copy_from_slice(self.row(old_r));
        }
        out
    }

    /// Multiply two matrices over GF(256).
    pub fn mul(&self, other: &Matrix) -> Result<Matrix, FieldError> {
        if self.cols != other.rows {
            return Err(FieldError::DimensionMismatch);
        }
        let mut out = Matrix::zero(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a == 0 {
                    continue;
                }
                for j in 0..other.cols {
                    let prod = gf::mul(a, other.get(k, j));
                    let cur = out.get(i, j);
                    out.set(i, j, gf::add(cur, prod));
                }
            }
        }
        Ok(out)
    }

    /// Invert a square matrix via Gauss-Jordan elimination over GF(256).
    ///
    /// Builds the augmented `[M | I]`, reduces column by column (pivot
    /// search, row swap, row scale, eliminate every other row), and returns
    /// the right half. Fails with [`FieldError::SingularMatrix`] if any
    /// column has no nonzero pivot at or below the diagonal.
    pub fn invert(&self) -> Result<Matrix, FieldError> {
        if self.rows != self.cols {
            return Err(FieldError::DimensionMismatch);
        }
        let n = self.rows;
        // augmented[r] is a row of length 2n: [M row | I row]
        let mut aug: Vec<Vec<gf::GfElement>> = (0..n)
            .map(|r| {
                let mut row = vec![0u8; 2 * n];
                row[0..n].copy_from_slice(self.row(r));
                row[n + r] = 1;
                row
            })
            .collect();

        for col in 0..n {
            let pivot = (col..n).find(|&r| aug[r][col] != 0);
            let pivot = match pivot {
                Some(p) => p,
                None => return Err(FieldError::SingularMatrix),
            };
            aug.swap(col, pivot);

            let inv_pivot = gf::inv(aug[col][col])?;
            for v in aug[col].iter_mut() {
                *v = gf::mul(*v, inv_pivot);
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug[r][col];
                if factor == 0 {
                    continue;
                }
                for c in 0..2 * n {
                    let sub = gf::mul(factor, aug[col][c]);
                    aug[r][c] = gf::sub(aug[r][c], sub);
                }
            }
        }

        let mut out = Matrix::zero(n, n);
        for r in 0..n {
            out.data[r * n..(r + 1) * n].copy_from_slice(&aug[r][n..2 * n]);
        }
        Ok(out)
    }
}

/// Apply `matrix` (shape `out_rows x in_rows`) to byte-parallel "vectors":
/// `inputs[j]` is a shard of `shard_size` bytes playing the role of
/// coefficient `j` in every independent per-byte linear combination, and
/// `outputs[i]` receives `sum_j matrix[i][j] * inputs[j]` computed
/// byte-by-byte. This is the shared hot path behind RS parity generation
/// and RS general-path reconstruction.
///
/// When the `parallel` feature is enabled and the workload is large enough,
/// output rows are computed concurrently via `rayon`; both code paths are
/// required to produce identical output, so callers observe the same
/// deterministic result regardless of dispatch.
pub fn code_bytes(matrix: &Matrix, inputs: &[&[u8]], outputs: &mut [Vec<u8>]) {
    assert_eq!(matrix.cols(), inputs.len());
    assert_eq!(matrix.rows(), outputs.len());
    let shard_size = inputs.first().map(|s| s.len()).unwrap_or(0);

    #[cfg(feature = "parallel")]
    {
        const PARALLEL_THRESHOLD: usize = 1 << 16;
        if matrix.rows() * shard_size >= PARALLEL_THRESHOLD {
            use rayon::prelude::*;
            outputs
                .par_iter_mut()
                .enumerate()
                .for_each(|(row, out)| code_one_row(matrix, inputs, row, out, shard_size));
            return;
        }
    }

    for (row, out) in outputs.iter_mut().enumerate() {
        code_one_row(matrix, inputs, row, out, shard_size);
    }
}

fn code_one_row(matrix: &Matrix, inputs: &[&[u8]], row: usize, out: &mut Vec<u8>, shard_size: usize) {
    out.clear();
    out.resize(shard_size, 0);
    for (j, input) in inputs.iter().enumerate() {
        let coeff = matrix.get(row, j);
        if coeff == 0 {
            continue;
        }
        for (b, &byte) in input.iter().enumerate() {
            out[b] = gf::add(out[b], gf::mul(coeff, byte));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_multiply_is_noop() {
        let id = Matrix::identity(4);
        let v = Matrix::vandermonde(4, 6);
        assert_eq!(v, id.mul(&v).unwrap());
    }

    #[test]
    fn invert_identity_is_identity() {
        let id = Matrix::identity(5);
        assert_eq!(id, id.invert().unwrap());
    }

    #[test]
    fn invert_then_multiply_is_identity() {
        for n in 2..=8 {
            let v = Matrix::vandermonde(n, n);
            let inv = v.invert().unwrap();
            assert_eq!(Matrix::identity(n), v.mul(&inv).unwrap());
        }
    }

    #[test]
    fn singular_matrix_is_rejected() {
        // Two identical rows make this singular.
        let m = Matrix::from_rows(2, 2, vec![1, 2, 1, 2]);
        assert_eq!(Err(FieldError::SingularMatrix), m.invert());
    }

    #[test]
    fn vandermonde_submatrices_are_invertible_up_to_eight() {
        for n in 2..=8usize {
            for k in 1..=n {
                let v = Matrix::vandermonde(k, n);
                // every k-subset of rows must be invertible
                for subset in combinations(n, k) {
                    let sub = v.select_rows(&subset);
                    assert!(sub.invert().is_ok(), "n={n} k={k} subset={subset:?}");
                }
            }
        }
    }

    #[test]
    fn cauchy_requires_disjoint_budget() {
        assert!(Matrix::cauchy(200, 100).is_err());
        assert!(Matrix::cauchy(10, 10).is_ok());
    }

    #[test]
    fn code_bytes_matches_naive_reference() {
        let matrix = Matrix::vandermonde(3, 5);
        let inputs: Vec<Vec<u8>> = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10, 11, 12]];
        let input_refs: Vec<&[u8]> = inputs.iter().map(|v| v.as_slice()).collect();
        let mut outputs = vec![Vec::new(); matrix.rows()];
        code_bytes(&matrix, &input_refs, &mut outputs);

        for row in 0..matrix.rows() {
            for b in 0..4 {
                let expected = (0..matrix.cols())
                    .fold(0u8, |acc, j| gf::add(acc, gf::mul(matrix.get(row, j), inputs[j][b])));
                assert_eq!(expected, outputs[row][b]);
            }
        }
    }

    fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
        let mut result = Vec::new();
        let mut current = Vec::new();
        fn rec(n: usize, k: usize, start: usize, current: &mut Vec<usize>, result: &mut Vec<Vec<usize>>) {
            if current.len() == k {
                result.push(current.clone());
                return;
            }
            for i in start..n {
                current.push(i);
                rec(n, k, i + 1, current, result);
                current.pop();
            }
        }
        rec(n, k, 0, &mut current, &mut result);
        result
    }
}
