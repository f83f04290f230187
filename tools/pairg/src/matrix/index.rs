//! Sorted-row query structure
//!
//! `index` is the one-way transition from a plain `BoolCsr` to an
//! `IndexedCsr`; only the indexed form answers point queries.

use pairg_common::{Error, Result};
use tracing::warn;

use super::csr::BoolCsr;
use super::exec::{exclusive_scan, RowExecutor};

/// Matrix whose rows are sorted ascending and duplicate-free
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedCsr {
    inner: BoolCsr,
}

/// Sort every row in parallel, then drop duplicates if any row has them.
///
/// Algebra outputs are already sorted, so for them this is one cheap pass.
pub fn index(exec: &RowExecutor, mut matrix: BoolCsr) -> IndexedCsr {
    {
        let (offsets, columns) = matrix.parts_mut();
        exec.for_each_row_mut(offsets, columns, || (), |_, _, row| row.sort_unstable());
    }

    let distinct = exec.map_rows(
        matrix.n_rows(),
        || (),
        |_, i| {
            let row = matrix.row(i);
            row.len() - row.windows(2).filter(|w| w[0] == w[1]).count()
        },
    );

    if distinct.iter().sum::<usize>() as u64 == matrix.nnz() {
        return IndexedCsr { inner: matrix };
    }

    let offsets = exclusive_scan(&distinct);
    let mut columns = vec![0u32; offsets[matrix.n_rows()] as usize];
    exec.for_each_row_mut(&offsets, &mut columns, || (), |_, i, out| {
        let mut row = matrix.row(i).to_vec();
        row.dedup();
        out.copy_from_slice(&row);
    });

    IndexedCsr {
        inner: BoolCsr::from_parts_unchecked(matrix.n_rows(), matrix.n_cols(), offsets, columns),
    }
}

impl IndexedCsr {
    /// Point query; out-of-range coordinates are logged and answer `false`.
    pub fn query(&self, i: usize, j: usize) -> bool {
        match self.try_query(i, j) {
            Ok(found) => found,
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    /// Point query reporting out-of-range coordinates as an error
    pub fn try_query(&self, i: usize, j: usize) -> Result<bool> {
        if i >= self.inner.n_rows() || j >= self.inner.n_cols() {
            return Err(Error::OutOfRangeQuery {
                row: i,
                col: j,
                n_rows: self.inner.n_rows(),
                n_cols: self.inner.n_cols(),
            });
        }
        Ok(self.inner.row(i).binary_search(&(j as u32)).is_ok())
    }

    pub fn matrix(&self) -> &BoolCsr {
        &self.inner
    }

    pub fn into_inner(self) -> BoolCsr {
        self.inner
    }

    pub fn n_rows(&self) -> usize {
        self.inner.n_rows()
    }

    pub fn n_cols(&self) -> usize {
        self.inner.n_cols()
    }

    pub fn nnz(&self) -> u64 {
        self.inner.nnz()
    }
}
