//! Random square boolean matrices for tests and benchmarks

use pairg_common::{Error, Result};
use rand::seq::index::sample;
use rand::Rng;

use super::csr::BoolCsr;

impl BoolCsr {
    /// Random n×n matrix with between `min_nnz` and `max_nnz` distinct
    /// entries per row.
    ///
    /// Rows are left in sampling order unless `sort_rows` is set, which is
    /// how unindexed loader output looks.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        n: usize,
        min_nnz: usize,
        max_nnz: usize,
        sort_rows: bool,
    ) -> Result<Self> {
        if min_nnz > max_nnz {
            return Err(Error::InvalidInput(format!(
                "min nnz per row ({min_nnz}) exceeds max ({max_nnz})"
            )));
        }
        if max_nnz > n {
            return Err(Error::InvalidInput(format!(
                "max nnz per row ({max_nnz}) exceeds dimension ({n})"
            )));
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut columns = Vec::new();
        offsets.push(0u64);

        for _ in 0..n {
            let row_len = rng.random_range(min_nnz..=max_nnz);
            let start = columns.len();
            columns.extend(sample(rng, n, row_len).iter().map(|c| c as u32));
            if sort_rows {
                columns[start..].sort_unstable();
            }
            offsets.push(columns.len() as u64);
        }

        BoolCsr::from_parts(n, n, offsets, columns)
    }
}
