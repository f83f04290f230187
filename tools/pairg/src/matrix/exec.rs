//! Row-parallel execution on a dedicated worker pool
//!
//! Every sparse kernel here follows the same shape: independent per-row
//! work, optionally a barrier (exclusive scan over row sizes), then more
//! independent per-row work writing disjoint slices of the output.

use pairg_common::{Error, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Engine configuration passed in at construction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecConfig {
    /// Worker threads; 0 selects the number of logical CPUs
    pub threads: usize,
}

/// Shared flag to abandon a long-running build
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Worker pool plus the row-partitioned operations the kernels need
pub struct RowExecutor {
    pool: rayon::ThreadPool,
    threads: usize,
    cancel: CancelFlag,
}

impl RowExecutor {
    pub fn new(config: &ExecConfig) -> Result<Self> {
        let threads = if config.threads == 0 {
            num_cpus::get()
        } else {
            config.threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pairg-worker-{i}"))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        Ok(Self {
            pool,
            threads,
            cancel: CancelFlag::new(),
        })
    }

    pub fn with_threads(threads: usize) -> Result<Self> {
        Self::new(&ExecConfig { threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Handle that can cancel work running on this executor
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run arbitrary parallel work on the pool
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(f)
    }

    /// Per-row work returning one value per row, with per-worker scratch
    /// state created by `init`.
    pub fn map_rows<T, S, I, F>(&self, n_rows: usize, init: I, f: F) -> Vec<T>
    where
        T: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, usize) -> T + Sync + Send,
    {
        self.pool
            .install(|| (0..n_rows).into_par_iter().map_init(init, f).collect())
    }

    /// Per-row work over disjoint mutable row slices of `columns`.
    pub fn for_each_row_mut<S, I, F>(&self, offsets: &[u64], columns: &mut [u32], init: I, f: F)
    where
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, usize, &mut [u32]) + Sync + Send,
    {
        let rows = split_rows(columns, offsets);
        self.pool.install(|| {
            rows.into_par_iter()
                .enumerate()
                .for_each_init(init, |state, (i, row)| f(state, i, row))
        });
    }
}

/// Exclusive prefix sum over row sizes: the offsets array of the output.
///
/// This is the barrier between the symbolic and numeric phases.
pub fn exclusive_scan(counts: &[usize]) -> Vec<u64> {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    let mut total = 0u64;
    offsets.push(total);
    for &c in counts {
        total += c as u64;
        offsets.push(total);
    }
    offsets
}

/// Cut `columns` into one mutable slice per row
fn split_rows<'a>(mut columns: &'a mut [u32], offsets: &[u64]) -> Vec<&'a mut [u32]> {
    let mut rows = Vec::with_capacity(offsets.len().saturating_sub(1));
    for w in offsets.windows(2) {
        let len = (w[1] - w[0]) as usize;
        let (head, tail) = std::mem::take(&mut columns).split_at_mut(len);
        rows.push(head);
        columns = tail;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        assert_eq!(exclusive_scan(&[]), vec![0]);
        assert_eq!(exclusive_scan(&[2, 0, 3, 1]), vec![0, 2, 2, 5, 6]);
    }

    #[test]
    fn test_map_rows_preserves_order() {
        let exec = RowExecutor::with_threads(3).unwrap();
        let squares = exec.map_rows(100, || (), |_, i| i * i);
        assert_eq!(squares.len(), 100);
        assert!(squares.iter().enumerate().all(|(i, &v)| v == i * i));
    }

    #[test]
    fn test_for_each_row_mut_writes_disjoint_rows() {
        let exec = RowExecutor::with_threads(2).unwrap();
        let offsets = exclusive_scan(&[1, 0, 3, 2]);
        let mut columns = vec![0u32; 6];
        exec.for_each_row_mut(&offsets, &mut columns, || (), |_, i, row| {
            row.fill(i as u32);
        });
        assert_eq!(columns, vec![0, 2, 2, 2, 3, 3]);
    }

    #[test]
    fn test_cancel_flag() {
        let exec = RowExecutor::with_threads(1).unwrap();
        assert!(exec.check_cancelled().is_ok());
        exec.cancel_flag().cancel();
        assert!(matches!(exec.check_cancelled(), Err(Error::Cancelled)));
    }

    #[test]
    fn test_zero_threads_uses_all_cpus() {
        let exec = RowExecutor::new(&ExecConfig::default()).unwrap();
        assert_eq!(exec.threads(), num_cpus::get());
    }
}
