//! Distance-constrained validity matrix
//!
//! A walk of length in `[d_low, d_up]` is a walk of exactly `d_low` edges
//! followed by a walk of at most `d_up - d_low` edges. With `B = A + I`
//! (a self-loop lets a walk "stay"), the product `A^d_low · B^(d_up-d_low)`
//! holds every valid pair, and one product replaces two bound checks.

use pairg_common::{Error, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::matrix::{add, index, multiply, power, BoolCsr, IndexedCsr, RowExecutor};

/// Timings and sizes of one build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub n_vertices: usize,
    pub d_low: u32,
    pub d_up: u32,
    pub add_identity_time_ms: u64,
    pub power_adjacency_time_ms: u64,
    pub power_stay_time_ms: u64,
    pub multiply_time_ms: u64,
    pub index_time_ms: u64,
    pub total_time_ms: u64,
    /// nnz of `A + I`
    pub stay_nnz: u64,
    /// nnz of `A^d_low`
    pub exact_nnz: u64,
    /// nnz of `(A + I)^(d_up - d_low)`
    pub within_nnz: u64,
    pub validity_nnz: u64,
}

/// Indexed validity matrix plus the stats of the build that produced it
#[derive(Debug, Clone)]
pub struct ValidityIndex {
    matrix: IndexedCsr,
    stats: BuildStats,
}

impl ValidityIndex {
    /// Does a walk of length in `[d_low, d_up]` lead from `i` to `j`?
    pub fn query(&self, i: usize, j: usize) -> bool {
        self.matrix.query(i, j)
    }

    pub fn try_query(&self, i: usize, j: usize) -> Result<bool> {
        self.matrix.try_query(i, j)
    }

    pub fn matrix(&self) -> &IndexedCsr {
        &self.matrix
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn into_matrix(self) -> IndexedCsr {
        self.matrix
    }
}

/// Build the indexed validity matrix of adjacency matrix `a`.
pub fn build_validity_matrix(
    exec: &RowExecutor,
    a: &BoolCsr,
    d_low: u32,
    d_up: u32,
) -> Result<ValidityIndex> {
    if d_low > d_up {
        return Err(Error::InvalidDistanceBounds { d_low, d_up });
    }
    if !a.is_square() {
        return Err(Error::DimensionMismatch {
            op: "build_validity_matrix",
            left: a.shape(),
            right: a.shape(),
        });
    }

    let n = a.n_rows();
    let start_time = Instant::now();
    info!(
        n_vertices = n,
        nnz = a.nnz(),
        d_low,
        d_up,
        threads = exec.threads(),
        "building validity matrix"
    );

    exec.check_cancelled()?;
    let stage = Instant::now();
    let stay = add(exec, a, &BoolCsr::identity(n))?;
    let add_identity_time_ms = stage.elapsed().as_millis() as u64;
    info!(time_ms = add_identity_time_ms, nnz = stay.nnz(), "added identity matrix");

    exec.check_cancelled()?;
    let stage = Instant::now();
    let exact = power(exec, a, d_low)?;
    let power_adjacency_time_ms = stage.elapsed().as_millis() as u64;
    info!(
        time_ms = power_adjacency_time_ms,
        exponent = d_low,
        nnz = exact.nnz(),
        "raised adjacency matrix"
    );

    exec.check_cancelled()?;
    let stage = Instant::now();
    let within = power(exec, &stay, d_up - d_low)?;
    let power_stay_time_ms = stage.elapsed().as_millis() as u64;
    info!(
        time_ms = power_stay_time_ms,
        exponent = d_up - d_low,
        nnz = within.nnz(),
        "raised adjacency+identity matrix"
    );

    exec.check_cancelled()?;
    let stage = Instant::now();
    let valid = multiply(exec, &exact, &within)?;
    let multiply_time_ms = stage.elapsed().as_millis() as u64;
    info!(time_ms = multiply_time_ms, nnz = valid.nnz(), "executed final multiplication");

    let mut stats = BuildStats {
        n_vertices: n,
        d_low,
        d_up,
        add_identity_time_ms,
        power_adjacency_time_ms,
        power_stay_time_ms,
        multiply_time_ms,
        stay_nnz: stay.nnz(),
        exact_nnz: exact.nnz(),
        within_nnz: within.nnz(),
        ..Default::default()
    };
    drop((stay, exact, within));

    exec.check_cancelled()?;
    let stage = Instant::now();
    let matrix = index(exec, valid);
    stats.index_time_ms = stage.elapsed().as_millis() as u64;
    info!(time_ms = stats.index_time_ms, "indexed for querying");

    stats.validity_nnz = matrix.nnz();
    stats.total_time_ms = start_time.elapsed().as_millis() as u64;
    info!(
        nnz = stats.validity_nnz,
        total_time_ms = stats.total_time_ms,
        "validity matrix ready"
    );

    Ok(ValidityIndex { matrix, stats })
}
