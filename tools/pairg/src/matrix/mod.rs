//! Boolean sparse matrix engine
//!
//! - `csr`: CRS storage with implicit boolean values
//! - `exec`: row-parallel worker pool (symbolic pass, scan barrier, numeric pass)
//! - `ops`: boolean add, multiply and power
//! - `index`: sorted-row query structure
//! - `random`: random matrices for tests and benchmarks

pub mod csr;
pub mod exec;
pub mod index;
pub mod ops;
mod random;

pub use csr::{BoolCsr, MatrixSummary};
pub use exec::{exclusive_scan, CancelFlag, ExecConfig, RowExecutor};
pub use index::{index, IndexedCsr};
pub use ops::{add, multiply, power};
