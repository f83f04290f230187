//! pairg: distance-constrained reachability over variation graphs
//!
//! Loads a sequence graph, expands it to one vertex per base, and compiles
//! its adjacency matrix plus a distance interval `[d_low, d_up]` into an
//! indexed boolean "validity matrix". A point query then says whether some
//! walk of admissible length joins two positions. A matrix-free bounded BFS
//! answers the same question for `d_low = 0`.

pub mod config;
pub mod formats;
pub mod graph;
pub mod heuristics;
pub mod logging;
pub mod matrix;
pub mod queries;
pub mod reachability;

pub use config::{Parameters, PartialParameters};
pub use formats::{load_graph, GraphFormat};
pub use graph::{CharGraph, SeqGraph};
pub use heuristics::reachable_within_bound;
pub use matrix::{add, index, multiply, power, BoolCsr, IndexedCsr, RowExecutor};
pub use queries::{cross_check, BatchAnswers, QueryBatch};
pub use reachability::{build_validity_matrix, BuildStats, ValidityIndex};
