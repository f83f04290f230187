//! Regression on a linear graph of 81189 bases
//!
//! The graph file holds a single sequence vertex; character expansion turns
//! it into a directed chain with 81188 edges.

use std::io::Write;

use pairg::formats::{load_graph, GraphFormat};
use pairg::heuristics::reachable_within_bound;
use pairg::matrix::{BoolCsr, RowExecutor};
use pairg::reachability::build_validity_matrix;
use tempfile::NamedTempFile;

const V: usize = 81189;
const E: u64 = 81188;

fn chain_file() -> NamedTempFile {
    let bases = b"ACGT";
    let label: String = (0..V).map(|i| bases[i % 4] as char).collect();
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "1").unwrap();
    writeln!(file, "{label}").unwrap();
    file.flush().unwrap();
    file
}

fn chain_adjacency() -> BoolCsr {
    let file = chain_file();
    let graph = load_graph(file.path(), GraphFormat::Txt).expect("Failed to load chain");
    assert_eq!(graph.n_vertices as usize, V);
    assert_eq!(graph.n_edges, E);
    BoolCsr::from_graph(graph).unwrap()
}

#[test]
fn test_chain_load() {
    let a = chain_adjacency();
    assert_eq!(a.shape(), (V, V));
    assert_eq!(a.nnz(), E);
    assert_eq!(a.row(0), &[1]);
    assert!(a.row(V - 1).is_empty());
}

#[test]
fn test_chain_interval_0_50() {
    let exec = RowExecutor::with_threads(4).unwrap();
    let a = chain_adjacency();
    let v = build_validity_matrix(&exec, &a, 0, 50).unwrap();

    assert_eq!(v.matrix().nnz(), 4_139_364);
    assert!(v.query(0, 0));
    assert!(v.query(0, 1));
    assert!(!v.query(1, 0));
    assert!(v.query(0, 50));
    assert!(!v.query(0, 51));
    assert!(!v.query(81137, 81188));
    assert!(v.query(81138, 81188));

    // the BFS heuristic agrees when d_low is 0
    for (src, target) in [(0, 0), (0, 50), (0, 51), (81138, 81188), (81137, 81188), (7, 3)] {
        assert_eq!(
            reachable_within_bound(&a, 50, src, target),
            v.query(src, target),
            "({src}, {target})"
        );
    }
}

#[test]
fn test_chain_interval_100_110() {
    let exec = RowExecutor::with_threads(4).unwrap();
    let a = chain_adjacency();
    let v = build_validity_matrix(&exec, &a, 100, 110).unwrap();

    assert_eq!(v.matrix().nnz(), 891_924);
    assert!(!v.query(0, 0));
    assert!(v.query(0, 100));
    assert!(v.query(0, 110));
    assert!(!v.query(0, 111));
    assert!(v.query(81088, 81188));
    assert!(!v.query(81089, 81188));
}

#[test]
fn test_chain_interval_beyond_length() {
    let exec = RowExecutor::with_threads(4).unwrap();
    let a = chain_adjacency();
    let v = build_validity_matrix(&exec, &a, 100_000, 100_000).unwrap();

    assert_eq!(v.matrix().nnz(), 0);
    assert!(!v.query(0, V - 1));
    // out-of-range queries are not fatal
    assert!(!v.query(V, 0));
    assert!(v.try_query(V, 0).is_err());
}
