//! In-memory variation graphs
//!
//! Loaders produce a `SeqGraph` (one vertex per sequence node). The matrix
//! engine works on the character-level `CharGraph`, where every base is a
//! vertex and each node's bases form a chain.

use pairg_common::{Error, Result};

/// Sequence graph: labelled vertices with 0-based out-neighbours
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqGraph {
    pub labels: Vec<Vec<u8>>,
    pub out_neighbors: Vec<Vec<u32>>,
}

impl SeqGraph {
    pub fn n_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn n_edges(&self) -> usize {
        self.out_neighbors.iter().map(Vec::len).sum()
    }
}

/// Character-level graph with out-adjacency in CSR form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGraph {
    /// Count of vertices, one per base
    pub n_vertices: u32,
    /// Count of directed edges
    pub n_edges: u64,
    /// Upper-cased base of each vertex
    pub labels: Vec<u8>,
    /// Out-neighbours, `n_edges` entries
    pub adjacency: Vec<u32>,
    /// `n_vertices + 1` offsets into `adjacency`
    pub offsets: Vec<u64>,
}

impl CharGraph {
    /// Expand every sequence vertex into a chain of single-base vertices.
    ///
    /// The last base of `u` links to the first base of every out-neighbour
    /// of `u`; neighbour order is kept.
    pub fn from_seq_graph(seq: &SeqGraph) -> Result<Self> {
        if seq.labels.len() != seq.out_neighbors.len() {
            return Err(Error::InvalidInput(format!(
                "{} labels but {} adjacency lists",
                seq.labels.len(),
                seq.out_neighbors.len()
            )));
        }

        let mut first_char = Vec::with_capacity(seq.n_vertices());
        let mut total: u64 = 0;
        for (u, label) in seq.labels.iter().enumerate() {
            if label.is_empty() {
                return Err(Error::InvalidInput(format!("vertex {u} has an empty label")));
            }
            first_char.push(total);
            total += label.len() as u64;
        }
        if total > u32::MAX as u64 {
            return Err(Error::InvalidInput(format!(
                "{total} bases exceed the u32 vertex id range"
            )));
        }

        let n_vertices = total as usize;
        let mut labels = Vec::with_capacity(n_vertices);
        let mut offsets = Vec::with_capacity(n_vertices + 1);
        let mut adjacency = Vec::with_capacity(n_vertices + seq.n_edges());
        offsets.push(0u64);

        for (u, label) in seq.labels.iter().enumerate() {
            let start = first_char[u];
            for (c, &base) in label.iter().enumerate() {
                labels.push(base.to_ascii_uppercase());
                if c + 1 < label.len() {
                    adjacency.push((start + c as u64 + 1) as u32);
                } else {
                    for &v in &seq.out_neighbors[u] {
                        let head = first_char.get(v as usize).ok_or_else(|| {
                            Error::InvalidInput(format!(
                                "edge {u} -> {v} points past the last vertex"
                            ))
                        })?;
                        adjacency.push(*head as u32);
                    }
                }
                offsets.push(adjacency.len() as u64);
            }
        }

        Ok(Self {
            n_vertices: n_vertices as u32,
            n_edges: adjacency.len() as u64,
            labels,
            adjacency,
            offsets,
        })
    }

    /// Out-neighbours of vertex `v`
    pub fn out_neighbors(&self, v: u32) -> &[u32] {
        let start = self.offsets[v as usize] as usize;
        let end = self.offsets[v as usize + 1] as usize;
        &self.adjacency[start..end]
    }
}
