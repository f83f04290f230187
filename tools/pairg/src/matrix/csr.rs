//! Boolean sparse matrix in compressed row storage (CRS)
//!
//! Values are implicit: every stored position is a 1. A row `i` spans
//! `columns[offsets[i]..offsets[i + 1]]`.

use pairg_common::{Error, Result};
use serde::Serialize;
use std::ops::Range;
use tracing::info;

use crate::graph::CharGraph;

/// Rows printed at verbosity level 2
const PRINT_PREVIEW_ROWS: usize = 8;

/// Square (or rectangular) boolean matrix in CRS form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolCsr {
    n_rows: usize,
    n_cols: usize,
    offsets: Vec<u64>,  // n_rows + 1
    columns: Vec<u32>,  // nnz
}

/// Shape and fill statistics of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub nnz: u64,
    pub max_row_len: usize,
}

impl BoolCsr {
    /// n×n identity: exactly one entry per row, at column i
    pub fn identity(n: usize) -> Self {
        debug_assert!(n <= u32::MAX as usize + 1);
        Self {
            n_rows: n,
            n_cols: n,
            offsets: (0..=n as u64).collect(),
            columns: (0..n).map(|i| i as u32).collect(),
        }
    }

    /// Matrix with no stored entries
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            offsets: vec![0; n_rows + 1],
            columns: Vec::new(),
        }
    }

    /// Build from raw CRS arrays, checking the storage invariants.
    ///
    /// Rows need not be sorted; duplicates are tolerated until `index`.
    pub fn from_parts(
        n_rows: usize,
        n_cols: usize,
        offsets: Vec<u64>,
        columns: Vec<u32>,
    ) -> Result<Self> {
        if n_cols > u32::MAX as usize + 1 {
            return Err(Error::InvalidMatrix(format!(
                "{n_cols} columns exceed the u32 column index range"
            )));
        }
        if offsets.len() != n_rows + 1 {
            return Err(Error::InvalidMatrix(format!(
                "expected {} row offsets, got {}",
                n_rows + 1,
                offsets.len()
            )));
        }
        if offsets[0] != 0 {
            return Err(Error::InvalidMatrix(format!(
                "first row offset must be 0, got {}",
                offsets[0]
            )));
        }
        if let Some(row) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidMatrix(format!(
                "row offsets decrease at row {row}"
            )));
        }
        let nnz = offsets[n_rows];
        if nnz != columns.len() as u64 {
            return Err(Error::InvalidMatrix(format!(
                "last row offset is {nnz} but {} column indices were given",
                columns.len()
            )));
        }
        if let Some(&col) = columns.iter().find(|&&c| c as usize >= n_cols) {
            return Err(Error::InvalidMatrix(format!(
                "column index {col} out of range for {n_cols} columns"
            )));
        }

        Ok(Self {
            n_rows,
            n_cols,
            offsets,
            columns,
        })
    }

    /// Algebra kernels build offsets by exclusive scan and fill every slot.
    pub(crate) fn from_parts_unchecked(
        n_rows: usize,
        n_cols: usize,
        offsets: Vec<u64>,
        columns: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(offsets.len(), n_rows + 1);
        debug_assert_eq!(offsets[n_rows], columns.len() as u64);
        Self {
            n_rows,
            n_cols,
            offsets,
            columns,
        }
    }

    /// Adjacency matrix of a loaded graph; each vertex's out-neighbours
    /// become its row verbatim. The graph's arrays are moved, not copied.
    pub fn from_graph(graph: CharGraph) -> Result<Self> {
        let n = graph.n_vertices as usize;
        Self::from_parts(n, n, graph.offsets, graph.adjacency)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Count of stored (nonzero) entries
    pub fn nnz(&self) -> u64 {
        self.offsets[self.n_rows]
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    #[inline]
    pub fn row_range(&self, i: usize) -> Range<usize> {
        self.offsets[i] as usize..self.offsets[i + 1] as usize
    }

    /// Column indices stored in row `i`
    #[inline]
    pub fn row(&self, i: usize) -> &[u32] {
        &self.columns[self.row_range(i)]
    }

    #[inline]
    pub fn row_len(&self, i: usize) -> usize {
        (self.offsets[i + 1] - self.offsets[i]) as usize
    }

    /// True when every row is strictly ascending (sorted, no duplicates)
    pub fn is_row_sorted(&self) -> bool {
        (0..self.n_rows).all(|i| self.row(i).windows(2).all(|w| w[0] < w[1]))
    }

    pub(crate) fn parts_mut(&mut self) -> (&[u64], &mut [u32]) {
        (&self.offsets, &mut self.columns)
    }

    pub fn into_parts(self) -> (usize, usize, Vec<u64>, Vec<u32>) {
        (self.n_rows, self.n_cols, self.offsets, self.columns)
    }

    pub fn summary(&self) -> MatrixSummary {
        MatrixSummary {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            nnz: self.nnz(),
            max_row_len: (0..self.n_rows).map(|i| self.row_len(i)).max().unwrap_or(0),
        }
    }

    /// Log the matrix.
    ///
    /// 1 = summary only, 2 = summary and the first rows, 3 = every row.
    pub fn print(&self, name: &str, verbosity: u8) {
        let s = self.summary();
        info!(
            matrix = name,
            rows = s.n_rows,
            cols = s.n_cols,
            nnz = s.nnz,
            max_row_len = s.max_row_len,
            "matrix summary"
        );
        let shown = self.rows_shown(verbosity);
        for i in 0..shown {
            info!(matrix = name, row = i, columns = ?self.row(i));
        }
        if verbosity >= 2 && shown < self.n_rows {
            info!(matrix = name, "... {} more rows", self.n_rows - shown);
        }
    }

    /// Rows `print` lists at `verbosity`
    fn rows_shown(&self, verbosity: u8) -> usize {
        match verbosity {
            0 | 1 => 0,
            2 => self.n_rows.min(PRINT_PREVIEW_ROWS),
            _ => self.n_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_shape() {
        let id = BoolCsr::identity(4);
        assert_eq!(id.shape(), (4, 4));
        assert_eq!(id.nnz(), 4);
        for i in 0..4 {
            assert_eq!(id.row(i), &[i as u32]);
        }
        assert!(id.is_row_sorted());
    }

    #[test]
    fn test_identity_zero() {
        let id = BoolCsr::identity(0);
        assert_eq!(id.nnz(), 0);
        assert_eq!(id.offsets(), &[0]);
    }

    #[test]
    fn test_empty_rectangular() {
        let m = BoolCsr::empty(2, 5);
        assert_eq!(m.shape(), (2, 5));
        assert!(!m.is_square());
        assert_eq!(m.nnz(), 0);
        assert!(m.row(1).is_empty());
        let (rows, cols, offsets, columns) = m.into_parts();
        assert_eq!((rows, cols), (2, 5));
        assert_eq!(offsets, vec![0, 0, 0]);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_from_parts_accepts_unsorted_rows() {
        let m = BoolCsr::from_parts(2, 3, vec![0, 2, 3], vec![2, 0, 1]).unwrap();
        assert_eq!(m.row(0), &[2, 0]);
        assert!(!m.is_row_sorted());
    }

    #[test]
    fn test_from_parts_rejects_broken_invariants() {
        // wrong offsets length
        assert!(matches!(
            BoolCsr::from_parts(2, 2, vec![0, 1], vec![0]),
            Err(Error::InvalidMatrix(_))
        ));
        // offsets not starting at zero
        assert!(BoolCsr::from_parts(1, 2, vec![1, 1], vec![]).is_err());
        // decreasing offsets
        assert!(BoolCsr::from_parts(2, 2, vec![0, 2, 1], vec![0, 1]).is_err());
        // nnz disagrees with columns
        assert!(BoolCsr::from_parts(1, 2, vec![0, 2], vec![0]).is_err());
        // column out of range
        assert!(BoolCsr::from_parts(1, 2, vec![0, 1], vec![2]).is_err());
    }

    #[test]
    fn test_summary() {
        let m = BoolCsr::from_parts(3, 3, vec![0, 3, 3, 4], vec![0, 1, 2, 1]).unwrap();
        let s = m.summary();
        assert_eq!(s.nnz, 4);
        assert_eq!(s.max_row_len, 3);
        assert_eq!(m.row_len(1), 0);
    }

    #[test]
    fn test_print_levels() {
        let n = PRINT_PREVIEW_ROWS + 4;
        let m = BoolCsr::identity(n);
        assert_eq!(m.rows_shown(0), 0);
        assert_eq!(m.rows_shown(1), 0);
        assert_eq!(m.rows_shown(2), PRINT_PREVIEW_ROWS);
        assert_eq!(m.rows_shown(3), n);
        assert_eq!(BoolCsr::identity(3).rows_shown(2), 3);
        for verbosity in 0..=3 {
            m.print("identity", verbosity);
        }
    }

    #[test]
    fn test_from_graph_uses_rows_verbatim() {
        let graph = CharGraph {
            n_vertices: 3,
            n_edges: 3,
            labels: b"ACG".to_vec(),
            adjacency: vec![2, 1, 2],
            offsets: vec![0, 2, 3, 3],
        };
        let a = BoolCsr::from_graph(graph).unwrap();
        assert_eq!(a.row(0), &[2, 1]);
        assert_eq!(a.row(1), &[2]);
        assert!(a.row(2).is_empty());
    }
}
