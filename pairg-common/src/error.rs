//! Error types for the pairg toolkit
//!
//! One taxonomy shared by the matrix engine, the graph loaders and the
//! binaries. Construction-time errors abort an index build; query-time
//! errors are local to the call.

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

/// Graph input formats understood by the loaders.
pub const KNOWN_GRAPH_FORMATS: &[&str] = &["txt", "vg"];

/// Main error type for pairg operations
#[derive(Debug, Error)]
pub enum Error {
    /// Operand shapes are incompatible for the requested operation
    #[error("dimension mismatch in {op}: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Distance bounds with d_low > d_up
    #[error("invalid distance bounds: d_low ({d_low}) must not exceed d_up ({d_up})")]
    InvalidDistanceBounds { d_low: u32, d_up: u32 },

    /// A point query outside the matrix
    #[error("query ({row}, {col}) out of range for {n_rows}x{n_cols} matrix")]
    OutOfRangeQuery {
        row: usize,
        col: usize,
        n_rows: usize,
        n_cols: usize,
    },

    /// Raw CRS arrays that break the storage invariants
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Graph format name or file layout not supported
    #[error("unsupported graph format '{format}'{}", suggestion_suffix(.suggestion))]
    UnsupportedGraphFormat {
        format: String,
        suggestion: Option<String>,
    },

    /// Malformed graph file contents
    #[error("graph parse error at line {line}: {message}")]
    GraphParse { line: usize, message: String },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Long-running build was cancelled through its cancel flag
    #[error("operation cancelled")]
    Cancelled,
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl Error {
    /// Build an `UnsupportedGraphFormat` error, attaching a fuzzy suggestion
    /// when the name is close to a known format.
    pub fn unsupported_format(format: &str) -> Self {
        Error::UnsupportedGraphFormat {
            format: format.to_string(),
            suggestion: suggest_format(format),
        }
    }

    /// True for errors a caller may recover from and keep issuing queries.
    pub fn is_query_local(&self) -> bool {
        matches!(self, Error::OutOfRangeQuery { .. })
    }
}

/// Suggest a known graph format for a misspelled one
///
/// Scores each candidate with 70% Jaro-Winkler and 30% normalized
/// Levenshtein. Returns `None` on an exact (case-insensitive) match or when
/// nothing scores above the threshold.
pub fn suggest_format(input: &str) -> Option<String> {
    let input_lower = input.trim().to_lowercase();
    if KNOWN_GRAPH_FORMATS.iter().any(|f| *f == input_lower) {
        return None;
    }

    let min_threshold = 0.7;
    let mut best: Option<(&str, f64)> = None;
    for candidate in KNOWN_GRAPH_FORMATS {
        let score = jaro_winkler(&input_lower, candidate) * 0.7
            + normalized_levenshtein(&input_lower, candidate) * 0.3;
        if score >= min_threshold && best.map_or(true, |(_, b)| score > b) {
            best = Some((candidate, score));
        }
    }

    best.map(|(name, _)| name.to_string())
}

/// Convenience result type for pairg operations
pub type Result<T> = std::result::Result<T, Error>;
