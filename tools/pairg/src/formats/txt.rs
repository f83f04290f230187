//! `.txt` sequence graph format
//!
//! ```text
//! 3            <- count of vertices
//! 1 2 ACGT     <- vertex 0: out-neighbours 1 and 2, label ACGT
//! 2 G          <- vertex 1
//! TTA          <- vertex 2: no out-neighbours
//! ```
//!
//! Vertex ids are 0-based; fields are whitespace separated and the label is
//! always the last field. Blank lines are ignored.

use pairg_common::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::graph::SeqGraph;

/// Pre-sizing limit; the header is untrusted until the vertex lines arrive
const MAX_PREALLOC_VERTICES: usize = 1 << 20;

pub fn load_txt<P: AsRef<Path>>(path: P) -> Result<SeqGraph> {
    let reader = BufReader::new(File::open(path)?);
    read_txt(reader)
}

pub fn read_txt<R: BufRead>(reader: R) -> Result<SeqGraph> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)))
        .filter(|r| r.as_ref().map_or(true, |(_, l)| !l.trim().is_empty()));

    let (line_no, header) = lines.next().transpose()?.ok_or(Error::GraphParse {
        line: 1,
        message: "empty file, expected vertex count".to_string(),
    })?;
    let n_vertices: usize = header.trim().parse().map_err(|_| Error::GraphParse {
        line: line_no,
        message: format!("expected vertex count, found '{}'", header.trim()),
    })?;

    let capacity = n_vertices.min(MAX_PREALLOC_VERTICES);
    let mut graph = SeqGraph {
        labels: Vec::with_capacity(capacity),
        out_neighbors: Vec::with_capacity(capacity),
    };
    let mut last_line = line_no;

    for vertex in 0..n_vertices {
        let (line_no, line) = lines.next().transpose()?.ok_or(Error::GraphParse {
            line: last_line + 1,
            message: format!("expected {n_vertices} vertex lines, file ends after {vertex}"),
        })?;
        last_line = line_no;

        let mut fields: Vec<&str> = line.split_whitespace().collect();
        let label = fields.pop().unwrap_or_default();
        if !label.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::GraphParse {
                line: line_no,
                message: format!("vertex {vertex} label '{label}' is not a sequence"),
            });
        }

        let neighbors = fields
            .iter()
            .map(|f| match f.parse::<u32>() {
                Ok(v) if (v as usize) < n_vertices => Ok(v),
                Ok(v) => Err(Error::GraphParse {
                    line: line_no,
                    message: format!("out-neighbour {v} of vertex {vertex} is out of range"),
                }),
                Err(_) => Err(Error::GraphParse {
                    line: line_no,
                    message: format!("invalid out-neighbour id '{f}'"),
                }),
            })
            .collect::<Result<Vec<u32>>>()?;

        graph.labels.push(label.as_bytes().to_vec());
        graph.out_neighbors.push(neighbors);
    }

    if let Some((line_no, _)) = lines.next().transpose()? {
        return Err(Error::GraphParse {
            line: line_no,
            message: format!("unexpected content after {n_vertices} vertices"),
        });
    }

    Ok(graph)
}
