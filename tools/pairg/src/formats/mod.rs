///! Graph input formats

pub mod txt;
pub mod vg;

use pairg_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::graph::CharGraph;

pub use txt::{load_txt, read_txt};
pub use vg::{load_vg, read_vg};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Txt,
    Vg,
}

impl FromStr for GraphFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(GraphFormat::Txt),
            "vg" => Ok(GraphFormat::Vg),
            _ => Err(Error::unsupported_format(s)),
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphFormat::Txt => write!(f, "txt"),
            GraphFormat::Vg => write!(f, "vg"),
        }
    }
}

/// Load a sequence graph and expand it to the character level
pub fn load_graph<P: AsRef<Path>>(path: P, format: GraphFormat) -> Result<CharGraph> {
    let path = path.as_ref();
    let seq = match format {
        GraphFormat::Txt => load_txt(path)?,
        GraphFormat::Vg => load_vg(path)?,
    };
    let graph = CharGraph::from_seq_graph(&seq)?;
    info!(
        path = %path.display(),
        %format,
        seq_vertices = seq.n_vertices(),
        seq_edges = seq.n_edges(),
        vertices = graph.n_vertices,
        edges = graph.n_edges,
        "loaded graph"
    );
    Ok(graph)
}
