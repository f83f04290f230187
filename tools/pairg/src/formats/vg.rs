//! VG graphs in the JSON form printed by `vg view -j`

use pairg_common::{Error, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::graph::SeqGraph;

#[derive(Debug, Deserialize)]
struct VgGraph {
    #[serde(default)]
    node: Vec<VgNode>,
    #[serde(default)]
    edge: Vec<VgEdge>,
}

#[derive(Debug, Deserialize)]
struct VgNode {
    id: VgId,
    sequence: String,
}

#[derive(Debug, Deserialize)]
struct VgEdge {
    from: VgId,
    to: VgId,
    #[serde(default)]
    from_start: bool,
    #[serde(default)]
    to_end: bool,
}

/// vg writes 64-bit ids as JSON strings, older releases as numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VgId {
    Num(u64),
    Text(String),
}

impl VgId {
    fn value(&self) -> Result<u64> {
        match self {
            VgId::Num(n) => Ok(*n),
            VgId::Text(s) => s
                .parse()
                .map_err(|_| Error::InvalidInput(format!("invalid vg node id '{s}'"))),
        }
    }
}

pub fn load_vg<P: AsRef<Path>>(path: P) -> Result<SeqGraph> {
    let bytes = fs::read(path)?;
    read_vg(&bytes)
}

pub fn read_vg(bytes: &[u8]) -> Result<SeqGraph> {
    let first = bytes.iter().copied().find(|b| !b.is_ascii_whitespace());
    if first != Some(b'{') {
        return Err(Error::UnsupportedGraphFormat {
            format: "binary vg, convert it with `vg view -j` first".to_string(),
            suggestion: None,
        });
    }

    let graph: VgGraph = serde_json::from_slice(bytes)?;

    let mut nodes = graph
        .node
        .into_iter()
        .map(|n| Ok((n.id.value()?, n.sequence)))
        .collect::<Result<Vec<_>>>()?;
    nodes.sort_unstable_by_key(|(id, _)| *id);

    let mut dense = FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
    for (i, (id, _)) in nodes.iter().enumerate() {
        if dense.insert(*id, i as u32).is_some() {
            return Err(Error::InvalidInput(format!("duplicate vg node id {id}")));
        }
    }

    let mut out_neighbors = vec![Vec::new(); nodes.len()];
    for edge in &graph.edge {
        let (from, to) = (edge.from.value()?, edge.to.value()?);
        if edge.from_start || edge.to_end {
            return Err(Error::InvalidInput(format!(
                "edge {from} -> {to} changes strand; only forward edges are supported"
            )));
        }
        let lookup = |id: u64| {
            dense
                .get(&id)
                .copied()
                .ok_or_else(|| Error::InvalidInput(format!("edge names unknown node {id}")))
        };
        let (u, v) = (lookup(from)?, lookup(to)?);
        out_neighbors[u as usize].push(v);
    }

    Ok(SeqGraph {
        labels: nodes.into_iter().map(|(_, seq)| seq.into_bytes()).collect(),
        out_neighbors,
    })
}
