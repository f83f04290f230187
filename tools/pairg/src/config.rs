//! Run parameters
//!
//! A TOML file may provide any parameter; command-line flags override the
//! file. `Parameters::resolve` merges the layers, fills defaults and
//! validates the result.
//!
//! ```toml
//! graph_file = "chain.txt"
//! format = "txt"
//! d_low = 0
//! d_up = 50
//! threads = 8
//! query_count = 100000
//! seed = 42
//! ```

use pairg_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::formats::GraphFormat;
use crate::matrix::ExecConfig;

pub const DEFAULT_SEED: u64 = 42;

/// One layer of parameters; unset fields fall through to the next layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialParameters {
    pub graph_file: Option<PathBuf>,
    pub format: Option<GraphFormat>,
    pub d_low: Option<u32>,
    pub d_up: Option<u32>,
    pub threads: Option<usize>,
    pub query_count: Option<usize>,
    pub seed: Option<u64>,
}

impl PartialParameters {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            Error::InvalidInput(format!("config file {}: {e}", path.display()))
        })
    }

    /// Fields set in `over` win
    pub fn merge(self, over: PartialParameters) -> PartialParameters {
        PartialParameters {
            graph_file: over.graph_file.or(self.graph_file),
            format: over.format.or(self.format),
            d_low: over.d_low.or(self.d_low),
            d_up: over.d_up.or(self.d_up),
            threads: over.threads.or(self.threads),
            query_count: over.query_count.or(self.query_count),
            seed: over.seed.or(self.seed),
        }
    }
}

/// Validated parameter record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameters {
    pub graph_file: PathBuf,
    pub format: GraphFormat,
    pub d_low: u32,
    pub d_up: u32,
    /// 0 selects the number of logical CPUs
    pub threads: usize,
    /// Size of the random query batch; `None` (or 0 on input) skips it
    pub query_count: Option<usize>,
    pub seed: u64,
}

impl Parameters {
    /// Merge an optional config file with flag values, then validate.
    pub fn resolve(config_file: Option<&Path>, flags: PartialParameters) -> Result<Self> {
        let base = match config_file {
            Some(path) => PartialParameters::load(path)?,
            None => PartialParameters::default(),
        };
        let merged = base.merge(flags);

        let params = Parameters {
            graph_file: merged
                .graph_file
                .ok_or_else(|| Error::InvalidInput("no graph file given".to_string()))?,
            format: merged.format.unwrap_or_default(),
            d_low: merged
                .d_low
                .ok_or_else(|| Error::InvalidInput("no lower distance bound given".to_string()))?,
            d_up: merged
                .d_up
                .ok_or_else(|| Error::InvalidInput("no upper distance bound given".to_string()))?,
            threads: merged.threads.unwrap_or(0),
            query_count: merged.query_count.filter(|&c| c > 0),
            seed: merged.seed.unwrap_or(DEFAULT_SEED),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.d_low > self.d_up {
            return Err(Error::InvalidDistanceBounds {
                d_low: self.d_low,
                d_up: self.d_up,
            });
        }
        Ok(())
    }

    pub fn exec_config(&self) -> ExecConfig {
        ExecConfig {
            threads: self.threads,
        }
    }
}
