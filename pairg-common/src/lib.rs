//! Common utilities for the pairg toolkit

pub mod error;

pub use error::{suggest_format, Error, Result};
