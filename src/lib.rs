//! scout: search people across public sources and get one normalized
//! record shape back.
//!
//! The aggregation engine lives in the [`scout_search`] crate. This crate
//! adds the application layer around it: a TOML configuration file and the
//! error type the `scout` binary reports.

pub mod config;
pub mod error;

pub use config::ScoutConfig;
pub use error::{Result, ScoutError};
pub use scout_search;
