pub mod client;
pub mod config;
pub mod detail;
pub mod display;
pub mod error;
pub(crate) mod inflight;
pub mod map;
pub mod model;
pub mod search;
pub mod sources;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{PersonApi, PfpClient};
pub use config::PfpConfig;
pub use error::{PfpError, Result};
