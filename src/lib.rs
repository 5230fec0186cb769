pub mod cli;
pub mod core;
pub mod domain;
pub mod infra;

pub use crate::core::aggregator::run;
pub use crate::domain::errors::{AggregateError, ConfigError, DiscoveryError, VcsError};
pub use crate::domain::models::{Aggregate, Config, ConfigOption, RunStats};
