pub mod aggregator;
pub mod binary;
pub mod discovery;
pub mod filter;
pub mod processor;
