//! Benchmark driver: rounds, timing and reporting

pub mod driver;
pub mod report;
pub mod tally;

pub use driver::Benchmark;
pub use tally::{Summary, Tally};
