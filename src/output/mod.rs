//! Output module for crawl results
//!
//! This module handles:
//! - Flattening stored page results into the final video list
//! - Deriving chart-ready graph data
//! - Summary statistics for the CLI

mod aggregate;
pub mod stats;

pub use aggregate::{aggregate, AggregateResult, GraphPoint};
pub use stats::{print_statistics, PlaylistStatistics};
