//! Statistics over a scraped playlist
//!
//! This module provides summary numbers for an `AggregateResult` and a
//! plain-text report for the CLI.

use crate::output::AggregateResult;
use serde::Serialize;

/// Playlist statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatistics {
    /// Number of videos found
    pub video_count: usize,

    /// Sum of all view counts
    pub total_views: u64,

    /// Largest single view count
    pub max_views: u64,

    /// Mean view count, 0 for an empty playlist
    pub average_views: f64,
}

impl PlaylistStatistics {
    /// Computes statistics for a scrape result
    pub fn from_result(result: &AggregateResult) -> Self {
        let video_count = result.video_list.len();
        let total_views = result
            .video_list
            .iter()
            .fold(0u64, |sum, video| sum.saturating_add(video.views));
        let max_views = result
            .video_list
            .iter()
            .map(|video| video.views)
            .max()
            .unwrap_or(0);
        let average_views = if video_count > 0 {
            total_views as f64 / video_count as f64
        } else {
            0.0
        };

        Self {
            video_count,
            total_views,
            max_views,
            average_views,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &PlaylistStatistics) {
    println!("=== Playlist Statistics ===\n");
    println!("  Videos: {}", stats.video_count);
    println!("  Total views: {}", stats.total_views);
    println!("  Most viewed: {}", stats.max_views);
    println!("  Average views: {:.1}", stats.average_views);
}
