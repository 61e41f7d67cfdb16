use crate::storage::{PageResult, VideoRecord};
use serde::{Deserialize, Serialize};

/// One bar of the views chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPoint {
    /// "Video N", numbered from 1 across the whole playlist
    pub name: String,

    pub views: u64,
}

/// Final result of a playlist scrape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Every video, in page order then in-page order
    pub video_list: Vec<VideoRecord>,

    /// One point per entry of `video_list`, same order
    pub graph_data: Vec<GraphPoint>,
}

/// Flattens page results and derives graph data
///
/// Numbering runs 1..N over the flattened sequence; page boundaries do not
/// reset it.
pub fn aggregate(pages: Vec<PageResult>) -> AggregateResult {
    let video_list: Vec<VideoRecord> = pages.into_iter().flat_map(|page| page.videos).collect();

    let graph_data = video_list
        .iter()
        .enumerate()
        .map(|(i, video)| GraphPoint {
            name: format!("Video {}", i + 1),
            views: video.views,
        })
        .collect();

    AggregateResult {
        video_list,
        graph_data,
    }
}
