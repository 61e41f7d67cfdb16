//! Pagination frontier for one crawl session
//!
//! This module handles:
//! - FIFO ordering of pending page fetches
//! - Deduplication by `(session id, url)` key
//! - Resolving discovered "next page" links against the site origin

use crate::state::SessionId;
use crate::url::resolve_link;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Deduplication key of a frontier entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrontierKey {
    pub session_id: SessionId,
    pub url: String,
}

/// A page queued for fetching
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// The absolute URL to fetch
    pub url: Url,

    /// The deduplication key of this entry
    pub key: FrontierKey,
}

/// Deduplicated FIFO of pending page fetches
///
/// Keys are remembered for the lifetime of the frontier, so a page that was
/// already processed is never queued again.
pub struct Frontier {
    session_id: SessionId,
    origin: Url,
    queue: VecDeque<FrontierEntry>,
    seen: HashSet<FrontierKey>,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `session_id` - The owning session
    /// * `origin` - Base URL that discovered links are resolved against
    pub fn new(session_id: SessionId, origin: Url) -> Self {
        Self {
            session_id,
            origin,
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Adds a URL to the back of the queue
    ///
    /// # Returns
    ///
    /// * `true` - The URL was queued
    /// * `false` - The key was already seen; nothing changed
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = FrontierKey {
            session_id: self.session_id,
            url: url.as_str().to_string(),
        };

        if !self.seen.insert(key.clone()) {
            return false;
        }

        self.queue.push_back(FrontierEntry { url, key });
        true
    }

    /// Takes the oldest queued entry
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Resolves a "next page" href found on a page
    ///
    /// Returns None when there is no href, or when it does not resolve to an
    /// http(s) URL.
    pub fn discover(&self, href: Option<&str>) -> Option<Url> {
        href.and_then(|href| resolve_link(href, &self.origin))
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
