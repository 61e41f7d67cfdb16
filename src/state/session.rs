use crate::state::CrawlPhase;
use crate::ScrapeError;
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Opaque unique identifier of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Allocates a fresh random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Name of the dataset that holds this session's page results
    pub fn dataset_name(&self) -> String {
        format!("playlist-{}", self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracks the state of one crawl session
///
/// Mutated by the coordinator only. `pages_processed` counts every dequeued
/// entry, including skipped ones, and never exceeds `cap`.
#[derive(Debug)]
pub struct CrawlSession {
    /// Unique identifier of this session
    pub id: SessionId,

    /// Current lifecycle phase
    phase: CrawlPhase,

    /// Pages dequeued and handled (successfully or skipped)
    pub pages_processed: u32,

    /// Pages whose contribution was skipped after a page-level failure
    pub pages_skipped: u32,

    /// Maximum number of pages processed in this session
    pub cap: u32,

    /// Optional wall-clock limit for the whole session
    deadline: Option<Duration>,

    /// When the session was created
    started_at: Instant,
}

impl CrawlSession {
    /// Creates a new idle session
    pub fn new(cap: u32, deadline: Option<Duration>) -> Self {
        Self {
            id: SessionId::new(),
            phase: CrawlPhase::Idle,
            pages_processed: 0,
            pages_skipped: 0,
            cap,
            deadline,
            started_at: Instant::now(),
        }
    }

    /// Returns the current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves the session to the next phase
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Transition applied
    /// * `Err(ScrapeError::InvalidTransition)` - The transition is not legal
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), ScrapeError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Session {}: {} -> {}", self.id, self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Returns true if the page cap has been reached
    pub fn cap_reached(&self) -> bool {
        self.pages_processed >= self.cap
    }

    /// Returns true if another next-page link may still be queued
    pub fn can_enqueue(&self) -> bool {
        self.pages_processed < self.cap
    }

    /// Returns true if the configured session deadline has elapsed
    pub fn deadline_exceeded(&self, now: Instant) -> bool {
        self.deadline
            .is_some_and(|limit| now.duration_since(self.started_at) >= limit)
    }

    /// Records one handled page
    pub fn record_page(&mut self, skipped: bool) {
        self.pages_processed += 1;
        if skipped {
            self.pages_skipped += 1;
        }
    }

    /// Time since the session was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
