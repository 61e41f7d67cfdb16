/// Crawl session phase definitions
///
/// A session moves strictly forward through these phases; `Closed` is terminal.
use std::fmt;

/// Represents the current phase of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Session created, no resources allocated yet
    Idle,

    /// Dataset open and frontier seeded; pages are being processed
    Running,

    /// Loop exited (frontier empty, cap reached, deadline hit or fatal error);
    /// results are being read and resources released
    Draining,

    /// Dataset dropped and result returned
    Closed,
}

impl CrawlPhase {
    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true if the transition from `self` to `next` is legal
    ///
    /// Only the three forward steps are allowed:
    /// Idle → Running, Running → Draining, Draining → Closed.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Closed)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Closed => "closed",
        }
    }

    /// Returns all phases in lifecycle order
    pub fn all_phases() -> Vec<Self> {
        vec![Self::Idle, Self::Running, Self::Draining, Self::Closed]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
