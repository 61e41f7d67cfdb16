//! State module for tracking crawl sessions
//!
//! # Components
//!
//! - `CrawlPhase`: The session state machine (Idle → Running → Draining → Closed)
//! - `CrawlSession`: Per-session identity, page counters, cap and deadline
//! - `SessionId`: Opaque unique token naming a session and its dataset

mod crawl_phase;
mod session;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use session::{CrawlSession, SessionId};
