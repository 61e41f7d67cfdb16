//! URL handling module for the playlist scraper
//!
//! This module provides playlist URL validation (deriving the playlist id from
//! the `list` query parameter) and resolution of relative pagination links
//! against the site origin.

mod playlist;
mod resolve;

// Re-export main functions
pub use playlist::{validate_playlist_url, PlaylistRequest, PLAYLIST_PARAM};
pub use resolve::{origin_url, resolve_link};
