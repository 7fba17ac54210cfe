//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// A single entry in the site navigation bar.
#[derive(Debug, Clone, Deserialize)]
pub struct NavLink {
  pub label: String,
  pub path: String,
}

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub site_name: String,
  pub site_tagline: String,

  pub nav_links: Vec<NavLink>,

  // Letterboxd feed
  pub letterboxd_username: String,
  pub letterboxd_feed_url: String,
  pub cors_relay_url: String,
  pub recent_watch_count: usize,
  pub max_stars: u8,

  // Navigation rendering
  pub transition_ms: u64,

  // Content files
  pub content_dir: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
