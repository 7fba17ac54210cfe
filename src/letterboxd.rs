use chrono::{DateTime, Datelike, Local, NaiveDate};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::constants::constants;

// --- Patterns ---

/// Letterboxd item titles look like `Movie Name, 2020 - ★★★`.
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?),\s*(\d{4})\s*-?\s*(★*)\s*$").unwrap());
static RE_STARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"★+").unwrap());
static RE_POSTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());
static RE_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

// --- Types ---

/// One watched film from the Letterboxd RSS feed.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRecord {
  pub title: String,
  pub year: Option<String>,
  /// Star count from the feed title, 0 when unrated.
  pub rating: u8,
  pub link: String,
  /// `None` when the feed's pubDate is missing or unparseable.
  pub watched_date: Option<NaiveDate>,
  pub poster: Option<String>,
  /// Description with markup stripped and whitespace trimmed.
  pub description: String,
}

/// Aggregate watch stats, recomputed against the wall clock on every call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stats {
  pub total_watched: usize,
  /// Mean over rated records only, rounded to one decimal. 0.0 when none.
  pub average_rating: f64,
  pub this_year: usize,
  pub this_month: usize,
}

#[derive(Deserialize)]
struct RelayEnvelope {
  contents: String,
}

// --- Fetching ---

/// Fetch and parse the user's Letterboxd feed.
///
/// Letterboxd disallows direct browser-style fetches, so the request goes
/// through a public CORS relay that wraps the raw XML in a JSON `contents`
/// field. Single attempt; every failure degrades to `None` and the caller
/// renders a fallback instead.
pub async fn fetch_feed(client: &Client, username: &str) -> Option<Vec<WatchRecord>> {
  let c = constants();
  let feed_url = c.letterboxd_feed_url.replace("{user}", username);

  let response = match client.get(&c.cors_relay_url).query(&[("url", feed_url.as_str())]).send().await {
    Ok(r) => r,
    Err(e) => {
      warn!(err = %e, "letterboxd: feed request failed");
      return None;
    }
  };
  if !response.status().is_success() {
    warn!(status = %response.status(), "letterboxd: relay returned non-success status");
    return None;
  }
  let envelope: RelayEnvelope = match response.json().await {
    Ok(body) => body,
    Err(e) => {
      warn!(err = %e, "letterboxd: relay envelope was not the expected JSON");
      return None;
    }
  };

  match parse_feed(&envelope.contents) {
    Ok(records) => {
      debug!(count = records.len(), "letterboxd: feed parsed");
      Some(records)
    }
    Err(e) => {
      warn!(err = %e, "letterboxd: feed XML failed to parse");
      None
    }
  }
}

// --- Parsing ---

/// Parse a Letterboxd RSS document into watch records.
pub fn parse_feed(xml: &str) -> anyhow::Result<Vec<WatchRecord>> {
  let doc = roxmltree::Document::parse(xml)?;

  let records = doc
    .descendants()
    .filter(|node| node.has_tag_name("item"))
    .map(|item| {
      let text = |tag: &str| {
        item
          .children()
          .find(|child| child.has_tag_name(tag))
          .and_then(|child| child.text())
          .unwrap_or_default()
          .to_string()
      };
      parse_item(&text("title"), &text("link"), &text("pubDate"), &text("description"))
    })
    .collect();

  Ok(records)
}

fn parse_item(title: &str, link: &str, pub_date: &str, description: &str) -> WatchRecord {
  let (name, year) = match RE_TITLE.captures(title) {
    Some(caps) => (caps[1].trim().to_string(), Some(caps[2].to_string())),
    // Malformed title: keep it verbatim as the name, no year.
    None => (title.to_string(), None),
  };

  // Derived independently of the name/year match so a malformed title can
  // still carry a rating.
  let rating = RE_STARS.find(title).map(|m| m.as_str().chars().count() as u8).unwrap_or(0);

  let poster = RE_POSTER.captures(description).map(|caps| caps[1].to_string());

  WatchRecord {
    title: name,
    year,
    rating,
    link: link.to_string(),
    watched_date: parse_pub_date(pub_date),
    poster,
    description: RE_TAGS.replace_all(description, "").trim().to_string(),
  }
}

/// RFC 2822 pubDate → date. Unparseable dates become `None`, never an error
/// that would abort the batch.
fn parse_pub_date(pub_date: &str) -> Option<NaiveDate> {
  DateTime::parse_from_rfc2822(pub_date.trim()).ok().map(|dt| dt.date_naive())
}

// --- Stats ---

/// Compute watch stats over a record list. "This year"/"this month" compare
/// against the current wall-clock date at call time.
pub fn calculate_stats(records: &[WatchRecord]) -> Stats {
  if records.is_empty() {
    return Stats::default();
  }

  let today = Local::now().date_naive();

  let rated: Vec<u8> = records.iter().map(|r| r.rating).filter(|&r| r > 0).collect();
  let average_rating = if rated.is_empty() {
    0.0
  } else {
    let mean = rated.iter().map(|&r| r as f64).sum::<f64>() / rated.len() as f64;
    (mean * 10.0).round() / 10.0
  };

  let this_year = records
    .iter()
    .filter(|r| r.watched_date.is_some_and(|d| d.year() == today.year()))
    .count();
  let this_month = records
    .iter()
    .filter(|r| r.watched_date.is_some_and(|d| d.year() == today.year() && d.month() == today.month()))
    .count();

  Stats { total_watched: records.len(), average_rating, this_year, this_month }
}

// --- Display helpers ---

/// Render a five-star row, marking stars past `rating` as empty.
pub fn render_stars(rating: u8) -> String {
  let mut html = String::new();
  for i in 1..=constants().max_stars {
    let class = if i <= rating { "star" } else { "star empty" };
    html.push_str(&format!(r#"<span class="{class}">★</span>"#));
  }
  html
}

/// Short display form for a watch date, e.g. `Dec 5, 2024`.
pub fn format_date(date: Option<NaiveDate>) -> String {
  match date {
    Some(d) => d.format("%b %-d, %Y").to_string(),
    None => String::new(),
  }
}
