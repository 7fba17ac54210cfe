use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::constants::constants;
use crate::content::{Review, Site, load_json};
use crate::letterboxd::{self, Stats, WatchRecord};
use crate::pages::PageView;
use crate::router::RouteParams;

pub async fn render(site: Arc<Site>, _params: RouteParams) -> Result<PageView> {
  // The feed fetch and the local reviews file are independent loads.
  let (feed, reviews) = futures::join!(
    letterboxd::fetch_feed(&site.client, &site.letterboxd_username),
    load_json::<Vec<Review>>(&site, "movies.json"),
  );
  let stats = letterboxd::calculate_stats(feed.as_deref().unwrap_or_default());

  // Custom reviews are optional; a missing movies.json just means no section.
  let reviews = match reviews {
    Ok(reviews) => reviews,
    Err(e) => {
      warn!(err = %e, "movies: no custom reviews");
      Vec::new()
    }
  };

  let html = format!(
    r#"<div class="container">
      <div class="section-header">
        <h1>Movies</h1>
        <p>
          Film enthusiast tracking my watches on
          <a href="https://letterboxd.com/{user}" target="_blank" rel="noopener">Letterboxd</a>
        </p>
      </div>
      {stats}
      {recent}
      {reviews}
    </div>"#,
    user = site.letterboxd_username,
    stats = stats_cards(&stats),
    recent = recent_watches(feed.as_deref(), &site.letterboxd_username),
    reviews = reviews_grid(&reviews),
  );

  Ok(PageView::html(html))
}

/// Zero values render as an em-dash placeholder, matching the stat cards'
/// "no data yet" look.
fn dash_if_zero(value: String, is_zero: bool) -> String {
  if is_zero { "—".to_string() } else { value }
}

fn stats_cards(stats: &Stats) -> String {
  let cards = [
    (dash_if_zero(stats.total_watched.to_string(), stats.total_watched == 0), "Recent Films"),
    (dash_if_zero(stats.this_year.to_string(), stats.this_year == 0), "This Year"),
    (dash_if_zero(stats.this_month.to_string(), stats.this_month == 0), "This Month"),
    (dash_if_zero(format!("{:.1}", stats.average_rating), stats.average_rating == 0.0), "Avg Rating"),
  ];

  let body = cards
    .iter()
    .map(|(value, label)| {
      format!(
        r#"<div class="stat-card">
          <div class="stat-number">{value}</div>
          <div class="stat-label">{label}</div>
        </div>"#
      )
    })
    .collect::<Vec<_>>()
    .join("\n");

  format!(r#"<div class="movies-stats">{body}</div>"#)
}

fn recent_watches(feed: Option<&[WatchRecord]>, username: &str) -> String {
  let Some(records) = feed else {
    return format!(
      r#"<div class="recent-watches">
        <h3>Recent Watches</h3>
        <p>Unable to load Letterboxd data.
          <a href="https://letterboxd.com/{username}" target="_blank" rel="noopener">View my profile on Letterboxd →</a>
        </p>
      </div>"#
    );
  };

  let items = records.iter().take(constants().recent_watch_count).map(recent_item).collect::<Vec<_>>().join("\n");

  format!(
    r#"<div class="recent-watches">
      <h3>Recent Watches</h3>
      <div class="recent-list">{items}</div>
    </div>"#
  )
}

fn recent_item(movie: &WatchRecord) -> String {
  let poster = match &movie.poster {
    Some(src) => format!(r#"<img src="{src}" alt="{}" class="recent-poster">"#, movie.title),
    None => String::new(),
  };
  let year = match &movie.year {
    Some(year) => format!(" ({year})"),
    None => String::new(),
  };
  let rating = if movie.rating > 0 {
    format!(r#"<div class="movie-rating">{}</div>"#, letterboxd::render_stars(movie.rating))
  } else {
    String::new()
  };

  format!(
    r#"<a href="{link}" target="_blank" rel="noopener" class="recent-item">
      {poster}
      <div class="recent-info">
        <div class="recent-title">{title}{year}</div>
        {rating}
        <div class="recent-date">{date}</div>
      </div>
    </a>"#,
    link = movie.link,
    title = movie.title,
    date = letterboxd::format_date(movie.watched_date),
  )
}

fn reviews_grid(reviews: &[Review]) -> String {
  if reviews.is_empty() {
    return String::new();
  }

  let cards = reviews
    .iter()
    .map(|review| {
      let poster = match &review.poster {
        Some(src) => format!(r#"<img src="{src}" alt="{}" class="movie-poster">"#, review.title),
        None => String::new(),
      };
      let year = match &review.year {
        Some(year) => format!(" ({year})"),
        None => String::new(),
      };
      let rating = match review.rating {
        Some(rating) if rating > 0 => {
          format!(r#"<div class="movie-rating">{}</div>"#, letterboxd::render_stars(rating))
        }
        _ => String::new(),
      };

      format!(
        r#"<div class="card movie-card">
          {poster}
          <div class="movie-info">
            <h4>{title}{year}</h4>
            {rating}
            <p>{body}</p>
          </div>
        </div>"#,
        title = review.title,
        body = review.review.as_deref().unwrap_or(""),
      )
    })
    .collect::<Vec<_>>()
    .join("\n");

  format!(
    r#"<div class="section mt-xl">
      <h2>My Reviews</h2>
      <div class="grid grid-2">{cards}</div>
    </div>"#
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn record(title: &str, rating: u8) -> WatchRecord {
    WatchRecord {
      title: title.to_string(),
      year: Some("2020".to_string()),
      rating,
      link: "https://letterboxd.com/x".to_string(),
      watched_date: NaiveDate::from_ymd_opt(2024, 12, 6),
      poster: None,
      description: String::new(),
    }
  }

  #[test]
  fn stats_cards_dash_out_zeroes() {
    let html = stats_cards(&Stats::default());
    assert_eq!(html.matches("—").count(), 4);
  }

  #[test]
  fn stats_cards_show_values() {
    let stats = Stats { total_watched: 12, average_rating: 3.5, this_year: 8, this_month: 2 };
    let html = stats_cards(&stats);
    assert!(html.contains(">12<"));
    assert!(html.contains(">3.5<"));
    assert!(!html.contains("—"));
  }

  #[test]
  fn recent_watches_fallback_links_profile() {
    let html = recent_watches(None, "seance_cat");
    assert!(html.contains("Unable to load Letterboxd data"));
    assert!(html.contains("https://letterboxd.com/seance_cat"));
  }

  #[test]
  fn recent_watches_caps_list_length() {
    let records: Vec<WatchRecord> = (0..20).map(|i| record(&format!("Film {i}"), 3)).collect();
    let html = recent_watches(Some(&records), "seance_cat");
    assert_eq!(html.matches("recent-item").count(), constants().recent_watch_count);
    assert!(html.contains("Film 0"));
    assert!(!html.contains("Film 10"));
  }

  #[test]
  fn unrated_watch_has_no_star_row() {
    let html = recent_item(&record("Quiet", 0));
    assert!(!html.contains("movie-rating"));
  }

  #[test]
  fn reviews_grid_empty_renders_nothing() {
    assert_eq!(reviews_grid(&[]), "");
  }

  #[test]
  fn reviews_grid_renders_cards() {
    let reviews = vec![Review {
      title: "Favorite".to_string(),
      year: Some("1999".to_string()),
      rating: Some(5),
      poster: None,
      review: Some("A classic.".to_string()),
    }];
    let html = reviews_grid(&reviews);
    assert!(html.contains("My Reviews"));
    assert!(html.contains("Favorite (1999)"));
    assert!(html.contains("A classic."));
  }
}
