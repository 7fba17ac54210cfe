use anyhow::Result;
use std::sync::Arc;

use crate::constants::constants;
use crate::content::Site;
use crate::pages::PageView;
use crate::router::RouteParams;

/// Icon shown on a quick-link tile.
fn icon_for(path: &str) -> &'static str {
  match path {
    "/projects" => "💻",
    "/resume" => "📄",
    "/photography" => "📷",
    "/blog" => "✍️",
    "/movies" => "🎬",
    _ => "→",
  }
}

pub async fn render(_site: Arc<Site>, _params: RouteParams) -> Result<PageView> {
  let c = constants();

  let quick_links = c
    .nav_links
    .iter()
    .filter(|link| link.path != "/")
    .map(|link| {
      format!(
        r##"<a href="#{path}" class="quick-link">
          <span class="quick-link-icon">{icon}</span>
          <span class="quick-link-text">{label}</span>
        </a>"##,
        path = link.path,
        icon = icon_for(&link.path),
        label = link.label,
      )
    })
    .collect::<Vec<_>>()
    .join("\n");

  let html = format!(
    r##"<section class="hero">
      <div class="hero-content">
        <p class="hero-subtitle">Welcome</p>
        <h1>{name}</h1>
        <p class="hero-description">
          {tagline} Explore my projects, check out my photography,
          or see what movies I've been watching.
        </p>
        <div class="hero-cta">
          <a href="#/projects" class="btn btn-primary">View Projects</a>
          <a href="#/resume" class="btn btn-secondary">My Resume</a>
        </div>
        <div class="quick-links">
          {quick_links}
        </div>
      </div>
    </section>"##,
    name = c.site_name,
    tagline = c.site_tagline,
  );

  Ok(PageView::html(html))
}
