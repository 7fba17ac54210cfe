use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::constants::{NavLink, constants};
use crate::content::Site;
use crate::pages::{self, GalleryState, PageView};
use crate::router::{Router, split_query};

// --- Types ---

/// Where the app currently is in the navigate → render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
  Idle,
  Loading,
  Rendered,
  Error,
}

/// A completed handler run: the navigation token it belongs to, the resolved
/// path, and the handler outcome.
type NavResult = (u64, String, anyhow::Result<PageView>);

// --- App ---

pub struct App {
  router: Router,
  site: Arc<Site>,
  pub phase: RenderPhase,
  pub current_path: String,
  document: String,
  gallery: Option<GalleryState>,
  pub scroll: usize,
  /// Monotonic navigation token. A handler result is applied only while its
  /// token is still the latest one issued, so a superseded in-flight
  /// navigation can never overwrite newer content.
  generation: u64,
  nav_rx: Option<oneshot::Receiver<NavResult>>,
  transition_until: Option<Instant>,
}

impl App {
  pub fn new(site: Arc<Site>) -> Self {
    Self::with_router(default_router(), site)
  }

  pub fn with_router(router: Router, site: Arc<Site>) -> Self {
    Self {
      router,
      site,
      phase: RenderPhase::Idle,
      current_path: "/".to_string(),
      document: String::new(),
      gallery: None,
      scroll: 0,
      generation: 0,
      nav_rx: None,
      transition_until: None,
    }
  }

  pub fn document(&self) -> &str {
    &self.document
  }

  pub fn gallery(&self) -> Option<&GalleryState> {
    self.gallery.as_ref()
  }

  pub fn patterns(&self) -> Vec<&str> {
    self.router.patterns()
  }

  /// Start navigating to a path. The resolved handler runs as a background
  /// task; its result is picked up by `check_pending`.
  pub fn navigate(&mut self, path: &str) {
    let path = normalize_path(path);
    self.generation += 1;
    let token = self.generation;
    info!(%path, token, "navigating");

    self.phase = RenderPhase::Loading;
    self.document = loading_fragment();

    let Some(matched) = self.router.resolve(&path) else {
      // Empty route table; nothing to run.
      self.apply(path, Ok(PageView::html(not_found_fragment())));
      return;
    };

    let site = self.site.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let result = (matched.handler)(site, matched.params).await;
      let _ = tx.send((token, path, result));
    });
    self.nav_rx = Some(rx);
  }

  /// Poll the in-flight navigation, applying its result if it is still the
  /// latest one. Called from the run loop.
  pub fn check_pending(&mut self) {
    let Some(mut rx) = self.nav_rx.take() else { return };
    match rx.try_recv() {
      Ok((token, path, result)) => {
        if token == self.generation {
          self.apply(path, result);
        } else {
          debug!(token, current = self.generation, "discarding stale navigation result");
        }
      }
      Err(oneshot::error::TryRecvError::Empty) => {
        self.nav_rx = Some(rx);
      }
      Err(oneshot::error::TryRecvError::Closed) => {
        error!("navigation task dropped without a result");
        self.phase = RenderPhase::Error;
        self.document = error_fragment();
      }
    }
  }

  /// Navigate and wait for the render to settle. One-shot path for the CLI.
  pub async fn render_now(&mut self, path: &str) -> &str {
    self.navigate(path);
    while self.phase == RenderPhase::Loading {
      self.check_pending();
      if self.phase == RenderPhase::Loading {
        tokio::time::sleep(Duration::from_millis(5)).await;
      }
    }
    &self.document
  }

  fn apply(&mut self, path: String, result: anyhow::Result<PageView>) {
    match result {
      Ok(view) => {
        self.phase = RenderPhase::Rendered;
        self.document = view.html;
        self.gallery = view.gallery;
      }
      Err(e) => {
        error!(%path, err = %e, "error rendering page");
        self.phase = RenderPhase::Error;
        self.document = error_fragment();
        self.gallery = None;
      }
    }
    self.current_path = path;
    self.scroll = 0;
    self.transition_until = Some(Instant::now() + Duration::from_millis(constants().transition_ms));
  }

  /// Whether the post-render transition window is still open.
  pub fn is_transitioning(&self) -> bool {
    self.transition_until.is_some_and(|until| Instant::now() < until)
  }

  /// Nav links paired with their active flag for the current path. A link is
  /// active on an exact match, or when the current path extends it. The root
  /// link only matches exactly.
  pub fn nav_links(&self) -> Vec<(&'static NavLink, bool)> {
    let path = self.current_path.as_str();
    constants()
      .nav_links
      .iter()
      .map(|link| {
        let active = link.path == path || (path.starts_with(&link.path) && link.path != "/");
        (link, active)
      })
      .collect()
  }

  /// Wrap the current document in a full HTML page with the site nav.
  pub fn shell(&self) -> String {
    let nav = self
      .nav_links()
      .iter()
      .map(|(link, active)| {
        let class = if *active { "nav-link active" } else { "nav-link" };
        format!(r##"<a href="#{}" class="{class}">{}</a>"##, link.path, link.label)
      })
      .collect::<Vec<_>>()
      .join("\n      ");

    format!(
      r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
</head>
<body>
  <nav class="navbar">
    <div class="nav-menu">
      {nav}
    </div>
  </nav>
  <main id="app"{fade}>
{document}
  </main>
</body>
</html>
"#,
      title = constants().site_name,
      fade = if self.is_transitioning() { r#" class="fade-in""# } else { "" },
      document = self.document,
    )
  }
}

// --- Routes ---

fn default_router() -> Router {
  let mut router = Router::new();
  router.register("/", |site, params| Box::pin(pages::home::render(site, params)));
  router.register("/projects", |site, params| Box::pin(pages::projects::render(site, params)));
  router.register("/resume", |site, params| Box::pin(pages::resume::render(site, params)));
  router.register("/photography", |site, params| Box::pin(pages::photography::render(site, params)));
  router.register("/blog", |site, params| Box::pin(pages::blog::render(site, params)));
  router.register("/blog/:slug", |site, params| Box::pin(pages::blog::render_post(site, params)));
  router.register("/movies", |site, params| Box::pin(pages::movies::render(site, params)));
  router
}

/// Hash fragments arrive as `#/path` or bare `/path`; empty means home.
fn normalize_path(path: &str) -> String {
  let path = path.strip_prefix('#').unwrap_or(path);
  let (path, _query) = split_query(path);
  if path.is_empty() { "/".to_string() } else { path.to_string() }
}

// --- Fragments ---

fn loading_fragment() -> String {
  r#"<div class="loading"><div class="spinner"></div></div>"#.to_string()
}

fn error_fragment() -> String {
  r#"<div class="container"><p>Error loading page</p></div>"#.to_string()
}

fn not_found_fragment() -> String {
  "<p>Page not found</p>".to_string()
}
