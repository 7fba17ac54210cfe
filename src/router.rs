use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;

use crate::content::Site;
use crate::pages::PageView;

// --- Types ---

/// Parameters bound from `:name` pattern segments, produced per navigation.
pub type RouteParams = HashMap<String, String>;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<PageView>> + Send>>;

/// An async page handler: shared site context + bound params in, page out.
pub type Handler = Arc<dyn Fn(Arc<Site>, RouteParams) -> HandlerFuture + Send + Sync>;

struct Route {
  pattern: String,
  handler: Handler,
}

/// A successful route resolution.
pub struct Match {
  pub pattern: String,
  pub handler: Handler,
  pub params: RouteParams,
}

// --- Router ---

/// Maps hash-style paths (`/`, `/blog/:slug`) to async page handlers.
#[derive(Default)]
pub struct Router {
  routes: Vec<Route>,
}

impl Router {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a handler for a pattern. Re-registering the same pattern
  /// overwrites the handler in place, keeping the original position so
  /// structural-match iteration order stays stable.
  pub fn register<F>(&mut self, pattern: &str, handler: F)
  where
    F: Fn(Arc<Site>, RouteParams) -> HandlerFuture + Send + Sync + 'static,
  {
    let handler: Handler = Arc::new(handler);
    if let Some(route) = self.routes.iter_mut().find(|r| r.pattern == pattern) {
      route.handler = handler;
    } else {
      self.routes.push(Route { pattern: pattern.to_string(), handler });
    }
  }

  /// Resolve a path to a handler. Exact pattern match wins; otherwise the
  /// first structural match in registration order; otherwise the handler
  /// registered for `/`, if any.
  pub fn resolve(&self, path: &str) -> Option<Match> {
    let (path, _query) = split_query(path);

    if let Some(route) = self.routes.iter().find(|r| r.pattern == path) {
      return Some(Match { pattern: route.pattern.clone(), handler: route.handler.clone(), params: RouteParams::new() });
    }

    for route in &self.routes {
      if let Some(params) = match_pattern(&route.pattern, path) {
        return Some(Match { pattern: route.pattern.clone(), handler: route.handler.clone(), params });
      }
    }

    self
      .routes
      .iter()
      .find(|r| r.pattern == "/")
      .map(|route| Match { pattern: route.pattern.clone(), handler: route.handler.clone(), params: RouteParams::new() })
  }

  /// Registered patterns, in registration order.
  pub fn patterns(&self) -> Vec<&str> {
    self.routes.iter().map(|r| r.pattern.as_str()).collect()
  }
}

// --- Matching ---

/// Match a pattern against a path segment-wise. Requires equal segment
/// counts; literal segments must match exactly; `:name` segments bind any
/// non-empty value.
fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
  let pattern_parts: Vec<&str> = pattern.split('/').collect();
  let path_parts: Vec<&str> = path.split('/').collect();

  if pattern_parts.len() != path_parts.len() {
    return None;
  }

  let mut params = RouteParams::new();
  for (pattern_part, path_part) in pattern_parts.iter().zip(&path_parts) {
    if let Some(name) = pattern_part.strip_prefix(':') {
      if path_part.is_empty() {
        return None;
      }
      params.insert(name.to_string(), path_part.to_string());
    } else if pattern_part != path_part {
      return None;
    }
  }

  Some(params)
}

/// Split the query suffix off a path: `/blog/x?a=1` → (`/blog/x`, `[("a","1")]`).
pub fn split_query(path: &str) -> (&str, Vec<(String, String)>) {
  let Some((path, query)) = path.split_once('?') else {
    return (path, Vec::new());
  };
  let pairs = query
    .split('&')
    .filter(|pair| !pair.is_empty())
    .map(|pair| match pair.split_once('=') {
      Some((k, v)) => (k.to_string(), v.to_string()),
      None => (pair.to_string(), String::new()),
    })
    .collect();
  (path, pairs)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn page(marker: &'static str) -> impl Fn(Arc<Site>, RouteParams) -> HandlerFuture + Send + Sync + 'static {
    move |_site, params| {
      Box::pin(async move {
        let slug = params.get("slug").cloned().unwrap_or_default();
        Ok(PageView::html(format!("{marker}:{slug}")))
      })
    }
  }

  fn test_router() -> Router {
    let mut router = Router::new();
    router.register("/", page("home"));
    router.register("/blog", page("blog"));
    router.register("/blog/:slug", page("post"));
    router.register("/movies", page("movies"));
    router
  }

  async fn render(m: Match) -> String {
    (m.handler)(Site::for_tests(), m.params).await.unwrap().html
  }

  // --- resolve ---

  #[tokio::test]
  async fn resolve_exact() {
    let m = test_router().resolve("/blog").unwrap();
    assert_eq!(m.pattern, "/blog");
    assert_eq!(render(m).await, "blog:");
  }

  #[tokio::test]
  async fn resolve_binds_params() {
    let m = test_router().resolve("/blog/my-post").unwrap();
    assert_eq!(m.pattern, "/blog/:slug");
    assert_eq!(m.params.get("slug").map(String::as_str), Some("my-post"));
    assert_eq!(render(m).await, "post:my-post");
  }

  #[tokio::test]
  async fn resolve_unmatched_falls_back_to_root() {
    let m = test_router().resolve("/nowhere/at/all").unwrap();
    assert_eq!(m.pattern, "/");
    assert_eq!(render(m).await, "home:");
  }

  #[test]
  fn resolve_strips_query() {
    let m = test_router().resolve("/blog/hello?draft=1").unwrap();
    assert_eq!(m.pattern, "/blog/:slug");
    assert_eq!(m.params.get("slug").map(String::as_str), Some("hello"));
  }

  #[test]
  fn resolve_none_when_empty_router() {
    assert!(Router::new().resolve("/anything").is_none());
  }

  #[tokio::test]
  async fn register_same_pattern_overwrites() {
    let mut router = test_router();
    router.register("/blog", page("rewritten"));
    let m = router.resolve("/blog").unwrap();
    assert_eq!(render(m).await, "rewritten:");
    // Position preserved: still one /blog entry, in its original slot.
    assert_eq!(router.patterns(), vec!["/", "/blog", "/blog/:slug", "/movies"]);
  }

  // --- match_pattern ---

  #[test]
  fn match_literal_segments_must_be_equal() {
    assert!(match_pattern("/blog/archive", "/blog/other").is_none());
    assert!(match_pattern("/movies", "/projects").is_none());
  }

  #[test]
  fn match_requires_equal_segment_count() {
    assert!(match_pattern("/blog/:slug", "/blog").is_none());
    assert!(match_pattern("/blog/:slug", "/blog/a/b").is_none());
  }

  #[test]
  fn match_param_rejects_empty_segment() {
    assert!(match_pattern("/blog/:slug", "/blog/").is_none());
  }

  #[test]
  fn match_multiple_params() {
    let params = match_pattern("/a/:x/b/:y", "/a/1/b/2").unwrap();
    assert_eq!(params.get("x").map(String::as_str), Some("1"));
    assert_eq!(params.get("y").map(String::as_str), Some("2"));
  }

  // --- split_query ---

  #[test]
  fn split_query_none() {
    let (path, query) = split_query("/blog");
    assert_eq!(path, "/blog");
    assert!(query.is_empty());
  }

  #[test]
  fn split_query_pairs() {
    let (path, query) = split_query("/blog?tag=rust&draft=1");
    assert_eq!(path, "/blog");
    assert_eq!(query, vec![("tag".to_string(), "rust".to_string()), ("draft".to_string(), "1".to_string())]);
  }

  #[test]
  fn split_query_bare_key() {
    let (_, query) = split_query("/blog?draft");
    assert_eq!(query, vec![("draft".to_string(), String::new())]);
  }
}
