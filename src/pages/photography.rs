use anyhow::Result;
use std::sync::Arc;

use crate::content::{Photo, Site, load_or_else, sample_photos};
use crate::pages::PageView;
use crate::router::RouteParams;

/// Explicit gallery view state, carried inside the page's `PageView` rather
/// than a process-wide slot so concurrent page instances stay isolated.
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
  photos: Vec<Photo>,
  index: usize,
}

impl GalleryState {
  pub fn new(photos: Vec<Photo>) -> Self {
    Self { photos, index: 0 }
  }

  pub fn len(&self) -> usize {
    self.photos.len()
  }

  pub fn is_empty(&self) -> bool {
    self.photos.is_empty()
  }

  pub fn current(&self) -> Option<&Photo> {
    self.photos.get(self.index)
  }

  /// Advance with wrap-around; no-op on an empty gallery.
  pub fn next(&mut self) {
    if !self.photos.is_empty() {
      self.index = (self.index + 1) % self.photos.len();
    }
  }

  /// Step back with wrap-around; no-op on an empty gallery.
  pub fn previous(&mut self) {
    if !self.photos.is_empty() {
      self.index = if self.index == 0 { self.photos.len() - 1 } else { self.index - 1 };
    }
  }

  pub fn select(&mut self, index: usize) {
    if index < self.photos.len() {
      self.index = index;
    }
  }
}

pub async fn render(site: Arc<Site>, _params: RouteParams) -> Result<PageView> {
  let photos: Vec<Photo> = load_or_else(&site, "photos.json", sample_photos).await;

  let items = photos
    .iter()
    .map(|photo| {
      let title = photo.title.as_deref().unwrap_or("");
      format!(
        r#"<div class="masonry-item photo-item">
          <img src="{src}" alt="{alt}" loading="lazy">
          <div class="photo-overlay">
            <p class="photo-title">{title}</p>
          </div>
        </div>"#,
        src = photo.src,
        alt = if title.is_empty() { "Photo" } else { title },
      )
    })
    .collect::<Vec<_>>()
    .join("\n");

  let html = format!(
    r#"<div class="container">
      <div class="section-header">
        <h1>Photography</h1>
        <p>Capturing moments and perspectives through my lens.</p>
      </div>
      <div class="masonry" id="photo-gallery">
        {items}
      </div>
    </div>"#
  );

  Ok(PageView::with_gallery(html, GalleryState::new(photos)))
}
