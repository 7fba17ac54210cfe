//! Page handlers: fetch content, map it to HTML template strings.

pub mod blog;
pub mod home;
pub mod movies;
pub mod photography;
pub mod projects;
pub mod resume;

pub use photography::GalleryState;

/// The output of a page handler: the rendered HTML plus any explicit view
/// state the page carries (currently only the photo gallery).
#[derive(Debug, Default)]
pub struct PageView {
  pub html: String,
  pub gallery: Option<GalleryState>,
}

impl PageView {
  pub fn html(html: impl Into<String>) -> Self {
    Self { html: html.into(), gallery: None }
  }

  pub fn with_gallery(html: impl Into<String>, gallery: GalleryState) -> Self {
    Self { html: html.into(), gallery: Some(gallery) }
  }
}
