use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::content::{Post, Site, load_or_else, sample_posts};
use crate::markdown;
use crate::pages::PageView;
use crate::router::RouteParams;

pub async fn render(site: Arc<Site>, _params: RouteParams) -> Result<PageView> {
  let posts: Vec<Post> = load_or_else(&site, "posts.json", sample_posts).await;

  let cards = posts
    .iter()
    .map(|post| {
      format!(
        r##"<article class="card">
          <div class="blog-meta">{meta}</div>
          <h3 class="card-title">{title}</h3>
          <p class="card-description">{excerpt}</p>
          <a href="#/blog/{slug}" class="btn btn-secondary mt-xl">Read More</a>
        </article>"##,
        meta = post_meta(post),
        title = post.title,
        excerpt = post.excerpt.as_deref().unwrap_or(""),
        slug = post.slug,
      )
    })
    .collect::<Vec<_>>()
    .join("\n");

  let html = format!(
    r#"<div class="container">
      <div class="section-header">
        <h1>Blog</h1>
        <p>Thoughts, ideas, and things I find interesting.</p>
      </div>
      <div class="blog-list">
        {cards}
      </div>
    </div>"#
  );

  Ok(PageView::html(html))
}

pub async fn render_post(site: Arc<Site>, params: RouteParams) -> Result<PageView> {
  let slug = params.get("slug").map(String::as_str).unwrap_or_default();

  let posts: Vec<Post> = load_or_else(&site, "posts.json", sample_posts).await;
  let mut post = match posts.into_iter().find(|p| p.slug == slug) {
    Some(post) => post,
    // The loaded list may simply lack this slug; the samples get a chance too.
    None => match sample_posts().into_iter().find(|p| p.slug == slug) {
      Some(post) => post,
      None => return Ok(PageView::html(not_found())),
    },
  };

  // Posts that reference a markdown file get their body parsed from it.
  if let Some(file) = &post.file {
    match load_markdown_body(&site, file).await {
      Ok(body) => post.content = Some(body),
      Err(e) => warn!(file, err = %e, "blog: markdown body failed to load"),
    }
  }

  let body = match &post.content {
    Some(content) => content.clone(),
    None => format!(
      "<p>{}</p><p><em>Full content coming soon...</em></p>",
      post.excerpt.as_deref().unwrap_or_default()
    ),
  };

  let html = format!(
    r##"<div class="container">
      <article class="blog-post">
        <header class="blog-post-header">
          <a href="#/blog" class="btn btn-secondary mb-xl">← Back to Blog</a>
          <div class="blog-meta">{meta}</div>
          <h1>{title}</h1>
        </header>
        <div class="blog-post-content">
          {body}
        </div>
      </article>
    </div>"##,
    meta = post_meta(&post),
    title = post.title,
  );

  Ok(PageView::html(html))
}

/// Read a post's markdown file (relative to the content dir), strip its
/// frontmatter and convert the body to HTML.
async fn load_markdown_body(site: &Site, file: &str) -> Result<String> {
  use anyhow::Context;
  let path = site.content_dir.join(file);
  let raw = tokio::fs::read_to_string(&path).await.with_context(|| format!("reading {}", path.display()))?;
  let doc = markdown::extract_frontmatter(&raw);
  Ok(markdown::parse(&doc.content))
}

fn post_meta(post: &Post) -> String {
  match &post.category {
    Some(category) => format!("<span>{}</span><span>•</span><span>{category}</span>", post.date),
    None => format!("<span>{}</span>", post.date),
  }
}

fn not_found() -> String {
  r##"<div class="container">
    <h1>Post Not Found</h1>
    <p>The blog post you're looking for doesn't exist.</p>
    <a href="#/blog" class="btn btn-primary">Back to Blog</a>
  </div>"##
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn params(slug: &str) -> RouteParams {
    RouteParams::from([("slug".to_string(), slug.to_string())])
  }

  #[tokio::test]
  async fn list_links_every_post() {
    let view = render(Site::for_tests(), RouteParams::new()).await.unwrap();
    assert!(view.html.contains("#/blog/welcome"));
    assert!(view.html.contains("#/blog/thoughts-on-design"));
  }

  #[tokio::test]
  async fn post_renders_inline_content() {
    let view = render_post(Site::for_tests(), params("welcome")).await.unwrap();
    assert!(view.html.contains("How to Add Posts"));
    assert!(view.html.contains("← Back to Blog"));
  }

  #[tokio::test]
  async fn unknown_slug_renders_not_found() {
    let view = render_post(Site::for_tests(), params("no-such-post")).await.unwrap();
    assert!(view.html.contains("Post Not Found"));
  }

  #[tokio::test]
  async fn markdown_file_body_parsed_with_frontmatter_stripped() {
    let dir = std::env::temp_dir().join("folio-blog-test");
    std::fs::create_dir_all(dir.join("posts")).unwrap();
    std::fs::write(
      dir.join("posts.json"),
      r#"[{"slug": "md-post", "title": "From Markdown", "date": "Jan 2025", "file": "posts/md-post.md"}]"#,
    )
    .unwrap();
    std::fs::write(dir.join("posts/md-post.md"), "---\ntitle: From Markdown\n---\n# Heading\n\n**bold** body").unwrap();

    let site = Site::new(PathBuf::from(&dir), "seance_cat".to_string());
    let view = render_post(site, params("md-post")).await.unwrap();
    assert!(view.html.contains("<h1>Heading</h1>"));
    assert!(view.html.contains("<strong>bold</strong>"));
    assert!(!view.html.contains("---"));
  }

  #[tokio::test]
  async fn post_without_body_falls_back_to_excerpt() {
    let dir = std::env::temp_dir().join("folio-blog-excerpt-test");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("posts.json"), r#"[{"slug": "stub", "title": "Stub", "excerpt": "A teaser."}]"#).unwrap();

    let site = Site::new(dir, "seance_cat".to_string());
    let view = render_post(site, params("stub")).await.unwrap();
    assert!(view.html.contains("A teaser."));
    assert!(view.html.contains("coming soon"));
  }
}
