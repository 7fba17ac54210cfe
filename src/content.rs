use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

// --- Site context ---

/// Shared context handed to every page handler.
pub struct Site {
  pub content_dir: PathBuf,
  pub client: reqwest::Client,
  pub letterboxd_username: String,
}

impl Site {
  pub fn new(content_dir: PathBuf, letterboxd_username: String) -> Arc<Self> {
    Arc::new(Self { content_dir, client: reqwest::Client::new(), letterboxd_username })
  }

  #[cfg(test)]
  pub(crate) fn for_tests() -> Arc<Self> {
    // Nonexistent content dir: every load falls back to sample data.
    Self::new(PathBuf::from("/nonexistent/folio-test-content"), "seance_cat".to_string())
  }
}

// --- Loading ---

/// Read and deserialize one JSON content file.
pub async fn load_json<T: DeserializeOwned>(site: &Site, file: &str) -> Result<T> {
  let path = site.content_dir.join(file);
  let raw = tokio::fs::read_to_string(&path).await.with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Load a content file, degrading to a fallback value on any failure.
/// The failure is logged, never surfaced.
pub async fn load_or_else<T, F>(site: &Site, file: &str, fallback: F) -> T
where
  T: DeserializeOwned,
  F: FnOnce() -> T,
{
  match load_json(site, file).await {
    Ok(value) => value,
    Err(e) => {
      warn!(file, err = %e, "content: falling back to sample data");
      fallback()
    }
  }
}

// --- Models ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub slug: String,
  pub title: String,
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub excerpt: Option<String>,
  /// Relative path to a markdown body, when the post isn't inline.
  #[serde(default)]
  pub file: Option<String>,
  /// Pre-rendered inline HTML body.
  #[serde(default)]
  pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
  pub src: String,
  #[serde(default)]
  pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
  #[serde(default)]
  pub id: Option<String>,
  pub title: String,
  pub description: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub link: Option<String>,
  #[serde(default)]
  pub github: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub pdf_url: Option<String>,
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub experience: Vec<Experience>,
  #[serde(default)]
  pub education: Vec<Education>,
  #[serde(default)]
  pub skills: BTreeMap<String, Vec<String>>,
  #[serde(default)]
  pub activities: Vec<Activity>,
  #[serde(default)]
  pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
  pub title: String,
  pub company: String,
  #[serde(default)]
  pub start_date: String,
  #[serde(default)]
  pub end_date: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Education {
  pub degree: String,
  pub school: String,
  #[serde(default)]
  pub year: String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Activity {
  pub title: String,
  pub organization: String,
  #[serde(default)]
  pub period: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub github: Option<String>,
  #[serde(default)]
  pub linkedin: Option<String>,
  #[serde(default)]
  pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Review {
  pub title: String,
  #[serde(default)]
  pub year: Option<String>,
  #[serde(default)]
  pub rating: Option<u8>,
  #[serde(default)]
  pub poster: Option<String>,
  #[serde(default)]
  pub review: Option<String>,
}

// --- Sample fallbacks ---
//
// Built-in stand-ins shown when a content file is missing or malformed, so a
// fresh checkout renders every page.

pub fn sample_posts() -> Vec<Post> {
  vec![
    Post {
      slug: "welcome".to_string(),
      title: "Welcome to My Blog".to_string(),
      date: "December 2024".to_string(),
      category: Some("Personal".to_string()),
      excerpt: Some("This is a sample blog post. Add your real posts to content/posts.json or as markdown files.".to_string()),
      file: None,
      content: Some(
        "<p>This is a sample blog post to show you how the blog works.</p>\
         <h2>How to Add Posts</h2>\
         <p>You can add entries to <code>content/posts.json</code> with inline content, \
         or create markdown files and reference them.</p>\
         <blockquote>Markdown files can include frontmatter for metadata!</blockquote>"
          .to_string(),
      ),
    },
    Post {
      slug: "thoughts-on-design".to_string(),
      title: "Thoughts on Design".to_string(),
      date: "December 2024".to_string(),
      category: Some("Design".to_string()),
      excerpt: Some("Exploring what makes great design and how to think about user experience.".to_string()),
      file: None,
      content: Some("<p>Add your actual content here...</p>".to_string()),
    },
  ]
}

pub fn sample_photos() -> Vec<Photo> {
  let shots = [
    ("https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=600", "Mountain Vista"),
    ("https://images.unsplash.com/photo-1470071459604-3b5ec3a7fe05?w=600", "Foggy Forest"),
    ("https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=600", "Sunlit Path"),
    ("https://images.unsplash.com/photo-1469474968028-56623f02e42e?w=600", "Nature's Beauty"),
    ("https://images.unsplash.com/photo-1447752875215-b2761acb3c5d?w=600", "Golden Hour"),
    ("https://images.unsplash.com/photo-1433086966358-54859d0ed716?w=600", "Waterfall"),
  ];
  shots.into_iter().map(|(src, title)| Photo { src: src.to_string(), title: Some(title.to_string()) }).collect()
}

pub fn sample_projects() -> Vec<Project> {
  vec![
    Project {
      id: Some("sample-1".to_string()),
      title: "Sample Project".to_string(),
      description: "This is a sample project. Add your real projects to content/projects.json".to_string(),
      tags: vec!["web".to_string(), "javascript".to_string()],
      image: None,
      link: Some("#".to_string()),
      github: Some("#".to_string()),
    },
    Project {
      id: Some("sample-2".to_string()),
      title: "Another Project".to_string(),
      description: "Replace this with your actual project descriptions.".to_string(),
      tags: vec!["design".to_string(), "ui".to_string()],
      image: None,
      link: Some("#".to_string()),
      github: None,
    },
  ]
}

pub fn sample_resume() -> Resume {
  Resume {
    name: Some("Samarth P".to_string()),
    title: Some("Developer & Photographer".to_string()),
    pdf_url: Some("public/resume.pdf".to_string()),
    summary: Some("Add your professional summary to content/resume.json".to_string()),
    experience: vec![Experience {
      title: "Software Developer".to_string(),
      company: "Your Company".to_string(),
      start_date: "Jan 2023".to_string(),
      end_date: None,
      description: Some("Update this with your real experience.".to_string()),
      highlights: vec!["Highlight 1".to_string(), "Highlight 2".to_string()],
    }],
    education: vec![Education {
      degree: "Your Degree".to_string(),
      school: "Your University".to_string(),
      year: "2022".to_string(),
      description: Some("Description here".to_string()),
    }],
    skills: BTreeMap::from([
      ("Programming".to_string(), vec!["JavaScript".to_string(), "Python".to_string(), "HTML/CSS".to_string()]),
      ("Tools".to_string(), vec!["Git".to_string(), "VS Code".to_string(), "Figma".to_string()]),
    ]),
    activities: Vec::new(),
    contact: Some(Contact {
      email: Some("your@email.com".to_string()),
      phone: None,
      github: Some("https://github.com/yourusername".to_string()),
      linkedin: None,
      website: None,
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn post_optional_fields_default() {
    let post: Post = serde_json::from_str(r#"{"slug": "s", "title": "T"}"#).unwrap();
    assert_eq!(post.slug, "s");
    assert_eq!(post.date, "");
    assert_eq!(post.category, None);
    assert_eq!(post.file, None);
  }

  #[test]
  fn resume_camel_case_fields() {
    let resume: Resume = serde_json::from_str(
      r#"{"pdfUrl": "r.pdf", "experience": [{"title": "Dev", "company": "Co", "startDate": "Jan", "endDate": null}]}"#,
    )
    .unwrap();
    assert_eq!(resume.pdf_url.as_deref(), Some("r.pdf"));
    assert_eq!(resume.experience[0].start_date, "Jan");
    assert_eq!(resume.experience[0].end_date, None);
  }

  #[test]
  fn project_tags_default_empty() {
    let project: Project = serde_json::from_str(r#"{"title": "T", "description": "D"}"#).unwrap();
    assert!(project.tags.is_empty());
  }

  #[tokio::test]
  async fn load_or_else_falls_back_on_missing_file() {
    let site = Site::for_tests();
    let posts: Vec<Post> = load_or_else(&site, "posts.json", sample_posts).await;
    assert_eq!(posts.len(), sample_posts().len());
  }

  #[tokio::test]
  async fn load_json_reads_real_file() {
    let dir = std::env::temp_dir().join("folio-content-test");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("photos.json"), r#"[{"src": "a.jpg", "title": "A"}]"#).unwrap();

    let site = Site::new(dir, "seance_cat".to_string());
    let photos: Vec<Photo> = load_json(&site, "photos.json").await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].src, "a.jpg");
  }
}
