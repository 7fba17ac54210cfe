use anyhow::Result;
use std::sync::Arc;

use crate::content::{Project, Site, load_or_else, sample_projects};
use crate::pages::PageView;
use crate::router::RouteParams;

pub async fn render(site: Arc<Site>, _params: RouteParams) -> Result<PageView> {
  let projects: Vec<Project> = load_or_else(&site, "projects.json", sample_projects).await;

  // Union of tags, first-seen order.
  let mut all_tags: Vec<&str> = Vec::new();
  for project in &projects {
    for tag in &project.tags {
      if !all_tags.contains(&tag.as_str()) {
        all_tags.push(tag);
      }
    }
  }

  let tag_cloud = if all_tags.is_empty() {
    String::new()
  } else {
    let chips = all_tags.iter().map(|tag| format!(r#"<span class="tag">{tag}</span>"#)).collect::<Vec<_>>().join("");
    format!(
      r#"<div class="tags mb-xl">
        <span class="tag active">All</span>
        {chips}
      </div>"#
    )
  };

  let cards = projects.iter().map(project_card).collect::<Vec<_>>().join("\n");

  let html = format!(
    r#"<div class="container">
      <div class="section-header">
        <h1>Projects</h1>
        <p>A collection of my work, side projects, and experiments.</p>
      </div>
      {tag_cloud}
      <div class="grid grid-3" id="projects-grid">
        {cards}
      </div>
    </div>"#
  );

  Ok(PageView::html(html))
}

fn project_card(project: &Project) -> String {
  let image = match &project.image {
    Some(src) => format!(r#"<img src="{src}" alt="{}" class="card-image">"#, project.title),
    None => String::new(),
  };

  let tags = if project.tags.is_empty() {
    String::new()
  } else {
    let chips = project.tags.iter().map(|t| format!(r#"<span class="tag">{t}</span>"#)).collect::<Vec<_>>().join("");
    format!(r#"<div class="tags">{chips}</div>"#)
  };

  let link = match &project.link {
    Some(url) => format!(r#"<a href="{url}" target="_blank" rel="noopener" class="btn btn-primary">View Project</a>"#),
    None => String::new(),
  };
  let github = match &project.github {
    Some(url) => format!(r#"<a href="{url}" target="_blank" rel="noopener" class="btn btn-secondary">GitHub</a>"#),
    None => String::new(),
  };

  format!(
    r#"<div class="card project-card" data-tags="{data_tags}">
      {image}
      <h3 class="card-title">{title}</h3>
      <p class="card-description">{description}</p>
      {tags}
      <div class="flex gap-md mt-xl">{link}{github}</div>
    </div>"#,
    data_tags = project.tags.join(","),
    title = project.title,
    description = project.description,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn sample_projects_render() {
    let view = render(Site::for_tests(), RouteParams::new()).await.unwrap();
    assert!(view.html.contains("Sample Project"));
    assert!(view.html.contains(r#"data-tags="web,javascript""#));
    // Tag union across both samples, deduplicated.
    assert!(view.html.contains(r#"<span class="tag">design</span>"#));
  }

  #[test]
  fn card_without_optional_fields() {
    let card = project_card(&Project { title: "Bare".to_string(), description: "D".to_string(), ..Default::default() });
    assert!(card.contains("Bare"));
    assert!(!card.contains("card-image"));
    assert!(!card.contains("btn-primary"));
  }

  #[test]
  fn card_with_everything() {
    let project = Project {
      id: None,
      title: "Full".to_string(),
      description: "D".to_string(),
      tags: vec!["a".to_string()],
      image: Some("img.png".to_string()),
      link: Some("https://x".to_string()),
      github: Some("https://gh".to_string()),
    };
    let card = project_card(&project);
    assert!(card.contains("card-image"));
    assert!(card.contains("View Project"));
    assert!(card.contains("GitHub"));
  }
}
