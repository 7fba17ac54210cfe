use anyhow::Result;
use std::sync::Arc;

use crate::content::{Resume, Site, load_or_else, sample_resume};
use crate::pages::PageView;
use crate::router::RouteParams;

pub async fn render(site: Arc<Site>, _params: RouteParams) -> Result<PageView> {
  let resume: Resume = load_or_else(&site, "resume.json", sample_resume).await;
  Ok(PageView::html(render_resume(&resume)))
}

fn render_resume(resume: &Resume) -> String {
  let pdf = match &resume.pdf_url {
    Some(url) => format!(r#"<a href="{url}" download class="btn btn-primary">📄 Download PDF</a>"#),
    None => String::new(),
  };

  let mut sections = String::new();
  if let Some(summary) = &resume.summary {
    sections.push_str(&section("About", &format!("<p>{summary}</p>")));
  }
  if !resume.experience.is_empty() {
    let body = resume.experience.iter().map(experience_item).collect::<Vec<_>>().join("\n");
    sections.push_str(&section("Experience", &body));
  }
  if !resume.education.is_empty() {
    let body = resume.education.iter().map(education_item).collect::<Vec<_>>().join("\n");
    sections.push_str(&section("Education", &body));
  }
  if !resume.skills.is_empty() {
    let body = format!(r#"<div class="skills-grid">{}</div>"#, skills_grid(resume));
    sections.push_str(&section("Skills", &body));
  }
  if !resume.activities.is_empty() {
    let body = resume
      .activities
      .iter()
      .map(|a| resume_item(&a.title, &format!(" - {}", a.organization), &a.period, ""))
      .collect::<Vec<_>>()
      .join("\n");
    sections.push_str(&section("Activities", &body));
  }
  if let Some(contact) = &resume.contact {
    sections.push_str(&section("Contact", &contact_row(contact)));
  }

  format!(
    r#"<div class="container">
      <div class="resume-header">
        <div>
          <h1>{name}</h1>
          <p>{title}</p>
        </div>
        {pdf}
      </div>
      {sections}
    </div>"#,
    name = resume.name.as_deref().unwrap_or("Resume"),
    title = resume.title.as_deref().unwrap_or(""),
  )
}

fn section(heading: &str, body: &str) -> String {
  format!(r#"<div class="resume-section"><h3>{heading}</h3>{body}</div>"#)
}

fn resume_item(title: &str, subtitle: &str, date: &str, body: &str) -> String {
  format!(
    r#"<div class="resume-item">
      <div class="resume-item-header">
        <div>
          <span class="resume-title">{title}</span>
          <span class="resume-company">{subtitle}</span>
        </div>
        <span class="resume-date">{date}</span>
      </div>
      {body}
    </div>"#
  )
}

fn experience_item(job: &crate::content::Experience) -> String {
  let mut body = String::from(r#"<div class="resume-description">"#);
  if let Some(description) = &job.description {
    body.push_str(&format!("<p>{description}</p>"));
  }
  if !job.highlights.is_empty() {
    let items = job.highlights.iter().map(|h| format!("<li>{h}</li>")).collect::<Vec<_>>().join("");
    body.push_str(&format!("<ul>{items}</ul>"));
  }
  body.push_str("</div>");

  let dates = format!("{} - {}", job.start_date, job.end_date.as_deref().unwrap_or("Present"));
  resume_item(&job.title, &format!(" at {}", job.company), &dates, &body)
}

fn education_item(edu: &crate::content::Education) -> String {
  let body = match &edu.description {
    Some(description) => format!(r#"<p class="resume-description">{description}</p>"#),
    None => String::new(),
  };
  resume_item(&edu.degree, &format!(" - {}", edu.school), &edu.year, &body)
}

fn skills_grid(resume: &Resume) -> String {
  resume
    .skills
    .iter()
    .map(|(category, skills)| {
      let items = skills.iter().map(|s| format!("<li>{s}</li>")).collect::<Vec<_>>().join("");
      format!(r#"<div class="skill-category"><h4>{category}</h4><ul>{items}</ul></div>"#)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn contact_row(contact: &crate::content::Contact) -> String {
  let mut parts: Vec<String> = Vec::new();
  if let Some(email) = &contact.email {
    parts.push(format!(r#"<a href="mailto:{email}">{email}</a>"#));
  }
  if let Some(phone) = &contact.phone {
    parts.push(format!("<span>{phone}</span>"));
  }
  if let Some(github) = &contact.github {
    parts.push(format!(r#"<a href="{github}" target="_blank" rel="noopener">GitHub</a>"#));
  }
  if let Some(linkedin) = &contact.linkedin {
    parts.push(format!(r#"<a href="{linkedin}" target="_blank" rel="noopener">LinkedIn</a>"#));
  }
  if let Some(website) = &contact.website {
    parts.push(format!(r#"<a href="{website}" target="_blank" rel="noopener">Website</a>"#));
  }
  format!(r#"<div class="flex flex-wrap gap-lg">{}</div>"#, parts.join(""))
}
