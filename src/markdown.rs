use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// --- Patterns ---
//
// The substitution order below is load-bearing: each pass runs over the output
// of the previous one, and several patterns overlap (bold is a superset of
// italic, image syntax is link syntax with a `!` prefix). Bold must run before
// italic, and images before links, or the later pattern never matches.

static RE_H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static RE_H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static RE_H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static RE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static RE_ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static RE_IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());
static RE_BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^> (.*)$").unwrap());
static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static RE_CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static RE_HR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^---$").unwrap());
static RE_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").unwrap());
static RE_LIST_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:<li>.*</li>\n?)+").unwrap());
static RE_FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").unwrap());

/// Block-level tags that must not be wrapped in a paragraph.
const BLOCK_PREFIXES: [&str; 5] = ["<h", "<ul", "<blockquote", "<pre", "<hr"];

// --- Markdown ---

/// Convert a markdown subset to an HTML fragment.
///
/// Deterministic pure text transform. Raw HTML in the input passes through
/// unescaped — content here is the site owner's own, not untrusted input.
pub fn parse(markdown: &str) -> String {
  if markdown.is_empty() {
    return String::new();
  }

  let html = RE_H3.replace_all(markdown, "<h3>$1</h3>");
  let html = RE_H2.replace_all(&html, "<h2>$1</h2>");
  let html = RE_H1.replace_all(&html, "<h1>$1</h1>");
  let html = RE_BOLD.replace_all(&html, "<strong>$1</strong>");
  let html = RE_ITALIC.replace_all(&html, "<em>$1</em>");
  let html = RE_IMAGE.replace_all(&html, r#"<img src="$2" alt="$1">"#);
  let html = RE_LINK.replace_all(&html, r#"<a href="$2" target="_blank" rel="noopener">$1</a>"#);
  let html = RE_BLOCKQUOTE.replace_all(&html, "<blockquote>$1</blockquote>");
  let html = RE_INLINE_CODE.replace_all(&html, "<code>$1</code>");
  let html = RE_CODE_BLOCK.replace_all(&html, "<pre><code>$1</code></pre>");
  let html = RE_HR.replace_all(&html, "<hr>");
  let html = RE_LIST_ITEM.replace_all(&html, "<li>$1</li>");
  let html = RE_LIST_RUN.replace_all(&html, "<ul>$0</ul>");

  let html = html
    .split("\n\n")
    .map(|para| {
      let trimmed = para.trim();
      if !trimmed.is_empty() && !BLOCK_PREFIXES.iter().any(|p| para.starts_with(p)) {
        format!("<p>{}</p>", trimmed)
      } else {
        para.to_string()
      }
    })
    .collect::<Vec<_>>()
    .join("\n");

  // No line-break preservation within blocks.
  html.replace('\n', "")
}

// --- Frontmatter ---

/// A markdown document split into its metadata block and remaining body.
#[derive(Debug, Default, PartialEq)]
pub struct Frontmatter {
  pub meta: BTreeMap<String, String>,
  pub content: String,
}

/// Split a leading `---` delimited metadata block off a markdown document.
///
/// Without the exact opening/closing delimiter lines the whole input is
/// returned as content with empty meta.
pub fn extract_frontmatter(markdown: &str) -> Frontmatter {
  let Some(caps) = RE_FRONTMATTER.captures(markdown) else {
    return Frontmatter { meta: BTreeMap::new(), content: markdown.to_string() };
  };

  let mut meta = BTreeMap::new();
  for line in caps[1].lines() {
    if let Some((key, value)) = line.split_once(':') {
      let key = key.trim();
      if !key.is_empty() {
        meta.insert(key.to_string(), strip_quotes(value.trim()).to_string());
      }
    }
  }

  Frontmatter { meta, content: caps[2].to_string() }
}

/// Strip one layer of matching surrounding quotes, if present.
fn strip_quotes(value: &str) -> &str {
  for quote in ['"', '\''] {
    if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
      return inner;
    }
  }
  value
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- parse ---

  #[test]
  fn parse_empty() {
    assert_eq!(parse(""), "");
  }

  #[test]
  fn parse_headers() {
    assert_eq!(parse("# Hi"), "<h1>Hi</h1>");
    assert_eq!(parse("## Sub"), "<h2>Sub</h2>");
    assert_eq!(parse("### Deep"), "<h3>Deep</h3>");
  }

  #[test]
  fn parse_bold_before_italic() {
    assert_eq!(parse("**bold** and *italic*"), "<p><strong>bold</strong> and <em>italic</em></p>");
  }

  #[test]
  fn parse_link() {
    assert_eq!(
      parse("[site](https://example.com)"),
      r#"<p><a href="https://example.com" target="_blank" rel="noopener">site</a></p>"#
    );
  }

  #[test]
  fn parse_image_not_consumed_by_link() {
    assert_eq!(parse("![alt](pic.jpg)"), r#"<p><img src="pic.jpg" alt="alt"></p>"#);
  }

  #[test]
  fn parse_blockquote() {
    assert_eq!(parse("> quoted"), "<blockquote>quoted</blockquote>");
  }

  #[test]
  fn parse_inline_code() {
    assert_eq!(parse("use `cargo`"), "<p>use <code>cargo</code></p>");
  }

  #[test]
  fn parse_horizontal_rule() {
    assert_eq!(parse("before\n\n---\n\nafter"), "<p>before</p><hr><p>after</p>");
  }

  #[test]
  fn parse_list_run_wrapped_once() {
    assert_eq!(parse("- one\n- two"), "<ul><li>one</li><li>two</li></ul>");
  }

  #[test]
  fn parse_paragraphs_on_blank_lines() {
    assert_eq!(parse("first\n\nsecond"), "<p>first</p><p>second</p>");
  }

  #[test]
  fn parse_headers_not_paragraph_wrapped() {
    assert_eq!(parse("# Title\n\nbody"), "<h1>Title</h1><p>body</p>");
  }

  #[test]
  fn parse_strips_single_newlines() {
    assert_eq!(parse("line one\nline two"), "<p>line oneline two</p>");
  }

  #[test]
  fn parse_raw_html_passes_through() {
    assert_eq!(parse("<div>kept</div>"), "<p><div>kept</div></p>");
  }

  // --- extract_frontmatter ---

  #[test]
  fn frontmatter_basic() {
    let doc = extract_frontmatter("---\ntitle: X\n---\nBody");
    assert_eq!(doc.meta.get("title").map(String::as_str), Some("X"));
    assert_eq!(doc.content, "Body");
  }

  #[test]
  fn frontmatter_absent_returns_input_unchanged() {
    let doc = extract_frontmatter("just a body");
    assert!(doc.meta.is_empty());
    assert_eq!(doc.content, "just a body");
  }

  #[test]
  fn frontmatter_unclosed_returns_input_unchanged() {
    let doc = extract_frontmatter("---\ntitle: X\nBody");
    assert!(doc.meta.is_empty());
    assert_eq!(doc.content, "---\ntitle: X\nBody");
  }

  #[test]
  fn frontmatter_value_keeps_extra_colons() {
    let doc = extract_frontmatter("---\nurl: https://example.com\n---\nBody");
    assert_eq!(doc.meta.get("url").map(String::as_str), Some("https://example.com"));
  }

  #[test]
  fn frontmatter_strips_matching_quotes() {
    let doc = extract_frontmatter("---\ntitle: \"Quoted\"\nother: 'single'\n---\nBody");
    assert_eq!(doc.meta.get("title").map(String::as_str), Some("Quoted"));
    assert_eq!(doc.meta.get("other").map(String::as_str), Some("single"));
  }

  #[test]
  fn frontmatter_mismatched_quotes_kept() {
    let doc = extract_frontmatter("---\ntitle: \"Mixed'\n---\nBody");
    assert_eq!(doc.meta.get("title").map(String::as_str), Some("\"Mixed'"));
  }

  #[test]
  fn frontmatter_multiline_body_preserved() {
    let doc = extract_frontmatter("---\na: 1\nb: 2\n---\nline one\n\nline two");
    assert_eq!(doc.meta.len(), 2);
    assert_eq!(doc.content, "line one\n\nline two");
  }
}
