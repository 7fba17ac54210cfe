mod app;
mod config;
mod constants;
mod content;
mod letterboxd;
mod markdown;
mod pages;
mod router;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use constants::constants;
use content::Site;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Directory holding the JSON content files and markdown post bodies
  #[arg(long)]
  content_dir: Option<PathBuf>,
  /// Letterboxd account to pull the film feed from
  #[arg(long)]
  letterboxd_user: Option<String>,
  /// Log filter, e.g. 'info' or 'folio=debug'
  #[arg(long)]
  log_level: Option<String>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Render one route to stdout as a full HTML page
  Render {
    /// Route path, e.g. '/' or '/blog/my-post'
    route: String,
  },
  /// Render every route into a directory of index.html files
  Export {
    /// Output directory
    #[arg(long, default_value = "dist")]
    out: PathBuf,
  },
  /// List the registered route patterns
  Routes,
  /// Fetch the Letterboxd feed and print watch statistics
  Stats,
}

// --- Logging ---

/// Log to a file under the platform data dir so stdout stays clean for the
/// rendered HTML. The guard must outlive main.
fn init_logging(level: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "folio")?;
  let log_dir = proj_dirs.data_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::daily(log_dir, "folio.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = match level {
    Some(level) => EnvFilter::new(level),
    None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
  };
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let mut config = Config::load();

  // Explicit flags become the saved defaults for later runs.
  if args.letterboxd_user.is_some() || args.content_dir.is_some() || args.log_level.is_some() {
    config.letterboxd_username = args.letterboxd_user.or(config.letterboxd_username.take());
    config.content_dir =
      args.content_dir.map(|p| p.display().to_string()).or(config.content_dir.take());
    config.log_level = args.log_level.or(config.log_level.take());
    config.save();
  }

  let _log_guard = init_logging(config.log_level.as_deref());

  let content_dir =
    config.content_dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(&constants().content_dir));
  let letterboxd_user = config.letterboxd_username.unwrap_or_else(|| constants().letterboxd_username.clone());

  let site = Site::new(content_dir, letterboxd_user);
  let mut app = App::new(site.clone());

  match args.command {
    Command::Render { route } => {
      app.render_now(&route).await;
      println!("{}", app.shell());
    }
    Command::Export { out } => {
      export(&mut app, &site, &out).await?;
    }
    Command::Routes => {
      for pattern in app.patterns() {
        println!("{pattern}");
      }
    }
    Command::Stats => {
      print_stats(&site).await;
    }
  }

  Ok(())
}

// --- Export ---

/// Write every route as `<out>/<route>/index.html`. Parameterized patterns
/// are expanded from the post list.
async fn export(app: &mut App, site: &Site, out: &Path) -> Result<()> {
  let mut routes: Vec<String> =
    app.patterns().iter().filter(|pattern| !pattern.contains(':')).map(|p| p.to_string()).collect();

  let posts = content::load_or_else(site, "posts.json", content::sample_posts).await;
  for post in &posts {
    routes.push(format!("/blog/{}", post.slug));
  }

  for route in &routes {
    app.render_now(route).await;
    let path = out_path(out, route);
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(&path, app.shell()).with_context(|| format!("writing {}", path.display()))?;
    info!(route, path = %path.display(), "exported");
  }

  println!("Exported {} routes to {}", routes.len(), out.display());
  Ok(())
}

fn out_path(out: &Path, route: &str) -> PathBuf {
  let trimmed = route.trim_matches('/');
  if trimmed.is_empty() { out.join("index.html") } else { out.join(trimmed).join("index.html") }
}

// --- Stats ---

async fn print_stats(site: &Site) {
  let Some(records) = letterboxd::fetch_feed(&site.client, &site.letterboxd_username).await else {
    println!("Could not fetch the Letterboxd feed for '{}'.", site.letterboxd_username);
    return;
  };

  let stats = letterboxd::calculate_stats(&records);
  println!("Films watched:  {}", stats.total_watched);
  if stats.average_rating > 0.0 {
    println!("Average rating: {:.1}", stats.average_rating);
  } else {
    println!("Average rating: no rated films");
  }
  println!("This year:      {}", stats.this_year);
  println!("This month:     {}", stats.this_month);
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- out_path ---

  #[test]
  fn root_route_maps_to_top_level_index() {
    assert_eq!(out_path(Path::new("dist"), "/"), PathBuf::from("dist/index.html"));
  }

  #[test]
  fn single_segment_route_gets_own_directory() {
    assert_eq!(out_path(Path::new("dist"), "/projects"), PathBuf::from("dist/projects/index.html"));
  }

  #[test]
  fn nested_route_keeps_all_segments() {
    assert_eq!(out_path(Path::new("dist"), "/blog/first-post"), PathBuf::from("dist/blog/first-post/index.html"));
  }
}
