use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio::config;
use folio::route::Route;
use folio::view::CategoryFilter;
use folio::{Category, Site};

#[derive(Debug, Parser)]
#[command(author, version, about = "Read the portfolio site's posts and projects")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log at debug level regardless of `app.log_level`
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List published posts, newest first
    Posts {
        /// Only posts carrying this category (technology, finance, personal, mixed)
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show a single post by slug or id
    Post {
        slug: Option<String>,
        #[arg(long, conflicts_with = "slug")]
        id: Option<String>,
    },
    /// List projects, newest first
    Projects,
    /// Show a single project by id
    Project { id: String },
    /// Resolve a site path (e.g. `/writing` or `/my-post`) and print its page data
    Open { path: String },
    /// Print an example configuration file
    ExampleConfig,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={}", level.trim().to_ascii_lowercase())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if let Command::ExampleConfig = args.command {
        print!("{}", config::example());
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = config::load(Some(&args.config))?;
    let level = if args.verbose { "debug" } else { cfg.app.log_level.as_str() };
    init_tracing(level);

    let site = Site::from_config(&cfg)?;
    info!(join = ?cfg.supabase.category_join, "site pipeline ready");

    match args.command {
        Command::Posts { category } => {
            let filter = CategoryFilter::new(category);
            let posts = filter.apply(&site.posts.list_posts().await);
            if posts.is_empty() {
                eprintln!("{}", filter.empty_message());
                if filter.selected().is_some() {
                    let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
                    eprintln!("Categories: {}", names.join(", "));
                }
            }
            print_json(&posts)?;
        }
        Command::Post { slug, id } => {
            let post = match (slug, id) {
                (Some(slug), _) => site.posts.get_post_by_slug(&slug).await,
                (None, Some(id)) => site.posts.get_post_by_id(&id).await,
                (None, None) => bail!("either a SLUG or --id is required"),
            };
            match post {
                Some(post) => print_json(&post)?,
                None => {
                    eprintln!("Post not found. Back to {}", Route::Writing.path());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Projects => {
            let projects = site.projects.list_projects().await;
            if projects.is_empty() {
                eprintln!("No projects available.");
            }
            print_json(&projects)?;
        }
        Command::Project { id } => match site.projects.get_project_by_id(&id).await {
            Some(project) => print_json(&project)?,
            None => {
                eprintln!("Project not found.");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Open { path } => print_json(&site.load(&path).await)?,
        Command::ExampleConfig => {}
    }

    Ok(ExitCode::SUCCESS)
}
