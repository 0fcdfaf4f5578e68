use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use folio::config;
use folio::supabase::{Query, RowService, SupabaseClient};

#[derive(Parser, Debug)]
#[command(about = "Print raw rows from a store table, before any parsing")]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Table to read (e.g. writing_posts, categories, post_categories, projects)
    #[arg(long)]
    table: String,

    /// PostgREST select list
    #[arg(long, default_value = "*")]
    select: String,

    /// Maximum number of rows
    #[arg(long, default_value = "5")]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let client = SupabaseClient::from_config(&cfg)?;

    let query = Query::select(args.select.as_str()).limit(args.limit);
    let rows = client.fetch_rows(&args.table, &query).await?;
    println!("Table: {} ({} rows)", args.table, rows.len());
    for row in rows {
        println!("{}", serde_json::to_string_pretty(&row)?);
    }
    Ok(())
}
