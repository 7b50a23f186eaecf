//! Matchup Matrix CLI
//!
//! Builds slug-keyed win rate matrices from exported matchup tables.
//!
//! Usage:
//!   matchup-matrix pauper premodern
//!   matchup-matrix --repo-root ../decks --rows ./exports/{format}.json pauper
//!   matchup-matrix --prune-existing --dry-run
//!
//! Environment:
//!   MATCHUP_REPO_ROOT - Repository root holding data/<format>/
//!   MATCHUP_ROWS      - Rows file override, `{format}` is substituted
//!   RUST_LOG          - Log filter (default: matchup_matrix=info)

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use matchup_matrix::config::{discover_formats, find_repo_root, FormatConfig};
use matchup_matrix::runner::{fetched_at_now, prune_existing, run_build};
use matchup_matrix::sources::JsonRowsFile;

#[derive(Parser, Debug)]
#[command(name = "matchup-matrix")]
#[command(about = "Generate slug-keyed win rate matrices from matchup tables")]
struct Args {
    /// Formats to generate (default: every format with an alias map)
    formats: Vec<String>,

    /// Repository root containing data/<format>/mtgdecks-name-to-slug.json
    #[arg(long, env = "MATCHUP_REPO_ROOT")]
    repo_root: Option<PathBuf>,

    /// Exported table rows (JSON array of arrays); `{format}` is substituted
    #[arg(long, env = "MATCHUP_ROWS")]
    rows: Option<String>,

    /// Parse and validate but do not write output files
    #[arg(long)]
    dry_run: bool,

    /// Prune mirror matchup cells from existing output files without fetching
    #[arg(long)]
    prune_existing: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchup_matrix=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let repo_root = match args.repo_root {
        Some(root) => root,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            find_repo_root(&cwd)
                .ok_or_else(|| anyhow!("Could not locate repository root from {:?}", cwd))?
        }
    };

    let formats = if args.formats.is_empty() {
        discover_formats(&repo_root)
    } else {
        args.formats
    };

    let fetched_at = fetched_at_now();
    info!(root = %repo_root.display(), ?formats, dry_run = args.dry_run, "starting");

    for format in &formats {
        let mut config = FormatConfig::load(&repo_root, format)
            .with_context(|| format!("Failed to load config for {}", format))?;
        if let Some(template) = &args.rows {
            config = config.with_rows_template(template);
        }

        if args.prune_existing {
            let report = prune_existing(&config, args.dry_run)
                .with_context(|| format!("Failed to prune {}", format))?;
            println!("{}", report.summary(true));
            continue;
        }

        let rows_source = JsonRowsFile::new(&config.rows_path);
        let report = run_build(&config, &rows_source, &fetched_at, args.dry_run)
            .with_context(|| format!("Failed to build matrix for {}", format))?;
        println!("{}", report.summary(false));
    }

    Ok(())
}
