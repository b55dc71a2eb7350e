//! Batch colorizer for packing placement tables.
//!
//! Walks the results directory and appends the derived `Color` column to
//! every `item_placements_*.csv` in place, printing a per-file report of
//! the colors assigned. Takes no flags; the directory defaults to
//! `Results` next to the invocation location and can be overridden with
//! `PACKVIZ_RESULTS_DIR`.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Result};
use packviz::augment::{augment_file, AugmentError};
use packviz::results::placement_files;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    process::exit(match run() {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err:#}");
            1
        }
    });
}

fn run() -> Result<()> {
    let results_dir = PathBuf::from(
        env::var("PACKVIZ_RESULTS_DIR").unwrap_or_else(|_| "Results".to_string()),
    );
    if !results_dir.is_dir() {
        bail!("results directory {} not found", results_dir.display());
    }
    let files = placement_files(&results_dir)?;
    if files.is_empty() {
        bail!(
            "no item_placements_*.csv files found in {}",
            results_dir.display()
        );
    }

    println!("Found {} file(s) to process:\n", files.len());
    for name in &files {
        println!("Processing: {name}");
        colorize(&results_dir.join(name), name);
        println!();
    }
    Ok(())
}

/// Augments one file and prints its report.
///
/// Per-table conditions are reported and do not abort the batch; only the
/// caller's inability to find any work at all is fatal.
fn colorize(path: &Path, name: &str) {
    match augment_file(path) {
        Ok(outcome) => {
            println!("[OK] Added colors to {}", path.display());
            println!("  - {} items", outcome.rows);
            println!("  - {} unique ProductIds", outcome.colors.len());
            let mut colors = outcome.colors;
            colors.sort();
            for (id, color) in &colors {
                println!("    ProductId {id}: {color}");
            }
        }
        Err(AugmentError::AlreadyAugmented) => {
            println!("Color column already exists in {}", path.display());
        }
        Err(err) => {
            log::warn!("skipping {name}: {err}");
        }
    }
}
