//! Discovery of placement result files.
//!
//! Both the colorizer and the server operate on the same set of files: the
//! `item_placements_*.csv` tables inside a results directory. Anything
//! else in that directory is ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

/// Filename prefix shared by all placement result files.
pub const PLACEMENT_PREFIX: &str = "item_placements_";
/// Filename suffix shared by all placement result files.
pub const PLACEMENT_SUFFIX: &str = ".csv";

/// Returns whether `name` names a placement result file.
pub fn is_placement_file(name: &str) -> bool {
    name.starts_with(PLACEMENT_PREFIX) && name.ends_with(PLACEMENT_SUFFIX)
}

/// Lists the placement result filenames in `dir`.
///
/// Filenames are sorted so batch runs process files in a stable order.
/// Non-files and names that do not match the pattern are skipped; a
/// directory that cannot be read is an error.
pub fn placement_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("cannot read results directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_placement_file(name) && entry.file_type()?.is_file() {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}
