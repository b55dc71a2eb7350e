//! Adds the derived `Color` column to placement tables.
//!
//! Augmentation appends exactly one trailing field to a table, populated
//! from [`product_color`] with one engine call per distinct `ProductId`.
//! A second run detects the existing column and reports it instead of
//! appending a duplicate, so augmenting is idempotent at the file level.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::color::product_color;
use crate::table::Table;

/// Name of the field holding the product identifier.
pub const PRODUCT_ID_COLUMN: &str = "ProductId";
/// Name of the field the augmentation appends.
pub const COLOR_COLUMN: &str = "Color";

/// Why one table could not be augmented.
///
/// The first two variants are per-table conditions: the table (and its
/// file) is left untouched and the rest of the batch continues.
#[derive(Debug, thiserror::Error)]
pub enum AugmentError {
    /// The schema already carries a `Color` field.
    #[error("Color column already exists")]
    AlreadyAugmented,
    /// The table cannot be colored as-is.
    #[error("malformed table: {0}")]
    MalformedInput(String),
    /// Reading or writing the table file failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Counts and colors reported after augmenting one table.
#[derive(Debug)]
pub struct AugmentOutcome {
    /// Number of data rows that received a color.
    pub rows: usize,
    /// Distinct identifier/color pairs, in order of first appearance.
    pub colors: Vec<(String, String)>,
}

/// Appends a `Color` field to every row of `table`.
///
/// All rows sharing a `ProductId` receive the identical color, resolved
/// before any row is touched so that every row observes the same mapping.
/// Field order, row order and all original values are preserved; the new
/// field is appended after the last original field. On error the table is
/// left exactly as it was.
pub fn augment(table: &mut Table) -> Result<AugmentOutcome, AugmentError> {
    if table.column_index(COLOR_COLUMN).is_some() {
        return Err(AugmentError::AlreadyAugmented);
    }
    let product_id = table.column_index(PRODUCT_ID_COLUMN).ok_or_else(|| {
        AugmentError::MalformedInput(format!("no {PRODUCT_ID_COLUMN} column"))
    })?;
    if table.rows.is_empty() {
        return Err(AugmentError::MalformedInput("no data rows".to_string()));
    }

    let mut colors: Vec<(String, String)> = Vec::new();
    let mut by_id: HashMap<String, String> = HashMap::new();
    let mut appended: Vec<String> = Vec::with_capacity(table.rows.len());
    for (n, row) in table.rows.iter().enumerate() {
        let id = row.get(product_id).ok_or_else(|| {
            AugmentError::MalformedInput(format!(
                "row {} has no {PRODUCT_ID_COLUMN} value",
                n + 1
            ))
        })?;
        let color = match by_id.get(id) {
            Some(color) => color.clone(),
            None => {
                let color = product_color(id);
                by_id.insert(id.clone(), color.clone());
                colors.push((id.clone(), color.clone()));
                color
            }
        };
        appended.push(color);
    }

    table.columns.push(COLOR_COLUMN.to_string());
    for (row, color) in table.rows.iter_mut().zip(appended) {
        row.push(color);
    }

    Ok(AugmentOutcome {
        rows: table.rows.len(),
        colors,
    })
}

/// Augments one placement file in place.
///
/// The file is read whole, augmented in memory and rewritten with the
/// original fields plus the trailing `Color` field; there is no partial or
/// streaming write. On a per-table condition the file keeps its previous
/// contents.
pub fn augment_file(path: &Path) -> Result<AugmentOutcome, AugmentError> {
    let text = fs::read_to_string(path)?;
    let mut table = Table::parse(&text);
    let outcome = augment(&mut table)?;
    fs::write(path, table.to_delimited())?;
    Ok(outcome)
}
