//! Runs the extractors over every row of a sheet.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::extract::{extract_all, AddOnProfile, ExtractionResult, NOT_FOUND};
use crate::workbook::{Cell, Table};

/// A sheet with one extraction result per data row, in row order.
#[derive(Debug, Clone)]
pub struct ProcessedSheet {
    pub table: Table,
    pub description_column: usize,
    pub results: Vec<ExtractionResult>,
}

impl ProcessedSheet {
    /// Rows where at least one of GSM, WIDTH or ITEM was found.
    pub fn matched_rows(&self) -> usize {
        self.results
            .iter()
            .filter(|r| [&r.gsm, &r.width, &r.item].iter().any(|v| *v != NOT_FOUND))
            .count()
    }
}

#[cfg(feature = "rayon")]
fn extract_chunk(rows: &[Vec<Cell>], column: usize, profile: AddOnProfile) -> Vec<ExtractionResult> {
    rows.par_iter()
        .map(|row| extract_all(row[column].description(), profile))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn extract_chunk(rows: &[Vec<Cell>], column: usize, profile: AddOnProfile) -> Vec<ExtractionResult> {
    rows.iter()
        .map(|row| extract_all(row[column].description(), profile))
        .collect()
}

/// Extract every row of `table`, reporting finished row counts to `on_progress`.
///
/// The description column is the first header matching one of `headers`.
pub fn process_table(
    table: Table,
    headers: &[String],
    profile: AddOnProfile,
    chunk_size: usize,
    mut on_progress: impl FnMut(usize),
) -> Result<ProcessedSheet> {
    let description_column = table
        .description_column(headers)
        .ok_or_else(|| Error::MissingDescriptionColumn(table.name.clone()))?;
    debug!(
        sheet = %table.name,
        column = %table.header[description_column],
        rows = table.rows.len(),
        "processing sheet"
    );

    let mut results = Vec::with_capacity(table.rows.len());
    for chunk in table.rows.chunks(chunk_size.max(1)) {
        results.extend(extract_chunk(chunk, description_column, profile));
        on_progress(chunk.len());
    }

    let sheet = ProcessedSheet {
        table,
        description_column,
        results,
    };
    info!(
        sheet = %sheet.table.name,
        rows = sheet.results.len(),
        matched = sheet.matched_rows(),
        "sheet processed"
    );
    Ok(sheet)
}
