use std::path::PathBuf;

use thiserror::Error;

/// Failures of the workbook/database layer. The extractors themselves never fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("no valid sheet selected (workbook has {available} sheets)")]
    NoSheetSelected { available: usize },

    #[error("sheet '{0}' has no 'ITEM DESC' or 'PRODUCT DESCRIPTION(EN)' column")]
    MissingDescriptionColumn(String),

    #[error("sheet '{0}' is empty")]
    EmptySheet(String),

    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
