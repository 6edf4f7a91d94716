//! Workbook access: sheet listing and selection, description-column discovery,
//! row reading, and (in `writer`) the augmented output workbook.

pub mod writer;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use itertools::Itertools;
use tracing::debug;

use crate::error::{Error, Result};

pub use writer::{output_columns, write_workbook, OUTPUT_COLUMNS};

/// One cell as read from the input, reduced to what the writer can reproduce.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Dates, durations and error cells, kept as their display text.
    Other(String),
}

impl Cell {
    /// Description text of this cell; anything that is not a string reads as empty.
    pub fn description(&self) -> &str {
        match self {
            Cell::Text(s) => s,
            _ => "",
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            other => Cell::Other(other.to_string()),
        }
    }
}

/// A sheet split into its header row and data rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub header: Vec<String>,
    /// Data rows, each padded to the header width.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Index of the first header equal (ignoring case) to one of `names`.
    pub fn description_column(&self, names: &[String]) -> Option<usize> {
        self.header.iter().position(|h| {
            let h = h.trim();
            !h.is_empty() && names.iter().any(|n| n.eq_ignore_ascii_case(h))
        })
    }

    fn from_rows<'a>(name: &str, mut rows: impl Iterator<Item = &'a [Data]>) -> Result<Self> {
        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| Error::EmptySheet(name.to_string()))?
            .iter()
            .map(|c| c.to_string())
            .collect();
        let width = header.len();
        let rows = rows
            .map(|row| {
                let mut cells: Vec<Cell> = row.iter().take(width).map(Cell::from).collect();
                cells.resize(width, Cell::Empty);
                cells
            })
            .filter(|cells| cells.iter().any(|c| *c != Cell::Empty))
            .collect();
        Ok(Table {
            name: name.to_string(),
            header,
            rows,
        })
    }
}

pub struct InputWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl InputWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let sheets = open_workbook_auto(path)?;
        Ok(InputWorkbook { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    pub fn read_sheet(&mut self, name: &str) -> Result<Table> {
        let range = self.sheets.worksheet_range(name)?;
        let table = Table::from_rows(name, range.rows())?;
        debug!(sheet = name, columns = table.header.len(), rows = table.rows.len(), "sheet read");
        Ok(table)
    }
}

/// Turn "1,3,5" into zero-based sheet indexes. Entries that are not numbers
/// or fall outside `1..=available` are dropped; repeats are kept once.
pub fn parse_selection(input: &str, available: usize) -> Vec<usize> {
    input
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= available)
        .map(|n| n - 1)
        .unique()
        .collect()
}

/// Zero-based indexes for an optional selection, defaulting to the first sheet.
pub fn select_sheets(selection: Option<&str>, available: usize) -> Result<Vec<usize>> {
    let picked = match selection {
        Some(input) => parse_selection(input, available),
        None if available > 0 => vec![0],
        None => Vec::new(),
    };
    if picked.is_empty() {
        return Err(Error::NoSheetSelected { available });
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn table(header: &[&str]) -> Table {
        Table {
            name: "Sheet1".into(),
            header: headers(header),
            rows: Vec::new(),
        }
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(parse_selection("1,3,5", 4), vec![0, 2]);
        assert_eq!(parse_selection(" 2 , x, 0, 2", 3), vec![1]);
        assert!(parse_selection("", 3).is_empty());
    }

    #[test]
    fn default_selection_is_first_sheet() {
        assert_eq!(select_sheets(None, 3).unwrap(), vec![0]);
        assert!(matches!(
            select_sheets(Some("9"), 3),
            Err(Error::NoSheetSelected { available: 3 })
        ));
        assert!(select_sheets(None, 0).is_err());
    }

    #[test]
    fn description_column_ignores_case() {
        let names = headers(&["ITEM DESC", "PRODUCT DESCRIPTION(EN)"]);
        assert_eq!(table(&["No", "Item Desc", "Qty"]).description_column(&names), Some(1));
        assert_eq!(table(&["product description(en)"]).description_column(&names), Some(0));
        assert_eq!(table(&["DESCRIPTION"]).description_column(&names), None);
    }

    #[test]
    fn rows_padded_and_blank_rows_skipped() {
        let raw = vec![
            vec![Data::String("ITEM DESC".into()), Data::String("QTY".into())],
            vec![Data::String("SSS 15GSM".into())],
            vec![Data::Empty, Data::Empty],
            vec![Data::Float(2.5), Data::Int(4), Data::String("extra".into())],
        ];
        let t = Table::from_rows("S", raw.iter().map(|r| r.as_slice())).unwrap();
        assert_eq!(t.header, headers(&["ITEM DESC", "QTY"]));
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec![Cell::Text("SSS 15GSM".into()), Cell::Empty]);
        assert_eq!(t.rows[1], vec![Cell::Float(2.5), Cell::Int(4)]);
    }

    #[test]
    fn sheet_without_rows_is_empty() {
        let raw: Vec<Vec<Data>> = Vec::new();
        assert!(matches!(
            Table::from_rows("S", raw.iter().map(|r| r.as_slice())),
            Err(Error::EmptySheet(_))
        ));
    }

    #[test]
    fn non_string_description_reads_empty() {
        assert_eq!(Cell::Float(3.0).description(), "");
        assert_eq!(Cell::Text("SMS".into()).description(), "SMS");
    }

    #[test]
    fn missing_input_reported() {
        let err = InputWorkbook::open(Path::new("does/not/exist.xlsx")).err().unwrap();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
