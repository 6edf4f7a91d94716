use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use super::Cell;
use crate::error::Result;
use crate::extract::ExtractionResult;
use crate::pipeline::ProcessedSheet;

/// Columns appended to every output sheet, in this order.
pub const OUTPUT_COLUMNS: [&str; 4] = ["GSM", "WIDTH", "ITEM", "ADD ON"];

/// Source column order for the output: the description column first, then the
/// remaining columns. Input columns named like an output column are replaced.
pub fn output_columns(header: &[String], description_column: usize) -> Vec<usize> {
    let replaced = |h: &str| OUTPUT_COLUMNS.iter().any(|c| c.eq_ignore_ascii_case(h.trim()));
    std::iter::once(description_column)
        .chain(
            header
                .iter()
                .enumerate()
                .filter(|&(i, h)| i != description_column && !replaced(h))
                .map(|(i, _)| i),
        )
        .collect()
}

fn result_values(r: &ExtractionResult) -> [&str; 4] {
    [r.gsm.as_str(), r.width.as_str(), r.item.as_str(), r.add_on.as_str()]
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) | Cell::Other(s) => {
            ws.write_string(row, col, s)?;
        }
        Cell::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Cell::Float(x) => {
            ws.write_number(row, col, *x)?;
        }
        Cell::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn write_sheet(ws: &mut Worksheet, sheet: &ProcessedSheet, bold: &Format) -> Result<()> {
    ws.set_name(&sheet.table.name)?;
    let columns = output_columns(&sheet.table.header, sheet.description_column);

    let header = columns
        .iter()
        .map(|&i| sheet.table.header[i].as_str())
        .chain(OUTPUT_COLUMNS);
    for (col, name) in header.enumerate() {
        ws.write_string_with_format(0, col as u16, name, bold)?;
    }

    for (idx, (row, result)) in sheet.table.rows.iter().zip(&sheet.results).enumerate() {
        let out_row = idx as u32 + 1;
        for (col, &src) in columns.iter().enumerate() {
            write_cell(ws, out_row, col as u16, &row[src])?;
        }
        for (offset, value) in result_values(result).iter().enumerate() {
            ws.write_string(out_row, (columns.len() + offset) as u16, *value)?;
        }
    }
    Ok(())
}

/// Write every processed sheet into one `.xlsx` workbook at `path`.
pub fn write_workbook(path: &Path, sheets: &[ProcessedSheet]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        write_sheet(ws, sheet, &bold)?;
    }
    workbook.save(path)?;
    info!(path = %path.display(), sheets = sheets.len(), "workbook written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn description_moves_first() {
        let h = header(&["NO", "QTY", "ITEM DESC", "PRICE"]);
        assert_eq!(output_columns(&h, 2), vec![2, 0, 1, 3]);
    }

    #[test]
    fn written_workbook_reads_back() {
        use crate::extract::AddOnProfile;
        use crate::pipeline::process_table;
        use crate::workbook::{InputWorkbook, Table};

        let table = Table {
            name: "Rolls".into(),
            header: header(&["NO", "ITEM DESC", "GSM"]),
            rows: vec![
                vec![Cell::Int(1), Cell::Text("SSS 15GSM WIDTH: 1600MM BLUE".into()), Cell::Empty],
                vec![Cell::Int(2), Cell::Text("COTTON TOWEL".into()), Cell::Bool(true)],
            ],
        };
        let sheet =
            process_table(table, &header(&["ITEM DESC"]), AddOnProfile::Full, 500, |_| {}).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_workbook(&path, &[sheet]).unwrap();

        let mut input = InputWorkbook::open(&path).unwrap();
        assert_eq!(input.sheet_names(), vec!["Rolls"]);
        let back = input.read_sheet("Rolls").unwrap();
        assert_eq!(back.header, header(&["ITEM DESC", "NO", "GSM", "WIDTH", "ITEM", "ADD ON"]));
        assert_eq!(back.rows[0][1], Cell::Float(1.0));
        assert_eq!(
            back.rows[0][2..],
            [
                Cell::Text("15".into()),
                Cell::Text("160.00".into()),
                Cell::Text("SB".into()),
                Cell::Text("Blue".into()),
            ]
        );
        assert_eq!(back.rows[1][3], Cell::Text("N/A".into()));
        assert_eq!(back.rows[1][5], Cell::Text("-".into()));
    }

    #[test]
    fn existing_output_columns_are_replaced() {
        let h = header(&["ITEM DESC", "gsm", "Add On", "QTY"]);
        assert_eq!(output_columns(&h, 0), vec![0, 3]);
    }
}
