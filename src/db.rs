use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::pipeline::ProcessedSheet;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS extractions (
            id           INTEGER PRIMARY KEY,
            sheet        TEXT NOT NULL,
            row_index    INTEGER NOT NULL,
            description  TEXT NOT NULL,
            gsm          TEXT NOT NULL,
            width        TEXT NOT NULL,
            item         TEXT NOT NULL,
            item_match   TEXT NOT NULL,
            add_on       TEXT NOT NULL,
            processed_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_extractions_sheet ON extractions(sheet);
        ",
    )?;
    Ok(())
}

/// Store every record of `sheet` in one transaction. Returns the row count.
pub fn save_sheet(conn: &Connection, sheet: &ProcessedSheet) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO extractions
             (sheet, row_index, description, gsm, width, item, item_match, add_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for (idx, (row, r)) in sheet.table.rows.iter().zip(&sheet.results).enumerate() {
            stmt.execute(rusqlite::params![
                sheet.table.name,
                idx as i64 + 1,
                row[sheet.description_column].description(),
                r.gsm,
                r.width,
                r.item,
                r.item_match,
                r.add_on,
            ])?;
        }
    }
    tx.commit()?;
    Ok(sheet.results.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::AddOnProfile;
    use crate::pipeline::process_table;
    use crate::workbook::{Cell, Table};

    fn sheet() -> ProcessedSheet {
        let table = Table {
            name: "Orders".into(),
            header: vec!["ITEM DESC".into()],
            rows: vec![
                vec![Cell::Text("SMS 25GSM 160CM WHITE".into())],
                vec![Cell::Empty],
            ],
        };
        process_table(table, &["ITEM DESC".to_string()], AddOnProfile::Full, 500, |_| {}).unwrap()
    }

    #[test]
    fn saves_one_row_per_record() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(save_sheet(&conn, &sheet()).unwrap(), 2);

        let (gsm, width, item, add_on): (String, String, String, String) = conn
            .query_row(
                "SELECT gsm, width, item, add_on FROM extractions WHERE row_index = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!((gsm.as_str(), width.as_str(), item.as_str()), ("25", "160.00", "SMS"));
        assert_eq!(add_on, "White");

        let empty: String = conn
            .query_row("SELECT description FROM extractions WHERE row_index = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(empty, "");
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }
}
