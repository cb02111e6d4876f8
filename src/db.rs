use anyhow::Result;
use rusqlite::Connection;

use crate::parser::PipelineRecord;

const DB_PATH: &str = "data/pipelines.sqlite";

pub fn connect() -> Result<Connection> {
    std::fs::create_dir_all("data")?;
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sheet_rows (
            id          INTEGER PRIMARY KEY,
            sheet       TEXT NOT NULL,
            row_no      INTEGER NOT NULL,
            c1 TEXT NOT NULL, c2 TEXT NOT NULL, c3 TEXT NOT NULL,
            c4 TEXT NOT NULL, c5 TEXT NOT NULL, c6 TEXT NOT NULL,
            c7 TEXT NOT NULL, c8 TEXT NOT NULL, c9 TEXT NOT NULL,
            appended_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(sheet, row_no)
        );
        CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet ON sheet_rows(sheet);

        CREATE TABLE IF NOT EXISTS rejects (
            id          INTEGER PRIMARY KEY,
            sheet       TEXT NOT NULL,
            line_no     INTEGER NOT NULL,
            raw         TEXT NOT NULL,
            reason      TEXT NOT NULL,
            rejected_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_rejects_sheet ON rejects(sheet);
        ",
    )?;
    Ok(())
}

// ── Appending ──

pub struct AppendReport {
    /// First row written by this batch: one past the occupied row count.
    pub start_row: i64,
    pub appended: usize,
    pub header_written: bool,
}

/// Append records to a sheet in input order. An empty sheet gets the header
/// as its first row. The whole batch goes through one transaction.
pub fn append_records(
    conn: &Connection,
    sheet: &str,
    headers: &[&str; 9],
    records: &[PipelineRecord],
) -> Result<AppendReport> {
    let tx = conn.unchecked_transaction()?;
    let occupied: i64 =
        tx.query_row("SELECT COUNT(*) FROM sheet_rows WHERE sheet = ?1", [sheet], |r| r.get(0))?;
    let start_row = occupied + 1;
    let mut next = start_row;
    let mut header_written = false;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO sheet_rows (sheet, row_no, c1, c2, c3, c4, c5, c6, c7, c8, c9)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        if occupied == 0 {
            stmt.execute(rusqlite::params![
                sheet, next, headers[0], headers[1], headers[2], headers[3], headers[4],
                headers[5], headers[6], headers[7], headers[8],
            ])?;
            next += 1;
            header_written = true;
        }
        for rec in records {
            let v = rec.values();
            stmt.execute(rusqlite::params![
                sheet, next, v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8],
            ])?;
            next += 1;
        }
    }
    tx.commit()?;
    Ok(AppendReport { start_row, appended: records.len(), header_written })
}

// ── Rejects ──

pub struct RejectRow {
    pub line_no: i64,
    pub raw: String,
    pub reason: String,
}

pub fn log_rejects(conn: &Connection, sheet: &str, rows: &[RejectRow]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx
            .prepare("INSERT INTO rejects (sheet, line_no, raw, reason) VALUES (?1, ?2, ?3, ?4)")?;
        for r in rows {
            stmt.execute(rusqlite::params![sheet, r.line_no, r.raw, r.reason])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Reading back ──

pub struct SheetRow {
    pub row_no: i64,
    pub cells: [String; 9],
}

pub fn fetch_rows(conn: &Connection, sheet: &str, limit: usize) -> Result<Vec<SheetRow>> {
    let mut stmt = conn.prepare(
        "SELECT row_no, c1, c2, c3, c4, c5, c6, c7, c8, c9
         FROM sheet_rows WHERE sheet = ?1 ORDER BY row_no LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![sheet, limit as i64], |row| {
            Ok(SheetRow {
                row_no: row.get(0)?,
                cells: [
                    row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?,
                    row.get(6)?, row.get(7)?, row.get(8)?, row.get(9)?,
                ],
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct SheetStat {
    pub sheet: String,
    pub rows: i64,
    pub rejects: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Vec<SheetStat>> {
    let mut stmt = conn.prepare(
        "SELECT sheet, SUM(rows), SUM(rejects) FROM (
             SELECT sheet, COUNT(*) AS rows, 0 AS rejects FROM sheet_rows GROUP BY sheet
             UNION ALL
             SELECT sheet, 0, COUNT(*) FROM rejects GROUP BY sheet
         )
         GROUP BY sheet ORDER BY sheet",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SheetStat { sheet: row.get(0)?, rows: row.get(1)?, rejects: row.get(2)? })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
