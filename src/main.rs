mod db;
mod parser;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;

use parser::dialect::Dialect;
use parser::{MissingPolicy, PipelineRecord, RowOutcome};

#[derive(Parser)]
#[command(name = "pngrb_ingest", about = "Pipeline authorization row parser and sheet ingester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse rows and report each outcome (nothing persisted)
    Parse {
        /// Row dialect: petroleum or gas
        #[arg(short, long)]
        dialect: Dialect,
        /// Input file, one row per line (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Parse the built-in sample rows instead of reading input
        #[arg(long)]
        sample: bool,
        /// Reject rows with missing fields instead of filling N/A
        #[arg(long)]
        strict: bool,
        /// Emit one JSON object per row
        #[arg(long)]
        json: bool,
    },
    /// Parse rows and append the successes to a sheet
    Ingest {
        #[arg(short, long)]
        dialect: Dialect,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        sample: bool,
        #[arg(long)]
        strict: bool,
        /// Destination sheet (default: the dialect's sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },
    /// Print a sheet's stored rows
    Show {
        sheet: String,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Row and reject counts per sheet
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { dialect, input, sample, strict, json } => {
            let rows = load_rows(input.as_deref(), sample, dialect)?;
            if rows.is_empty() {
                println!("No rows to parse.");
                return Ok(());
            }
            let outcomes = parser::parse_batch(&rows, dialect, policy(strict));
            if json {
                print_json(&outcomes)?;
            } else {
                print_outcomes(&outcomes);
            }
            Ok(())
        }
        Commands::Ingest { dialect, input, sample, strict, sheet } => {
            let rows = load_rows(input.as_deref(), sample, dialect)?;
            if rows.is_empty() {
                println!("No rows to ingest.");
                return Ok(());
            }
            let sheet = sheet.unwrap_or_else(|| dialect.sheet().to_string());
            ingest(&rows, dialect, policy(strict), &sheet)
        }
        Commands::Show { sheet, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_rows(&conn, &sheet, limit)?;
            if rows.is_empty() {
                println!("Sheet '{}' is empty.", sheet);
                return Ok(());
            }
            print_sheet(&rows);
            println!("\n{} rows in '{}'", rows.len(), sheet);
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let stats = db::get_stats(&conn)?;
            if stats.is_empty() {
                println!("No sheets yet. Run 'ingest' first.");
                return Ok(());
            }
            println!("{:<24} | {:>6} | {:>7}", "Sheet", "Rows", "Rejects");
            println!("{}", "-".repeat(43));
            for s in &stats {
                println!("{:<24} | {:>6} | {:>7}", s.sheet, s.rows, s.rejects);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn policy(strict: bool) -> MissingPolicy {
    if strict {
        MissingPolicy::Reject
    } else {
        MissingPolicy::Placeholder
    }
}

fn load_rows(input: Option<&Path>, sample: bool, dialect: Dialect) -> anyhow::Result<Vec<String>> {
    if sample {
        Ok(source::sample_rows(dialect).iter().map(|s| s.to_string()).collect())
    } else {
        source::read_lines(input)
    }
}

/// Parse in chunks, then append successes to the sheet in input order and
/// log the rest to the reject table.
fn ingest(
    rows: &[String],
    dialect: Dialect,
    policy: MissingPolicy,
    sheet: &str,
) -> anyhow::Result<()> {
    let conn = db::connect()?;
    db::init_schema(&conn)?;

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let mut records: Vec<PipelineRecord> = Vec::with_capacity(rows.len());
    let mut rejects: Vec<db::RejectRow> = Vec::new();

    for (chunk_no, chunk) in rows.chunks(500).enumerate() {
        let outcomes: Vec<_> = chunk
            .par_iter()
            .enumerate()
            .map(|(i, raw)| (chunk_no * 500 + i + 1, raw, parser::parse_row(raw, dialect, policy)))
            .collect();

        for (line_no, raw, result) in outcomes {
            match result {
                Ok(rec) => records.push(rec),
                Err(e) => {
                    warn!("line {}: {}", line_no, e);
                    rejects.push(db::RejectRow {
                        line_no: line_no as i64,
                        raw: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let report = db::append_records(&conn, sheet, dialect.headers(), &records)?;
    if !rejects.is_empty() {
        db::log_rejects(&conn, sheet, &rejects)?;
    }

    println!(
        "Appended {} rows to '{}' starting at row {}{}.",
        report.appended,
        sheet,
        report.start_row,
        if report.header_written { " (header written)" } else { "" },
    );
    if !rejects.is_empty() {
        println!("{} rows rejected (see the rejects table).", rejects.len());
    }
    Ok(())
}

fn print_outcomes(outcomes: &[RowOutcome]) {
    println!(
        "{:>4} | {:>5} | {:<22} | {:<16} | {:<10} | {:>7} | {:>7} | {:>7} | {:<24}",
        "#", "S.No", "Name", "Entity", "Date", "Len", "Cap", "OpLen", "States"
    );
    println!("{}", "-".repeat(120));

    let mut failed = 0usize;
    for o in outcomes {
        match &o.result {
            Ok(r) => println!(
                "{:>4} | {:>5} | {:<22} | {:<16} | {:<10} | {:>7} | {:>7} | {:>7} | {:<24}",
                o.line_no,
                r.serial_no,
                truncate(&r.name, 22),
                truncate(&r.entity, 16),
                r.authorized_on,
                r.authorized_length,
                r.authorized_capacity,
                r.operating_length,
                truncate(&r.jurisdictions, 24),
            ),
            Err(e) => {
                failed += 1;
                println!("{:>4} | {} ({})", o.line_no, e, truncate(&o.raw, 48));
            }
        }
    }

    println!("\n{} rows: {} parsed, {} failed", outcomes.len(), outcomes.len() - failed, failed);
}

fn print_json(outcomes: &[RowOutcome]) -> anyhow::Result<()> {
    for o in outcomes {
        let value = match &o.result {
            Ok(rec) => serde_json::json!({ "line": o.line_no, "record": rec }),
            Err(e) => serde_json::json!({ "line": o.line_no, "error": e.to_string(), "raw": o.raw }),
        };
        println!("{}", serde_json::to_string(&value)?);
    }
    Ok(())
}

fn print_sheet(rows: &[db::SheetRow]) {
    for row in rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| truncate(c, 20))
            .collect();
        println!("{:>4} | {}", row.row_no, cells.join(" | "));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
