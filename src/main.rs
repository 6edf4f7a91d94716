use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use fabric_attrs::config::Settings;
use fabric_attrs::pipeline::{process_table, ProcessedSheet};
use fabric_attrs::workbook::{select_sheets, write_workbook, InputWorkbook};
use fabric_attrs::{db, extract_all, AddOnProfile, Error};

#[derive(Parser)]
#[command(name = "fabric-attrs", about = "Extract GSM, width, item and add-ons from fabric descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a workbook
    Sheets {
        input: PathBuf,
    },
    /// Process sheets and write the augmented workbook
    Process {
        input: PathBuf,
        /// Output workbook (default: settings `output`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Sheet numbers, e.g. "1,3,5" (default: first sheet)
        #[arg(short, long)]
        sheets: Option<String>,
        #[arg(long, value_enum)]
        profile: Option<AddOnProfile>,
        /// Also store every record in this SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Extract attributes from one description and print them as JSON
    Extract {
        text: String,
        #[arg(long, value_enum)]
        profile: Option<AddOnProfile>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("loading settings")?;
    info!(settings = ?settings, "settings loaded");

    match cli.command {
        Commands::Sheets { input } => {
            let workbook = InputWorkbook::open(&input)?;
            println!("Sheets in {}:", input.display());
            for (i, name) in workbook.sheet_names().iter().enumerate() {
                println!("{:>3}. {}", i + 1, name);
            }
        }
        Commands::Process {
            input,
            output,
            sheets,
            profile,
            db,
        } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&settings.output));
            let profile = profile.unwrap_or(settings.profile);
            let processed = process_workbook(&input, sheets.as_deref(), profile, &settings)?;
            if processed.is_empty() {
                println!("No sheet could be processed.");
                return Ok(());
            }

            write_workbook(&output, &processed)
                .with_context(|| format!("writing {}", output.display()))?;
            for sheet in &processed {
                println!(
                    "Sheet '{}': {} rows ({} with attributes)",
                    sheet.table.name,
                    sheet.results.len(),
                    sheet.matched_rows()
                );
            }
            println!("Saved {} sheets to {}", processed.len(), output.display());

            if let Some(path) = db {
                let saved = store(&path, &processed)?;
                println!("Stored {} records in {}", saved, path.display());
            }
        }
        Commands::Extract { text, profile } => {
            let record = extract_all(&text, profile.unwrap_or(settings.profile));
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

/// Read, select and extract; sheets missing a description column or rows are skipped.
fn process_workbook(
    input: &Path,
    selection: Option<&str>,
    profile: AddOnProfile,
    settings: &Settings,
) -> Result<Vec<ProcessedSheet>> {
    let mut workbook =
        InputWorkbook::open(input).with_context(|| format!("opening {}", input.display()))?;
    let names = workbook.sheet_names();
    let picked = select_sheets(selection, names.len())?;

    let mut processed = Vec::with_capacity(picked.len());
    for idx in picked {
        let name = &names[idx];
        let table = match workbook.read_sheet(name) {
            Ok(table) => table,
            Err(err @ Error::EmptySheet(_)) => {
                warn!(sheet = %name, "{}", err);
                continue;
            }
            Err(err) => return Err(err).with_context(|| format!("reading sheet '{}'", name)),
        };

        let pb = progress_bar(table.rows.len() as u64, name);
        let result = process_table(
            table,
            &settings.description_headers,
            profile,
            settings.chunk_size,
            |n| pb.inc(n as u64),
        );
        pb.finish_and_clear();

        match result {
            Ok(sheet) => processed.push(sheet),
            Err(err @ Error::MissingDescriptionColumn(_)) => warn!(sheet = %name, "{}", err),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(processed)
}

fn progress_bar(len: u64, sheet: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(sheet.to_string());
    pb
}

fn store(path: &Path, sheets: &[ProcessedSheet]) -> Result<usize> {
    let conn = db::connect(path).with_context(|| format!("opening database {}", path.display()))?;
    db::init_schema(&conn)?;
    let mut saved = 0;
    for sheet in sheets {
        saved += db::save_sheet(&conn, sheet)
            .with_context(|| format!("saving sheet '{}'", sheet.table.name))?;
    }
    Ok(saved)
}
