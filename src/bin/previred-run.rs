//! CLI tool to correct Previred declaration files in batch.

use clap::Parser;
use previred_rs::{FileOutcome, Rates, RunContext, ScheduleTable, process_dir};
use std::path::PathBuf;
use std::process;

/// Correct fixed-width Previred declaration files against a worker
/// schedule table.
///
/// Reads every .txt file in the input directory, recomputes the target
/// fields of each main line, and writes corrected files of the same name
/// to the output directory. Originals are never modified. A file with an
/// unresolved worker identifier is skipped whole; the rest of the batch
/// still runs.
#[derive(Parser)]
#[command(name = "previred-run")]
struct Cli {
    /// Directory containing the fixed-width .txt declaration files
    input: PathBuf,

    /// Worker schedule table (identifier;code rows, semicolon-separated)
    #[arg(short, long, default_value = "jornadas/jornadasTrabajadores.csv")]
    schedules: PathBuf,

    /// Output directory (created if absent)
    #[arg(short, long, default_value = "archivos_modificados")]
    output: PathBuf,

    /// Monthly AFP taxable cap in pesos, e.g. 2460000 or 2,460,000
    #[arg(short, long, value_parser = parse_pesos)]
    cap: u64,

    /// Pension contribution rate applied to capped taxable income
    #[arg(long, default_value_t = Rates::PENSION_RATE)]
    pension_rate: f64,

    /// Life-expectancy contribution rate
    #[arg(long, default_value_t = Rates::LIFE_EXPECTANCY_RATE)]
    life_expectancy_rate: f64,

    /// Show schedule and per-file detail on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Accept thousands separators the way operators type amounts: 2460000,
/// 2,460,000 and 2.460.000 all parse to the same cap.
fn parse_pesos(s: &str) -> Result<u64, String> {
    let digits: String = s.chars().filter(|c| *c != ',' && *c != '.').collect();
    match digits.parse() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("not a positive peso amount: {s}")),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let table = match ScheduleTable::load(&cli.schedules) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error loading schedule table: {e}");
            process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!("Schedules: {} workers from {}", table.len(), cli.schedules.display());
        eprintln!("Cap:       {} pesos", cli.cap);
        eprintln!("Input:     {}", cli.input.display());
        eprintln!("Output:    {}", cli.output.display());
    }

    let ctx = RunContext {
        table,
        rates: Rates {
            taxable_cap: cli.cap,
            pension_rate: cli.pension_rate,
            life_expectancy_rate: cli.life_expectancy_rate,
        },
    };

    let reports = match process_dir(&cli.input, &cli.output, &ctx) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Error processing {}: {e}", cli.input.display());
            process::exit(1);
        }
    };

    if reports.is_empty() {
        eprintln!("No .txt files found in {}", cli.input.display());
        process::exit(1);
    }

    let mut failures = 0;
    for report in &reports {
        let name = report.input.display();
        match &report.outcome {
            FileOutcome::Success { records, rewritten } => {
                eprintln!("{name}: {records} records, {rewritten} rewritten");
            }
            FileOutcome::Failure { record, error } => {
                failures += 1;
                match record {
                    Some(idx) => eprintln!("{name}: record {idx}: {error} (file skipped)"),
                    None => eprintln!("{name}: {error} (file skipped)"),
                }
            }
        }
    }

    eprintln!(
        "Processed {} files, {} failed, output: {}",
        reports.len(),
        failures,
        cli.output.display()
    );
    if failures > 0 {
        process::exit(1);
    }
}
