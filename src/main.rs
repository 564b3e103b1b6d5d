#![warn(
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `SheetFind` - Find spreadsheets by sheet name or cell content.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use clap_cargo::style::CLAP_STYLING;
use sheetfind::config::{SearchConfig, parse_size_threshold};
use sheetfind::discovery::discover;
use sheetfind::error::Result;
use sheetfind::launch;
use sheetfind::policy::{SearchPolicy, is_affirmative};
use sheetfind::report::Report;
use sheetfind::scanner::WorkbookScanner;
use sheetfind::types::{CandidateFile, DEFAULT_SIZE_THRESHOLD_MB};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments for `SheetFind`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    /// Terms to find, separated by ","
    #[arg(long, required = true, value_delimiter = ',')]
    search: Vec<String>,

    /// Also search cell values when sheet names are not enough
    #[arg(long)]
    cells: bool,

    /// Size in MB above which you are asked before cells are searched
    #[arg(long, value_name = "MB", default_value_t = DEFAULT_SIZE_THRESHOLD_MB, value_parser = size_threshold)]
    size: f64,

    /// Search through all subdirectories
    #[arg(long)]
    subdir: bool,

    /// Do not offer to open a file afterwards
    #[arg(long)]
    no_open: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Directory to search in
    #[arg(default_value = ".")]
    dir: PathBuf,
}

fn size_threshold(input: &str) -> std::result::Result<f64, String> {
    parse_size_threshold(input).map_err(|e| e.to_string())
}

/// Read one line from stdin without its line ending
fn read_answer() -> String {
    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        warn!(error = %e, "failed to read answer");
    }
    line.trim_end_matches(['\r', '\n']).to_owned()
}

fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();
    read_answer()
}

/// Ask on the terminal whether a large file should still be scanned
fn confirm_large_file(file: &CandidateFile) -> bool {
    println!(
        "The size of {} is {} MB, the search for sheet names was done\nbut it might take a long \
         time to search for values in cells.",
        file.path().display(),
        file.size_mb()
    );
    is_affirmative(&prompt("If you still want to process this file, type 'y' else press any key:"))
}

/// Offer to open one of the files in its default application
fn offer_launch(files: &[CandidateFile]) {
    let answer =
        prompt("To open one of those file, type its id (Any other input will stop the script): ");
    match launch::select(files, &answer) {
        Some(file) => match open::that(file.path()) {
            Ok(()) => println!("File is being launched"),
            Err(e) => eprintln!("Error: Failed to open {}: {e}", file.path().display()),
        },
        None => println!("No file with the id: {answer}\nExiting..."),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SearchConfig::new(cli.search, cli.cells, cli.size)?;
    debug!(?config, dir = %cli.dir.display(), subdir = cli.subdir, "starting search");

    let mut files = discover(&cli.dir, cli.subdir)?;
    debug!(count = files.len(), "spreadsheets discovered");

    let mut policy = SearchPolicy::new(config, confirm_large_file, WorkbookScanner::new());
    policy.run(&mut files);

    let report = Report::new(policy.config().targets(), &files);
    report.render(&mut io::stdout().lock())?;

    if !cli.no_open && !report.is_empty() {
        offer_launch(&files);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
