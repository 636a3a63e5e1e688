//! tabcmp CLI
//!
//! Command-line tool for comparing two CSV extracts joined on key columns.

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tabcmp_core::{
    compare_files, parse_column_list, parse_delimiter, CompareOptions, ProfileFile, Report,
    ValuePolicy, DEFAULT_PROFILE_FILE,
};

#[derive(Parser)]
#[command(name = "tabcmp")]
#[command(about = "Compare two CSV files with join and exclude columns", long_about = None)]
#[command(version)]
struct Cli {
    /// First (left) CSV file
    file1: PathBuf,

    /// Second (right) CSV file
    file2: PathBuf,

    /// File type as defined in the profile file
    #[arg(long = "type", conflicts_with_all = ["join_cols", "exclude_cols", "sep"])]
    file_type: Option<String>,

    /// Profile file used to resolve --type
    #[arg(long, default_value = DEFAULT_PROFILE_FILE)]
    config: PathBuf,

    /// Comma-separated list of join columns
    #[arg(long, required_unless_present = "file_type")]
    join_cols: Option<String>,

    /// Comma-separated list of columns to exclude from comparison
    #[arg(long)]
    exclude_cols: Option<String>,

    /// CSV separator (single character, or \t for tab)
    #[arg(long)]
    sep: Option<String>,

    /// Value comparison policy: "exact" (raw text) or "typed" (1 == 1.0)
    #[arg(long, default_value = "exact")]
    policy: ValuePolicy,

    /// Where to write up to 10 differences per column (JSON)
    #[arg(short, long, default_value = "column_differences.json")]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the level picked from the flags
    env_logger::Builder::new()
        .filter_level(log_level(&cli))
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> tabcmp_core::Result<()> {
    let options = resolve_options(&cli)?.policy(cli.policy);
    log::debug!(
        "join on {:?}, excluding {:?}, delimiter {:?}, {} values",
        options.join_cols,
        options.exclude_cols,
        options.delimiter as char,
        options.policy
    );

    let report = compare_files(&cli.file1, &cli.file2, &options)?;

    print_report(&report)?;
    write_column_differences(&report, &cli.output)?;
    log::info!("column differences written to {}", cli.output.display());

    Ok(())
}

fn log_level(cli: &Cli) -> log::LevelFilter {
    if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}

/// Build run options from either a named profile or the explicit flags
fn resolve_options(cli: &Cli) -> tabcmp_core::Result<CompareOptions> {
    if let Some(file_type) = &cli.file_type {
        let profiles = ProfileFile::load(&cli.config)?;
        return profiles.get(file_type)?.to_options();
    }

    let join_cols = cli
        .join_cols
        .as_deref()
        .map(parse_column_list)
        .unwrap_or_default();
    let exclude_cols = cli
        .exclude_cols
        .as_deref()
        .map(parse_column_list)
        .unwrap_or_default();
    let delimiter = match &cli.sep {
        Some(sep) => parse_delimiter(sep)?,
        None => tabcmp_core::DEFAULT_DELIMITER,
    };

    Ok(CompareOptions::new(join_cols)
        .exclude(exclude_cols)
        .delimiter(delimiter))
}

fn print_report(report: &Report) -> tabcmp_core::Result<()> {
    println!("Total rows compared: {}", report.total);
    println!("Rows with all compared columns matching: {}", report.matched);
    println!("Rows with differences or unmatched: {}", report.unmatched);
    println!(
        "  differing: {}, left only: {}, right only: {}",
        report.differing, report.left_only, report.right_only
    );

    if !report.left_only_columns.is_empty() {
        println!(
            "\nColumns only in first file (not compared): {}",
            report.left_only_columns.join(", ")
        );
    }
    if !report.right_only_columns.is_empty() {
        println!(
            "\nColumns only in second file (not compared): {}",
            report.right_only_columns.join(", ")
        );
    }

    println!("\nColumn difference summary:");
    for column in &report.compare_columns {
        match report.diff_count(column) {
            0 => println!("Column '{}': always the same", column),
            n => println!("Column '{}': {} differences", column, n),
        }
    }

    if !report.differences.is_empty() {
        println!("\n{}", differences_heading(report));
        for item in &report.differences {
            println!("{}", serde_json::to_string(item)?);
        }
    }

    Ok(())
}

/// Heading for the row difference list, which holds at most `row_limit`
/// of the `unmatched` rows
fn differences_heading(report: &Report) -> String {
    format!(
        "Differences (showing {} of {}):",
        report.differences.len(),
        report.unmatched
    )
}

fn write_column_differences(report: &Report, output: &Path) -> tabcmp_core::Result<()> {
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);

    let json = serde_json::to_string_pretty(&report.column_differences)?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabcmp_core::{compare_tables, parse_csv_str};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("tabcmp").chain(args.iter().copied()))
    }

    #[test]
    fn test_join_cols_or_type_required() {
        assert!(parse(&["a.csv", "b.csv"]).is_err());
        assert!(parse(&["a.csv", "b.csv", "--join-cols", "id"]).is_ok());
        assert!(parse(&["a.csv", "b.csv", "--type", "orders"]).is_ok());
    }

    #[test]
    fn test_type_conflicts_with_explicit_columns() {
        assert!(parse(&["a.csv", "b.csv", "--type", "orders", "--join-cols", "id"]).is_err());
        assert!(parse(&["a.csv", "b.csv", "--type", "orders", "--sep", ";"]).is_err());
    }

    #[test]
    fn test_resolve_explicit_flags() {
        let cli = parse(&[
            "a.csv",
            "b.csv",
            "--join-cols",
            " region , id ",
            "--exclude-cols",
            "ts,",
            "--sep",
            "\\t",
            "--policy",
            "typed",
        ])
        .unwrap();
        assert_eq!(cli.policy, ValuePolicy::Typed);

        let options = resolve_options(&cli).unwrap();
        assert_eq!(options.join_cols, vec!["region", "id"]);
        assert_eq!(options.exclude_cols, vec!["ts"]);
        assert_eq!(options.delimiter, b'\t');
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(parse(&["a.csv", "b.csv", "--join-cols", "id", "--policy", "fuzzy"]).is_err());
    }

    #[test]
    fn test_verbose_selects_debug_level() {
        let cli = parse(&["a.csv", "b.csv", "--join-cols", "id", "--verbose"]).unwrap();
        assert_eq!(log_level(&cli), log::LevelFilter::Debug);

        let cli = parse(&["a.csv", "b.csv", "--join-cols", "id", "-v"]).unwrap();
        assert_eq!(log_level(&cli), log::LevelFilter::Debug);

        let cli = parse(&["a.csv", "b.csv", "--join-cols", "id"]).unwrap();
        assert_eq!(log_level(&cli), log::LevelFilter::Info);
    }

    #[test]
    fn test_differences_heading_shows_shown_and_total() {
        let report = compare_tables(
            &parse_csv_str("id,v\n1,a\n2,a\n3,a\n", "left.csv", b',').unwrap(),
            &parse_csv_str("id,v\n1,x\n2,y\n3,z\n", "right.csv", b',').unwrap(),
            &CompareOptions::new(vec!["id".to_string()]).limits(10, 2),
        )
        .unwrap();

        assert_eq!(report.differences.len(), 2);
        assert_eq!(report.unmatched, 3);
        assert_eq!(differences_heading(&report), "Differences (showing 2 of 3):");
    }

    #[test]
    fn test_missing_profile_file() {
        let cli = parse(&[
            "a.csv",
            "b.csv",
            "--type",
            "orders",
            "--config",
            "/nonexistent/file_types_config.json",
        ])
        .unwrap();
        assert!(resolve_options(&cli).is_err());
    }
}
