//! # ridership-cli
//!
//! Command-line interface for the seasonal ridership dashboard.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use ridership_core::{DashboardConfig, LoadFailure, LoadPolicy};
use ridership_http::HttpSource;
use ridership_series::{aggregate_csv_path, ChartSeriesRecord, DashboardData, View};
use ridership_viz::{format_cell, render_dashboard};
use ridership_workbook::{write_workbook, FsSource, WorkbookLoader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// ridership - Seasonal subway ridership dashboard
#[derive(Parser)]
#[command(name = "ridership")]
#[command(author, version, about = "Seasonal subway ridership dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Load a workbook and print its dashboard views
    Show(ShowArgs),
    /// Aggregate a raw ridership CSV into the seasonal workbook
    Build(BuildArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Workbook to load (overrides the config file)
    #[arg(value_name = "WORKBOOK")]
    workbook: Option<String>,

    /// Fetch the workbook over HTTP relative to this base URL
    #[arg(long, value_name = "BASE")]
    url: Option<String>,

    /// YAML config file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// View to print
    #[arg(long, default_value = "all")]
    view: ViewArg,

    /// Output format (table, json, html)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Read timeout in seconds; 0 disables it
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Skip sheets that fail to parse instead of failing the load
    #[arg(long)]
    per_sheet: bool,
}

#[derive(Args)]
struct BuildArgs {
    /// Raw ridership CSV export
    #[arg(value_name = "CSV")]
    csv: PathBuf,

    /// Workbook to write
    #[arg(short = 'o', long = "output", value_name = "XLSX")]
    output: PathBuf,

    /// Keep only the N busiest stations per year (default: every station)
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Years to include, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [2023, 2024])]
    years: Vec<i32>,
}

/// Which dashboard views to print.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum ViewArg {
    /// Every view
    #[default]
    All,
    #[value(name = "2023")]
    Ridership2023,
    #[value(name = "2024")]
    Ridership2024,
    Comparison,
}

impl ViewArg {
    fn views(self) -> Vec<View> {
        match self {
            ViewArg::All => View::ALL.to_vec(),
            ViewArg::Ridership2023 => vec![View::Ridership2023],
            ViewArg::Ridership2024 => vec![View::Ridership2024],
            ViewArg::Comparison => vec![View::Comparison],
        }
    }
}

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Pretty table output (default)
    #[default]
    Table,
    /// JSON output
    Json,
    /// Standalone HTML dashboard
    Html,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match cli.command {
        Command::Show(args) => run_show(&args).await,
        Command::Build(args) => {
            run_build(&args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Config file values, then command-line overrides.
fn resolve_config(args: &ShowArgs) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(workbook) = &args.workbook {
        config.workbook.clone_from(workbook);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.per_sheet {
        config.load_policy = LoadPolicy::PerSheet;
    }

    Ok(config)
}

fn build_loader(config: &DashboardConfig, url: Option<&str>) -> Result<WorkbookLoader> {
    match url {
        Some(base) => {
            let source = HttpSource::with_timeout(base, config.timeout_secs)
                .context("Failed to create HTTP client")?;
            Ok(WorkbookLoader::from_config(source, config))
        }
        None => Ok(WorkbookLoader::from_config(FsSource::new(), config)),
    }
}

/// Load the configured workbook, giving up early on Ctrl-C.
async fn load_dashboard(
    loader: &WorkbookLoader,
    config: &DashboardConfig,
) -> Result<DashboardData, LoadFailure> {
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handling available; never cancel.
            std::future::pending::<()>().await;
        }
    };

    let tables = loader.load_until(&config.workbook, interrupted).await?;
    for skipped in tables.skipped() {
        eprintln!(
            "{} skipped sheet '{}': {}",
            "Warning:".yellow().bold(),
            skipped.name,
            skipped.message
        );
    }
    Ok(DashboardData::from_tables(&tables))
}

async fn run_show(args: &ShowArgs) -> Result<ExitCode> {
    let config = resolve_config(args)?;
    let loader = build_loader(&config, args.url.as_deref())?;
    let outcome = load_dashboard(&loader, &config).await;
    let views = args.view.views();

    let data = match (args.format, outcome) {
        (OutputFormat::Html, outcome) => {
            println!("{}", render_dashboard(&config.title, &views, &outcome)?);
            return Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        (_, Err(failure)) => {
            eprintln!("{}", failure.to_string().red().bold());
            return Ok(ExitCode::FAILURE);
        }
        (_, Ok(data)) => data,
    };

    if args.format == OutputFormat::Json {
        print!("{}", render_json(&data, &views)?);
    } else {
        print!("{}", render_table(&config.title, &data, &views));
    }
    Ok(ExitCode::SUCCESS)
}

/// Records of each view keyed by the view's output name.
fn render_json(data: &DashboardData, views: &[View]) -> Result<String> {
    let mut map = serde_json::Map::new();
    for view in views {
        map.insert(
            view.output_name().to_string(),
            serde_json::to_value(data.records(*view))?,
        );
    }
    Ok(format!(
        "{}\n",
        serde_json::to_string_pretty(&serde_json::Value::Object(map))?
    ))
}

fn render_table(title: &str, data: &DashboardData, views: &[View]) -> String {
    let mut out = format!("{}\n", title.bold());
    for view in views {
        out.push('\n');
        out.push_str(&format!("{}\n", view.title().cyan().bold()));
        out.push_str(&format_records(*view, data.records(*view)));
    }
    out
}

/// Fixed-width table of one view's records. Numbers are right aligned.
fn format_records(view: View, records: &[ChartSeriesRecord]) -> String {
    if records.is_empty() {
        return "(no rows)\n".to_string();
    }

    let rule = view.rule();
    let columns = rule.output_fields();
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(column).map(format_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[&str]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (value, &width))| {
                if i == 0 {
                    format!("{value:<width$}")
                } else {
                    format!("{value:>width$}")
                }
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&columns);
    let rule_line: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule_line.join("  ")));
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&values));
    }
    out
}

fn run_build(args: &BuildArgs) -> Result<()> {
    let totals = aggregate_csv_path(&args.csv)
        .with_context(|| format!("Failed to aggregate: {}", args.csv.display()))?;

    for year in &args.years {
        if totals.station_count(*year) == 0 {
            tracing::warn!(year, "no ridership records for year");
        }
    }

    let tables = totals.to_table_set(&args.years, args.top);
    write_workbook(&tables, &args.output)
        .with_context(|| format!("Failed to write workbook: {}", args.output.display()))?;

    println!(
        "{} wrote {} sheets ({} rows) to {}",
        "Done:".green().bold(),
        tables.len(),
        tables.total_rows(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridership_core::{CellValue, NamedTableSet, Row, Table, PLACEHOLDER_KEY};
    use ridership_workbook::workbook_to_bytes;

    fn show_args(argv: &[&str]) -> ShowArgs {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Command::Show(args) => args,
            Command::Build(_) => panic!("expected show"),
        }
    }

    fn sample_tables() -> NamedTableSet {
        NamedTableSet::new([
            (
                "Ridership_2023",
                Table::from_rows(vec![
                    Row::new()
                        .with("Station", "Times Sq")
                        .with("Winter", 1_200_000)
                        .with("Spring", 120)
                        .with("Summer", 150)
                        .with("Fall", 110),
                    Row::new().with("Station", "Union Sq").with("Winter", 7),
                ]),
            ),
            (
                "Comparison",
                Table::from_rows(vec![Row::new()
                    .with(PLACEHOLDER_KEY, "Winter")
                    .with("2023", 100)
                    .with("2024", 90)]),
            ),
        ])
    }

    // ========================================================================
    // CLI argument parsing tests
    // ========================================================================

    #[test]
    fn test_cli_parse_show_defaults() {
        let args = show_args(&["ridership", "show"]);
        assert!(args.workbook.is_none());
        assert_eq!(args.view, ViewArg::All);
        assert_eq!(args.format, OutputFormat::Table);
        assert!(!args.per_sheet);
    }

    #[test]
    fn test_cli_parse_show_options() {
        let args = show_args(&[
            "ridership", "show", "book.xlsx", "--view", "2024", "-f", "json", "--timeout", "5",
            "--per-sheet",
        ]);
        assert_eq!(args.workbook.as_deref(), Some("book.xlsx"));
        assert_eq!(args.view, ViewArg::Ridership2024);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.timeout, Some(5));
        assert!(args.per_sheet);
    }

    #[test]
    fn test_cli_parse_build() {
        let cli = Cli::parse_from([
            "ridership", "-v", "build", "raw.csv", "-o", "out.xlsx", "--years", "2022,2023",
        ]);
        assert!(cli.verbose);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.csv, PathBuf::from("raw.csv"));
        assert_eq!(args.output, PathBuf::from("out.xlsx"));
        assert_eq!(args.top, None);
        assert_eq!(args.years, vec![2022, 2023]);
    }

    // ========================================================================
    // Config tests
    // ========================================================================

    #[test]
    fn test_resolve_config_defaults() {
        let config = resolve_config(&show_args(&["ridership", "show"])).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"workbook: from_config.xlsx\ntitle: Custom\ntimeout_secs: 10\n",
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = resolve_config(&show_args(&[
            "ridership", "show", "-c", path, "cli.xlsx", "--per-sheet",
        ]))
        .unwrap();

        assert_eq!(config.workbook, "cli.xlsx");
        assert_eq!(config.title, "Custom");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.load_policy, LoadPolicy::PerSheet);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let result = resolve_config(&show_args(&["ridership", "show", "-c", "/nonexistent.yaml"]));
        assert!(result.is_err());
    }

    // ========================================================================
    // Output tests
    // ========================================================================

    #[test]
    fn test_format_records_table() {
        let data = DashboardData::from_tables(&sample_tables());

        let table = format_records(View::Ridership2023, data.records(View::Ridership2023));
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Station "));
        assert!(lines[2].contains("1,200,000"));
        assert!(lines[3].starts_with("Union Sq"));
    }

    #[test]
    fn test_render_table_lists_selected_views() {
        let data = DashboardData::from_tables(&sample_tables());

        let text = render_table("Dash", &data, &ViewArg::Ridership2023.views());

        assert!(text.contains("2023 Station Ridership by Season"));
        assert!(!text.contains("Year-over-Year Comparison by Season"));
    }

    #[test]
    fn test_build_loader_without_timeout() {
        let config = DashboardConfig {
            timeout_secs: 0,
            ..DashboardConfig::default()
        };
        assert!(build_loader(&config, Some("http://localhost")).is_ok());
    }

    #[test]
    fn test_format_records_empty() {
        assert_eq!(format_records(View::Ridership2024, &[]), "(no rows)\n");
    }

    #[test]
    fn test_render_json_single_view() {
        let data = DashboardData::from_tables(&sample_tables());

        let text = render_json(&data, &ViewArg::Comparison.views()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "comparison": [ { "season": "Winter", "2023": 100, "2024": 90 } ]
            })
        );
    }

    // ========================================================================
    // Integration tests
    // ========================================================================

    #[tokio::test]
    async fn test_load_dashboard_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, workbook_to_bytes(&sample_tables()).unwrap()).unwrap();

        let config = DashboardConfig {
            workbook: path.to_string_lossy().into_owned(),
            ..DashboardConfig::default()
        };
        let loader = build_loader(&config, None).unwrap();

        let data = load_dashboard(&loader, &config).await.unwrap();

        assert_eq!(data.ridership2023.len(), 2);
        assert!(data.ridership2024.is_empty());
        assert_eq!(data.seasons()[0].season, Some(CellValue::from("Winter")));
    }

    #[tokio::test]
    async fn test_load_dashboard_missing_file() {
        let config = DashboardConfig {
            workbook: "/nonexistent/book.xlsx".to_string(),
            ..DashboardConfig::default()
        };
        let loader = build_loader(&config, None).unwrap();

        let failure = load_dashboard(&loader, &config).await.unwrap_err();

        assert!(failure.to_string().starts_with("Error loading data: "));
        assert!(!failure.message().is_empty());
    }

    #[test]
    fn test_run_build_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("raw.csv");
        std::fs::write(
            &csv,
            "transit_timestamp,station_complex,ridership\n01/10/2023 08:00:00 AM,Times Sq,100\n",
        )
        .unwrap();
        let output = dir.path().join("out.xlsx");

        run_build(&BuildArgs {
            csv,
            output: output.clone(),
            top: None,
            years: vec![2023, 2024],
        })
        .unwrap();

        assert!(output.exists());
    }
}
