//! ctxindex - estimate the context cost of a Claude project and build a
//! compressed docs index for CLAUDE.md.
//!
//! Usage:
//!   ctxindex PROJECT                 Print the analysis report
//!   ctxindex PROJECT -o index.txt    Also write the compressed index to a file
//!   ctxindex PROJECT --json          Print the report as JSON
//!   ctxindex --help                  Show help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ctxindex_analyze::{ProjectAnalyzer, ProjectConfig, ProjectReport};
use ctxindex_core::{DEFAULT_ROOT_LABEL, ScanConfig, format_number};

#[derive(Parser)]
#[command(
    name = "ctxindex",
    version,
    about = "Analyze a Claude project's context overhead and generate a compressed docs index",
    long_about = "ctxindex scans a project's .claude/ directory (or the project root when \
                  there is none), estimates the token cost of every doc, checks CLAUDE.md \
                  for an embedded index and a retrieval-led reasoning instruction, and \
                  prints recommendations plus a pipe-delimited index to paste into CLAUDE.md."
)]
struct Cli {
    /// Path to the project root
    project_path: PathBuf,

    /// Output file for the compressed index
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output the full report as JSON
    #[arg(long)]
    json: bool,

    /// Root label written into the index header
    #[arg(long, default_value = DEFAULT_ROOT_LABEL)]
    root_label: String,

    /// Allowed file extension, repeatable (replaces the default set)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// File name always included regardless of extension, repeatable (replaces the default set)
    #[arg(long = "name", value_name = "NAME")]
    exact_names: Vec<String>,

    /// Glob for entry names to skip, repeatable
    #[arg(long = "ignore", value_name = "GLOB")]
    ignore_patterns: Vec<String>,

    /// Do not follow symbolic links
    #[arg(long)]
    no_follow_symlinks: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.project_path.exists() {
        bail!("Project path does not exist: {}", cli.project_path.display());
    }

    let config = ProjectConfig::new()
        .with_root_label(cli.root_label.clone())
        .with_scan_config(scan_config(&cli)?);

    let report = ProjectAnalyzer::with_config(config)
        .analyze(&cli.project_path)
        .context("Analysis failed")?;

    info!(
        files = report.scan.totals.files,
        size = %format_size(report.scan.totals.bytes),
        elapsed = ?report.scan.scan_duration,
        "scan finished"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(output_path) = &cli.output {
        report.write_index(output_path)?;
        if cli.json {
            eprintln!("Index saved to: {}", output_path.display());
        } else {
            println!();
            println!("Index saved to: {}", output_path.display());
        }
    }

    if !cli.json {
        print_footer();
    }

    Ok(())
}

/// Set up a stderr tracing subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Build scan settings from the command line, keeping defaults for unset lists.
fn scan_config(cli: &Cli) -> Result<ScanConfig> {
    let mut builder = ScanConfig::builder();
    builder.root(cli.project_path.clone());

    if !cli.extensions.is_empty() {
        builder.extensions(
            cli.extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect::<Vec<_>>(),
        );
    }
    if !cli.exact_names.is_empty() {
        builder.exact_names(cli.exact_names.clone());
    }
    builder.ignore_patterns(cli.ignore_patterns.clone());
    builder.follow_symlinks(!cli.no_follow_symlinks);

    builder.build().context("Invalid scan options")
}

/// Accept `md`, `.md` or `.MD` for the same extension.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn print_report(report: &ProjectReport) {
    if report.fell_back {
        println!(
            "Warning: No .claude directory found at {}",
            report.project_path.join(".claude").display()
        );
        println!("Scanning project root for relevant files...");
    }

    println!("{}", "=".repeat(60));
    println!("CLAUDE SKILLS OPTIMIZER - ANALYSIS REPORT");
    println!("{}", "=".repeat(60));
    println!();
    println!("Project: {}", report.project_path.display());
    println!("Claude directory: {}", report.scan_dir.display());

    print_section("STRUCTURE MAP");
    if report.structure.is_empty() {
        println!("(no relevant files found)");
    } else {
        for line in &report.structure {
            println!("{line}");
        }
    }

    let totals = &report.scan.totals;
    println!();
    println!(
        "Total: {} files, {} bytes, ~{} tokens",
        totals.files,
        format_number(totals.bytes),
        format_number(totals.tokens)
    );
    if report.scan.has_warnings() {
        println!("{} warning(s) during scan", report.scan.warnings.len());
    }

    print_section("CLAUDE.md ANALYSIS");
    print_config_analysis(report);

    print_section("RECOMMENDATIONS");
    if report.recommendations.is_empty() {
        println!();
        println!("No issues found. Configuration looks good!");
    } else {
        for (i, rec) in report.recommendations.iter().enumerate() {
            println!();
            println!("{}. [{}] {}", i + 1, rec.priority, rec.category);
            println!("   Issue: {}", rec.issue);
            println!("   Action: {}", rec.action);
            println!("   Why: {}", rec.rationale);
        }
    }

    print_section("COMPRESSED INDEX (for CLAUDE.md)");
    println!("{}", report.index);
    println!();
    println!(
        "(Index size: {} bytes, ~{} tokens)",
        report.index_stats.chars, report.index_stats.tokens
    );
}

fn print_config_analysis(report: &ProjectReport) {
    let analysis = &report.config_file;
    if !analysis.exists {
        println!("CLAUDE.md not found");
        return;
    }

    if let Some(path) = &analysis.path {
        println!("Path: {}", display_relative(path, &report.project_path));
    }
    println!(
        "Size: {} bytes (~{} tokens)",
        format_number(analysis.size_bytes),
        format_number(analysis.tokens)
    );
    println!("Has index: {}", yes_no(analysis.has_index));
    println!(
        "Has retrieval instruction: {}",
        yes_no(analysis.has_retrieval_instruction)
    );
}

fn print_section(title: &str) {
    println!();
    println!("{}", "-".repeat(40));
    println!("{title}");
    println!("{}", "-".repeat(40));
}

fn print_footer() {
    println!();
    println!("{}", "=".repeat(60));
    println!("END OF REPORT");
    println!("{}", "=".repeat(60));
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Show a path relative to the project when it lives inside it.
fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
