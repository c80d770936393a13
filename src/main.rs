use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use coauthor_counter::settings::Settings;
use coauthor_counter::{extract_with, ContentMode, ParenScope, ParseOptions, Report, Section};

/// Above this many inputs a progress bar is shown.
const PROGRESS_MIN_PAGES: usize = 8;

#[derive(Parser)]
#[command(name = "coauthor_counter", about = "Count unique coauthors on academic CV pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count coauthors per section (reads stdin when no files are given)
    Count {
        /// HTML or plain-text page dumps
        files: Vec<PathBuf>,
        /// Print one JSON report per page instead of a table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// List coauthor names per section for one page
    Names {
        /// Page dump (default: stdin)
        file: Option<PathBuf>,
        #[command(flatten)]
        parse: ParseArgs,
    },
}

#[derive(Args)]
struct ParseArgs {
    /// Content format: auto, markup or plain [env: COAUTHORS_MODE]
    #[arg(long)]
    mode: Option<ContentMode>,
    /// Parenthesis narrowing: auto, innermost or whole-entry [env: COAUTHORS_PARENS]
    #[arg(long)]
    parens: Option<ParenScope>,
    /// Page URL, checked against COAUTHORS_ALLOWED_URLS
    #[arg(long)]
    url: Option<String>,
}

impl ParseArgs {
    /// Flags override settings. None when the page URL is not allow-listed.
    fn options(&self, settings: &Settings) -> Option<ParseOptions> {
        if let Some(url) = &self.url {
            if !settings.url_allowed(url) {
                return None;
            }
        }
        let mut options = settings.parse_options();
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if let Some(parens) = self.parens {
            options.parens = parens;
        }
        Some(options)
    }
}

#[derive(Serialize)]
struct PageReport {
    page: String,
    #[serde(flatten)]
    report: Report,
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
    let settings = Settings::load();

    let result = match cli.command {
        Commands::Count { files, json, parse } => {
            let Some(options) = parse.options(&settings) else {
                println!("URL not in allow-list; nothing counted.");
                return Ok(());
            };
            let reports = if files.is_empty() {
                let content = read_stdin()?;
                vec![PageReport {
                    page: "<stdin>".into(),
                    report: extract_with(&content, &options),
                }]
            } else {
                count_files(&files, &options)?
            };

            if json {
                for r in &reports {
                    println!("{}", serde_json::to_string(r)?);
                }
            } else {
                print_table(&reports);
            }
            Ok(())
        }
        Commands::Names { file, parse } => {
            let Some(options) = parse.options(&settings) else {
                println!("URL not in allow-list; nothing counted.");
                return Ok(());
            };
            let content = match &file {
                Some(path) => read_page(path)?,
                None => read_stdin()?,
            };
            print_names(&extract_with(&content, &options));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Extract every file in parallel. Unreadable files are logged and skipped.
fn count_files(files: &[PathBuf], options: &ParseOptions) -> anyhow::Result<Vec<PageReport>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = if files.len() >= PROGRESS_MIN_PAGES {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let report = read_page(path).map(|content| PageReport {
                page: path.display().to_string(),
                report: extract_with(&content, options),
            });
            pb.inc(1);
            report
        })
        .collect();
    pb.finish_and_clear();

    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(r) => reports.push(r),
            Err(e) => warn!("Skipping page: {:#}", e),
        }
    }
    if reports.is_empty() {
        bail!("none of the {} input files could be read", files.len());
    }
    info!("Counted {} of {} pages", reports.len(), files.len());
    Ok(reports)
}

fn read_page(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_stdin() -> anyhow::Result<String> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("reading stdin")?;
    Ok(content)
}

fn print_table(reports: &[PageReport]) {
    println!(
        "{:<32} | {:>5} | {:>9} | {:>7} | {:>8}",
        "Page", "Total", "Published", "Working", "Progress"
    );
    println!("{}", "-".repeat(74));
    for r in reports {
        println!(
            "{:<32} | {:>5} | {:>9} | {:>7} | {:>8}",
            truncate(&r.page, 32),
            r.report.total,
            r.report.published,
            r.report.working,
            r.report.progress
        );
    }
}

fn print_names(report: &Report) {
    let sections = [
        (Section::Published.label(), &report.published_list),
        (Section::Working.label(), &report.working_list),
        (Section::InProgress.label(), &report.progress_list),
        ("Total", &report.total_list),
    ];
    for (i, (label, names)) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} ({})", label, names.len());
        for name in names.iter() {
            println!("  {}", name);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(s.chars().count() - (max - 3)).collect();
        format!("...{}", tail)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
