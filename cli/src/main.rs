//! pdfoutline CLI - title and heading outline inference for PDFs

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{self, BatchEvent, BatchOptions};
use pdfoutline::{render, ExtractOptions, JsonFormat, OutlineConfig, Outliner, PageSelection};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer document titles and heading outlines from PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the outline of one PDF (or JSON fragment feed)
    Outline {
        /// Input PDF or feed file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output a Markdown table of contents instead of JSON
        #[arg(long, conflicts_with = "compact")]
        markdown: bool,

        /// Heuristics configuration (JSON)
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Fail on unreadable pages instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Infer outlines for every PDF in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "INPUT_DIR", default_value = "input")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        /// Heuristics configuration (JSON)
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Dump the extracted text fragments as JSON
    Fragments {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the default heuristics configuration
    Config,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            markdown,
            config,
            pages,
            strict,
        }) => {
            let format = if markdown {
                OutputKind::Markdown
            } else if compact {
                OutputKind::Json(JsonFormat::Compact)
            } else {
                OutputKind::Json(JsonFormat::Pretty)
            };
            cmd_outline(
                &input,
                output.as_deref(),
                format,
                config.as_deref(),
                pages.as_deref(),
                strict,
            )
        }
        Some(Commands::Batch {
            input,
            output,
            config,
            compact,
        }) => cmd_batch(&input, &output, config.as_deref(), compact),
        Some(Commands::Fragments {
            input,
            output,
            compact,
        }) => cmd_fragments(&input, output.as_deref(), compact),
        Some(Commands::Config) => cmd_config(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        // Default behavior: batch over ./input into ./output
        None => cmd_batch(Path::new("input"), Path::new("output"), None, false),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

enum OutputKind {
    Json(JsonFormat),
    Markdown,
}

fn load_config(path: Option<&Path>) -> Result<OutlineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            log::debug!("Loading configuration from {}", p.display());
            Ok(OutlineConfig::from_json_file(p)?)
        }
        None => Ok(OutlineConfig::default()),
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    format: OutputKind,
    config: Option<&Path>,
    pages: Option<&str>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p).ok_or_else(|| format!("Invalid page range: {}", p))?,
        None => PageSelection::All,
    };

    // Lenient by default: one broken page should not hide the rest of the outline
    let mut options = ExtractOptions::new().with_pages(page_selection);
    if !strict {
        options = options.lenient();
    }

    let doc = Outliner::new()
        .with_config(load_config(config)?)
        .with_extract_options(options)
        .outline_file(input)?;

    let rendered = match format {
        OutputKind::Json(json_format) => render::to_json(&doc, json_format)?,
        OutputKind::Markdown => render::to_markdown(&doc),
    };

    write_or_print(output, &rendered)
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let options = BatchOptions::new(input, output)
        .with_format(format)
        .with_extract_options(ExtractOptions::new().lenient());

    let total = batch::discover_inputs(input)?.len();
    if total == 0 {
        println!(
            "{} {}",
            "No PDF or feed files found in".yellow(),
            input.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = batch::run_batch_with_progress(&options, &config, |event| {
        match event {
            BatchEvent::Done { input, .. } => {
                pb.set_message(file_name(input));
            }
            BatchEvent::Failed { input, error } => {
                pb.println(format!(
                    "{} {}: {}",
                    "Failed".red(),
                    input.display(),
                    error
                ));
            }
        }
        pb.inc(1);
    })?;

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} processed, {} failed",
        "Batch complete:".green().bold(),
        report.processed.len(),
        report.failed.len()
    );
    for (path, error) in &report.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), error.dimmed());
    }
    println!("{} {}", "Output:".bold(), output.display());

    Ok(())
}

fn cmd_fragments(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let feed = Outliner::new().lenient().read_feed(input)?;

    let json = if compact {
        serde_json::to_string(&feed)?
    } else {
        serde_json::to_string_pretty(&feed)?
    };

    write_or_print(output, &json)
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", OutlineConfig::default().to_json()?);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline inference");
    println!();
    println!("Library: pdfoutline {}", env!("CARGO_PKG_VERSION").dimmed());
    println!("License: MIT");
}
