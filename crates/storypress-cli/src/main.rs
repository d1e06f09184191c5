// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storypress — command-line storybook assembler.
//
// Entry point. Initialises logging, loads the assembly config, and runs one
// subcommand: assemble a story into a PDF, preview its segmentation, or
// inspect a finished PDF.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use storypress_core::error::Result;
use storypress_core::human_errors::humanize_error;
use storypress_core::{AssemblyConfig, DocumentSpec};
use storypress_document::{DocumentAssembler, PageSegmenter, PdfInspector};

#[derive(Debug, Parser)]
#[command(name = "storypress", version, about = "Turn story text into a print-ready storybook PDF")]
struct Cli {
    /// JSON config file (defaults are used when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assemble a story into a PDF and print a JSON description of it.
    Assemble {
        #[arg(long)]
        title: String,
        /// Blank means the configured default author.
        #[arg(long, default_value = "")]
        author: String,
        /// Story text file; `-` or omitted reads stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Destination PDF; omitted uses the configured output directory.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Page count the story was generated for (bookkeeping only).
        #[arg(long, default_value_t = 10)]
        pages: u32,
    },
    /// Print how a story would be split into pages, as JSON.
    Segment {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the page count and sheet size of a PDF.
    Inspect {
        path: PathBuf,
        /// Also print the text of every page.
        #[arg(long)]
        text: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "storypress failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AssemblyConfig::load(path)?,
        None => AssemblyConfig::default(),
    };

    match cli.command {
        Command::Assemble {
            title,
            author,
            input,
            output,
            pages,
        } => {
            let content = read_input(input.as_deref())?;
            let spec = DocumentSpec::new(title, author, content, pages);
            let assembler = DocumentAssembler::new(config)?;

            let document = match output {
                Some(path) => assembler.assemble_to(&spec, &path)?,
                None => assembler.assemble(&spec)?,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Segment { input } => {
            let content = read_input(input.as_deref())?;
            let segmentation = PageSegmenter::new(config.paragraphs_per_page).segment(&content);
            println!("{}", serde_json::to_string_pretty(&segmentation)?);
        }
        Command::Inspect { path, text } => {
            let inspector = PdfInspector::open(&path)?;
            let pages = inspector.page_count();
            println!("{}: {} page(s)", path.display(), pages);
            if pages > 0 {
                let (width, height) = inspector.page_size_mm(1)?;
                println!("sheet size: {width:.0} x {height:.0} mm");
            }
            if text {
                for page in 1..=pages as u32 {
                    println!("--- sheet {page} ---\n{}", inspector.page_text(page)?.trim());
                }
            }
        }
    }

    Ok(())
}

/// Read story text from a file, or from stdin for `None` / `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}
