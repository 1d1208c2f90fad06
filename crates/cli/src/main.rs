//! CLI tool for converting HTML slide decks into PowerPoint files.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::ConvertOptions;
use deck_pptx::{PptxReader, PptxWriter};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Convert HTML slide decks (div.slide containers) into native .pptx files.
#[derive(Parser, Debug)]
#[command(name = "html2pptx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input HTML file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the shape model as JSON instead of a .pptx package
    #[arg(long)]
    json: bool,

    /// Print a per-slide summary of the written package to stdout
    #[arg(short, long)]
    summary: bool,

    /// Typeface forced on every text run
    #[arg(short, long)]
    font: Option<String>,

    /// Typeface used when the stylesheet names none
    #[arg(long, default_value = "Arial")]
    fallback_font: String,

    /// Class that marks slide containers
    #[arg(long, default_value = "slide")]
    slide_class: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let options = ConvertOptions::new()
        .with_fallback_font(args.fallback_font.as_str())
        .with_font_override(args.font.clone())
        .with_slide_class(args.slide_class.as_str());

    let mut failures = 0;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &options) {
            Ok(output_path) => {
                if args.verbose {
                    eprintln!("Written to: {}", output_path.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, args.input.len());
    }
    Ok(())
}

/// Convert a single HTML file and write the result next to it (or into the
/// output directory).
fn process_file(input_path: &Path, args: &Args, options: &ConvertOptions) -> Result<PathBuf> {
    let html = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let deck = deck_html::html_to_deck(&html, options)?;
    if args.verbose {
        eprintln!("  Found {} slides", deck.slides.len());
    }

    if args.json {
        let output_path = get_output_path(input_path, args.output.as_ref(), "json")?;
        let json = serde_json::to_string_pretty(&deck).context("Failed to serialize deck")?;
        write_output(&output_path, json.as_bytes())?;
        return Ok(output_path);
    }

    let title = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Presentation");
    let bytes = PptxWriter::new().with_title(title).write_to_vec(&deck)?;

    if args.summary {
        let summary = PptxReader::new().summarize(Cursor::new(bytes.as_slice()))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    }

    let output_path = get_output_path(input_path, args.output.as_ref(), "pptx")?;
    write_output(&output_path, &bytes)?;
    Ok(output_path)
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>, extension: &str) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, extension);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
