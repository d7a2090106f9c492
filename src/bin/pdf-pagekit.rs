//! PDF Page Kit CLI tool
//!
//! A command-line tool for merging, splitting and trimming PDFs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use pdf_pagekit::config::{ExportOptions, Limits};
use pdf_pagekit::plan::{MergeSession, SplitSession};
use pdf_pagekit::shell::{
    accept, ingest, DirectorySink, Exporter, InputFile, StatusLine,
};
use pdf_pagekit::Error;

/// PDF Page Kit - Merge, split and trim PDFs locally
#[derive(Parser)]
#[command(name = "pdf-pagekit")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge PDFs in the order given
    pdf-pagekit merge intro.pdf chapter*.pdf -o out

    # Merge, putting the third file first
    pdf-pagekit merge a.pdf b.pdf c.pdf --order 3,1,2

    # Split after pages 3 and 7, dropping page 5 and turning page 2 upside down
    pdf-pagekit split report.pdf --cut 3 --cut 7 --delete 5 --rotate 2:180

    # Trim only: remove the cover page
    pdf-pagekit split scan.pdf --delete 1")]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge multiple PDF files into one
    Merge {
        /// Input PDF files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// New order of the inputs as 1-based positions, e.g. "3,1,2"
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<usize>>,

        /// Output filename prefix (a timestamp is appended)
        #[arg(long, default_value = "merged")]
        prefix: String,

        /// Maximum number of files to merge
        #[arg(long, default_value_t = pdf_pagekit::config::DEFAULT_MAX_MERGE_SOURCES)]
        max_sources: usize,
    },

    /// Split and/or trim a PDF into one or more files
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Start a new output file after this page (repeatable; giving the
        /// same page twice removes the cut again)
        #[arg(long = "cut", value_name = "PAGE")]
        cuts: Vec<u32>,

        /// Leave this page out (repeatable; giving the same page twice
        /// keeps it)
        #[arg(long = "delete", value_name = "PAGE")]
        deletes: Vec<u32>,

        /// Rotate a page clockwise: PAGE or PAGE:DEGREES (repeatable)
        #[arg(long = "rotate", value_name = "PAGE[:DEG]", value_parser = parse_rotation)]
        rotations: Vec<(u32, i32)>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Pause between saving consecutive parts, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },

    /// Render page thumbnails as PNG files
    Preview {
        /// Input PDF file
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Scale relative to the page size
        #[arg(long, default_value_t = 0.3)]
        scale: f32,

        /// Pages rendered at the same time
        #[arg(long, default_value_t = 4)]
        jobs: usize,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

/// Parse `PAGE` or `PAGE:DEGREES`
fn parse_rotation(value: &str) -> Result<(u32, i32), String> {
    let (page, degrees) = match value.split_once(':') {
        Some((page, degrees)) => (page, degrees),
        None => (value, "90"),
    };
    let page: u32 = page
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: {}", page))?;
    let degrees: i32 = degrees
        .trim()
        .parse()
        .map_err(|_| format!("invalid rotation: {}", degrees))?;
    if degrees % 90 != 0 {
        return Err(format!("rotation must be a multiple of 90, got {}", degrees));
    }
    Ok((page, degrees))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Merge { inputs, output, order, prefix, max_sources } => {
            cmd_merge(inputs, output, order, prefix, max_sources).await
        }
        Commands::Split { input, cuts, deletes, rotations, output, delay_ms } => {
            cmd_split(input, cuts, deletes, rotations, output, delay_ms).await
        }
        Commands::Preview { input, output, scale, jobs } => {
            cmd_preview(input, output, scale, jobs).await
        }
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        let mut status = StatusLine::default();
        match e.downcast_ref::<Error>() {
            Some(error) => status.fail(error),
            None => status.info(format!("{:#}", e)),
        }
        eprintln!("Error: {}", status.message().unwrap_or("unknown error"));
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
///
/// Matches of one pattern are sorted; the order of the arguments is kept.
fn expand_globs(patterns: Vec<String>) -> pdf_pagekit::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries = glob(&pattern).map_err(|e| Error::InvalidGlob(e.to_string()))?;
            let mut matched: Vec<PathBuf> = Vec::new();
            for entry in entries {
                match entry {
                    Ok(path) => matched.push(path),
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if matched.is_empty() {
                return Err(Error::NoFilesMatched(pattern));
            }
            matched.sort();
            paths.extend(matched);
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    Ok(paths)
}

/// Merge multiple PDFs into one
async fn cmd_merge(
    inputs: Vec<String>,
    output: PathBuf,
    order: Option<Vec<usize>>,
    prefix: String,
    max_sources: usize,
) -> anyhow::Result<()> {
    let inputs = expand_globs(inputs)?;

    let mut files = Vec::with_capacity(inputs.len());
    for path in &inputs {
        files.push(InputFile::read(path)?);
    }

    let outcome = ingest(files)?;
    for message in &outcome.rejected {
        eprintln!("Warning: {}", message);
    }

    let limits = Limits {
        max_merge_sources: max_sources,
        ..Limits::default()
    };
    let mut session = MergeSession::new(limits).add(outcome.accepted)?;

    if let Some(order) = order {
        let positions: Vec<usize> = order
            .iter()
            .map(|&p| p.checked_sub(1).context("positions in --order start at 1"))
            .collect::<anyhow::Result<_>>()?;
        session = session.reorder(&positions)?;
    }

    eprintln!("Merging {} PDF files...", session.len());

    let options = ExportOptions {
        merge_prefix: prefix,
        ..ExportOptions::default()
    };
    let mut sink = DirectorySink::new(&output)
        .with_context(|| format!("cannot use output directory {}", output.display()))?;
    let report = Exporter::new(options).export_merge(&session, &mut sink).await?;

    for file in &report.files {
        eprintln!("Merged to: {}", output.join(file).display());
    }

    Ok(())
}

/// Split and/or trim one PDF
async fn cmd_split(
    input: PathBuf,
    cuts: Vec<u32>,
    deletes: Vec<u32>,
    rotations: Vec<(u32, i32)>,
    output: PathBuf,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let source = accept(InputFile::read(&input)?)?;
    let (session, notes) = apply_split_flags(
        SplitSession::new(source.document.page_count),
        &cuts,
        &deletes,
        &rotations,
    )?;
    for note in &notes {
        eprintln!("Note: {}", note);
    }

    eprintln!(
        "Processing {} ({} of {} pages kept)...",
        source.document.name,
        session.surviving_count(),
        source.document.page_count
    );

    let options = ExportOptions {
        pacing: Duration::from_millis(delay_ms),
        ..ExportOptions::default()
    };
    let mut sink = DirectorySink::new(&output)
        .with_context(|| format!("cannot use output directory {}", output.display()))?;
    let report = Exporter::new(options)
        .export_partition(&source, &session, &mut sink)
        .await?;

    for file in &report.files {
        eprintln!("Saved: {}", output.join(file).display());
    }

    Ok(())
}

/// Apply split flags as session actions: cuts, then deletions, then rotations
///
/// Returns the session and notes about flags that undid an earlier one or
/// have no effect.
fn apply_split_flags(
    mut session: SplitSession,
    cuts: &[u32],
    deletes: &[u32],
    rotations: &[(u32, i32)],
) -> pdf_pagekit::Result<(SplitSession, Vec<String>)> {
    let mut notes = Vec::new();

    for &page in cuts {
        if session.cut_points().contains(&page) {
            notes.push(format!("--cut {} given again, so that split is removed", page));
        }
        session = session.toggle_cut(page)?;
    }
    for &page in deletes {
        if session.deleted().contains(&page) {
            notes.push(format!("--delete {} given again, so that page is kept", page));
        }
        session = session.toggle_delete(page)?;
    }
    for &(page, degrees) in rotations {
        session = session.rotate_by(page, degrees)?;
    }

    for &page in session.cut_points() {
        if session.deleted().contains(&page) {
            notes.push(format!("split after page {} has no effect because that page is deleted", page));
        }
    }

    Ok((session, notes))
}

/// Render thumbnails of every page
#[cfg(feature = "pdfium")]
async fn cmd_preview(input: PathBuf, output: PathBuf, scale: f32, jobs: usize) -> anyhow::Result<()> {
    use pdf_pagekit::config::PreviewOptions;
    use pdf_pagekit::pdf::{save_png, PdfiumRenderer};
    use pdf_pagekit::shell::{naming::base_name, render_previews};
    use std::sync::Arc;

    let source = accept(InputFile::read(&input)?)?;
    std::fs::create_dir_all(&output)?;

    let options = PreviewOptions {
        scale,
        max_concurrent: jobs,
    };
    let previews = render_previews(
        Arc::new(PdfiumRenderer),
        Arc::clone(&source.bytes),
        source.document.page_count,
        options,
    )
    .await;

    let base = base_name(&source.document.name);
    let mut failed = 0;
    for (page, result) in previews {
        match result {
            Ok(thumbnail) => {
                let path = output.join(format!("{}-page{}.png", base, page));
                save_png(&thumbnail, &path)?;
            }
            Err(e) => {
                eprintln!("Warning: page {}: {}", page, e);
                failed += 1;
            }
        }
    }

    eprintln!(
        "Rendered {} of {} pages to {}",
        source.document.page_count as usize - failed,
        source.document.page_count,
        output.display()
    );
    Ok(())
}

#[cfg(not(feature = "pdfium"))]
async fn cmd_preview(_input: PathBuf, _output: PathBuf, _scale: f32, _jobs: usize) -> anyhow::Result<()> {
    anyhow::bail!("thumbnail rendering is not available (build with --features pdfium)")
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let file = InputFile::read(&input)?;
    let metadata = pdf_pagekit::pdf::extract_metadata(&file.name, &file.bytes)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }
    if metadata.encrypted {
        println!("Encrypted: yes");
    }

    Ok(())
}
