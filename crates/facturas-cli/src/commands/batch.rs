//! Batch processing command for multiple invoice files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use facturas_core::invoice::{InvoiceParser, RecordExtractor};
use facturas_core::models::config::FacturasConfig;
use facturas_core::ResultTable;

use super::process::{render, OutputFormat};
use super::{extension_of, load_config, load_document_text, INPUT_EXTENSIONS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (e.g. "facturas/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from the config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip OCR of pages without a text layer
    #[arg(long)]
    no_ocr: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    table: Option<ResultTable>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::parse(&config.export.default_format)?,
    };
    let extractor = Arc::new(RecordExtractor::from_config(&config.extraction)?);
    let currencies: Vec<String> = extractor
        .currencies()
        .iter()
        .map(|c| c.code().to_string())
        .collect();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && INPUT_EXTENSIONS.contains(&extension_of(p).as_str()))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let config = Arc::new(config);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let use_ocr = !args.no_ocr;
    let output_paths = plan_output_paths(&files, args.output_dir.as_deref(), format);
    let mut handles = Vec::with_capacity(files.len());

    for (path, output_path) in files.into_iter().zip(output_paths) {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let extractor = Arc::clone(&extractor);
        let config = Arc::clone(&config);
        let pb = overall_pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = process_single_file(
                &path,
                &extractor,
                &config,
                use_ocr,
                format,
                &output_path,
            );
            pb.inc(1);
            (path, outcome, file_start.elapsed().as_millis() as u64)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, outcome, processing_time_ms) = handle.await?;
        match outcome {
            Ok(table) => results.push(ProcessResult {
                path,
                table: Some(table),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        table: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
    }

    overall_pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &currencies, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Extract one file and write its output; runs on the blocking pool.
fn process_single_file(
    path: &Path,
    extractor: &RecordExtractor,
    config: &FacturasConfig,
    use_ocr: bool,
    format: OutputFormat,
    output_path: &Path,
) -> anyhow::Result<ResultTable> {
    let loaded = load_document_text(path, config, use_ocr)?;
    let result = extractor.parse(&loaded.text);

    for warning in loaded.warnings.iter().chain(&result.warnings) {
        warn!("{}: {}", path.display(), warning);
    }

    fs::write(output_path, render(&result.table, format)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(result.table)
}

/// One distinct output path per input, `<dir>/<input stem>.<ext>` where
/// `dir` defaults to the input's directory.
///
/// Inputs sharing a stem (`a.pdf`, `a.txt`, or equal names from different
/// directories under `-d`) get `<stem>.<input ext>.<ext>`, then a numeric
/// suffix. No output path ever names an input file.
fn plan_output_paths(
    files: &[PathBuf],
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Vec<PathBuf> {
    let mut used: HashSet<PathBuf> = files.iter().cloned().collect();
    let extension = format.extension();

    files
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("facturas");
            let dir = output_dir
                .map(Path::to_path_buf)
                .or_else(|| input.parent().map(Path::to_path_buf))
                .unwrap_or_default();

            let mut candidates = vec![
                dir.join(format!("{}.{}", stem, extension)),
                dir.join(format!("{}.{}.{}", stem, extension_of(input), extension)),
            ]
            .into_iter()
            .chain((2..).map(|n| dir.join(format!("{}-{}.{}", stem, n, extension))));

            let path = candidates
                .find(|candidate| !used.contains(candidate))
                .unwrap_or_default();
            used.insert(path.clone());
            path
        })
        .collect()
}

fn write_summary(
    path: &Path,
    currencies: &[String],
    results: &[ProcessResult],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let processed_at = Local::now().to_rfc3339();

    let mut header = vec!["file".to_string(), "status".to_string(), "rows".to_string()];
    header.extend(currencies.iter().map(|c| format!("Total_{}", c)));
    header.extend(
        ["processing_time_ms", "processed_at", "error"]
            .iter()
            .map(|s| s.to_string()),
    );
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        match &result.table {
            Some(table) => {
                record.push("success".to_string());
                record.push(table.data_rows().len().to_string());
                record.extend(table.total().amounts.iter().map(|a| a.to_string()));
            }
            None => {
                record.push("error".to_string());
                record.push(String::new());
                record.extend(currencies.iter().map(|_| String::new()));
            }
        }
        record.push(result.processing_time_ms.to_string());
        record.push(processed_at.clone());
        record.push(result.error.clone().unwrap_or_default());

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
