//! Process command - extract the invoice table from a single file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use facturas_core::invoice::{InvoiceParser, RecordExtractor};
use facturas_core::models::config::FacturasConfig;
use facturas_core::{export, ExportFormat, PreviewTable, ResultTable};

use super::{extension_of, load_config, load_document_text};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout, or resultado.xlsx for xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from the output extension, then the config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Skip OCR of pages without a text layer
    #[arg(long)]
    no_ocr: bool,

    /// Print extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// CSV with raw decimals
    Csv,
    /// JSON array of records
    Json,
    /// Plain text table with regional number format
    Text,
    /// HTML table with regional number format
    Html,
}

impl OutputFormat {
    /// Parse a format name, as found in the config or an output extension.
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(OutputFormat::Text),
            "htm" | "html" => Ok(OutputFormat::Html),
            other => Ok(other.parse::<ExportFormat>()?.into()),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Html => "html",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Xlsx => OutputFormat::Xlsx,
            ExportFormat::Csv => OutputFormat::Csv,
            ExportFormat::Json => OutputFormat::Json,
        }
    }
}

/// Render a table in the requested format.
pub fn render(table: &ResultTable, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
    let bytes = match format {
        OutputFormat::Xlsx => export(table, ExportFormat::Xlsx)?,
        OutputFormat::Csv => export(table, ExportFormat::Csv)?,
        OutputFormat::Json => {
            let mut json = export(table, ExportFormat::Json)?;
            json.push(b'\n');
            json
        }
        OutputFormat::Text => PreviewTable::from_table(table).to_text().into_bytes(),
        OutputFormat::Html => {
            let mut html = PreviewTable::from_table(table).to_html();
            html.push('\n');
            html.into_bytes()
        }
    };
    Ok(bytes)
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let format = resolve_format(args.format, args.output.as_deref(), &config)?;
    let extractor = RecordExtractor::from_config(&config.extraction)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Reading {}", args.input.display()));

    let loaded = load_document_text(&args.input, &config, !args.no_ocr)?;
    pb.set_message("Extracting invoices");
    let result = extractor.parse(&loaded.text);
    pb.finish_and_clear();

    debug!(
        "Matched {} identifiers, amounts {:?}",
        result.identifier_count, result.amount_counts
    );

    let warnings: Vec<&String> = loaded.warnings.iter().chain(&result.warnings).collect();
    if args.show_warnings && !warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &warnings {
            eprintln!("  - {}", warning);
        }
    } else {
        for warning in &warnings {
            warn!("{}", warning);
        }
    }

    let output = render(&result.table, format)?;

    let output_path = match (&args.output, format) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputFormat::Xlsx) => Some(PathBuf::from(
            ExportFormat::Xlsx.file_name(&config.export.file_stem),
        )),
        (None, _) => None,
    };

    if let Some(output_path) = output_path {
        fs::write(&output_path, &output)?;
        eprintln!(
            "{} {} rows written to {}",
            style("✓").green(),
            result.table.data_rows().len(),
            output_path.display()
        );
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&output)?;
        stdout.flush()?;
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Pick the output format: flag, then output extension, then config default.
fn resolve_format(
    flag: Option<OutputFormat>,
    output: Option<&Path>,
    config: &FacturasConfig,
) -> anyhow::Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }

    if let Some(path) = output {
        let extension = extension_of(path);
        if !extension.is_empty() {
            return OutputFormat::parse(&extension);
        }
    }

    OutputFormat::parse(&config.export.default_format)
}
