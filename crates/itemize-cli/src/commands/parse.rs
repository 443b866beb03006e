//! Parse command - extract items from a single receipt text file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::format::{Item, StrftimeItems};
use clap::Args;
use console::style;
use tracing::{debug, info};

use itemize_core::models::config::{DedupStrategy, OutputConfig, Strictness};
use itemize_core::models::receipt::{LineOutcome, LineTrace, ReceiptItem};
use itemize_core::receipt::{LineItemParser, ReceiptParser};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or "-" to read stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Threshold preset (overrides the configured thresholds)
    #[arg(short, long, value_enum)]
    strictness: Option<StrictnessArg>,

    /// Duplicate detection key (overrides the configured strategy)
    #[arg(long, value_enum)]
    dedup: Option<DedupArg>,

    /// Print the outcome of every line to stderr
    #[arg(long)]
    explain: bool,

    /// Print the item count and total to stderr
    #[arg(long)]
    show_total: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text listing
    Text,
}

impl OutputFormat {
    /// File extension used for batch outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrictnessArg {
    Lenient,
    Standard,
    Strict,
}

impl From<StrictnessArg> for Strictness {
    fn from(arg: StrictnessArg) -> Self {
        match arg {
            StrictnessArg::Lenient => Strictness::Lenient,
            StrictnessArg::Standard => Strictness::Standard,
            StrictnessArg::Strict => Strictness::Strict,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DedupArg {
    /// Same source line
    SourceLine,
    /// Same name and price
    NamePrice,
}

impl From<DedupArg> for DedupStrategy {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::SourceLine => DedupStrategy::SourceLine,
            DedupArg::NamePrice => DedupStrategy::NamePrice,
        }
    }
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let text = read_input(&args.input)?;
    info!("Processing input: {}", args.input.display());

    let mut parser = LineItemParser::from_config(&config.extraction)?;
    if let Some(strictness) = args.strictness {
        parser = parser.with_strictness(strictness.into());
    }
    if let Some(dedup) = args.dedup {
        parser = parser.with_dedup(dedup.into());
    }

    let report = parser.parse_with_report(&text);

    if args.explain {
        eprint!("{}", explain(&report.trace));
    }

    let output = format_items(&report.items, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.show_total {
        eprintln!(
            "{} {} items, total {} ({}ms)",
            style("ℹ").blue(),
            report.items.len(),
            report.running_total,
            report.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

/// Render items in the requested format.
pub fn format_items(
    items: &[ReceiptItem],
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(items)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => format_csv(items, output),
        OutputFormat::Text => format_text(items, output),
    }
}

fn format_timestamp(item: &ReceiptItem, format: &str) -> anyhow::Result<String> {
    if StrftimeItems::new(format).any(|i| matches!(i, Item::Error)) {
        anyhow::bail!("Invalid timestamp format: {}", format);
    }
    Ok(item.processed_at.format(format).to_string())
}

fn format_csv(items: &[ReceiptItem], output: &OutputConfig) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["item", "amount"];
    if output.include_source_line {
        header.push("source_line");
    }
    header.push("processed_at");
    wtr.write_record(&header)?;

    for item in items {
        let mut record = vec![item.item.clone(), item.amount.to_string()];
        if output.include_source_line {
            record.push(item.source_line.clone());
        }
        record.push(format_timestamp(item, &output.timestamp_format)?);
        wtr.write_record(&record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(items: &[ReceiptItem], output: &OutputConfig) -> anyhow::Result<String> {
    let mut text = String::new();

    if items.is_empty() {
        text.push_str("No items found\n");
        return Ok(text);
    }

    let width = items
        .iter()
        .map(|i| i.item.chars().count())
        .max()
        .unwrap_or(0);

    for item in items {
        text.push_str(&format!("{:<width$}  {:>8}", item.item, item.amount.to_string()));
        if output.include_source_line {
            text.push_str(&format!("  | {}", item.source_line));
        }
        text.push('\n');
    }

    let total: rust_decimal::Decimal = items.iter().map(|i| i.amount).sum();
    text.push_str(&format!("\n{} items, total {}\n", items.len(), total));

    if let Some(first) = items.first() {
        text.push_str(&format!(
            "Processed at {}\n",
            format_timestamp(first, &output.timestamp_format)?
        ));
    }

    Ok(text)
}

/// Per-line outcome table.
pub fn explain(trace: &[LineTrace]) -> String {
    let mut out = String::new();

    for line in trace {
        let label = format!("{:<26}", line.outcome.label());
        let label = match line.outcome {
            LineOutcome::Accepted => style(label).green(),
            LineOutcome::Skipped { .. } | LineOutcome::NoPrice => style(label).dim(),
            _ => style(label).yellow(),
        };
        out.push_str(&format!("{:>4}  {}  {}\n", line.index + 1, label, line.text));
    }

    out
}
