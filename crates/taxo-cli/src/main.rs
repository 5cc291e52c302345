//! taxo CLI - Extract species mentions from a CSV of literature records
//!
//! Usage:
//!   taxo papers.csv
//!   taxo papers.csv --text-column title
//!   taxo papers.csv -o results/annotated.csv -m models/eco_lexicon.json

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taxo_core::config::AppConfig;
use taxo_extractor::{LexiconRecognizer, SpeciesExtractor, TaxonRecognizer};
use taxo_pipeline::{RunOptions, RunSummary};

#[derive(Parser)]
#[command(name = "taxo")]
#[command(about = "Extract taxonomic species mentions from a CSV text column")]
#[command(version)]
struct Cli {
    /// Path to the input CSV file
    input_csv: PathBuf,

    /// Column containing the text to analyze (default: abstract)
    #[arg(short = 't', long)]
    text_column: Option<String>,

    /// Output file path (default: data/output/results_with_species.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Lexicon model file (default: builtin English taxon lexicon)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    if !cli.input_csv.exists() {
        bail!("input file not found: {}", cli.input_csv.display());
    }

    let mut options = RunOptions::from_config(&config);
    if let Some(column) = cli.text_column {
        options.text_column = column;
    }
    if let Some(output) = cli.output {
        options.output_path = output;
    }
    let model_path = cli.model.or(config.model.path.clone());

    let table = taxo_table::read_table(&cli.input_csv)?;
    info!("loaded {} rows from {}", table.len(), cli.input_csv.display());

    // A bad column name must fail before the (slow) model load
    table.column_index(&options.text_column)?;

    let recognizer = LexiconRecognizer::from_path(model_path.as_deref())?;
    info!("recognition model '{}' loaded", recognizer.name());
    let extractor = SpeciesExtractor::new(recognizer, config.extraction.taxon_label.clone());

    info!("extracting species from '{}' column", options.text_column);
    let summary = taxo_pipeline::run(table, &extractor, &options)?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Summary:");
    println!("  Total rows processed: {}", summary.total_rows);
    println!("  Rows with species mentions: {}", summary.rows_with_species);
    println!("  Unique species found: {}", summary.distinct_species);

    if !summary.top_species.is_empty() {
        println!();
        println!("Most mentioned species:");
        for (name, count) in &summary.top_species {
            println!("  {name}: {count} mentions");
        }
    }

    println!();
    println!("Results saved to: {}", summary.output_path.display());
    if let Some(path) = &summary.summary_path {
        println!("Species summary saved to: {}", path.display());
    }
}
