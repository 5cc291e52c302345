//! Taxo Pipeline - Row-by-row extraction, aggregation, and output
//!
//! Drives the extractor over every row of an input table in original order,
//! appends the `extracted_species` and `species_count` columns, folds each
//! row's mentions into a corpus-wide [`FrequencyTally`], writes the
//! annotated and summary tables, and reports a [`RunSummary`].
//!
//! Strictly sequential: one row at a time, no overlap between model
//! invocation and I/O, and any row-level failure aborts the whole run.

pub mod tally;

pub use tally::FrequencyTally;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use taxo_core::config::AppConfig;
use taxo_core::Result;
use taxo_extractor::{SpeciesExtractor, TaxonRecognizer};
use taxo_table::Table;

/// Name of the appended column holding the joined species names
pub const EXTRACTED_SPECIES_COLUMN: &str = "extracted_species";

/// Name of the appended column holding the per-row species count
pub const SPECIES_COUNT_COLUMN: &str = "species_count";

const PROGRESS_INTERVAL: usize = 10;

/// Options for a single pipeline run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Column containing the text to analyze
    pub text_column: String,
    /// Where the annotated table is written
    pub output_path: PathBuf,
    /// Delimiter joining a row's species names
    pub delimiter: String,
    /// How many top species the summary reports
    pub top_n: usize,
    /// Inserted before the extension to derive the summary file path
    pub summary_suffix: String,
}

impl RunOptions {
    /// Options from application configuration; CLI flags override fields
    /// afterwards.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            text_column: config.extraction.text_column.clone(),
            output_path: config.output.default_path.clone(),
            delimiter: config.extraction.delimiter.clone(),
            top_n: config.extraction.top_n,
            summary_suffix: config.output.summary_suffix.clone(),
        }
    }
}

/// Result of annotating a table in place
#[derive(Debug, Clone)]
pub struct Annotation {
    pub total_rows: usize,
    pub rows_with_species: usize,
    pub tally: FrequencyTally,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Total rows processed
    pub total_rows: usize,
    /// Rows with at least one species mention
    pub rows_with_species: usize,
    /// Distinct species names with a non-zero tally
    pub distinct_species: usize,
    /// Top species by tally, count descending, ties by first encounter
    pub top_species: Vec<(String, usize)>,
    /// Where the annotated table was written
    pub output_path: PathBuf,
    /// Where the species summary was written, if any species was found
    pub summary_path: Option<PathBuf>,
}

/// Annotate `table` in place and build the corpus-wide tally.
///
/// Appends `extracted_species` (names joined with `delimiter` in
/// lexicographic order, empty string when none) and `species_count` (set
/// size) so that `species_count == 0` exactly when `extracted_species` is
/// empty. Rows are processed in original order; the first extraction
/// failure aborts the run.
pub fn annotate<R: TaxonRecognizer>(
    table: &mut Table,
    extractor: &SpeciesExtractor<R>,
    text_column: &str,
    delimiter: &str,
) -> Result<Annotation> {
    let column = table.column_index(text_column)?;
    let total_rows = table.len();

    let mut tally = FrequencyTally::new();
    let mut rows_with_species = 0;
    let mut species_cells = Vec::with_capacity(total_rows);
    let mut count_cells = Vec::with_capacity(total_rows);

    for (index, row) in table.rows.iter().enumerate() {
        let text = row.get(column).map(String::as_str).unwrap_or("");
        let species = extractor.extract(text)?;

        if !species.is_empty() {
            rows_with_species += 1;
        }
        for name in &species {
            tally.record(name);
        }

        count_cells.push(species.len().to_string());
        species_cells.push(
            species
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(delimiter),
        );

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            info!("processed {}/{} rows", index + 1, total_rows);
        }
    }

    table.push_column(EXTRACTED_SPECIES_COLUMN, species_cells);
    table.push_column(SPECIES_COUNT_COLUMN, count_cells);

    Ok(Annotation {
        total_rows,
        rows_with_species,
        tally,
    })
}

/// Derive the summary file path by inserting `suffix` before the extension
pub fn summary_path(output_path: &Path, suffix: &str) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match output_path.extension() {
        Some(ext) => output_path.with_file_name(format!("{stem}{suffix}.{}", ext.to_string_lossy())),
        None => output_path.with_file_name(format!("{stem}{suffix}")),
    }
}

/// Run the full pipeline over a loaded table.
///
/// Writes the annotated table to `options.output_path` (creating missing
/// parent directories) and, when at least one species was found anywhere, a
/// `(species, mention_count)` summary table next to it. Returns the
/// [`RunSummary`] regardless of whether anything matched.
pub fn run<R: TaxonRecognizer>(
    mut table: Table,
    extractor: &SpeciesExtractor<R>,
    options: &RunOptions,
) -> Result<RunSummary> {
    let annotation = annotate(&mut table, extractor, &options.text_column, &options.delimiter)?;
    debug!(
        "extraction complete: {}/{} rows with species, {} distinct",
        annotation.rows_with_species,
        annotation.total_rows,
        annotation.tally.len()
    );

    taxo_table::write_table(&options.output_path, &table)?;
    info!("annotated table written to {}", options.output_path.display());

    let summary = if annotation.tally.is_empty() {
        None
    } else {
        let path = summary_path(&options.output_path, &options.summary_suffix);
        taxo_table::write_table(&path, &annotation.tally.to_table())?;
        info!("species summary written to {}", path.display());
        Some(path)
    };

    Ok(RunSummary {
        total_rows: annotation.total_rows,
        rows_with_species: annotation.rows_with_species,
        distinct_species: annotation.tally.len(),
        top_species: annotation.tally.top(options.top_n),
        output_path: options.output_path.clone(),
        summary_path: summary,
    })
}
