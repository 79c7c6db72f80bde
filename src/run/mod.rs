//! Run the branch-site analysis on a cohort of gene folders.

#[cfg(test)]
mod tests;

use crate::classify::Clade;
use crate::export;
use crate::gene::{GeneRecord, ParserConfig};
use crate::selection;
use crate::trend;
use crate::utils;
#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use log::{error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// RunArgs
// ----------------------------------------------------------------------------

/// Test a cohort of genes for positive selection and classify the selected sites.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
pub struct RunArgs {
    /// Gene folders, each with an alternative and a null model output.
    #[cfg_attr(feature = "cli", clap(short = 'i', long, required = true, num_args = 1..))]
    pub input: Vec<PathBuf>,

    /// Output directory.
    ///
    /// If the directory does not exist, it will be created.
    #[cfg_attr(feature = "cli", clap(short = 'o', long, required = true))]
    pub output_dir: PathBuf,

    /// Foreground clade, as comma separated taxa or one preset name.
    #[cfg_attr(feature = "cli", arg(short = 'c', long, value_delimiter = ','))]
    pub clade: Vec<String>,

    /// Write the gap-free alignment of every gene.
    #[cfg_attr(feature = "cli", arg(short = 'a', long))]
    pub write_alignments: bool,

    /// Write nucleotide and codon usage trends of conserved columns.
    #[cfg_attr(feature = "cli", arg(long))]
    pub trends: bool,

    /// Filename fragment identifying a model output.
    #[cfg_attr(feature = "cli", arg(short = 's', long, default_value_t = RunArgs::default().suffix))]
    pub suffix: String,

    /// Subfolder with the alternative model output.
    #[cfg_attr(feature = "cli", arg(long, default_value = "Alternative"))]
    pub alternative_dir: PathBuf,

    /// Subfolder with the null model output.
    #[cfg_attr(feature = "cli", arg(long, default_value = "Null"))]
    pub null_dir: PathBuf,

    /// Number of CPU threads to use.
    #[cfg_attr(feature = "cli", clap(short = 't', long, default_value_t = RunArgs::default().threads))]
    #[serde(skip)]
    pub threads: usize,
}

impl Default for RunArgs {
    fn default() -> Self {
        let config = ParserConfig::default();
        RunArgs {
            input: Vec::new(),
            output_dir: PathBuf::new(),
            clade: Vec::new(),
            write_alignments: false,
            trends: false,
            suffix: config.suffix,
            alternative_dir: config.alternative_dir,
            null_dir: config.null_dir,
            threads: 1,
        }
    }
}

impl RunArgs {
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            alternative_dir: self.alternative_dir.clone(),
            null_dir: self.null_dir.clone(),
            suffix: self.suffix.clone(),
        }
    }

    /// Reads [`RunArgs`] from a JSON file.
    pub fn read<P>(path: &P) -> Result<RunArgs, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let input =
            std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read run arguments: {path:?}."))?;
        let run_args = serde_json::from_str(&input)
            .wrap_err_with(|| format!("Failed to deserialize run arguments: {input}"))?;
        Ok(run_args)
    }

    /// Write [`RunArgs`] to a JSON file.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use branchsite::RunArgs;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("run_args.json");
    /// let args = RunArgs { clade: vec!["pucciniales".to_string()], ..Default::default() };
    /// args.write(&path)?;
    /// assert_eq!(RunArgs::read(&path)?.clade, args.clade);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        utils::create_parent_dir(path)?;
        let output =
            serde_json::to_string_pretty(self).wrap_err(format!("Failed to serialize run arguments: {self:?}"))?;
        std::fs::write(path, output).wrap_err(format!("Failed to write run arguments: {path:?}"))?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Run
// ----------------------------------------------------------------------------

/// Parse every gene folder, in input order. Missing outputs and read failures
/// drop the gene with a log message, they do not stop the run.
pub fn parse_genes(input: &[PathBuf], config: &ParserConfig) -> Vec<GeneRecord> {
    let records = input
        .par_iter()
        .map(|folder| GeneRecord::from_folder(folder, config))
        .collect::<Vec<_>>()
        .into_iter()
        .zip(input)
        .filter_map(|(result, folder)| match result {
            Ok(record) if record.valid => Some(record),
            Ok(_) => None,
            Err(e) => {
                error!("{folder:?}: {e:?}");
                None
            }
        })
        .collect_vec();

    records.iter().map(|r| &r.name).duplicates().for_each(|name| warn!("Duplicate gene name: {name}"));
    records
}

/// Classify every record on the current thread pool. A gene that fails to
/// classify is left unclassified.
pub fn classify_genes(records: &mut [GeneRecord], clade: Option<&Clade>, detail: bool) -> usize {
    records
        .par_iter_mut()
        .map(|record| match record.classify(clade, detail) {
            Ok(_) => 1,
            Err(e) => {
                error!("{e:?}");
                0
            }
        })
        .sum()
}

/// Run the analysis and write every report to the output directory.
///
/// ## Examples
///
/// ```rust
/// use branchsite::{run, toy, RunArgs};
///
/// let dir = tempfile::tempdir()?;
/// let genes = toy::dataset(&toy::ToyArgs { output_dir: dir.path().join("genes"), genes: 2 })?;
///
/// let args = RunArgs { input: genes, output_dir: dir.path().join("output"), ..Default::default() };
/// let records = run(&args)?;
///
/// assert_eq!(records.len(), 2);
/// assert!(args.output_dir.join("summary.csv").exists());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn run(args: &RunArgs) -> Result<Vec<GeneRecord>, Report> {
    if args.input.is_empty() {
        return Err(eyre!("No gene folders were provided.")).suggestion("Please specify them with --input.");
    }

    let output_dir = utils::create_dir(&args.output_dir)?;
    args.write(&output_dir.join("run_args.json"))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .wrap_err("Failed to build the thread pool.")?;

    let clade = Clade::from_args(&args.clade);
    match &clade {
        Some(clade) => info!("Clade: {clade}"),
        None => info!("No clade given, only conserved sites will be classified."),
    }

    // ------------------------------------------------------------------------
    // Parse

    info!("Parsing {} gene folders.", args.input.len());
    let config = args.parser_config();
    let mut records = pool.install(|| parse_genes(&args.input, &config));
    let num_invalid = args.input.len() - records.len();
    if num_invalid > 0 {
        warn!("{num_invalid} gene folders were skipped.");
    }

    // ------------------------------------------------------------------------
    // Selection

    // every p-value must be known before the correction
    let num_significant = selection::test_cohort(&mut records)?;

    // ------------------------------------------------------------------------
    // Classify

    let num_classified = pool.install(|| classify_genes(&mut records, clade.as_ref(), args.trends));

    // ------------------------------------------------------------------------
    // Export

    export::summary(&records)?.write(output_dir.join("summary.csv"), export::DELIMITER)?;
    export::gene_class_proportions(&records)?.write(output_dir.join("gene_class_proportion.csv"), export::DELIMITER)?;

    if args.write_alignments {
        export::write_alignments(&records, &output_dir.join("alignments"))?;
    }
    if args.trends {
        match clade {
            Some(_) => {
                let trends = trend::analyze(&records);
                export::write_trends(&trends, &output_dir.join("trends"))?;
            }
            None => warn!("Trends compare a clade to the other taxa, skipping them without a clade."),
        }
    }

    info!(
        "{} valid genes, {num_significant} significant, {num_classified} classified. Results: {output_dir:?}",
        records.len()
    );

    Ok(records)
}
