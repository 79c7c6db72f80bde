//! Delimited reports, fasta alignments and trend tables written by a run.

#[cfg(test)]
mod tests;

use crate::classify::Category;
use crate::gene::GeneRecord;
use crate::trend::{CodonUsage, Trend};
use crate::utils::{self, or_na};
use branchsite_table::Table;
use color_eyre::eyre::{Report, Result, WrapErr};
use itertools::Itertools;
use log::debug;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// Column delimiter of every report.
pub const DELIMITER: char = ';';

const SUMMARY_HEADERS: &[&str] = &[
    "Gene",
    "lnL Alternative",
    "lnL Null",
    "p-value",
    "FDR correction",
    "N sites",
    "w class 0",
    "w class 1",
    "w class 2a",
    "w class 2b",
    "Selected sites",
    "Sites position",
];
const ALL_UNIQUE_HEADER: &str = "All unique sites";
const PROPORTION_HEADERS: &[&str] = &["Gene", "Conserved", "Unique", "Diversifying", "Shared", "Variable"];
const NUCLEOTIDE_HEADERS: &[&str] = &["nucleotide", "clade_frequency", "other_frequency"];
const CODON_HEADERS: &[&str] = &["codon", "clade_frequency", "other_frequency"];

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

// ----------------------------------------------------------------------------
// Summary

/// One row per gene: likelihoods, p-values, site classes and site categories.
///
/// ```rust
/// use branchsite::{export, toy, gene::GeneRecord};
///
/// let mut record = GeneRecord::new(&"OG0001");
/// record.read_outputs(&toy::alternative(-100.0), &toy::null(-105.0));
/// let table = export::summary(&[record])?;
///
/// assert_eq!(table.get(&"lnL Null".to_string(), 0)?, "-105");
/// assert_eq!(table.get(&"FDR correction".to_string(), 0)?, "NA");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn summary(records: &[GeneRecord]) -> Result<Table<String>, Report> {
    let mut table = Table::with_headers(headers(SUMMARY_HEADERS));

    for record in records {
        let classes = match &record.site_classes {
            Some(classes) => classes.iter().map(|c| c.to_string()).collect_vec(),
            None => vec![utils::NA.to_string(); 4],
        };
        let mut row = vec![
            record.name.clone(),
            or_na(record.alternative_lnl),
            or_na(record.null_lnl),
            or_na(record.p_value),
            or_na(record.adjusted_p_value),
            or_na(record.gene_length),
        ];
        row.extend(classes);
        row.push(record.selected_sites.len().to_string());
        row.push(record.selected_sites.iter().join(","));
        table.add_row(row)?;
    }

    // one column per category, then the clade-unique count
    let classifications = records.iter().map(|r| r.classification.as_ref()).collect_vec();
    for category in Category::iter() {
        let column = classifications
            .iter()
            .map(|c| or_na(c.and_then(|c| c.counts.as_ref()).map(|counts| counts.get(category))));
        table.add_column(category.to_string(), column)?;
    }
    let column = classifications.iter().map(|c| or_na(c.and_then(|c| c.all_clade_unique)));
    table.add_column(ALL_UNIQUE_HEADER.to_string(), column)?;

    Ok(table)
}

// ----------------------------------------------------------------------------
// Gene Class Proportions

/// Proportion of selected sites per category group, for significant genes
/// with at least one selected site.
pub fn gene_class_proportions(records: &[GeneRecord]) -> Result<Table<String>, Report> {
    let mut table = Table::with_headers(headers(PROPORTION_HEADERS));

    for record in records.iter().filter(|r| r.is_significant() && !r.selected_sites.is_empty()) {
        let counts = match record.classification.as_ref().and_then(|c| c.counts.as_ref()) {
            Some(counts) => counts,
            None => continue,
        };
        let n = record.selected_sites.len() as f64;
        let proportion = |categories: &[Category]| {
            let total: usize = categories.iter().map(|c| counts.get(*c)).sum();
            (total as f64 / n).to_string()
        };

        table.add_row([
            record.name.clone(),
            proportion(&[Category::Conserved, Category::MostlyConserved]),
            proportion(&[Category::Unique, Category::MostlyUnique]),
            proportion(&[Category::Diverse, Category::MostlyDiverse]),
            proportion(&[Category::Shared]),
            proportion(&[Category::Variable]),
        ])?;
    }

    Ok(table)
}

// ----------------------------------------------------------------------------
// Trends

/// Nucleotide frequencies of a [`Trend`], clade against other taxa.
pub fn nucleotide_trend(trend: &Trend) -> Result<Table<String>, Report> {
    let mut table = Table::with_headers(headers(NUCLEOTIDE_HEADERS));
    for frequency in &trend.nucleotides {
        table.add_row([frequency.nucleotide.to_string(), or_na(frequency.clade), or_na(frequency.other)])?;
    }
    Ok(table)
}

/// Codon usage of one amino acid, clade against other taxa.
pub fn codon_trend(usage: &CodonUsage) -> Result<Table<String>, Report> {
    let mut table = Table::with_headers(headers(CODON_HEADERS));
    for (codon, (clade, other)) in &usage.codons {
        table.add_row([codon.clone(), clade.to_string(), other.to_string()])?;
    }
    Ok(table)
}

/// Write the trend tables of every category to a directory.
///
/// Files are named `<Category>_nucleotide_trend.csv` and
/// `<Category>_codon_trend<AminoAcid>.csv`.
pub fn write_trends<P>(trends: &[Trend], output_dir: &P) -> Result<Vec<PathBuf>, Report>
where
    P: AsRef<Path> + Debug,
{
    let output_dir = utils::create_dir(output_dir)?;
    let mut paths = Vec::new();

    for trend in trends {
        let path = output_dir.join(format!("{}_nucleotide_trend.csv", trend.category));
        nucleotide_trend(trend)?.write(&path, DELIMITER)?;
        paths.push(path);

        for usage in &trend.codons {
            let path = output_dir.join(format!("{}_codon_trend{}.csv", trend.category, usage.amino_acid));
            codon_trend(usage)?.write(&path, DELIMITER)?;
            paths.push(path);
        }
    }

    debug!("Wrote {} trend tables to: {output_dir:?}", paths.len());
    Ok(paths)
}

// ----------------------------------------------------------------------------
// Alignments

/// Write the gap-free alignment of every record as `<gene>.fas`.
pub fn write_alignments<P>(records: &[GeneRecord], output_dir: &P) -> Result<Vec<PathBuf>, Report>
where
    P: AsRef<Path> + Debug,
{
    let output_dir = utils::create_dir(output_dir)?;
    records
        .iter()
        .map(|record| {
            let path = output_dir.join(format!("{}.fas", record.name));
            record
                .alignment
                .write_fasta(&path)
                .wrap_err_with(|| format!("Failed to write the alignment of {}", record.name))?;
            Ok(path)
        })
        .collect()
}
