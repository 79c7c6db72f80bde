//! Nucleotide and codon usage of the clade against the other taxa, pooled over
//! the conserved columns of every gene.

#[cfg(test)]
mod tests;

use crate::classify::{CodonDetails, CodonPair};
use crate::codon;
use crate::gene::GeneRecord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use strum::{EnumIter, IntoEnumIterator};

/// Nucleotides reported in the nucleotide trend, in order.
pub const NUCLEOTIDES: [char; 4] = ['A', 'T', 'G', 'C'];

/// The column pools a trend is computed over.
#[derive(Clone, Copy, Debug, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize)]
pub enum TrendCategory {
    /// Selected sites classified as Conserved.
    Conserved,
    /// Selected sites classified as Mostly conserved.
    MostlyConserved,
    /// Non-selected columns with a single amino acid.
    AllConserved,
    /// Non-selected columns above the alignment majority.
    AllMostlyConserved,
}

impl Display for TrendCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrendCategory::Conserved => "Conserved",
            TrendCategory::MostlyConserved => "Mostly_Conserved",
            TrendCategory::AllConserved => "All_Conserved",
            TrendCategory::AllMostlyConserved => "All_Mostly_Conserved",
        };
        write!(f, "{label}")
    }
}

impl TrendCategory {
    pub fn pairs<'d>(&self, details: &'d CodonDetails) -> &'d [CodonPair] {
        match self {
            TrendCategory::Conserved => &details.conserved,
            TrendCategory::MostlyConserved => &details.mostly_conserved,
            TrendCategory::AllConserved => &details.all_conserved,
            TrendCategory::AllMostlyConserved => &details.all_mostly_conserved,
        }
    }
}

// ----------------------------------------------------------------------------
// Frequencies
// ----------------------------------------------------------------------------

/// Frequency of one nucleotide among all clade and all other nucleotides.
///
/// A side without nucleotides has no frequency.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NucleotideFrequency {
    pub nucleotide: char,
    pub clade: Option<f64>,
    pub other: Option<f64>,
}

/// Codon usage for one amino acid found on both sides.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CodonUsage {
    pub amino_acid: char,
    /// Codon to (clade frequency, other frequency), within the amino acid.
    pub codons: BTreeMap<String, (f64, f64)>,
}

/// Trends of one [`TrendCategory`] across the cohort.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Trend {
    pub category: TrendCategory,
    /// Number of pooled columns.
    pub num_columns: usize,
    pub nucleotides: Vec<NucleotideFrequency>,
    pub codons: Vec<CodonUsage>,
}

fn nucleotide_counts<'c, I>(codons: I) -> [usize; 4]
where
    I: IntoIterator<Item = &'c String>,
{
    let mut counts = [0; 4];
    codons.into_iter().flat_map(|c| c.chars()).for_each(|n| {
        if let Some(i) = NUCLEOTIDES.iter().position(|x| *x == n.to_ascii_uppercase()) {
            counts[i] += 1;
        }
    });
    counts
}

/// Nucleotide frequencies of the clade and other codons of the pooled columns.
///
/// ```rust
/// use branchsite::classify::CodonPair;
/// use branchsite::trend::nucleotide_frequencies;
///
/// let pair = CodonPair { clade: vec!["AAA".into(), "AAG".into()], other: vec!["GGG".into()] };
/// let frequencies = nucleotide_frequencies(&[&pair]);
///
/// assert_eq!(frequencies[0].nucleotide, 'A');
/// assert_eq!(frequencies[0].clade, Some(5.0 / 6.0));
/// assert_eq!(frequencies[2].other, Some(1.0));
/// ```
pub fn nucleotide_frequencies(pairs: &[&CodonPair]) -> Vec<NucleotideFrequency> {
    let clade = nucleotide_counts(pairs.iter().flat_map(|p| &p.clade));
    let other = nucleotide_counts(pairs.iter().flat_map(|p| &p.other));
    let proportion = |counts: &[usize; 4], i: usize| {
        let total: usize = counts.iter().sum();
        (total > 0).then(|| counts[i] as f64 / total as f64)
    };

    NUCLEOTIDES
        .iter()
        .enumerate()
        .map(|(i, nucleotide)| NucleotideFrequency {
            nucleotide: *nucleotide,
            clade: proportion(&clade, i),
            other: proportion(&other, i),
        })
        .collect()
}

/// Codons of a pool grouped by amino acid, amino acids in order of first appearance.
fn group_by_amino_acid<'c, I>(codons: I) -> Vec<(char, Vec<&'c str>)>
where
    I: IntoIterator<Item = &'c String>,
{
    let mut groups: Vec<(char, Vec<&str>)> = Vec::new();
    for codon in codons {
        let aa = codon::translate_or_unknown(codon);
        match groups.iter_mut().find(|(a, _)| *a == aa) {
            Some((_, group)) => group.push(codon.as_str()),
            None => groups.push((aa, vec![codon.as_str()])),
        }
    }
    groups
}

/// Codon usage per amino acid of the pooled columns, for amino acids found on both sides.
///
/// ```rust
/// use branchsite::classify::CodonPair;
/// use branchsite::trend::codon_usage;
///
/// let pair = CodonPair { clade: vec!["AAA".into(), "AAG".into()], other: vec!["AAA".into(), "GGG".into()] };
/// let usage = codon_usage(&[&pair]);
///
/// assert_eq!(usage.len(), 1);
/// assert_eq!(usage[0].amino_acid, 'K');
/// assert_eq!(usage[0].codons["AAG"], (0.5, 0.0));
/// ```
pub fn codon_usage(pairs: &[&CodonPair]) -> Vec<CodonUsage> {
    let clade = group_by_amino_acid(pairs.iter().flat_map(|p| &p.clade));
    let other = group_by_amino_acid(pairs.iter().flat_map(|p| &p.other));

    clade
        .iter()
        .filter_map(|(aa, clade_codons)| {
            let (_, other_codons) = other.iter().find(|(a, _)| a == aa)?;
            let clade_counts = clade_codons.iter().counts();
            let other_counts = other_codons.iter().counts();
            let codons = clade_codons
                .iter()
                .chain(other_codons.iter())
                .unique()
                .map(|codon| {
                    let clade_freq = clade_counts.get(codon).copied().unwrap_or(0) as f64 / clade_codons.len() as f64;
                    let other_freq = other_counts.get(codon).copied().unwrap_or(0) as f64 / other_codons.len() as f64;
                    (codon.to_string(), (clade_freq, other_freq))
                })
                .collect();
            Some(CodonUsage { amino_acid: *aa, codons })
        })
        .collect()
}

/// Compute the trends of every [`TrendCategory`], pooling every codon pair of
/// every record that kept classification details.
pub fn analyze(records: &[GeneRecord]) -> Vec<Trend> {
    let details = records
        .iter()
        .filter_map(|r| r.classification.as_ref())
        .filter_map(|c| c.details.as_ref())
        .collect_vec();

    TrendCategory::iter()
        .map(|category| {
            let pairs = details.iter().flat_map(|d| category.pairs(d)).collect_vec();
            Trend {
                category,
                num_columns: pairs.len(),
                nucleotides: nucleotide_frequencies(&pairs),
                codons: codon_usage(&pairs),
            }
        })
        .collect()
}
