//! Classification of positively selected sites by the amino acid pattern of a
//! foreground [`Clade`] against the remaining taxa.
//!
//! Each selected site falls into exactly one [`Category`], checked in order:
//!
//! | Category         | Column pattern                                                           |
//! |------------------|--------------------------------------------------------------------------|
//! | Conserved        | a single amino acid in every taxon                                       |
//! | Unique           | clade homogeneous, its amino acid absent from other taxa                 |
//! | Diverse          | clade heterogeneous, none of its amino acids in other taxa               |
//! | Mostly unique    | clade enriched, homogeneous, not the dominant amino acid                 |
//! | Mostly diverse   | clade enriched, none of its amino acids dominant                         |
//! | Mostly conserved | dominant amino acid in at least half the taxa, clade homogeneous on it   |
//! | Shared           | dominant amino acid in at least half the taxa, clade has two, one dominant |
//! | Variable         | anything else                                                            |
//!
//! Without a clade, only Conserved applies and every other site is Unclassified.

pub mod clade;
#[cfg(test)]
mod tests;

pub use clade::{Clade, Preset};

use crate::codon;
use crate::gene::GeneRecord;
use crate::sequence::Alignment;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, IntoEnumIterator};

// ----------------------------------------------------------------------------
// Threshold
// ----------------------------------------------------------------------------

/// A frequency cutoff, inclusive or strict.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
    AtLeast(f64),
    Above(f64),
}

impl Threshold {
    pub fn passes(&self, frequency: f64) -> bool {
        match self {
            Threshold::AtLeast(t) => frequency >= *t,
            Threshold::Above(t) => frequency > *t,
        }
    }
}

/// Majority required at a selected site for Mostly conserved and Shared.
pub const SELECTED_MAJORITY: Threshold = Threshold::AtLeast(0.50);
/// Majority required at any other column for the all-sites mostly conserved pool.
pub const ALIGNMENT_MAJORITY: Threshold = Threshold::Above(0.70);

// ----------------------------------------------------------------------------
// Dominant
// ----------------------------------------------------------------------------

/// The amino acids tied for the highest count in a pool.
#[derive(Clone, Debug, PartialEq)]
pub struct Dominant {
    /// Tied amino acids, sorted.
    pub symbols: Vec<char>,
    /// Frequency of any one of them in the pool.
    pub frequency: f64,
}

impl Dominant {
    /// ```rust
    /// use branchsite::classify::Dominant;
    ///
    /// let dominant = Dominant::new(&['K', 'E', 'K', 'E', 'G']);
    /// assert_eq!(dominant.symbols, ['E', 'K']);
    /// assert_eq!(dominant.frequency, 0.4);
    /// ```
    pub fn new(pool: &[char]) -> Self {
        let counts = pool.iter().counts();
        let max = counts.values().copied().max().unwrap_or(0);
        let symbols = counts.into_iter().filter(|(_, n)| *n == max).map(|(s, _)| *s).sorted().collect();
        let frequency = match pool.len() {
            0 => 0.0,
            n => max as f64 / n as f64,
        };
        Dominant { symbols, frequency }
    }

    pub fn contains(&self, symbol: &char) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn passes(&self, threshold: Threshold) -> bool {
        !self.symbols.is_empty() && threshold.passes(self.frequency)
    }
}

// ----------------------------------------------------------------------------
// Category
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
    Conserved,
    Unique,
    Diverse,
    #[strum(to_string = "Mostly conserved")]
    MostlyConserved,
    #[strum(to_string = "Mostly unique")]
    MostlyUnique,
    #[strum(to_string = "Mostly diverse")]
    MostlyDiverse,
    Shared,
    Variable,
    /// Not conserved, and no clade to compare against.
    Unclassified,
}

/// Number of selected sites per [`Category`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SiteCounts {
    counts: BTreeMap<Category, usize>,
}

impl SiteCounts {
    pub fn new() -> Self {
        SiteCounts { counts: Category::iter().map(|c| (c, 0)).collect() }
    }

    pub fn increment(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

// ----------------------------------------------------------------------------
// Codon Details
// ----------------------------------------------------------------------------

/// The codons of one alignment column, split between clade and other taxa.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CodonPair {
    pub clade: Vec<String>,
    pub other: Vec<String>,
}

/// Codon pairs kept for trend analysis.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CodonDetails {
    /// Selected sites classified as Conserved.
    pub conserved: Vec<CodonPair>,
    /// Selected sites classified as Mostly conserved.
    pub mostly_conserved: Vec<CodonPair>,
    /// Non-selected columns with a single amino acid.
    pub all_conserved: Vec<CodonPair>,
    /// Non-selected columns above the alignment majority.
    pub all_mostly_conserved: Vec<CodonPair>,
}

// ----------------------------------------------------------------------------
// Site Column
// ----------------------------------------------------------------------------

/// One alignment column, translated and split by clade membership.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteColumn<'a> {
    /// Amino acids of every taxon, in alignment order.
    pub amino_acids: Vec<char>,
    pub clade_amino_acids: Vec<char>,
    pub other_amino_acids: Vec<char>,
    clade_codons: Vec<&'a str>,
    other_codons: Vec<&'a str>,
}

impl<'a> SiteColumn<'a> {
    /// Extract the 0-based column `i` of the alignment.
    pub fn new(alignment: &'a Alignment, clade: &[String], i: usize) -> Result<Self, Report> {
        let codons = alignment.column(i)?;
        let mut column = SiteColumn {
            amino_acids: codon::translate_all(codons.iter().copied()),
            clade_amino_acids: Vec::new(),
            other_amino_acids: Vec::new(),
            clade_codons: Vec::new(),
            other_codons: Vec::new(),
        };

        for ((taxon, codon), aa) in alignment.taxa().zip(codons).zip(&column.amino_acids) {
            match clade.iter().any(|c| c == taxon) {
                true => {
                    column.clade_codons.push(codon);
                    column.clade_amino_acids.push(*aa);
                }
                false => {
                    column.other_codons.push(codon);
                    column.other_amino_acids.push(*aa);
                }
            }
        }

        Ok(column)
    }

    pub fn pair(&self) -> CodonPair {
        CodonPair {
            clade: self.clade_codons.iter().map(|c| c.to_string()).collect(),
            other: self.other_codons.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// True when the column holds exactly one amino acid.
    pub fn is_conserved(&self) -> bool {
        !self.amino_acids.is_empty() && self.amino_acids.iter().all_equal()
    }

    /// The clade amino acid, when every clade taxon has the same one.
    fn clade_symbol(&self) -> Option<char> {
        match self.clade_amino_acids.iter().all_equal_value() {
            Ok(aa) => Some(*aa),
            Err(_) => None,
        }
    }

    /// True when the clade taxa all share an amino acid that no other taxon has.
    pub fn is_clade_unique(&self) -> bool {
        self.clade_symbol().is_some_and(|aa| !self.other_amino_acids.contains(&aa))
    }

    /// Assign the column to a [`Category`]. `has_clade` is false when no clade taxa are present.
    pub fn categorize(&self, has_clade: bool) -> Category {
        if self.is_conserved() {
            return Category::Conserved;
        }
        if !has_clade {
            return Category::Unclassified;
        }

        let clade_symbol = self.clade_symbol();
        let other = &self.other_amino_acids;
        let dominant = Dominant::new(&self.amino_acids);

        if self.is_clade_unique() {
            return Category::Unique;
        }
        if !self.clade_amino_acids.iter().any(|aa| other.contains(aa)) {
            return Category::Diverse;
        }

        let clade_counts = self.clade_amino_acids.iter().counts();
        let other_counts = other.iter().counts();
        let enriched = clade_counts.iter().all(|(aa, n)| *n > other_counts.get(aa).copied().unwrap_or(0));
        if enriched {
            if clade_symbol.is_some_and(|aa| !dominant.contains(&aa)) {
                return Category::MostlyUnique;
            }
            if !self.clade_amino_acids.iter().any(|aa| dominant.contains(aa)) {
                return Category::MostlyDiverse;
            }
        }

        if dominant.passes(SELECTED_MAJORITY) {
            if clade_symbol.is_some_and(|aa| dominant.contains(&aa)) {
                return Category::MostlyConserved;
            }
            let distinct = self.clade_amino_acids.iter().unique().count();
            if distinct == 2 && dominant.symbols.iter().any(|aa| self.clade_amino_acids.contains(aa)) {
                return Category::Shared;
            }
        }

        Category::Variable
    }
}

// ----------------------------------------------------------------------------
// Classification
// ----------------------------------------------------------------------------

/// The outcome of classifying one gene.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Classification {
    /// Selected sites per category, [`None`] when the gene has no selected sites.
    pub counts: Option<SiteCounts>,
    /// Columns unique to the clade, selected or not. [`None`] without a clade.
    pub all_clade_unique: Option<usize>,
    /// Codon pairs for trend analysis, when requested and a clade is present.
    pub details: Option<CodonDetails>,
}

/// Classify the selected sites of an alignment.
///
/// ## Arguments
///
/// - `alignment` - Gap-free codon alignment.
/// - `columns` - 0-based columns of the selected sites.
/// - `clade` - Clade taxa present in the alignment, empty for no clade.
/// - `detail` - Keep codon pairs for trend analysis.
pub fn classify(
    alignment: &Alignment,
    columns: &[usize],
    clade: &[String],
    detail: bool,
) -> Result<Classification, Report> {
    if alignment.is_empty() && !columns.is_empty() {
        return Err(eyre!("{} selected sites but the alignment is empty.", columns.len()));
    }

    let has_clade = !clade.is_empty();
    let keep_details = detail && has_clade;
    let mut details = CodonDetails::default();

    let counts = match columns.is_empty() {
        true => None,
        false => {
            let mut counts = SiteCounts::new();
            for i in columns {
                let column = SiteColumn::new(alignment, clade, *i)?;
                let category = column.categorize(has_clade);
                counts.increment(category);

                if keep_details {
                    match category {
                        Category::Conserved => details.conserved.push(column.pair()),
                        Category::MostlyConserved => details.mostly_conserved.push(column.pair()),
                        _ => (),
                    }
                }
            }
            Some(counts)
        }
    };

    let mut all_clade_unique = 0;
    if has_clade {
        for i in 0..alignment.num_columns() {
            let column = SiteColumn::new(alignment, clade, i)?;
            if column.is_clade_unique() {
                all_clade_unique += 1;
            }
            if !keep_details || columns.contains(&i) {
                continue;
            }
            if column.is_conserved() {
                details.all_conserved.push(column.pair());
            }
            if Dominant::new(&column.amino_acids).passes(ALIGNMENT_MAJORITY) {
                details.all_mostly_conserved.push(column.pair());
            }
        }
    }

    Ok(Classification {
        counts,
        all_clade_unique: has_clade.then_some(all_clade_unique),
        details: keep_details.then_some(details),
    })
}

impl GeneRecord {
    /// Classify the selected sites of this gene, storing the result on the record.
    ///
    /// ```rust
    /// use branchsite::{toy, classify::{Category, Clade}, gene::GeneRecord};
    ///
    /// let mut record = GeneRecord::new(&"OG0001");
    /// record.read_outputs(&toy::alternative(-100.0), &toy::null(-105.0));
    ///
    /// let clade = Clade::Taxa(toy::CLADE.iter().map(|t| t.to_string()).collect());
    /// let classification = record.classify(Some(&clade), false)?;
    /// let counts = classification.counts.as_ref().unwrap();
    ///
    /// assert_eq!(counts.get(Category::Unique), 1);
    /// assert_eq!(counts.total(), 5);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn classify(&mut self, clade: Option<&Clade>, detail: bool) -> Result<&Classification, Report> {
        let taxa = match clade {
            Some(clade) => clade.resolve(&self.alignment),
            None => Vec::new(),
        };
        let columns = self
            .selected_sites
            .iter()
            .map(|site| site.column())
            .collect::<Result<Vec<_>, Report>>()
            .wrap_err_with(|| format!("Failed to locate the selected sites of {}", self.name))?;

        let classification = classify(&self.alignment, &columns, &taxa, detail)
            .wrap_err_with(|| format!("Failed to classify the selected sites of {}", self.name))?;
        Ok(self.classification.insert(classification))
    }
}
