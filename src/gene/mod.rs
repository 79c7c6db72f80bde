//! The per-gene [`GeneRecord`] and the scanner that builds it from model output.
//!
//! A gene folder holds the output of two runs of the branch-site model:
//!
//! ```text
//! OG0001/
//! ├── Alternative/OG0001.mlc
//! └── Null/OG0001.mlc
//! ```
//!
//! The alternative output provides the likelihood, the site class parameters,
//! the Bayes Empirical Bayes (BEB) sites and the gap-free alignment. The null
//! output only provides its likelihood.

pub mod parser;

pub use parser::ParserConfig;

use crate::classify::Classification;
use crate::sequence::Alignment;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// Site Classes
// ----------------------------------------------------------------------------

/// Parameters of one site class of the branch-site model.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SiteClass {
    /// Proportion of sites in the class.
    pub proportion: f64,
    /// dN/dS (w) on the background branches.
    pub background_w: f64,
    /// dN/dS (w) on the foreground branches.
    pub foreground_w: f64,
}

impl Display for SiteClass {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.proportion, self.background_w, self.foreground_w)
    }
}

/// The four site classes, in the order printed by the model (0, 1, 2a, 2b).
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SiteClasses {
    /// Class 0, purifying selection on all branches.
    pub conserved: SiteClass,
    /// Class 1, neutral evolution on all branches.
    pub neutral: SiteClass,
    /// Class 2a, positive selection on the foreground, purifying on the background.
    pub positive_purifying: SiteClass,
    /// Class 2b, positive selection on the foreground, neutral on the background.
    pub positive_neutral: SiteClass,
}

impl SiteClasses {
    /// Assemble the classes from the proportion, background w and foreground w rows.
    ///
    /// Returns [`None`] unless every row has at least four values.
    pub fn from_rows(proportions: &[f64], background_w: &[f64], foreground_w: &[f64]) -> Option<Self> {
        if [proportions, background_w, foreground_w].iter().any(|row| row.len() < 4) {
            return None;
        }
        let class = |i: usize| SiteClass {
            proportion: proportions[i],
            background_w: background_w[i],
            foreground_w: foreground_w[i],
        };
        Some(SiteClasses {
            conserved: class(0),
            neutral: class(1),
            positive_purifying: class(2),
            positive_neutral: class(3),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteClass> {
        [&self.conserved, &self.neutral, &self.positive_purifying, &self.positive_neutral].into_iter()
    }
}

// ----------------------------------------------------------------------------
// Selected Site
// ----------------------------------------------------------------------------

/// A row of the BEB table whose posterior probability is flagged as significant.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SelectedSite {
    /// 1-based alignment position, as printed.
    pub position: String,
    /// Posterior probability token, including its significance marker (ex. `0.998**`).
    pub probability: String,
}

impl Display for SelectedSite {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.position, self.probability)
    }
}

impl SelectedSite {
    pub fn new(position: &str, probability: &str) -> Self {
        SelectedSite { position: position.to_string(), probability: probability.to_string() }
    }

    /// The 0-based alignment column of the site.
    pub fn column(&self) -> Result<usize, Report> {
        match self.position.parse::<usize>() {
            Ok(position) if position > 0 => Ok(position - 1),
            _ => Err(eyre!("Invalid selected site position: {:?}", self.position)),
        }
    }
}

// ----------------------------------------------------------------------------
// Gene Record
// ----------------------------------------------------------------------------

/// Everything known about one gene, from parsing to classification.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GeneRecord {
    /// Gene name, the name of its folder.
    pub name: String,
    /// Folder holding the alternative and null model outputs.
    pub folder: PathBuf,
    /// False when either model output is missing.
    pub valid: bool,
    /// Log-likelihood of the alternative model.
    pub alternative_lnl: Option<f64>,
    /// Log-likelihood of the null model.
    pub null_lnl: Option<f64>,
    /// Site class parameters of the alternative model.
    pub site_classes: Option<SiteClasses>,
    /// BEB sites flagged as positively selected.
    pub selected_sites: Vec<SelectedSite>,
    /// Gap-free codon alignment.
    pub alignment: Alignment,
    /// Number of codon sites after gap removal.
    pub gene_length: Option<usize>,
    /// Likelihood ratio test p-value.
    pub p_value: Option<f64>,
    /// Benjamini-Hochberg adjusted p-value, computed over the whole cohort.
    pub adjusted_p_value: Option<f64>,
    /// Site classification, once the classifier has run.
    pub classification: Option<Classification>,
}

impl Display for GeneRecord {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.name, self.folder)
    }
}

impl GeneRecord {
    /// Create an empty, valid record for a gene folder.
    pub fn new<P>(folder: &P) -> Self
    where
        P: AsRef<Path>,
    {
        let folder = folder.as_ref();
        let name = match folder.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => folder.to_string_lossy().to_string(),
        };
        GeneRecord { name, folder: folder.to_path_buf(), valid: true, ..Default::default() }
    }

    /// Read a gene folder into a [`GeneRecord`].
    ///
    /// A missing model output does not fail: the record is returned with
    /// `valid` set to false. An output that exists but cannot be read is an
    /// error for this gene.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use branchsite::{toy, gene::{GeneRecord, ParserConfig}};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let folder = toy::gene(&dir.path(), "OG0001")?;
    /// let record = GeneRecord::from_folder(&folder, &ParserConfig::default())?;
    ///
    /// assert!(record.valid);
    /// assert_eq!(record.name, "OG0001");
    /// assert_eq!(record.alternative_lnl, Some(toy::ALTERNATIVE_LNL));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn from_folder<P>(folder: &P, config: &ParserConfig) -> Result<GeneRecord, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let mut record = GeneRecord::new(folder);
        let folder = folder.as_ref();

        let alternative = parser::find_output(&folder.join(&config.alternative_dir), &config.suffix)?;
        let null = parser::find_output(&folder.join(&config.null_dir), &config.suffix)?;

        let (alternative, null) = match (alternative, null) {
            (Some(alternative), Some(null)) => (alternative, null),
            (alternative, _) => {
                let missing = match alternative {
                    None => &config.alternative_dir,
                    Some(_) => &config.null_dir,
                };
                warn!("{}: no '*{}*' output in {missing:?}", record.name, config.suffix);
                record.valid = false;
                return Ok(record);
            }
        };

        debug!("{}: reading {alternative:?} and {null:?}", record.name);
        let alternative = std::fs::read_to_string(&alternative)
            .wrap_err_with(|| eyre!("Failed to read alternative model output: {alternative:?}"))?;
        let null = std::fs::read_to_string(&null)
            .wrap_err_with(|| eyre!("Failed to read null model output: {null:?}"))?;

        record.read_outputs(&alternative, &null);
        Ok(record)
    }

    /// Fill the record from the text of the alternative and null model outputs.
    ///
    /// ```rust
    /// use branchsite::{toy, gene::GeneRecord};
    ///
    /// let mut record = GeneRecord::new(&"OG0001");
    /// record.read_outputs(&toy::alternative(-100.0), &toy::null(-105.0));
    ///
    /// assert_eq!(record.null_lnl, Some(-105.0));
    /// assert_eq!(record.gene_length, Some(6));
    /// assert_eq!(record.selected_sites.len(), 5);
    /// ```
    pub fn read_outputs(&mut self, alternative: &str, null: &str) {
        let scan = parser::scan_alternative(alternative);
        self.null_lnl = parser::scan_null(null);

        self.alternative_lnl = scan.lnl;
        self.site_classes = match (&scan.proportions, &scan.background_w, &scan.foreground_w) {
            (Some(p), Some(b), Some(f)) => SiteClasses::from_rows(p, b, f),
            _ => None,
        };
        self.selected_sites = scan.selected_sites;

        // prefer the gap-free alignment, the pre-gap alignment only fills in when it is absent
        self.alignment = if scan.empty_after_gaps {
            Alignment::new()
        } else if !scan.primary.is_empty() {
            scan.primary
        } else {
            if !scan.fallback.is_empty() {
                warn!("{}: no gap-free alignment, using the alignment printed before gap removal.", self.name);
            }
            scan.fallback
        };

        self.gene_length = match scan.empty_after_gaps {
            true => Some(0),
            false => scan.gap_free_length.or(scan.raw_length),
        };

        if !self.alignment.is_rectangular() {
            warn!("{}: alignment taxa have different lengths.", self.name);
        }
        debug!(
            "{}: lnL {:?}, {} taxa, {:?} sites, {} selected sites",
            self.name,
            self.alternative_lnl,
            self.alignment.len(),
            self.gene_length,
            self.selected_sites.len()
        );
    }
}
