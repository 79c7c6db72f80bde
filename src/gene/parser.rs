//! Line scanner for the text output of the branch-site model.
//!
//! The output is read line by line with a small state machine. Sections are
//! entered and left on marker lines, values are pulled out of the lines in
//! between. Lines that are not understood are ignored.

use crate::gene::SelectedSite;
use crate::sequence::Alignment;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Marker printed before the alignment as it was read (with gaps).
pub const SEED_MARKER: &str = "seed used = ";
/// Marker printed before the sequence summary, ends the pre-gap alignment.
pub const BEFORE_GAPS_MARKER: &str = "Before deleting alignment gaps";
/// Marker printed before the gap-free alignment.
pub const AFTER_GAPS_MARKER: &str = "After deleting gaps";
/// Marker ending the gap-free alignment.
pub const PATTERN_COUNTS_MARKER: &str = "Printing out site pattern counts";
/// Marker opening the Bayes Empirical Bayes table.
pub const BEB_MARKER: &str = "Bayes Empirical Bayes (BEB)";
/// Marker ending the Bayes Empirical Bayes table.
pub const GRID_MARKER: &str = "The grid";

// ----------------------------------------------------------------------------
// Parser Config
// ----------------------------------------------------------------------------

/// Where to find the model outputs inside a gene folder.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ParserConfig {
    /// Subfolder with the alternative model output.
    pub alternative_dir: PathBuf,
    /// Subfolder with the null model output.
    pub null_dir: PathBuf,
    /// Filename fragment identifying an output file.
    pub suffix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            alternative_dir: PathBuf::from("Alternative"),
            null_dir: PathBuf::from("Null"),
            suffix: ".mlc".to_string(),
        }
    }
}

/// Find the model output file in a directory.
///
/// Returns [`None`] when the directory does not exist or holds no file whose
/// name contains `suffix`. With several candidates, the first by name is used.
pub fn find_output<P>(dir: &P, suffix: &str) -> Result<Option<PathBuf>, Report>
where
    P: AsRef<Path> + Debug,
{
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(None);
    }

    let candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .wrap_err_with(|| eyre!("Failed to read directory: {dir:?}"))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.file_name().map(|n| n.to_string_lossy().contains(suffix)).unwrap_or(false))
        .sorted()
        .collect();

    if candidates.len() > 1 {
        warn!("Multiple '*{suffix}*' outputs found in {dir:?}, using {:?}", candidates[0]);
    }

    Ok(candidates.into_iter().next())
}

// ----------------------------------------------------------------------------
// Scan
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum AlignmentSection {
    #[default]
    None,
    /// Alignment printed after the seed, before gap removal.
    Fallback,
    /// Alignment printed after gap removal.
    Primary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum BebSection {
    #[default]
    Outside,
    /// Column header line following the marker.
    Header,
    Inside,
}

/// Values collected from an alternative model output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    /// Last log-likelihood seen.
    pub lnl: Option<f64>,
    pub proportions: Option<Vec<f64>>,
    pub background_w: Option<Vec<f64>>,
    pub foreground_w: Option<Vec<f64>>,
    pub selected_sites: Vec<SelectedSite>,
    /// Alignment printed after gap removal.
    pub primary: Alignment,
    /// Alignment printed before gap removal.
    pub fallback: Alignment,
    /// Number of sites once gaps are removed.
    pub gap_free_length: Option<usize>,
    /// Number of sites from the sequence header of the raw alignment.
    pub raw_length: Option<usize>,
    /// Gap removal left no sites.
    pub empty_after_gaps: bool,
}

/// The log-likelihood of a `lnL` line.
///
/// The value is the first token after the last `:`.
///
/// ```rust
/// use branchsite::gene::parser::parse_lnl;
///
/// let line = "lnL(ntime: 11  np: 16):  -1520.250000      +0.000000";
/// assert_eq!(parse_lnl(line), Some(-1520.25));
/// assert_eq!(parse_lnl("lnL(ntime: 11  np: 16):"), None);
/// ```
pub fn parse_lnl(line: &str) -> Option<f64> {
    line.rsplit(':').next()?.split_whitespace().next()?.parse().ok()
}

/// Floats following the first `skip` tokens of a line. Tokens that are not
/// numbers are dropped.
fn parse_values(line: &str, skip: usize) -> Vec<f64> {
    line.split_whitespace().skip(skip).filter_map(|t| t.parse().ok()).collect()
}

/// Site count of a gap marker line (ex. `After deleting gaps. 290 sites`).
fn parse_site_count(line: &str) -> Option<usize> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// A taxon row of an alignment block: an identifier containing `_`, then codons.
fn parse_taxon_row(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let id = tokens.next()?;
    let codons = tokens.collect_vec();
    match id.contains('_') && !codons.is_empty() {
        true => Some((id, codons)),
        false => None,
    }
}

/// Scan the alternative model output.
///
/// ```rust
/// use branchsite::{toy, gene::parser::scan_alternative};
///
/// let scan = scan_alternative(&toy::alternative(-100.0));
/// assert_eq!(scan.lnl, Some(-100.0));
/// assert_eq!(scan.gap_free_length, Some(6));
/// assert_eq!(scan.primary.num_columns(), 6);
/// ```
pub fn scan_alternative(text: &str) -> Scan {
    let mut scan = Scan::default();
    let mut alignment = AlignmentSection::None;
    let mut beb = BebSection::Outside;
    let mut expect_seed_length = false;

    for line in text.lines() {
        let trimmed = line.trim();

        // the line after the seed holds the number of taxa and sites
        if expect_seed_length {
            expect_seed_length = false;
            scan.raw_length = line.split_whitespace().nth(1).and_then(|t| t.parse().ok());
            continue;
        }

        match beb {
            BebSection::Header => {
                beb = BebSection::Inside;
                continue;
            }
            BebSection::Inside => {
                if trimmed.starts_with(GRID_MARKER) {
                    beb = BebSection::Outside;
                } else {
                    let tokens = line.split_whitespace().collect_vec();
                    if let (Some(first), Some(last)) = (tokens.first(), tokens.last()) {
                        if last.contains('*') {
                            scan.selected_sites.push(SelectedSite::new(first, last));
                        }
                    }
                }
                continue;
            }
            BebSection::Outside => {}
        }

        if trimmed.starts_with(SEED_MARKER) {
            if alignment == AlignmentSection::None {
                alignment = AlignmentSection::Fallback;
                expect_seed_length = true;
            }
        } else if trimmed.starts_with(BEFORE_GAPS_MARKER) {
            if alignment == AlignmentSection::Fallback {
                alignment = AlignmentSection::None;
            }
        } else if trimmed.starts_with(AFTER_GAPS_MARKER) {
            if scan.gap_free_length.is_none() {
                scan.gap_free_length = parse_site_count(line);
            }
            if scan.gap_free_length == Some(0) {
                scan.empty_after_gaps = true;
                scan.gap_free_length = None;
                alignment = AlignmentSection::None;
            } else {
                alignment = AlignmentSection::Primary;
            }
        } else if trimmed.starts_with(PATTERN_COUNTS_MARKER) {
            alignment = AlignmentSection::None;
        } else if trimmed.starts_with(BEB_MARKER) {
            beb = BebSection::Header;
        } else if trimmed.starts_with("lnL") {
            if let Some(lnl) = parse_lnl(line) {
                scan.lnl = Some(lnl);
            }
        } else if trimmed.starts_with("proportion") {
            scan.proportions = Some(parse_values(line, 1));
        } else if trimmed.starts_with("background w") {
            scan.background_w = Some(parse_values(line, 2));
        } else if trimmed.starts_with("foreground w") {
            scan.foreground_w = Some(parse_values(line, 2));
        } else if let Some((id, codons)) = parse_taxon_row(line) {
            match alignment {
                AlignmentSection::Primary => scan.primary.extend(id, codons),
                AlignmentSection::Fallback => scan.fallback.extend(id, codons),
                AlignmentSection::None => {}
            }
        }
    }

    scan
}

/// Scan the null model output, only its last log-likelihood is used.
///
/// ```rust
/// use branchsite::{toy, gene::parser::scan_null};
///
/// assert_eq!(scan_null(&toy::null(-105.0)), Some(-105.0));
/// assert_eq!(scan_null("no likelihood here"), None);
/// ```
pub fn scan_null(text: &str) -> Option<f64> {
    text.lines().filter(|line| line.trim().starts_with("lnL")).filter_map(parse_lnl).last()
}
