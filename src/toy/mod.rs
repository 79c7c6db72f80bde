//! Toy branch-site model outputs, for testing and for trying out `branchsite run`.
//!
//! Every toy gene has the same alternative model output: four taxa, six
//! gap-free codon sites and five positively selected sites, one per
//! classification category the two _Puccinia_ taxa can produce. Only the
//! likelihoods change between genes.

use color_eyre::eyre::{Report, Result, WrapErr};
#[cfg(feature = "cli")]
use clap::Parser;
use indoc::formatdoc;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Alternative model log-likelihood of the default toy gene.
pub const ALTERNATIVE_LNL: f64 = -1520.25;
/// Null model log-likelihood of the default toy gene.
pub const NULL_LNL: f64 = -1525.25;
/// Foreground clade of the toy alignment.
pub const CLADE: &[&str] = &["Puccinia_graminis", "Puccinia_triticina"];
/// Likelihood gain of the alternative model, cycled across toy genes.
pub const LNL_GAINS: &[f64] = &[5.0, 0.5, 12.0, -1.0];

/// Gap-free toy alignment.
pub const ALIGNMENT: &str = "Puccinia_graminis          ATG AAA TTT CAT AAA AAA
Puccinia_triticina         ATG AAA TTA CAT GAA AAA
Ustilago_maydis            ATG GGG GGG CAT AAA AAA
Cryptococcus_neoformans    ATG GGT GCT GAT GAA GAA";

/// Toy alignment before gap removal, with an extra fourth site.
pub const ALIGNMENT_WITH_GAPS: &str = "Puccinia_graminis          ATG AAA TTT --- CAT AAA AAA
Puccinia_triticina         ATG AAA TTA --- CAT GAA AAA
Ustilago_maydis            ATG GGG GGG CCC CAT AAA AAA
Cryptococcus_neoformans    ATG GGT GCT CCC GAT GAA GAA";

/// Rows of the Bayes Empirical Bayes table.
pub const BEB_SITES: &str = "     1 M 0.962*
     2 K 0.998**
     3 F 0.971*
     4 H 0.955*
     5 K 0.991**
     6 K 0.612";

/// Arguments for writing a toy dataset.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
pub struct ToyArgs {
    /// Output directory, one gene folder is written per gene.
    #[cfg_attr(feature = "cli", clap(short = 'o', long, required = true))]
    pub output_dir: PathBuf,

    /// Number of genes.
    #[cfg_attr(feature = "cli", clap(short = 'g', long, default_value_t = 4))]
    pub genes: usize,
}

impl Default for ToyArgs {
    fn default() -> Self {
        ToyArgs { output_dir: PathBuf::from("toy"), genes: 4 }
    }
}

/// Text of a toy alternative model output.
pub fn alternative(lnl: f64) -> String {
    formatdoc! {"
        CODONML (in paml version 4.9j, February 2020)  gene.phy
        Model: several dN/dS ratios for branches for branches,
        Codon frequency model: F3x4
        Site-class models:  BranchSite
        ns =   4  ls =   7

        seed used = 20190304
             4     21

        {ALIGNMENT_WITH_GAPS}

        Before deleting alignment gaps. 7 sites
        After deleting gaps. 6 sites

        {ALIGNMENT}

        Printing out site pattern counts

             4      6  P

        {ALIGNMENT}

        TREE #  1:  (((1, 2) #1, 3), 4);   MP score: -1
        lnL(ntime:  5  np: 10):  {lnl:.6}      +0.000000

        MLEs of dN/dS (w) for site classes (K=4)

        site class             0        1       2a       2b
        proportion       0.80000  0.10000  0.08000  0.02000
        background w     0.05000  1.00000  0.05000  1.00000
        foreground w     0.05000  1.00000 12.50000 12.50000

        Naive Empirical Bayes (NEB) analysis
        Positive sites for foreground lineages Prob(w>1):
        {BEB_SITES}

        Bayes Empirical Bayes (BEB) analysis (Yang, Wong & Nielsen 2005. Mol. Biol. Evol. 22:1107-1118)
        Positive sites for foreground lineages Prob(w>1):
        {BEB_SITES}


        The grid (see ternary graph for p0-p1)
    "}
}

/// Text of a toy null model output.
pub fn null(lnl: f64) -> String {
    formatdoc! {"
        CODONML (in paml version 4.9j, February 2020)  gene.phy
        Model: several dN/dS ratios for branches for branches,
        Site-class models:  BranchSite

        TREE #  1:  (((1, 2) #1, 3), 4);   MP score: -1
        lnL(ntime:  5  np:  9):  {lnl:.6}      +0.000000
    "}
}

/// Write a toy gene folder with the default likelihoods.
pub fn gene<P>(dir: &P, name: &str) -> Result<PathBuf, Report>
where
    P: AsRef<Path> + Debug,
{
    gene_with(dir, name, ALTERNATIVE_LNL, NULL_LNL)
}

/// Write a toy gene folder, `<dir>/<name>/{Alternative,Null}/<name>.mlc`.
pub fn gene_with<P>(dir: &P, name: &str, alternative_lnl: f64, null_lnl: f64) -> Result<PathBuf, Report>
where
    P: AsRef<Path> + Debug,
{
    let folder = dir.as_ref().join(name);
    let outputs = [("Alternative", alternative(alternative_lnl)), ("Null", null(null_lnl))];

    for (model, text) in outputs {
        let model_dir = folder.join(model);
        std::fs::create_dir_all(&model_dir).wrap_err_with(|| format!("Failed to create directory: {model_dir:?}"))?;
        let path = model_dir.join(format!("{name}.mlc"));
        std::fs::write(&path, text).wrap_err_with(|| format!("Unable to write: {path:?}"))?;
    }

    Ok(folder)
}

/// Write a toy dataset of `args.genes` genes named `OG0001`, `OG0002`, ...
///
/// ## Examples
///
/// ```rust
/// use branchsite::toy::{self, ToyArgs};
///
/// let dir = tempfile::tempdir()?;
/// let args = ToyArgs { output_dir: dir.path().to_path_buf(), genes: 3 };
/// let folders = toy::dataset(&args)?;
///
/// assert_eq!(folders.len(), 3);
/// assert!(dir.path().join("OG0003").join("Null").join("OG0003.mlc").exists());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn dataset(args: &ToyArgs) -> Result<Vec<PathBuf>, Report> {
    let folders = (0..args.genes)
        .map(|i| {
            let name = format!("OG{:04}", i + 1);
            let gain = LNL_GAINS[i % LNL_GAINS.len()];
            gene_with(&args.output_dir, &name, ALTERNATIVE_LNL, ALTERNATIVE_LNL - gain)
        })
        .collect::<Result<Vec<_>, Report>>()?;

    info!("Wrote {} toy genes to: {:?}", folders.len(), args.output_dir);
    Ok(folders)
}
