//! `branchsite` tests genes for **positive selection** with the branch-site model
//! and classifies the selected sites of a foreground clade.
//!
//! ## Why branchsite?
//!
//! 1. `branchsite` _summarizes_ a cohort of branch-site model runs.
//!
//!    Each gene folder holds the output of an alternative and a null model run.
//!    The two likelihoods are compared with a likelihood ratio test, and the
//!    p-values of the whole cohort are corrected with the Benjamini-Hochberg
//!    procedure.
//!
//! 1. `branchsite` _classifies_ the positively selected sites.
//!
//!    Every site of the Bayes Empirical Bayes table with a significant posterior
//!    probability is put into one of the [categories](classify::Category), by
//!    comparing the amino acids of the clade to those of the other taxa.
//!
//! 1. `branchsite` _looks for trends_ in codon usage.
//!
//!    The codons of conserved columns are pooled across genes, to compare the
//!    nucleotide and codon usage of the clade to the other taxa.
//!
//! ## Quick start
//!
//! ```text
//! branchsite toy --output-dir toy
//! branchsite run --input toy/* --output-dir output --clade pucciniales --trends
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod classify;
pub mod codon;
pub mod export;
pub mod gene;
pub mod run;
pub mod selection;
pub mod sequence;
pub mod toy;
pub mod trend;
pub mod utils;

#[doc(inline)]
#[cfg(feature = "cli")]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::gene::GeneRecord;
#[doc(inline)]
pub use crate::run::{run, RunArgs};
