//! Likelihood ratio test of the branch-site model, with Benjamini-Hochberg
//! correction over the whole gene cohort.


use crate::gene::GeneRecord;
use color_eyre::eyre::{eyre, Report, Result};
use log::debug;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::cmp::Ordering;

/// Adjusted p-value below which a gene is significant.
pub const SIGNIFICANCE: f64 = 0.05;
/// Degrees of freedom of the test, the null model fixes one parameter.
pub const DEGREES_OF_FREEDOM: f64 = 1.0;

/// P-value of the likelihood ratio test between the alternative and null model.
///
/// A missing likelihood, or an alternative model that fits worse than the
/// null model, gives a p-value of 1.
///
/// ## Examples
///
/// ```rust
/// use branchsite::selection::likelihood_ratio_test;
///
/// let p = likelihood_ratio_test(Some(-100.0), Some(-105.0))?;
/// assert!((p - 0.0015654).abs() < 1e-6);
///
/// assert_eq!(likelihood_ratio_test(Some(-100.0), Some(-95.0))?, 1.0);
/// assert_eq!(likelihood_ratio_test(None, Some(-95.0))?, 1.0);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn likelihood_ratio_test(alternative_lnl: Option<f64>, null_lnl: Option<f64>) -> Result<f64, Report> {
    let (alternative, null) = match (alternative_lnl, null_lnl) {
        (Some(alternative), Some(null)) => (alternative, null),
        _ => return Ok(1.0),
    };

    let statistic = 2.0 * (alternative - null);
    if statistic.is_nan() || statistic < 0.0 {
        return Ok(1.0);
    }

    let dist = ChiSquared::new(DEGREES_OF_FREEDOM).map_err(|e| eyre!("Invalid chi-squared distribution: {e}"))?;
    Ok(1.0 - dist.cdf(statistic))
}

/// Benjamini-Hochberg FDR correction.
///
/// Returns adjusted p-values in the same order as the input.
///
/// ```rust
/// use branchsite::selection::benjamini_hochberg;
///
/// let adjusted = benjamini_hochberg(&[0.01, 0.04, 0.03]);
/// # let expected = [0.03, 0.04, 0.04];
/// # adjusted.iter().zip(expected).for_each(|(q, e)| approx::assert_relative_eq!(*q, e, epsilon = 1e-12));
/// assert!(adjusted.iter().all(|q| *q < 0.05));
/// ```
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    if n == 0 {
        return Vec::new();
    }

    // stable, ties keep their input order
    let mut indexed: Vec<(usize, f64)> = p_values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut adjusted = vec![1.0; n];
    let mut cummin = f64::INFINITY;
    for i in (0..n).rev() {
        let (orig_idx, p) = indexed[i];
        let rank = (i + 1) as f64;
        cummin = cummin.min((p * n as f64 / rank).min(1.0));
        adjusted[orig_idx] = cummin;
    }

    adjusted
}

/// Correct the p-values of every record that has one, in record order.
///
/// Records without a p-value keep no adjusted p-value. Returns the number of
/// genes whose adjusted p-value is below `alpha`.
pub fn correct_cohort(records: &mut [GeneRecord], alpha: f64) -> usize {
    let tested: Vec<(usize, f64)> =
        records.iter().enumerate().filter_map(|(i, r)| r.p_value.map(|p| (i, p))).collect();
    let p_values: Vec<f64> = tested.iter().map(|(_, p)| *p).collect();
    let adjusted = benjamini_hochberg(&p_values);

    tested.iter().zip(adjusted).for_each(|((i, _), q)| records[*i].adjusted_p_value = Some(q));
    let num_significant = records.iter().filter(|r| r.adjusted_p_value.is_some_and(|q| q < alpha)).count();
    debug!("{num_significant}/{} tested genes have an adjusted p-value below {alpha}", tested.len());

    num_significant
}

/// Run the likelihood ratio test on every valid record, then correct the cohort.
///
/// Must only be called once every record of the cohort has been parsed.
pub fn test_cohort(records: &mut [GeneRecord]) -> Result<usize, Report> {
    for record in records.iter_mut().filter(|r| r.valid) {
        record.likelihood_ratio_test()?;
    }
    Ok(correct_cohort(records, SIGNIFICANCE))
}

impl GeneRecord {
    /// Set the likelihood ratio test p-value of this gene.
    pub fn likelihood_ratio_test(&mut self) -> Result<f64, Report> {
        let p_value = likelihood_ratio_test(self.alternative_lnl, self.null_lnl)?;
        self.p_value = Some(p_value);
        Ok(p_value)
    }

    /// True when the adjusted p-value is below [`SIGNIFICANCE`].
    pub fn is_significant(&self) -> bool {
        self.adjusted_p_value.is_some_and(|q| q < SIGNIFICANCE)
    }
}
