//! Small filesystem and formatting helpers.

use color_eyre::eyre::{Report, Result, WrapErr};
use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};

/// Placeholder written for missing values.
pub const NA: &str = "NA";

/// Create a directory and its parents, if they do not exist yet.
pub fn create_dir<P>(dir: &P) -> Result<PathBuf, Report>
where
    P: AsRef<Path> + Debug,
{
    let dir = dir.as_ref();
    if !dir.exists() {
        std::fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create directory: {dir:?}"))?;
    }
    Ok(dir.to_path_buf())
}

/// Create the parent directory of a file path.
pub fn create_parent_dir<P>(path: &P) -> Result<(), Report>
where
    P: AsRef<Path> + Debug,
{
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            create_dir(&parent)?;
        }
    }
    Ok(())
}

/// Display an optional value, [`NA`] when missing.
///
/// ```rust
/// use branchsite::utils::or_na;
///
/// assert_eq!(or_na(Some(0.5)), "0.5");
/// assert_eq!(or_na::<f64>(None), "NA");
/// ```
pub fn or_na<T>(value: Option<T>) -> String
where
    T: Display,
{
    match value {
        Some(value) => value.to_string(),
        None => NA.to_string(),
    }
}
