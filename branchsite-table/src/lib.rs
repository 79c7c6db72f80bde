//! A row-based [`Table`] used for every delimited report written by `branchsite`.

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A row-based [`Table`] of generic data.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table<T> {
    /// Names of the table columns.
    pub headers: Vec<T>,
    /// Rows of table values.
    pub rows: Vec<Vec<T>>,
    /// Optional file path for where the table was last written.
    pub path: Option<PathBuf>,
}

impl<T> Default for Table<T>
where
    T: Clone + Debug + Display + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T>
where
    T: Clone + Debug + Display + PartialEq,
{
    /// Returns a new [`Table`] with empty headers and rows.
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = branchsite_table::Table::new();
    /// table.headers = vec!["gene", "p-value"];
    /// table.add_row(["OG0001", "0.01"])?;
    /// # assert_eq!(table.rows, vec![vec!["OG0001", "0.01"]]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new(), path: None }
    }

    /// Returns a new [`Table`] with the given headers and no rows.
    pub fn with_headers<I>(headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Table { headers: headers.into_iter().collect(), rows: Vec::new(), path: None }
    }

    /// Add a new row to the table.
    ///
    /// The row must have one value per header.
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = branchsite_table::Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(["A", "B", "C"])?;
    /// assert!(table.add_row(["D", "E"]).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn add_row<I>(&mut self, row: I) -> Result<(), Report>
    where
        I: IntoIterator<Item = T>,
    {
        let row = row.into_iter().collect_vec();
        let (new, ex) = (row.len(), self.headers.len());
        if new != ex {
            return Err(eyre!("New row size ({new}) does not match the table headers ({ex})."));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Adds a new column to the [`Table`].
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = branchsite_table::Table::new();
    /// table.headers = vec!["1", "2"];
    /// table.add_row(["A", "B"])?;
    /// table.add_column("3", ["C"])?;
    ///
    /// assert_eq!(table.headers, ["1", "2", "3"]);
    /// assert_eq!(table.get(&"3", 0)?, &"C");
    /// assert!(table.add_column("4", ["D", "E"]).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn add_column<I>(&mut self, header: T, column: I) -> Result<(), Report>
    where
        I: IntoIterator<Item = T>,
    {
        let column = column.into_iter().collect_vec();
        let (new, ex) = (column.len(), self.rows.len());
        if ex != new {
            return Err(eyre!("New column size ({new}) does not match existing table ({ex})."));
        }

        self.headers.push(header);
        self.rows.iter_mut().zip(column).for_each(|(row, val)| row.push(val));
        Ok(())
    }

    /// Returns the [`Table`] value under a particular header and row index.
    ///
    /// ```
    /// let mut table = branchsite_table::Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(["A", "B", "C"])?;
    ///
    /// assert_eq!(table.get(&"2", 0)?, &"B");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn get(&self, header: &T, row: usize) -> Result<&T, Report> {
        let header_i = self.get_header_index(header)?;
        let row = self.get_row(row)?;
        Ok(&row[header_i])
    }

    /// Returns the column index (0-based) of the header in the [`Table`].
    pub fn get_header_index(&self, header: &T) -> Result<usize, Report> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| eyre!("Column '{header}' was not found in table: {:?}.", self.path))
    }

    /// Return a row of [`Table`] values from a row index.
    pub fn get_row(&self, i: usize) -> Result<&[T], Report> {
        self.rows.get(i).map(|row| row.as_slice()).ok_or_else(|| eyre!("Row ({i}) does not exist in the table."))
    }

    /// Render the [`Table`] as delimited text, one line per row, headers first.
    ///
    /// ```
    /// let mut table = branchsite_table::Table::new();
    /// table.headers = vec!["nucleotide", "clade_frequency"];
    /// table.add_row(["A", "0.25"])?;
    ///
    /// assert_eq!(table.to_delimited(';'), "nucleotide;clade_frequency\nA;0.25\n");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn to_delimited(&self, delim: char) -> String {
        let delim = delim.to_string();
        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .map(|row| format!("{}\n", row.iter().join(&delim)))
            .collect()
    }

    /// Write [`Table`] to file [`Path`] with the given delimiter.
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = branchsite_table::Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(["A", "B", "C"])?;
    ///
    /// let file = tempfile::NamedTempFile::new()?;
    /// table.write(file.path(), ';')?;
    /// # assert_eq!(std::fs::read_to_string(file.path())?, "1;2;3\nA;B;C\n");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn write<P>(&mut self, path: P, delim: char) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let file = File::create(&path).wrap_err_with(|| eyre!("Unable to create file: {path:?}"))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.to_delimited(delim).as_bytes())
            .wrap_err_with(|| eyre!("Unable to write table: {path:?}"))?;
        writer.flush().wrap_err_with(|| eyre!("Unable to flush table: {path:?}"))?;

        self.path = Some(path.as_ref().to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Result<Table<String>, Report> {
        let mut table = Table::with_headers(["gene", "lnl"].map(String::from));
        table.add_row(["OG0001", "-1520.25"].map(String::from))?;
        table.add_row(["OG0002", "-1402.5"].map(String::from))?;
        Ok(table)
    }

    #[test]
    fn get_values() -> Result<(), Report> {
        let table = toy()?;
        assert_eq!(table.get(&"lnl".to_string(), 1)?, "-1402.5");
        assert_eq!(table.get_row(0)?, ["OG0001", "-1520.25"]);
        assert!(table.get(&"missing".to_string(), 0).is_err());
        assert!(table.get_row(2).is_err());
        Ok(())
    }

    #[test]
    fn add_column_checks_length() -> Result<(), Report> {
        let mut table = toy()?;
        assert!(table.add_column("fdr".to_string(), ["0.1".to_string()]).is_err());
        table.add_column("fdr".to_string(), ["0.1", "0.2"].map(String::from))?;
        assert_eq!(table.get_row(0)?, ["OG0001", "-1520.25", "0.1"]);
        Ok(())
    }

    #[test]
    fn write_records_path() -> Result<(), Report> {
        let mut table = toy()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("summary.csv");
        table.write(&path, ';')?;

        assert_eq!(table.path.as_deref(), Some(path.as_path()));
        let observed = std::fs::read_to_string(&path)?;
        assert_eq!(observed, "gene;lnl\nOG0001;-1520.25\nOG0002;-1402.5\n");
        Ok(())
    }
}
