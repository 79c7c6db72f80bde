//! Codon sequence [records](Record) and the gap-free [`Alignment`] they form.


use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use noodles::fasta;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// ----------------------------------------------------------------------------
// Record
// ----------------------------------------------------------------------------

/// One taxon of an alignment, as an ordered list of codon tokens.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Record {
    /// Taxon identifier (ex. `Puccinia_graminis`).
    pub id: String,
    /// Codons, each a 3-character nucleotide string.
    pub codons: Vec<String>,
}

impl Record {
    pub fn new(id: &str) -> Self {
        Record { id: id.to_string(), codons: Vec::new() }
    }

    /// Number of codons.
    pub fn len(&self) -> usize {
        self.codons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    /// Convert into a [`noodles`] fasta record, codons concatenated.
    pub fn to_fasta(&self) -> fasta::Record {
        let definition = fasta::record::Definition::new(self.id.as_str(), None);
        let sequence = fasta::record::Sequence::from(self.codons.concat().into_bytes());
        fasta::Record::new(definition, sequence)
    }
}

// ----------------------------------------------------------------------------
// Alignment
// ----------------------------------------------------------------------------

/// A codon alignment, taxa kept in the order they were first encountered.
///
/// ## Examples
///
/// ```rust
/// use branchsite::sequence::Alignment;
///
/// let mut alignment = Alignment::new();
/// alignment.extend("Puccinia_graminis", ["ATG", "AAA"]);
/// alignment.extend("Ustilago_maydis", ["ATG", "GGG"]);
/// alignment.extend("Puccinia_graminis", ["TTT"]);
///
/// assert_eq!(alignment.taxa().collect::<Vec<_>>(), ["Puccinia_graminis", "Ustilago_maydis"]);
/// assert_eq!(alignment.get("Puccinia_graminis").unwrap().len(), 3);
/// assert!(!alignment.is_rectangular());
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Alignment {
    pub records: Vec<Record>,
}

impl Alignment {
    pub fn new() -> Self {
        Alignment { records: Vec::new() }
    }

    /// Append codons to a taxon, creating the taxon if it is new.
    pub fn extend<I, S>(&mut self, id: &str, codons: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let position = match self.records.iter().position(|r| r.id == id) {
            Some(i) => i,
            None => {
                self.records.push(Record::new(id));
                self.records.len() - 1
            }
        };
        self.records[position].codons.extend(codons.into_iter().map(Into::into));
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Taxon identifiers in alignment order.
    pub fn taxa(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    /// Number of taxa.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of codon columns, taken from the first taxon (0 when empty).
    pub fn num_columns(&self) -> usize {
        self.records.first().map(Record::len).unwrap_or(0)
    }

    /// True when every taxon has the same number of codons.
    pub fn is_rectangular(&self) -> bool {
        self.records.iter().map(Record::len).all_equal()
    }

    /// Codons of every taxon at a 0-based column.
    pub fn column(&self, i: usize) -> Result<Vec<&str>, Report> {
        self.records
            .iter()
            .map(|r| {
                r.codons.get(i).map(String::as_str).ok_or_else(|| {
                    eyre!("Column {} is outside the {} codons of {}.", i + 1, r.len(), r.id)
                })
            })
            .collect()
    }

    /// Write the alignment as fasta, one record per taxon.
    pub fn write_fasta<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let file = File::create(path).wrap_err_with(|| eyre!("Unable to create file: {path:?}"))?;
        let mut writer = fasta::Writer::new(BufWriter::new(file));
        self.records.iter().try_for_each(|record| {
            writer
                .write_record(&record.to_fasta())
                .wrap_err_with(|| eyre!("Unable to write fasta record {}: {path:?}", record.id))
        })?;
        Ok(())
    }
}
