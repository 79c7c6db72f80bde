//! Translation of codons into amino acids with the standard genetic code.
//!
//! The table is built once per process and shared read-only by the
//! [classifier](crate::classify) and the [trend analysis](crate::trend).

#[cfg(test)]
mod tests;

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Symbol for stop codons.
pub const STOP: char = '_';

/// Symbol for codons outside the table (ambiguous bases, gaps, wrong length).
pub const UNKNOWN: char = 'X';

/// The standard genetic code, codon to amino acid.
#[rustfmt::skip]
static CODON_TABLE: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    [
        ("ATA", 'I'), ("ATC", 'I'), ("ATT", 'I'), ("ATG", 'M'),
        ("ACA", 'T'), ("ACC", 'T'), ("ACG", 'T'), ("ACT", 'T'),
        ("AAC", 'N'), ("AAT", 'N'), ("AAA", 'K'), ("AAG", 'K'),
        ("AGC", 'S'), ("AGT", 'S'), ("AGA", 'R'), ("AGG", 'R'),
        ("CTA", 'L'), ("CTC", 'L'), ("CTG", 'L'), ("CTT", 'L'),
        ("CCA", 'P'), ("CCC", 'P'), ("CCG", 'P'), ("CCT", 'P'),
        ("CAC", 'H'), ("CAT", 'H'), ("CAA", 'Q'), ("CAG", 'Q'),
        ("CGA", 'R'), ("CGC", 'R'), ("CGG", 'R'), ("CGT", 'R'),
        ("GTA", 'V'), ("GTC", 'V'), ("GTG", 'V'), ("GTT", 'V'),
        ("GCA", 'A'), ("GCC", 'A'), ("GCG", 'A'), ("GCT", 'A'),
        ("GAC", 'D'), ("GAT", 'D'), ("GAA", 'E'), ("GAG", 'E'),
        ("GGA", 'G'), ("GGC", 'G'), ("GGG", 'G'), ("GGT", 'G'),
        ("TCA", 'S'), ("TCC", 'S'), ("TCG", 'S'), ("TCT", 'S'),
        ("TTC", 'F'), ("TTT", 'F'), ("TTA", 'L'), ("TTG", 'L'),
        ("TAC", 'Y'), ("TAT", 'Y'), ("TAA", STOP), ("TAG", STOP),
        ("TGC", 'C'), ("TGT", 'C'), ("TGA", STOP), ("TGG", 'W'),
    ]
    .into_iter()
    .collect()
});

/// Returns the amino acid encoded by a codon, if the codon is in the table.
///
/// Lowercase codons are accepted.
///
/// ## Examples
///
/// ```rust
/// use branchsite::codon;
///
/// assert_eq!(codon::translate("AAA"), Some('K'));
/// assert_eq!(codon::translate("tga"), Some(codon::STOP));
/// assert_eq!(codon::translate("ANA"), None);
/// ```
pub fn translate(codon: &str) -> Option<char> {
    match codon.bytes().any(|b| b.is_ascii_lowercase()) {
        true => CODON_TABLE.get(codon.to_ascii_uppercase().as_str()).copied(),
        false => CODON_TABLE.get(codon).copied(),
    }
}

/// Returns the amino acid encoded by a codon, or [`UNKNOWN`].
pub fn translate_or_unknown(codon: &str) -> char {
    translate(codon).unwrap_or(UNKNOWN)
}

/// Translate every codon of an iterator, untranslatable codons become [`UNKNOWN`].
pub fn translate_all<'c, I>(codons: I) -> Vec<char>
where
    I: IntoIterator<Item = &'c str>,
{
    codons.into_iter().map(translate_or_unknown).collect()
}
