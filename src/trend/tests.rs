use crate::classify::{Clade, CodonPair};
use crate::gene::GeneRecord;
use crate::toy;
use crate::trend::{analyze, codon_usage, nucleotide_frequencies, TrendCategory};
use color_eyre::eyre::{Report, Result};

fn pair(clade: &[&str], other: &[&str]) -> CodonPair {
    CodonPair {
        clade: clade.iter().map(|c| c.to_string()).collect(),
        other: other.iter().map(|c| c.to_string()).collect(),
    }
}

#[test]
fn nucleotides_pool_every_pair() {
    let pairs = [pair(&["ATG"], &["ATG", "ATG"]), pair(&["CCC"], &[])];
    let frequencies = nucleotide_frequencies(&pairs.iter().collect::<Vec<_>>());

    let clade: Vec<_> = frequencies.iter().map(|f| f.clade).collect();
    assert_eq!(clade, [Some(1.0 / 6.0), Some(1.0 / 6.0), Some(1.0 / 6.0), Some(0.5)]);
    assert_eq!(frequencies[3].other, Some(0.0));
}

#[test]
fn empty_pool() {
    let frequencies = nucleotide_frequencies(&[]);
    assert_eq!(frequencies.len(), 4);
    assert!(frequencies.iter().all(|f| f.clade.is_none() && f.other.is_none()));
    assert!(codon_usage(&[]).is_empty());
}

#[test]
fn codons_within_amino_acid() {
    // L is encoded by six codons, M only by ATG
    let pairs = [pair(&["TTA", "CTG", "ATG"], &["CTG", "CTG", "TTG", "ATG"]), pair(&["TTA"], &["TAT"])];
    let usage = codon_usage(&pairs.iter().collect::<Vec<_>>());

    let amino_acids: Vec<_> = usage.iter().map(|u| u.amino_acid).collect();
    assert_eq!(amino_acids, ['L', 'M']);

    let leucine = &usage[0].codons;
    assert_eq!(leucine.keys().collect::<Vec<_>>(), ["CTG", "TTA", "TTG"]);
    assert_eq!(leucine["TTA"], (2.0 / 3.0, 0.0));
    assert_eq!(leucine["CTG"], (1.0 / 3.0, 2.0 / 3.0));
    assert_eq!(usage[1].codons["ATG"], (1.0, 1.0));
}

#[test]
fn toy_trends() -> Result<(), Report> {
    let clade = Clade::Taxa(toy::CLADE.iter().map(|t| t.to_string()).collect());
    let mut records = Vec::new();
    for name in ["OG0001", "OG0002"] {
        let mut record = GeneRecord::new(&name);
        record.read_outputs(&toy::alternative(-100.0), &toy::null(-105.0));
        record.classify(Some(&clade), true)?;
        records.push(record);
    }
    // not classified, not pooled
    records.push(GeneRecord::new(&"OG0003"));

    let trends = analyze(&records);
    let categories: Vec<_> = trends.iter().map(|t| t.category.to_string()).collect();
    assert_eq!(categories, ["Conserved", "Mostly_Conserved", "All_Conserved", "All_Mostly_Conserved"]);

    let conserved = &trends[0];
    assert_eq!(conserved.category, TrendCategory::Conserved);
    assert_eq!(conserved.num_columns, 2);
    assert_eq!(conserved.codons.len(), 1);
    assert_eq!(conserved.codons[0].codons["ATG"], (1.0, 1.0));

    // CAT in the clade, CAT and GAT outside
    let mostly = &trends[1];
    assert_eq!(mostly.codons.len(), 1);
    assert_eq!(mostly.codons[0].amino_acid, 'H');
    assert_eq!(mostly.nucleotides[2].clade, Some(0.0));
    assert_eq!(mostly.nucleotides[2].other, Some(1.0 / 6.0));

    assert_eq!(trends[2].num_columns, 0);
    assert_eq!(trends[3].num_columns, 2);
    Ok(())
}
