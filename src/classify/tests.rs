use crate::classify::{classify, Category, Clade, CodonPair, Dominant, Preset, SiteColumn, Threshold};
use crate::gene::{GeneRecord, SelectedSite};
use crate::sequence::Alignment;
use crate::toy;
use color_eyre::eyre::{Report, Result};

/// A single-column alignment, taxa named T1, T2, ...
fn column_alignment(codons: &[&str]) -> Alignment {
    let mut alignment = Alignment::new();
    codons.iter().enumerate().for_each(|(i, codon)| alignment.extend(&format!("T{}", i + 1), [*codon]));
    alignment
}

fn categorize(codons: &[&str], clade: &[&str]) -> Result<Category, Report> {
    let alignment = column_alignment(codons);
    let clade: Vec<String> = clade.iter().map(|t| t.to_string()).collect();
    let column = SiteColumn::new(&alignment, &clade, 0)?;
    Ok(column.categorize(!clade.is_empty()))
}

fn toy_record() -> GeneRecord {
    let mut record = GeneRecord::new(&"OG0001");
    record.read_outputs(&toy::alternative(-100.0), &toy::null(-105.0));
    record
}

fn toy_clade() -> Clade {
    Clade::Taxa(toy::CLADE.iter().map(|t| t.to_string()).collect())
}

#[test]
fn thresholds() {
    assert!(Threshold::AtLeast(0.5).passes(0.5));
    assert!(!Threshold::Above(0.7).passes(0.7));
    assert!(Threshold::Above(0.7).passes(0.75));
    assert!(!Dominant::new(&[]).passes(Threshold::AtLeast(0.0)));
}

#[test]
fn single_categories() -> Result<(), Report> {
    // K,K,K,G
    assert_eq!(categorize(&["AAA", "AAA", "AAA", "GGG"], &["T4"])?, Category::Unique);
    assert_eq!(categorize(&["AAA", "AAA", "AAA", "GGG"], &["T1"])?, Category::MostlyConserved);
    assert_eq!(categorize(&["AAA", "AAG", "AAA", "AAG"], &["T1"])?, Category::Conserved);
    assert_eq!(categorize(&["AAA", "AAA", "AAA", "GGG"], &[])?, Category::Unclassified);
    assert_eq!(categorize(&["AAA", "AAA", "AAA", "AAA"], &[])?, Category::Conserved);
    // F,L | G,A
    assert_eq!(categorize(&["TTT", "TTA", "GGG", "GCT"], &["T1", "T2"])?, Category::Diverse);
    // K,E | K,E,G,D : no majority
    let codons = ["AAA", "GAA", "AAA", "GAA", "GGG", "GAT"];
    assert_eq!(categorize(&codons, &["T1", "T2"])?, Category::Variable);
    Ok(())
}

#[test]
fn mostly_categories() -> Result<(), Report> {
    // K,K | K,G,G,G,G : clade enriched in K, G dominates
    let codons = ["AAA", "AAA", "AAA", "GGG", "GGG", "GGG", "GGG"];
    assert_eq!(categorize(&codons, &["T1", "T2"])?, Category::MostlyUnique);

    // K,E,E | K,G,G,G,G : K is as common outside the clade
    let codons = ["AAA", "GAA", "GAA", "AAA", "GGG", "GGG", "GGG", "GGG"];
    assert_eq!(categorize(&codons, &["T1", "T2", "T3"])?, Category::Variable);

    // K,K,E,E | K,E,G,G,G,G,G : G dominates, neither clade symbol is dominant
    let codons = ["AAA", "AAA", "GAA", "GAA", "AAA", "GAA", "GGG", "GGG", "GGG", "GGG", "GGG"];
    assert_eq!(categorize(&codons, &["T1", "T2", "T3", "T4"])?, Category::MostlyDiverse);
    Ok(())
}

#[test]
fn shared() -> Result<(), Report> {
    // K,E | K,E
    assert_eq!(categorize(&["AAA", "GAA", "AAA", "GAA"], &["T1", "T2"])?, Category::Shared);
    // K,E,D | K,K,K : three clade symbols cannot be shared
    let codons = ["AAA", "GAA", "GAT", "AAA", "AAA", "AAA"];
    assert_eq!(categorize(&codons, &["T1", "T2", "T3"])?, Category::Variable);
    Ok(())
}

#[test]
fn toy_classification() -> Result<(), Report> {
    let mut record = toy_record();
    let clade = toy_clade();
    let classification = record.classify(Some(&clade), true)?.clone();

    let counts = classification.counts.expect("counts");
    assert_eq!(counts.get(Category::Conserved), 1);
    assert_eq!(counts.get(Category::Unique), 1);
    assert_eq!(counts.get(Category::Diverse), 1);
    assert_eq!(counts.get(Category::MostlyConserved), 1);
    assert_eq!(counts.get(Category::Shared), 1);
    assert_eq!(counts.get(Category::Variable), 0);
    assert_eq!(counts.total(), record.selected_sites.len());
    assert_eq!(classification.all_clade_unique, Some(1));

    let details = classification.details.expect("details");
    let conserved = CodonPair {
        clade: vec!["ATG".to_string(), "ATG".to_string()],
        other: vec!["ATG".to_string(), "ATG".to_string()],
    };
    assert_eq!(details.conserved, [conserved]);
    assert_eq!(details.mostly_conserved[0].other, ["CAT", "GAT"]);
    assert!(details.all_conserved.is_empty());
    assert_eq!(details.all_mostly_conserved.len(), 1);
    assert_eq!(details.all_mostly_conserved[0].other, ["AAA", "GAA"]);
    assert!(record.classification.is_some());
    Ok(())
}

#[test]
fn no_clade() -> Result<(), Report> {
    let mut record = toy_record();
    let classification = record.classify(None, true)?;
    let counts = classification.counts.as_ref().expect("counts");

    assert_eq!(counts.get(Category::Conserved), 1);
    assert_eq!(counts.get(Category::Unclassified), 4);
    assert_eq!(classification.all_clade_unique, None);
    assert_eq!(classification.details, None);

    // a preset with none of its taxa in the alignment behaves the same
    let clade = Clade::Preset(Preset::PuccinialesGenome);
    let mut record = toy_record();
    record.alignment = {
        let mut alignment = Alignment::new();
        alignment.extend("Ustilago_maydis", ["ATG", "AAA"]);
        alignment.extend("Cryptococcus_neoformans", ["ATG", "GGG"]);
        alignment
    };
    record.selected_sites = vec![SelectedSite::new("2", "0.99**")];
    let counts = record.classify(Some(&clade), false)?.counts.clone().expect("counts");
    assert_eq!(counts.get(Category::Unclassified), 1);
    Ok(())
}

#[test]
fn no_selected_sites() -> Result<(), Report> {
    let alignment = column_alignment(&["AAA", "AAA", "GGG"]);
    let classification = classify(&alignment, &[], &["T3".to_string()], false)?;
    assert_eq!(classification.counts, None);
    assert_eq!(classification.all_clade_unique, Some(1));
    Ok(())
}

#[test]
fn site_outside_alignment() {
    let mut record = toy_record();
    record.selected_sites.push(SelectedSite::new("7", "0.999**"));
    assert!(record.classify(Some(&toy_clade()), false).is_err());

    let mut record = toy_record();
    record.selected_sites.push(SelectedSite::new("0", "0.999**"));
    assert!(record.classify(None, false).is_err());
}

#[test]
fn selected_sites_without_alignment() -> Result<(), Report> {
    let alignment = Alignment::new();
    assert!(classify(&alignment, &[0, 2], &[], false).is_err());
    assert_eq!(classify(&alignment, &[], &[], false)?.counts, None);

    // taxa without an underscore are not read as alignment rows
    let text = toy::alternative(-100.0)
        .replace("Puccinia_", "Puccinia")
        .replace("Ustilago_", "Ustilago")
        .replace("Cryptococcus_", "Cryptococcus");
    let mut record = GeneRecord::new(&"OG0005");
    record.read_outputs(&text, &toy::null(-105.0));
    assert!(record.alignment.is_empty());
    assert_eq!(record.selected_sites.len(), 5);
    assert!(record.classify(None, false).is_err());
    assert_eq!(record.classification, None);

    let column = column_alignment(&[]);
    assert!(!SiteColumn::new(&column, &[], 0)?.is_conserved());
    Ok(())
}

#[test]
fn clade_resolution() {
    let alignment = toy_record().alignment;
    let clade = Clade::Preset(Preset::Pucciniales);
    assert_eq!(clade.resolve(&alignment), ["Puccinia_triticina", "Puccinia_graminis"]);
    assert_eq!(clade.to_string(), "pucciniales");

    let clade = Clade::from_args(&["Puccinia_graminis".to_string()]);
    assert_eq!(clade, Some(Clade::Taxa(vec!["Puccinia_graminis".to_string()])));
}
