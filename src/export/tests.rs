use crate::classify::Clade;
use crate::export;
use crate::gene::GeneRecord;
use crate::selection;
use crate::toy;
use crate::trend;
use color_eyre::eyre::{Report, Result};

/// Two classified toy genes, the first significant.
fn records() -> Result<Vec<GeneRecord>, Report> {
    let clade = Clade::Taxa(toy::CLADE.iter().map(|t| t.to_string()).collect());
    let mut records = Vec::new();
    for (name, null_lnl) in [("OG0001", -110.0), ("OG0002", -100.5)] {
        let mut record = GeneRecord::new(&name);
        record.read_outputs(&toy::alternative(-100.0), &toy::null(null_lnl));
        record.classify(Some(&clade), true)?;
        records.push(record);
    }
    selection::test_cohort(&mut records)?;
    Ok(records)
}

#[test]
fn summary_rows() -> Result<(), Report> {
    let table = export::summary(&records()?)?;
    assert_eq!(table.headers.len(), 22);
    assert_eq!(table.rows.len(), 2);

    let row = table.get_row(0)?;
    assert_eq!(row[0], "OG0001");
    assert_eq!(row[5], "6");
    assert_eq!(row[6], "(0.8, 0.05, 0.05)");
    assert_eq!(row[9], "(0.02, 1.0, 12.5)");
    assert_eq!(row[10], "5");
    assert_eq!(row[11], "1:0.962*,2:0.998**,3:0.971*,4:0.955*,5:0.991**");
    assert_eq!(table.get(&"Shared".to_string(), 0)?, "1");
    assert_eq!(table.get(&"Unclassified".to_string(), 0)?, "0");
    assert_eq!(table.get(&"All unique sites".to_string(), 1)?, "1");
    Ok(())
}

#[test]
fn summary_missing_values() -> Result<(), Report> {
    let table = export::summary(&[GeneRecord::new(&"OG0003")])?;
    let row = table.get_row(0)?;
    assert_eq!(row[0], "OG0003");
    assert!(row[1..10].iter().all(|v| v == "NA"));
    assert_eq!(row[10], "0");
    assert_eq!(row[11], "");
    assert!(row[12..].iter().all(|v| v == "NA"));
    Ok(())
}

#[test]
fn proportions_of_significant_genes() -> Result<(), Report> {
    let table = export::gene_class_proportions(&records()?)?;
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.get_row(0)?, ["OG0001", "0.4", "0.2", "0.2", "0.2", "0"]);
    Ok(())
}

#[test]
fn write_files() -> Result<(), Report> {
    let records = records()?;
    let dir = tempfile::tempdir()?;

    let paths = export::write_alignments(&records, &dir.path().join("alignments"))?;
    assert_eq!(paths.len(), 2);
    let fasta = std::fs::read_to_string(&paths[0])?;
    assert!(fasta.starts_with(">Puccinia_graminis\nATGAAATTTCATAAAAAA\n"));

    let trends = trend::analyze(&records);
    let paths = export::write_trends(&trends, &dir.path().join("trends"))?;
    let names: Vec<_> = paths.iter().filter_map(|p| p.file_name()).map(|n| n.to_string_lossy().to_string()).collect();
    assert!(names.contains(&"Conserved_nucleotide_trend.csv".to_string()));
    assert!(names.contains(&"Conserved_codon_trendM.csv".to_string()));
    assert!(names.contains(&"All_Conserved_nucleotide_trend.csv".to_string()));
    assert!(names.contains(&"All_Mostly_Conserved_codon_trendK.csv".to_string()));

    let codons = std::fs::read_to_string(dir.path().join("trends").join("Mostly_Conserved_codon_trendH.csv"))?;
    assert_eq!(codons, "codon;clade_frequency;other_frequency\nCAT;1;1\n");
    let nucleotides = std::fs::read_to_string(dir.path().join("trends").join("All_Conserved_nucleotide_trend.csv"))?;
    assert_eq!(nucleotides, "nucleotide;clade_frequency;other_frequency\nA;NA;NA\nT;NA;NA\nG;NA;NA\nC;NA;NA\n");
    Ok(())
}
