use crate::classify::Category;
use crate::run::{parse_genes, run, RunArgs};
use crate::toy::{self, ToyArgs};
use color_eyre::eyre::{Report, Result};
use std::path::PathBuf;

fn toy_args(dir: &std::path::Path, genes: usize) -> Result<RunArgs, Report> {
    let input = toy::dataset(&ToyArgs { output_dir: dir.join("genes"), genes })?;
    Ok(RunArgs { input, output_dir: dir.join("output"), ..Default::default() })
}

#[test]
fn default_args() {
    let args = RunArgs::default();
    assert_eq!(args.suffix, ".mlc");
    assert_eq!(args.alternative_dir, PathBuf::from("Alternative"));
    assert_eq!(args.null_dir, PathBuf::from("Null"));
    assert_eq!(args.threads, 1);
    assert_eq!(args.parser_config(), Default::default());
}

#[test]
fn run_with_preset() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let mut args = toy_args(dir.path(), 4)?;
    args.clade = vec!["pucciniales".to_string()];
    args.write_alignments = true;
    args.trends = true;
    args.threads = 2;

    let records = run(&args)?;
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.classification.is_some()));

    let counts = records[0].classification.as_ref().and_then(|c| c.counts.as_ref()).expect("counts");
    assert_eq!(counts.get(Category::Unique), 1);

    let output = &args.output_dir;
    assert!(output.join("run_args.json").exists());
    assert!(output.join("alignments").join("OG0004.fas").exists());
    assert!(output.join("trends").join("Conserved_nucleotide_trend.csv").exists());

    let proportions = std::fs::read_to_string(output.join("gene_class_proportion.csv"))?;
    let genes: Vec<_> = proportions.lines().skip(1).filter_map(|l| l.split(';').next()).collect();
    assert_eq!(genes, ["OG0001", "OG0003"]);

    let summary = std::fs::read_to_string(output.join("summary.csv"))?;
    assert_eq!(summary.lines().count(), 5);
    Ok(())
}

#[test]
fn run_skips_invalid_genes() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let mut args = toy_args(dir.path(), 2)?;
    args.input.push(dir.path().join("genes").join("OG9999"));
    std::fs::remove_dir_all(args.input[1].join("Alternative"))?;

    let records = run(&args)?;
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["OG0001"]);
    assert!(!args.output_dir.join("trends").exists());
    assert!(!args.output_dir.join("alignments").exists());
    Ok(())
}

#[test]
fn parse_keeps_input_order() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let mut args = toy_args(dir.path(), 3)?;
    args.input.reverse();
    let records = parse_genes(&args.input, &args.parser_config());
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["OG0003", "OG0002", "OG0001"]);
    Ok(())
}

#[test]
fn run_requires_input() {
    assert!(run(&RunArgs::default()).is_err());
}
