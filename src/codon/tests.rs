use crate::codon::{self, STOP, UNKNOWN};

#[test]
fn covers_all_64_codons() {
    let bases = ['A', 'C', 'G', 'T'];
    let mut translated = 0;
    for b1 in bases {
        for b2 in bases {
            for b3 in bases {
                let codon = format!("{b1}{b2}{b3}");
                assert!(codon::translate(&codon).is_some(), "{codon} is missing");
                translated += 1;
            }
        }
    }
    assert_eq!(translated, 64);
}

#[test]
fn stop_codons() {
    for codon in ["TAA", "TAG", "TGA"] {
        assert_eq!(codon::translate(codon), Some(STOP));
    }
}

#[test]
fn untranslatable_codons() {
    assert_eq!(codon::translate_or_unknown("---"), UNKNOWN);
    assert_eq!(codon::translate_or_unknown("NNN"), UNKNOWN);
    assert_eq!(codon::translate_or_unknown("AT"), UNKNOWN);
}

#[test]
fn translate_column() {
    let column = ["AAA", "AAG", "GGG", "atg"];
    assert_eq!(codon::translate_all(column), vec!['K', 'K', 'G', 'M']);
}
