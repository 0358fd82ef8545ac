//! Nucleotide sequence handling shared by translation and comparison.
pub mod dna;

use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceType {
    #[serde(rename = "DNA")]
    Dna,
    #[serde(rename = "RNA")]
    Rna,
}

impl SequenceType {
    /// A sequence containing uracil but no thymine is RNA.
    pub fn detect(raw: &str) -> Self {
        let mut has_u = false;
        let mut has_t = false;
        for b in raw.bytes() {
            match b.to_ascii_uppercase() {
                b'U' => has_u = true,
                b'T' => has_t = true,
                _ => {}
            }
        }

        if has_u && !has_t {
            SequenceType::Rna
        } else {
            SequenceType::Dna
        }
    }
}

/// Uppercases, strips whitespace and non-ASCII characters and converts `U`
/// to `T`. The result is always ASCII, so byte offsets are nucleotide offsets.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_whitespace())
        .map(|c| match c.to_ascii_uppercase() {
            'U' => 'T',
            c => c,
        })
        .collect()
}

pub fn rna_to_dna(raw: &str) -> String {
    raw.to_ascii_uppercase().replace('U', "T")
}

pub fn dna_to_rna(raw: &str) -> String {
    raw.to_ascii_uppercase().replace('T', "U")
}

/// Reverse complement; characters other than ACGTU are kept in place.
pub fn reverse_complement(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|c| match u8::try_from(c) {
            Ok(b) => dna::complement(b) as char,
            Err(_) => c,
        })
        .collect()
}

/// Percentage of G and C over the whole length, 0 for an empty sequence.
pub fn gc_content(seq: &str) -> f64 {
    let length = seq.chars().count();
    if length == 0 {
        return 0.0;
    }
    let gc = seq
        .chars()
        .filter(|c| matches!(c.to_ascii_uppercase(), 'G' | 'C'))
        .count();
    gc as f64 / length as f64 * 100.0
}

/// Non-overlapping triplets from the start; a trailing partial codon is dropped.
pub fn codons(seq: &str) -> impl Iterator<Item = &[u8]> {
    seq.as_bytes().chunks_exact(3)
}

pub fn codon_strings(seq: &str) -> Vec<String> {
    codons(seq)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect()
}

/// Translates a sequence to amino acids with the standard genetic code.
pub fn translate_amino_acids(raw: &str) -> String {
    let seq = normalize(raw);
    codons(&seq).map(|c| dna::amino_acid(c) as char).collect()
}
