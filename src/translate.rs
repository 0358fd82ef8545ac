//! Turns nucleotide sequences into symbol sequences and summarises them.
use crate::scheme::MappingScheme;
use crate::seq::{self, SequenceType};
use crate::stats;
use crate::symbol::{self, Symbol, SENTINEL};
use serde::Serialize;
use std::collections::BTreeMap;

/// Translates a DNA or RNA sequence, one symbol per complete codon.
///
/// Never fails: characters outside ACGTU contribute `0` lines and a trailing
/// partial codon is dropped, so an empty sequence gives an empty result.
pub fn translate_sequence(sequence: &str, scheme: MappingScheme) -> Vec<Symbol> {
    let normalized = seq::normalize(sequence);
    let symbols: Vec<Symbol> = seq::codons(&normalized)
        .map(|codon| symbol::bits_to_symbol(&symbol::codon_to_bits(codon, scheme)))
        .collect();

    debug!(
        "Translated {} nt into {} symbols with {scheme}",
        normalized.len(),
        symbols.len()
    );
    symbols
}

/// Iterates over the symbols that carry a translation.
pub fn valid(symbols: &[Symbol]) -> impl Iterator<Item = Symbol> + '_ {
    symbols.iter().copied().filter(|&s| s != SENTINEL)
}

pub fn symbol_frequency(symbols: &[Symbol]) -> BTreeMap<Symbol, usize> {
    let mut frequency = BTreeMap::new();
    for s in valid(symbols) {
        *frequency.entry(s).or_insert(0) += 1;
    }
    frequency
}

/// The most frequent symbol; ties go to the one that occurs first.
pub fn dominant_symbol(symbols: &[Symbol]) -> Option<Symbol> {
    stats::mode(&stats::count_ordered(valid(symbols))).map(|(s, _)| s)
}

/// Shannon diversity (natural log) of the valid symbols.
pub fn shannon_diversity(symbols: &[Symbol]) -> f64 {
    let counts = stats::count_ordered(valid(symbols));
    let total = counts.values().sum();
    stats::entropy(counts.values().copied(), total)
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SequenceStats {
    pub nucleotide_length: usize,
    pub total_codons: usize,
    pub valid_symbols: usize,
    pub unique_symbols: usize,
    pub dominant_symbol: Option<Symbol>,
    /// share of the valid symbols taken by the dominant one
    pub dominant_frequency: f64,
    pub diversity: f64,
    pub gc_content: f64,
    pub frequency: BTreeMap<Symbol, usize>,
}

impl SequenceStats {
    pub fn compute(symbols: &[Symbol], raw: &str) -> Self {
        let normalized = seq::normalize(raw);
        let counts = stats::count_ordered(valid(symbols));
        let valid_symbols: usize = counts.values().sum();
        let dominant = stats::mode(&counts);

        SequenceStats {
            nucleotide_length: normalized.len(),
            total_codons: symbols.len(),
            valid_symbols,
            unique_symbols: counts.len(),
            dominant_symbol: dominant.map(|(s, _)| s),
            dominant_frequency: match dominant {
                Some((_, c)) => c as f64 / valid_symbols as f64,
                None => 0.0,
            },
            diversity: stats::entropy(counts.values().copied(), valid_symbols),
            gc_content: seq::gc_content(&normalized),
            frequency: counts.into_iter().collect(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Strands {
    pub forward: Vec<Symbol>,
    pub reverse: Vec<Symbol>,
}

/// Translates the sequence and its reverse complement.
pub fn translate_both_strands(sequence: &str, scheme: MappingScheme) -> Strands {
    let normalized = seq::normalize(sequence);
    let reverse = seq::reverse_complement(&normalized);

    Strands {
        forward: translate_sequence(&normalized, scheme),
        reverse: translate_sequence(&reverse, scheme),
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: Symbol,
    pub to: Symbol,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionCount {
    pub from: Symbol,
    pub to: Symbol,
    pub count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TransitionSummary {
    pub total: usize,
    pub unique: usize,
    pub most_common: Vec<TransitionCount>,
    /// every distinct transition in first-seen order
    pub counts: Vec<TransitionCount>,
}

/// Consecutive pairs where both symbols are valid.
pub fn transitions(symbols: &[Symbol]) -> Vec<Transition> {
    symbols
        .windows(2)
        .filter(|w| w[0] != SENTINEL && w[1] != SENTINEL)
        .map(|w| Transition {
            from: w[0],
            to: w[1],
        })
        .collect()
}

pub fn summarize_transitions(transitions: &[Transition]) -> TransitionSummary {
    let counts = stats::count_ordered(transitions.iter().copied());
    let to_record = |(t, count): (Transition, usize)| TransitionCount {
        from: t.from,
        to: t.to,
        count,
    };

    TransitionSummary {
        total: transitions.len(),
        unique: counts.len(),
        most_common: stats::ranked(&counts, 10).into_iter().map(to_record).collect(),
        counts: counts.into_iter().map(to_record).collect(),
    }
}

/// Everything known about a single sequence after translation.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TranslationReport {
    pub name: String,
    pub sequence_type: SequenceType,
    pub mapping_scheme: MappingScheme,
    pub sequence: String,
    pub length: usize,
    pub codon_count: usize,
    pub codons: Vec<String>,
    pub symbols: Vec<Symbol>,
    pub amino_acids: String,
    pub stats: SequenceStats,
    pub transitions: TransitionSummary,
    pub reverse_symbols: Vec<Symbol>,
}

/// Complete single-sequence analysis: translation of both strands, amino
/// acids, statistics and transitions.
pub fn analyze_sequence(sequence: &str, name: &str, scheme: MappingScheme) -> TranslationReport {
    let sequence_type = SequenceType::detect(sequence);
    let normalized = seq::normalize(sequence);
    let strands = translate_both_strands(&normalized, scheme);
    let codons = seq::codon_strings(&normalized);

    TranslationReport {
        name: name.to_string(),
        sequence_type,
        mapping_scheme: scheme,
        length: normalized.len(),
        codon_count: codons.len(),
        codons,
        amino_acids: seq::translate_amino_acids(&normalized),
        stats: SequenceStats::compute(&strands.forward, &normalized),
        transitions: summarize_transitions(&transitions(&strands.forward)),
        symbols: strands.forward,
        reverse_symbols: strands.reverse,
        sequence: normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: MappingScheme = MappingScheme::Scheme1;

    #[test]
    fn translate_basic() {
        assert_eq!(translate_sequence("ATGCCC", S1), vec![25, 64]);
        assert_eq!(translate_sequence("", S1), Vec::<Symbol>::new());
        assert_eq!(translate_sequence("AT", S1), Vec::<Symbol>::new());
        assert_eq!(translate_sequence("aug ccc a", S1), vec![25, 64]);
    }

    #[test]
    fn translation_is_idempotent() {
        let s = "ATGCGTAGCTAGCTAGGCTAACGT";
        assert_eq!(translate_sequence(s, S1), translate_sequence(s, S1));
    }

    #[test]
    fn unknown_nucleotides_do_not_fail() {
        assert_eq!(translate_sequence("NNN", S1), vec![1]);
    }

    #[test]
    fn frequency_sums_to_valid_count() {
        let symbols = [1, 2, 2, SENTINEL, 3, 2];
        let freq = symbol_frequency(&symbols);
        assert_eq!(freq.values().sum::<usize>(), 5);
        assert_eq!(freq[&2], 3);
        assert!(!freq.contains_key(&SENTINEL));
    }

    #[test]
    fn dominant_tie_break() {
        assert_eq!(dominant_symbol(&[7, 3, 3, 7]), Some(7));
        assert_eq!(dominant_symbol(&[SENTINEL]), None);
        assert_eq!(dominant_symbol(&[]), None);
    }

    #[test]
    fn diversity_bounds() {
        assert_eq!(shannon_diversity(&[5, 5, 5]), 0.0);
        let d = shannon_diversity(&[1, 2, 3, 4]);
        assert!((d - 4f64.ln()).abs() < 1e-12);
        assert_eq!(shannon_diversity(&[]), 0.0);
    }

    #[test]
    fn stats_of_sequence() {
        let raw = "AAAAAAGGG";
        let symbols = translate_sequence(raw, S1);
        let stats = SequenceStats::compute(&symbols, raw);
        assert_eq!(stats.nucleotide_length, 9);
        assert_eq!(stats.total_codons, 3);
        assert_eq!(stats.valid_symbols, 3);
        assert_eq!(stats.unique_symbols, 2);
        assert_eq!(stats.dominant_symbol, Some(1));
        assert!((stats.dominant_frequency - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.gc_content - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn both_strands() {
        let strands = translate_both_strands("AAACCC", S1);
        assert_eq!(strands.forward, vec![1, 64]);
        // reverse complement is GGGTTT
        assert_eq!(strands.reverse, translate_sequence("GGGTTT", S1));

        let strands = translate_both_strands("AA\u{00e9}ACCC\u{00e9}", S1);
        assert_eq!(strands.forward, vec![1, 64]);
        assert_eq!(strands.reverse.len(), strands.forward.len());
        assert_eq!(strands.reverse, translate_sequence("GGGTTT", S1));
    }

    #[test]
    fn transitions_skip_sentinels() {
        let t = transitions(&[1, 2, SENTINEL, 3, 1, 2]);
        assert_eq!(
            t,
            vec![
                Transition { from: 1, to: 2 },
                Transition { from: 3, to: 1 },
                Transition { from: 1, to: 2 },
            ]
        );

        let summary = summarize_transitions(&t);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.unique, 2);
        assert_eq!(
            summary.most_common[0],
            TransitionCount {
                from: 1,
                to: 2,
                count: 2
            }
        );
    }

    #[test]
    fn complete_analysis() {
        let report = analyze_sequence("AUGAAACCCU", "demo", S1);
        assert_eq!(report.sequence_type, SequenceType::Rna);
        assert_eq!(report.sequence, "ATGAAACCCT");
        assert_eq!(report.length, 10);
        assert_eq!(report.codon_count, 3);
        assert_eq!(report.codons, vec!["ATG", "AAA", "CCC"]);
        assert_eq!(report.symbols, vec![25, 1, 64]);
        assert_eq!(report.amino_acids, "MKP");
        assert_eq!(report.transitions.total, 2);
        assert_eq!(report.reverse_symbols.len(), 3);
    }
}
