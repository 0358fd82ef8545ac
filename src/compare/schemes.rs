use super::pairwise::{self, Similarity};
use super::PositionMatch;
use crate::error::Result;
use crate::scheme::{MappingScheme, ALL_SCHEMES};
use crate::translate::SequenceStats;
use itertools::Itertools;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SchemeResult {
    pub scheme: MappingScheme,
    pub stats: SequenceStats,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SchemePair {
    pub scheme1: MappingScheme,
    pub scheme2: MappingScheme,
    pub matches: usize,
    pub valid_pairs: usize,
    pub match_percentage: f64,
    pub similarity: Similarity,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SchemeComparisonReport {
    pub sequence_length: usize,
    pub schemes_compared: Vec<MappingScheme>,
    pub scheme_results: Vec<SchemeResult>,
    pub pairwise_comparisons: Vec<SchemePair>,
}

/// Translates one sequence under several schemes and compares every pair of
/// translations. An empty `schemes` slice means all four.
pub fn compare_mapping_schemes(
    sequence: &str,
    schemes: &[MappingScheme],
) -> Result<SchemeComparisonReport> {
    let schemes: Vec<MappingScheme> = if schemes.is_empty() {
        ALL_SCHEMES.to_vec()
    } else {
        schemes.iter().copied().unique().collect()
    };

    let translations = schemes
        .iter()
        .map(|&scheme| super::translate_checked(sequence, scheme).map(|s| (scheme, s)))
        .collect::<Result<Vec<_>>>()?;

    let scheme_results = translations
        .iter()
        .map(|(scheme, symbols)| SchemeResult {
            scheme: *scheme,
            stats: SequenceStats::compute(symbols, sequence),
        })
        .collect();

    let pairwise_comparisons = translations
        .iter()
        .tuple_combinations()
        .map(|((s1, a), (s2, b))| {
            let positions = PositionMatch::count(a, b);
            SchemePair {
                scheme1: *s1,
                scheme2: *s2,
                matches: positions.matches,
                valid_pairs: positions.valid_positions,
                match_percentage: positions.percentage(),
                similarity: pairwise::pairwise_similarity(a, b, false),
            }
        })
        .collect();

    Ok(SchemeComparisonReport {
        sequence_length: sequence.len(),
        schemes_compared: schemes,
        scheme_results,
        pairwise_comparisons,
    })
}
