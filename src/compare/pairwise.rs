use super::PositionMatch;
use crate::error::Result;
use crate::scheme::MappingScheme;
use crate::stats;
use crate::symbol::{Symbol, SENTINEL};
use crate::translate::{self, SequenceStats};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// How many differing positions a comparison lists.
pub const MAX_DIFFERENCES: usize = 100;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SimilarityDetail {
    /// Pearson correlation of the frequency vectors, absent when undefined
    pub frequency_correlation: Option<f64>,
    pub common_symbols: Vec<Symbol>,
    pub unique_to_first: Vec<Symbol>,
    pub unique_to_second: Vec<Symbol>,
    pub common_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Similarity {
    pub jaccard: f64,
    pub cosine: f64,
    pub overlap: f64,
    pub match_percentage: f64,
    pub matches: usize,
    pub valid_positions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<SimilarityDetail>,
}

impl Similarity {
    fn zero() -> Self {
        Similarity {
            jaccard: 0.0,
            cosine: 0.0,
            overlap: 0.0,
            match_percentage: 0.0,
            matches: 0,
            valid_positions: 0,
            detail: None,
        }
    }
}

fn frequency_map(symbols: &[Symbol]) -> BTreeMap<Symbol, f64> {
    translate::symbol_frequency(symbols)
        .into_iter()
        .map(|(s, c)| (s, c as f64))
        .collect()
}

/// Similarity bundle for two symbol sequences. All zeros if either has no
/// valid symbols.
pub(crate) fn pairwise_similarity(a: &[Symbol], b: &[Symbol], detailed: bool) -> Similarity {
    let freq_a = frequency_map(a);
    let freq_b = frequency_map(b);
    if freq_a.is_empty() || freq_b.is_empty() {
        return Similarity::zero();
    }

    let set_a: BTreeSet<Symbol> = freq_a.keys().copied().collect();
    let set_b: BTreeSet<Symbol> = freq_b.keys().copied().collect();
    let union: Vec<Symbol> = set_a.union(&set_b).copied().collect();

    let vec_a: Vec<f64> = union.iter().map(|s| *freq_a.get(s).unwrap_or(&0.0)).collect();
    let vec_b: Vec<f64> = union.iter().map(|s| *freq_b.get(s).unwrap_or(&0.0)).collect();

    let positions = PositionMatch::count(a, b);

    let detail = detailed.then(|| {
        let common_symbols: Vec<Symbol> = set_a.intersection(&set_b).copied().collect();
        SimilarityDetail {
            frequency_correlation: stats::pearson(&vec_a, &vec_b),
            common_count: common_symbols.len(),
            common_symbols,
            unique_to_first: set_a.difference(&set_b).copied().collect(),
            unique_to_second: set_b.difference(&set_a).copied().collect(),
        }
    });

    Similarity {
        jaccard: stats::jaccard(&set_a, &set_b),
        cosine: stats::cosine(&vec_a, &vec_b),
        overlap: stats::overlap_coefficient(&set_a, &set_b),
        match_percentage: positions.percentage(),
        matches: positions.matches,
        valid_positions: positions.valid_positions,
        detail,
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignedPair {
    pub position: usize,
    pub first: Symbol,
    pub second: Symbol,
    #[serde(rename = "match")]
    pub is_match: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    pub mapping_scheme: MappingScheme,
    pub first_stats: SequenceStats,
    pub second_stats: SequenceStats,
    pub similarity: Similarity,
    pub match_percentage: f64,
    pub matches: usize,
    pub valid_comparisons: usize,
    pub differences_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_by_side: Option<Vec<AlignedPair>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differences: Option<Vec<AlignedPair>>,
}

/// Compares two raw sequences position by position and as symbol sets.
///
/// With `include_alignment` the report also lists every aligned position,
/// the first [`MAX_DIFFERENCES`] mismatches and the detailed similarity.
pub fn compare_sequences(
    first: &str,
    second: &str,
    scheme: MappingScheme,
    include_alignment: bool,
) -> Result<ComparisonReport> {
    let a = super::translate_checked(first, scheme)?;
    let b = super::translate_checked(second, scheme)?;

    let side_by_side: Vec<AlignedPair> = a
        .iter()
        .zip(&b)
        .enumerate()
        .map(|(i, (&x, &y))| AlignedPair {
            position: i + 1,
            first: x,
            second: y,
            is_match: x == y && x != SENTINEL,
        })
        .collect();

    let positions = PositionMatch::count(&a, &b);
    let differences: Vec<AlignedPair> = side_by_side
        .iter()
        .filter(|p| !p.is_match && p.first != SENTINEL && p.second != SENTINEL)
        .copied()
        .collect();

    debug!(
        "Compared {} and {} symbols: {} matches",
        a.len(),
        b.len(),
        positions.matches
    );

    Ok(ComparisonReport {
        mapping_scheme: scheme,
        first_stats: SequenceStats::compute(&a, first),
        second_stats: SequenceStats::compute(&b, second),
        similarity: pairwise_similarity(&a, &b, include_alignment),
        match_percentage: positions.percentage(),
        matches: positions.matches,
        valid_comparisons: positions.valid_positions,
        differences_count: differences.len(),
        differences: include_alignment
            .then(|| differences.into_iter().take(MAX_DIFFERENCES).collect()),
        side_by_side: include_alignment.then_some(side_by_side),
    })
}

/// The detailed similarity bundle for two raw sequences.
pub fn similarity_metrics(first: &str, second: &str, scheme: MappingScheme) -> Result<Similarity> {
    let a = super::translate_checked(first, scheme)?;
    let b = super::translate_checked(second, scheme)?;
    Ok(pairwise_similarity(&a, &b, true))
}
