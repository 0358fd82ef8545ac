use crate::error::{AnalysisError, Result};
use crate::pattern::conservation::sequence_names;
use crate::scheme::MappingScheme;
use crate::stats;
use crate::symbol::{Symbol, SENTINEL};
use crate::translate::SequenceStats;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NamedStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: SequenceStats,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SequencePair {
    pub indices: [usize; 2],
    pub names: [String; 2],
    pub similarity: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MultiComparisonReport {
    pub sequence_count: usize,
    pub mapping_scheme: MappingScheme,
    pub sequence_names: Vec<String>,
    pub sequence_stats: Vec<NamedStats>,
    /// Jaccard similarity of the symbol sets, 1.0 on the diagonal
    pub similarity_matrix: Vec<Vec<f64>>,
    pub most_similar_pair: SequencePair,
    pub most_divergent_pair: SequencePair,
}

/// Picks the pair `i < j` whose similarity is preferred by `better`,
/// scanning row-major from `(0, 1)` and keeping the earliest on ties.
fn extreme_pair(matrix: &[Vec<f64>], better: impl Fn(f64, f64) -> bool) -> (usize, usize) {
    let mut best = (0, 1);
    for i in 0..matrix.len() {
        for j in (i + 1)..matrix.len() {
            if better(matrix[i][j], matrix[best.0][best.1]) {
                best = (i, j);
            }
        }
    }
    best
}

/// Translates every sequence and compares them all against each other.
///
/// # Errors
///
/// * fewer than two sequences
/// * `names` given with a different length than `sequences`
/// * any sequence over the input ceiling
pub fn compare_multiple<S: AsRef<str>>(
    sequences: &[S],
    names: Option<&[String]>,
    scheme: MappingScheme,
) -> Result<MultiComparisonReport> {
    if sequences.len() < 2 {
        return Err(AnalysisError::TooFewSequences {
            required: 2,
            found: sequences.len(),
        });
    }
    let names = sequence_names(sequences.len(), names)?;

    let translated = sequences
        .iter()
        .map(|s| super::translate_checked(s.as_ref(), scheme))
        .collect::<Result<Vec<_>>>()?;

    let sequence_stats = translated
        .iter()
        .zip(sequences)
        .zip(&names)
        .map(|((symbols, raw), name)| NamedStats {
            name: name.clone(),
            stats: SequenceStats::compute(symbols, raw.as_ref()),
        })
        .collect();

    let sets: Vec<BTreeSet<Symbol>> = translated
        .iter()
        .map(|symbols| symbols.iter().copied().filter(|&s| s != SENTINEL).collect())
        .collect();
    let similarity_matrix = stats::jaccard_matrix(&sets);

    let pair = |(i, j): (usize, usize)| SequencePair {
        indices: [i, j],
        names: [names[i].clone(), names[j].clone()],
        similarity: similarity_matrix[i][j],
    };
    let most_similar_pair = pair(extreme_pair(&similarity_matrix, |a, b| a > b));
    let most_divergent_pair = pair(extreme_pair(&similarity_matrix, |a, b| a < b));

    info!(
        "Compared {} sequences; most similar: {} and {}",
        sequences.len(),
        most_similar_pair.names[0],
        most_similar_pair.names[1]
    );

    Ok(MultiComparisonReport {
        sequence_count: sequences.len(),
        mapping_scheme: scheme,
        sequence_names: names,
        sequence_stats,
        similarity_matrix,
        most_similar_pair,
        most_divergent_pair,
    })
}
