use super::CONSERVATION_THRESHOLD;
use crate::error::{AnalysisError, Result};
use crate::stats;
use crate::symbol::Symbol;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PositionConservation {
    pub position: usize,
    pub counts: BTreeMap<Symbol, usize>,
    pub dominant_symbol: Symbol,
    pub dominant_count: usize,
    pub conservation_score: f64,
    pub is_conserved: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ConservedRun {
    pub start_position: usize,
    /// inclusive
    pub end_position: usize,
    pub length: usize,
    pub dominant_symbols: Vec<Symbol>,
    pub avg_conservation: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ConservationReport {
    pub num_sequences: usize,
    pub sequence_names: Vec<String>,
    pub alignment_length: usize,
    pub average_conservation: f64,
    pub highly_conserved_positions: Vec<usize>,
    pub position_conservation: Vec<PositionConservation>,
    pub similarity_matrix: Vec<Vec<f64>>,
    pub conserved_regions: Vec<ConservedRun>,
}

/// Default names `Sequence_1..N`, or the caller's names if there is one per
/// sequence.
pub(crate) fn sequence_names(count: usize, names: Option<&[String]>) -> Result<Vec<String>> {
    match names {
        Some(names) if names.len() != count => Err(AnalysisError::NameCountMismatch {
            names: names.len(),
            sequences: count,
        }),
        Some(names) => Ok(names.to_vec()),
        None => Ok((1..=count).map(|i| format!("Sequence_{i}")).collect()),
    }
}

/// Merges consecutive conserved positions into runs.
fn conserved_runs(positions: &[PositionConservation]) -> Vec<ConservedRun> {
    let mut runs = Vec::new();
    let mut current: Option<ConservedRun> = None;

    for p in positions {
        if p.is_conserved {
            let run = current.get_or_insert_with(|| ConservedRun {
                start_position: p.position,
                end_position: p.position,
                length: 0,
                dominant_symbols: Vec::new(),
                avg_conservation: 0.0,
            });
            run.end_position = p.position;
            run.length += 1;
            run.dominant_symbols.push(p.dominant_symbol);
            run.avg_conservation += p.conservation_score;
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);

    for run in runs.iter_mut() {
        run.avg_conservation /= run.length as f64;
    }
    runs
}

/// Per-position agreement across several symbol sequences.
///
/// Sentinels are removed from each sequence, then every sequence is cut to
/// the shortest remaining length so that each position sees all N sequences.
/// A position is conserved when its dominant symbol is shared by at least
/// [`CONSERVATION_THRESHOLD`] of them.
///
/// # Errors
///
/// No sequences, a sequence over the size limit, or a name count that does
/// not match.
pub fn analyze_conservation(
    sequences: &[Vec<Symbol>],
    names: Option<&[String]>,
) -> Result<ConservationReport> {
    if sequences.is_empty() {
        return Err(AnalysisError::TooFewSequences {
            required: 1,
            found: 0,
        });
    }
    for s in sequences {
        super::check_size(s)?;
    }
    let sequence_names = sequence_names(sequences.len(), names)?;

    let filtered: Vec<Vec<Symbol>> = sequences.iter().map(|s| super::valid_symbols(s)).collect();
    let alignment_length = filtered.iter().map(Vec::len).min().unwrap_or(0);
    let n = sequences.len();

    let position_conservation: Vec<PositionConservation> = (0..alignment_length)
        .filter_map(|pos| {
            let counts = stats::count_ordered(filtered.iter().map(|s| s[pos]));
            let (dominant_symbol, dominant_count) = stats::mode(&counts)?;
            let conservation_score = dominant_count as f64 / n as f64;

            Some(PositionConservation {
                position: pos + 1,
                counts: counts.into_iter().collect(),
                dominant_symbol,
                dominant_count,
                conservation_score,
                is_conserved: conservation_score >= CONSERVATION_THRESHOLD,
            })
        })
        .collect();

    let scores: Vec<f64> = position_conservation
        .iter()
        .map(|p| p.conservation_score)
        .collect();

    let sets: Vec<BTreeSet<Symbol>> = filtered
        .iter()
        .map(|s| s[..alignment_length].iter().copied().collect())
        .collect();

    debug!("Conservation over {n} sequences, {alignment_length} aligned positions");

    Ok(ConservationReport {
        num_sequences: n,
        sequence_names,
        alignment_length,
        average_conservation: stats::mean(&scores),
        highly_conserved_positions: position_conservation
            .iter()
            .filter(|p| p.is_conserved)
            .map(|p| p.position)
            .collect(),
        conserved_regions: conserved_runs(&position_conservation),
        similarity_matrix: stats::jaccard_matrix(&sets),
        position_conservation,
    })
}
