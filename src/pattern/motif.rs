use super::MAX_MOTIF_LENGTH;
use crate::error::{AnalysisError, Result};
use crate::symbol::Symbol;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

pub const DEFAULT_MOTIF_LENGTHS: [usize; 4] = [2, 3, 4, 5];
pub const DEFAULT_MIN_OCCURRENCES: usize = 3;
pub const DEFAULT_MAX_MOTIFS: usize = 20;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Motif {
    pub motif: Vec<Symbol>,
    pub length: usize,
    pub occurrences: usize,
    pub frequency: f64,
    /// 1-indexed start positions in the sentinel-free sequence
    pub positions: Vec<usize>,
    pub avg_spacing: f64,
    pub min_spacing: usize,
    pub max_spacing: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MotifReport {
    pub sequence_length: usize,
    pub motif_lengths_searched: Vec<usize>,
    pub min_occurrences: usize,
    pub motifs_found: usize,
    /// Σ length × occurrences over the valid length; overlaps count twice
    pub motif_coverage_ratio: f64,
    pub motifs: Vec<Motif>,
}

impl Motif {
    fn new(motif: &[Symbol], positions: Vec<usize>, valid_len: usize) -> Self {
        let gaps: Vec<usize> = positions.windows(2).map(|w| w[1] - w[0]).collect();

        let (avg_spacing, min_spacing, max_spacing) = match (gaps.iter().min(), gaps.iter().max()) {
            (Some(&min), Some(&max)) => {
                let avg = gaps.iter().sum::<usize>() as f64 / gaps.len() as f64;
                (avg, min, max)
            }
            _ => (0.0, 0, 0),
        };

        Motif {
            motif: motif.to_vec(),
            length: motif.len(),
            occurrences: positions.len(),
            frequency: positions.len() as f64 / valid_len as f64,
            positions,
            avg_spacing,
            min_spacing,
            max_spacing,
        }
    }
}

/// Finds contiguous symbol tuples that recur at least `min_occurrences` times.
///
/// Motifs are counted over the sequence with sentinels removed, every start
/// offset (overlaps included). Lengths longer than that sequence are skipped
/// and repeated lengths are searched once. The result keeps the
/// `max_motifs` most frequent, ties in order of first appearance.
///
/// # Errors
///
/// Empty input, no valid symbols, an empty `lengths`, a length of zero or
/// above [`MAX_MOTIF_LENGTH`], or a zero `min_occurrences` / `max_motifs`.
pub fn discover_motifs(
    symbols: &[Symbol],
    lengths: &[usize],
    min_occurrences: usize,
    max_motifs: usize,
) -> Result<MotifReport> {
    super::check_input(symbols)?;

    if lengths.is_empty() {
        return Err(AnalysisError::parameter(
            "motif_lengths",
            "at least one length is required",
        ));
    }
    if let Some(bad) = lengths.iter().find(|&&l| l == 0 || l > MAX_MOTIF_LENGTH) {
        return Err(AnalysisError::parameter(
            "motif_lengths",
            format!("{bad} is outside 1..={MAX_MOTIF_LENGTH}"),
        ));
    }
    if min_occurrences == 0 {
        return Err(AnalysisError::parameter("min_occurrences", "must be at least 1"));
    }
    if max_motifs == 0 {
        return Err(AnalysisError::parameter("max_motifs", "must be at least 1"));
    }

    let valid = super::valid_symbols(symbols);
    if valid.is_empty() {
        return Err(AnalysisError::NoValidSymbols);
    }

    let lengths: Vec<usize> = lengths.iter().copied().unique().collect();

    let mut occurrences: IndexMap<&[Symbol], Vec<usize>> = IndexMap::new();
    for &length in lengths.iter().filter(|&&l| l <= valid.len()) {
        for (i, motif) in valid.windows(length).enumerate() {
            occurrences.entry(motif).or_default().push(i + 1);
        }
    }

    let mut retained: Vec<(&[Symbol], Vec<usize>)> = occurrences
        .into_iter()
        .filter(|(_, positions)| positions.len() >= min_occurrences)
        .collect();
    retained.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    retained.truncate(max_motifs);

    let motifs: Vec<Motif> = retained
        .into_iter()
        .map(|(motif, positions)| Motif::new(motif, positions, valid.len()))
        .collect();

    let coverage: usize = motifs.iter().map(|m| m.length * m.occurrences).sum();

    debug!(
        "Found {} motifs over {} valid symbols",
        motifs.len(),
        valid.len()
    );

    Ok(MotifReport {
        sequence_length: valid.len(),
        motif_lengths_searched: lengths,
        min_occurrences,
        motifs_found: motifs.len(),
        motif_coverage_ratio: coverage as f64 / valid.len() as f64,
        motifs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pair() {
        let symbols = [1, 2, 9, 1, 2, 8, 1, 2];
        let r = discover_motifs(&symbols, &[2], 3, 20).unwrap();
        assert_eq!(r.motifs_found, 1);

        let m = &r.motifs[0];
        assert_eq!(m.motif, vec![1, 2]);
        assert_eq!(m.positions, vec![1, 4, 7]);
        assert_eq!(m.avg_spacing, 3.0);
        assert_eq!(m.min_spacing, 3);
        assert_eq!(m.max_spacing, 3);
        assert!((r.motif_coverage_ratio - 6.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn sentinels_are_removed_first() {
        // 1,2 becomes adjacent once the sentinel goes
        let symbols = [1, 0, 2, 1, 2];
        let r = discover_motifs(&symbols, &[2], 2, 20).unwrap();
        assert_eq!(r.sequence_length, 4);
        assert_eq!(r.motifs[0].motif, vec![1, 2]);
        assert_eq!(r.motifs[0].positions, vec![1, 3]);
    }

    #[test]
    fn single_occurrence_spacing() {
        let r = discover_motifs(&[4, 5, 6], &[3], 1, 20).unwrap();
        assert_eq!(r.motifs[0].avg_spacing, 0.0);
        assert_eq!(r.motifs[0].max_spacing, 0);
    }

    #[test]
    fn ranking_and_truncation() {
        let symbols = [7, 7, 7, 7, 3, 3, 3];
        let r = discover_motifs(&symbols, &[2, 3], 1, 2).unwrap();
        assert_eq!(r.motifs_found, 2);
        assert_eq!(r.motifs[0].motif, vec![7, 7]);
        assert_eq!(r.motifs[0].occurrences, 3);
        // [7,7,7] also occurs twice, but [3,3] was seen first
        assert_eq!(r.motifs[1].motif, vec![3, 3]);
    }

    #[test]
    fn long_lengths_are_skipped() {
        let r = discover_motifs(&[1, 1], &[2, 5], 1, 20).unwrap();
        assert_eq!(r.motifs_found, 1);
        assert_eq!(r.motif_lengths_searched, vec![2, 5]);
    }

    #[test]
    fn no_motifs() {
        let r = discover_motifs(&[1, 2, 3], &DEFAULT_MOTIF_LENGTHS, 3, 20).unwrap();
        assert_eq!(r.motifs_found, 0);
        assert_eq!(r.motif_coverage_ratio, 0.0);
    }

    #[test]
    fn errors() {
        assert_eq!(
            discover_motifs(&[], &[2], 1, 1),
            Err(AnalysisError::EmptySequence)
        );
        assert_eq!(
            discover_motifs(&[0, 0], &[2], 1, 1),
            Err(AnalysisError::NoValidSymbols)
        );
        assert!(discover_motifs(&[1], &[], 1, 1).is_err());
        assert!(discover_motifs(&[1], &[0], 1, 1).is_err());
        assert!(discover_motifs(&[1], &[11], 1, 1).is_err());
        assert!(discover_motifs(&[1], &[1], 0, 1).is_err());
        assert!(discover_motifs(&[1], &[1], 1, 0).is_err());
    }
}
