use crate::error::{AnalysisError, Result};
use crate::symbol::{Symbol, SENTINEL};
use serde::Serialize;

pub const DEFAULT_MIN_RUN_LENGTH: usize = 3;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Run {
    pub symbol: Symbol,
    pub start_position: usize,
    /// inclusive, `start_position + length - 1`
    pub end_position: usize,
    pub length: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RunReport {
    pub min_run_length: usize,
    pub total_runs: usize,
    pub runs: Vec<Run>,
}

/// Maximal stretches of one repeated symbol, at least `min_run_length` long.
///
/// Positions are 1-indexed in the original sequence. A sentinel ends the
/// current run and never starts one.
pub fn detect_runs(symbols: &[Symbol], min_run_length: usize) -> Result<RunReport> {
    super::check_input(symbols)?;
    if min_run_length == 0 {
        return Err(AnalysisError::parameter("min_run_length", "must be at least 1"));
    }

    let mut runs = Vec::new();
    let mut i = 0;
    while i < symbols.len() {
        let symbol = symbols[i];
        let length = symbols[i..].iter().take_while(|&&s| s == symbol).count();

        if symbol != SENTINEL && length >= min_run_length {
            runs.push(Run {
                symbol,
                start_position: i + 1,
                end_position: i + length,
                length,
            });
        }
        i += length;
    }

    Ok(RunReport {
        min_run_length,
        total_runs: runs.len(),
        runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_identical_codons() {
        let r = detect_runs(&[1, 1, 1], 2).unwrap();
        assert_eq!(
            r.runs,
            vec![Run {
                symbol: 1,
                start_position: 1,
                end_position: 3,
                length: 3
            }]
        );
    }

    #[test]
    fn sentinel_breaks_runs() {
        let r = detect_runs(&[5, 5, 0, 5, 5, 5, 0, 0, 0], 3).unwrap();
        assert_eq!(r.total_runs, 1);
        assert_eq!(r.runs[0].start_position, 4);
        assert_eq!(r.runs[0].end_position, 6);
    }

    #[test]
    fn runs_in_the_middle() {
        let r = detect_runs(&[1, 2, 2, 2, 3, 3, 3, 3, 1], 3).unwrap();
        assert_eq!(r.total_runs, 2);
        assert_eq!(r.runs[1].symbol, 3);
        assert_eq!(r.runs[1].start_position, 5);
        assert_eq!(r.runs[1].end_position, 8);
        assert_eq!(r.runs[1].length, 4);
    }

    #[test]
    fn errors() {
        assert_eq!(detect_runs(&[], 3), Err(AnalysisError::EmptySequence));
        assert!(detect_runs(&[1], 0).is_err());
    }
}
