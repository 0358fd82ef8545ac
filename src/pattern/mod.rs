//! Pattern analysis over a single symbol sequence, or a set of them.
//!
//! Every function here is pure. Sentinel symbols are dropped before any
//! statistic is computed, and each entry point rejects sequences longer than
//! [`MAX_SYMBOLS`] so that the `O(n·k)` scans stay bounded.

pub mod conservation;
pub mod correlation;
pub mod entropy;
pub mod motif;
pub mod position;
pub mod runs;
pub mod window;

pub use conservation::{analyze_conservation, ConservationReport};
pub use correlation::{calculate_correlation, CorrelationReport, CorrelationStrength};
pub use entropy::{calculate_position_entropy, EntropyReport};
pub use motif::{discover_motifs, MotifReport};
pub use position::{analyze_position_patterns, PositionReport};
pub use runs::{detect_runs, RunReport};
pub use window::{sliding_window_analysis, WindowReport};

use crate::error::{AnalysisError, Result};
use crate::symbol::{Symbol, SENTINEL};

/// Longest symbol sequence any analysis accepts.
pub const MAX_SYMBOLS: usize = 2_000_000;

pub const MAX_MOTIF_LENGTH: usize = 10;

/// Share of sequences that must agree for a position to count as conserved.
pub const CONSERVATION_THRESHOLD: f64 = 0.8;

pub(crate) fn check_size(symbols: &[Symbol]) -> Result<()> {
    if symbols.len() > MAX_SYMBOLS {
        return Err(AnalysisError::InputTooLarge {
            length: symbols.len(),
            limit: MAX_SYMBOLS,
        });
    }
    Ok(())
}

/// Size check plus rejection of an empty sequence.
pub(crate) fn check_input(symbols: &[Symbol]) -> Result<()> {
    check_size(symbols)?;
    if symbols.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }
    Ok(())
}

pub(crate) fn valid_symbols(symbols: &[Symbol]) -> Vec<Symbol> {
    symbols.iter().copied().filter(|&s| s != SENTINEL).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_checks() {
        assert_eq!(check_input(&[]), Err(AnalysisError::EmptySequence));
        assert!(check_input(&[1]).is_ok());

        let big = vec![1; MAX_SYMBOLS + 1];
        assert_eq!(
            check_input(&big),
            Err(AnalysisError::InputTooLarge {
                length: MAX_SYMBOLS + 1,
                limit: MAX_SYMBOLS
            })
        );
    }

    #[test]
    fn sentinel_filter() {
        assert_eq!(valid_symbols(&[0, 3, 0, 4]), vec![3, 4]);
    }
}
