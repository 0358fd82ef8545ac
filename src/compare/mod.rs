//! Comparison of raw sequences after translation with a shared scheme.

pub mod multi;
pub mod pairwise;
pub mod regions;
pub mod schemes;
pub mod significance;

pub use multi::{compare_multiple, MultiComparisonReport};
pub use pairwise::{compare_sequences, similarity_metrics, ComparisonReport, Similarity};
pub use regions::{find_conserved_regions, ConservedRegionsReport};
pub use schemes::{compare_mapping_schemes, SchemeComparisonReport};
pub use significance::{statistical_test, StatisticalTestReport, TestKind};

use crate::error::{AnalysisError, Result};
use crate::pattern::MAX_SYMBOLS;
use crate::scheme::MappingScheme;
use crate::symbol::Symbol;
use crate::translate;

/// Longest raw sequence accepted, in characters.
pub const MAX_NUCLEOTIDES: usize = 3 * MAX_SYMBOLS;

pub(crate) fn translate_checked(raw: &str, scheme: MappingScheme) -> Result<Vec<Symbol>> {
    if raw.len() > MAX_NUCLEOTIDES {
        return Err(AnalysisError::InputTooLarge {
            length: raw.len(),
            limit: MAX_NUCLEOTIDES,
        });
    }
    Ok(translate::translate_sequence(raw, scheme))
}

/// Position-wise agreement over the shorter of two symbol sequences.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PositionMatch {
    pub matches: usize,
    pub valid_positions: usize,
}

impl PositionMatch {
    pub fn count(a: &[Symbol], b: &[Symbol]) -> Self {
        let (mut matches, mut valid_positions) = (0, 0);
        for (&x, &y) in a.iter().zip(b) {
            if x != crate::symbol::SENTINEL && y != crate::symbol::SENTINEL {
                valid_positions += 1;
                if x == y {
                    matches += 1;
                }
            }
        }
        PositionMatch {
            matches,
            valid_positions,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.valid_positions == 0 {
            return 0.0;
        }
        self.matches as f64 / self.valid_positions as f64 * 100.0
    }
}
