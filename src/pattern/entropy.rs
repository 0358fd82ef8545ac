use crate::error::{AnalysisError, Result};
use crate::stats;
use crate::symbol::{Symbol, SYMBOL_COUNT};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_ENTROPY_WINDOW: usize = 10;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LocalEntropy {
    pub position: usize,
    pub window: Vec<Symbol>,
    pub entropy: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EntropyReport {
    pub sequence_length: usize,
    pub window_size: usize,
    pub overall_entropy: f64,
    pub max_possible_entropy: f64,
    /// overall entropy over ln 64
    pub complexity_score: f64,
    pub average_local_entropy: f64,
    pub high_entropy_regions: Vec<LocalEntropy>,
    pub low_entropy_regions: Vec<LocalEntropy>,
    pub local_entropies: Vec<LocalEntropy>,
    pub distribution: BTreeMap<Symbol, usize>,
}

fn window_entropy(window: &[Symbol]) -> f64 {
    let counts = stats::count_ordered(window.iter().copied());
    stats::entropy(counts.into_values(), window.len())
}

/// Shannon entropy of the whole sequence plus a local entropy for every
/// `window`-long stretch (stride 1) of its valid symbols.
///
/// Windows above 1.5× the mean local entropy are reported as high entropy,
/// those under 0.5× as low entropy.
pub fn calculate_position_entropy(symbols: &[Symbol], window: usize) -> Result<EntropyReport> {
    super::check_input(symbols)?;
    if window == 0 {
        return Err(AnalysisError::parameter("window_size", "must be at least 1"));
    }

    let valid = super::valid_symbols(symbols);
    if valid.is_empty() {
        return Err(AnalysisError::NoValidSymbols);
    }
    if window > valid.len() {
        return Err(AnalysisError::WindowTooLarge {
            window,
            length: valid.len(),
        });
    }

    let local_entropies: Vec<LocalEntropy> = valid
        .windows(window)
        .enumerate()
        .map(|(i, w)| LocalEntropy {
            position: i + 1,
            window: w.to_vec(),
            entropy: window_entropy(w),
        })
        .collect();

    let distribution: BTreeMap<Symbol, usize> = stats::count_ordered(valid.iter().copied())
        .into_iter()
        .collect();
    let overall_entropy = stats::entropy(distribution.values().copied(), valid.len());
    let max_possible_entropy = (SYMBOL_COUNT as f64).ln();

    let local: Vec<f64> = local_entropies.iter().map(|e| e.entropy).collect();
    let average_local_entropy = stats::mean(&local);

    let select = |keep: &dyn Fn(f64) -> bool| -> Vec<LocalEntropy> {
        local_entropies
            .iter()
            .filter(|e| keep(e.entropy))
            .cloned()
            .collect()
    };
    let high_entropy_regions = select(&|e| e > 1.5 * average_local_entropy);
    let low_entropy_regions = select(&|e| e < 0.5 * average_local_entropy);

    Ok(EntropyReport {
        sequence_length: valid.len(),
        window_size: window,
        overall_entropy,
        max_possible_entropy,
        complexity_score: overall_entropy / max_possible_entropy,
        average_local_entropy,
        high_entropy_regions,
        low_entropy_regions,
        local_entropies,
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_symbol_has_no_entropy() {
        let r = calculate_position_entropy(&[4; 12], 10).unwrap();
        assert_eq!(r.overall_entropy, 0.0);
        assert_eq!(r.complexity_score, 0.0);
        assert_eq!(r.local_entropies.len(), 3);
        assert!(r.high_entropy_regions.is_empty());
    }

    #[test]
    fn every_symbol_once_is_maximal() {
        let symbols: Vec<Symbol> = (1..=64).collect();
        let r = calculate_position_entropy(&symbols, 8).unwrap();
        assert!((r.complexity_score - 1.0).abs() < 1e-12);
        assert!((r.max_possible_entropy - 64f64.ln()).abs() < 1e-12);
        assert_eq!(r.local_entropies.len(), 57);
        assert!((r.average_local_entropy - 8f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn low_entropy_region() {
        let mut symbols = vec![1, 2, 3, 4, 5, 6, 7, 8];
        symbols.extend([9; 4]);
        let r = calculate_position_entropy(&symbols, 4).unwrap();
        let last = r.local_entropies.last().unwrap();
        assert_eq!(last.entropy, 0.0);
        assert!(r.low_entropy_regions.iter().any(|e| e.position == last.position));
    }

    #[test]
    fn window_against_valid_length() {
        // five symbols but only four valid
        assert_eq!(
            calculate_position_entropy(&[1, 2, 0, 3, 4], 5),
            Err(AnalysisError::WindowTooLarge {
                window: 5,
                length: 4
            })
        );
        assert_eq!(
            calculate_position_entropy(&[0, 0], 1),
            Err(AnalysisError::NoValidSymbols)
        );
        assert!(calculate_position_entropy(&[1], 0).is_err());
    }
}
