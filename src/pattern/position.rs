use crate::error::{AnalysisError, Result};
use crate::stats;
use crate::symbol::{Symbol, SENTINEL, SYMBOL_COUNT};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PositionStats {
    pub position: usize,
    pub total: usize,
    pub counts: BTreeMap<Symbol, usize>,
    pub frequencies: BTreeMap<Symbol, f64>,
    pub dominant_symbol: Symbol,
    pub dominant_frequency: f64,
    pub bias: f64,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PositionBias {
    pub position: usize,
    pub bias: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PositionReport {
    pub positions: Vec<PositionStats>,
    pub average_bias: f64,
    pub high_bias_positions: Vec<PositionBias>,
}

/// Squared deviation of observed frequencies from the uniform 1/64,
/// chi-square style.
fn positional_bias<'a>(frequencies: impl Iterator<Item = &'a f64>) -> f64 {
    let expected = 1.0 / SYMBOL_COUNT as f64;
    frequencies
        .map(|f| (f - expected).powi(2) / expected)
        .sum()
}

/// Distribution of symbols at each position.
///
/// Without `positions`, a symbol's position is its 1-indexed offset. Passing
/// explicit positions lets symbols from several sequences be pooled; there
/// must be one position per symbol.
///
/// # Errors
///
/// Empty input, or a `positions` slice of the wrong length.
pub fn analyze_position_patterns(
    symbols: &[Symbol],
    positions: Option<&[usize]>,
) -> Result<PositionReport> {
    super::check_input(symbols)?;

    if let Some(p) = positions {
        if p.len() != symbols.len() {
            return Err(AnalysisError::LengthMismatch {
                what: "positions",
                found: p.len(),
                expected: symbols.len(),
            });
        }
    }

    let mut grouped: BTreeMap<usize, Vec<Symbol>> = BTreeMap::new();
    for (i, &symbol) in symbols.iter().enumerate() {
        if symbol == SENTINEL {
            continue;
        }
        let position = positions.map_or(i + 1, |p| p[i]);
        grouped.entry(position).or_default().push(symbol);
    }

    let positions: Vec<PositionStats> = grouped
        .into_iter()
        .filter_map(|(position, at_position)| {
            let total = at_position.len();
            let ordered = stats::count_ordered(at_position);
            let (dominant_symbol, dominant_count) = stats::mode(&ordered)?;

            let frequencies: BTreeMap<Symbol, f64> = ordered
                .iter()
                .map(|(&s, &c)| (s, c as f64 / total as f64))
                .collect();

            Some(PositionStats {
                position,
                total,
                bias: positional_bias(frequencies.values()),
                counts: ordered.into_iter().collect(),
                frequencies,
                dominant_symbol,
                dominant_frequency: dominant_count as f64 / total as f64,
            })
        })
        .collect();

    let biases: Vec<f64> = positions.iter().map(|p| p.bias).collect();
    let average_bias = stats::mean(&biases);

    let high_bias_positions = positions
        .iter()
        .filter(|p| p.bias > 2.0 * average_bias)
        .map(|p| PositionBias {
            position: p.position,
            bias: p.bias,
        })
        .collect();

    debug!("Position analysis over {} positions", positions.len());

    Ok(PositionReport {
        positions,
        average_bias,
        high_bias_positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sequence_positions() {
        let r = analyze_position_patterns(&[5, 0, 7], None).unwrap();
        assert_eq!(r.positions.len(), 2);
        assert_eq!(r.positions[0].position, 1);
        assert_eq!(r.positions[1].position, 3);
        assert_eq!(r.positions[1].dominant_symbol, 7);
        assert_eq!(r.positions[1].dominant_frequency, 1.0);
    }

    #[test]
    fn bias_of_a_certain_position() {
        // one symbol with frequency 1: (1 - 1/64)^2 * 64
        let r = analyze_position_patterns(&[9], None).unwrap();
        let expected = (1.0 - 1.0 / 64.0f64).powi(2) * 64.0;
        assert!((r.positions[0].bias - expected).abs() < 1e-9);
        assert!((r.average_bias - expected).abs() < 1e-9);
        assert!(r.high_bias_positions.is_empty());
    }

    #[test]
    fn pooled_positions() {
        let symbols = [1, 2, 1, 1, 3, 4];
        let positions = [1, 2, 3, 1, 2, 3];
        let r = analyze_position_patterns(&symbols, Some(&positions)).unwrap();
        assert_eq!(r.positions.len(), 3);

        let first = &r.positions[0];
        assert_eq!(first.total, 2);
        assert_eq!(first.counts[&1], 2);
        assert_eq!(first.dominant_symbol, 1);

        let second = &r.positions[1];
        assert_eq!(second.dominant_symbol, 2);
        assert_eq!(second.dominant_frequency, 0.5);
        assert!(second.bias < first.bias);
    }

    #[test]
    fn errors() {
        assert_eq!(
            analyze_position_patterns(&[], None),
            Err(AnalysisError::EmptySequence)
        );
        assert!(matches!(
            analyze_position_patterns(&[1, 2], Some(&[1])),
            Err(AnalysisError::LengthMismatch { found: 1, expected: 2, .. })
        ));
    }
}
