use crate::error::{AnalysisError, Result};
use crate::stats;
use crate::symbol::Symbol;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrelationStrength {
    #[serde(rename = "No correlation")]
    None,
    #[serde(rename = "Weak correlation")]
    Weak,
    #[serde(rename = "Moderate correlation")]
    Moderate,
    #[serde(rename = "Strong correlation")]
    Strong,
    #[serde(rename = "Very strong correlation")]
    VeryStrong,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        match r.abs() {
            a if a < 0.1 => CorrelationStrength::None,
            a if a < 0.3 => CorrelationStrength::Weak,
            a if a < 0.5 => CorrelationStrength::Moderate,
            a if a < 0.7 => CorrelationStrength::Strong,
            _ => CorrelationStrength::VeryStrong,
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorrelationStrength::None => "No correlation",
            CorrelationStrength::Weak => "Weak correlation",
            CorrelationStrength::Moderate => "Moderate correlation",
            CorrelationStrength::Strong => "Strong correlation",
            CorrelationStrength::VeryStrong => "Very strong correlation",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CorrelationReport {
    pub lag: usize,
    pub correlation: f64,
    pub sequence_length: usize,
    pub interpretation: CorrelationStrength,
}

/// Lag-`lag` autocorrelation (Pearson) of the valid symbols.
///
/// # Errors
///
/// * `lag` of zero
/// * fewer than `2 · lag` valid symbols
/// * a numerical error when either series is constant
pub fn calculate_correlation(symbols: &[Symbol], lag: usize) -> Result<CorrelationReport> {
    super::check_size(symbols)?;
    if lag == 0 {
        return Err(AnalysisError::parameter("lag", "must be at least 1"));
    }

    let valid: Vec<f64> = symbols
        .iter()
        .filter(|&&s| s != crate::symbol::SENTINEL)
        .map(|&s| s as f64)
        .collect();
    if lag > valid.len() / 2 {
        return Err(AnalysisError::InsufficientLength {
            lag,
            length: valid.len(),
        });
    }

    let original = &valid[..valid.len() - lag];
    let lagged = &valid[lag..];

    let correlation = stats::pearson(original, lagged).ok_or_else(|| {
        AnalysisError::numerical(
            "correlation is undefined for a constant series",
            "autocorrelation needs at least two distinct values in each shifted copy",
        )
    })?;

    Ok(CorrelationReport {
        lag,
        correlation,
        sequence_length: valid.len(),
        interpretation: CorrelationStrength::from_coefficient(correlation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_sequence() {
        let symbols = [1, 2, 1, 2, 1, 2, 1, 2];
        let r = calculate_correlation(&symbols, 1).unwrap();
        assert!((r.correlation + 1.0).abs() < 1e-12);
        assert_eq!(r.interpretation, CorrelationStrength::VeryStrong);

        let r = calculate_correlation(&symbols, 2).unwrap();
        assert!((r.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bands() {
        assert_eq!(CorrelationStrength::from_coefficient(0.05), CorrelationStrength::None);
        assert_eq!(CorrelationStrength::from_coefficient(-0.2), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_coefficient(0.3), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(0.69), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(0.7), CorrelationStrength::VeryStrong);
        assert_eq!(CorrelationStrength::Weak.to_string(), "Weak correlation");
    }

    #[test]
    fn too_short() {
        assert_eq!(
            calculate_correlation(&[1, 2, 0, 0], 2),
            Err(AnalysisError::InsufficientLength { lag: 2, length: 2 })
        );
        assert!(calculate_correlation(&[1, 2], 0).is_err());
    }

    #[test]
    fn huge_lag_is_too_short() {
        assert_eq!(
            calculate_correlation(&[1, 2, 3, 4], usize::MAX),
            Err(AnalysisError::InsufficientLength {
                lag: usize::MAX,
                length: 4
            })
        );
        assert!(calculate_correlation(&[1, 2, 3, 4], usize::MAX / 2 + 1).is_err());
    }

    #[test]
    fn constant_series_is_numerical() {
        let e = calculate_correlation(&[3, 3, 3, 3], 1).unwrap_err();
        assert!(e.note().is_some());
    }
}
