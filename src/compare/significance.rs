use crate::error::{AnalysisError, ErrorReport, Result};
use crate::scheme::MappingScheme;
use crate::stats::{self, significance};
use crate::stats::significance::{Table2x2, ALPHA};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A hypothesis test comparing two symbol distributions.
#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Chi-square test of independence over all observed symbols
    #[value(name = "chi_square")]
    ChiSquare,

    /// Fisher exact test on the most common symbol of the first sequence
    #[value(name = "fisher_exact")]
    FisherExact,

    /// Two-sample Kolmogorov-Smirnov test on the symbol values
    #[value(name = "ks_test")]
    #[serde(rename = "ks_test")]
    KolmogorovSmirnov,
}

impl TestKind {
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::ChiSquare => "chi_square",
            TestKind::FisherExact => "fisher_exact",
            TestKind::KolmogorovSmirnov => "ks_test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chi_square" => Ok(TestKind::ChiSquare),
            "fisher_exact" => Ok(TestKind::FisherExact),
            "ks_test" => Ok(TestKind::KolmogorovSmirnov),
            other => Err(AnalysisError::UnknownTest(other.to_string())),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChiSquareOutcome {
    pub chi_square_statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    pub yates_correction: bool,
    pub is_significant: bool,
    pub interpretation: String,
    pub alpha: f64,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContingencyTable {
    pub sequence1_has_target: u64,
    pub sequence1_no_target: u64,
    pub sequence2_has_target: u64,
    pub sequence2_no_target: u64,
}

impl From<Table2x2> for ContingencyTable {
    fn from(t: Table2x2) -> Self {
        ContingencyTable {
            sequence1_has_target: t.a,
            sequence1_no_target: t.b,
            sequence2_has_target: t.c,
            sequence2_no_target: t.d,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FisherOutcome {
    pub symbol_tested: Symbol,
    pub contingency_table: ContingencyTable,
    pub odds_ratio: Option<f64>,
    pub p_value: f64,
    pub is_significant: bool,
    pub interpretation: String,
    pub alpha: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct KsOutcome {
    pub ks_statistic: f64,
    pub p_value: f64,
    pub is_significant: bool,
    pub interpretation: String,
    pub alpha: f64,
}

/// The body of a test report: the test's own block, or the error that
/// stopped it.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum TestOutcome {
    ChiSquare(ChiSquareOutcome),
    Fisher(FisherOutcome),
    KolmogorovSmirnov(KsOutcome),
    Failed(ErrorReport),
}

impl TestOutcome {
    pub fn p_value(&self) -> Option<f64> {
        match self {
            TestOutcome::ChiSquare(o) => Some(o.p_value),
            TestOutcome::Fisher(o) => Some(o.p_value),
            TestOutcome::KolmogorovSmirnov(o) => Some(o.p_value),
            TestOutcome::Failed(_) => None,
        }
    }

    pub fn is_significant(&self) -> bool {
        self.p_value().is_some_and(|p| p < ALPHA)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StatisticalTestReport {
    pub test_type: TestKind,
    pub mapping_scheme: MappingScheme,
    pub sequence1_count: usize,
    pub sequence2_count: usize,
    #[serde(flatten)]
    pub outcome: TestOutcome,
}

fn chi_square(a: &[Symbol], b: &[Symbol]) -> Result<ChiSquareOutcome> {
    let counts_a = stats::count_ordered(a.iter().copied());
    let counts_b = stats::count_ordered(b.iter().copied());
    let observed: BTreeSet<Symbol> = counts_a.keys().chain(counts_b.keys()).copied().collect();

    let table: Vec<[u64; 2]> = observed
        .iter()
        .map(|s| {
            [
                *counts_a.get(s).unwrap_or(&0) as u64,
                *counts_b.get(s).unwrap_or(&0) as u64,
            ]
        })
        .collect();

    let test = significance::chi_square_independence(&table)?;
    let is_significant = test.p_value < ALPHA;
    Ok(ChiSquareOutcome {
        chi_square_statistic: test.statistic,
        p_value: test.p_value,
        degrees_of_freedom: test.degrees_of_freedom,
        yates_correction: test.yates_correction,
        is_significant,
        interpretation: if is_significant {
            "Significant difference"
        } else {
            "No significant difference"
        }
        .to_string(),
        alpha: ALPHA,
    })
}

fn fisher(a: &[Symbol], b: &[Symbol]) -> Result<FisherOutcome> {
    let counts_a = stats::count_ordered(a.iter().copied());
    let (target, in_first) = stats::mode(&counts_a).ok_or_else(|| {
        AnalysisError::numerical("No valid symbols in sequence 1", "Fisher exact test failed")
    })?;
    let in_second = b.iter().filter(|&&s| s == target).count();

    let table = Table2x2 {
        a: in_first as u64,
        b: (a.len() - in_first) as u64,
        c: in_second as u64,
        d: (b.len() - in_second) as u64,
    };
    let test = significance::fisher_exact(table)?;
    let is_significant = test.p_value < ALPHA;

    Ok(FisherOutcome {
        symbol_tested: target,
        contingency_table: table.into(),
        odds_ratio: test.odds_ratio,
        p_value: test.p_value,
        is_significant,
        interpretation: format!(
            "Symbol {} is {} in sequence 1",
            target,
            if test.enriched { "enriched" } else { "depleted" }
        ),
        alpha: ALPHA,
    })
}

fn kolmogorov_smirnov(a: &[Symbol], b: &[Symbol]) -> Result<KsOutcome> {
    let x: Vec<f64> = a.iter().map(|&s| s as f64).collect();
    let y: Vec<f64> = b.iter().map(|&s| s as f64).collect();

    let test = significance::kolmogorov_smirnov(&x, &y)?;
    let is_significant = test.p_value < ALPHA;
    Ok(KsOutcome {
        ks_statistic: test.statistic,
        p_value: test.p_value,
        is_significant,
        interpretation: if is_significant {
            "Different distributions"
        } else {
            "Similar distributions"
        }
        .to_string(),
        alpha: ALPHA,
    })
}

/// Runs the chosen hypothesis test on the valid symbols of two raw
/// sequences.
///
/// A test that cannot be computed (too few observations, an empty
/// sequence) still yields a report, with a [`TestOutcome::Failed`] body.
///
/// # Errors
///
/// Only when an input exceeds [`super::MAX_NUCLEOTIDES`].
pub fn statistical_test(
    first: &str,
    second: &str,
    kind: TestKind,
    scheme: MappingScheme,
) -> Result<StatisticalTestReport> {
    let a: Vec<Symbol> = super::translate_checked(first, scheme)?
        .into_iter()
        .filter(|&s| s != crate::symbol::SENTINEL)
        .collect();
    let b: Vec<Symbol> = super::translate_checked(second, scheme)?
        .into_iter()
        .filter(|&s| s != crate::symbol::SENTINEL)
        .collect();

    let outcome = match kind {
        TestKind::ChiSquare => chi_square(&a, &b).map(TestOutcome::ChiSquare),
        TestKind::FisherExact => fisher(&a, &b).map(TestOutcome::Fisher),
        TestKind::KolmogorovSmirnov => {
            kolmogorov_smirnov(&a, &b).map(TestOutcome::KolmogorovSmirnov)
        }
    }
    .unwrap_or_else(|e| {
        debug!("{} test failed: {}", kind, e);
        TestOutcome::Failed(e.into())
    });

    Ok(StatisticalTestReport {
        test_type: kind,
        mapping_scheme: scheme,
        sequence1_count: a.len(),
        sequence2_count: b.len(),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: MappingScheme = MappingScheme::Scheme1;

    #[test]
    fn test_names() {
        assert_eq!("ks_test".parse::<TestKind>(), Ok(TestKind::KolmogorovSmirnov));
        assert_eq!(
            "t_test".parse::<TestKind>(),
            Err(AnalysisError::UnknownTest("t_test".to_string()))
        );
        assert_eq!(
            serde_json::to_string(&TestKind::KolmogorovSmirnov).unwrap(),
            "\"ks_test\""
        );
    }

    #[test]
    fn identical_distributions_are_not_significant() {
        let seq = "AAACCCGGGTTT".repeat(5);
        let r = statistical_test(&seq, &seq, TestKind::ChiSquare, S1).unwrap();
        assert_eq!(r.sequence1_count, 20);
        match &r.outcome {
            TestOutcome::ChiSquare(o) => {
                assert!(o.chi_square_statistic.abs() < 1e-12);
                assert!((o.p_value - 1.0).abs() < 1e-9);
                assert_eq!(o.degrees_of_freedom, 3);
                assert_eq!(o.interpretation, "No significant difference");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!r.outcome.is_significant());
    }

    #[test]
    fn disjoint_distributions_are_significant() {
        let r = statistical_test(
            &"AAA".repeat(30),
            &"CCC".repeat(30),
            TestKind::ChiSquare,
            S1,
        )
        .unwrap();
        assert!(r.outcome.is_significant());
    }

    #[test]
    fn fisher_reports_enrichment() {
        let first = "AAA".repeat(20) + &"CCC".repeat(2);
        let second = "AAA".repeat(2) + &"CCC".repeat(20);
        let r = statistical_test(&first, &second, TestKind::FisherExact, S1).unwrap();
        match r.outcome {
            TestOutcome::Fisher(o) => {
                assert_eq!(o.symbol_tested, 1);
                assert_eq!(o.contingency_table.sequence1_has_target, 20);
                assert_eq!(o.contingency_table.sequence2_no_target, 20);
                assert!(o.is_significant);
                assert_eq!(o.interpretation, "Symbol 1 is enriched in sequence 1");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn empty_input_fails_inside_the_report() {
        let r = statistical_test("", "ATG", TestKind::FisherExact, S1).unwrap();
        assert!(matches!(r.outcome, TestOutcome::Failed(_)));

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["error"], "No valid symbols in sequence 1");
        assert_eq!(json["test_type"], "fisher_exact");

        let r = statistical_test("", "ATG", TestKind::KolmogorovSmirnov, S1).unwrap();
        assert!(r.outcome.p_value().is_none());
    }

    #[test]
    fn ks_flattens_into_report() {
        let r = statistical_test("ATGATG", "ATGATG", TestKind::KolmogorovSmirnov, S1).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["ks_statistic"], 0.0);
        assert_eq!(json["interpretation"], "Similar distributions");
    }
}
