//! Hypothesis tests on symbol distributions.
//!
//! Distribution functions come from `statrs`; the tests themselves follow the
//! usual textbook definitions.

use crate::error::{AnalysisError, Result};
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Discrete, Hypergeometric};

/// Significance level used by every test.
pub const ALPHA: f64 = 0.05;

const CHI_SQUARE_NOTE: &str = "chi-square test failed, possibly due to small sample size";
const FISHER_NOTE: &str = "Fisher exact test failed";
const KS_NOTE: &str = "KS test failed";

// relative tolerance when comparing hypergeometric probabilities
const FISHER_TOLERANCE: f64 = 1e-7;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    pub yates_correction: bool,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table2x2 {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FisherTest {
    /// `ad / bc`; absent when the ratio is undefined or infinite
    pub odds_ratio: Option<f64>,
    pub p_value: f64,
    /// the first row is over-represented (`ad > bc`)
    pub enriched: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct KsTest {
    pub statistic: f64,
    pub p_value: f64,
}

/// Chi-square test of independence on an `r × 2` table of counts.
///
/// # Errors
///
/// Returns a numerical error if the table is empty or any expected frequency
/// is zero (an empty row or column).
pub fn chi_square_independence(table: &[[u64; 2]]) -> Result<ChiSquareTest> {
    let total: u64 = table.iter().map(|r| r[0] + r[1]).sum();
    if table.is_empty() || total == 0 {
        return Err(AnalysisError::numerical(
            "contingency table has no observations",
            CHI_SQUARE_NOTE,
        ));
    }

    let col_totals = [
        table.iter().map(|r| r[0]).sum::<u64>() as f64,
        table.iter().map(|r| r[1]).sum::<u64>() as f64,
    ];
    let total = total as f64;

    let dof = table.len() - 1;
    let yates = dof == 1;

    let mut statistic = 0.0;
    for row in table {
        let row_total = (row[0] + row[1]) as f64;
        for (col, &observed) in row.iter().enumerate() {
            let expected = row_total * col_totals[col] / total;
            if expected == 0.0 {
                return Err(AnalysisError::numerical(
                    "contingency table has a zero expected frequency",
                    CHI_SQUARE_NOTE,
                ));
            }

            let mut observed = observed as f64;
            if yates {
                // move each observation up to 0.5 towards its expectation
                let diff = expected - observed;
                observed += diff.signum() * diff.abs().min(0.5);
            }
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    if dof == 0 {
        return Ok(ChiSquareTest {
            statistic: 0.0,
            p_value: 1.0,
            degrees_of_freedom: 0,
            yates_correction: false,
        });
    }

    let dist = ChiSquared::new(dof as f64)
        .map_err(|e| AnalysisError::numerical(e.to_string(), CHI_SQUARE_NOTE))?;

    Ok(ChiSquareTest {
        statistic,
        p_value: dist.sf(statistic).clamp(0.0, 1.0),
        degrees_of_freedom: dof,
        yates_correction: yates,
    })
}

/// Two-sided Fisher exact test on a 2×2 table `[[a, b], [c, d]]`.
///
/// The p-value sums the hypergeometric probability of every table with the
/// observed margins that is no more likely than the observed one.
pub fn fisher_exact(table: Table2x2) -> Result<FisherTest> {
    let Table2x2 { a, b, c, d } = table;
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let col2 = b + d;
    let total = row1 + row2;

    let ad = (a * d) as f64;
    let bc = (b * c) as f64;
    let odds_ratio = if bc == 0.0 { None } else { Some(ad / bc) };
    let enriched = ad > bc;

    if row1 == 0 || row2 == 0 || col1 == 0 || col2 == 0 {
        return Ok(FisherTest {
            odds_ratio,
            p_value: 1.0,
            enriched,
        });
    }

    let dist = Hypergeometric::new(total, col1, row1)
        .map_err(|e| AnalysisError::numerical(e.to_string(), FISHER_NOTE))?;

    let observed = dist.pmf(a);
    let threshold = observed * (1.0 + FISHER_TOLERANCE);

    let lo = (row1 + col1).saturating_sub(total);
    let hi = row1.min(col1);
    let p_value: f64 = (lo..=hi)
        .map(|x| dist.pmf(x))
        .filter(|&p| p <= threshold)
        .sum();

    Ok(FisherTest {
        odds_ratio,
        p_value: p_value.clamp(0.0, 1.0),
        enriched,
    })
}

/// Two-sample Kolmogorov-Smirnov test with the asymptotic p-value.
pub fn kolmogorov_smirnov(x: &[f64], y: &[f64]) -> Result<KsTest> {
    if x.is_empty() || y.is_empty() {
        return Err(AnalysisError::numerical(
            "both samples must contain at least one observation",
            KS_NOTE,
        ));
    }

    let mut x = x.to_vec();
    let mut y = y.to_vec();
    x.sort_by(f64::total_cmp);
    y.sort_by(f64::total_cmp);

    let (n1, n2) = (x.len(), y.len());
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;

    // walk both empirical distributions, stepping past ties together
    while i < n1 && j < n2 {
        let v = x[i].min(y[j]);
        while i < n1 && x[i] <= v {
            i += 1;
        }
        while j < n2 && y[j] <= v {
            j += 1;
        }
        let f1 = i as f64 / n1 as f64;
        let f2 = j as f64 / n2 as f64;
        d = d.max((f1 - f2).abs());
    }

    let ne = (n1 * n2) as f64 / (n1 + n2) as f64;
    let sqrt_ne = ne.sqrt();
    let lambda = (sqrt_ne + 0.12 + 0.11 / sqrt_ne) * d;

    Ok(KsTest {
        statistic: d,
        p_value: kolmogorov_q(lambda),
    })
}

/// Survival function of the Kolmogorov distribution,
/// `Q(λ) = 2 Σ (-1)^(j-1) exp(-2 j² λ²)`.
pub fn kolmogorov_q(lambda: f64) -> f64 {
    const EPS1: f64 = 0.001;
    const EPS2: f64 = 1.0e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut previous: f64 = 0.0;

    for j in 1..=100 {
        let j = j as f64;
        let term = fac * (a2 * j * j).exp();
        sum += term;
        if term.abs() <= EPS1 * previous || term.abs() <= EPS2 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        previous = term.abs();
    }

    // the series only fails to converge for λ near zero
    1.0
}
