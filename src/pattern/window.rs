use crate::error::{AnalysisError, Result};
use crate::stats;
use crate::symbol::{Symbol, SENTINEL};
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WindowPattern {
    pub pattern: Vec<Symbol>,
    pub count: usize,
    /// count over every window enumerated, including skipped ones
    pub frequency: f64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WindowReport {
    pub window_size: usize,
    pub step_size: usize,
    pub total_windows: usize,
    pub unique_patterns: usize,
    pub pattern_entropy: f64,
    /// in the order each pattern first appeared
    pub patterns: Vec<WindowPattern>,
    pub most_common_patterns: Vec<WindowPattern>,
    pub window_start_positions: Vec<usize>,
}

/// Census of the contiguous `window`-long subsequences taken every `step`
/// symbols. A window holding a sentinel is enumerated but not counted, and
/// `total_windows` is 0 when no window is valid.
///
/// # Errors
///
/// Empty input, a zero window or step, or a window longer than the sequence.
pub fn sliding_window_analysis(
    symbols: &[Symbol],
    window: usize,
    step: usize,
) -> Result<WindowReport> {
    super::check_input(symbols)?;
    if window == 0 {
        return Err(AnalysisError::parameter("window_size", "must be at least 1"));
    }
    if step == 0 {
        return Err(AnalysisError::parameter("step_size", "must be at least 1"));
    }
    if window > symbols.len() {
        return Err(AnalysisError::WindowTooLarge {
            window,
            length: symbols.len(),
        });
    }

    let mut enumerated = 0;
    let mut window_start_positions = Vec::new();

    let valid_windows = symbols
        .windows(window)
        .enumerate()
        .step_by(step)
        .filter_map(|(i, w)| {
            enumerated += 1;
            if w.contains(&SENTINEL) {
                return None;
            }
            window_start_positions.push(i + 1);
            Some(w)
        });
    let counts = stats::count_ordered(valid_windows);
    let total_windows = if counts.is_empty() { 0 } else { enumerated };

    let to_pattern = |(w, count): (&[Symbol], usize)| WindowPattern {
        pattern: w.to_vec(),
        count,
        frequency: count as f64 / total_windows as f64,
    };

    let pattern_entropy = stats::entropy(counts.values().copied(), counts.values().sum());
    let most_common_patterns = stats::ranked(&counts, 10)
        .into_iter()
        .map(to_pattern)
        .collect();

    debug!(
        "Window census: {} of {total_windows} windows valid, {} distinct",
        window_start_positions.len(),
        counts.len()
    );

    Ok(WindowReport {
        window_size: window,
        step_size: step,
        total_windows,
        unique_patterns: counts.len(),
        pattern_entropy,
        patterns: counts.into_iter().map(to_pattern).collect(),
        most_common_patterns,
        window_start_positions,
    })
}
