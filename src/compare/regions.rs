use crate::error::{AnalysisError, Result};
use crate::scheme::MappingScheme;
use crate::symbol::{Symbol, SENTINEL};
use serde::Serialize;

pub const DEFAULT_REGION_WINDOW: usize = 5;
pub const DEFAULT_MIN_CONSERVATION: f64 = 0.8;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RegionWindow {
    /// 1-indexed start of the window
    pub position: usize,
    pub conservation: f64,
    /// the window's symbols in each sequence
    pub symbols: Vec<Vec<Symbol>>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ConservedRegion {
    pub start_position: usize,
    pub end_position: usize,
    pub length: usize,
    pub max_conservation: f64,
    pub avg_conservation: f64,
    pub windows: Vec<RegionWindow>,
}

impl ConservedRegion {
    fn open(window: RegionWindow, size: usize) -> Self {
        ConservedRegion {
            start_position: window.position,
            end_position: window.position + size - 1,
            length: size,
            max_conservation: window.conservation,
            avg_conservation: window.conservation,
            windows: vec![window],
        }
    }

    fn extend(&mut self, window: RegionWindow, size: usize) {
        self.end_position = window.position + size - 1;
        self.length = self.end_position - self.start_position + 1;
        self.max_conservation = self.max_conservation.max(window.conservation);
        self.windows.push(window);
        self.avg_conservation = self.windows.iter().map(|w| w.conservation).sum::<f64>()
            / self.windows.len() as f64;
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ConservedRegionsReport {
    pub sequence_count: usize,
    pub window_size: usize,
    pub min_conservation: f64,
    /// length of the shortest translated sequence
    pub min_length: usize,
    pub total_regions: usize,
    pub conserved_regions: Vec<ConservedRegion>,
}

/// Finds stretches where the translated sequences agree.
///
/// An offset is conserved when every sequence has the same valid symbol
/// there. Each `window`-long stretch (stride 1) scores the fraction of its
/// offsets that are conserved; consecutive windows scoring at least
/// `min_conservation` are merged into one region.
///
/// # Errors
///
/// * no sequences
/// * `window` of zero, or longer than the shortest translation
/// * `min_conservation` outside `[0, 1]`
pub fn find_conserved_regions<S: AsRef<str>>(
    sequences: &[S],
    window: usize,
    min_conservation: f64,
    scheme: MappingScheme,
) -> Result<ConservedRegionsReport> {
    if sequences.is_empty() {
        return Err(AnalysisError::TooFewSequences {
            required: 1,
            found: 0,
        });
    }
    if window == 0 {
        return Err(AnalysisError::parameter("window_size", "must be at least 1"));
    }
    if !(0.0..=1.0).contains(&min_conservation) {
        return Err(AnalysisError::parameter(
            "min_conservation",
            format!("{min_conservation} is not within [0, 1]"),
        ));
    }

    let translated = sequences
        .iter()
        .map(|s| super::translate_checked(s.as_ref(), scheme))
        .collect::<Result<Vec<_>>>()?;
    let min_length = translated.iter().map(Vec::len).min().unwrap_or(0);
    if window > min_length {
        return Err(AnalysisError::WindowTooLarge {
            window,
            length: min_length,
        });
    }

    let conserved: Vec<bool> = (0..min_length)
        .map(|i| {
            let first = translated[0][i];
            first != SENTINEL && translated.iter().all(|t| t[i] == first)
        })
        .collect();

    let mut regions: Vec<ConservedRegion> = Vec::new();
    let mut open = false;
    for (start, flags) in conserved.windows(window).enumerate() {
        let conservation = flags.iter().filter(|&&c| c).count() as f64 / window as f64;
        if conservation < min_conservation {
            open = false;
            continue;
        }

        let found = RegionWindow {
            position: start + 1,
            conservation,
            symbols: translated
                .iter()
                .map(|t| t[start..start + window].to_vec())
                .collect(),
        };
        match regions.last_mut() {
            Some(region) if open => region.extend(found, window),
            _ => regions.push(ConservedRegion::open(found, window)),
        }
        open = true;
    }

    debug!(
        "{} conserved regions across {} sequences",
        regions.len(),
        sequences.len()
    );

    Ok(ConservedRegionsReport {
        sequence_count: sequences.len(),
        window_size: window,
        min_conservation,
        min_length,
        total_regions: regions.len(),
        conserved_regions: regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: MappingScheme = MappingScheme::Scheme1;

    #[test]
    fn identical_sequences_form_one_region() {
        let seq = "ATGCGATACGCTTGA";
        let r = find_conserved_regions(&[seq, seq], 2, 1.0, S1).unwrap();
        assert_eq!(r.min_length, 5);
        assert_eq!(r.total_regions, 1);

        let region = &r.conserved_regions[0];
        assert_eq!(region.start_position, 1);
        assert_eq!(region.end_position, 5);
        assert_eq!(region.length, 5);
        assert_eq!(region.windows.len(), 4);
        assert_eq!(region.avg_conservation, 1.0);
    }

    #[test]
    fn mismatch_splits_regions() {
        // symbols 1 1 1 | 64 | 1 1 1 against all ones
        let a = "AAAAAAAAACCCAAAAAAAAA";
        let b = "AAA".repeat(7);
        let r = find_conserved_regions(&[a, b.as_str()], 3, 1.0, S1).unwrap();
        assert_eq!(r.total_regions, 2);
        assert_eq!(r.conserved_regions[0].end_position, 3);
        assert_eq!(r.conserved_regions[1].start_position, 5);
        assert_eq!(r.conserved_regions[1].windows[0].symbols[0], vec![1, 1, 1]);
    }

    #[test]
    fn lower_threshold_bridges_gap() {
        let a = "AAAAAAAAACCCAAAAAAAAA";
        let b = "AAA".repeat(7);
        let r = find_conserved_regions(&[a, b.as_str()], 3, 0.6, S1).unwrap();
        assert_eq!(r.total_regions, 1);
        assert_eq!(r.conserved_regions[0].length, 7);
        assert_eq!(r.conserved_regions[0].max_conservation, 1.0);
    }

    #[test]
    fn shortest_sequence_bounds_the_scan() {
        let r = find_conserved_regions(&["ATGATGATG", "ATGATG"], 2, 1.0, S1).unwrap();
        assert_eq!(r.min_length, 2);
        assert_eq!(r.total_regions, 1);
        assert_eq!(r.conserved_regions[0].start_position, 1);
        assert_eq!(r.conserved_regions[0].end_position, 2);
        assert_eq!(r.conserved_regions[0].windows[0].symbols[0], vec![25, 25]);

        assert_eq!(
            find_conserved_regions(&["ATGATGATG", "ATGATG"], 3, 0.8, S1),
            Err(AnalysisError::WindowTooLarge {
                window: 3,
                length: 2
            })
        );
    }

    #[test]
    fn parameter_errors() {
        let seqs = ["ATGATG", "ATGATG"];
        assert!(find_conserved_regions(&seqs, 0, 0.8, S1).is_err());
        assert!(find_conserved_regions(&seqs, 2, 1.5, S1).is_err());
        assert!(find_conserved_regions(&seqs, 2, f64::NAN, S1).is_err());
        assert_eq!(
            find_conserved_regions(&seqs, 3, 0.8, S1),
            Err(AnalysisError::WindowTooLarge {
                window: 3,
                length: 2
            })
        );
        let none: [&str; 0] = [];
        assert!(find_conserved_regions(&none, 3, 0.8, S1).is_err());
    }
}
