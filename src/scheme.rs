use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The built-in nucleotide to line mappings.
///
/// Each scheme classifies a nucleotide twice: a primary bit (the property the
/// scheme is named after) and a secondary bit separating the two bases that
/// share a primary bit. Together the two lines identify the base uniquely, so
/// the 64 codons cover all 64 six-line patterns.
#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MappingScheme {
    /// A/T = 0, G/C = 1; secondary: purine 0, pyrimidine 1
    #[default]
    #[value(name = "scheme_1")]
    #[serde(rename = "scheme_1")]
    Scheme1,

    /// A = 0, T = 1, G = 0, C = 1; secondary: weak 0, strong 1
    #[value(name = "scheme_2")]
    #[serde(rename = "scheme_2")]
    Scheme2,

    /// hydrogen bonds, 2 = 0 and 3 = 1; secondary: amino 0, keto 1
    #[value(name = "scheme_3")]
    #[serde(rename = "scheme_3")]
    Scheme3,

    /// molecular weight, A/C = 0 and G/T = 1; secondary: weak 0, strong 1
    #[value(name = "scheme_4")]
    #[serde(rename = "scheme_4")]
    Scheme4,
}

pub const ALL_SCHEMES: [MappingScheme; 4] = [
    MappingScheme::Scheme1,
    MappingScheme::Scheme2,
    MappingScheme::Scheme3,
    MappingScheme::Scheme4,
];

impl MappingScheme {
    pub fn name(&self) -> &'static str {
        match self {
            MappingScheme::Scheme1 => "scheme_1",
            MappingScheme::Scheme2 => "scheme_2",
            MappingScheme::Scheme3 => "scheme_3",
            MappingScheme::Scheme4 => "scheme_4",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MappingScheme::Scheme1 => "purine/pyrimidine based (A/T=0, G/C=1)",
            MappingScheme::Scheme2 => "AT/GC alternation (A=0, T=1, G=0, C=1)",
            MappingScheme::Scheme3 => "hydrogen bond count (2 bonds=0, 3 bonds=1)",
            MappingScheme::Scheme4 => "molecular weight based (A/C=0, G/T=1)",
        }
    }

    /// Returns the (primary, secondary) line pair for a nucleotide, or `None`
    /// for anything outside ACGTU. Lowercase input is accepted.
    pub fn lines_for(&self, base: u8) -> Option<(u8, u8)> {
        let base = match base.to_ascii_uppercase() {
            b'U' => b'T',
            b => b,
        };

        let pair = match (self, base) {
            (MappingScheme::Scheme1, b'A') => (0, 0),
            (MappingScheme::Scheme1, b'T') => (0, 1),
            (MappingScheme::Scheme1, b'G') => (1, 0),
            (MappingScheme::Scheme1, b'C') => (1, 1),

            (MappingScheme::Scheme2, b'A') => (0, 0),
            (MappingScheme::Scheme2, b'T') => (1, 0),
            (MappingScheme::Scheme2, b'G') => (0, 1),
            (MappingScheme::Scheme2, b'C') => (1, 1),

            (MappingScheme::Scheme3, b'A') => (0, 0),
            (MappingScheme::Scheme3, b'T') => (0, 1),
            (MappingScheme::Scheme3, b'G') => (1, 1),
            (MappingScheme::Scheme3, b'C') => (1, 0),

            (MappingScheme::Scheme4, b'A') => (0, 0),
            (MappingScheme::Scheme4, b'T') => (1, 0),
            (MappingScheme::Scheme4, b'G') => (1, 1),
            (MappingScheme::Scheme4, b'C') => (0, 1),

            _ => return None,
        };
        Some(pair)
    }

    /// The one-bit classification the scheme is named after.
    pub fn primary_bit(&self, base: u8) -> Option<u8> {
        self.lines_for(base).map(|(primary, _)| primary)
    }
}

impl fmt::Display for MappingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MappingScheme {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SCHEMES
            .iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| AnalysisError::UnknownScheme(s.to_string()))
    }
}
