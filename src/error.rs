use serde::Serialize;
use thiserror::Error;

/// Every way an analysis can refuse its input.
///
/// None of these are raised for unmappable nucleotides: translation is a total
/// function and unknown characters are silently mapped to `0` lines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("empty sequence provided")]
    EmptySequence,

    #[error("no valid symbols in sequence")]
    NoValidSymbols,

    #[error("window size {window} exceeds sequence length {length}")]
    WindowTooLarge { window: usize, length: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("number of names ({names}) must match number of sequences ({sequences})")]
    NameCountMismatch { names: usize, sequences: usize },

    #[error("{what} has length {found}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("sequence too short for autocorrelation with lag {lag} ({length} valid symbols)")]
    InsufficientLength { lag: usize, length: usize },

    #[error("at least {required} sequences are required, got {found}")]
    TooFewSequences { required: usize, found: usize },

    #[error("input of length {length} exceeds the limit of {limit}")]
    InputTooLarge { length: usize, limit: usize },

    #[error("invalid codon `{0}`: a codon has exactly three nucleotides")]
    InvalidCodon(String),

    #[error("invalid symbol {0}: symbols are numbered 1 to 64")]
    InvalidSymbol(u8),

    #[error("invalid bit pattern `{0}`: expected six characters of 0 or 1")]
    InvalidBits(String),

    #[error("unknown mapping scheme `{0}` (expected scheme_1, scheme_2, scheme_3 or scheme_4)")]
    UnknownScheme(String),

    #[error("unknown test type `{0}` (expected chi_square, fisher_exact or ks_test)")]
    UnknownTest(String),

    #[error("{error}")]
    Numerical { error: String, note: String },
}

impl AnalysisError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn numerical(error: impl Into<String>, note: impl Into<String>) -> Self {
        AnalysisError::Numerical {
            error: error.into(),
            note: note.into(),
        }
    }

    /// Extra context attached to numerical failures.
    pub fn note(&self) -> Option<&str> {
        match self {
            AnalysisError::Numerical { note, .. } => Some(note),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// The serialisable face of an [`AnalysisError`], written in place of a
/// report's data.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ErrorReport {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&AnalysisError> for ErrorReport {
    fn from(e: &AnalysisError) -> Self {
        ErrorReport {
            error: e.to_string(),
            note: e.note().map(str::to_string),
        }
    }
}

impl From<AnalysisError> for ErrorReport {
    fn from(e: AnalysisError) -> Self {
        ErrorReport::from(&e)
    }
}
