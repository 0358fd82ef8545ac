//! A single tagged type for everything the analyzers produce.
//!
//! Every operation result, success or failure, converts into a [`Report`].
//! Serialised, a report is a JSON object whose `analysis_type` names the
//! operation; a failed operation serialises as `{"analysis_type": "error",
//! "error": ..., "note": ...}` so consumers can check for the `error` key
//! before reading any data.

use crate::compare::{
    ComparisonReport, ConservedRegionsReport, MultiComparisonReport, SchemeComparisonReport,
    StatisticalTestReport,
};
use crate::error::{AnalysisError, ErrorReport, Result};
use crate::hexagram::{self, Hexagram};
use crate::interpret::Interpretation;
use crate::pattern::{
    ConservationReport, CorrelationReport, EntropyReport, MotifReport, PositionReport, RunReport,
    WindowReport,
};
use crate::scheme::MappingScheme;
use crate::symbol::{self, Bits, NuclearRule, Symbol};
use crate::translate::TranslationReport;
use serde::Serialize;

/// A single codon and where it lands.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CodonReport {
    pub codon: String,
    pub mapping_scheme: MappingScheme,
    pub bits: Bits,
    pub symbol: Symbol,
    pub hexagram: &'static Hexagram,
}

pub fn describe_codon(codon: &str, scheme: MappingScheme) -> Result<CodonReport> {
    let symbol = symbol::translate_codon(codon, scheme)?;
    let hexagram = hexagram::lookup(symbol).ok_or(AnalysisError::InvalidSymbol(symbol))?;
    Ok(CodonReport {
        codon: crate::seq::normalize(codon),
        mapping_scheme: scheme,
        bits: hexagram.bits,
        symbol,
        hexagram,
    })
}

/// A symbol with its reference entry and derived symbols.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SymbolReport {
    pub symbol: Symbol,
    pub hexagram: &'static Hexagram,
    pub complement: Symbol,
    pub nuclear: Symbol,
    pub nuclear_rule: NuclearRule,
}

pub fn describe_symbol(symbol: Symbol, rule: NuclearRule) -> Result<SymbolReport> {
    let hexagram = hexagram::lookup(symbol).ok_or(AnalysisError::InvalidSymbol(symbol))?;
    Ok(SymbolReport {
        symbol,
        hexagram,
        complement: symbol::complement(symbol)?,
        nuclear: symbol::nuclear(symbol, rule)?,
        nuclear_rule: rule,
    })
}

#[derive(Serialize, Clone, Debug)]
#[serde(tag = "analysis_type", rename_all = "snake_case")]
pub enum Report {
    Translation(TranslationReport),
    Codon(CodonReport),
    Symbol(SymbolReport),
    Position(PositionReport),
    SlidingWindow(WindowReport),
    Motif(MotifReport),
    Conservation(ConservationReport),
    Entropy(EntropyReport),
    Runs(RunReport),
    Correlation(CorrelationReport),
    Comparison(ComparisonReport),
    SchemeComparison(SchemeComparisonReport),
    StatisticalTest(StatisticalTestReport),
    MultiComparison(MultiComparisonReport),
    ConservedRegions(ConservedRegionsReport),
    Interpretation(Interpretation),
    Error(ErrorReport),
}

macro_rules! report_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Report {
                fn from(r: $ty) -> Self {
                    Report::$variant(r)
                }
            }
        )*
    };
}

report_from!(
    Translation(TranslationReport),
    Codon(CodonReport),
    Symbol(SymbolReport),
    Position(PositionReport),
    SlidingWindow(WindowReport),
    Motif(MotifReport),
    Conservation(ConservationReport),
    Entropy(EntropyReport),
    Runs(RunReport),
    Correlation(CorrelationReport),
    Comparison(ComparisonReport),
    SchemeComparison(SchemeComparisonReport),
    StatisticalTest(StatisticalTestReport),
    MultiComparison(MultiComparisonReport),
    ConservedRegions(ConservedRegionsReport),
    Interpretation(Interpretation),
    Error(ErrorReport),
);

impl From<AnalysisError> for Report {
    fn from(e: AnalysisError) -> Self {
        Report::Error(e.into())
    }
}

impl<T: Into<Report>> From<Result<T>> for Report {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(r) => r.into(),
            Err(e) => e.into(),
        }
    }
}

impl Report {
    /// The `analysis_type` tag, also used when naming export files.
    pub fn analysis_type(&self) -> &'static str {
        match self {
            Report::Translation(_) => "translation",
            Report::Codon(_) => "codon",
            Report::Symbol(_) => "symbol",
            Report::Position(_) => "position",
            Report::SlidingWindow(_) => "sliding_window",
            Report::Motif(_) => "motif",
            Report::Conservation(_) => "conservation",
            Report::Entropy(_) => "entropy",
            Report::Runs(_) => "runs",
            Report::Correlation(_) => "correlation",
            Report::Comparison(_) => "comparison",
            Report::SchemeComparison(_) => "scheme_comparison",
            Report::StatisticalTest(_) => "statistical_test",
            Report::MultiComparison(_) => "multi_comparison",
            Report::ConservedRegions(_) => "conserved_regions",
            Report::Interpretation(_) => "interpretation",
            Report::Error(_) => "error",
        }
    }

    /// True for an error report and for a statistical test that could not
    /// be computed.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    pub fn error(&self) -> Option<&ErrorReport> {
        match self {
            Report::Error(e) => Some(e),
            Report::StatisticalTest(StatisticalTestReport {
                outcome: crate::compare::significance::TestOutcome::Failed(e),
                ..
            }) => Some(e),
            _ => None,
        }
    }

    /// Raw nucleotide length, where the report knows it.
    pub fn sequence_length(&self) -> Option<usize> {
        match self {
            Report::Translation(r) => Some(r.length),
            Report::SchemeComparison(r) => Some(r.sequence_length),
            _ => None,
        }
    }

    /// Number of valid symbols a symbol-level analysis ran over.
    pub fn symbols_analysed(&self) -> Option<usize> {
        match self {
            Report::Motif(r) => Some(r.sequence_length),
            Report::Entropy(r) => Some(r.sequence_length),
            Report::Correlation(r) => Some(r.sequence_length),
            _ => None,
        }
    }

    pub fn codon_count(&self) -> Option<usize> {
        match self {
            Report::Translation(r) => Some(r.codon_count),
            _ => None,
        }
    }

    pub fn mapping_scheme(&self) -> Option<MappingScheme> {
        match self {
            Report::Translation(r) => Some(r.mapping_scheme),
            Report::Codon(r) => Some(r.mapping_scheme),
            Report::Comparison(r) => Some(r.mapping_scheme),
            Report::StatisticalTest(r) => Some(r.mapping_scheme),
            Report::MultiComparison(r) => Some(r.mapping_scheme),
            _ => None,
        }
    }

    /// The summary record for a pattern analysis; `None` for other reports.
    pub fn pattern_record(&self) -> Option<PatternRecord> {
        match self {
            Report::Position(r) => Some(r.pattern_record()),
            Report::SlidingWindow(r) => Some(r.pattern_record()),
            Report::Motif(r) => Some(r.pattern_record()),
            Report::Conservation(r) => Some(r.pattern_record()),
            Report::Entropy(r) => Some(r.pattern_record()),
            Report::Runs(r) => Some(r.pattern_record()),
            Report::Correlation(r) => Some(r.pattern_record()),
            _ => None,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    PositionSpecific,
    SlidingWindow,
    Motif,
    Conservation,
    Entropy,
    Run,
    Correlation,
}

/// Condensed, storable summary of one pattern analysis.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PatternRecord {
    pub pattern_type: PatternType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motif_length: Option<usize>,
    pub frequency: usize,
    /// always within `[0, 1]`, higher is more notable
    pub significance_score: f64,
    pub positions: Vec<usize>,
    pub description: String,
}

impl PatternRecord {
    fn new(pattern_type: PatternType, frequency: usize, score: f64, description: String) -> Self {
        PatternRecord {
            pattern_type,
            window_size: None,
            motif_length: None,
            frequency,
            significance_score: score.clamp(0.0, 1.0),
            positions: Vec::new(),
            description,
        }
    }
}

pub trait PatternSource {
    fn pattern_record(&self) -> PatternRecord;
}

impl PatternSource for PositionReport {
    fn pattern_record(&self) -> PatternRecord {
        let mut record = PatternRecord::new(
            PatternType::PositionSpecific,
            1,
            self.average_bias / 10.0,
            format!("Position analysis of {} positions", self.positions.len()),
        );
        record.positions = self.high_bias_positions.iter().map(|p| p.position).collect();
        record
    }
}

impl PatternSource for WindowReport {
    fn pattern_record(&self) -> PatternRecord {
        let mut record = PatternRecord::new(
            PatternType::SlidingWindow,
            self.unique_patterns,
            self.pattern_entropy / 5.0,
            format!("Sliding window analysis (size={})", self.window_size),
        );
        record.window_size = Some(self.window_size);
        record.positions = self.window_start_positions.clone();
        record
    }
}

impl PatternSource for MotifReport {
    fn pattern_record(&self) -> PatternRecord {
        let mut record = PatternRecord::new(
            PatternType::Motif,
            self.motifs_found,
            self.motif_coverage_ratio,
            format!("Motif discovery: {} motifs found", self.motifs_found),
        );
        if let [length] = self.motif_lengths_searched[..] {
            record.motif_length = Some(length);
        }
        if let Some(top) = self.motifs.first() {
            record.positions = top.positions.clone();
        }
        record
    }
}

impl PatternSource for ConservationReport {
    fn pattern_record(&self) -> PatternRecord {
        let mut record = PatternRecord::new(
            PatternType::Conservation,
            self.num_sequences,
            self.average_conservation,
            format!("Conservation analysis of {} sequences", self.num_sequences),
        );
        record.positions = self.highly_conserved_positions.clone();
        record
    }
}

impl PatternSource for EntropyReport {
    fn pattern_record(&self) -> PatternRecord {
        let mut record = PatternRecord::new(
            PatternType::Entropy,
            1,
            self.complexity_score,
            format!("Entropy analysis (complexity: {:.2})", self.complexity_score),
        );
        record.window_size = Some(self.window_size);
        record.positions = self.high_entropy_regions.iter().map(|e| e.position).collect();
        record
    }
}

impl PatternSource for RunReport {
    fn pattern_record(&self) -> PatternRecord {
        let mut record = PatternRecord::new(
            PatternType::Run,
            self.total_runs,
            self.total_runs as f64 / 10.0,
            format!("Run detection: {} runs found", self.total_runs),
        );
        record.positions = self.runs.iter().map(|r| r.start_position).collect();
        record
    }
}

impl PatternSource for CorrelationReport {
    fn pattern_record(&self) -> PatternRecord {
        PatternRecord::new(
            PatternType::Correlation,
            1,
            self.correlation.abs(),
            format!("Correlation analysis (lag={}): {}", self.lag, self.interpretation),
        )
    }
}
