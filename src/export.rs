//! Rendering reports as CSV, JSON, FASTA and chart series.

use crate::pattern::PositionReport;
use crate::report::Report;
use crate::symbol::{Symbol, SENTINEL};
use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const EXPORT_VERSION: &str = "1.0";
pub const FASTA_LINE_WIDTH: usize = 60;
const FASTA_PREVIEW: usize = 10;
const MAX_ID_LENGTH: usize = 30;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),

    #[error("failed to serialise report")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("exported text is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unknown export format `{0}`")]
    UnknownFormat(String),

    #[error("{format} export is not available for {analysis_type} reports")]
    Unsupported {
        format: ExportFormat,
        analysis_type: &'static str,
    },
}

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// The report as a JSON document
    #[default]
    Json,

    /// A metadata block followed by a table chosen by analysis type
    Csv,

    /// The nucleotide sequence annotated with its symbols (translations only)
    Fasta,

    /// Numeric series for a chart, as JSON
    Chart,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Fasta => "fasta",
            ExportFormat::Chart => "chart.json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Fasta => "fasta",
            ExportFormat::Chart => "chart",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "fasta" => Ok(ExportFormat::Fasta),
            "chart" | "image_data" => Ok(ExportFormat::Chart),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// symbol counts, most frequent first
    Bar,
    /// symbol share, most frequent first
    Pie,
    /// local entropy along the sequence
    Line,
    /// position × symbol counts
    Heatmap,
}

/// Options shared by every exporter; also the `export` block of the
/// settings file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExportOptions {
    pub pretty: bool,
    pub include_metadata: bool,
    /// chart drawn by the chart exporter; picked from the report if unset
    pub chart: Option<ChartKind>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            pretty: true,
            include_metadata: true,
            chart: None,
        }
    }
}

fn timestamp() -> String {
    Local::now().to_rfc3339()
}

fn join_symbols(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

fn csv_writer(buffer: &mut Vec<u8>) -> csv::Writer<&mut Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer)
}

fn frequency_table(report: &Report) -> Option<&BTreeMap<Symbol, usize>> {
    match report {
        Report::Translation(r) => Some(&r.stats.frequency),
        Report::Entropy(r) => Some(&r.distribution),
        _ => None,
    }
}

/// Renders a report as CSV.
///
/// With `include_metadata` a `# Metadata` block comes first, followed by a
/// blank line. The table depends on the report: translations list each
/// codon, position reports each position, motif reports each motif,
/// comparisons with an alignment each aligned pair, entropy reports the
/// symbol distribution. Anything else is written as `Key,Value` rows with
/// nested values JSON encoded.
pub fn to_csv(report: &Report, include_metadata: bool) -> Result<String, ExportError> {
    let mut buffer = Vec::new();

    if include_metadata {
        let mut writer = csv_writer(&mut buffer);
        writer.write_record(["# Metadata"])?;
        writer.write_record(["# Export Date".to_string(), timestamp()])?;
        writer.write_record(["# Analysis Type", report.analysis_type()])?;
        if let Some(length) = report.sequence_length() {
            writer.write_record(["# Sequence Length".to_string(), length.to_string()])?;
        }
        if let Some(count) = report.symbols_analysed() {
            writer.write_record(["# Symbols Analysed".to_string(), count.to_string()])?;
        }
        if let Some(count) = report.codon_count() {
            writer.write_record(["# Codon Count".to_string(), count.to_string()])?;
        }
        if let Some(scheme) = report.mapping_scheme() {
            writer.write_record(["# Mapping Scheme", scheme.name()])?;
        }
        writer.flush()?;
        drop(writer);
        buffer.push(b'\n');
    }

    let mut writer = csv_writer(&mut buffer);

    match report {
        Report::Translation(r) => {
            writer.write_record(["Position", "Codon", "Symbol", "Amino Acid"])?;
            let amino_acids: Vec<char> = r.amino_acids.chars().collect();
            for (i, &symbol) in r.symbols.iter().enumerate() {
                writer.write_record([
                    (i + 1).to_string(),
                    r.codons.get(i).cloned().unwrap_or_else(|| "N/A".to_string()),
                    if symbol == SENTINEL {
                        "Invalid".to_string()
                    } else {
                        symbol.to_string()
                    },
                    amino_acids
                        .get(i)
                        .map(char::to_string)
                        .unwrap_or_else(|| "N/A".to_string()),
                ])?;
            }
        }
        Report::Position(r) => {
            writer.write_record(["Position", "Symbol", "Frequency", "Bias"])?;
            for p in &r.positions {
                writer.write_record([
                    p.position.to_string(),
                    p.dominant_symbol.to_string(),
                    format!("{:.2}%", p.dominant_frequency * 100.0),
                    p.bias.to_string(),
                ])?;
            }
        }
        Report::Motif(r) => {
            writer.write_record(["Motif", "Length", "Occurrences", "Frequency", "Positions"])?;
            for m in &r.motifs {
                writer.write_record([
                    join_symbols(&m.motif),
                    m.length.to_string(),
                    m.occurrences.to_string(),
                    format!("{:.4}", m.frequency),
                    m.positions
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                ])?;
            }
        }
        Report::Comparison(r) if r.side_by_side.is_some() => {
            writer.write_record(["Position", "Sequence 1", "Sequence 2", "Match"])?;
            for pair in r.side_by_side.iter().flatten() {
                writer.write_record([
                    pair.position.to_string(),
                    pair.first.to_string(),
                    pair.second.to_string(),
                    if pair.is_match { "Yes" } else { "No" }.to_string(),
                ])?;
            }
        }
        _ => match frequency_table(report) {
            Some(frequency) => {
                writer.write_record(["Symbol", "Count", "Frequency"])?;
                let total: usize = frequency.values().sum();
                for (symbol, count) in frequency {
                    let share = if total > 0 {
                        *count as f64 / total as f64
                    } else {
                        0.0
                    };
                    writer.write_record([
                        symbol.to_string(),
                        count.to_string(),
                        format!("{share:.4}"),
                    ])?;
                }
            }
            _ => {
                writer.write_record(["Key", "Value"])?;
                if let Value::Object(map) = serde_json::to_value(report)? {
                    for (key, value) in map {
                        let value = match value {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        writer.write_record([key, value])?;
                    }
                }
            }
        },
    }

    writer.flush()?;
    drop(writer);
    Ok(String::from_utf8(buffer)?)
}

/// Renders a report as JSON, optionally with an `_export_metadata` block.
pub fn to_json(report: &Report, options: &ExportOptions) -> Result<String, ExportError> {
    let mut value = serde_json::to_value(report)?;
    if options.include_metadata {
        if let Value::Object(map) = &mut value {
            map.insert(
                "_export_metadata".to_string(),
                serde_json::json!({
                    "export_date": timestamp(),
                    "format": "json",
                    "version": EXPORT_VERSION,
                }),
            );
        }
    }

    let text = if options.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

fn wrap(text: &str, out: &mut String) {
    for line in text.as_bytes().chunks(FASTA_LINE_WIDTH) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
}

/// Writes a sequence as FASTA.
///
/// With `annotate` the header carries the first ten symbols and a second
/// record, `<name>_symbols`, holds the whole symbol string.
pub fn to_fasta(name: &str, sequence: &str, symbols: &[Symbol], annotate: bool) -> String {
    let mut out = format!(">{name}");
    if annotate {
        let preview = &symbols[..symbols.len().min(FASTA_PREVIEW)];
        out.push_str(" symbols=");
        out.push_str(&join_symbols(preview));
        if symbols.len() > FASTA_PREVIEW {
            out.push_str("...");
        }
    }
    out.push('\n');
    wrap(sequence, &mut out);

    if annotate {
        out.push_str(&format!(">{name}_symbols\n"));
        wrap(&join_symbols(symbols), &mut out);
    }
    out
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Bar {
        x: Vec<String>,
        y: Vec<usize>,
        name: String,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<usize>,
        name: String,
    },
    Line {
        x: Vec<usize>,
        y: Vec<f64>,
        name: String,
    },
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<usize>>,
    },
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    /// `None` when the report has nothing this chart can show
    pub data: Option<ChartData>,
}

impl ChartSpec {
    fn empty(kind: ChartKind) -> Self {
        ChartSpec {
            kind,
            width: 800,
            height: 600,
            title: String::new(),
            x_title: None,
            y_title: None,
            data: None,
        }
    }
}

/// The chart that best fits a report when none is asked for.
pub fn default_chart(report: &Report) -> ChartKind {
    match report {
        Report::Entropy(_) => ChartKind::Line,
        Report::Position(_) => ChartKind::Heatmap,
        _ => ChartKind::Bar,
    }
}

fn heatmap(report: &PositionReport) -> ChartData {
    let symbols: Vec<Symbol> = report
        .positions
        .iter()
        .flat_map(|p| p.counts.keys().copied())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    ChartData::Heatmap {
        x: symbols.iter().map(|s| s.to_string()).collect(),
        y: report.positions.iter().map(|p| p.position.to_string()).collect(),
        z: report
            .positions
            .iter()
            .map(|p| {
                symbols
                    .iter()
                    .map(|s| *p.counts.get(s).unwrap_or(&0))
                    .collect()
            })
            .collect(),
    }
}

/// Numeric series for a chart of the given kind.
pub fn chart_data(report: &Report, kind: ChartKind) -> ChartSpec {
    let mut spec = ChartSpec::empty(kind);

    match (kind, report) {
        (ChartKind::Bar | ChartKind::Pie, _) => {
            let Some(frequency) = frequency_table(report) else {
                return spec;
            };
            let mut sorted: Vec<(Symbol, usize)> =
                frequency.iter().map(|(&s, &c)| (s, c)).collect();
            sorted.sort_by(|a, b| b.1.cmp(&a.1));

            let labels = sorted.iter().map(|(s, _)| s.to_string()).collect();
            let counts = sorted.iter().map(|(_, c)| *c).collect();
            if kind == ChartKind::Bar {
                spec.title = "Symbol Frequency Distribution".to_string();
                spec.x_title = Some("Symbol".to_string());
                spec.y_title = Some("Count".to_string());
                spec.data = Some(ChartData::Bar {
                    x: labels,
                    y: counts,
                    name: "Symbol Frequency".to_string(),
                });
            } else {
                spec.title = "Symbol Distribution".to_string();
                spec.data = Some(ChartData::Pie {
                    labels,
                    values: counts,
                    name: "Symbol Distribution".to_string(),
                });
            }
        }
        (ChartKind::Line, Report::Entropy(r)) => {
            spec.title = "Position Entropy".to_string();
            spec.x_title = Some("Position".to_string());
            spec.y_title = Some("Entropy (nats)".to_string());
            spec.data = Some(ChartData::Line {
                x: r.local_entropies.iter().map(|e| e.position).collect(),
                y: r.local_entropies.iter().map(|e| e.entropy).collect(),
                name: "Entropy".to_string(),
            });
        }
        (ChartKind::Heatmap, Report::Position(r)) => {
            spec.title = "Position vs Symbol Heatmap".to_string();
            spec.x_title = Some("Symbol".to_string());
            spec.y_title = Some("Position".to_string());
            spec.data = Some(heatmap(r));
        }
        _ => {}
    }
    spec
}

/// Renders a report in the requested format.
pub fn export(
    report: &Report,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(report, options),
        ExportFormat::Csv => to_csv(report, options.include_metadata),
        ExportFormat::Fasta => match report {
            Report::Translation(r) => Ok(to_fasta(&r.name, &r.sequence, &r.symbols, true)),
            other => Err(ExportError::Unsupported {
                format,
                analysis_type: other.analysis_type(),
            }),
        },
        ExportFormat::Chart => {
            let kind = options.chart.unwrap_or_else(|| default_chart(report));
            let spec = chart_data(report, kind);
            let text = if options.pretty {
                serde_json::to_string_pretty(&spec)?
            } else {
                serde_json::to_string(&spec)?
            };
            Ok(text)
        }
    }
}

/// A timestamped file name, `<type>[_<id>]_<YYYYmmdd_HHMMSS>.<ext>`.
///
/// The identifier is cut to 30 characters and anything outside
/// `[A-Za-z0-9_-]` becomes `_`.
pub fn export_filename(analysis_type: &str, extension: &str, id: Option<&str>) -> String {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    match id {
        Some(id) => {
            let safe: String = id
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                        c
                    } else {
                        '_'
                    }
                })
                .take(MAX_ID_LENGTH)
                .collect();
            format!("{analysis_type}_{safe}_{stamp}.{extension}")
        }
        None => format!("{analysis_type}_{stamp}.{extension}"),
    }
}

/// Exports one report to several formats, keyed by `<base>.<format>`.
///
/// Unknown formats are skipped with a warning; a format that fails is
/// logged and stored as an `Error: ...` entry.
pub fn batch_export(
    report: &Report,
    formats: &[&str],
    base: &str,
    options: &ExportOptions,
) -> IndexMap<String, String> {
    let mut exports = IndexMap::new();

    for name in formats {
        let format = match name.parse::<ExportFormat>() {
            Ok(f) => f,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        let file = format!("{base}.{}", format.extension());
        match export(report, format, options) {
            Ok(text) => {
                exports.insert(file, text);
            }
            Err(e) => {
                error!("Error exporting to {format}: {e}");
                exports.insert(file, format!("Error: {e}"));
            }
        }
    }
    exports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::MappingScheme;
    use crate::{compare, pattern, translate};

    fn translation() -> Report {
        translate::analyze_sequence("ATGAAACCCNNN", "demo", MappingScheme::Scheme1).into()
    }

    #[test]
    fn csv_translation_table() {
        let csv = to_csv(&translation(), true).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "# Metadata");
        assert!(lines[1].starts_with("# Export Date,"));
        assert_eq!(lines[2], "# Analysis Type,translation");
        assert_eq!(lines[3], "# Sequence Length,12");
        assert_eq!(lines[4], "# Codon Count,4");
        assert_eq!(lines[5], "# Mapping Scheme,scheme_1");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Position,Codon,Symbol,Amino Acid");
        assert_eq!(lines[8], "1,ATG,25,M");
        assert_eq!(lines[11], "4,NNN,1,X");
    }

    #[test]
    fn csv_without_metadata() {
        let report: Report = pattern::discover_motifs(&[1, 2, 1, 2, 1, 2], &[2], 3, 5).into();
        let csv = to_csv(&report, false).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Motif,Length,Occurrences,Frequency,Positions"));
        assert_eq!(lines.next(), Some("1-2,2,3,0.5000,\"1, 3, 5\""));
    }

    #[test]
    fn csv_alignment_and_fallback() {
        let report: Report =
            compare::compare_sequences("AAACCC", "AAAGGG", MappingScheme::Scheme1, true).into();
        let csv = to_csv(&report, false).unwrap();
        assert!(csv.starts_with("Position,Sequence 1,Sequence 2,Match\n1,1,1,Yes\n2,64,22,No"));

        let report: Report = pattern::detect_runs(&[3, 3, 3], 2).into();
        let csv = to_csv(&report, false).unwrap();
        assert!(csv.starts_with("Key,Value\n"));
        assert!(csv.contains("analysis_type,runs"));
        assert!(csv.contains("total_runs,1"));
    }

    #[test]
    fn csv_frequency_table() {
        let report: Report = pattern::calculate_position_entropy(&[5, 5, 7, 7], 2).into();
        let csv = to_csv(&report, false).unwrap();
        assert_eq!(csv, "Symbol,Count,Frequency\n5,2,0.5000\n7,2,0.5000\n");
    }

    #[test]
    fn csv_metadata_names_symbol_counts() {
        let report: Report = pattern::calculate_position_entropy(&[5, 0, 5, 7, 7], 2).into();
        let csv = to_csv(&report, true).unwrap();
        assert!(csv.contains("# Symbols Analysed,4\n"));
        assert!(!csv.contains("# Sequence Length"));
    }

    #[test]
    fn json_metadata() {
        let report = translation();
        let options = ExportOptions::default();
        let value: Value = serde_json::from_str(&to_json(&report, &options).unwrap()).unwrap();
        assert_eq!(value["_export_metadata"]["version"], "1.0");
        assert_eq!(value["analysis_type"], "translation");

        let compact = ExportOptions {
            pretty: false,
            include_metadata: false,
            chart: None,
        };
        let text = to_json(&report, &compact).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("_export_metadata"));
    }

    #[test]
    fn fasta_records() {
        let sequence = "A".repeat(75);
        let symbols = vec![1; 25];
        let fasta = to_fasta("seq", &sequence, &symbols, true);
        let lines: Vec<&str> = fasta.lines().collect();

        assert_eq!(lines[0], ">seq symbols=1-1-1-1-1-1-1-1-1-1...");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2].len(), 15);
        assert_eq!(lines[3], ">seq_symbols");
        // 25 ones joined by dashes is 49 characters
        assert_eq!(lines[4].len(), 49);

        assert_eq!(to_fasta("s", "ACG", &[2], false), ">s\nACG\n");
    }

    #[test]
    fn fasta_needs_a_translation() {
        let report: Report = pattern::detect_runs(&[3, 3, 3], 2).into();
        let options = ExportOptions::default();
        assert!(matches!(
            export(&report, ExportFormat::Fasta, &options),
            Err(ExportError::Unsupported { .. })
        ));
    }

    #[test]
    fn bar_chart_sorted_by_count() {
        let report: Report =
            translate::analyze_sequence("CCCAAACCC", "x", MappingScheme::Scheme1).into();
        let spec = chart_data(&report, ChartKind::Bar);
        assert_eq!(
            spec.data,
            Some(ChartData::Bar {
                x: vec!["64".to_string(), "1".to_string()],
                y: vec![2, 1],
                name: "Symbol Frequency".to_string(),
            })
        );
        assert_eq!(chart_data(&report, ChartKind::Line).data, None);
    }

    #[test]
    fn heatmap_rows_follow_positions() {
        let report: Report =
            pattern::analyze_position_patterns(&[4, 9, 4], Some(&[1, 2, 1][..])).into();
        let spec = chart_data(&report, default_chart(&report));
        assert_eq!(spec.kind, ChartKind::Heatmap);
        match spec.data {
            Some(ChartData::Heatmap { x, y, z }) => {
                assert_eq!(x, vec!["4", "9"]);
                assert_eq!(y, vec!["1", "2"]);
                assert_eq!(z, vec![vec![2, 0], vec![0, 1]]);
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }

    #[test]
    fn filenames() {
        let name = export_filename("motif", "csv", Some("chr1:100-200 (fwd)"));
        assert!(name.starts_with("motif_chr1_100-200__fwd__"));
        assert!(name.ends_with(".csv"));

        let long = "x".repeat(50);
        let name = export_filename("runs", "json", Some(&long));
        assert!(name.starts_with(&format!("runs_{}_", "x".repeat(30))));
        assert!(!name.contains(&"x".repeat(31)));

        let name = export_filename("entropy", "json", None);
        // entropy_YYYYmmdd_HHMMSS.json
        assert_eq!(name.len(), "entropy_".len() + 15 + ".json".len());
    }

    #[test]
    fn batch() {
        let report = translation();
        let exports = batch_export(
            &report,
            &["csv", "json", "pdf", "fasta"],
            "out",
            &ExportOptions::default(),
        );
        let keys: Vec<&String> = exports.keys().collect();
        assert_eq!(keys, vec!["out.csv", "out.json", "out.fasta"]);

        let runs: Report = pattern::detect_runs(&[3, 3, 3], 2).into();
        let exports = batch_export(&runs, &["fasta"], "out", &ExportOptions::default());
        assert!(exports["out.fasta"].starts_with("Error: fasta export"));
    }
}
