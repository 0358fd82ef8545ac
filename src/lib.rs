//! Maps codons onto six-line symbols numbered 1 to 64 and analyses the
//! resulting symbol sequences.
//!
//! Each nucleotide contributes two lines to a codon's symbol under one of
//! four [`scheme::MappingScheme`]s. Translation is in [`translate`]; the
//! single-sequence and multi-sequence statistics live in [`pattern`] and
//! [`compare`], and [`report`] and [`export`] turn any result into JSON, CSV,
//! FASTA or chart data.
#[macro_use]
extern crate log;

pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod hexagram;
pub mod interpret;
pub mod io;
pub mod pattern;
pub mod report;
pub mod scheme;
pub mod seq;
pub mod stats;
pub mod symbol;
pub mod translate;

pub use error::{AnalysisError, Result};
pub use scheme::MappingScheme;
pub use symbol::{Symbol, SENTINEL};
pub use translate::{analyze_sequence, translate_sequence};
