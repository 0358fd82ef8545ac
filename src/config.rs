use crate::compare::MAX_NUCLEOTIDES;
use crate::export::ExportOptions;
use crate::scheme::MappingScheme;
use crate::symbol::NuclearRule;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 3_000_000;

/// Run-wide defaults, read from a JSON file. Every field is optional in the
/// file; command-line flags take precedence over what is set here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub scheme: MappingScheme,
    pub nuclear_rule: NuclearRule,
    /// longest input sequence accepted, in nucleotides
    pub max_sequence_length: usize,
    pub export: ExportOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            scheme: MappingScheme::default(),
            nuclear_rule: NuclearRule::default(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            export: ExportOptions::default(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when no path is
    /// given.
    ///
    /// # Errors
    ///
    /// The file cannot be opened or parsed, or `max_sequence_length` is zero
    /// or above what the comparative analyzer accepts.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Settings> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let path = path.as_ref();

        let file = File::open(path)
            .with_context(|| format!("Unable to open settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Unable to parse settings file {}", path.display()))?;

        settings.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.max_sequence_length > 0,
            "max_sequence_length must be at least 1"
        );
        ensure!(
            self.max_sequence_length <= MAX_NUCLEOTIDES,
            "max_sequence_length may not exceed {MAX_NUCLEOTIDES}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::load(None::<&str>).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.scheme, MappingScheme::Scheme1);
        assert!(settings.export.pretty);
    }

    #[test]
    fn partial_file() {
        let file = write_settings(r#"{"scheme": "scheme_3", "export": {"pretty": false}}"#);
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.scheme, MappingScheme::Scheme3);
        assert!(!settings.export.pretty);
        assert!(settings.export.include_metadata);
        assert_eq!(settings.max_sequence_length, DEFAULT_MAX_SEQUENCE_LENGTH);
    }

    #[test]
    fn rejected_files() {
        let file = write_settings(r#"{"scheme": "scheme_9"}"#);
        assert!(Settings::load(Some(file.path())).is_err());

        let file = write_settings(r#"{"max_sequence_length": 0}"#);
        assert!(Settings::load(Some(file.path())).is_err());

        let file = write_settings(r#"{"colour": "blue"}"#);
        assert!(Settings::load(Some(file.path())).is_err());

        assert!(Settings::load(Some("does/not/exist.json")).is_err());
    }
}
