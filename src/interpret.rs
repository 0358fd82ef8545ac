//! Interpretation text for a symbol.
//!
//! Text generation backed by an external service plugs in through the
//! [`Interpreter`] trait. [`TemplateInterpreter`] fills a fixed template from
//! the reference table and needs no network access.

use crate::hexagram::{self, Trigram};
use crate::symbol::Symbol;
use anyhow::Context;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Interpretation {
    pub symbol: Symbol,
    pub king_wen: u8,
    pub name: String,
    pub english: String,
    pub traditional_meaning: String,
    pub structure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub keywords: Vec<String>,
    /// which interpreter produced the text
    pub source: String,
}

pub trait Interpreter {
    /// Produces the interpretation of `symbol`, optionally steered by a
    /// free-text `context` such as the gene or organism under study.
    fn generate_interpretation(
        &self,
        symbol: Symbol,
        context: Option<&str>,
    ) -> anyhow::Result<Interpretation>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateInterpreter;

fn keywords(lower: Trigram, upper: Trigram) -> Vec<String> {
    let mut words = vec![lower.image().to_string()];
    if upper != lower {
        words.push(upper.image().to_string());
    }
    words.push(if lower == upper { "doubling" } else { "meeting" }.to_string());
    words
}

impl Interpreter for TemplateInterpreter {
    fn generate_interpretation(
        &self,
        symbol: Symbol,
        context: Option<&str>,
    ) -> anyhow::Result<Interpretation> {
        let h = hexagram::lookup(symbol)
            .with_context(|| format!("no reference entry for symbol {symbol}"))?;

        let structure = format!(
            "{} over {}: lines {} read bottom to top",
            h.upper.image(),
            h.lower.image(),
            h.lines.iter().map(|l| l.to_string()).collect::<String>()
        );

        Ok(Interpretation {
            symbol,
            king_wen: h.king_wen,
            name: h.name.to_string(),
            english: h.english.to_string(),
            traditional_meaning: format!(
                "Hexagram {} ({}, {}) pairs {} below with {} above.",
                h.king_wen,
                h.name,
                h.english,
                h.lower.image(),
                h.upper.image()
            ),
            structure,
            context: context.map(str::to_string),
            keywords: keywords(h.lower, h.upper),
            source: "template".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned;

    impl Interpreter for Canned {
        fn generate_interpretation(
            &self,
            symbol: Symbol,
            context: Option<&str>,
        ) -> anyhow::Result<Interpretation> {
            anyhow::ensure!(context.is_some(), "context required");
            let mut i = TemplateInterpreter.generate_interpretation(symbol, context)?;
            i.source = "canned".to_string();
            Ok(i)
        }
    }

    #[test]
    fn template_for_creative() {
        // symbol 64 is all solid lines
        let i = TemplateInterpreter.generate_interpretation(64, None).unwrap();
        assert_eq!(i.king_wen, 1);
        assert_eq!(i.english, "The Creative");
        assert_eq!(i.keywords, vec!["heaven", "doubling"]);
        assert!(i.structure.contains("111111"));
        assert!(i.context.is_none());
    }

    #[test]
    fn out_of_range_symbol() {
        assert!(TemplateInterpreter.generate_interpretation(0, None).is_err());
        assert!(TemplateInterpreter.generate_interpretation(65, None).is_err());
    }

    #[test]
    fn trait_object_seam() {
        let interpreters: Vec<Box<dyn Interpreter>> = vec![Box::new(TemplateInterpreter), Box::new(Canned)];
        let sources: Vec<String> = interpreters
            .iter()
            .map(|i| i.generate_interpretation(12, Some("p53")).unwrap().source)
            .collect();
        assert_eq!(sources, vec!["template", "canned"]);
        assert!(Canned.generate_interpretation(12, None).is_err());
    }
}
