//! Codon to symbol encoding.
//!
//! A codon becomes six binary lines (two per nucleotide, see
//! [`MappingScheme`]), and the six lines become a symbol number between 1 and
//! 64. The line read from the last codon position is the most significant,
//! so `symbol = value(reverse(bits)) + 1`.

use crate::error::{AnalysisError, Result};
use crate::scheme::MappingScheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Symbol = u8;

/// Marks a codon which could not be translated. Never produced by the binary
/// schemes, but every analysis filters it out before computing statistics.
pub const SENTINEL: Symbol = 0;

pub const SYMBOL_COUNT: usize = 64;

#[inline(always)]
pub fn is_valid(symbol: Symbol) -> bool {
    (1..=SYMBOL_COUNT as u8).contains(&symbol)
}

/// Six binary lines in codon order: index 0 is the primary line of the first
/// nucleotide, index 5 the secondary line of the last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bits(pub [u8; 6]);

impl Bits {
    /// Builds the pattern whose reversed reading equals `value` (0..64).
    pub fn from_value(value: u8) -> Self {
        let mut bits = [0u8; 6];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = (value >> i) & 1;
        }
        Bits(bits)
    }

    pub fn value(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, b)| acc | ((b & 1) << i))
    }

    /// Lines from bottom to top. The last codon position is the bottom line.
    pub fn lines(&self) -> [u8; 6] {
        let mut lines = self.0;
        lines.reverse();
        lines
    }

    pub fn from_lines(lines: [u8; 6]) -> Self {
        let mut bits = lines;
        bits.reverse();
        Bits(bits)
    }

    pub fn inverted(&self) -> Self {
        Bits(self.0.map(|b| 1 - (b & 1)))
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", b & 1)?;
        }
        Ok(())
    }
}

impl FromStr for Bits {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 6 {
            return Err(AnalysisError::InvalidBits(s.to_string()));
        }

        let mut bits = [0u8; 6];
        for (slot, c) in bits.iter_mut().zip(s.bytes()) {
            *slot = match c {
                b'0' => 0,
                b'1' => 1,
                _ => return Err(AnalysisError::InvalidBits(s.to_string())),
            };
        }
        Ok(Bits(bits))
    }
}

impl Serialize for Bits {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bits {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts a codon to its six lines. Characters outside ACGTU contribute
/// `00`; missing positions of a short codon are also `0`.
pub fn codon_to_bits<C: AsRef<[u8]>>(codon: C, scheme: MappingScheme) -> Bits {
    let mut bits = [0u8; 6];
    for (i, base) in codon.as_ref().iter().take(3).enumerate() {
        let (primary, secondary) = scheme.lines_for(*base).unwrap_or((0, 0));
        bits[2 * i] = primary;
        bits[2 * i + 1] = secondary;
    }
    Bits(bits)
}

pub fn bits_to_symbol(bits: &Bits) -> Symbol {
    bits.value() + 1
}

pub fn symbol_to_bits(symbol: Symbol) -> Result<Bits> {
    if !is_valid(symbol) {
        return Err(AnalysisError::InvalidSymbol(symbol));
    }
    Ok(Bits::from_value(symbol - 1))
}

/// Maps a single codon to its symbol. The codon must be exactly three
/// nucleotides once whitespace is removed.
pub fn translate_codon(codon: &str, scheme: MappingScheme) -> Result<Symbol> {
    let codon = crate::seq::normalize(codon);
    if codon.len() != 3 {
        return Err(AnalysisError::InvalidCodon(codon));
    }
    Ok(bits_to_symbol(&codon_to_bits(&codon, scheme)))
}

/// The symbol with every line inverted.
pub fn complement(symbol: Symbol) -> Result<Symbol> {
    let bits = symbol_to_bits(symbol)?;
    Ok(bits_to_symbol(&bits.inverted()))
}

/// How the nuclear figure is spliced out of the inner four lines.
#[derive(clap::ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NuclearRule {
    /// lower trigram from lines 2-4, upper trigram from lines 3-5
    #[default]
    Interlocking,

    /// outer lines kept, inner four lines re-sliced in place
    Literal,
}

/// Derives the nuclear symbol from lines 2 to 5 (counted from the bottom).
pub fn nuclear(symbol: Symbol, rule: NuclearRule) -> Result<Symbol> {
    let l = symbol_to_bits(symbol)?.lines();

    let lines = match rule {
        NuclearRule::Interlocking => [l[1], l[2], l[3], l[2], l[3], l[4]],
        NuclearRule::Literal => {
            let inner = [l[1], l[2], l[3], l[4]];
            [l[0], inner[0], inner[1], inner[2], inner[3], l[5]]
        }
    };

    Ok(bits_to_symbol(&Bits::from_lines(lines)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::ALL_SCHEMES;
    use std::collections::HashSet;

    #[test]
    fn bits_symbol_bijection() {
        let mut seen = HashSet::new();
        for value in 0..64u8 {
            let bits = Bits::from_value(value);
            let symbol = bits_to_symbol(&bits);
            assert!(is_valid(symbol));
            assert!(seen.insert(symbol));
            assert_eq!(symbol_to_bits(symbol).unwrap(), bits);
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn reversed_reading() {
        // the last character is the most significant
        let bits: Bits = "000001".parse().unwrap();
        assert_eq!(bits_to_symbol(&bits), 33);
        let bits: Bits = "100000".parse().unwrap();
        assert_eq!(bits_to_symbol(&bits), 2);
        assert_eq!(bits_to_symbol(&"000000".parse().unwrap()), 1);
        assert_eq!(bits_to_symbol(&"111111".parse().unwrap()), 64);
    }

    #[test]
    fn parse_and_display() {
        let bits: Bits = "010011".parse().unwrap();
        assert_eq!(bits.to_string(), "010011");
        assert_eq!(bits.lines(), [1, 1, 0, 0, 1, 0]);
        assert_eq!(Bits::from_lines(bits.lines()), bits);

        assert!("01001".parse::<Bits>().is_err());
        assert!("01002x".parse::<Bits>().is_err());
    }

    #[test]
    fn codon_bits_scheme_1() {
        let s = MappingScheme::Scheme1;
        assert_eq!(codon_to_bits("AAA", s).to_string(), "000000");
        assert_eq!(codon_to_bits("CCC", s).to_string(), "111111");
        assert_eq!(codon_to_bits("ATG", s).to_string(), "000110");
        assert_eq!(codon_to_bits("atg", s).to_string(), "000110");
        assert_eq!(codon_to_bits("AUG", s).to_string(), "000110");
    }

    #[test]
    fn unknown_characters_default_to_zero() {
        let s = MappingScheme::Scheme1;
        assert_eq!(codon_to_bits("NNN", s).to_string(), "000000");
        assert_eq!(codon_to_bits("CNC", s).to_string(), "110011");
        assert_eq!(codon_to_bits("C", s).to_string(), "110000");
    }

    #[test]
    fn canonical_codons_cover_every_symbol() {
        for scheme in ALL_SCHEMES {
            let mut seen = HashSet::new();
            for a in b"ACGT" {
                for b in b"ACGT" {
                    for c in b"ACGT" {
                        let codon = String::from_utf8(vec![*a, *b, *c]).unwrap();
                        let symbol = translate_codon(&codon, scheme).unwrap();
                        assert!(seen.insert(symbol), "{scheme}: {codon} collides");
                    }
                }
            }
            assert_eq!(seen.len(), 64);
            assert_eq!(seen.iter().min(), Some(&1));
            assert_eq!(seen.iter().max(), Some(&64));
        }
    }

    #[test]
    fn codon_round_trip() {
        for scheme in ALL_SCHEMES {
            let bits = codon_to_bits("GAT", scheme);
            let symbol = bits_to_symbol(&bits);
            assert_eq!(symbol_to_bits(symbol).unwrap(), bits);
        }
    }

    #[test]
    fn translate_codon_validates_length() {
        assert_eq!(translate_codon("AT G", MappingScheme::Scheme1), Ok(25));
        assert_eq!(
            translate_codon("ATGC", MappingScheme::Scheme1),
            Err(AnalysisError::InvalidCodon("ATGC".to_string()))
        );
    }

    #[test]
    fn complement_inverts_all_lines() {
        assert_eq!(complement(1), Ok(64));
        assert_eq!(complement(64), Ok(1));
        for s in 1..=64 {
            assert_eq!(complement(s).unwrap(), 65 - s);
            assert_eq!(complement(complement(s).unwrap()), Ok(s));
        }
        assert_eq!(complement(0), Err(AnalysisError::InvalidSymbol(0)));
    }

    #[test]
    fn nuclear_interlocking() {
        // uniform figures are their own nucleus
        assert_eq!(nuclear(1, NuclearRule::Interlocking), Ok(1));
        assert_eq!(nuclear(64, NuclearRule::Interlocking), Ok(64));

        // lines bottom to top 0,1,0,1,0,1 -> nucleus 1,0,1,0,1,0
        let bits = Bits::from_lines([0, 1, 0, 1, 0, 1]);
        let expected = Bits::from_lines([1, 0, 1, 0, 1, 0]);
        assert_eq!(
            nuclear(bits_to_symbol(&bits), NuclearRule::Interlocking),
            Ok(bits_to_symbol(&expected))
        );
    }

    #[test]
    fn nuclear_literal_is_identity() {
        for s in 1..=64 {
            assert_eq!(nuclear(s, NuclearRule::Literal), Ok(s));
        }
        assert!(nuclear(65, NuclearRule::Literal).is_err());
    }
}
