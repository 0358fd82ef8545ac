use lazy_static::lazy_static;

pub const A: u8 = 0b00;
pub const T: u8 = 0b10;
pub const C: u8 = 0b01;
pub const G: u8 = 0b11;

/// NCBI translation table 1, codons enumerated in TCAG order.
const STANDARD_CODE_TCAG: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

pub const STOP: u8 = b'*';
pub const UNKNOWN_AMINO_ACID: u8 = b'X';

lazy_static! {
    /// The standard genetic code indexed by the packed 2-bit codon
    /// (first base in the high bits).
    pub static ref CODON_TABLE: [u8; 64] = {
        let tcag = [T, C, A, G];
        let mut table = [UNKNOWN_AMINO_ACID; 64];

        for (i, aa) in STANDARD_CODE_TCAG.iter().enumerate() {
            let idx = (tcag[i / 16] << 4) | (tcag[(i / 4) % 4] << 2) | tcag[i % 4];
            table[idx as usize] = *aa;
        }

        table
    };
}

#[inline(always)]
pub fn is_nucleotide(s: u8) -> bool {
    matches!(s, b'A' | b'C' | b'G' | b'T')
}

/// Packs an uppercase A, C, G or T into two bits. Other input is meaningless.
#[inline(always)]
pub fn dna_to_u8(s: u8) -> u8 {
    (s & 0b00000110) >> 1
}

#[inline(always)]
pub fn complement(s: u8) -> u8 {
    match s {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'a' => b't',
        b't' | b'u' => b'a',
        b'g' => b'c',
        b'c' => b'g',
        other => other,
    }
}

/// Amino acid for an uppercase DNA codon; `X` when it is not three of ACGT.
pub fn amino_acid(codon: &[u8]) -> u8 {
    match codon {
        [a, b, c] if is_nucleotide(*a) && is_nucleotide(*b) && is_nucleotide(*c) => {
            let idx = (dna_to_u8(*a) << 4) | (dna_to_u8(*b) << 2) | dna_to_u8(*c);
            CODON_TABLE[idx as usize]
        }
        _ => UNKNOWN_AMINO_ACID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_matches_constants() {
        assert_eq!(dna_to_u8(b'A'), A);
        assert_eq!(dna_to_u8(b'C'), C);
        assert_eq!(dna_to_u8(b'G'), G);
        assert_eq!(dna_to_u8(b'T'), T);
    }

    #[test]
    fn standard_code() {
        assert_eq!(amino_acid(b"ATG"), b'M');
        assert_eq!(amino_acid(b"TTT"), b'F');
        assert_eq!(amino_acid(b"GGG"), b'G');
        assert_eq!(amino_acid(b"TGG"), b'W');
        assert_eq!(amino_acid(b"TAA"), STOP);
        assert_eq!(amino_acid(b"TAG"), STOP);
        assert_eq!(amino_acid(b"TGA"), STOP);
        assert_eq!(amino_acid(b"AGA"), b'R');
    }

    #[test]
    fn unknown_codons() {
        assert_eq!(amino_acid(b"ANG"), UNKNOWN_AMINO_ACID);
        assert_eq!(amino_acid(b"AT"), UNKNOWN_AMINO_ACID);
    }

    #[test]
    fn complement_pairs() {
        assert_eq!(complement(b'A'), b'T');
        assert_eq!(complement(b'U'), b'A');
        assert_eq!(complement(b'g'), b'c');
        assert_eq!(complement(b'N'), b'N');
    }
}
