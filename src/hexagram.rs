//! Static reference table describing each of the 64 symbols as a hexagram.
use crate::symbol::{Bits, Symbol, SYMBOL_COUNT};
use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trigram {
    Qian,
    Dui,
    Li,
    Zhen,
    Xun,
    Kan,
    Gen,
    Kun,
}

/// Ordering of the trigrams in the King Wen lookup grid.
const GRID_ORDER: [Trigram; 8] = [
    Trigram::Qian,
    Trigram::Zhen,
    Trigram::Kan,
    Trigram::Gen,
    Trigram::Kun,
    Trigram::Xun,
    Trigram::Li,
    Trigram::Dui,
];

// rows are the upper trigram, columns the lower one, both in GRID_ORDER
const KING_WEN_GRID: [[u8; 8]; 8] = [
    [1, 25, 6, 33, 12, 44, 13, 10],
    [34, 51, 40, 62, 16, 32, 55, 54],
    [5, 3, 29, 39, 8, 48, 63, 60],
    [26, 27, 4, 52, 23, 18, 22, 41],
    [11, 24, 7, 15, 2, 46, 36, 19],
    [9, 42, 59, 53, 20, 57, 37, 61],
    [14, 21, 64, 56, 35, 50, 30, 38],
    [43, 17, 47, 31, 45, 28, 49, 58],
];

const NAMES: [(&str, &str); 64] = [
    ("Qian", "The Creative"),
    ("Kun", "The Receptive"),
    ("Zhun", "Difficulty at the Beginning"),
    ("Meng", "Youthful Folly"),
    ("Xu", "Waiting"),
    ("Song", "Conflict"),
    ("Shi", "The Army"),
    ("Bi", "Holding Together"),
    ("Xiao Chu", "Taming Power of the Small"),
    ("Lu", "Treading"),
    ("Tai", "Peace"),
    ("Pi", "Standstill"),
    ("Tong Ren", "Fellowship with Men"),
    ("Da You", "Possession in Great Measure"),
    ("Qian", "Modesty"),
    ("Yu", "Enthusiasm"),
    ("Sui", "Following"),
    ("Gu", "Work on What Has Been Spoiled"),
    ("Lin", "Approach"),
    ("Guan", "Contemplation"),
    ("Shi He", "Biting Through"),
    ("Bi", "Grace"),
    ("Bo", "Splitting Apart"),
    ("Fu", "Return"),
    ("Wu Wang", "Innocence"),
    ("Da Chu", "Taming Power of the Great"),
    ("Yi", "Corners of the Mouth"),
    ("Da Guo", "Preponderance of the Great"),
    ("Kan", "The Abysmal"),
    ("Li", "The Clinging"),
    ("Xian", "Influence"),
    ("Heng", "Duration"),
    ("Dun", "Retreat"),
    ("Da Zhuang", "Power of the Great"),
    ("Jin", "Progress"),
    ("Ming Yi", "Darkening of the Light"),
    ("Jia Ren", "The Family"),
    ("Kui", "Opposition"),
    ("Jian", "Obstruction"),
    ("Xie", "Deliverance"),
    ("Sun", "Decrease"),
    ("Yi", "Increase"),
    ("Guai", "Break-through"),
    ("Gou", "Coming to Meet"),
    ("Cui", "Gathering Together"),
    ("Sheng", "Pushing Upward"),
    ("Kun", "Oppression"),
    ("Jing", "The Well"),
    ("Ge", "Revolution"),
    ("Ding", "The Cauldron"),
    ("Zhen", "The Arousing"),
    ("Gen", "Keeping Still"),
    ("Jian", "Development"),
    ("Gui Mei", "The Marrying Maiden"),
    ("Feng", "Abundance"),
    ("Lu", "The Wanderer"),
    ("Xun", "The Gentle"),
    ("Dui", "The Joyous"),
    ("Huan", "Dispersion"),
    ("Jie", "Limitation"),
    ("Zhong Fu", "Inner Truth"),
    ("Xiao Guo", "Preponderance of the Small"),
    ("Ji Ji", "After Completion"),
    ("Wei Ji", "Before Completion"),
];

impl Trigram {
    /// Reads three lines, bottom to top.
    pub fn from_lines(lines: [u8; 3]) -> Self {
        match (lines[0] & 1, lines[1] & 1, lines[2] & 1) {
            (1, 1, 1) => Trigram::Qian,
            (1, 1, 0) => Trigram::Dui,
            (1, 0, 1) => Trigram::Li,
            (1, 0, 0) => Trigram::Zhen,
            (0, 1, 1) => Trigram::Xun,
            (0, 1, 0) => Trigram::Kan,
            (0, 0, 1) => Trigram::Gen,
            _ => Trigram::Kun,
        }
    }

    pub fn image(&self) -> &'static str {
        match self {
            Trigram::Qian => "heaven",
            Trigram::Dui => "lake",
            Trigram::Li => "fire",
            Trigram::Zhen => "thunder",
            Trigram::Xun => "wind",
            Trigram::Kan => "water",
            Trigram::Gen => "mountain",
            Trigram::Kun => "earth",
        }
    }

    fn grid_index(&self) -> usize {
        GRID_ORDER.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// One entry of the reference table.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Hexagram {
    pub number: Symbol,
    pub bits: Bits,
    /// bottom to top
    pub lines: [u8; 6],
    pub lower: Trigram,
    pub upper: Trigram,
    pub king_wen: u8,
    pub name: &'static str,
    pub english: &'static str,
}

impl Hexagram {
    fn build(number: Symbol) -> Self {
        let bits = Bits::from_value(number - 1);
        let lines = bits.lines();
        let lower = Trigram::from_lines([lines[0], lines[1], lines[2]]);
        let upper = Trigram::from_lines([lines[3], lines[4], lines[5]]);
        let king_wen = KING_WEN_GRID[upper.grid_index()][lower.grid_index()];
        let (name, english) = NAMES[king_wen as usize - 1];

        Hexagram {
            number,
            bits,
            lines,
            lower,
            upper,
            king_wen,
            name,
            english,
        }
    }
}

lazy_static! {
    static ref TABLE: [Hexagram; SYMBOL_COUNT] =
        std::array::from_fn(|i| Hexagram::build(i as Symbol + 1));
}

pub fn table() -> &'static [Hexagram; SYMBOL_COUNT] {
    &TABLE
}

/// Returns the reference entry for a symbol, or `None` for anything outside 1..=64.
pub fn lookup(symbol: Symbol) -> Option<&'static Hexagram> {
    TABLE.get(symbol.checked_sub(1)? as usize)
}

pub fn by_king_wen(number: u8) -> Option<&'static Hexagram> {
    TABLE.iter().find(|h| h.king_wen == number)
}
