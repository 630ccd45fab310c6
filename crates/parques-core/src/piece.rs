//! Piece identity and player colors.
//!
//! A [`Piece`] is a plain value: its color and slot never change, and two
//! pieces are the same piece exactly when they compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pieces each color owns
pub const PIECES_PER_COLOR: u8 = 4;

/// Player color, declared in the fixed cyclic board order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Blue,
    Red,
    Green,
}

impl Color {
    /// All colors in cyclic board order
    pub const ALL: [Color; 4] = [Color::Yellow, Color::Blue, Color::Red, Color::Green];

    /// Position of this color in the cyclic order (0-3)
    pub fn order_index(&self) -> usize {
        match self {
            Color::Yellow => 0,
            Color::Blue => 1,
            Color::Red => 2,
            Color::Green => 3,
        }
    }

    /// Lowercase name, as used in saved games
    pub fn name(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
        }
    }

    /// Single uppercase letter used in piece ids
    pub fn initial(&self) -> char {
        match self {
            Color::Yellow => 'Y',
            Color::Blue => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// The four pieces of this color, in slot order
    pub fn pieces(self) -> Vec<Piece> {
        (1..=PIECES_PER_COLOR).map(|slot| Piece::new(self, slot)).collect()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single game piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Owning color
    pub color: Color,
    /// Slot within the color (1-4)
    pub slot: u8,
}

impl Piece {
    /// Create a piece; slots outside 1-4 are a programming error
    pub fn new(color: Color, slot: u8) -> Self {
        debug_assert!((1..=PIECES_PER_COLOR).contains(&slot), "slot out of range");
        Self { color, slot }
    }

    /// Display id such as `Y1` or `G4`
    pub fn display_id(&self) -> String {
        format!("{}{}", self.color.initial(), self.slot)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.initial(), self.slot)
    }
}
