//! Agent type labels and their display colours

use serde::{Deserialize, Serialize};

/// Colour the renderer uses for labels it does not recognise
pub const UNKNOWN_COLOR: [u8; 3] = [0x00, 0x00, 0x00];

/// Rock-paper-scissors type carried by every agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Shape {
    Rock,
    Paper,
    Scissors,
}

impl Shape {
    /// Canonical order, also the round-robin order for even assignment
    pub const ALL: [Shape; 3] = [Shape::Rock, Shape::Paper, Shape::Scissors];

    /// Round-robin pick
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index % 3) as usize]
    }

    /// Position in `ALL`
    pub fn index(self) -> usize {
        match self {
            Shape::Rock => 0,
            Shape::Paper => 1,
            Shape::Scissors => 2,
        }
    }

    /// Whether `self` converts `other` on contact
    pub fn beats(self, other: Shape) -> bool {
        matches!(
            (self, other),
            (Shape::Rock, Shape::Scissors)
                | (Shape::Paper, Shape::Rock)
                | (Shape::Scissors, Shape::Paper)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Rock => "ROCK",
            Shape::Paper => "PAPER",
            Shape::Scissors => "SCISSORS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Some(Shape::Rock),
            "paper" => Some(Shape::Paper),
            "scissors" => Some(Shape::Scissors),
            _ => None,
        }
    }

    /// Fill colour (RGB)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Shape::Rock => [0xFF, 0xFF, 0x00],
            Shape::Paper => [0x00, 0xFF, 0x00],
            Shape::Scissors => [0x00, 0x00, 0xFF],
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour for a free-form type label, black when it is not a known shape
pub fn color_for_label(label: &str) -> [u8; 3] {
    Shape::from_str(label).map_or(UNKNOWN_COLOR, |shape| shape.color())
}
