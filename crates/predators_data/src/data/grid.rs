use serde::{Deserialize, Serialize};

/// Per-cell category stamped into the display grid.
///
/// Codes are stable so a renderer can map them straight to colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellCode {
    #[default]
    Empty = 0,
    Egg = 2,
    Food = 3,
    Neutral = 4,
    Weapon = 5,
    Leg = 6,
    Eye = 7,
    OldNeutral = 8,
    NucleusNeutral = 9,
}

impl CellCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_creature(self) -> bool {
        matches!(
            self,
            CellCode::Neutral
                | CellCode::Weapon
                | CellCode::Leg
                | CellCode::Eye
                | CellCode::OldNeutral
                | CellCode::NucleusNeutral
        )
    }

    /// Single-character glyph for terminal dumps.
    pub fn glyph(self) -> char {
        match self {
            CellCode::Empty => '.',
            CellCode::Egg => 'o',
            CellCode::Food => '*',
            CellCode::Neutral => 'N',
            CellCode::Weapon => 'W',
            CellCode::Leg => 'L',
            CellCode::Eye => 'E',
            CellCode::OldNeutral => 'O',
            CellCode::NucleusNeutral => '@',
        }
    }
}
