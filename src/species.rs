//! The fixed set of species shown around the globe

use crate::error::DataError;
use crossterm::style::Color;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Species {
    Tiger,
    BelugaWhale,
    Panda,
    SiberianCrane,
    ArcticFox,
}

impl Species {
    /// Marker order around the globe, starting at angle 0 and going clockwise on screen.
    pub const ALL: [Species; 5] = [
        Species::Tiger,
        Species::BelugaWhale,
        Species::Panda,
        Species::SiberianCrane,
        Species::ArcticFox,
    ];

    /// Display label; also the column/row key in the data files.
    pub fn label(&self) -> &'static str {
        match self {
            Species::Tiger => "Tiger",
            Species::BelugaWhale => "Beluga Whale",
            Species::Panda => "Panda",
            Species::SiberianCrane => "Siberian Crane",
            Species::ArcticFox => "Arctic Fox",
        }
    }

    /// Short tag drawn inside collapsed marker boxes
    pub fn tag(&self) -> &'static str {
        match self {
            Species::Tiger => "TGR",
            Species::BelugaWhale => "BLG",
            Species::Panda => "PND",
            Species::SiberianCrane => "CRN",
            Species::ArcticFox => "FOX",
        }
    }

    pub fn accent(&self) -> Color {
        match self {
            Species::Tiger => Color::DarkYellow,
            Species::BelugaWhale => Color::Cyan,
            Species::Panda => Color::White,
            Species::SiberianCrane => Color::Blue,
            Species::ArcticFox => Color::Grey,
        }
    }

    pub fn index(&self) -> usize {
        Species::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Species bound to the number keys 1-5
    pub fn from_digit(c: char) -> Option<Species> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Species::ALL.get(i).copied())
    }

}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Species {
    type Err = DataError;

    /// Accepts labels case-insensitively, with '-' or '_' for spaces, a few
    /// short forms, and the marker numbers 1-5.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "tiger" => Ok(Species::Tiger),
            "beluga whale" | "beluga" => Ok(Species::BelugaWhale),
            "panda" | "giant panda" => Ok(Species::Panda),
            "siberian crane" | "crane" => Ok(Species::SiberianCrane),
            "arctic fox" | "fox" => Ok(Species::ArcticFox),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Species::from_digit(c),
                    _ => None,
                }
                .ok_or_else(|| DataError::UnknownSpecies(s.to_string()))
            }
        }
    }
}
