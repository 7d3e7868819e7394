//! The closed set of anchor directions a popover can be placed at.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Side or corner of the target element the popover is anchored against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum Anchor {
    /// Above the target, horizontally centered.
    North,
    /// To the right of the target, top-aligned.
    NorthEast,
    /// To the left of the target, top-aligned.
    NorthWest,
    /// Below the target, horizontally centered.
    South,
    /// To the right of the target, bottom-biased.
    SouthEast,
    /// To the left of the target, bottom-biased.
    SouthWest,
    /// To the right of the target, vertically centered.
    #[default]
    East,
    /// To the left of the target, vertically centered.
    West,
}

impl Anchor {
    /// All eight anchors, in table order.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::NorthWest,
        Self::South,
        Self::SouthEast,
        Self::SouthWest,
        Self::East,
        Self::West,
    ];

    /// Kebab-case name, also used as the popover's CSS class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::NorthEast => "north-east",
            Self::NorthWest => "north-west",
            Self::South => "south",
            Self::SouthEast => "south-east",
            Self::SouthWest => "south-west",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = Error;

    /// Parse a kebab-case anchor name. Space-separated forms
    /// ("north east") are accepted as aliases.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "north" => Ok(Self::North),
            "north-east" | "north east" => Ok(Self::NorthEast),
            "north-west" | "north west" => Ok(Self::NorthWest),
            "south" => Ok(Self::South),
            "south-east" | "south east" => Ok(Self::SouthEast),
            "south-west" | "south west" => Ok(Self::SouthWest),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            other => Err(Error::InvalidAnchor(other.to_string())),
        }
    }
}
