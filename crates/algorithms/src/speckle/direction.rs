//! Scan directions and adjustment polarity for the Crimmins filter

use serde::{Deserialize, Serialize};

/// One of the four principal directions through a pixel.
///
/// Each direction is a pair of opposite unit offsets `(prev, next)` given
/// as `(row, col)` deltas. `prev` is the southern side of the axis, or
/// the eastern side for the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// North / south (vertical)
    NorthSouth,
    /// East / west (horizontal)
    EastWest,
    /// North-west / south-east (main diagonal)
    NorthWestSouthEast,
    /// North-east / south-west (anti-diagonal)
    NorthEastSouthWest,
}

impl Direction {
    /// All four directions in the order a full adjustment step visits them
    pub const ALL: [Direction; 4] = [
        Direction::NorthSouth,
        Direction::EastWest,
        Direction::NorthWestSouthEast,
        Direction::NorthEastSouthWest,
    ];

    /// `(prev, next)` offsets as `(dr, dc)` pairs
    pub fn offsets(self) -> ((isize, isize), (isize, isize)) {
        match self {
            Direction::NorthSouth => ((1, 0), (-1, 0)),
            Direction::EastWest => ((0, 1), (0, -1)),
            Direction::NorthWestSouthEast => ((1, 1), (-1, -1)),
            Direction::NorthEastSouthWest => ((1, -1), (-1, 1)),
        }
    }

    /// Short label, e.g. `"N-S"`
    pub fn label(self) -> &'static str {
        match self {
            Direction::NorthSouth => "N-S",
            Direction::EastWest => "E-W",
            Direction::NorthWestSouthEast => "NW-SE",
            Direction::NorthEastSouthWest => "NE-SW",
        }
    }
}

/// Which extremum a pass nudges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Strict local minima are incremented by `sign(prev - next)`
    Dark,
    /// Strict local maxima are decremented by `sign(prev - next)`
    Light,
}

impl Polarity {
    /// Dark passes run before light passes within one step
    pub const ALL: [Polarity; 2] = [Polarity::Dark, Polarity::Light];
}
