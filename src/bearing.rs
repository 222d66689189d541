use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

/// Represents the direction the robot is facing.
///
/// The variants are declared in clockwise order, which is also the order used for rotation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bearing {
    North,
    East,
    South,
    West,
}

/// Returned when a facing name is not one of `NORTH`, `EAST`, `SOUTH` or `WEST`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownBearing(pub String);

impl Bearing {
    /// All bearings in clockwise order, starting at `North`.
    pub const ALL: [Bearing; 4] = [Bearing::North, Bearing::East, Bearing::South, Bearing::West];

    /// The unit displacement `(dx, dy)` of a single step. North increases `y`.
    pub fn displacement(self) -> (i32, i32) {
        match self {
            Bearing::North => (0, 1),
            Bearing::East => (1, 0),
            Bearing::South => (0, -1),
            Bearing::West => (-1, 0),
        }
    }

    /// The heading angle in radians, counter-clockwise from east.
    pub fn heading(self) -> f64 {
        match self {
            Bearing::East => 0.0,
            Bearing::North => FRAC_PI_2,
            Bearing::West => PI,
            Bearing::South => 3.0 * FRAC_PI_2,
        }
    }

    /// The bearing after a quarter turn to the left.
    pub fn left(self) -> Bearing {
        Bearing::ALL[(self.index() + Bearing::ALL.len() - 1) % Bearing::ALL.len()]
    }

    /// The bearing after a quarter turn to the right.
    pub fn right(self) -> Bearing {
        Bearing::ALL[(self.index() + 1) % Bearing::ALL.len()]
    }

    /// The canonical uppercase name.
    pub fn name(self) -> &'static str {
        match self {
            Bearing::North => "NORTH",
            Bearing::East => "EAST",
            Bearing::South => "SOUTH",
            Bearing::West => "WEST",
        }
    }

    fn index(self) -> usize {
        match self {
            Bearing::North => 0,
            Bearing::East => 1,
            Bearing::South => 2,
            Bearing::West => 3,
        }
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bearing {
    type Err = UnknownBearing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bearing::ALL
            .into_iter()
            .find(|bearing| bearing.name() == s)
            .ok_or_else(|| UnknownBearing(s.to_string()))
    }
}
