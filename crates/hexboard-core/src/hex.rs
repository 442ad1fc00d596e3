//! Axial hex coordinates and the string cell keys used to index the board.
//!
//! - `HexCoord`: identifies one hexagon of the grid
//! - `CellKey`: the `"q,r"` form of a coordinate, used as the board mapping key
//! - `Orientation`: which way the hexagons are drawn (flat-top or pointy-top)
//!
//! Axial coordinates keep neighbor and distance math simple, and a whole grid can
//! be generated from a radius with [`HexCoord::spiral`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when building coordinates or cell keys from untrusted input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid coordinate ({q}, {r}): axial coordinates must be integers")]
    InvalidCoordinate { q: f64, r: f64 },

    #[error("Malformed cell key {0:?}: expected \"q,r\"")]
    MalformedKey(String),
}

/// Hexagon orientation, fixed per grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Two sides are horizontal; a corner points east
    FlatTop,
    /// Two sides are vertical; a corner points north
    #[default]
    PointyTop,
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The six neighboring hexes in clockwise order starting from East
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),     // East
            HexCoord::new(self.q + 1, self.r - 1), // NorthEast
            HexCoord::new(self.q, self.r - 1),     // NorthWest
            HexCoord::new(self.q - 1, self.r),     // West
            HexCoord::new(self.q - 1, self.r + 1), // SouthWest
            HexCoord::new(self.q, self.r + 1),     // SouthEast
        ]
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Whether the two hexes share an edge
    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.distance_to(other) == 1
    }

    /// All hexes at exactly `radius` steps, walking the ring from its south-west corner.
    pub fn ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }

        let r = radius as i32;
        let mut hex = HexCoord::new(self.q - r, self.r + r);
        let mut ring = Vec::with_capacity(6 * radius as usize);
        for side in 0..6 {
            for _ in 0..radius {
                ring.push(hex);
                hex = hex.neighbors()[side];
            }
        }
        ring
    }

    /// The center followed by every ring out to `radius`.
    ///
    /// A radius-2 spiral is the classic 19-hex board.
    pub fn spiral(&self, radius: u32) -> Vec<HexCoord> {
        (0..=radius).flat_map(|k| self.ring(k)).collect()
    }

    /// Round fractional axial coordinates to the nearest hex
    pub fn from_fractional(q: f64, r: f64) -> Self {
        let s = -q - r;

        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Board key for a hex: the string `"q,r"`.
///
/// The key is a pure function of the two integers, so every component that builds
/// a key for the same coordinate gets an identical value. Serialized as the string
/// form, which lets it be used as a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellKey(HexCoord);

impl CellKey {
    pub const fn new(q: i32, r: i32) -> Self {
        Self(HexCoord::new(q, r))
    }

    /// Build a key from coordinates that arrived as floats (JSON numbers, pointer math).
    ///
    /// Fails unless both values are finite integers inside the `i32` range.
    pub fn from_fractional(q: f64, r: f64) -> Result<Self, CoordError> {
        let as_axial = |v: f64| -> Option<i32> {
            let in_range = v >= i32::MIN as f64 && v <= i32::MAX as f64;
            (v.is_finite() && v.fract() == 0.0 && in_range).then_some(v as i32)
        };

        match (as_axial(q), as_axial(r)) {
            (Some(q), Some(r)) => Ok(Self::new(q, r)),
            _ => Err(CoordError::InvalidCoordinate { q, r }),
        }
    }

    pub const fn coord(&self) -> HexCoord {
        self.0
    }
}

impl From<HexCoord> for CellKey {
    fn from(coord: HexCoord) -> Self {
        Self(coord)
    }
}

impl From<CellKey> for HexCoord {
    fn from(key: CellKey) -> Self {
        key.0
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0.q, self.0.r)
    }
}

impl FromStr for CellKey {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordError::MalformedKey(s.to_string());

        let mut parts = s.split(',');
        let (Some(q), Some(r), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let q = parse_axial(q).ok_or_else(malformed)?;
        let r = parse_axial(r).ok_or_else(malformed)?;
        Ok(Self::new(q, r))
    }
}

/// One axial component in the form `Display` writes it: no `+`, no leading zeros, no `-0`.
fn parse_axial(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let digits = raw.strip_prefix('-').unwrap_or(raw);

    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == raw.len(),
        [first, ..] => *first != b'0' && digits.bytes().all(|b| b.is_ascii_digit()),
    };
    if !canonical {
        return None;
    }
    raw.parse().ok()
}

impl TryFrom<String> for CellKey {
    type Error = CoordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellKey> for String {
    fn from(key: CellKey) -> Self {
        key.to_string()
    }
}
