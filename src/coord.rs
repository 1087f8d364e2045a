//! Coordinate model: tiles, planes, and off-mesh node references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical layer index of a tile.
pub type Plane = i32;

/// A single addressable cell on the grid, identified by `(x, y, plane)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub plane: Plane,
}

impl Tile {
    pub const fn new(x: i32, y: i32, plane: Plane) -> Self {
        Self { x, y, plane }
    }

    /// Chebyshev distance ignoring plane (plane changes are action edges, not moves).
    pub fn chebyshev_distance(self, other: Tile) -> i64 {
        let dx = (self.x as i64 - other.x as i64).abs();
        let dy = (self.y as i64 - other.y as i64).abs();
        dx.max(dy)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

/// Discriminates the six off-mesh node families plus pure movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Door,
    Lodestone,
    Object,
    Ifslot,
    Npc,
    Item,
}

impl NodeKind {
    /// Parse a `next_node_type` column value, trimming and lowercasing it
    /// so that stray whitespace or inconsistent casing in the database
    /// never breaks chain continuation.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "door" => Some(Self::Door),
            "lodestone" => Some(Self::Lodestone),
            "object" => Some(Self::Object),
            "ifslot" => Some(Self::Ifslot),
            "npc" => Some(Self::Npc),
            "item" => Some(Self::Item),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "door",
            Self::Lodestone => "lodestone",
            Self::Object => "object",
            Self::Ifslot => "ifslot",
            Self::Npc => "npc",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a single row in one of the six node tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub id: i64,
}

impl NodeRef {
    pub const fn new(kind: NodeKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// An inclusive axis-aligned rectangle of tile coordinates, optionally
/// plane-qualified. `plane: None` means "use the caller-supplied fallback
/// plane" when selecting a concrete destination tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub plane: Option<Plane>,
}

impl Rect {
    pub fn single_tile(tile: Tile) -> Self {
        Self {
            min_x: tile.x,
            max_x: tile.x,
            min_y: tile.y,
            max_y: tile.y,
            plane: Some(tile.plane),
        }
    }

    /// Build a rectangle from optional bound columns; `None` if any
    /// coordinate component is missing, matching `Bounds2D.from_optional`.
    pub fn from_optional(
        min_x: Option<i32>,
        max_x: Option<i32>,
        min_y: Option<i32>,
        max_y: Option<i32>,
        plane: Option<Plane>,
    ) -> Option<Self> {
        let (min_x, max_x, min_y, max_y) = (min_x?, max_x?, min_y?, max_y?);
        let rect = Self { min_x, max_x, min_y, max_y, plane };
        if rect.is_valid() {
            Some(rect)
        } else {
            tracing::warn!(
                min_x, max_x, min_y, max_y, ?plane,
                "invalid destination bounds ignored (min>max)"
            );
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Merge two rects; plane is kept only when both agree (door inside/outside merge).
    pub fn merge(self, other: Rect) -> Rect {
        let plane = match (self.plane, other.plane) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        };
        Rect {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
            plane,
        }
    }
}

/// The eight movement directions, in the fixed emission order cardinals
/// first (N, S, E, W), then diagonals (NE, NW, SE, SW).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub name: &'static str,
    /// Bit position in the *internal* mask (emission order), not the external tiledata encoding.
    pub internal_bit: u8,
    pub delta: (i32, i32),
}

pub const MOVEMENTS: [Movement; 8] = [
    Movement { name: "north", internal_bit: 0, delta: (0, 1) },
    Movement { name: "south", internal_bit: 1, delta: (0, -1) },
    Movement { name: "east", internal_bit: 2, delta: (1, 0) },
    Movement { name: "west", internal_bit: 3, delta: (-1, 0) },
    Movement { name: "northeast", internal_bit: 4, delta: (1, 1) },
    Movement { name: "northwest", internal_bit: 5, delta: (-1, 1) },
    Movement { name: "southeast", internal_bit: 6, delta: (1, -1) },
    Movement { name: "southwest", internal_bit: 7, delta: (-1, -1) },
];

/// External `tiledata` bit positions: bit0=W, bit1=N, bit2=E, bit3=S,
/// bit4=NW, bit5=NE, bit6=SE, bit7=SW.
const EXTERNAL_BITS: [(&str, u8); 8] = [
    ("west", 0),
    ("north", 1),
    ("east", 2),
    ("south", 3),
    ("northwest", 4),
    ("northeast", 5),
    ("southeast", 6),
    ("southwest", 7),
];

fn movement_by_name(name: &str) -> Option<Movement> {
    MOVEMENTS.iter().copied().find(|m| m.name == name)
}

/// Precomputed 256-entry table mapping an external 8-bit `tiledata` mask to
/// the internal emission-order mask; translation is a hot path so the table
/// is built once up front rather than recomputed per tile.
pub struct TiledataTable([u8; 256]);

impl TiledataTable {
    pub fn build() -> Self {
        let mut table = [0u8; 256];
        for (external, slot) in table.iter_mut().enumerate() {
            let mut internal = 0u8;
            for &(name, ext_bit) in &EXTERNAL_BITS {
                if external as u8 & (1 << ext_bit) != 0 {
                    let movement = movement_by_name(name).expect("known direction name");
                    internal |= 1 << movement.internal_bit;
                }
            }
            *slot = internal;
        }
        Self(table)
    }

    pub fn translate(&self, external: u8) -> u8 {
        self.0[external as usize]
    }
}

/// Decode the legacy textual `allowed_directions` column into the internal
/// emission-order mask. Accepts a plain decimal integer, or a
/// comma-separated list of direction names; unknown tokens are skipped
/// with a debug log rather than failing the whole row.
pub fn decode_allowed_directions_text(value: &str) -> u8 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }
    if let Ok(n) = trimmed.parse::<u16>() {
        return (n & 0xFF) as u8;
    }
    let mut mask = 0u8;
    for part in trimmed.split(',') {
        let token = part.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }
        match movement_by_name(&token) {
            Some(m) => mask |= 1 << m.internal_bit,
            None => tracing::debug!(token = %token, "unknown movement token in allowed_directions"),
        }
    }
    mask
}
