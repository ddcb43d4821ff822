use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// World units per map cell along each axis.
pub const CELL_SIZE: i32 = 1024;

/// A map cell coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CPos {
    pub x: i32,
    pub y: i32,
}

impl CPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position at the middle of this cell.
    pub fn center(self) -> WPos {
        WPos::new(
            self.x * CELL_SIZE + CELL_SIZE / 2,
            self.y * CELL_SIZE + CELL_SIZE / 2,
        )
    }
}

/// A position in integer world units.
///
/// Integer coordinates keep distance checks bit-identical on every peer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WPos {
    pub x: i32,
    pub y: i32,
}

impl WPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell containing this position.
    pub fn to_cell(self) -> CPos {
        CPos::new(self.x.div_euclid(CELL_SIZE), self.y.div_euclid(CELL_SIZE))
    }

    pub fn distance_squared(self, other: WPos) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Offset by whole cells.
    pub fn offset_cells(self, dx: i32, dy: i32) -> WPos {
        WPos::new(self.x + dx * CELL_SIZE, self.y + dy * CELL_SIZE)
    }
}

/// A distance in world units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WDist(pub i32);

impl WDist {
    pub const ZERO: WDist = WDist(0);

    pub const fn from_cells(cells: i32) -> Self {
        Self(cells * CELL_SIZE)
    }

    pub fn length(self) -> i32 {
        self.0
    }

    /// Whether `pos` lies within this distance of `center` (inclusive).
    pub fn covers(self, center: WPos, pos: WPos) -> bool {
        let range = i64::from(self.0);
        center.distance_squared(pos) <= range * range
    }
}

/// Grow a footprint by its neighbouring cells.
///
/// Each input cell contributes itself plus its 4 orthogonal neighbours, or all
/// 8 neighbours when `include_diagonals` is set. The result is duplicate-free
/// and keeps first-seen order.
pub fn expand_footprint(cells: &[CPos], include_diagonals: bool) -> Vec<CPos> {
    let mut seen = BTreeSet::new();
    let mut expanded = Vec::new();
    for cell in cells {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if !include_diagonals && dx != 0 && dy != 0 {
                    continue;
                }
                let neighbour = CPos::new(cell.x + dx, cell.y + dy);
                if seen.insert(neighbour) {
                    expanded.push(neighbour);
                }
            }
        }
    }
    expanded
}
