#![forbid(unsafe_code)]

//! Fixed-size occupancy grid. Each cell holds at most one combatant.

pub const BOARD_WIDTH: i32 = 1024;
pub const BOARD_HEIGHT: i32 = 768;

/// Search radius when the requested cell is taken.
const FREE_SEARCH_RADIUS: i32 = 3;

/// Occupant of a board cell: unit index and combatant index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub unit: u16,
    pub combatant: u16,
}

#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Option<Slot>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: vec![None; (BOARD_WIDTH * BOARD_HEIGHT) as usize],
        }
    }

    pub fn contains(x: i32, y: i32) -> bool {
        (0..BOARD_WIDTH).contains(&x) && (0..BOARD_HEIGHT).contains(&y)
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        Self::contains(x, y).then(|| (y * BOARD_WIDTH + x) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Slot> {
        Self::index(x, y).and_then(|i| self.cells[i])
    }

    pub fn is_free(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_some_and(|i| self.cells[i].is_none())
    }

    /// Nearest free cell to `(x, y)`, searching outward in square rings.
    pub fn find_free(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.is_free(x, y) {
            return Some((x, y));
        }
        for radius in 1..=FREE_SEARCH_RADIUS {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue;
                    }
                    if self.is_free(x + dx, y + dy) {
                        return Some((x + dx, y + dy));
                    }
                }
            }
        }
        None
    }

    /// Put `slot` at or near `(x, y)`. Returns where it landed.
    pub fn place(&mut self, x: i32, y: i32, slot: Slot) -> Option<(i32, i32)> {
        let (fx, fy) = self.find_free(x, y)?;
        let index = Self::index(fx, fy)?;
        self.cells[index] = Some(slot);
        Some((fx, fy))
    }

    /// Move the occupant of `from` to `to`, if `to` is free.
    pub fn move_to(&mut self, from: (i32, i32), to: (i32, i32)) -> bool {
        let (Some(src), Some(dst)) = (Self::index(from.0, from.1), Self::index(to.0, to.1)) else {
            return false;
        };
        if src == dst || self.cells[dst].is_some() {
            return false;
        }
        self.cells[dst] = self.cells[src].take();
        true
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        if let Some(i) = Self::index(x, y) {
            self.cells[i] = None;
        }
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
