//! Layout data model: grid masks, word slots, and their crossings.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Orientation of a word slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Across,
    Down,
}

/// A single grid cell, row-major addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Index of a slot within its layout's slot list.
pub type SlotId = usize;

/// A maximal straight run of cells holding one word.
/// Identity is direction plus starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub direction: Direction,
    pub start: Cell,
    pub length: usize,
}

impl Slot {
    pub fn across(row: usize, col: usize, length: usize) -> Self {
        Self {
            direction: Direction::Across,
            start: Cell::new(row, col),
            length,
        }
    }

    pub fn down(row: usize, col: usize, length: usize) -> Self {
        Self {
            direction: Direction::Down,
            start: Cell::new(row, col),
            length,
        }
    }

    /// Cell at a given position along the slot.
    pub fn cell(&self, pos: usize) -> Cell {
        debug_assert!(pos < self.length);
        match self.direction {
            Direction::Across => Cell::new(self.start.row, self.start.col + pos),
            Direction::Down => Cell::new(self.start.row + pos, self.start.col),
        }
    }

    /// All cells in order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.length).map(move |pos| self.cell(pos))
    }
}

/// A cell shared by exactly one across slot and one down slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crossing {
    pub slot_a: SlotId,
    pub pos_a: usize,
    pub slot_b: SlotId,
    pub pos_b: usize,
    pub cell: Cell,
}

/// Boolean width×height grid; the filled-cell set is the puzzle's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl GridMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize) {
        self.cells[row * self.width + col] = true;
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Filled cells in row-major order.
    pub fn filled_cells(&self) -> Vec<Cell> {
        let mut out = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if self.get(row, col) {
                    out.push(Cell::new(row, col));
                }
            }
        }
        out
    }

    /// Whether the filled cells form a single 4-connected component.
    pub fn is_connected(&self) -> bool {
        let filled = self.filled_cells();
        let Some(&start) = filled.first() else {
            return false;
        };
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[start.row * self.width + start.col] = true;
        queue.push_back(start);
        let mut visited = 0usize;
        while let Some(cell) = queue.pop_front() {
            visited += 1;
            let neighbors = [
                (cell.row.wrapping_sub(1), cell.col),
                (cell.row + 1, cell.col),
                (cell.row, cell.col.wrapping_sub(1)),
                (cell.row, cell.col + 1),
            ];
            for (row, col) in neighbors {
                if row < self.height && col < self.width {
                    let idx = row * self.width + col;
                    if self.cells[idx] && !seen[idx] {
                        seen[idx] = true;
                        queue.push_back(Cell::new(row, col));
                    }
                }
            }
        }
        visited == filled.len()
    }

    /// Whether the mask is symmetric under left-right mirroring.
    pub fn is_left_right_symmetric(&self) -> bool {
        for row in 0..self.height {
            for col in 0..self.width {
                if self.get(row, col) != self.get(row, self.width - 1 - col) {
                    return false;
                }
            }
        }
        true
    }

    /// Byte view used for the grid id hash: one 0/1 byte per cell, row-major.
    pub(crate) fn hash_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|&c| c as u8).collect()
    }
}

impl fmt::Display for GridMask {
    /// ASCII rendering: '#' filled, '.' empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                write!(f, "{}", if self.get(row, col) { '#' } else { '.' })?;
            }
            if row != self.height - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// A symmetric grid layout: shape, slots, and crossings.
///
/// Produced once by enumeration, consumed by ranking and filling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub across_count: usize,
    pub down_count: usize,
    pub mask: GridMask,
    pub slots: Vec<Slot>,
    pub crossings: Vec<Crossing>,
}

impl Layout {
    /// Build a layout from its slots: the mask is the union of all slot
    /// cells, crossings are every across/down shared cell.
    pub fn from_slots(width: usize, height: usize, slots: Vec<Slot>) -> Self {
        let mut mask = GridMask::new(width, height);
        for slot in &slots {
            for cell in slot.cells() {
                mask.set(cell.row, cell.col);
            }
        }
        let crossings = find_crossings(&slots);
        let across_count = slots
            .iter()
            .filter(|s| s.direction == Direction::Across)
            .count();
        let down_count = slots.len() - across_count;
        Self {
            width,
            height,
            across_count,
            down_count,
            mask,
            slots,
            crossings,
        }
    }

    /// Family label, e.g. `3H2V`.
    pub fn family(&self) -> String {
        format!("{}H{}V", self.across_count, self.down_count)
    }

    pub fn filled_count(&self) -> usize {
        self.mask.filled_count()
    }

    /// Number of distinct crossing cells. Every crossing record pairs one
    /// across with one down slot, so records and cells are one-to-one.
    pub fn distinct_crossing_cells(&self) -> usize {
        self.crossings.len()
    }

    /// How many crossings the given slot participates in.
    pub fn crossing_degree(&self, slot: SlotId) -> usize {
        self.crossings
            .iter()
            .filter(|x| x.slot_a == slot || x.slot_b == slot)
            .count()
    }

    /// Crossings touching the given slot as `(other, pos_in_self, pos_in_other)`.
    pub fn crossings_of(&self, slot: SlotId) -> Vec<(SlotId, usize, usize)> {
        let mut out = Vec::new();
        for x in &self.crossings {
            if x.slot_a == slot {
                out.push((x.slot_b, x.pos_a, x.pos_b));
            } else if x.slot_b == slot {
                out.push((x.slot_a, x.pos_b, x.pos_a));
            }
        }
        out
    }

    /// Across slots in row-major order of their start cell.
    pub fn across_slots_row_major(&self) -> Vec<SlotId> {
        let mut ids: Vec<SlotId> = (0..self.slots.len())
            .filter(|&id| self.slots[id].direction == Direction::Across)
            .collect();
        ids.sort_by_key(|&id| (self.slots[id].start.row, self.slots[id].start.col));
        ids
    }

    /// Down slots in column-major order of their start cell.
    pub fn down_slots_col_major(&self) -> Vec<SlotId> {
        let mut ids: Vec<SlotId> = (0..self.slots.len())
            .filter(|&id| self.slots[id].direction == Direction::Down)
            .collect();
        ids.sort_by_key(|&id| (self.slots[id].start.col, self.slots[id].start.row));
        ids
    }

    /// Stable identifier: dimensions, family, CRC32 of the mask bytes.
    pub fn grid_id(&self) -> String {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&[self.width as u8, self.height as u8]);
        hasher.update(&self.mask.hash_bytes());
        format!(
            "W{}H{}-{}H{}V-{:08X}",
            self.width,
            self.height,
            self.across_count,
            self.down_count,
            hasher.finalize()
        )
    }
}

fn find_crossings(slots: &[Slot]) -> Vec<Crossing> {
    let mut out = Vec::new();
    for (a, slot_a) in slots.iter().enumerate() {
        if slot_a.direction != Direction::Across {
            continue;
        }
        for (b, slot_b) in slots.iter().enumerate() {
            if slot_b.direction != Direction::Down {
                continue;
            }
            // An across and a down slot share at most one cell.
            let row = slot_a.start.row;
            let col = slot_b.start.col;
            let in_across = col >= slot_a.start.col && col < slot_a.start.col + slot_a.length;
            let in_down = row >= slot_b.start.row && row < slot_b.start.row + slot_b.length;
            if in_across && in_down {
                out.push(Crossing {
                    slot_a: a,
                    pos_a: col - slot_a.start.col,
                    slot_b: b,
                    pos_b: row - slot_b.start.row,
                    cell: Cell::new(row, col),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_layout() -> Layout {
        // One across at row 2, one down at col 2, crossing at (2,2).
        Layout::from_slots(
            5,
            5,
            vec![Slot::across(2, 0, 5), Slot::down(0, 2, 5)],
        )
    }

    #[test]
    fn slot_cells_follow_direction() {
        let across = Slot::across(1, 2, 4);
        let cells: Vec<Cell> = across.cells().collect();
        assert_eq!(cells[0], Cell::new(1, 2));
        assert_eq!(cells[3], Cell::new(1, 5));

        let down = Slot::down(1, 2, 4);
        let cells: Vec<Cell> = down.cells().collect();
        assert_eq!(cells[0], Cell::new(1, 2));
        assert_eq!(cells[3], Cell::new(4, 2));
    }

    #[test]
    fn from_slots_builds_mask_and_crossings() {
        let layout = plus_layout();
        assert_eq!(layout.across_count, 1);
        assert_eq!(layout.down_count, 1);
        assert_eq!(layout.filled_count(), 9);
        assert_eq!(layout.crossings.len(), 1);
        let x = layout.crossings[0];
        assert_eq!(x.cell, Cell::new(2, 2));
        assert_eq!(x.pos_a, 2);
        assert_eq!(x.pos_b, 2);
    }

    #[test]
    fn connectivity_and_symmetry() {
        let layout = plus_layout();
        assert!(layout.mask.is_connected());
        assert!(layout.mask.is_left_right_symmetric());

        let mut disconnected = GridMask::new(4, 4);
        disconnected.set(0, 0);
        disconnected.set(3, 3);
        assert!(!disconnected.is_connected());

        let mut lopsided = GridMask::new(4, 4);
        lopsided.set(0, 0);
        assert!(!lopsided.is_left_right_symmetric());
    }

    #[test]
    fn empty_mask_is_not_connected() {
        assert!(!GridMask::new(3, 3).is_connected());
    }

    #[test]
    fn grid_id_is_stable_and_mask_sensitive() {
        let a = plus_layout();
        let b = plus_layout();
        assert_eq!(a.grid_id(), b.grid_id());

        let other = Layout::from_slots(5, 5, vec![Slot::across(0, 0, 5), Slot::down(0, 2, 5)]);
        assert_ne!(a.grid_id(), other.grid_id());
        assert!(a.grid_id().starts_with("W5H5-1H1V-"));
    }

    #[test]
    fn mask_renders_ascii() {
        let layout = Layout::from_slots(4, 2, vec![Slot::across(0, 0, 4)]);
        assert_eq!(layout.mask.to_string(), "####\n....");
    }

    #[test]
    fn layout_serializes() {
        let layout = plus_layout();
        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(layout, back);
    }
}
