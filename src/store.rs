// ============================================================================
// SPARSE PIXEL STORE – painted cells only, insertion ordered
// ============================================================================

use std::collections::HashMap;

use crate::color::PixelColor;
use crate::layers::LayerId;

/// Integer grid coordinate. Valid when both axes are below the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(&self, canvas_size: u32) -> bool {
        self.x < canvas_size && self.y < canvas_size
    }
}

/// A painted cell. Transparent cells are never stored, so the colour is a
/// plain RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRecord {
    pub cell: Cell,
    pub rgb: [u8; 3],
    pub layer: LayerId,
}

impl PixelRecord {
    pub fn color(&self) -> PixelColor {
        PixelColor::Rgb(self.rgb)
    }
}

/// Sparse map from cell to painted colour.
///
/// Records live in a slot vector so iteration follows first-insertion order
/// (overwrites keep their slot). Removal leaves a tombstone; the vector is
/// compacted once tombstones outnumber live records.
///
/// `generation` is bumped on every mutation that changes content, which is
/// what the UI uses to decide whether the surface needs a repaint.
#[derive(Debug, Clone, Default)]
pub struct PixelStore {
    slots: Vec<Option<PixelRecord>>,
    index: HashMap<Cell, usize>,
    generation: u64,
}

impl PixelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `cell`. Transparent removes any existing record.
    pub fn set(&mut self, cell: Cell, color: PixelColor, layer: LayerId) {
        match color {
            PixelColor::Transparent => self.remove(cell),
            PixelColor::Rgb(rgb) => self.insert(PixelRecord { cell, rgb, layer }),
        }
    }

    pub fn get(&self, cell: Cell) -> PixelColor {
        self.record(cell)
            .map(|r| r.color())
            .unwrap_or(PixelColor::Transparent)
    }

    pub fn record(&self, cell: Cell) -> Option<&PixelRecord> {
        let slot = *self.index.get(&cell)?;
        self.slots[slot].as_ref()
    }

    /// Live records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &PixelRecord> + '_ {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        self.slots.clear();
        self.index.clear();
        self.generation += 1;
    }

    /// Drop every record owned by `layer`. Returns how many were removed.
    pub fn remove_layer(&mut self, layer: LayerId) -> usize {
        let cells: Vec<Cell> = self
            .iter()
            .filter(|r| r.layer == layer)
            .map(|r| r.cell)
            .collect();
        for cell in &cells {
            self.remove(*cell);
        }
        cells.len()
    }

    /// Apply many writes as one batch: a single generation bump at the end.
    pub fn set_many(&mut self, cells: &[Cell], color: PixelColor, layer: LayerId) {
        let before = self.generation;
        for &cell in cells {
            self.set(cell, color, layer);
        }
        if self.generation != before {
            self.generation = before + 1;
        }
    }

    fn insert(&mut self, record: PixelRecord) {
        if let Some(&slot) = self.index.get(&record.cell) {
            if self.slots[slot] == Some(record) {
                return;
            }
            self.slots[slot] = Some(record);
        } else {
            self.index.insert(record.cell, self.slots.len());
            self.slots.push(Some(record));
        }
        self.generation += 1;
    }

    fn remove(&mut self, cell: Cell) {
        let Some(slot) = self.index.remove(&cell) else { return };
        self.slots[slot] = None;
        self.generation += 1;

        if self.slots.len() > 64 && self.slots.len() > self.index.len() * 2 {
            self.compact();
        }
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (slot, record) in self.slots.iter().enumerate() {
            if let Some(r) = record {
                self.index.insert(r.cell, slot);
            }
        }
    }
}
