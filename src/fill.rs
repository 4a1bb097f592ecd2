// ============================================================================
// FLOOD FILL — 4-connected, explicit stack, committed in one batch
// ============================================================================

use crate::color::PixelColor;
use crate::layers::LayerId;
use crate::store::{Cell, PixelStore};

/// What a fill did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Target already equals the replacement colour, or the seed is off-canvas.
    Unchanged,
    /// Number of cells in the contiguous region that received the colour.
    Filled { cells: usize },
}

/// Fill the region of cells connected to `seed` (up/down/left/right) that
/// share the seed's current colour with `replacement`, painting on `layer`.
///
/// Filling transparent with transparent is allowed and leaves the store as
/// it was. The region is collected first and written afterwards, so readers
/// never see a half-filled region.
pub fn flood_fill(
    store: &mut PixelStore,
    seed: Cell,
    replacement: PixelColor,
    layer: LayerId,
    canvas_size: u32,
) -> FillOutcome {
    if !seed.in_bounds(canvas_size) {
        return FillOutcome::Unchanged;
    }

    let target = store.get(seed);
    if target == replacement && !target.is_transparent() {
        return FillOutcome::Unchanged;
    }

    let region = collect_region(store, seed, target, canvas_size);
    store.set_many(&region, replacement, layer);
    FillOutcome::Filled { cells: region.len() }
}

/// DFS over a flat visited mask. The mask doubles as the "already queued"
/// marker, so each cell is pushed at most once.
fn collect_region(store: &PixelStore, seed: Cell, target: PixelColor, canvas_size: u32) -> Vec<Cell> {
    let size = canvas_size as usize;
    let mut visited = vec![false; size * size];
    let mut region = Vec::new();

    // Packed flat indices (y * size + x), like a scanline buffer
    let mut stack: Vec<usize> = Vec::with_capacity(1024);
    let seed_idx = seed.y as usize * size + seed.x as usize;
    visited[seed_idx] = true;
    stack.push(seed_idx);

    while let Some(idx) = stack.pop() {
        let x = idx % size;
        let y = idx / size;
        region.push(Cell::new(x as u32, y as u32));

        let mut visit = |ni: usize| {
            if visited[ni] {
                return;
            }
            let cell = Cell::new((ni % size) as u32, (ni / size) as u32);
            if store.get(cell) == target {
                visited[ni] = true;
                stack.push(ni);
            }
        };

        // Left
        if x > 0 {
            visit(idx - 1);
        }
        // Right
        if x + 1 < size {
            visit(idx + 1);
        }
        // Up
        if y > 0 {
            visit(idx - size);
        }
        // Down
        if y + 1 < size {
            visit(idx + size);
        }
    }

    region
}
