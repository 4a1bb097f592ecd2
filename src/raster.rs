// ============================================================================
// LINE RASTERIZER — continuous strokes between sampled pointer cells
// ============================================================================

use crate::store::Cell;

/// Width/height of the on-screen drawing surface in pixels.
pub const SURFACE_SIZE: u32 = 512;

/// On-screen pixels per grid cell: `floor(512 / canvas_size)`, at least 1.
pub fn cell_pixel_size(canvas_size: u32) -> u32 {
    (SURFACE_SIZE / canvas_size.max(1)).max(1)
}

/// Map a surface-local pointer position to the grid cell under it.
/// Positions left of / above the surface or past the last cell give `None`.
pub fn surface_to_cell(px: f32, py: f32, canvas_size: u32) -> Option<Cell> {
    if !(px >= 0.0 && py >= 0.0) {
        return None;
    }
    let size = cell_pixel_size(canvas_size);
    let cell = Cell::new(px as u32 / size, py as u32 / size);
    cell.in_bounds(canvas_size).then_some(cell)
}

/// Every cell on the Bresenham line from `from` to `to`, both endpoints
/// included, in stroke order.
pub fn line_cells(from: Cell, to: Cell) -> Vec<Cell> {
    let mut x0 = from.x as i64;
    let mut y0 = from.y as i64;
    let x1 = to.x as i64;
    let y1 = to.y as i64;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut cells = Vec::with_capacity((dx.max(dy) + 1) as usize);
    loop {
        cells.push(Cell::new(x0 as u32, y0 as u32));

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
    cells
}

/// Square brush footprint of side `brush_size` around `center`, clipped to
/// the canvas. Even sizes extend one cell further right/down.
pub fn brush_cells(center: Cell, brush_size: u32, canvas_size: u32) -> Vec<Cell> {
    let size = brush_size.max(1) as i64;
    let before = (size - 1) / 2;
    let limit = canvas_size as i64;

    let x_start = (center.x as i64 - before).max(0);
    let y_start = (center.y as i64 - before).max(0);
    let x_end = (center.x as i64 - before + size).min(limit);
    let y_end = (center.y as i64 - before + size).min(limit);

    let mut cells = Vec::new();
    for y in y_start..y_end {
        for x in x_start..x_end {
            cells.push(Cell::new(x as u32, y as u32));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_visits_every_cell_in_order() {
        let cells = line_cells(Cell::new(0, 0), Cell::new(5, 0));
        let expected: Vec<Cell> = (0..=5).map(|x| Cell::new(x, 0)).collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn diagonal_line_is_four_cells() {
        let cells = line_cells(Cell::new(0, 0), Cell::new(3, 3));
        let expected: Vec<Cell> = (0..=3).map(|i| Cell::new(i, i)).collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn reverse_and_degenerate_lines() {
        let back = line_cells(Cell::new(4, 2), Cell::new(1, 2));
        assert_eq!(back.first(), Some(&Cell::new(4, 2)));
        assert_eq!(back.last(), Some(&Cell::new(1, 2)));
        assert_eq!(back.len(), 4);

        assert_eq!(line_cells(Cell::new(7, 7), Cell::new(7, 7)), vec![Cell::new(7, 7)]);
    }

    #[test]
    fn steep_line_has_no_gaps() {
        let cells = line_cells(Cell::new(2, 0), Cell::new(4, 9));
        assert_eq!(cells.len(), 10);
        for pair in cells.windows(2) {
            let dx = (pair[1].x as i64 - pair[0].x as i64).abs();
            let dy = (pair[1].y as i64 - pair[0].y as i64).abs();
            assert!(dx <= 1 && dy <= 1 && dx + dy > 0);
        }
    }

    #[test]
    fn pointer_maps_by_integer_division() {
        // 16x16 canvas on a 512px surface: 32px cells
        assert_eq!(cell_pixel_size(16), 32);
        assert_eq!(surface_to_cell(0.0, 0.0, 16), Some(Cell::new(0, 0)));
        assert_eq!(surface_to_cell(31.9, 32.0, 16), Some(Cell::new(0, 1)));
        assert_eq!(surface_to_cell(511.0, 511.0, 16), Some(Cell::new(15, 15)));
        assert_eq!(surface_to_cell(-1.0, 4.0, 16), None);
        assert_eq!(surface_to_cell(512.0, 4.0, 16), None);
    }

    #[test]
    fn cell_size_never_drops_below_one() {
        assert_eq!(cell_pixel_size(1024), 1);
        assert_eq!(cell_pixel_size(0), 512);
        // 48x48: 10px cells, surface pixels past 480 fall outside the grid
        assert_eq!(cell_pixel_size(48), 10);
        assert_eq!(surface_to_cell(485.0, 0.0, 48), None);
    }

    #[test]
    fn brush_footprint_is_clipped() {
        assert_eq!(brush_cells(Cell::new(3, 3), 1, 8), vec![Cell::new(3, 3)]);
        assert_eq!(brush_cells(Cell::new(3, 3), 3, 8).len(), 9);
        assert_eq!(brush_cells(Cell::new(0, 0), 3, 8).len(), 4);
        assert_eq!(brush_cells(Cell::new(7, 7), 2, 8), vec![Cell::new(7, 7)]);
    }
}
