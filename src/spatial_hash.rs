use macroquad::prelude::*;

use crate::entity::EntityArena;

/// Uniform bucket grid over world space, rebuilt once per tick. Cell size is
/// fixed for the session; resizing the world only changes the grid
/// dimensions. Buckets are cleared and refilled in place so the hot path
/// never reallocates.
pub struct SpatialHash {
    inv_cell_size: f32,
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Vec<u32>>,
}

impl SpatialHash {
    pub fn new(world_w: f32, world_h: f32, cell_size: f32) -> Self {
        let cols = ((world_w / cell_size).ceil() as usize).max(1);
        let rows = ((world_h / cell_size).ceil() as usize).max(1);
        let cells = (0..cols * rows).map(|_| Vec::with_capacity(8)).collect();
        Self {
            inv_cell_size: 1.0 / cell_size,
            cols,
            rows,
            cells,
        }
    }

    /// Adopt new world dimensions, keeping the cell size.
    pub fn resize_world(&mut self, world_w: f32, world_h: f32) {
        self.cols = ((world_w * self.inv_cell_size).ceil() as usize).max(1);
        self.rows = ((world_h * self.inv_cell_size).ceil() as usize).max(1);
        for cell in &mut self.cells {
            cell.clear();
        }
        self.cells.resize_with(self.cols * self.rows, Vec::new);
    }

    /// Clear all buckets and re-insert every alive entity.
    pub fn rebuild(&mut self, arena: &EntityArena) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (idx, entity) in arena.entities.iter().enumerate() {
            if let Some(e) = entity {
                if !e.alive {
                    continue;
                }
                let (cx, cy) = self.cell_of(e.pos);
                self.cells[cy * self.cols + cx].push(idx as u32);
            }
        }
    }

    fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        let cx = ((pos.x.max(0.0) * self.inv_cell_size) as usize).min(self.cols - 1);
        let cy = ((pos.y.max(0.0) * self.inv_cell_size) as usize).min(self.rows - 1);
        (cx, cy)
    }

    /// Entity indices in the 3x3 block of buckets around the query point.
    /// Approximate by design: anything two or more cells away is never
    /// returned, so callers keep their interaction radii near the cell size.
    /// Out-of-bounds queries clamp to the nearest valid cell.
    pub fn neighbors(&self, pos: Vec2) -> impl Iterator<Item = u32> + '_ {
        let (cx, cy) = self.cell_of(pos);
        let x0 = cx.saturating_sub(1);
        let x1 = (cx + 1).min(self.cols - 1);
        let y0 = cy.saturating_sub(1);
        let y1 = (cy + 1).min(self.rows - 1);
        (y0..=y1).flat_map(move |y| {
            (x0..=x1).flat_map(move |x| self.cells[y * self.cols + x].iter().copied())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    fn grid_with_food(positions: &[Vec2]) -> (SpatialHash, EntityArena) {
        let mut arena = EntityArena::new(positions.len());
        for &pos in positions {
            arena.spawn(Entity::food(pos, 6.0, WHITE)).unwrap();
        }
        let mut grid = SpatialHash::new(800.0, 800.0, 160.0);
        grid.rebuild(&arena);
        (grid, arena)
    }

    #[test]
    fn finds_entities_in_adjacent_cells() {
        let (grid, _) = grid_with_food(&[vec2(10.0, 10.0)]);
        // Query one cell over: still inside the 3x3 block.
        let hits: Vec<u32> = grid.neighbors(vec2(310.0, 10.0)).collect();
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn misses_entities_two_cells_away() {
        let (grid, _) = grid_with_food(&[vec2(10.0, 10.0)]);
        let hits: Vec<u32> = grid.neighbors(vec2(500.0, 10.0)).collect();
        assert!(hits.is_empty());
    }

    #[test]
    fn dead_entities_are_not_inserted() {
        let mut arena = EntityArena::new(2);
        arena.spawn(Entity::food(vec2(50.0, 50.0), 6.0, WHITE)).unwrap();
        let dead = arena.spawn(Entity::food(vec2(55.0, 50.0), 6.0, WHITE)).unwrap();
        arena.get_mut(dead).unwrap().alive = false;

        let mut grid = SpatialHash::new(800.0, 800.0, 160.0);
        grid.rebuild(&arena);
        let hits: Vec<u32> = grid.neighbors(vec2(50.0, 50.0)).collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn out_of_bounds_query_clamps_to_edge_cell() {
        let (grid, _) = grid_with_food(&[vec2(790.0, 790.0)]);
        let hits: Vec<u32> = grid.neighbors(vec2(5000.0, 5000.0)).collect();
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn resize_changes_dimensions_not_cell_size() {
        let mut grid = SpatialHash::new(800.0, 800.0, 160.0);
        assert_eq!((grid.cols, grid.rows), (5, 5));
        grid.resize_world(1600.0, 480.0);
        assert_eq!((grid.cols, grid.rows), (10, 3));
    }
}
