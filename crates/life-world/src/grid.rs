//! 2D grid for the world.

use crate::cell::Cell;
use crate::patterns::Pattern;
use crate::rule;
use life_core::{Boundary, Direction, Error, Position, Result, WorldConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// A fixed-size grid of cells, bounded or toroidal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    generation: u64,
    boundary: Boundary,
    cells: Vec<Cell>,
}

/// Outcome of a single [`Grid::advance`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation counter after the advance
    pub generation: u64,
    /// Live cells after the advance
    pub population: usize,
    pub births: usize,
    pub deaths: usize,
    /// Cells skipped because their coordinates did not resolve
    pub anomalies: usize,
}

impl Grid {
    /// Create a grid with every cell dead at generation 0.
    pub fn new(width: i32, height: i32, boundary: Boundary) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let size = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::AllocationFailure { cells: usize::MAX })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| Error::AllocationFailure { cells: size })?;
        cells.resize(size, Cell::dead());

        debug!(width, height, %boundary, "Grid created");

        Ok(Self {
            width,
            height,
            generation: 0,
            boundary,
            cells,
        })
    }

    /// Create a grid from world configuration
    pub fn from_config(config: &WorldConfig) -> Result<Self> {
        Self::new(config.width, config.height, config.boundary)
    }

    /// Release the backing storage.
    pub fn destroy(self) {
        debug!(
            width = self.width,
            height = self.height,
            generation = self.generation,
            "Grid released"
        );
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Resolve a coordinate to an index into the cell array.
    ///
    /// Toroidal grids wrap every coordinate; bounded grids reject anything
    /// outside `[0, width) x [0, height)`.
    fn resolve(&self, x: i32, y: i32) -> Option<usize> {
        self.resolve_offset(x, y, 0, 0)
    }

    /// Resolve `(x + dx, y + dy)`.
    ///
    /// The sum is taken in i64 so offsets from coordinates near the i32
    /// limits wrap by true modulo instead of overflowing.
    fn resolve_offset(&self, x: i32, y: i32, dx: i32, dy: i32) -> Option<usize> {
        let x = i64::from(x) + i64::from(dx);
        let y = i64::from(y) + i64::from(dy);
        let (width, height) = (i64::from(self.width), i64::from(self.height));
        let (x, y) = match self.boundary {
            Boundary::Toroidal => (x.rem_euclid(width), y.rem_euclid(height)),
            Boundary::Bounded if (0..width).contains(&x) && (0..height).contains(&y) => (x, y),
            Boundary::Bounded => return None,
        };
        Some(self.pos_to_index(Position::new(x as i32, y as i32)))
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        pos.x as usize + pos.y as usize * self.width as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index % self.width as usize) as i32;
        let y = (index / self.width as usize) as i32;
        Position::new(x, y)
    }

    /// Get the cell at a coordinate, if it resolves to one
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.resolve(x, y).and_then(|index| self.cells.get(index))
    }

    fn cell_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.resolve(x, y).and_then(move |index| self.cells.get_mut(index))
    }

    /// Whether the coordinate resolves to a live cell
    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y).is_some_and(Cell::is_alive)
    }

    /// Count live cells in the Moore neighbourhood of `(x, y)`.
    ///
    /// Neighbours that do not resolve count as dead.
    pub fn neighbour_count(&self, x: i32, y: i32) -> u8 {
        Direction::all()
            .iter()
            .filter_map(|direction| {
                let (dx, dy) = direction.to_delta();
                self.resolve_offset(x, y, dx, dy)
            })
            .filter(|&index| self.cells.get(index).is_some_and(Cell::is_alive))
            .count() as u8
    }

    /// Advance the grid by one generation.
    ///
    /// The first pass stages every cell's next state from the current
    /// state; the second pass commits the staged states.
    pub fn advance(&mut self) -> GenerationReport {
        let mut report = GenerationReport::default();

        for y in 0..self.height {
            for x in 0..self.width {
                let neighbours = self.neighbour_count(x, y);
                match self.cell_at_mut(x, y) {
                    Some(cell) => {
                        let next = rule::next_state(cell.is_alive(), neighbours);
                        cell.stage(next);
                    }
                    None => {
                        report_anomaly(x, y, "compute");
                        report.anomalies += 1;
                    }
                }
            }
        }

        for y in 0..self.height {
            for x in 0..self.width {
                match self.cell_at_mut(x, y) {
                    Some(cell) => {
                        let was_alive = cell.commit();
                        match (was_alive, cell.is_alive()) {
                            (false, true) => report.births += 1,
                            (true, false) => report.deaths += 1,
                            _ => {}
                        }
                        if cell.is_alive() {
                            report.population += 1;
                        }
                    }
                    None => {
                        report_anomaly(x, y, "commit");
                        report.anomalies += 1;
                    }
                }
            }
        }

        self.generation += 1;
        report.generation = self.generation;

        trace!(
            generation = report.generation,
            population = report.population,
            births = report.births,
            deaths = report.deaths,
            "Generation advanced"
        );

        report
    }

    /// Set the state of a single cell
    pub fn set_alive(&mut self, x: i32, y: i32, alive: bool) -> Result<()> {
        let cell = self
            .cell_at_mut(x, y)
            .ok_or(Error::OutOfBounds { x, y })?;
        cell.set_alive(alive);
        Ok(())
    }

    /// Flip a cell and return its new state
    pub fn toggle(&mut self, x: i32, y: i32) -> Result<bool> {
        let cell = self
            .cell_at_mut(x, y)
            .ok_or(Error::OutOfBounds { x, y })?;
        let alive = !cell.is_alive();
        cell.set_alive(alive);
        Ok(alive)
    }

    /// Kill every cell. The generation counter is left untouched.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::dead());
    }

    /// Stamp a pattern with its top-left corner at `(x, y)`.
    ///
    /// Cells that fall off a bounded grid are skipped. Returns the number of
    /// cells written.
    pub fn stamp(&mut self, pattern: &Pattern, x: i32, y: i32) -> usize {
        let mut placed = 0;
        for &(dx, dy) in pattern.cells {
            let cell = self
                .resolve_offset(x, y, dx, dy)
                .and_then(|index| self.cells.get_mut(index));
            if let Some(cell) = cell {
                cell.set_alive(true);
                placed += 1;
            }
        }

        debug!(
            pattern = pattern.name,
            x,
            y,
            placed,
            total = pattern.cells.len(),
            "Pattern stamped"
        );

        placed
    }

    /// Set each cell alive with probability `density`
    pub fn randomize<R: Rng>(&mut self, density: f64, rng: &mut R) {
        for cell in &mut self.cells {
            let roll = rng.gen::<f64>();
            cell.set_alive(roll < density);
        }
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width as usize)
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    /// Positions of all live cells, row-major
    pub fn live_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| cell.is_alive())
            .map(|(pos, _)| pos)
            .collect()
    }
}

fn report_anomaly(x: i32, y: i32, pass: &str) {
    let err = Error::CoordinateResolution { x, y };
    warn!(pass, error = %err, "Cell left unchanged");
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_str(if cell.is_alive() { "O" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 7, Boundary::Bounded).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 7);
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.cells.len(), 70);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        for (w, h) in [(0, 5), (5, 0), (0, 0), (-1, 3)] {
            let result = Grid::new(w, h, Boundary::Toroidal);
            assert!(
                matches!(result, Err(Error::InvalidDimensions { width, height }) if width == w && height == h),
                "{}x{} should be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_toroidal_wrapping() {
        let grid = Grid::new(5, 5, Boundary::Toroidal).unwrap();

        assert!(std::ptr::eq(
            grid.cell_at(-1, -1).unwrap(),
            grid.cell_at(4, 4).unwrap()
        ));
        assert!(std::ptr::eq(
            grid.cell_at(5, 5).unwrap(),
            grid.cell_at(0, 0).unwrap()
        ));
        assert!(std::ptr::eq(
            grid.cell_at(-4, 0).unwrap(),
            grid.cell_at(1, 0).unwrap()
        ));
    }

    #[test]
    fn test_bounded_edges() {
        let grid = Grid::new(4, 3, Boundary::Bounded).unwrap();
        for y in 0..3 {
            assert!(grid.cell_at(-1, y).is_none());
            assert!(grid.cell_at(4, y).is_none());
        }
        for x in 0..4 {
            assert!(grid.cell_at(x, -1).is_none());
            assert!(grid.cell_at(x, 3).is_none());
        }
        assert!(grid.cell_at(3, 2).is_some());
    }

    #[test]
    fn test_neighbour_count_bounded_corner() {
        let mut grid = Grid::new(3, 3, Boundary::Bounded).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                grid.set_alive(x, y, true).unwrap();
            }
        }
        assert_eq!(grid.neighbour_count(0, 0), 3);
        assert_eq!(grid.neighbour_count(1, 0), 5);
        assert_eq!(grid.neighbour_count(1, 1), 8);
    }

    #[test]
    fn test_neighbour_count_toroidal_corner() {
        let mut grid = Grid::new(4, 4, Boundary::Toroidal).unwrap();
        grid.set_alive(3, 3, true).unwrap();
        grid.set_alive(0, 3, true).unwrap();
        grid.set_alive(3, 0, true).unwrap();
        assert_eq!(grid.neighbour_count(0, 0), 3);
    }

    #[test]
    fn test_isolated_cell_dies() {
        let mut grid = Grid::new(3, 3, Boundary::Bounded).unwrap();
        grid.set_alive(1, 1, true).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(grid.neighbour_count(x, y) > 0, (x, y) != (1, 1));
            }
        }

        let report = grid.advance();
        assert_eq!(grid.population(), 0);
        assert_eq!(report.deaths, 1);
        assert_eq!(report.births, 0);
        assert_eq!(report.generation, 1);
        assert_eq!(report.anomalies, 0);
    }

    #[test]
    fn test_neighbour_count_at_i32_limits_on_torus() {
        let mut grid = Grid::new(5, 1, Boundary::Toroidal).unwrap();
        grid.set_alive(3, 0, true).unwrap();

        // i32::MAX and i32::MIN are both congruent to 2 mod 5
        assert_eq!(grid.neighbour_count(2, 0), 3);
        assert_eq!(grid.neighbour_count(i32::MAX, 0), 3);
        assert_eq!(grid.neighbour_count(i32::MIN, 0), 3);
        assert_eq!(grid.neighbour_count(i32::MAX, i32::MIN), 3);
    }

    #[test]
    fn test_neighbour_count_at_i32_limits_on_bounded_grid() {
        let mut grid = Grid::new(2, 2, Boundary::Bounded).unwrap();
        grid.set_alive(0, 0, true).unwrap();
        assert_eq!(grid.neighbour_count(i32::MAX, i32::MAX), 0);
        assert_eq!(grid.neighbour_count(i32::MIN, i32::MIN), 0);
    }

    #[test]
    fn test_stamp_at_i32_limits_on_torus() {
        let mut grid = Grid::new(5, 5, Boundary::Toroidal).unwrap();
        // i32::MAX is congruent to 2 mod 5, so the block covers columns 2 and 3
        let placed = grid.stamp(&patterns::BLOCK, i32::MAX, 0);
        assert_eq!(placed, 4);
        assert_eq!(
            grid.live_positions(),
            vec![
                Position::new(2, 0),
                Position::new(3, 0),
                Position::new(2, 1),
                Position::new(3, 1),
            ]
        );
    }

    #[test]
    fn test_set_alive_out_of_bounds() {
        let mut grid = Grid::new(3, 3, Boundary::Bounded).unwrap();
        assert!(matches!(
            grid.set_alive(3, 0, true),
            Err(Error::OutOfBounds { x: 3, y: 0 })
        ));

        let mut torus = Grid::new(3, 3, Boundary::Toroidal).unwrap();
        torus.set_alive(3, 0, true).unwrap();
        assert!(torus.is_alive(0, 0));
    }

    #[test]
    fn test_toggle() {
        let mut grid = Grid::new(3, 3, Boundary::Bounded).unwrap();
        assert!(grid.toggle(1, 2).unwrap());
        assert!(grid.is_alive(1, 2));
        assert!(!grid.toggle(1, 2).unwrap());
        assert!(!grid.is_alive(1, 2));
    }

    #[test]
    fn test_clear_keeps_generation() {
        let mut grid = Grid::new(6, 6, Boundary::Toroidal).unwrap();
        grid.stamp(&patterns::BLOCK, 1, 1);
        grid.advance();
        grid.clear();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_stamp_clips_on_bounded_grid() {
        let mut grid = Grid::new(4, 4, Boundary::Bounded).unwrap();
        let placed = grid.stamp(&patterns::BLOCK, 3, 3);
        assert_eq!(placed, 1);
        assert_eq!(grid.live_positions(), vec![Position::new(3, 3)]);
    }

    #[test]
    fn test_stamp_wraps_on_toroidal_grid() {
        let mut grid = Grid::new(4, 4, Boundary::Toroidal).unwrap();
        let placed = grid.stamp(&patterns::BLOCK, 3, 3);
        assert_eq!(placed, 4);
        assert!(grid.is_alive(0, 0));
        assert!(grid.is_alive(3, 0));
        assert!(grid.is_alive(0, 3));
        assert!(grid.is_alive(3, 3));
    }

    #[test]
    fn test_randomize_is_reproducible() {
        let mut a = Grid::new(20, 20, Boundary::Toroidal).unwrap();
        let mut b = Grid::new(20, 20, Boundary::Toroidal).unwrap();
        a.randomize(0.3, &mut ChaCha8Rng::seed_from_u64(42));
        b.randomize(0.3, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.population() > 0);
        assert!(a.population() < 400);
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(3, 2, Boundary::Bounded).unwrap();
        grid.set_alive(0, 0, true).unwrap();
        grid.set_alive(2, 1, true).unwrap();
        assert_eq!(grid.to_string(), "O..\n..O\n");
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(7, 3, Boundary::Bounded).unwrap();
        assert_eq!(grid.index_to_pos(0), Position::new(0, 0));
        assert_eq!(grid.index_to_pos(8), Position::new(1, 1));
        assert_eq!(grid.pos_to_index(Position::new(6, 2)), 20);
    }

    #[test]
    fn test_from_config() {
        let config = WorldConfig {
            width: 12,
            height: 9,
            boundary: Boundary::Toroidal,
        };
        let grid = Grid::from_config(&config).unwrap();
        assert_eq!(grid.width(), 12);
        assert_eq!(grid.height(), 9);
        assert_eq!(grid.boundary(), Boundary::Toroidal);
    }
}
