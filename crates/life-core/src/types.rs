//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Apply toroidal wrapping for given grid dimensions.
    ///
    /// Uses Euclidean remainder so negative coordinates land in `[0, width)`,
    /// e.g. `-1` wraps to `width - 1` rather than `1`.
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.rem_euclid(width),
            y: self.y.rem_euclid(height),
        }
    }

    /// Whether the position lies inside `[0, width) x [0, height)`
    pub fn within(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Edge semantics of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Out-of-range coordinates have no cell.
    #[default]
    Bounded,
    /// Edges wrap around.
    Toroidal,
}

impl Boundary {
    pub fn from_toroidal(toroidal: bool) -> Self {
        if toroidal {
            Boundary::Toroidal
        } else {
            Boundary::Bounded
        }
    }

    pub fn is_toroidal(&self) -> bool {
        matches!(self, Boundary::Toroidal)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Bounded => write!(f, "bounded"),
            Boundary::Toroidal => write!(f, "toroidal"),
        }
    }
}

/// One of the eight Moore-neighbourhood directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    /// All directions, clockwise starting at the north-west corner.
    ///
    /// Neighbour counting walks this order, so it must stay fixed.
    pub fn all() -> [Direction; 8] {
        [
            Direction::NorthWest,
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_wrap() {
        let pos = Position::new(5, 5);
        let wrapped = pos.wrap(10, 10);
        assert_eq!(wrapped, Position::new(5, 5));

        let pos = Position::new(-1, -1);
        let wrapped = pos.wrap(10, 10);
        assert_eq!(wrapped, Position::new(9, 9));

        let pos = Position::new(10, 10);
        let wrapped = pos.wrap(10, 10);
        assert_eq!(wrapped, Position::new(0, 0));
    }

    #[test]
    fn test_position_wrap_far_negative() {
        // abs(x % w) would give 1 here
        assert_eq!(Position::new(-4, 0).wrap(5, 5), Position::new(1, 0));
        assert_eq!(Position::new(-6, -11).wrap(5, 5), Position::new(4, 4));
        assert!(Position::new(i32::MIN, i32::MAX).wrap(7, 3).within(7, 3));
    }

    #[test]
    fn test_position_within() {
        assert!(Position::new(0, 0).within(3, 3));
        assert!(Position::new(2, 2).within(3, 3));
        assert!(!Position::new(-1, 0).within(3, 3));
        assert!(!Position::new(0, 3).within(3, 3));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::North.to_delta(), (0, -1));
        assert_eq!(Direction::South.to_delta(), (0, 1));
        assert_eq!(Direction::East.to_delta(), (1, 0));
        assert_eq!(Direction::West.to_delta(), (-1, 0));
    }

    #[test]
    fn test_directions_cover_moore_neighbourhood() {
        let mut deltas: Vec<_> = Direction::all().iter().map(|d| d.to_delta()).collect();
        assert_eq!(deltas[0], (-1, -1));
        assert_eq!(deltas[7], (-1, 0));
        deltas.sort();
        deltas.dedup();
        assert_eq!(deltas.len(), 8);
        assert!(!deltas.contains(&(0, 0)));
    }

    #[test]
    fn test_boundary_from_flag() {
        assert_eq!(Boundary::from_toroidal(true), Boundary::Toroidal);
        assert_eq!(Boundary::from_toroidal(false), Boundary::Bounded);
        assert!(Boundary::Toroidal.is_toroidal());
    }
}
