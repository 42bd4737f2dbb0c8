//! Grid engine for Conway's Game of Life.
//!
//! This module implements the fixed-size 2D grid, the B3/S23 rule, and the
//! two-pass generation advance, with bounded or toroidal edges.

pub mod cell;
pub mod grid;
pub mod patterns;
pub mod rule;
pub mod simulation;

pub use cell::Cell;
pub use grid::{GenerationReport, Grid};
pub use patterns::Pattern;
pub use simulation::{Simulation, SimulationSummary};
