//! Simulation driver owning a grid.

use crate::grid::{GenerationReport, Grid};
use crate::patterns;
use life_core::{Error, Result, SeedConfig, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub struct Simulation {
    grid: Option<Grid>,
    generations_run: u64,
    total_births: u64,
    total_deaths: u64,
    anomalies: u64,
    peak_population: usize,
}

/// Running totals over the lifetime of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub generation: u64,
    pub generations_run: u64,
    pub population: usize,
    pub peak_population: usize,
    pub total_births: u64,
    pub total_deaths: u64,
    pub anomalies: u64,
}

impl Simulation {
    /// Create a grid from configuration and populate it.
    ///
    /// A random soup is laid down first, then named patterns on top.
    pub fn new(world: &WorldConfig, seed: &SeedConfig) -> Result<Self> {
        if let Some(density) = seed.random_density {
            if !(0.0..=1.0).contains(&density) {
                return Err(Error::Config(format!(
                    "random_density must be within 0.0..=1.0, got {}",
                    density
                )));
            }
        }

        let mut grid = Grid::from_config(world)?;

        if let Some(density) = seed.random_density {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.seed);
            grid.randomize(density, &mut rng);
        }

        for placement in &seed.patterns {
            let pattern = patterns::find(&placement.name)?;
            grid.stamp(pattern, placement.x, placement.y);
        }

        info!(
            width = grid.width(),
            height = grid.height(),
            boundary = %grid.boundary(),
            population = grid.population(),
            "Simulation seeded"
        );

        Ok(Self::from_grid(grid))
    }

    pub fn from_grid(grid: Grid) -> Self {
        let peak_population = grid.population();
        Self {
            grid: Some(grid),
            generations_run: 0,
            total_births: 0,
            total_deaths: 0,
            anomalies: 0,
            peak_population,
        }
    }

    /// Read-only view of the grid, valid until the next step
    pub fn grid(&self) -> Result<&Grid> {
        self.grid
            .as_ref()
            .ok_or_else(|| Error::InvalidState("simulation grid already released".to_string()))
    }

    /// Mutable access for seeding between steps
    pub fn grid_mut(&mut self) -> Result<&mut Grid> {
        self.grid
            .as_mut()
            .ok_or_else(|| Error::InvalidState("simulation grid already released".to_string()))
    }

    pub fn is_released(&self) -> bool {
        self.grid.is_none()
    }

    /// Advance one generation
    pub fn step(&mut self) -> Result<GenerationReport> {
        let report = self.grid_mut()?.advance();

        self.generations_run += 1;
        self.total_births += report.births as u64;
        self.total_deaths += report.deaths as u64;
        self.anomalies += report.anomalies as u64;
        self.peak_population = self.peak_population.max(report.population);

        Ok(report)
    }

    /// Run the simulation for the specified number of generations
    #[instrument(skip(self))]
    pub fn run(&mut self, generations: u64) -> Result<SimulationSummary> {
        for i in 0..generations {
            let report = self.step()?;

            if i % 1000 == 0 {
                debug!(
                    generation = report.generation,
                    population = report.population,
                    "Generation {}/{}",
                    i + 1,
                    generations
                );
            }
        }

        self.summary()
    }

    pub fn summary(&self) -> Result<SimulationSummary> {
        let grid = self.grid()?;
        Ok(SimulationSummary {
            generation: grid.generation(),
            generations_run: self.generations_run,
            population: grid.population(),
            peak_population: self.peak_population,
            total_births: self.total_births,
            total_deaths: self.total_deaths,
            anomalies: self.anomalies,
        })
    }

    /// Release the grid. Returns `false` if it was already released.
    pub fn release(&mut self) -> bool {
        let Some(grid) = self.grid.take() else {
            return false;
        };

        info!(
            event = "simulation_summary",
            generation = grid.generation(),
            generations_run = self.generations_run,
            population = grid.population(),
            peak_population = self.peak_population,
            total_births = self.total_births,
            total_deaths = self.total_deaths,
            anomalies = self.anomalies,
            "Simulation finished"
        );

        grid.destroy();
        true
    }
}
