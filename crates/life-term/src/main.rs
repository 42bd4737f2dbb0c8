//! Terminal driver: sizes a grid to the terminal and plays generations.

mod renderer;
mod telemetry;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use life_core::{Boundary, PatternPlacement, RunConfig};
use life_world::{Simulation, SimulationSummary};
use std::io;
use std::path::PathBuf;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

/// Play Conway's Game of Life in the terminal.
#[derive(Parser, Debug)]
#[command(name = "life-term", version, about = "Conway's Game of Life in the terminal")]
struct Args {
    /// JSON run configuration; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (defaults to the terminal width).
    #[arg(long)]
    width: Option<i32>,

    /// Grid height (defaults to the terminal height minus the status line).
    #[arg(long)]
    height: Option<i32>,

    /// Wrap the edges around.
    #[arg(long)]
    toroidal: bool,

    /// Number of generations to play.
    #[arg(long)]
    generations: Option<u64>,

    /// Delay between frames in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Pattern to stamp, as NAME or NAME@X,Y (repeatable).
    #[arg(long = "pattern", value_parser = parse_placement)]
    patterns: Vec<PatternPlacement>,

    /// Fill the grid at random with this density (0.0 to 1.0).
    #[arg(long)]
    random: Option<f64>,

    /// Seed for the random fill.
    #[arg(long)]
    seed: Option<u64>,

    /// Run without drawing and print a JSON summary.
    #[arg(long)]
    headless: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_placement(value: &str) -> std::result::Result<PatternPlacement, String> {
    let (name, origin) = match value.split_once('@') {
        Some((name, origin)) => (name, Some(origin)),
        None => (value, None),
    };

    let (x, y) = match origin {
        Some(origin) => {
            let (x, y) = origin
                .split_once(',')
                .ok_or_else(|| format!("expected NAME@X,Y, got {}", value))?;
            let x = x.trim().parse().map_err(|e| format!("bad x in {}: {}", value, e))?;
            let y = y.trim().parse().map_err(|e| format!("bad y in {}: {}", value, e))?;
            (x, y)
        }
        None => (10, 10),
    };

    Ok(PatternPlacement {
        name: name.trim().to_string(),
        x,
        y,
    })
}

fn build_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(width) = args.width {
        config.world.width = width;
        config.fixed_size = true;
    }
    if let Some(height) = args.height {
        config.world.height = height;
        config.fixed_size = true;
    }
    if args.toroidal {
        config.world.boundary = Boundary::Toroidal;
    }
    if let Some(generations) = args.generations {
        config.generations = generations;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.frame_interval_ms = interval_ms;
    }
    if !args.patterns.is_empty() {
        config.seed.patterns = args.patterns.clone();
    }
    if let Some(density) = args.random {
        config.seed.random_density = Some(density);
    }
    if let Some(seed) = args.seed {
        config.seed.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

/// Replace the configured size with the terminal's unless it was fixed
fn size_to_terminal(config: &mut RunConfig) -> Result<()> {
    if config.fixed_size {
        return Ok(());
    }

    let (columns, rows) = terminal::size().context("Could not retrieve terminal size")?;
    let (width, height) =
        terminal::grid_dimensions(columns, rows, config.min_terminal_size, config.reserved_rows);
    config.world.width = width;
    config.world.height = height;

    info!(columns, rows, width, height, "Sized grid to terminal");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    telemetry::init_telemetry(args.log_file.as_deref())?;

    let mut config = build_config(&args)?;
    if !args.headless {
        size_to_terminal(&mut config)?;
    }

    let mut simulation = Simulation::new(&config.world, &config.seed)
        .context("Game of Life could not be created")?;

    let summary = if args.headless {
        simulation.run(config.generations)?
    } else {
        play(&mut simulation, &config).await?
    };

    simulation.release();

    if args.headless {
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}

/// Draw, advance, and wait, once per generation
async fn play(simulation: &mut Simulation, config: &RunConfig) -> Result<SimulationSummary> {
    let printer = renderer::FramePrinter::new(&config.render);
    let mut screen = terminal::ScreenGuard::new(io::stdout().lock())?;

    let mut ticker = interval(Duration::from_millis(config.frame_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    info!(
        generations = config.generations,
        interval_ms = config.frame_interval_ms,
        "Starting playback"
    );

    for _ in 0..config.generations {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Playback interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }

        printer.draw(screen.writer(), simulation.grid()?)?;
        simulation.step()?;
    }

    Ok(simulation.summary()?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
