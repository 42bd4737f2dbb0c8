//! Paints grid frames as colored blocks.

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};
use life_core::{CellColor, RenderConfig};
use life_world::Grid;
use std::io::{self, Write};

pub struct FramePrinter {
    alive: Color,
    dead: Color,
    max_width: Option<u16>,
    max_height: Option<u16>,
}

impl FramePrinter {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            alive: to_color(config.alive_color),
            dead: to_color(config.dead_color),
            max_width: config.max_width,
            max_height: config.max_height,
        }
    }

    /// Columns and rows of `grid` that will be printed
    pub fn visible_extent(&self, grid: &Grid) -> (usize, usize) {
        let clip = |limit: Option<u16>, size: i32| match limit {
            Some(limit) if limit > 0 => (limit as usize).min(size as usize),
            _ => size as usize,
        };
        (
            clip(self.max_width, grid.width()),
            clip(self.max_height, grid.height()),
        )
    }

    /// Print the grid from the current cursor position.
    ///
    /// A color change is only emitted when a cell's state differs from the
    /// previously printed cell.
    pub fn print<W: Write>(&self, out: &mut W, grid: &Grid) -> io::Result<()> {
        let (width, height) = self.visible_extent(grid);
        let mut previous: Option<bool> = None;

        for row in grid.rows().take(height) {
            for cell in row.iter().take(width) {
                let alive = cell.is_alive();
                if previous != Some(alive) {
                    let color = if alive { self.alive } else { self.dead };
                    queue!(out, SetBackgroundColor(color))?;
                    previous = Some(alive);
                }
                queue!(out, Print(' '))?;
            }
            queue!(out, Print("\n\r"))?;
        }

        queue!(out, ResetColor)
    }

    /// Draw a whole frame at the top-left corner followed by the status line
    pub fn draw<W: Write>(&self, out: &mut W, grid: &Grid) -> io::Result<()> {
        queue!(out, MoveTo(0, 0))?;
        self.print(out, grid)?;
        queue!(out, Print(format!("Generation: {}\n", grid.generation())))?;
        out.flush()
    }
}

fn to_color(color: CellColor) -> Color {
    match color {
        CellColor::Black => Color::Black,
        CellColor::Red => Color::DarkRed,
        CellColor::Green => Color::DarkGreen,
        CellColor::Yellow => Color::DarkYellow,
        CellColor::Blue => Color::DarkBlue,
        CellColor::Magenta => Color::DarkMagenta,
        CellColor::Cyan => Color::DarkCyan,
        CellColor::White => Color::Grey,
    }
}
