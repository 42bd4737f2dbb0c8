//! Terminal size detection and session setup.

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use tracing::debug;

/// Current terminal size as (columns, rows)
pub fn size() -> io::Result<(u16, u16)> {
    crossterm::terminal::size()
}

/// Grid dimensions for a terminal of the given size.
///
/// Each edge is raised to at least `min`, then `reserved_rows` are kept free
/// below the grid for the status line.
pub fn grid_dimensions(columns: u16, rows: u16, min: u16, reserved_rows: u16) -> (i32, i32) {
    let width = columns.max(min);
    let height = rows.max(min).saturating_sub(reserved_rows);
    (width as i32, height as i32)
}

/// Clears the screen and hides the cursor until dropped
pub struct ScreenGuard<W: Write> {
    out: W,
}

impl<W: Write> ScreenGuard<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        execute!(out, Clear(ClearType::All), Hide)?;
        debug!("Screen cleared, cursor hidden");
        Ok(Self { out })
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show);
    }
}
