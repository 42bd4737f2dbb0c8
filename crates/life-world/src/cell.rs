//! Single grid cell.

/// Alive/dead state plus a scratch slot for the staged next state.
///
/// `next` is only meaningful between the compute and commit passes of
/// [`Grid::advance`](crate::Grid::advance).
#[derive(Debug, Clone, Copy, Default, Eq)]
pub struct Cell {
    alive: bool,
    next: bool,
}

impl Cell {
    pub fn dead() -> Self {
        Self::default()
    }

    pub fn alive() -> Self {
        Self {
            alive: true,
            next: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    pub(crate) fn stage(&mut self, next: bool) {
        self.next = next;
    }

    /// Move the staged state into place. Returns the previous state.
    pub(crate) fn commit(&mut self) -> bool {
        std::mem::replace(&mut self.alive, self.next)
    }
}

// The scratch slot is not part of a cell's observable state.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.alive == other.alive
    }
}
