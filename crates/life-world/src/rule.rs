//! The B3/S23 transition rule.

/// Neighbour count that brings a dead cell to life
pub const BIRTH: u8 = 3;

/// Neighbour counts that keep a live cell alive
pub const SURVIVAL: [u8; 2] = [2, 3];

/// Next state of a cell given its current state and live neighbour count.
#[inline]
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    match (alive, neighbours) {
        (true, n) => SURVIVAL.contains(&n),
        (false, n) => n == BIRTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survival() {
        for n in 0..=8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "alive with {} neighbours", n);
        }
    }

    #[test]
    fn test_birth() {
        for n in 0..=8 {
            assert_eq!(next_state(false, n), n == 3, "dead with {} neighbours", n);
        }
    }
}
