/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The countdown timers behind `DT` and `ST`.

/// An 8-bit countdown timer, ticked once per interpreter cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Returns a stopped timer.
    pub fn new() -> Self {
        Timer::default()
    }

    /// Returns the current value.
    pub fn get(&self) -> u8 {
        self.value
    }

    /// Loads a new value.
    pub fn set(&mut self, value: u8) {
        self.value = value;
    }

    /// Counts down by one if the timer is running.
    ///
    /// Returns `true` only on the tick that brings the timer from 1 to 0.
    pub fn tick(&mut self) -> bool {
        if self.value > 0 {
            self.value -= 1;
            self.value == 0
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_once() {
        let mut timer = Timer::new();
        timer.set(2);
        assert!(!timer.tick());
        assert_eq!(timer.get(), 1);
        assert!(timer.tick());
        assert_eq!(timer.get(), 0);
        assert!(!timer.tick());
        assert_eq!(timer.get(), 0);
    }
}
