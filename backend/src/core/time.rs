//! Time management for the simulation
//!
//! The market operates in discrete turns, one per month. Turn 0 is the
//! bootstrap month; turns 1..=number_of_turns consume a change record each.

use serde::{Deserialize, Serialize};

/// Tracks the current turn of a run
///
/// # Example
/// ```
/// use energy_market_core_rs::TurnClock;
///
/// let mut clock = TurnClock::new(2);
/// assert_eq!(clock.current_turn(), 0);
/// assert!(!clock.is_bootstrapped());
///
/// clock.advance();
/// clock.advance();
/// clock.advance();
/// assert_eq!(clock.current_turn(), 3);
/// assert!(clock.is_finished());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnClock {
    /// Next turn to execute
    current_turn: usize,
    /// Last turn with a change record
    number_of_turns: usize,
}

impl TurnClock {
    /// Create a clock positioned before the bootstrap turn
    pub fn new(number_of_turns: usize) -> Self {
        Self {
            current_turn: 0,
            number_of_turns,
        }
    }

    /// Move to the next turn
    pub fn advance(&mut self) {
        self.current_turn += 1;
    }

    /// Turn that will execute next
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn number_of_turns(&self) -> usize {
        self.number_of_turns
    }

    /// Whether the bootstrap turn already ran
    pub fn is_bootstrapped(&self) -> bool {
        self.current_turn > 0
    }

    /// Whether every turn, bootstrap included, has run
    pub fn is_finished(&self) -> bool {
        self.current_turn > self.number_of_turns
    }

    /// Turns still to execute, bootstrap included
    ///
    /// # Example
    /// ```
    /// use energy_market_core_rs::TurnClock;
    ///
    /// let mut clock = TurnClock::new(4);
    /// assert_eq!(clock.remaining_turns(), 5);
    /// clock.advance();
    /// assert_eq!(clock.remaining_turns(), 4);
    /// ```
    pub fn remaining_turns(&self) -> usize {
        (self.number_of_turns + 1).saturating_sub(self.current_turn)
    }
}
