//! Tests for TurnClock

use energy_market_core_rs::TurnClock;

#[test]
fn test_turn_clock_new() {
    let clock = TurnClock::new(12);
    assert_eq!(clock.current_turn(), 0);
    assert_eq!(clock.number_of_turns(), 12);
    assert!(!clock.is_bootstrapped());
    assert!(!clock.is_finished());
}

#[test]
fn test_advance_turn() {
    let mut clock = TurnClock::new(12);

    clock.advance();
    assert_eq!(clock.current_turn(), 1);
    assert!(clock.is_bootstrapped());

    clock.advance();
    assert_eq!(clock.current_turn(), 2);
    assert_eq!(clock.remaining_turns(), 11);
}

#[test]
fn test_finished_after_last_turn() {
    let mut clock = TurnClock::new(3);

    // Bootstrap plus three monthly turns
    for _ in 0..3 {
        clock.advance();
    }
    assert!(!clock.is_finished());
    assert_eq!(clock.remaining_turns(), 1);

    clock.advance();
    assert!(clock.is_finished());
    assert_eq!(clock.remaining_turns(), 0);
}
