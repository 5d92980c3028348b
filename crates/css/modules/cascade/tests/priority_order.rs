#![cfg(test)]

use core::cmp::Ordering;
use core::error::Error;
use css_cascade::{DEFAULT_PRIORITY, PriorityMode, PrioritySources, StylePriority, compose_priority};

#[test]
fn explicit_priority_wins_over_preset_sources() {
    let sources = PrioritySources {
        explicit: Some(40),
        preset: Some(20),
        context_preset: Some(5),
    };
    assert_eq!(sources.resolve(DEFAULT_PRIORITY), 40);
}

#[test]
fn preset_argument_wins_over_context_preset() {
    let sources = PrioritySources {
        explicit: None,
        preset: Some(20),
        context_preset: Some(5),
    };
    assert_eq!(sources.resolve(DEFAULT_PRIORITY), 20);
}

#[test]
fn context_preset_then_default() {
    let with_context = PrioritySources {
        context_preset: Some(5),
        ..PrioritySources::default()
    };
    assert_eq!(with_context.resolve(DEFAULT_PRIORITY), 5);
    assert_eq!(PrioritySources::default().resolve(DEFAULT_PRIORITY), 10);
}

#[test]
fn higher_base_always_outranks_in_tuple_mode() {
    let low = compose_priority(&PrioritySources::default(), DEFAULT_PRIORITY, 999, 99);
    let high = StylePriority::new(11, 0, 0);
    assert_eq!(low.compare(&high, PriorityMode::Tuple), Ordering::Less);
}

#[test]
fn legacy_mode_is_digit_count_sensitive() {
    // 10|5|12 = 10512 and 10|50|0 = 10500.
    let shallow_many_ancestors = StylePriority::new(10, 5, 12);
    let later_sibling = StylePriority::new(10, 50, 0);
    assert_eq!(
        shallow_many_ancestors.compare(&later_sibling, PriorityMode::Legacy),
        Ordering::Greater
    );
    assert_eq!(
        shallow_many_ancestors.compare(&later_sibling, PriorityMode::Tuple),
        Ordering::Less
    );
}

#[test]
fn equal_priorities_compare_equal_in_both_modes() {
    let left = StylePriority::new(10, 2, 1);
    let right = StylePriority::new(10, 2, 1);
    assert_eq!(left.compare(&right, PriorityMode::Tuple), Ordering::Equal);
    assert_eq!(left.compare(&right, PriorityMode::Legacy), Ordering::Equal);
}

#[test]
fn priority_mode_deserializes_from_lowercase() -> Result<(), Box<dyn Error>> {
    let mode: PriorityMode = serde_json::from_str("\"legacy\"")?;
    assert_eq!(mode, PriorityMode::Legacy);
    let tuple: PriorityMode = serde_json::from_str("\"tuple\"")?;
    assert_eq!(tuple, PriorityMode::Tuple);
    Ok(())
}
