//! Cascade priority for generated module styles.
//!
//! Every declaration block emitted during a page render carries a [`StylePriority`]: the
//! resolved base priority, the emitting module's order index within its parent, and its
//! nesting depth. Rules inside one media bucket are serialized in ascending priority so
//! later, higher-priority rules win by source order.

#![forbid(unsafe_code)]

use core::cmp::Ordering;
use core::fmt::Write as _;

use log::warn;
use serde::{Deserialize, Serialize};

/// Base priority used when neither the caller nor a preset context provides one.
pub const DEFAULT_PRIORITY: i64 = 10;

/// How two priorities are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityMode {
    /// Lexicographic `(base, order_index, ancestor_count)`.
    #[default]
    Tuple,
    /// Decimal concatenation of the three components, compared as one integer.
    ///
    /// Reproduces the historical ordering, including its digit-count sensitivity
    /// (`10·5·0 = 1050` sorts before `10·50·0 = 10500`, but `10·5·12 = 10512` sorts after
    /// `10·50·0`).
    Legacy,
}

/// Priority of one stored declaration block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StylePriority {
    /// Explicit, preset, or default priority.
    pub base: i64,
    /// Position of the emitting module among its siblings.
    pub order_index: u32,
    /// Number of ancestors of the emitting module.
    pub ancestor_count: u32,
}

impl StylePriority {
    /// Construct a priority value from its components.
    #[inline]
    pub const fn new(base: i64, order_index: u32, ancestor_count: u32) -> Self {
        Self {
            base,
            order_index,
            ancestor_count,
        }
    }

    /// Decimal concatenation of the components parsed back into one integer.
    ///
    /// Saturates when the digits do not fit in an `i64`.
    pub fn legacy_value(&self) -> i64 {
        let mut digits = String::with_capacity(24);
        if write!(
            digits,
            "{}{}{}",
            self.base, self.order_index, self.ancestor_count
        )
        .is_err()
        {
            return saturated(self.base);
        }
        digits.parse::<i64>().unwrap_or_else(|_| {
            warn!("style priority {digits} overflows; saturating");
            saturated(self.base)
        })
    }

    /// Compare two priorities under `mode`. Lower values serialize first.
    pub fn compare(&self, other: &Self, mode: PriorityMode) -> Ordering {
        match mode {
            PriorityMode::Tuple => self.cmp(other),
            PriorityMode::Legacy => self.legacy_value().cmp(&other.legacy_value()),
        }
    }
}

/// Saturation bound matching the sign of the base priority.
const fn saturated(base: i64) -> i64 {
    if base < 0 { i64::MIN } else { i64::MAX }
}

/// Candidate sources for the base priority, highest precedence first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrioritySources {
    /// `priority` passed with the style request.
    pub explicit: Option<i64>,
    /// `presetPriority` passed with the style request.
    pub preset: Option<i64>,
    /// Priority of the preset currently being rendered, if any.
    pub context_preset: Option<i64>,
}

impl PrioritySources {
    /// First available source, else `fallback`.
    #[inline]
    pub fn resolve(&self, fallback: i64) -> i64 {
        self.explicit
            .or(self.preset)
            .or(self.context_preset)
            .unwrap_or(fallback)
    }
}

/// Compose the priority of a declaration block emitted by one module.
pub fn compose_priority(
    sources: &PrioritySources,
    fallback: i64,
    order_index: u32,
    ancestor_count: u32,
) -> StylePriority {
    StylePriority::new(sources.resolve(fallback), order_index, ancestor_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_value_concatenates_digits() {
        assert_eq!(StylePriority::new(10, 5, 0).legacy_value(), 1050);
        assert_eq!(StylePriority::new(10, 50, 3).legacy_value(), 10503);
        assert_eq!(StylePriority::new(-2, 1, 4).legacy_value(), -214);
    }

    #[test]
    fn legacy_value_saturates_on_overflow() {
        let huge = StylePriority::new(i64::MAX, 9, 9);
        assert_eq!(huge.legacy_value(), i64::MAX);
        let tiny = StylePriority::new(i64::MIN, 9, 9);
        assert_eq!(tiny.legacy_value(), i64::MIN);
    }
}
