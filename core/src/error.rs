//! Error kinds and recoverable-error telemetry.

use thiserror::Error;

/// The error kinds the simulation can raise.
///
/// Only [`SimError::FatalInvariantBroken`] is ever surfaced as an `Err` from
/// the public API (it aborts `World::new`); the rest are recoverable and are
/// counted in a [`RecoveredErrorTally`] rather than propagated, so the
/// simulation keeps advancing under them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// An operation addressed a coordinate outside the grid.
    #[error("coordinate out of grid bounds")]
    BoundsViolation,
    /// A command or event carried a value invalid for its field.
    #[error("invalid input state: {0}")]
    InvalidInputState(String),
    /// The aging rule table had no entry for an observed cell configuration.
    #[error("no aging rule matched the observed cell configuration")]
    RuleTableMiss,
    /// An entity or item could not be spawned (e.g. no free space).
    #[error("spawn failed: {0}")]
    SpawnFailure(String),
    /// A core invariant was violated in a way that cannot be recovered from.
    #[error("fatal invariant broken: {0}")]
    FatalInvariantBroken(String),
}

/// Per-kind counters for recoverable [`SimError`]s, queryable by adapters and
/// tests without ever propagating the error itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveredErrorTally {
    bounds_violations: u64,
    invalid_input_states: u64,
    rule_table_misses: u64,
    spawn_failures: u64,
}

impl RecoveredErrorTally {
    /// Records a [`SimError::BoundsViolation`].
    pub fn record_bounds_violation(&mut self) {
        self.bounds_violations += 1;
    }

    /// Records a [`SimError::InvalidInputState`].
    pub fn record_invalid_input_state(&mut self) {
        self.invalid_input_states += 1;
    }

    /// Records a [`SimError::RuleTableMiss`].
    pub fn record_rule_table_miss(&mut self) {
        self.rule_table_misses += 1;
    }

    /// Records a [`SimError::SpawnFailure`].
    pub fn record_spawn_failure(&mut self) {
        self.spawn_failures += 1;
    }

    /// Total bounds violations recorded so far.
    #[must_use]
    pub const fn bounds_violations(&self) -> u64 {
        self.bounds_violations
    }

    /// Total invalid-input-state occurrences recorded so far.
    #[must_use]
    pub const fn invalid_input_states(&self) -> u64 {
        self.invalid_input_states
    }

    /// Total rule-table misses recorded so far.
    #[must_use]
    pub const fn rule_table_misses(&self) -> u64 {
        self.rule_table_misses
    }

    /// Total spawn failures recorded so far.
    #[must_use]
    pub const fn spawn_failures(&self) -> u64 {
        self.spawn_failures
    }

    /// Sum of every recoverable error recorded so far.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.bounds_violations + self.invalid_input_states + self.rule_table_misses + self.spawn_failures
    }

    /// Records any recoverable error kind by matching on it. Panics if given
    /// [`SimError::FatalInvariantBroken`], which is never recoverable.
    pub fn record(&mut self, error: &SimError) {
        match error {
            SimError::BoundsViolation => self.record_bounds_violation(),
            SimError::InvalidInputState(_) => self.record_invalid_input_state(),
            SimError::RuleTableMiss => self.record_rule_table_miss(),
            SimError::SpawnFailure(_) => self.record_spawn_failure(),
            SimError::FatalInvariantBroken(_) => {
                unreachable!("fatal errors are never recoverable telemetry")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_accumulates_per_kind() {
        let mut tally = RecoveredErrorTally::default();
        tally.record(&SimError::BoundsViolation);
        tally.record(&SimError::RuleTableMiss);
        tally.record(&SimError::RuleTableMiss);
        assert_eq!(tally.bounds_violations(), 1);
        assert_eq!(tally.rule_table_misses(), 2);
        assert_eq!(tally.total(), 3);
    }
}
