//! Closure state machine for one year.

use serde::{Deserialize, Serialize};

use super::error::YearError;
use super::registry::YearRegistry;

/// Where a year stands in the closure workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureState {
    /// Editable, not yet checked.
    Open,
    /// Closure checks are running.
    Validating,
    /// Checks passed, closure may proceed.
    Ready,
    /// Checks found blocking errors.
    Blocked,
    /// Summary and archival writes are in flight.
    Closing,
    /// Archived and read-only.
    Closed,
}

/// Input that moves a year between closure states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureEvent {
    /// Start closure checks.
    Validate,
    /// Checks found no blocking errors.
    Passed,
    /// Checks found blocking errors.
    Failed,
    /// Go back to editing.
    Reopen,
    /// Start the closure writes.
    Close,
    /// Closure writes finished.
    Committed,
    /// Closure writes failed part way.
    Aborted,
    /// Administrative rollback of a closed year.
    Unlock,
}

impl ClosureState {
    /// Current state of `year` according to the registry.
    #[must_use]
    pub fn of_year(registry: &YearRegistry, year: i32) -> Self {
        if registry.is_archived(year) {
            Self::Closed
        } else {
            Self::Open
        }
    }

    /// Applies `event`, returning the next state.
    pub fn apply(self, event: ClosureEvent) -> Result<Self, YearError> {
        use ClosureEvent as E;

        let next = match (self, event) {
            (Self::Open, E::Validate) => Self::Validating,
            (Self::Validating, E::Passed) => Self::Ready,
            (Self::Validating, E::Failed) => Self::Blocked,
            (Self::Blocked | Self::Ready, E::Reopen) => Self::Open,
            (Self::Ready, E::Close) => Self::Closing,
            (Self::Closing, E::Committed) => Self::Closed,
            (Self::Closing, E::Aborted) => Self::Open,
            (Self::Closed, E::Unlock) => Self::Open,
            (from, event) => return Err(YearError::InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// True when records of the year accept edits.
    #[must_use]
    pub fn is_editable(self) -> bool {
        !matches!(self, Self::Closing | Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_happy_path() {
        let state = ClosureState::Open
            .apply(ClosureEvent::Validate)
            .and_then(|s| s.apply(ClosureEvent::Passed))
            .and_then(|s| s.apply(ClosureEvent::Close))
            .and_then(|s| s.apply(ClosureEvent::Committed))
            .unwrap();
        assert_eq!(state, ClosureState::Closed);
    }

    #[test]
    fn test_blocked_returns_to_open() {
        let state = ClosureState::Validating
            .apply(ClosureEvent::Failed)
            .unwrap();
        assert_eq!(state, ClosureState::Blocked);
        assert_eq!(state.apply(ClosureEvent::Reopen), Ok(ClosureState::Open));
    }

    #[test]
    fn test_closed_only_leaves_through_unlock() {
        assert_eq!(
            ClosureState::Closed.apply(ClosureEvent::Unlock),
            Ok(ClosureState::Open)
        );
        assert!(ClosureState::Closed.apply(ClosureEvent::Reopen).is_err());
        assert!(ClosureState::Closed.apply(ClosureEvent::Validate).is_err());
    }

    #[rstest]
    #[case(ClosureState::Open, ClosureEvent::Close)]
    #[case(ClosureState::Blocked, ClosureEvent::Close)]
    #[case(ClosureState::Validating, ClosureEvent::Committed)]
    #[case(ClosureState::Open, ClosureEvent::Unlock)]
    #[case(ClosureState::Ready, ClosureEvent::Committed)]
    fn test_invalid_transitions(#[case] from: ClosureState, #[case] event: ClosureEvent) {
        assert_eq!(
            from.apply(event),
            Err(YearError::InvalidTransition { from, event })
        );
    }

    #[test]
    fn test_of_year() {
        let mut registry = YearRegistry::new(2026);
        registry.archived_years.insert(2025);
        assert_eq!(ClosureState::of_year(&registry, 2025), ClosureState::Closed);
        assert_eq!(ClosureState::of_year(&registry, 2026), ClosureState::Open);
        assert!(!ClosureState::Closed.is_editable());
    }
}
