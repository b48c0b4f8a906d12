//! State machine trait for status enums.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their edges; `transition_to` and `is_terminal` come for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + std::fmt::Display {
    fn can_transition_to(&self, target: &Self) -> bool;

    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs a transition along a graph edge, or fails with `InvalidTransition`.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// True when the state has no outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Course {
        Ordered,
        Served,
        Cleared,
    }

    impl fmt::Display for Course {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl StateMachine for Course {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Course::Ordered => vec![Course::Served],
                Course::Served => vec![Course::Cleared],
                Course::Cleared => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_along_edge() {
        assert_eq!(Course::Ordered.transition_to(Course::Served), Ok(Course::Served));
    }

    #[test]
    fn transition_to_rejects_skipped_state() {
        assert_eq!(
            Course::Ordered.transition_to(Course::Cleared),
            Err(ValidationError::invalid_transition("Ordered", "Cleared"))
        );
    }

    #[test]
    fn terminal_state_has_no_edges() {
        assert!(Course::Cleared.is_terminal());
        assert!(!Course::Served.is_terminal());
    }
}
