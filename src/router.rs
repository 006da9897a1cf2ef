//! Interface router
//!
//! Per-session state machine over {welcome, flight, hotel, shopping}.
//! Starts at welcome and has no terminal state; a new chat session resets it.
//!
//! Entering a domain panel asks for exactly one prefetch of that domain.
//! Staying on the same panel asks for none.

use crate::models::{Domain, InterfaceState};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionCause {
    Intent,
    Navigation,
}

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transition {
    pub from: InterfaceState,
    pub to: InterfaceState,
    /// Set only when the panel actually changed.
    pub cause: Option<TransitionCause>,
    /// Domain to prefetch, at most once per transition.
    pub prefetch: Option<Domain>,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    fn stay(state: InterfaceState) -> Self {
        Self {
            from: state,
            to: state,
            cause: None,
            prefetch: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceRouter {
    state: InterfaceState,
}

impl InterfaceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InterfaceState {
        self.state
    }

    /// Evaluate one cycle. Explicit navigation beats the inferred intent.
    pub fn apply(
        &mut self,
        intent: Option<Domain>,
        navigation: Option<InterfaceState>,
    ) -> Transition {
        let (target, cause) = match (navigation, intent) {
            (Some(target), _) => (target, TransitionCause::Navigation),
            (None, Some(domain)) => (InterfaceState::from(domain), TransitionCause::Intent),
            (None, None) => return Transition::stay(self.state),
        };

        if target == self.state {
            return Transition::stay(self.state);
        }

        let transition = Transition {
            from: self.state,
            to: target,
            cause: Some(cause),
            prefetch: target.domain(),
        };

        debug!(
            from = %transition.from,
            to = %transition.to,
            cause = ?cause,
            "Interface transition"
        );

        self.state = target;
        transition
    }

    pub fn on_intent(&mut self, intent: Option<Domain>) -> Transition {
        self.apply(intent, None)
    }

    pub fn navigate(&mut self, target: InterfaceState) -> Transition {
        self.apply(None, Some(target))
    }

    /// New chat session.
    pub fn reset(&mut self) {
        self.state = InterfaceState::Welcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(InterfaceRouter::new().state(), InterfaceState::Welcome);
    }

    #[test]
    fn test_intent_then_repeat_then_navigation() {
        let mut router = InterfaceRouter::new();
        let mut prefetches = Vec::new();

        let t = router.on_intent(Some(Domain::Hotel));
        prefetches.extend(t.prefetch);
        assert_eq!(router.state(), InterfaceState::Hotel);
        assert_eq!(t.cause, Some(TransitionCause::Intent));
        assert_eq!(prefetches, vec![Domain::Hotel]);

        let t = router.on_intent(Some(Domain::Hotel));
        prefetches.extend(t.prefetch);
        assert!(!t.changed());
        assert_eq!(prefetches.len(), 1);

        let t = router.navigate(InterfaceState::Shopping);
        prefetches.extend(t.prefetch);
        assert_eq!(router.state(), InterfaceState::Shopping);
        assert_eq!(t.cause, Some(TransitionCause::Navigation));
        assert_eq!(prefetches, vec![Domain::Hotel, Domain::Shopping]);
    }

    #[test]
    fn test_no_intent_stays() {
        let mut router = InterfaceRouter::new();
        router.on_intent(Some(Domain::Flight));
        let t = router.on_intent(None);
        assert_eq!(t, Transition::stay(InterfaceState::Flight));
    }

    #[test]
    fn test_navigation_overrides_intent() {
        let mut router = InterfaceRouter::new();
        let t = router.apply(Some(Domain::Flight), Some(InterfaceState::Hotel));
        assert_eq!(t.to, InterfaceState::Hotel);
        assert_eq!(t.prefetch, Some(Domain::Hotel));

        // Navigation to the current panel suppresses the intent too.
        let t = router.apply(Some(Domain::Flight), Some(InterfaceState::Hotel));
        assert!(!t.changed());
        assert_eq!(t.prefetch, None);
        assert_eq!(router.state(), InterfaceState::Hotel);
    }

    #[test]
    fn test_navigate_to_welcome_has_no_prefetch() {
        let mut router = InterfaceRouter::new();
        router.on_intent(Some(Domain::Shopping));
        let t = router.navigate(InterfaceState::Welcome);
        assert!(t.changed());
        assert_eq!(t.prefetch, None);
    }

    #[test]
    fn test_reset() {
        let mut router = InterfaceRouter::new();
        router.on_intent(Some(Domain::Flight));
        router.reset();
        assert_eq!(router.state(), InterfaceState::Welcome);

        // Re-entering after a reset is a fresh transition.
        let t = router.on_intent(Some(Domain::Flight));
        assert_eq!(t.prefetch, Some(Domain::Flight));
    }
}
