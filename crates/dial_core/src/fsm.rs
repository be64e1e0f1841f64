//! Event-driven state transitions for control state enums
//!
//! # Example
//!
//! ```rust
//! use dial_core::fsm::StateTransitions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
//! enum Disclosure {
//!     #[default]
//!     Collapsed,
//!     Expanded,
//! }
//!
//! const TOGGLE: u32 = 1;
//!
//! impl StateTransitions for Disclosure {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Disclosure::Collapsed, TOGGLE) => Some(Disclosure::Expanded),
//!             (Disclosure::Expanded, TOGGLE) => Some(Disclosure::Collapsed),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut state = Disclosure::default();
//! assert!(state.apply(TOGGLE));
//! assert_eq!(state, Disclosure::Expanded);
//! assert!(!state.apply(42));
//! ```

use std::hash::Hash;

/// Trait for state enums that transition on numeric events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;

    /// Apply `event` in place, returning whether the state changed
    fn apply(&mut self, event: u32) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                tracing::debug!("{:?} -> {:?} (event {})", self, next, event);
                *self = next;
                true
            }
            _ => false,
        }
    }
}
