//! Dial Core
//!
//! Component-agnostic building blocks for headless interactive controls:
//!
//! - **Value reconciliation**: controlled / uncontrolled values with
//!   redundancy-free change notification
//! - **Pointer geometry**: pointer coordinates to quantized domain values
//! - **State machines**: numeric-event transitions for control states
//! - **Roving focus**: enabled-aware next / previous / first / last targets
//! - **Document listeners**: scoped subscriptions released on drop
//! - **Accessibility**: per-part ARIA state and hidden form fields
//!
//! # Example
//!
//! ```rust
//! use dial_core::{DomainRange, ValueController};
//!
//! let range = DomainRange::new(0.0, 10.0, 0.5);
//! let value = ValueController::new(None, 0.0).sanitize(move |v| range.snap(v));
//!
//! value.request(3.3);
//! assert_eq!(value.current_value(), 3.5);
//! ```

pub mod a11y;
pub mod controllable;
pub mod error;
pub mod events;
pub mod form;
pub mod fsm;
pub mod geometry;
pub mod listeners;
pub mod roster;

pub use a11y::{AccessibilityProps, Role};
pub use controllable::{ChangeCallback, ControlMode, Sanitizer, ValueController};
pub use error::{Error, Result};
pub use events::{event_types, ElementId, EventType, KeyCode, Orientation, Point, PointerEvent};
pub use form::{FormField, InputKind};
pub use fsm::StateTransitions;
pub use geometry::{DomainRange, PointerGeometryMapper, Rect};
pub use listeners::{ListenerHub, ListenerId, Phase, PointerHandler, Subscription};
pub use roster::{FocusRoster, RosterEntry, RosterMove};
