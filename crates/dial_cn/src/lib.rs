//! # Dial Component Library (dial_cn)
//!
//! Headless, accessible controls for the dashboard's settings panels.
//!
//! ## Philosophy
//!
//! Like Radix primitives sit under shadcn/ui, `dial_cn` owns state, input
//! handling and the accessibility contract, and leaves pixels to the host.
//!
//! - **Primitives**: `dial_core` provides value reconciliation, pointer
//!   geometry, roving focus and scoped document listeners
//! - **Components**: `dial_cn` composes them into controls
//!
//! ## Example
//!
//! ```rust
//! use dial_cn::prelude::*;
//!
//! let hub = ListenerHub::new();
//!
//! let temperature = cn::slider().max(2.0).step(0.1).default_value([0.7]).build(&hub);
//! let streaming = cn::switch().default_checked(true).build();
//! let provider = cn::select().option("openai", "OpenAI").option("anthropic", "Anthropic").build(&hub);
//! let section = cn::tabs().default_value("model").tab("model", "Model").tab("rag", "RAG").build();
//!
//! temperature.key_down(0, KeyCode::ARROW_UP);
//! assert_eq!(temperature.values(), vec![0.8]);
//! assert!(streaming.is_checked());
//! assert_eq!(provider.value(), None);
//! assert_eq!(section.value().as_deref(), Some("model"));
//! ```
//!
//! ## Components
//!
//! - **RangeSlider** - One or more thumbs over a stepped numeric range
//! - **ListboxSelect** - Trigger with a dismissable option list
//! - **TabGroup** - Roving-focus tabs with lazily mounted panels
//! - **ToggleSwitch** - Boolean switch with a hidden form checkbox

pub mod components;

pub use components::*;

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::select::select;
    pub use crate::components::slider::slider;
    pub use crate::components::switch::switch;
    pub use crate::components::tabs::tabs;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::select::{ListboxSelect, SelectOption, SelectState};
    pub use crate::components::slider::{RangeSlider, SliderPart, SliderState};
    pub use crate::components::switch::{SwitchState, ToggleSwitch};
    pub use crate::components::tabs::{ActivationMode, PanelVisibility, TabGroup, TabItem};
    // Re-export the core types every host needs to drive the controls
    pub use dial_core::{
        AccessibilityProps, ElementId, KeyCode, ListenerHub, Orientation, Point, PointerEvent,
        Rect, StateTransitions,
    };
}
