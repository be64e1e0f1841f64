//! Headless controls built on dial_core primitives
//!
//! Each component follows a consistent pattern:
//! - Builder function (e.g., `slider()`) with a `*Props` plain-data config
//! - State enum implementing `StateTransitions`
//! - Cheap `Rc` handle exposing input entry points and view data

pub mod select;
pub mod slider;
pub mod switch;
pub mod tabs;

pub use select::{
    select, EntryView, ListboxSelect, SelectBuilder, SelectContent, SelectEntry, SelectOption,
    SelectProps, SelectState,
};
pub use slider::{
    slider, MarkView, RangeSlider, SliderBuilder, SliderMark, SliderPart, SliderProps,
    SliderState, ThumbView,
};
pub use switch::{switch, SwitchBuilder, SwitchProps, SwitchState, ToggleSwitch};
pub use tabs::{
    tabs, ActivationMode, PanelView, PanelVisibility, TabGroup, TabItem, TabsBuilder, TabsProps,
    TriggerView,
};
