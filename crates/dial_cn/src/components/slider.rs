//! Range slider with one or more thumbs
//!
//! Pointer presses open an interaction session that follows the pointer
//! through document-level listeners until release, so a drag that leaves the
//! track (or the window) still finishes cleanly. Keyboard steps, track clicks
//! and drags all produce values through the same quantized, ordered path.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use dial_cn::prelude::*;
//!
//! let hub = ListenerHub::new();
//! let committed = Rc::new(RefCell::new(Vec::new()));
//! let committed_cb = committed.clone();
//!
//! let volume = cn::slider()
//!     .default_value([50.0])
//!     .step(5.0)
//!     .on_commit(move |v| committed_cb.borrow_mut().push(v.to_vec()))
//!     .build(&hub);
//!
//! volume.set_track_bounds(Rect::new(0.0, 0.0, 200.0, 20.0));
//! volume.pointer_down(0, Point::new(160.0, 10.0));
//! volume.pointer_up();
//!
//! assert_eq!(volume.values(), vec![80.0]);
//! assert_eq!(*committed.borrow(), vec![vec![80.0]]);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dial_core::a11y::{AccessibilityProps, Role};
use dial_core::controllable::{ChangeCallback, ValueController};
use dial_core::events::{event_types, KeyCode, Orientation, Point};
use dial_core::form::FormField;
use dial_core::fsm::StateTransitions;
use dial_core::geometry::{DomainRange, PointerGeometryMapper, Rect};
use dial_core::listeners::{ListenerHub, Subscription};

/// Slack when comparing thumb spacing against the minimum gap
const GAP_EPSILON: f64 = 1e-9;

/// Callback receiving the full, sorted value sequence
pub type SliderCallback = Rc<dyn Fn(&[f64])>;

/// Host measurement of the track's current bounds
pub type BoundsCallback = Rc<dyn Fn() -> Option<Rect>>;

/// Slider-local FSM events
pub mod slider_events {
    /// A pointer session started on a thumb
    pub const DRAG_START: u32 = 30001;
    /// The pointer session ended (release, blur)
    pub const DRAG_END: u32 = 30002;
    pub const DISABLE: u32 = 30003;
    pub const ENABLE: u32 = 30004;
}

/// Slider interaction states
///
/// The dragged thumb lives on the open session; see
/// [`RangeSlider::dragging_thumb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SliderState {
    #[default]
    Idle,
    Dragging,
    Disabled,
}

impl StateTransitions for SliderState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use slider_events::*;
        match (self, event) {
            (SliderState::Idle, DRAG_START) => Some(SliderState::Dragging),
            (SliderState::Dragging, DRAG_END) => Some(SliderState::Idle),
            (SliderState::Idle | SliderState::Dragging, DISABLE) => Some(SliderState::Disabled),
            (SliderState::Disabled, ENABLE) => Some(SliderState::Idle),
            // Disabled ignores everything else
            _ => None,
        }
    }
}

/// Which part of the slider a pointer press hit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliderPart {
    Thumb(usize),
    Track,
}

/// A labelled tick on the track
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderMark {
    pub value: f64,
    pub label: Option<String>,
}

/// Plain-data slider configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SliderProps {
    /// Controlled value; latches controlled mode when present
    pub value: Option<Vec<f64>>,
    pub default_value: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub min_steps_between_thumbs: u32,
    pub orientation: Orientation,
    pub inverted: bool,
    pub disabled: bool,
    /// Form field name for the hidden inputs
    pub name: Option<String>,
    pub marks: Vec<SliderMark>,
}

impl Default for SliderProps {
    fn default() -> Self {
        Self {
            value: None,
            default_value: vec![0.0],
            min: 0.0,
            max: 100.0,
            step: 1.0,
            min_steps_between_thumbs: 0,
            orientation: Orientation::Horizontal,
            inverted: false,
            disabled: false,
            name: None,
            marks: Vec::new(),
        }
    }
}

/// Display data for one thumb
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbView {
    pub index: usize,
    pub value: f64,
    /// Position along the track in `[0, 100]`
    pub percent: f64,
    pub focused: bool,
    pub dragging: bool,
    pub accessibility: AccessibilityProps,
}

/// Display data for one mark
#[derive(Clone, Debug, PartialEq)]
pub struct MarkView {
    pub value: f64,
    pub label: Option<String>,
    pub percent: f64,
    /// Whether the mark lies inside the filled range
    pub in_range: bool,
}

/// An open pointer gesture
struct InteractionSession {
    thumb: usize,
    /// Track bounds measured once at gesture start
    rect: Rect,
    /// Last sequence applied during this gesture
    last_value: Option<Vec<f64>>,
    _listeners: [Subscription; 2],
}

struct SliderInner {
    hub: ListenerHub,
    range: DomainRange,
    mapper: PointerGeometryMapper,
    min_steps: u32,
    value: ValueController<Vec<f64>>,
    on_commit: Option<SliderCallback>,
    measure: Option<BoundsCallback>,
    track: Cell<Rect>,
    state: Cell<SliderState>,
    focused_thumb: Cell<Option<usize>>,
    session: RefCell<Option<InteractionSession>>,
    name: Option<String>,
    marks: Vec<SliderMark>,
}

/// Headless range slider
///
/// Cloning yields another handle to the same slider.
#[derive(Clone)]
pub struct RangeSlider {
    inner: Rc<SliderInner>,
}

impl RangeSlider {
    fn with_config(hub: &ListenerHub, config: SliderConfig) -> Self {
        let props = config.props;
        let range = DomainRange::new(props.min, props.max, props.step);
        let value = ValueController::new(props.value, props.default_value)
            .on_change_shared(config.on_change)
            .sanitize(move |mut values: Vec<f64>| {
                for v in values.iter_mut() {
                    *v = range.clamp(*v);
                }
                values.sort_by(f64::total_cmp);
                values
            });

        let state = if props.disabled {
            SliderState::Disabled
        } else {
            SliderState::Idle
        };

        Self {
            inner: Rc::new(SliderInner {
                hub: hub.clone(),
                range,
                mapper: PointerGeometryMapper::new(props.orientation, props.inverted),
                min_steps: props.min_steps_between_thumbs,
                value,
                on_commit: config.on_commit,
                measure: config.measure,
                track: Cell::new(Rect::default()),
                state: Cell::new(state),
                focused_thumb: Cell::new(None),
                session: RefCell::new(None),
                name: props.name,
                marks: props.marks,
            }),
        }
    }

    /// Current value sequence, clamped and sorted
    pub fn values(&self) -> Vec<f64> {
        self.inner.value.current_value()
    }

    pub fn thumb_count(&self) -> usize {
        self.values().len()
    }

    pub fn range(&self) -> DomainRange {
        self.inner.range
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.mapper.orientation
    }

    pub fn state(&self) -> SliderState {
        self.inner.state.get()
    }

    pub fn is_disabled(&self) -> bool {
        self.state() == SliderState::Disabled
    }

    /// Thumb of the open pointer session, if any
    pub fn dragging_thumb(&self) -> Option<usize> {
        self.inner.session.borrow().as_ref().map(|s| s.thumb)
    }

    pub fn focused_thumb(&self) -> Option<usize> {
        self.inner.focused_thumb.get()
    }

    /// Per-render reconciliation with the host's controlled value
    pub fn sync_value(&self, value: Option<Vec<f64>>) {
        self.inner.value.sync(value);
    }

    /// Record the track's bounds as last laid out by the host
    pub fn set_track_bounds(&self, rect: Rect) {
        self.inner.track.set(rect);
    }

    /// Enable or disable the slider; disabling ends any open session
    pub fn set_disabled(&self, disabled: bool) {
        if disabled {
            self.end_session(false);
            self.transition(slider_events::DISABLE);
        } else {
            self.transition(slider_events::ENABLE);
        }
    }

    /// Route a pointer press on a slider part
    ///
    /// Thumb hits start a drag on that thumb. Track hits start a drag only on
    /// a single-thumb slider.
    pub fn pointer_down_on(&self, part: SliderPart, point: Point) {
        match part {
            SliderPart::Thumb(index) => self.pointer_down(index, point),
            SliderPart::Track if self.thumb_count() == 1 => self.pointer_down(0, point),
            SliderPart::Track => {
                tracing::debug!("track press ignored on a multi-thumb slider");
            }
        }
    }

    /// Start a pointer session on `thumb` and apply the value under `point`
    pub fn pointer_down(&self, thumb: usize, point: Point) {
        if self.is_disabled() {
            return;
        }
        if thumb >= self.thumb_count() {
            tracing::debug!("pointer down on unknown thumb {}", thumb);
            return;
        }
        // A second press without a release finishes the first gesture
        self.end_session(true);

        let rect = self.measure_track();
        let listeners = [
            self.document_listener(event_types::POINTER_MOVE, |slider, point| {
                slider.pointer_move(point)
            }),
            self.document_listener(event_types::POINTER_UP, |slider, _| slider.pointer_up()),
        ];
        *self.inner.session.borrow_mut() = Some(InteractionSession {
            thumb,
            rect,
            last_value: None,
            _listeners: listeners,
        });
        self.inner.focused_thumb.set(Some(thumb));
        self.transition(slider_events::DRAG_START);
        tracing::debug!("slider session opened on thumb {}", thumb);

        self.apply_pointer(point);
    }

    /// Follow the pointer during an open session
    pub fn pointer_move(&self, point: Point) {
        if self.is_disabled() {
            return;
        }
        self.apply_pointer(point);
    }

    /// Close the open session and commit the last applied value
    pub fn pointer_up(&self) {
        self.end_session(true);
    }

    /// Press and release at `point`; single-thumb sliders only
    pub fn track_click(&self, point: Point) {
        if self.thumb_count() != 1 {
            tracing::debug!("track click ignored on a multi-thumb slider");
            return;
        }
        self.pointer_down(0, point);
        self.pointer_up();
    }

    /// Handle a key on `thumb`, returning whether the key is a slider key
    pub fn key_down(&self, thumb: usize, key: KeyCode) -> bool {
        if self.is_disabled() {
            return false;
        }
        let values = self.values();
        let Some(&current) = values.get(thumb) else {
            return false;
        };
        let range = &self.inner.range;
        let target = match key {
            KeyCode::ARROW_LEFT | KeyCode::ARROW_DOWN => current - range.step(),
            KeyCode::ARROW_RIGHT | KeyCode::ARROW_UP => current + range.step(),
            KeyCode::PAGE_DOWN => current - range.page_step(),
            KeyCode::PAGE_UP => current + range.page_step(),
            KeyCode::HOME => range.min(),
            KeyCode::END => range.max(),
            _ => return false,
        };

        self.inner.focused_thumb.set(Some(thumb));
        let target = range.snap(target);
        if let Some((next, index)) = place_thumb(&values, thumb, target, range, self.inner.min_steps)
        {
            self.inner.focused_thumb.set(Some(index));
            if self.inner.value.request(next.clone()) {
                self.commit(&next);
            }
        }
        true
    }

    pub fn focus(&self, thumb: usize) {
        if thumb < self.thumb_count() {
            self.inner.focused_thumb.set(Some(thumb));
        }
    }

    /// Drop focus; an open session ends as if the pointer were released
    pub fn blur(&self) {
        self.inner.focused_thumb.set(None);
        self.end_session(true);
    }

    /// Filled span of the track as `(start, end)` percentages
    pub fn fill_range(&self) -> (f64, f64) {
        let values = self.values();
        let mapper = &self.inner.mapper;
        let range = &self.inner.range;
        let (start, end) = match values.as_slice() {
            [] => return (0.0, 0.0),
            [only] => (
                mapper.percent_for_value(range.min(), range),
                mapper.percent_for_value(*only, range),
            ),
            [first, .., last] => (
                mapper.percent_for_value(*first, range),
                mapper.percent_for_value(*last, range),
            ),
        };
        (start.min(end), start.max(end))
    }

    pub fn thumbs(&self) -> Vec<ThumbView> {
        let focused = self.focused_thumb();
        let dragging = self.dragging_thumb();
        let disabled = self.is_disabled();
        let range = &self.inner.range;

        self.values()
            .into_iter()
            .enumerate()
            .map(|(index, value)| ThumbView {
                index,
                value,
                percent: self.inner.mapper.percent_for_value(value, range),
                focused: focused == Some(index),
                dragging: dragging == Some(index),
                accessibility: AccessibilityProps {
                    value_min: Some(range.min()),
                    value_max: Some(range.max()),
                    value_now: Some(value),
                    orientation: Some(self.orientation()),
                    disabled,
                    tab_index: Some(if disabled { -1 } else { 0 }),
                    ..AccessibilityProps::new(Role::Slider)
                },
            })
            .collect()
    }

    pub fn marks(&self) -> Vec<MarkView> {
        let (start, end) = self.fill_range();
        let range = &self.inner.range;
        self.inner
            .marks
            .iter()
            .map(|mark| {
                let percent = self.inner.mapper.percent_for_value(mark.value, range);
                MarkView {
                    value: mark.value,
                    label: mark.label.clone(),
                    percent,
                    in_range: percent >= start && percent <= end,
                }
            })
            .collect()
    }

    /// Hidden inputs carrying the value: `name` for one thumb, `name[i]` per
    /// thumb otherwise
    pub fn form_fields(&self) -> Vec<FormField> {
        let Some(name) = &self.inner.name else {
            return Vec::new();
        };
        let values = self.values();
        let disabled = self.is_disabled();
        if values.len() == 1 {
            return vec![FormField::hidden(name.clone(), values[0].to_string()).disabled(disabled)];
        }
        values
            .iter()
            .enumerate()
            .map(|(i, v)| FormField::hidden(format!("{}[{}]", name, i), v.to_string()).disabled(disabled))
            .collect()
    }

    fn transition(&self, event: u32) {
        let mut state = self.inner.state.get();
        if state.apply(event) {
            self.inner.state.set(state);
        }
    }

    fn measure_track(&self) -> Rect {
        if let Some(measured) = self.inner.measure.as_ref().and_then(|measure| measure()) {
            self.inner.track.set(measured);
        }
        self.inner.track.get()
    }

    fn document_listener(
        &self,
        event_type: u32,
        handler: impl Fn(&RangeSlider, Point) + 'static,
    ) -> Subscription {
        let weak = Rc::downgrade(&self.inner);
        self.inner.hub.subscribe(event_type, move |event| {
            if let Some(inner) = weak.upgrade() {
                handler(&RangeSlider { inner }, event.point);
            }
        })
    }

    fn apply_pointer(&self, point: Point) {
        let (thumb, rect, base) = match self.inner.session.borrow().as_ref() {
            Some(session) => (session.thumb, session.rect, session.last_value.clone()),
            None => return,
        };
        let range = &self.inner.range;
        let Some(raw) = self.inner.mapper.value_at(point, rect, range) else {
            return;
        };
        let base = base.unwrap_or_else(|| self.values());
        let Some((next, index)) = place_thumb(&base, thumb, raw, range, self.inner.min_steps)
        else {
            return;
        };

        if let Some(session) = self.inner.session.borrow_mut().as_mut() {
            session.thumb = index;
            session.last_value = Some(next.clone());
        }
        self.inner.focused_thumb.set(Some(index));
        self.inner.value.request(next);
    }

    fn end_session(&self, commit: bool) {
        let Some(session) = self.inner.session.borrow_mut().take() else {
            return;
        };
        self.transition(slider_events::DRAG_END);
        let last_value = session.last_value.clone();
        drop(session);
        tracing::debug!("slider session closed");

        if commit {
            let values = last_value.unwrap_or_else(|| self.values());
            self.commit(&values);
        }
    }

    fn commit(&self, values: &[f64]) {
        if let Some(on_commit) = &self.inner.on_commit {
            on_commit(values);
        }
    }
}

impl std::fmt::Debug for RangeSlider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeSlider")
            .field("values", &self.values())
            .field("state", &self.state())
            .field("dragging_thumb", &self.dragging_thumb())
            .finish()
    }
}

/// Place thumb `thumb` of `values` at `raw`
///
/// With a minimum gap, a placement closer than `min_steps * step` to a
/// neighbour (or past it) is rejected. Without one, the sequence is re-sorted
/// and the returned index follows the moved thumb. Returns `None` when the
/// placement is rejected or changes nothing.
fn place_thumb(
    values: &[f64],
    thumb: usize,
    raw: f64,
    range: &DomainRange,
    min_steps: u32,
) -> Option<(Vec<f64>, usize)> {
    if thumb >= values.len() {
        return None;
    }

    let (next, index) = if min_steps > 0 && values.len() > 1 {
        let gap = f64::from(min_steps) * range.step();
        if thumb > 0 && raw < values[thumb - 1] + gap - GAP_EPSILON {
            return None;
        }
        if thumb + 1 < values.len() && raw > values[thumb + 1] - gap + GAP_EPSILON {
            return None;
        }
        let mut next = values.to_vec();
        next[thumb] = raw;
        (next, thumb)
    } else {
        let mut next: Vec<f64> = values
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != thumb)
            .map(|(_, v)| *v)
            .collect();
        let index = next.iter().filter(|v| **v < raw).count();
        next.insert(index, raw);
        (next, index)
    };

    if next.as_slice() == values {
        None
    } else {
        Some((next, index))
    }
}

/// Internal configuration for building a RangeSlider
#[derive(Clone, Default)]
struct SliderConfig {
    props: SliderProps,
    on_change: Option<ChangeCallback<Vec<f64>>>,
    on_commit: Option<SliderCallback>,
    measure: Option<BoundsCallback>,
}

/// Builder for creating RangeSlider controls with fluent API
pub struct SliderBuilder {
    config: SliderConfig,
}

impl SliderBuilder {
    pub fn new() -> Self {
        Self {
            config: SliderConfig::default(),
        }
    }

    /// Start from plain-data props (e.g. loaded from configuration)
    pub fn from_props(props: SliderProps) -> Self {
        Self {
            config: SliderConfig {
                props,
                ..Default::default()
            },
        }
    }

    /// Controlled value
    pub fn value(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.config.props.value = Some(values.into());
        self
    }

    /// Initial value when uncontrolled (default: `[0]`)
    pub fn default_value(mut self, values: impl Into<Vec<f64>>) -> Self {
        self.config.props.default_value = values.into();
        self
    }

    /// Set the minimum value (default: 0)
    pub fn min(mut self, min: f64) -> Self {
        self.config.props.min = min;
        self
    }

    /// Set the maximum value (default: 100)
    pub fn max(mut self, max: f64) -> Self {
        self.config.props.max = max;
        self
    }

    /// Set the step size (default: 1)
    pub fn step(mut self, step: f64) -> Self {
        self.config.props.step = step;
        self
    }

    /// Minimum distance between thumbs, in steps
    pub fn min_steps_between_thumbs(mut self, steps: u32) -> Self {
        self.config.props.min_steps_between_thumbs = steps;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.props.orientation = orientation;
        self
    }

    pub fn vertical(self) -> Self {
        self.orientation(Orientation::Vertical)
    }

    /// Put the maximum at the start of the axis
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.config.props.inverted = inverted;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.props.disabled = disabled;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.props.name = Some(name.into());
        self
    }

    pub fn mark(mut self, value: f64, label: Option<&str>) -> Self {
        self.config.props.marks.push(SliderMark {
            value,
            label: label.map(str::to_string),
        });
        self
    }

    /// Called with the whole sequence on every value change
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[f64]) + 'static,
    {
        self.config.on_change = Some(Rc::new(move |values: &Vec<f64>| callback(values)));
        self
    }

    /// Called once per finished gesture or keystroke
    pub fn on_commit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[f64]) + 'static,
    {
        self.config.on_commit = Some(Rc::new(callback));
        self
    }

    /// Measure the track at the start of every gesture
    pub fn measure_track<F>(mut self, measure: F) -> Self
    where
        F: Fn() -> Option<Rect> + 'static,
    {
        self.config.measure = Some(Rc::new(measure));
        self
    }

    pub fn build(self, hub: &ListenerHub) -> RangeSlider {
        RangeSlider::with_config(hub, self.config)
    }
}

impl Default for SliderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a slider builder
///
/// # Example
///
/// ```rust
/// use dial_cn::prelude::*;
///
/// let hub = ListenerHub::new();
/// let price = cn::slider()
///     .min(0.0)
///     .max(1000.0)
///     .step(10.0)
///     .default_value([200.0, 800.0])
///     .min_steps_between_thumbs(5)
///     .name("price")
///     .build(&hub);
///
/// assert_eq!(price.thumb_count(), 2);
/// assert_eq!(price.form_fields()[1].name, "price[1]");
/// ```
pub fn slider() -> SliderBuilder {
    SliderBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial_core::events::PointerEvent;

    fn track() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 10.0)
    }

    fn recorder() -> (Rc<RefCell<Vec<Vec<f64>>>>, impl Fn(&[f64]) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_cb = log.clone();
        (log, move |v: &[f64]| log_cb.borrow_mut().push(v.to_vec()))
    }

    #[test]
    fn test_place_thumb_respects_gap() {
        let range = DomainRange::new(0.0, 100.0, 1.0);
        let values = [10.0, 50.0, 90.0];

        assert_eq!(place_thumb(&values, 0, 50.0, &range, 1), None);
        assert_eq!(place_thumb(&values, 0, 60.0, &range, 1), None);
        assert_eq!(
            place_thumb(&values, 0, 49.0, &range, 1),
            Some((vec![49.0, 50.0, 90.0], 0))
        );
        assert_eq!(place_thumb(&values, 1, 50.0, &range, 1), None);
    }

    #[test]
    fn test_place_thumb_resorts_without_gap() {
        let range = DomainRange::new(0.0, 100.0, 1.0);
        assert_eq!(
            place_thumb(&[10.0, 50.0, 90.0], 0, 70.0, &range, 0),
            Some((vec![50.0, 70.0, 90.0], 1))
        );
        assert_eq!(
            place_thumb(&[10.0, 50.0], 1, 10.0, &range, 0),
            Some((vec![10.0, 10.0], 0))
        );
    }

    #[test]
    fn test_fsm_transitions() {
        use slider_events::*;
        let mut state = SliderState::Idle;
        assert!(state.apply(DRAG_START));
        assert_eq!(state, SliderState::Dragging);
        assert!(state.apply(DISABLE));
        assert!(!state.apply(DRAG_START));
        assert!(state.apply(ENABLE));
        assert_eq!(state, SliderState::Idle);
    }

    #[test]
    fn test_drag_session_via_document_listeners() {
        let hub = ListenerHub::new();
        let (changes, on_change) = recorder();
        let (commits, on_commit) = recorder();
        let s = slider()
            .default_value([0.0])
            .on_change(on_change)
            .on_commit(on_commit)
            .build(&hub);
        s.set_track_bounds(track());

        s.pointer_down(0, Point::new(20.0, 5.0));
        assert_eq!(s.state(), SliderState::Dragging);
        assert_eq!(hub.listener_count(), 2);

        // Moves land outside the track; the value clamps
        hub.dispatch(&PointerEvent::moved(40.0, 5.0));
        hub.dispatch(&PointerEvent::moved(400.0, 50.0));
        hub.dispatch(&PointerEvent::up(400.0, 50.0));

        assert_eq!(s.values(), vec![100.0]);
        assert_eq!(*changes.borrow(), vec![vec![20.0], vec![40.0], vec![100.0]]);
        assert_eq!(*commits.borrow(), vec![vec![100.0]]);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(s.state(), SliderState::Idle);
    }

    #[test]
    fn test_every_gesture_commits_once() {
        let hub = ListenerHub::new();
        let (changes, on_change) = recorder();
        let (commits, on_commit) = recorder();
        let s = slider()
            .default_value([80.0])
            .step(5.0)
            .on_change(on_change)
            .on_commit(on_commit)
            .build(&hub);
        s.set_track_bounds(track());

        s.pointer_down(0, Point::new(80.0, 5.0));
        s.pointer_up();
        s.track_click(Point::new(80.0, 5.0));
        assert!(changes.borrow().is_empty());
        assert_eq!(*commits.borrow(), vec![vec![80.0], vec![80.0]]);
    }

    #[test]
    fn test_rejected_drag_still_commits() {
        let hub = ListenerHub::new();
        let (commits, on_commit) = recorder();
        let s = slider()
            .default_value([40.0, 50.0])
            .min_steps_between_thumbs(10)
            .on_commit(on_commit)
            .build(&hub);
        s.set_track_bounds(track());

        s.pointer_down(0, Point::new(40.0, 5.0));
        hub.dispatch(&PointerEvent::moved(45.0, 5.0));
        hub.dispatch(&PointerEvent::up(45.0, 5.0));
        assert_eq!(s.values(), vec![40.0, 50.0]);
        assert_eq!(*commits.borrow(), vec![vec![40.0, 50.0]]);
    }

    #[test]
    fn test_page_keys_move_at_least_one_step() {
        let hub = ListenerHub::new();
        let s = slider().min(0.0).max(10.0).step(3.0).default_value([3.0]).build(&hub);

        s.key_down(0, KeyCode::PAGE_UP);
        assert_eq!(s.values(), vec![6.0]);
        s.key_down(0, KeyCode::PAGE_DOWN);
        s.key_down(0, KeyCode::PAGE_DOWN);
        assert_eq!(s.values(), vec![0.0]);
    }

    #[test]
    fn test_keyboard_steps() {
        let hub = ListenerHub::new();
        let (commits, on_commit) = recorder();
        let s = slider()
            .default_value([50.0])
            .step(5.0)
            .on_commit(on_commit)
            .build(&hub);

        assert!(s.key_down(0, KeyCode::ARROW_RIGHT));
        assert_eq!(s.values(), vec![55.0]);
        s.key_down(0, KeyCode::ARROW_DOWN);
        s.key_down(0, KeyCode::PAGE_UP);
        assert_eq!(s.values(), vec![60.0]);
        s.key_down(0, KeyCode::END);
        assert_eq!(s.values(), vec![100.0]);

        // Already at max: handled, but nothing changes
        assert!(s.key_down(0, KeyCode::ARROW_UP));
        assert!(!s.key_down(0, KeyCode::ENTER));
        assert_eq!(commits.borrow().len(), 4);
        assert_eq!(s.focused_thumb(), Some(0));
    }

    #[test]
    fn test_keyboard_respects_gap() {
        let hub = ListenerHub::new();
        let s = slider()
            .default_value([10.0, 11.0])
            .min_steps_between_thumbs(1)
            .build(&hub);
        s.key_down(0, KeyCode::ARROW_RIGHT);
        assert_eq!(s.values(), vec![10.0, 11.0]);
        s.key_down(1, KeyCode::HOME);
        assert_eq!(s.values(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_vertical_inverted_mapping() {
        let hub = ListenerHub::new();
        let s = slider().vertical().build(&hub);
        s.set_track_bounds(Rect::new(0.0, 0.0, 10.0, 100.0));
        s.track_click(Point::new(5.0, 25.0));
        assert_eq!(s.values(), vec![75.0]);

        let inverted = slider().inverted(true).build(&hub);
        inverted.set_track_bounds(track());
        inverted.track_click(Point::new(25.0, 5.0));
        assert_eq!(inverted.values(), vec![75.0]);
        assert_eq!(inverted.thumbs()[0].percent, 25.0);
    }

    #[test]
    fn test_track_click_ignored_for_multi_thumb() {
        let hub = ListenerHub::new();
        let s = slider().default_value([20.0, 80.0]).build(&hub);
        s.set_track_bounds(track());
        s.track_click(Point::new(50.0, 5.0));
        s.pointer_down_on(SliderPart::Track, Point::new(50.0, 5.0));
        assert_eq!(s.values(), vec![20.0, 80.0]);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_thumb_hit_routes_to_thumb() {
        let hub = ListenerHub::new();
        let s = slider().default_value([20.0, 80.0]).build(&hub);
        s.set_track_bounds(track());
        s.pointer_down_on(SliderPart::Thumb(1), Point::new(60.0, 5.0));
        assert_eq!(s.dragging_thumb(), Some(1));
        s.pointer_up();
        assert_eq!(s.values(), vec![20.0, 60.0]);
    }

    #[test]
    fn test_crossing_follows_thumb_without_gap() {
        let hub = ListenerHub::new();
        let s = slider().default_value([20.0, 80.0]).build(&hub);
        s.set_track_bounds(track());

        s.pointer_down(0, Point::new(20.0, 5.0));
        s.pointer_move(Point::new(90.0, 5.0));
        assert_eq!(s.dragging_thumb(), Some(1));
        s.pointer_move(Point::new(95.0, 5.0));
        s.pointer_up();
        assert_eq!(s.values(), vec![80.0, 95.0]);
    }

    #[test]
    fn test_measure_track_at_gesture_start() {
        let hub = ListenerHub::new();
        let bounds = Rc::new(Cell::new(track()));
        let bounds_cb = bounds.clone();
        let s = slider()
            .measure_track(move || Some(bounds_cb.get()))
            .build(&hub);

        s.pointer_down(0, Point::new(50.0, 5.0));
        // Layout changes mid-gesture are not observed until the next press
        bounds.set(Rect::new(0.0, 0.0, 200.0, 10.0));
        s.pointer_move(Point::new(80.0, 5.0));
        assert_eq!(s.values(), vec![80.0]);
        s.pointer_up();

        s.track_click(Point::new(50.0, 5.0));
        assert_eq!(s.values(), vec![25.0]);
    }

    #[test]
    fn test_blur_ends_session_with_commit() {
        let hub = ListenerHub::new();
        let (commits, on_commit) = recorder();
        let s = slider().on_commit(on_commit).build(&hub);
        s.set_track_bounds(track());
        s.pointer_down(0, Point::new(60.0, 5.0));
        s.blur();
        assert_eq!(*commits.borrow(), vec![vec![60.0]]);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(s.focused_thumb(), None);
    }

    #[test]
    fn test_disable_ends_session_and_suppresses_input() {
        let hub = ListenerHub::new();
        let (commits, on_commit) = recorder();
        let s = slider().on_commit(on_commit).build(&hub);
        s.set_track_bounds(track());
        s.pointer_down(0, Point::new(60.0, 5.0));

        s.set_disabled(true);
        assert_eq!(hub.listener_count(), 0);
        assert!(commits.borrow().is_empty());

        s.pointer_down(0, Point::new(10.0, 5.0));
        assert!(!s.key_down(0, KeyCode::HOME));
        assert_eq!(s.values(), vec![60.0]);
        assert_eq!(s.thumbs()[0].accessibility.tab_index, Some(-1));

        s.set_disabled(false);
        s.key_down(0, KeyCode::HOME);
        assert_eq!(s.values(), vec![0.0]);
    }

    #[test]
    fn test_drop_mid_gesture_releases_listeners() {
        let hub = ListenerHub::new();
        let s = slider().build(&hub);
        s.set_track_bounds(track());
        s.pointer_down(0, Point::new(60.0, 5.0));
        assert_eq!(hub.listener_count(), 2);

        drop(s);
        assert_eq!(hub.listener_count(), 0);
        hub.dispatch(&PointerEvent::up(0.0, 0.0));
    }

    #[test]
    fn test_controlled_values_sanitized() {
        let hub = ListenerHub::new();
        let s = slider().value([120.0, -5.0, 50.0]).build(&hub);
        assert_eq!(s.values(), vec![0.0, 50.0, 100.0]);
        assert_eq!(s.fill_range(), (0.0, 100.0));
    }

    #[test]
    fn test_form_fields_and_marks() {
        let hub = ListenerHub::new();
        let single = slider().default_value([40.0]).name("volume").build(&hub);
        assert_eq!(single.form_fields(), vec![FormField::hidden("volume", "40")]);

        let s = slider()
            .default_value([20.0, 60.0])
            .mark(0.0, Some("low"))
            .mark(50.0, None)
            .build(&hub);
        assert!(s.form_fields().is_empty());
        let marks = s.marks();
        assert!(!marks[0].in_range);
        assert!(marks[1].in_range);
        assert_eq!(marks[0].label.as_deref(), Some("low"));
    }

    #[test]
    fn test_thumb_accessibility() {
        let hub = ListenerHub::new();
        let s = slider().default_value([30.0]).build(&hub);
        let props = &s.thumbs()[0].accessibility;
        assert_eq!(props.attribute("role").as_deref(), Some("slider"));
        assert_eq!(props.attribute("aria-valuenow").as_deref(), Some("30"));
        assert_eq!(props.attribute("aria-orientation").as_deref(), Some("horizontal"));
    }
}
