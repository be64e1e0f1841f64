//! Controlled / uncontrolled value reconciliation
//!
//! Every control reads its value through a [`ValueController`]. The mode is
//! latched at construction from the first observation: if the host supplied
//! a value the control is *controlled* and only ever reflects what the host
//! passes in, otherwise it owns an internal value seeded from the default.
//!
//! All mutations go through [`ValueController::request`], which notifies the
//! change callback at most once per distinct value. A request issued from
//! inside the callback is queued and delivered after the callback returns.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use dial_core::controllable::ValueController;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_cb = seen.clone();
//!
//! // Uncontrolled: seeded from the default, owns its value
//! let value = ValueController::new(None, 1)
//!     .on_change(move |v: &i32| seen_cb.borrow_mut().push(*v));
//!
//! value.request(2);
//! value.request(2);
//! assert_eq!(value.current_value(), 2);
//! assert_eq!(*seen.borrow(), vec![2]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

/// Change notification callback
///
/// Uses Rc since controls live on the single UI thread.
pub type ChangeCallback<T> = Rc<dyn Fn(&T)>;

/// Read-time repair applied to every value handed out
pub type Sanitizer<T> = Rc<dyn Fn(T) -> T>;

/// Which side owns the value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlMode {
    /// The host supplies the value every render
    Controlled,
    /// The control owns the value
    Uncontrolled,
}

enum Mode<T> {
    Controlled(RefCell<T>),
    Uncontrolled(RefCell<T>),
}

/// Reconciles a host-supplied value with an internally held fallback
pub struct ValueController<T> {
    mode: Mode<T>,
    /// Controlled mode: last requested value the host has not echoed yet
    pending: RefCell<Option<T>>,
    on_change: Option<ChangeCallback<T>>,
    sanitizer: Option<Sanitizer<T>>,
    notifying: Cell<bool>,
    /// Latest request made while `notifying`
    queued: RefCell<Option<T>>,
    warned_contradiction: Cell<bool>,
}

impl<T: Clone + PartialEq + Debug + 'static> ValueController<T> {
    /// Latch the mode from `value` and seed the internal value from
    /// `default_value` when uncontrolled
    pub fn new(value: Option<T>, default_value: T) -> Self {
        let mode = match value {
            Some(v) => Mode::Controlled(RefCell::new(v)),
            None => Mode::Uncontrolled(RefCell::new(default_value)),
        };
        Self {
            mode,
            pending: RefCell::new(None),
            on_change: None,
            sanitizer: None,
            notifying: Cell::new(false),
            queued: RefCell::new(None),
            warned_contradiction: Cell::new(false),
        }
    }

    /// Set the change callback
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        self.on_change = Some(Rc::new(callback));
        self
    }

    /// Set an already shared change callback
    pub fn on_change_shared(mut self, callback: Option<ChangeCallback<T>>) -> Self {
        self.on_change = callback;
        self
    }

    /// Repair values at read time (clamping, sorting, ...)
    pub fn sanitize<F>(mut self, sanitizer: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        self.sanitizer = Some(Rc::new(sanitizer));
        self
    }

    pub fn mode(&self) -> ControlMode {
        match self.mode {
            Mode::Controlled(_) => ControlMode::Controlled,
            Mode::Uncontrolled(_) => ControlMode::Uncontrolled,
        }
    }

    pub fn is_controlled(&self) -> bool {
        self.mode() == ControlMode::Controlled
    }

    /// The authoritative value: the host's if controlled, else the internal one
    pub fn current_value(&self) -> T {
        let raw = match &self.mode {
            Mode::Controlled(cell) | Mode::Uncontrolled(cell) => cell.borrow().clone(),
        };
        match &self.sanitizer {
            Some(sanitize) => sanitize(raw),
            None => raw,
        }
    }

    /// Request a new value
    ///
    /// Controlled: only notifies, trusting the host to pass the value back on
    /// the next [`sync`](Self::sync). Uncontrolled: stores and notifies.
    /// Returns `false` when `value` equals the previous value and nothing
    /// happened.
    pub fn request(&self, value: T) -> bool {
        let previous = self
            .pending
            .borrow()
            .clone()
            .unwrap_or_else(|| self.current_value());
        if previous == value {
            return false;
        }

        match &self.mode {
            Mode::Controlled(_) => {
                *self.pending.borrow_mut() = Some(value.clone());
            }
            Mode::Uncontrolled(cell) => {
                *cell.borrow_mut() = value.clone();
            }
        }

        if self.notifying.get() {
            tracing::debug!("value request {:?} queued behind the running notification", value);
            *self.queued.borrow_mut() = Some(value);
            return true;
        }

        if let Some(callback) = self.on_change.clone() {
            self.notifying.set(true);
            let mut next = Some(value);
            while let Some(value) = next {
                callback(&value);
                next = self.queued.borrow_mut().take();
            }
            self.notifying.set(false);
        }
        true
    }

    /// Per-render reconciliation with the host's value
    ///
    /// A contradiction of the latched mode (value vanishing from a
    /// controlled control, or appearing on an uncontrolled one) is logged
    /// once and otherwise ignored.
    pub fn sync(&self, value: Option<T>) {
        match (&self.mode, value) {
            (Mode::Controlled(cell), Some(v)) => {
                *cell.borrow_mut() = v;
                *self.pending.borrow_mut() = None;
            }
            (Mode::Uncontrolled(_), None) => {}
            (Mode::Controlled(_), None) => {
                self.warn_contradiction("controlled value was removed; keeping the last value")
            }
            (Mode::Uncontrolled(_), Some(_)) => self.warn_contradiction(
                "value supplied to an uncontrolled control; ignoring it, pass it at construction instead",
            ),
        }
    }

    fn warn_contradiction(&self, message: &str) {
        if !self.warned_contradiction.replace(true) {
            tracing::warn!("{}", message);
        }
    }
}

impl<T: Debug> Debug for ValueController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (mode, value) = match &self.mode {
            Mode::Controlled(cell) => ("controlled", cell),
            Mode::Uncontrolled(cell) => ("uncontrolled", cell),
        };
        f.debug_struct("ValueController")
            .field("mode", &mode)
            .field("value", &value.borrow())
            .field("pending", &self.pending.borrow())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
