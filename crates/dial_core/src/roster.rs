//! Ordered focus targets for roving keyboard navigation
//!
//! A [`FocusRoster`] is rebuilt whenever a control's options or triggers
//! change. It never stores focus itself; it only answers "where does focus
//! go from here".

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// One focusable trigger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: String,
    pub disabled: bool,
}

/// Direction of a roving-focus move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RosterMove {
    Next,
    Previous,
    First,
    Last,
}

/// Ordered sequence of focusable identifiers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusRoster {
    entries: SmallVec<[RosterEntry; 8]>,
}

impl FocusRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, disabled)` pairs, rejecting duplicate ids
    pub fn try_from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut roster = Self::new();
        for (id, disabled) in entries {
            let id = id.into();
            if roster.index_of(&id).is_some() {
                return Err(Error::DuplicateId(id));
            }
            roster.entries.push(RosterEntry { id, disabled });
        }
        Ok(roster)
    }

    /// Build from `(id, disabled)` pairs, keeping the first of any duplicates
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut roster = Self::new();
        for (id, disabled) in entries {
            let id = id.into();
            if roster.index_of(&id).is_some() {
                tracing::warn!("duplicate focus target '{}' ignored", id);
                continue;
            }
            roster.entries.push(RosterEntry { id, disabled });
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.id.as_str())
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|entry| !entry.disabled)
    }

    /// First enabled entry
    pub fn first(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.is_enabled(i))
    }

    /// Last enabled entry
    pub fn last(&self) -> Option<usize> {
        (0..self.len()).rev().find(|&i| self.is_enabled(i))
    }

    /// Next enabled entry after `from`
    ///
    /// Wraps to the start when `wrap` is set, otherwise stays on `from`.
    pub fn next(&self, from: usize, wrap: bool) -> Option<usize> {
        let after = (from + 1..self.len()).find(|&i| self.is_enabled(i));
        match after {
            Some(i) => Some(i),
            None if wrap => self.first(),
            None => self.stay(from),
        }
    }

    /// Previous enabled entry before `from`
    ///
    /// Wraps to the end when `wrap` is set, otherwise stays on `from`.
    pub fn previous(&self, from: usize, wrap: bool) -> Option<usize> {
        let before = (0..from.min(self.len())).rev().find(|&i| self.is_enabled(i));
        match before {
            Some(i) => Some(i),
            None if wrap => self.last(),
            None => self.stay(from),
        }
    }

    /// Resolve a move from the current position (`None` = nothing focused)
    pub fn resolve(&self, from: Option<usize>, movement: RosterMove, wrap: bool) -> Option<usize> {
        match (movement, from) {
            (RosterMove::First, _) | (RosterMove::Next, None) => self.first(),
            (RosterMove::Last, _) | (RosterMove::Previous, None) => self.last(),
            (RosterMove::Next, Some(i)) => self.next(i, wrap),
            (RosterMove::Previous, Some(i)) => self.previous(i, wrap),
        }
    }

    fn stay(&self, from: usize) -> Option<usize> {
        if self.is_enabled(from) {
            Some(from)
        } else {
            self.first()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> FocusRoster {
        FocusRoster::from_entries([("a", false), ("b", true), ("c", false), ("d", false)])
    }

    #[test]
    fn test_next_skips_disabled() {
        let r = roster();
        assert_eq!(r.next(0, false), Some(2));
        assert_eq!(r.previous(2, false), Some(0));
    }

    #[test]
    fn test_wrap_and_clamp() {
        let r = roster();
        assert_eq!(r.next(3, true), Some(0));
        assert_eq!(r.next(3, false), Some(3));
        assert_eq!(r.previous(0, true), Some(3));
        assert_eq!(r.previous(0, false), Some(0));
    }

    #[test]
    fn test_first_last() {
        let r = FocusRoster::from_entries([("a", true), ("b", false), ("c", false), ("d", true)]);
        assert_eq!(r.first(), Some(1));
        assert_eq!(r.last(), Some(2));
        assert_eq!(r.resolve(None, RosterMove::Next, false), Some(1));
        assert_eq!(r.resolve(None, RosterMove::Previous, false), Some(2));
        assert_eq!(r.resolve(Some(2), RosterMove::First, false), Some(1));
    }

    #[test]
    fn test_all_disabled() {
        let r = FocusRoster::from_entries([("a", true), ("b", true)]);
        assert_eq!(r.first(), None);
        assert_eq!(r.next(0, true), None);
        assert_eq!(r.resolve(None, RosterMove::Last, true), None);
    }

    #[test]
    fn test_duplicates() {
        assert_eq!(
            FocusRoster::try_from_entries([("a", false), ("a", false)]),
            Err(Error::DuplicateId("a".into()))
        );
        let r = FocusRoster::from_entries([("a", false), ("a", true), ("b", false)]);
        assert_eq!(r.len(), 2);
        assert!(r.is_enabled(0));
        assert_eq!(r.index_of("b"), Some(1));
    }
}
