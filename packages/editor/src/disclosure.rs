//! # Disclosure Tracking
//!
//! Which section editors are expanded. Purely presentational: nothing here
//! ever reaches the remote store, only the session cache.
//!
//! Entries for sections that are no longer in the list survive pruning until
//! the author has toggled something at least once.

use casework_common::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-section disclosure state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Disclosure {
    Unset,
    Open,
    Closed,
}

impl Disclosure {
    fn from_entry(entry: Option<bool>) -> Self {
        match entry {
            None => Disclosure::Unset,
            Some(true) => Disclosure::Open,
            Some(false) => Disclosure::Closed,
        }
    }

    pub fn resolve(self, default_open: bool) -> bool {
        match self {
            Disclosure::Unset => default_open,
            Disclosure::Open => true,
            Disclosure::Closed => false,
        }
    }
}

/// Serialized form kept in the session cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureSnapshot {
    #[serde(default)]
    pub open: BTreeMap<SectionId, bool>,
    #[serde(default)]
    pub user_toggled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureTracker {
    open: BTreeMap<SectionId, bool>,
    user_toggled: bool,
}

impl DisclosureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: DisclosureSnapshot) -> Self {
        Self {
            open: snapshot.open,
            user_toggled: snapshot.user_toggled,
        }
    }

    pub fn snapshot(&self) -> DisclosureSnapshot {
        DisclosureSnapshot {
            open: self.open.clone(),
            user_toggled: self.user_toggled,
        }
    }

    pub fn state(&self, id: &SectionId) -> Disclosure {
        Disclosure::from_entry(self.open.get(id).copied())
    }

    pub fn is_open(&self, id: &SectionId, default_open: bool) -> bool {
        self.state(id).resolve(default_open)
    }

    /// Flip a section and record that the author toggled something
    ///
    /// Returns the new state.
    pub fn toggle(&mut self, id: &SectionId, default_open: bool) -> bool {
        let next = !self.is_open(id, default_open);
        self.open.insert(id.clone(), next);
        self.user_toggled = true;
        next
    }

    /// Mark open without counting as an author toggle
    pub fn open(&mut self, id: &SectionId) {
        self.open.insert(id.clone(), true);
    }

    /// Drop the entry for `id`, returning what it was
    pub fn forget(&mut self, id: &SectionId) -> Disclosure {
        Disclosure::from_entry(self.open.remove(id))
    }

    /// Put back a state returned by `forget`
    pub fn restore(&mut self, id: &SectionId, state: Disclosure) {
        match state {
            Disclosure::Unset => {
                self.open.remove(id);
            }
            Disclosure::Open => {
                self.open.insert(id.clone(), true);
            }
            Disclosure::Closed => {
                self.open.insert(id.clone(), false);
            }
        }
    }

    /// Remove entries for ids not in `valid`; returns how many were dropped
    pub fn prune_orphans<'a>(&mut self, valid: impl IntoIterator<Item = &'a SectionId>) -> usize {
        if !self.user_toggled {
            return 0;
        }
        let valid: BTreeSet<&SectionId> = valid.into_iter().collect();
        let before = self.open.len();
        self.open.retain(|id, _| valid.contains(id));
        before - self.open.len()
    }

    pub fn has_user_toggled(&self) -> bool {
        self.user_toggled
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SectionId {
        SectionId::from(s)
    }

    #[test]
    fn test_toggle_from_unset_uses_default() {
        let mut tracker = DisclosureTracker::new();
        assert_eq!(tracker.state(&id("a")), Disclosure::Unset);

        assert!(tracker.toggle(&id("a"), false));
        assert!(!tracker.toggle(&id("b"), true));
        assert!(!tracker.toggle(&id("a"), false));
        assert!(tracker.has_user_toggled());
    }

    #[test]
    fn test_open_is_not_a_user_toggle() {
        let mut tracker = DisclosureTracker::new();
        tracker.open(&id("a"));
        assert_eq!(tracker.state(&id("a")), Disclosure::Open);
        assert!(!tracker.has_user_toggled());
    }

    #[test]
    fn test_prune_waits_for_first_toggle() {
        let mut tracker = DisclosureTracker::new();
        tracker.open(&id("a"));
        tracker.open(&id("gone"));

        assert_eq!(tracker.prune_orphans(&[id("a")]), 0);
        assert_eq!(tracker.len(), 2);

        tracker.toggle(&id("a"), false);
        assert_eq!(tracker.prune_orphans(&[id("a")]), 1);
        assert_eq!(tracker.state(&id("gone")), Disclosure::Unset);
        assert_eq!(tracker.state(&id("a")), Disclosure::Closed);
    }

    #[test]
    fn test_forget_and_restore() {
        let mut tracker = DisclosureTracker::new();
        tracker.toggle(&id("a"), true);

        let state = tracker.forget(&id("a"));
        assert_eq!(state, Disclosure::Closed);
        assert!(tracker.is_empty());

        tracker.restore(&id("a"), state);
        assert_eq!(tracker.state(&id("a")), Disclosure::Closed);

        tracker.restore(&id("a"), Disclosure::Unset);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_toggle_flag() {
        let mut tracker = DisclosureTracker::new();
        tracker.toggle(&id("a"), false);

        let json = serde_json::to_string(&tracker.snapshot()).unwrap();
        let restored = DisclosureTracker::from_snapshot(serde_json::from_str(&json).unwrap());
        assert_eq!(restored, tracker);
    }
}
