//! Permit-status selection and its per-mode default/clear rules.
//!
//! Two selection widgets have shipped against the same data source: a
//! single-select dropdown and a multi-select checkbox grid with `APPROVED`
//! locked on. [`FilterPolicy`] carries both switches instead of picking one.
//!
//! Mode rules:
//!
//! | Entering | Selection |
//! |----------|-----------|
//! | `Name`   | cleared (a locked `APPROVED` survives) |
//! | `Street` | untouched; street queries take no filter |
//! | `Pin`    | `{APPROVED}` if empty, otherwise untouched |

use foodmap_core::{PermitStatus, SearchMode, StatusSet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterPolicy {
    /// `APPROVED` is always selected and cannot be toggled off.
    pub lock_approved: bool,
    /// `false` makes every selection replace the previous one.
    pub multi_select: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            lock_approved: false,
            multi_select: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusFilter {
    policy: FilterPolicy,
    selected: StatusSet,
}

impl StatusFilter {
    #[must_use]
    pub fn new(policy: FilterPolicy) -> Self {
        let mut filter = Self {
            policy,
            selected: StatusSet::new(),
        };
        filter.enforce_lock();
        filter
    }

    #[must_use]
    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// The raw selection, without any mode default applied.
    #[must_use]
    pub fn selection(&self) -> &StatusSet {
        &self.selected
    }

    /// Applies the default/clear rule for a mode being entered.
    pub fn on_mode_enter(&mut self, mode: SearchMode) {
        match mode {
            SearchMode::Name => {
                self.selected.clear();
                self.enforce_lock();
            }
            SearchMode::Street => {}
            SearchMode::Pin => {
                if self.selected.is_empty() {
                    self.selected.insert(PermitStatus::Approved);
                }
            }
        }
    }

    /// Statuses to send with a query issued in `mode`.
    ///
    /// Computed from the live selection on every call. Pin mode never sends
    /// an empty filter: it falls back to `{APPROVED}`.
    #[must_use]
    pub fn effective_statuses(&self, mode: SearchMode) -> StatusSet {
        match mode {
            SearchMode::Pin if self.selected.is_empty() => {
                StatusSet::from([PermitStatus::Approved])
            }
            _ => self.selected.clone(),
        }
    }

    /// Flips one status according to the policy. Returns whether the
    /// selection changed.
    pub fn toggle(&mut self, status: PermitStatus) -> bool {
        if self.is_locked(&status) {
            return false;
        }
        let before = self.selected.clone();
        if self.policy.multi_select {
            if !self.selected.remove(&status) {
                self.selected.insert(status);
            }
        } else {
            let only_this = self.selected.iter().filter(|s| !self.is_locked(s)).eq([&status]);
            self.selected.clear();
            if !only_this {
                self.selected.insert(status);
            }
            self.enforce_lock();
        }
        before != self.selected
    }

    /// Replaces the whole selection. In single-select mode only the last
    /// unlocked status is kept. Returns whether the selection changed.
    pub fn set_selection<I>(&mut self, statuses: I) -> bool
    where
        I: IntoIterator<Item = PermitStatus>,
    {
        let before = std::mem::take(&mut self.selected);
        if self.policy.multi_select {
            self.selected.extend(statuses);
        } else {
            let last = statuses.into_iter().filter(|s| !self.is_locked(s)).last();
            self.selected.extend(last);
        }
        self.enforce_lock();
        before != self.selected
    }

    fn is_locked(&self, status: &PermitStatus) -> bool {
        self.policy.lock_approved && *status == PermitStatus::Approved
    }

    fn enforce_lock(&mut self) {
        if self.policy.lock_approved {
            self.selected.insert(PermitStatus::Approved);
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::new(FilterPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[PermitStatus]) -> StatusSet {
        items.iter().cloned().collect()
    }

    #[test]
    fn entering_pin_with_empty_selection_defaults_to_approved() {
        let mut filter = StatusFilter::default();
        filter.on_mode_enter(SearchMode::Pin);
        assert_eq!(filter.selection(), &set(&[PermitStatus::Approved]));
        assert_eq!(
            filter.effective_statuses(SearchMode::Pin),
            set(&[PermitStatus::Approved])
        );
    }

    #[test]
    fn entering_pin_keeps_existing_selection() {
        let mut filter = StatusFilter::default();
        filter.toggle(PermitStatus::Expired);
        filter.on_mode_enter(SearchMode::Pin);
        assert_eq!(filter.selection(), &set(&[PermitStatus::Expired]));
    }

    #[test]
    fn entering_name_clears_selection() {
        let mut filter = StatusFilter::default();
        filter.toggle(PermitStatus::Requested);
        filter.on_mode_enter(SearchMode::Pin);
        filter.on_mode_enter(SearchMode::Name);
        assert!(filter.selection().is_empty());
    }

    #[test]
    fn entering_street_leaves_selection_alone() {
        let mut filter = StatusFilter::default();
        filter.toggle(PermitStatus::Suspend);
        filter.on_mode_enter(SearchMode::Street);
        assert_eq!(filter.selection(), &set(&[PermitStatus::Suspend]));
    }

    #[test]
    fn pin_effective_statuses_recomputed_from_live_selection() {
        let mut filter = StatusFilter::default();
        assert_eq!(
            filter.effective_statuses(SearchMode::Pin),
            set(&[PermitStatus::Approved])
        );
        filter.toggle(PermitStatus::Expired);
        assert_eq!(
            filter.effective_statuses(SearchMode::Pin),
            set(&[PermitStatus::Expired])
        );
    }

    #[test]
    fn name_effective_statuses_may_be_empty() {
        let filter = StatusFilter::default();
        assert!(filter.effective_statuses(SearchMode::Name).is_empty());
    }

    #[test]
    fn multi_select_toggle_adds_and_removes() {
        let mut filter = StatusFilter::default();
        assert!(filter.toggle(PermitStatus::Approved));
        assert!(filter.toggle(PermitStatus::Expired));
        assert_eq!(
            filter.selection(),
            &set(&[PermitStatus::Approved, PermitStatus::Expired])
        );
        assert!(filter.toggle(PermitStatus::Approved));
        assert_eq!(filter.selection(), &set(&[PermitStatus::Expired]));
    }

    #[test]
    fn single_select_toggle_replaces() {
        let mut filter = StatusFilter::new(FilterPolicy {
            lock_approved: false,
            multi_select: false,
        });
        filter.toggle(PermitStatus::Requested);
        filter.toggle(PermitStatus::Expired);
        assert_eq!(filter.selection(), &set(&[PermitStatus::Expired]));
        assert!(filter.toggle(PermitStatus::Expired));
        assert!(filter.selection().is_empty());
    }

    #[test]
    fn locked_approved_cannot_be_removed() {
        let mut filter = StatusFilter::new(FilterPolicy {
            lock_approved: true,
            multi_select: true,
        });
        assert_eq!(filter.selection(), &set(&[PermitStatus::Approved]));
        assert!(!filter.toggle(PermitStatus::Approved));
        filter.on_mode_enter(SearchMode::Name);
        assert_eq!(filter.selection(), &set(&[PermitStatus::Approved]));
        filter.set_selection([PermitStatus::Expired]);
        assert_eq!(
            filter.selection(),
            &set(&[PermitStatus::Approved, PermitStatus::Expired])
        );
    }

    #[test]
    fn single_select_with_lock_keeps_approved_alongside_choice() {
        let mut filter = StatusFilter::new(FilterPolicy {
            lock_approved: true,
            multi_select: false,
        });
        filter.toggle(PermitStatus::Suspend);
        filter.toggle(PermitStatus::Requested);
        assert_eq!(
            filter.selection(),
            &set(&[PermitStatus::Approved, PermitStatus::Requested])
        );
        filter.toggle(PermitStatus::Requested);
        assert_eq!(filter.selection(), &set(&[PermitStatus::Approved]));
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let mut filter = StatusFilter::default();
        let issued = PermitStatus::parse("issued").unwrap();
        filter.toggle(issued.clone());
        assert!(filter.selection().contains(&issued));
        assert!(filter.effective_statuses(SearchMode::Pin).contains(&issued));
    }

    #[test]
    fn set_selection_reports_change() {
        let mut filter = StatusFilter::default();
        assert!(filter.set_selection([PermitStatus::Approved]));
        assert!(!filter.set_selection([PermitStatus::Approved]));
    }
}
