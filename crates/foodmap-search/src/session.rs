//! The controller's mutable search state.

use std::collections::BTreeSet;

use foodmap_core::{Coordinate, ProviderRecord, SearchMode, MAX_PIN_LIMIT, MIN_PIN_LIMIT};
use serde::Serialize;

use crate::status_filter::{FilterPolicy, StatusFilter};

pub const DEFAULT_PIN_LIMIT: u32 = 5;

/// State of one mounted search view.
///
/// Invariants, checked by [`SearchSession::invariants_hold`]:
/// - every highlighted id belongs to a record in `results`;
/// - `drop_pin` is only set while `mode` is [`SearchMode::Pin`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSession {
    pub mode: SearchMode,
    pub name_query: String,
    pub street_query: String,
    pub status_filter: StatusFilter,
    pub pin_limit: u32,
    pub results: Vec<ProviderRecord>,
    pub highlighted: BTreeSet<String>,
    pub drop_pin: Option<Coordinate>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchSession {
    #[must_use]
    pub fn new(policy: FilterPolicy, pin_limit: u32) -> Self {
        Self {
            mode: SearchMode::Name,
            name_query: String::new(),
            street_query: String::new(),
            status_filter: StatusFilter::new(policy),
            pin_limit: clamp_pin_limit(pin_limit),
            results: Vec::new(),
            highlighted: BTreeSet::new(),
            drop_pin: None,
            loading: false,
            error: None,
        }
    }

    /// Switches mode and applies the transition side effects.
    ///
    /// Returns `false` when `mode` is already active; nothing changes then.
    pub(crate) fn enter_mode(&mut self, mode: SearchMode) -> bool {
        if self.mode == mode {
            return false;
        }
        if self.mode == SearchMode::Pin {
            self.drop_pin = None;
            self.highlighted.clear();
        }
        self.mode = mode;
        self.status_filter.on_mode_enter(mode);
        true
    }

    /// Marks the start of a query.
    pub(crate) fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replaces results from a text or status search. The highlight set is
    /// pruned only as far as needed to stay within the new results.
    pub(crate) fn apply_results(&mut self, records: Vec<ProviderRecord>) {
        self.results = records;
        self.prune_highlights();
    }

    /// Replaces results from a closest search; every returned record is
    /// highlighted.
    pub(crate) fn apply_closest(&mut self, records: Vec<ProviderRecord>) {
        self.highlighted = records.iter().map(|r| r.id.clone()).collect();
        self.results = records;
    }

    #[must_use]
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let highlights_in_results = self
            .highlighted
            .iter()
            .all(|id| self.results.iter().any(|r| &r.id == id));
        let pin_only_in_pin_mode = self.drop_pin.is_none() || self.mode == SearchMode::Pin;
        highlights_in_results && pin_only_in_pin_mode
    }

    fn prune_highlights(&mut self) {
        if self.highlighted.is_empty() {
            return;
        }
        let ids: BTreeSet<&str> = self.results.iter().map(|r| r.id.as_str()).collect();
        self.highlighted.retain(|id| ids.contains(id.as_str()));
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(FilterPolicy::default(), DEFAULT_PIN_LIMIT)
    }
}

/// Clamps a requested closest-search size into the accepted 1–20 range.
#[must_use]
pub fn clamp_pin_limit(limit: u32) -> u32 {
    limit.clamp(MIN_PIN_LIMIT, MAX_PIN_LIMIT)
}
