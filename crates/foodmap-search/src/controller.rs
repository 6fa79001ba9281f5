//! Search-mode controller: the single owner of a [`SearchSession`].
//!
//! Every query takes a ticket from a monotonically increasing request
//! sequence. A response is applied only if its ticket is still the latest
//! one issued; anything older is dropped without touching the session. A
//! mode change and [`SearchController::unmount`] both retire the current
//! ticket and clear `loading`, so a slow response can never resurrect state
//! from a mode the user has left.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use foodmap_core::{
    AppConfig, Coordinate, PermitStatus, ProviderRecord, SearchMode, StatusSet,
};
use foodmap_gateway::{QueryGateway, RequestError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::error::ViewportError;
use crate::session::{clamp_pin_limit, SearchSession, DEFAULT_PIN_LIMIT};
use crate::status_filter::FilterPolicy;
use crate::surface::MapSnapshot;
use crate::viewport::{City, Viewport, ViewportSynchronizer};

/// How a triggered action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Guard clause hit (blank query); nothing was sent.
    Skipped,
    /// The action does not apply in the current state (map click outside
    /// pin mode, or the controller is unmounted).
    Ignored,
    /// Results were applied to the session.
    Completed { count: usize },
    /// The gateway failed; the message is stored in `session.error`.
    Failed { message: String },
    /// A newer request, mode change or unmount retired this one.
    Superseded,
}

/// Construction options for [`SearchController`].
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    pub policy: FilterPolicy,
    pub pin_limit: u32,
    pub city: City,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            policy: FilterPolicy::default(),
            pin_limit: DEFAULT_PIN_LIMIT,
            city: City::default(),
        }
    }
}

impl ControllerOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            policy: FilterPolicy {
                lock_approved: config.lock_approved,
                multi_select: config.multi_select,
            },
            pin_limit: config.default_pin_limit,
            city: City::default(),
        }
    }
}

struct State {
    session: SearchSession,
    viewport: ViewportSynchronizer,
    /// Ticket of the latest issued request.
    sequence: u64,
    handler_revision: u64,
    mounted: bool,
}

struct Inner<G> {
    gateway: G,
    state: Mutex<State>,
    snapshots: watch::Sender<MapSnapshot>,
    inflight_click: Mutex<Option<AbortHandle>>,
}

/// Owns the search session, issues queries and publishes map snapshots.
///
/// Cheap to clone; clones share the same session.
pub struct SearchController<G> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for SearchController<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: QueryGateway> SearchController<G> {
    #[must_use]
    pub fn new(gateway: G, options: ControllerOptions) -> Self {
        let session = SearchSession::new(options.policy, options.pin_limit);
        let viewport = ViewportSynchronizer::new(options.city);
        let (snapshots, _) = watch::channel(MapSnapshot::build(&session, viewport.current(), 0));
        Self {
            inner: Arc::new(Inner {
                gateway,
                state: Mutex::new(State {
                    session,
                    viewport,
                    sequence: 0,
                    handler_revision: 0,
                    mounted: true,
                }),
                snapshots,
                inflight_click: Mutex::new(None),
            }),
        }
    }

    /// Receiver for the snapshot stream consumed by a map surface.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.inner.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> MapSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// A copy of the current session.
    #[must_use]
    pub fn session(&self) -> SearchSession {
        self.state().session.clone()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.state().viewport.current()
    }

    /// Statuses a query issued right now would carry in the active mode.
    #[must_use]
    pub fn effective_statuses(&self) -> StatusSet {
        let state = self.state();
        state.session.status_filter.effective_statuses(state.session.mode)
    }

    /// Switches the active mode. Does not run a query.
    ///
    /// Leaving pin mode clears the dropped pin and the highlight set. Any
    /// request still in flight is retired.
    pub fn set_mode(&self, mode: SearchMode) {
        let mut state = self.state();
        if !state.mounted {
            return;
        }
        let previous = state.session.mode;
        if !state.session.enter_mode(mode) {
            return;
        }
        state.handler_revision += 1;
        Self::retire_inflight(&mut state);
        tracing::debug!(from = %previous, to = %mode, "search mode changed");
        self.publish(&state);
        drop(state);
        self.abort_click_task();
    }

    pub fn set_name_query(&self, query: impl Into<String>) {
        let mut state = self.state();
        if !state.mounted {
            return;
        }
        state.session.name_query = query.into();
        self.publish(&state);
    }

    pub fn set_street_query(&self, query: impl Into<String>) {
        let mut state = self.state();
        if !state.mounted {
            return;
        }
        state.session.street_query = query.into();
        self.publish(&state);
    }

    /// Sets how many closest providers a pin drop asks for, clamped to 1–20.
    /// Returns the value actually stored.
    pub fn set_pin_limit(&self, limit: u32) -> u32 {
        let mut state = self.state();
        if !state.mounted {
            return state.session.pin_limit;
        }
        let clamped = clamp_pin_limit(limit);
        if state.session.pin_limit != clamped {
            state.session.pin_limit = clamped;
            state.handler_revision += 1;
            self.publish(&state);
        }
        clamped
    }

    /// Toggles one status under the configured policy. Returns whether the
    /// selection changed.
    pub fn toggle_status(&self, status: PermitStatus) -> bool {
        let mut state = self.state();
        if !state.mounted {
            return false;
        }
        let changed = state.session.status_filter.toggle(status);
        if changed {
            state.handler_revision += 1;
            self.publish(&state);
        }
        changed
    }

    /// Replaces the status selection. Returns whether it changed.
    pub fn set_statuses<I>(&self, statuses: I) -> bool
    where
        I: IntoIterator<Item = PermitStatus>,
    {
        let mut state = self.state();
        if !state.mounted {
            return false;
        }
        let changed = state.session.status_filter.set_selection(statuses);
        if changed {
            state.handler_revision += 1;
            self.publish(&state);
        }
        changed
    }

    /// Resets the viewport to a city preset.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::UnknownCity`] for unsupported cities; the
    /// viewport is left unchanged. After [`SearchController::unmount`] the
    /// current viewport is returned as is.
    pub fn handle_city_change(&self, city_key: &str) -> Result<Viewport, ViewportError> {
        let mut state = self.state();
        if !state.mounted {
            return Ok(state.viewport.current());
        }
        let viewport = state.viewport.handle_city_change(city_key)?;
        self.publish(&state);
        Ok(viewport)
    }

    /// Searches by the current name query and the raw status selection.
    ///
    /// No-op when the query is blank. On success the results are replaced
    /// and the viewport refitted; the highlight set is left alone.
    pub async fn run_name_search(&self) -> SearchOutcome {
        let (ticket, query, statuses) = {
            let mut state = self.state();
            if !state.mounted {
                return SearchOutcome::Ignored;
            }
            let query = state.session.name_query.trim().to_string();
            if query.is_empty() {
                return SearchOutcome::Skipped;
            }
            let statuses = state.session.status_filter.effective_statuses(SearchMode::Name);
            let ticket = self.begin_request(&mut state);
            (ticket, query, statuses)
        };

        let result = self.inner.gateway.find_by_name(&query, &statuses).await;
        self.finish_listing(ticket, "name", result)
    }

    /// Searches by the current street query. Status filters do not apply.
    pub async fn run_street_search(&self) -> SearchOutcome {
        let (ticket, query) = {
            let mut state = self.state();
            if !state.mounted {
                return SearchOutcome::Ignored;
            }
            let query = state.session.street_query.trim().to_string();
            if query.is_empty() {
                return SearchOutcome::Skipped;
            }
            let ticket = self.begin_request(&mut state);
            (ticket, query)
        };

        let result = self.inner.gateway.find_by_street(&query).await;
        self.finish_listing(ticket, "street", result)
    }

    /// Lists providers by the raw status selection alone.
    pub async fn run_status_search(&self) -> SearchOutcome {
        let (ticket, statuses) = {
            let mut state = self.state();
            if !state.mounted {
                return SearchOutcome::Ignored;
            }
            let statuses = state.session.status_filter.selection().clone();
            let ticket = self.begin_request(&mut state);
            (ticket, statuses)
        };

        let result = self.inner.gateway.find_by_status(&statuses).await;
        self.finish_listing(ticket, "status", result)
    }

    /// Handles a click on the map.
    ///
    /// Ignored entirely outside pin mode or at an out-of-range coordinate.
    /// In pin mode the pin is placed and published before the closest
    /// search is sent; limit and statuses are read from the session at this
    /// moment.
    pub async fn handle_map_click(&self, coord: Coordinate) -> SearchOutcome {
        if let Err(err) = Coordinate::new(coord.lat, coord.lng) {
            tracing::warn!(error = %err, "map click at invalid coordinate ignored");
            return SearchOutcome::Ignored;
        }
        let (ticket, limit, statuses) = {
            let mut state = self.state();
            if !state.mounted || state.session.mode != SearchMode::Pin {
                tracing::warn!(
                    mode = %state.session.mode,
                    mounted = state.mounted,
                    "map click ignored"
                );
                return SearchOutcome::Ignored;
            }
            state.session.drop_pin = Some(coord);
            let limit = state.session.pin_limit;
            let statuses = state.session.status_filter.effective_statuses(SearchMode::Pin);
            let ticket = self.begin_request(&mut state);
            (ticket, limit, statuses)
        };

        let result = self.inner.gateway.find_closest(coord, limit, &statuses).await;
        self.finish(ticket, "closest", result, |state, records| {
            state.session.apply_closest(records);
        })
    }

    /// Retires every in-flight request and stops accepting new ones.
    pub fn unmount(&self) {
        let mut state = self.state();
        state.mounted = false;
        Self::retire_inflight(&mut state);
        self.publish(&state);
        drop(state);
        self.abort_click_task();
        tracing::debug!("search controller unmounted");
    }

    fn begin_request(&self, state: &mut State) -> u64 {
        state.sequence += 1;
        state.session.begin_request();
        self.publish(state);
        state.sequence
    }

    fn finish_listing(
        &self,
        ticket: u64,
        kind: &'static str,
        result: Result<Vec<ProviderRecord>, RequestError>,
    ) -> SearchOutcome {
        self.finish(ticket, kind, result, |state, records| {
            state.viewport.fit_to_results(&records);
            state.session.apply_results(records);
        })
    }

    fn finish<F>(
        &self,
        ticket: u64,
        kind: &'static str,
        result: Result<Vec<ProviderRecord>, RequestError>,
        apply: F,
    ) -> SearchOutcome
    where
        F: FnOnce(&mut State, Vec<ProviderRecord>),
    {
        let mut state = self.state();
        if ticket != state.sequence {
            tracing::debug!(
                ticket,
                latest = state.sequence,
                kind,
                "discarding stale search response"
            );
            return SearchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(records) => {
                let count = records.len();
                apply(&mut *state, records);
                tracing::info!(kind, count, "search completed");
                SearchOutcome::Completed { count }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(kind, status = ?err.status(), error = %err, "search failed");
                state.session.error = Some(message.clone());
                SearchOutcome::Failed { message }
            }
        };
        state.session.loading = false;
        debug_assert!(state.session.invariants_hold());
        self.publish(&state);
        outcome
    }
}

impl<G: QueryGateway + 'static> SearchController<G> {
    /// A handler for the map surface's click events.
    ///
    /// The handler reads the pin limit and status filter from the live
    /// session when it fires, so it never acts on stale filter values. Its
    /// [`MapClickHandler::revision`] tells a surface whether a newer handler
    /// should be bound.
    #[must_use]
    pub fn click_handler(&self) -> MapClickHandler<G> {
        MapClickHandler {
            controller: self.clone(),
            revision: self.state().handler_revision,
        }
    }
}

impl<G> SearchController<G> {
    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn current_handler_revision(&self) -> u64 {
        self.state().handler_revision
    }

    fn retire_inflight(state: &mut State) {
        state.sequence += 1;
        state.session.loading = false;
    }

    fn publish(&self, state: &State) {
        let snapshot = MapSnapshot::build(
            &state.session,
            state.viewport.current(),
            state.handler_revision,
        );
        self.inner.snapshots.send_replace(snapshot);
    }

    fn abort_click_task(&self) {
        let previous = self
            .inner
            .inflight_click
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = previous {
            handle.abort();
        }
    }
}

/// Click callback handed to a map surface.
pub struct MapClickHandler<G> {
    controller: SearchController<G>,
    revision: u64,
}

impl<G> Clone for MapClickHandler<G> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            revision: self.revision,
        }
    }
}

impl<G: QueryGateway + 'static> MapClickHandler<G> {
    /// Handler revision this callback was created at.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `true` when limit or status filter changed since this handler was
    /// created and the surface should rebind.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.revision != self.controller.current_handler_revision()
    }

    /// Runs the click inline.
    pub async fn call(&self, coord: Coordinate) -> SearchOutcome {
        self.controller.handle_map_click(coord).await
    }

    /// Runs the click as a background task, aborting the previous
    /// dispatched click if it is still running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, coord: Coordinate) -> JoinHandle<SearchOutcome> {
        let mut slot = self
            .controller
            .inner
            .inflight_click
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        let controller = self.controller.clone();
        let handle = tokio::spawn(async move { controller.handle_map_click(coord).await });
        *slot = Some(handle.abort_handle());
        handle
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
