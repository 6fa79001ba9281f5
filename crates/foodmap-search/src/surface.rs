//! What the map rendering surface sees, and how it is fed.
//!
//! The controller publishes a [`MapSnapshot`] on a `tokio::sync::watch`
//! channel after every state change. Surfaces only read snapshots; they
//! talk back exclusively through a [`crate::MapClickHandler`].

use std::collections::BTreeSet;

use foodmap_core::{Coordinate, ProviderRecord, SearchMode};
use serde::Serialize;
use tokio::sync::watch;

use crate::session::SearchSession;
use crate::viewport::Viewport;

/// One drawable marker. Only records with a coordinate become markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub highlighted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_items: Option<String>,
    /// Distance from the dropped pin, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// A coherent view of the session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub mode: SearchMode,
    pub center: Coordinate,
    pub zoom: u8,
    pub results: Vec<ProviderRecord>,
    pub markers: Vec<Marker>,
    pub highlighted: BTreeSet<String>,
    pub drop_pin: Option<Coordinate>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped whenever the inputs of the click handler (pin limit, status
    /// filter) change, so a surface knows to rebind its callback.
    pub handler_revision: u64,
}

impl MapSnapshot {
    #[must_use]
    pub fn build(session: &SearchSession, viewport: Viewport, handler_revision: u64) -> Self {
        let markers = session
            .results
            .iter()
            .filter_map(|record| {
                let coordinate = record.coordinate?;
                Some(Marker {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    coordinate,
                    highlighted: session.is_highlighted(&record.id),
                    address: record.address.clone(),
                    food_items: record.food_items.clone(),
                    distance_km: session.drop_pin.map(|pin| pin.distance_km(&coordinate)),
                })
            })
            .collect();

        Self {
            mode: session.mode,
            center: viewport.center,
            zoom: viewport.zoom,
            results: session.results.clone(),
            markers,
            highlighted: session.highlighted.clone(),
            drop_pin: session.drop_pin,
            loading: session.loading,
            error: session.error.clone(),
            handler_revision,
        }
    }
}

/// A rendering target for map snapshots.
pub trait MapSurface {
    fn render(&mut self, snapshot: &MapSnapshot);
}

/// Renders every published snapshot until the controller goes away.
///
/// Renders the current snapshot first, then one per change. Intermediate
/// snapshots published faster than the surface renders are coalesced.
pub async fn drive_surface<S: MapSurface>(
    mut snapshots: watch::Receiver<MapSnapshot>,
    surface: &mut S,
) {
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        surface.render(&snapshot);
        if snapshots.changed().await.is_err() {
            tracing::debug!("snapshot channel closed, surface detached");
            break;
        }
    }
}
