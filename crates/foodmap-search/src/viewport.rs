//! Map viewport derivation from result sets and city presets.
//!
//! Fitting is a centroid fit at a fixed zoom, not a bounding-box fit: a
//! tight cluster and a city-wide spread both land on [`FIT_ZOOM`].

use foodmap_core::{Coordinate, ProviderRecord};
use serde::Serialize;

use crate::error::ViewportError;

/// Zoom applied after fitting to a result set.
pub const FIT_ZOOM: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Cities the map can jump to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum City {
    #[default]
    SanFrancisco,
}

impl City {
    /// Resolves a city key as shown in the city picker.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::UnknownCity`] for anything but a supported city.
    pub fn from_key(key: &str) -> Result<Self, ViewportError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "san francisco" | "sf" => Ok(City::SanFrancisco),
            _ => Err(ViewportError::UnknownCity(key.to_string())),
        }
    }

    #[must_use]
    pub fn preset(self) -> Viewport {
        match self {
            City::SanFrancisco => Viewport {
                center: Coordinate {
                    lat: 37.7749,
                    lng: -122.4194,
                },
                zoom: 12,
            },
        }
    }
}

/// Arithmetic mean of the coordinates of `records` that have one.
#[must_use]
pub fn centroid(records: &[ProviderRecord]) -> Option<Coordinate> {
    let (count, lat_sum, lng_sum) = records
        .iter()
        .filter_map(|r| r.coordinate)
        .fold((0_u32, 0.0_f64, 0.0_f64), |(n, lat, lng), c| {
            (n + 1, lat + c.lat, lng + c.lng)
        });
    if count == 0 {
        return None;
    }
    let n = f64::from(count);
    Some(Coordinate {
        lat: lat_sum / n,
        lng: lng_sum / n,
    })
}

/// Holds the current viewport and moves it in response to results or a
/// city change.
#[derive(Debug, Clone)]
pub struct ViewportSynchronizer {
    current: Viewport,
}

impl ViewportSynchronizer {
    #[must_use]
    pub fn new(city: City) -> Self {
        Self {
            current: city.preset(),
        }
    }

    #[must_use]
    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Centers on the centroid of the located records at [`FIT_ZOOM`].
    ///
    /// Returns `false` and leaves the viewport alone when no record has a
    /// coordinate.
    pub fn fit_to_results(&mut self, records: &[ProviderRecord]) -> bool {
        match centroid(records) {
            Some(center) => {
                self.current = Viewport {
                    center,
                    zoom: FIT_ZOOM,
                };
                true
            }
            None => false,
        }
    }

    /// Resets to the preset of the city named by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::UnknownCity`] without moving the viewport.
    pub fn handle_city_change(&mut self, key: &str) -> Result<Viewport, ViewportError> {
        let city = City::from_key(key)?;
        self.current = city.preset();
        Ok(self.current)
    }
}

impl Default for ViewportSynchronizer {
    fn default() -> Self {
        Self::new(City::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(id: &str, lat: f64, lng: f64) -> ProviderRecord {
        ProviderRecord::new(id, id).with_coordinate(Coordinate { lat, lng })
    }

    #[test]
    fn fit_to_empty_results_is_noop() {
        let mut sync = ViewportSynchronizer::default();
        let before = sync.current();
        assert!(!sync.fit_to_results(&[]));
        assert_eq!(sync.current(), before);
    }

    #[test]
    fn fit_to_unlocated_results_is_noop() {
        let mut sync = ViewportSynchronizer::default();
        let before = sync.current();
        let records = vec![ProviderRecord::new("a", "A"), ProviderRecord::new("b", "B")];
        assert!(!sync.fit_to_results(&records));
        assert_eq!(sync.current(), before);
    }

    #[test]
    fn fit_centers_on_mean_at_fixed_zoom() {
        let mut sync = ViewportSynchronizer::default();
        let records = vec![located("a", 10.0, 20.0), located("b", 20.0, 40.0)];
        assert!(sync.fit_to_results(&records));
        assert_eq!(
            sync.current(),
            Viewport {
                center: Coordinate {
                    lat: 15.0,
                    lng: 30.0
                },
                zoom: 13
            }
        );
    }

    #[test]
    fn fit_ignores_unlocated_records_in_mean() {
        let records = vec![
            located("a", 10.0, 20.0),
            ProviderRecord::new("ghost", "Ghost"),
            located("b", 20.0, 40.0),
        ];
        assert_eq!(
            centroid(&records),
            Some(Coordinate {
                lat: 15.0,
                lng: 30.0
            })
        );
    }

    #[test]
    fn city_change_resets_to_preset() {
        let mut sync = ViewportSynchronizer::default();
        sync.fit_to_results(&[located("a", 10.0, 20.0)]);
        let view = sync.handle_city_change("San Francisco").unwrap();
        assert_eq!(view, City::SanFrancisco.preset());
        assert_eq!(view.zoom, 12);
    }

    #[test]
    fn unknown_city_keeps_viewport() {
        let mut sync = ViewportSynchronizer::default();
        sync.fit_to_results(&[located("a", 10.0, 20.0)]);
        let before = sync.current();
        let err = sync.handle_city_change("Oakland").unwrap_err();
        assert!(matches!(err, ViewportError::UnknownCity(ref k) if k == "Oakland"));
        assert_eq!(sync.current(), before);
    }
}
