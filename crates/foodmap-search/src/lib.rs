//! Search-mode coordination and map synchronization for the food-provider map.
//!
//! [`SearchController`] owns the [`SearchSession`], turns user input into one
//! of the gateway queries, and publishes a [`MapSnapshot`] for the map
//! surface after every change.

pub mod controller;
pub mod error;
pub mod session;
pub mod status_filter;
pub mod surface;
pub mod viewport;

pub use controller::{ControllerOptions, MapClickHandler, SearchController, SearchOutcome};
pub use error::ViewportError;
pub use session::{clamp_pin_limit, SearchSession, DEFAULT_PIN_LIMIT};
pub use status_filter::{FilterPolicy, StatusFilter};
pub use surface::{drive_surface, MapSnapshot, MapSurface, Marker};
pub use viewport::{centroid, City, Viewport, ViewportSynchronizer, FIT_ZOOM};
