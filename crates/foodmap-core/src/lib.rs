pub mod app_config;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod provider;
pub mod status;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, MAX_PIN_LIMIT, MIN_PIN_LIMIT};
pub use coordinate::Coordinate;
pub use error::{ConfigError, CoordinateError};
pub use provider::{ProviderRecord, SearchMode};
pub use status::{status_csv, PermitStatus, StatusSet};
