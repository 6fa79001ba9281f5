pub mod client;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod types;

pub use client::FoodProviderClient;
pub use error::RequestError;
pub use gateway::QueryGateway;
pub use normalize::normalize_provider;
pub use types::{FoodProviderDto, PermitDto};
