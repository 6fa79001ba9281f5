//! Wire types for the `/api/v1/food-providers` endpoints.
//!
//! ## Observed shapes
//!
//! ### Identity
//! `locationId` in the camel-cased responses, `location_id` in older
//! snake-cased builds. Usually a numeric string, occasionally a bare number.
//!
//! ### Coordinates
//! Either flat `latitude` / `longitude` fields or a nested
//! `coord: { latitude, longitude }` object. Values may be numbers, numeric
//! strings, `null`, or missing. The source uses `0.0 / 0.0` for "unknown
//! location". Everything is kept as raw JSON here and interpreted in
//! `normalize.rs` so a bad coordinate never fails the whole response.
//!
//! ### Permit
//! `permit` is an object with `permitStatus` and optional
//! `expirationDate`; it may be `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One provider as returned by any of the four query endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodProviderDto {
    #[serde(alias = "location_id", deserialize_with = "string_or_number")]
    pub location_id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, alias = "food_items")]
    pub food_items: Option<String>,

    #[serde(default)]
    pub permit: Option<PermitDto>,

    #[serde(default)]
    pub latitude: Option<Value>,

    #[serde(default)]
    pub longitude: Option<Value>,

    #[serde(default)]
    pub coord: Option<Value>,

    #[serde(default, alias = "location_description")]
    pub location_description: Option<String>,

    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitDto {
    #[serde(default, alias = "permit_status")]
    pub permit_status: Option<String>,

    #[serde(default, alias = "expiration_date")]
    pub expiration_date: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for locationId, got {other}"
        ))),
    }
}
