//! Normalization from wire DTOs to [`foodmap_core::ProviderRecord`].

use foodmap_core::{Coordinate, PermitStatus, ProviderRecord};
use serde_json::Value;

use crate::types::FoodProviderDto;

/// Converts a decoded [`FoodProviderDto`] into a [`ProviderRecord`].
///
/// Never fails: a coordinate that is missing, unparsable, out of range or
/// the `(0, 0)` sentinel simply becomes `None`. Empty strings are treated as
/// absent.
#[must_use]
pub fn normalize_provider(dto: FoodProviderDto) -> ProviderRecord {
    let coordinate = extract_coordinate(&dto);
    let (permit_status, permit_expiration) = match dto.permit {
        Some(permit) => (
            permit.permit_status.as_deref().and_then(PermitStatus::parse),
            non_empty(permit.expiration_date),
        ),
        None => (None, None),
    };

    ProviderRecord {
        id: dto.location_id,
        name: dto.name.unwrap_or_default(),
        food_items: non_empty(dto.food_items),
        permit_status,
        permit_expiration,
        coordinate,
        description: non_empty(dto.location_description),
        address: non_empty(dto.address),
    }
}

fn extract_coordinate(dto: &FoodProviderDto) -> Option<Coordinate> {
    let flat = match (&dto.latitude, &dto.longitude) {
        (Some(lat), Some(lng)) => to_coordinate(lat, lng),
        _ => None,
    };
    flat.or_else(|| dto.coord.as_ref().and_then(nested_coordinate))
}

fn nested_coordinate(coord: &Value) -> Option<Coordinate> {
    let lat = coord.get("latitude").or_else(|| coord.get("lat"))?;
    let lng = coord.get("longitude").or_else(|| coord.get("lng"))?;
    to_coordinate(lat, lng)
}

#[allow(clippy::float_cmp)]
fn to_coordinate(lat: &Value, lng: &Value) -> Option<Coordinate> {
    let (lat, lng) = (as_degrees(lat)?, as_degrees(lng)?);
    if lat == 0.0 && lng == 0.0 {
        return None;
    }
    Coordinate::new(lat, lng).ok()
}

fn as_degrees(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
