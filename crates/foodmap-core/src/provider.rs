use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::status::PermitStatus;

/// One mobile food vendor permit as shown on the map.
///
/// `id` is the identity: stable and unique per record. Records without a
/// `coordinate` stay in result lists but never become map markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_status: Option<PermitStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_expiration: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProviderRecord {
    /// A record with only identity and name set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            food_items: None,
            permit_status: None,
            permit_expiration: None,
            coordinate: None,
            description: None,
            address: None,
        }
    }

    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }
}

/// The three mutually exclusive ways of querying providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Name,
    Street,
    Pin,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Name => write!(f, "name"),
            SearchMode::Street => write!(f, "street"),
            SearchMode::Pin => write!(f, "pin"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SearchMode::Name),
            "street" => Ok(SearchMode::Street),
            "pin" => Ok(SearchMode::Pin),
            other => Err(format!("unknown search mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_coordinate_deserializes() {
        let json = serde_json::json!({"id": "42", "name": "Taco Truck"});
        let record: ProviderRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, "42");
        assert!(record.coordinate.is_none());
        assert!(record.permit_status.is_none());
    }

    #[test]
    fn record_serializes_camel_case() {
        let mut record = ProviderRecord::new("1", "Curry Up");
        record.food_items = Some("curry".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["foodItems"], "curry");
        assert!(json.get("permitStatus").is_none());
    }

    #[test]
    fn search_mode_round_trips_through_str() {
        for mode in [SearchMode::Name, SearchMode::Street, SearchMode::Pin] {
            assert_eq!(mode.to_string().parse::<SearchMode>().unwrap(), mode);
        }
        assert!("map".parse::<SearchMode>().is_err());
    }
}
