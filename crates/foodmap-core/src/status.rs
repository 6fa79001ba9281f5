//! Permit status tokens.
//!
//! The data source reports `APPROVED`, `REQUESTED`, `SUSPEND` and `EXPIRED`
//! today, but the set is open-ended (older feeds also carry `ISSUED`), so
//! anything else is kept verbatim in [`PermitStatus::Other`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A selection of statuses. Ordered so serialized filters are deterministic.
pub type StatusSet = BTreeSet<PermitStatus>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermitStatus {
    Approved,
    Requested,
    Suspend,
    Expired,
    Other(String),
}

impl PermitStatus {
    /// The four statuses the selection widgets offer.
    pub const KNOWN: [PermitStatus; 4] = [
        PermitStatus::Approved,
        PermitStatus::Requested,
        PermitStatus::Suspend,
        PermitStatus::Expired,
    ];

    /// Parses a token, trimming and upper-casing it first.
    ///
    /// Returns `None` for blank input; never fails otherwise.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim().to_uppercase();
        let status = match token.as_str() {
            "" => return None,
            "APPROVED" => Self::Approved,
            "REQUESTED" => Self::Requested,
            "SUSPEND" => Self::Suspend,
            "EXPIRED" => Self::Expired,
            _ => Self::Other(token),
        };
        Some(status)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "APPROVED",
            Self::Requested => "REQUESTED",
            Self::Suspend => "SUSPEND",
            Self::Expired => "EXPIRED",
            Self::Other(token) => token,
        }
    }
}

impl fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PermitStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PermitStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty permit status"))
    }
}

/// Comma-joins a status selection the way the query endpoints expect it.
///
/// Returns `None` for an empty selection, which means "no restriction".
#[must_use]
pub fn status_csv(statuses: &StatusSet) -> Option<String> {
    if statuses.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = statuses.iter().map(PermitStatus::as_str).collect();
    Some(tokens.join(","))
}
