use thiserror::Error;

/// Failure of a single query against the food-provider data source.
///
/// The `Display` form is the human-readable message shown to the user.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The data source answered with a non-2xx status.
    #[error("{operation} failed: {status}")]
    Status {
        operation: &'static str,
        status: u16,
        url: String,
    },

    /// Network, TLS or timeout failure; no HTTP status is available.
    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a JSON array of provider records.
    #[error("{operation} returned an unreadable body: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl RequestError {
    /// HTTP status of the failed response, when the server produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            RequestError::Decode { .. } | RequestError::InvalidBaseUrl { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_names_operation_and_code() {
        let err = RequestError::Status {
            operation: "Search by name",
            status: 500,
            url: "http://localhost/api".to_string(),
        };
        assert_eq!(err.to_string(), "Search by name failed: 500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn decode_error_has_no_status() {
        let source = serde_json::from_str::<Vec<u8>>("{}").unwrap_err();
        let err = RequestError::Decode {
            operation: "Closest",
            source,
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("Closest returned an unreadable body"));
    }
}
