//! Error taxonomy for the remote catalog.

/// Errors from the remote catalog client.
///
/// Display strings are user-facing; the presentation layer renders them
/// next to a retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog returned 404 for the requested resource.
    #[error("Resource not found")]
    NotFound { url: String },

    /// The catalog returned 429.
    #[error("Too many requests. Please try again later.")]
    RateLimited { url: String },

    /// The catalog returned a 5xx status.
    #[error("Server error. Please try again later.")]
    ServerError { status: u16, url: String },

    /// No response was received (connection refused, DNS, timeout, TLS).
    #[error("Network error: Unable to reach the server")]
    Network { url: String, detail: String },

    /// Any other failure: an unexpected status or a request that could not
    /// be built. `message` is already user-facing.
    #[error("{message}")]
    MalformedRequest { message: String },

    /// The payload did not match the expected schema.
    #[error("Invalid {entity} payload: {detail}")]
    Validation { entity: &'static str, detail: String },
}

impl CatalogError {
    /// Map a non-success HTTP status to the taxonomy.
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            404 => CatalogError::NotFound { url: url.to_string() },
            429 => CatalogError::RateLimited { url: url.to_string() },
            500..=599 => CatalogError::ServerError {
                status,
                url: url.to_string(),
            },
            other => CatalogError::MalformedRequest {
                message: format!("API error ({other})"),
            },
        }
    }

    /// Map a transport-level failure (no HTTP status) to the taxonomy.
    pub fn from_transport(err: &reqwest::Error, url: &str) -> Self {
        if err.is_builder() {
            CatalogError::MalformedRequest {
                message: format!("Request error: {err}"),
            }
        } else {
            CatalogError::Network {
                url: url.to_string(),
                detail: err.to_string(),
            }
        }
    }

    /// Whether a bounded retry may succeed: rate limiting, server errors,
    /// and unreachable network.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::RateLimited { .. }
                | CatalogError::ServerError { .. }
                | CatalogError::Network { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://swapi.info/api/people/1";

    #[test]
    fn status_mapping() {
        assert!(CatalogError::from_status(404, URL).is_not_found());
        assert_eq!(
            CatalogError::from_status(429, URL),
            CatalogError::RateLimited { url: URL.into() }
        );
        assert_eq!(
            CatalogError::from_status(503, URL),
            CatalogError::ServerError { status: 503, url: URL.into() }
        );
        assert_eq!(
            CatalogError::from_status(400, URL),
            CatalogError::MalformedRequest { message: "API error (400)".into() }
        );
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(CatalogError::from_status(404, URL).to_string(), "Resource not found");
        assert_eq!(
            CatalogError::from_status(429, URL).to_string(),
            "Too many requests. Please try again later."
        );
        assert_eq!(
            CatalogError::from_status(500, URL).to_string(),
            "Server error. Please try again later."
        );
        assert_eq!(CatalogError::from_status(418, URL).to_string(), "API error (418)");
    }

    #[test]
    fn transient_classification() {
        assert!(CatalogError::from_status(429, URL).is_transient());
        assert!(CatalogError::from_status(502, URL).is_transient());
        assert!(CatalogError::Network { url: URL.into(), detail: "refused".into() }.is_transient());
        assert!(!CatalogError::from_status(404, URL).is_transient());
        assert!(!CatalogError::from_status(400, URL).is_transient());
        assert!(!CatalogError::Validation { entity: "character", detail: "x".into() }.is_transient());
    }

    #[test]
    fn builder_errors_are_malformed_requests() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = CatalogError::from_transport(&req_err, "://bad");
        assert!(err.to_string().starts_with("Request error:"));
        assert!(!err.is_transient());
    }
}
