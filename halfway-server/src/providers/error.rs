//! Provider client error types.

use std::fmt;

/// Which external service an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Geocoding,
    Routing,
    Places,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::Geocoding => "geocoding",
            Provider::Routing => "routing",
            Provider::Places => "places",
        })
    }
}

/// Errors from the provider HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not parse
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Rate limited by the provider
    #[error("rate limited")]
    RateLimited,

    /// The provider rejected the request parameters
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ProviderError {
    /// Whether the request exceeded its deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout(),
            ProviderError::Api { status, .. } => *status == 504,
            _ => false,
        }
    }

    /// Whether retrying after a back-off might succeed.
    ///
    /// Timeouts, connection failures and 5xx responses are transient.
    /// Everything else, including malformed bodies and rate limiting, is not.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            ProviderError::Api { status, .. } => (500..600).contains(status),
            ProviderError::Json { .. }
            | ProviderError::RateLimited
            | ProviderError::BadRequest(_) => false,
        }
    }

    /// Build an error from a non-success response.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return ProviderError::RateLimited;
        }
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return ProviderError::BadRequest(body);
        }
        ProviderError::Api {
            status: status.as_u16(),
            message: body,
        }
    }

    /// Build a parse error, keeping a prefix of the body for debugging.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        ProviderError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProviderError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = ProviderError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));

        assert_eq!(ProviderError::RateLimited.to_string(), "rate limited");
        assert_eq!(Provider::Places.to_string(), "places");
    }

    #[test]
    fn server_errors_are_transient() {
        for status in [500, 502, 503, 504] {
            let err = ProviderError::Api {
                status,
                message: String::new(),
            };
            assert!(err.is_transient(), "{status} should be transient");
        }
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = ProviderError::Api {
            status: 404,
            message: String::new(),
        };
        assert!(!err.is_transient());
        assert!(!ProviderError::RateLimited.is_transient());
        assert!(!ProviderError::BadRequest("bad".into()).is_transient());

        let parse = serde_json::from_str::<()>("nope").unwrap_err();
        assert!(!ProviderError::json(parse, "nope").is_transient());
    }

    #[test]
    fn gateway_timeout_counts_as_timeout() {
        let err = ProviderError::Api {
            status: 504,
            message: String::new(),
        };
        assert!(err.is_timeout());
        assert!(!ProviderError::RateLimited.is_timeout());
    }

    #[tokio::test]
    async fn connection_failure_is_transient() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1")
            .send()
            .await
            .unwrap_err();
        assert!(ProviderError::Http(err).is_transient());
    }

    #[test]
    fn json_error_truncates_body() {
        let body = "x".repeat(2000);
        let parse = serde_json::from_str::<()>(&body).unwrap_err();
        match ProviderError::json(parse, &body) {
            ProviderError::Json { body: Some(b), .. } => assert_eq!(b.len(), 500),
            other => panic!("unexpected {other:?}"),
        }
    }
}
