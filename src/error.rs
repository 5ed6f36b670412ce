//! Error types for declarative REST calls.
//!
//! Every failure in the pipeline, from an unmapped path placeholder to a
//! transport fault, surfaces as one variant of [`Error`]. Variants preserve
//! as much context as is available at the failure site (raw response bodies,
//! status codes, headers) so callers can log and react without re-fetching.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// The main error type for REST client calls.
///
/// # Examples
///
/// ```no_run
/// use restbound::{Client, Error, MethodDescriptor, Verb};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .build()?;
///
/// let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
///     .path_param("name", "Contact1");
///
/// match client.execute::<serde_json::Value>(descriptor).await {
///     Ok(contact) => println!("Contact: {contact}"),
///     Err(Error::Http { status, raw_response, .. }) => {
///         eprintln!("HTTP error {status}: {raw_response}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed,
    /// etc.).
    ///
    /// This wraps the underlying `reqwest::Error` and indicates problems at
    /// the network layer rather than the HTTP protocol layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A blocking call exceeded the client's configured timeout.
    ///
    /// Raised only by the synchronous call shapes in [`crate::blocking`];
    /// asynchronous calls impose no engine-level timeout.
    #[error("Request timed out after {limit:?}")]
    Timeout {
        /// The configured wait duration that elapsed.
        limit: Duration,
    },

    /// The server returned a non-2xx HTTP status code.
    #[error("HTTP error {status}: {raw_response}")]
    Http {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        raw_response: String,
        /// The response headers.
        headers: HeaderMap,
    },

    /// A path template references a placeholder with no mapped value.
    ///
    /// Raised during request build, before any I/O.
    #[error("Path contains an unknown parameter '{name}'")]
    Template {
        /// The placeholder name that had no mapping.
        name: String,
    },

    /// A parameter was added under an empty name.
    #[error("Parameter name must not be empty")]
    InvalidParameterName,

    /// A parameter name was added twice.
    ///
    /// A name holds multiple values only when they arrive together as a
    /// sequence; repeating the name across separate adds is rejected.
    #[error("Parameter '{name}' has already been added")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
    },

    /// No codec handler is registered for the given type/media-type pair.
    ///
    /// This is a configuration defect, not a transient condition: register a
    /// handler on the [`crate::CodecRegistry`] for the media type or the
    /// concrete type involved.
    #[error("No handler registered for type `{type_name}` with media type `{media_type}`")]
    NoHandler {
        /// The media type the descriptor asked for.
        media_type: String,
        /// The concrete Rust type being written or read.
        type_name: &'static str,
    },

    /// A request body could not be serialized by the resolved handler.
    #[error("Failed to encode request body as `{media_type}`: {detail}")]
    Encode {
        /// The media type the body was encoded for.
        media_type: String,
        /// The underlying serializer error.
        detail: String,
    },

    /// A response body could not be decoded into the expected type.
    ///
    /// Preserves the raw response text so decode failures can be debugged in
    /// production.
    #[error("Failed to decode response: {detail}")]
    Decode {
        /// The raw response body that failed to decode.
        raw_response: String,
        /// The underlying decoder error.
        detail: String,
    },

    /// Invalid configuration was provided, such as a missing base URL or an
    /// invalid header value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Http { raw_response, .. } => Some(raw_response),
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` if this error originated at the transport layer
    /// (network fault, non-2xx status, or timeout).
    ///
    /// Only transport errors are fanned out on the interceptor error
    /// channel; validation, templating and codec errors never reach the
    /// wire and are not notified.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Http { .. } | Error::Timeout { .. }
        )
    }
}

/// A specialized `Result` type for REST client calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        let http = Error::Http {
            status: StatusCode::BAD_GATEWAY,
            raw_response: String::new(),
            headers: HeaderMap::new(),
        };
        assert!(http.is_transport());

        let timeout = Error::Timeout {
            limit: Duration::from_secs(5),
        };
        assert!(timeout.is_transport());

        assert!(!Error::Template {
            name: "id".to_string()
        }
        .is_transport());
        assert!(!Error::NoHandler {
            media_type: "application/json".to_string(),
            type_name: "User",
        }
        .is_transport());
    }

    #[test]
    fn status_and_raw_response_accessors() {
        let err = Error::Http {
            status: StatusCode::NOT_FOUND,
            raw_response: "missing".to_string(),
            headers: HeaderMap::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.raw_response(), Some("missing"));

        let err = Error::Decode {
            raw_response: "not json".to_string(),
            detail: "expected value".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.raw_response(), Some("not json"));
    }
}
