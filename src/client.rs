//! The asynchronous execution engine.
//!
//! [`Client`] turns method descriptors into dispatched HTTP calls:
//! Build -> notify -> Send -> Classify -> Decode. Use [`ClientBuilder`] to
//! configure and create clients; see [`crate::blocking`] for the
//! synchronous call shapes.

use crate::codec::{CodecRegistry, ReadContext};
use crate::descriptor::MethodDescriptor;
use crate::interceptor::{Interceptor, InterceptorBus, Subscription};
use crate::request::{build_request, Credentials};
use crate::{Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// The undecoded result of a successful call: status, headers, and the
/// fully buffered body.
///
/// Returned by the raw-passthrough call shapes; also what interceptors
/// observe on the response channel.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The buffered response body.
    pub body: Bytes,
}

impl RawResponse {
    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns a response header value by name, if present and valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// A client for executing described REST calls.
///
/// The client is designed to be reused across calls: it holds the
/// transport's connection pool, the codec registry, the interceptor bus and
/// the caller's credentials. Cloning is cheap and shares all of them.
///
/// # Examples
///
/// ```no_run
/// use restbound::{Client, MethodDescriptor, Verb};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Contact {
///     name: String,
///     email: String,
/// }
///
/// # async fn example() -> Result<(), restbound::Error> {
/// let client = Client::builder()
///     .base_url("http://example.com")?
///     .build()?;
///
/// let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
///     .path_param("name", "Contact1");
///
/// let contact: Contact = client.execute(descriptor).await?;
/// println!("{} <{}>", contact.name, contact.email);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    registry: CodecRegistry,
    interceptors: InterceptorBus,
    timeout: Duration,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Executes a call and decodes the response into `T`.
    ///
    /// The decode handler is resolved from the registry, keyed by `T` and
    /// the descriptor's `produces` media type, *before* any I/O, so a
    /// missing codec never costs a network round trip.
    pub async fn execute<T: DeserializeOwned + 'static>(
        &self,
        descriptor: MethodDescriptor,
    ) -> Result<T> {
        let media_type = descriptor.produces_media_type().to_string();
        let handler = self
            .inner
            .registry
            .resolve(TypeId::of::<T>(), &media_type)
            .ok_or_else(|| Error::NoHandler {
                media_type: media_type.clone(),
                type_name: std::any::type_name::<T>(),
            })?;

        let raw = self.send(descriptor).await?;

        let payload = handler.read(
            &raw.body,
            &ReadContext {
                media_type: &media_type,
                status: raw.status,
            },
        )?;
        payload.into_typed()
    }

    /// Executes a call with no result: Build -> Send -> Classify only.
    ///
    /// Interceptors are still notified of the response on success.
    pub async fn execute_unit(&self, descriptor: MethodDescriptor) -> Result<()> {
        self.send(descriptor).await.map(|_| ())
    }

    /// Executes a call and returns the undecoded transport response.
    pub async fn execute_raw(&self, descriptor: MethodDescriptor) -> Result<RawResponse> {
        self.send(descriptor).await
    }

    /// Registers a lifecycle interceptor; the returned guard unsubscribes
    /// it on drop.
    pub fn subscribe(&self, interceptor: Arc<dyn Interceptor>) -> Subscription {
        self.inner.interceptors.subscribe(interceptor)
    }

    /// The codec registry this client resolves handlers from.
    pub fn registry(&self) -> &CodecRegistry {
        &self.inner.registry
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub(crate) fn interceptors(&self) -> &InterceptorBus {
        &self.inner.interceptors
    }

    /// Builds, dispatches and classifies one request.
    ///
    /// Transport faults (network errors and non-2xx statuses) are
    /// notified on the interceptor error channel exactly once and then
    /// propagated. The body is fully buffered before returning, so the
    /// connection is released on every path.
    async fn send(&self, descriptor: MethodDescriptor) -> Result<RawResponse> {
        let request = build_request(
            &self.inner.http_client,
            &descriptor,
            &self.inner.base_url,
            self.inner.credentials.as_ref(),
            &self.inner.registry,
        )?;

        self.inner.interceptors.notify_before_send(&request);

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Dispatching HTTP request"
        );

        let response = match self.inner.http_client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = Error::Network(e);
                tracing::warn!(error = %error, "Request failed");
                self.inner.interceptors.notify_error(&error);
                return Err(error);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let error = Error::Network(e);
                tracing::warn!(error = %error, "Failed reading response body");
                self.inner.interceptors.notify_error(&error);
                return Err(error);
            }
        };

        if !status.is_success() {
            let raw_response = String::from_utf8_lossy(&body).into_owned();
            if status.is_client_error() {
                tracing::error!(status = status.as_u16(), response = %raw_response, "Client error (4xx)");
            } else {
                tracing::warn!(status = status.as_u16(), response = %raw_response, "Server error");
            }
            let error = Error::Http {
                status,
                raw_response,
                headers,
            };
            self.inner.interceptors.notify_error(&error);
            return Err(error);
        }

        tracing::info!(status = status.as_u16(), "Received HTTP response");

        let raw = RawResponse {
            status,
            headers,
            body,
        };
        self.inner.interceptors.notify_response(&raw);
        Ok(raw)
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use restbound::{Client, CodecRegistry, Credentials};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), restbound::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .credentials(Credentials::Bearer("token".to_string()))
///     .timeout(Duration::from_secs(10))
///     .registry(CodecRegistry::with_defaults())
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
    registry: Option<CodecRegistry>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    timeout: Duration,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

/// Default wait for the blocking call shapes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            registry: None,
            interceptors: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the base address all request targets are resolved against.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the credentials attached to every request.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the codec registry. Defaults to
    /// [`CodecRegistry::with_defaults`].
    pub fn registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Registers an interceptor for the lifetime of the client.
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Sets the wait duration for the blocking call shapes.
    ///
    /// Applies to every synchronous call on the client unless rebuilt;
    /// asynchronous calls are unaffected.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or the underlying
    /// transport cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Configuration("Base URL is required".to_string()))?;

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        let interceptors = InterceptorBus::new();
        for interceptor in self.interceptors {
            interceptors.register(interceptor);
        }

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                credentials: self.credentials,
                registry: self.registry.unwrap_or_else(CodecRegistry::with_defaults),
                interceptors,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
