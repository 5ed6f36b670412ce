//! Synchronous call shapes.
//!
//! [`BlockingClient`] wraps a [`Client`] together with a private
//! current-thread runtime, so callers without an async context can execute
//! descriptors with a plain function call. The calling thread blocks until
//! completion or until the client's configured timeout elapses; expiry
//! surfaces as the distinct [`Error::Timeout`], never folded into a generic
//! transport fault.
//!
//! Do not use these shapes from inside an async runtime: blocking a
//! runtime thread deadlocks it. From async code, call the [`Client`]
//! methods directly (they impose no engine-level timeout).

use crate::client::{Client, RawResponse};
use crate::descriptor::MethodDescriptor;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::future::Future;

/// A blocking facade over [`Client`].
///
/// # Examples
///
/// ```no_run
/// use restbound::{Client, MethodDescriptor, Verb};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), restbound::Error> {
/// let client = Client::builder()
///     .base_url("http://example.com")?
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// let blocking = client.blocking()?;
///
/// let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
///     .path_param("name", "Contact1");
/// let contact: serde_json::Value = blocking.execute(descriptor)?;
/// # Ok(())
/// # }
/// ```
pub struct BlockingClient {
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl Client {
    /// Creates a blocking facade sharing this client's configuration,
    /// registry and interceptors.
    pub fn blocking(&self) -> Result<BlockingClient> {
        BlockingClient::new(self.clone())
    }
}

impl BlockingClient {
    /// Wraps a client in a blocking facade with its own private runtime.
    pub fn new(client: Client) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build runtime: {e}")))?;
        Ok(Self { client, runtime })
    }

    /// Executes a call and decodes the response into `T`, blocking the
    /// calling thread.
    pub fn execute<T: DeserializeOwned + 'static>(&self, descriptor: MethodDescriptor) -> Result<T> {
        self.wait(self.client.execute(descriptor))
    }

    /// Executes a call with no result, blocking the calling thread.
    pub fn execute_unit(&self, descriptor: MethodDescriptor) -> Result<()> {
        self.wait(self.client.execute_unit(descriptor))
    }

    /// Executes a call and returns the undecoded transport response,
    /// blocking the calling thread.
    pub fn execute_raw(&self, descriptor: MethodDescriptor) -> Result<RawResponse> {
        self.wait(self.client.execute_raw(descriptor))
    }

    /// The wrapped asynchronous client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn wait<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        let limit = self.client.timeout();
        match self
            .runtime
            .block_on(async { tokio::time::timeout(limit, call).await })
        {
            Ok(result) => result,
            Err(_elapsed) => {
                let error = Error::Timeout { limit };
                tracing::warn!(limit = ?limit, "Blocking call timed out");
                self.client.interceptors().notify_error(&error);
                Err(error)
            }
        }
    }
}
