//! # Restbound - a declarative REST client runtime
//!
//! Restbound turns a description of an endpoint (verb, path templates,
//! parameter bindings, media types) into an executed, typed HTTP call.
//! Service adapters build a [`MethodDescriptor`] per invocation and hand it
//! to a [`Client`]; everything from placeholder substitution to response
//! decoding happens in the runtime, with no hand-written networking code
//! per endpoint.
//!
//! ## Quick Start
//!
//! ```no_run
//! use restbound::{Body, Client, MethodDescriptor, Verb};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewContact {
//!     name: String,
//!     email: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Contact {
//!     name: String,
//!     email: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restbound::Error> {
//!     let client = Client::builder()
//!         .base_url("http://example.com")?
//!         .build()?;
//!
//!     // GET http://example.com/api/contact/Contact1
//!     let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
//!         .path_param("name", "Contact1");
//!     let contact: Contact = client.execute(descriptor).await?;
//!     println!("{} <{}>", contact.name, contact.email);
//!
//!     // POST http://example.com/api/contact with a JSON body
//!     let new_contact = NewContact {
//!         name: "Contact2".to_string(),
//!         email: "contact2@example.com".to_string(),
//!     };
//!     let descriptor = MethodDescriptor::new(Verb::Post, "/api/contact", "/")
//!         .body(Body::serialize(&new_contact)?);
//!     client.execute_unit(descriptor).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Descriptor-driven requests** - path templates with `{name}`
//!   placeholders, ordered query/form parameters, header bindings, and a
//!   typed request body, assembled into a full request by the runtime
//! - **Pluggable codecs** - a [`CodecRegistry`] maps media types and
//!   concrete Rust types to reader/writer pairs; new wire formats are a
//!   registration away, with type-specific handlers overriding media-type
//!   handlers
//! - **Dual execution model** - `async` call shapes on the shared client,
//!   plus blocking shapes with a distinct, configurable timeout via
//!   [`blocking::BlockingClient`]
//! - **Lifecycle interceptors** - before-send / response / error channels
//!   for logging, auditing and metrics, with isolated observer failures
//! - **Rich error handling** - a single [`Error`] taxonomy that keeps raw
//!   response bodies, status codes and headers for debugging
//! - **Structured logging** - request build and dispatch instrumented with
//!   `tracing`
//!
//! ## Call shapes
//!
//! | Shape | Async | Blocking |
//! |-------|-------|----------|
//! | Typed result | [`Client::execute`] | [`blocking::BlockingClient::execute`] |
//! | No result | [`Client::execute_unit`] | [`blocking::BlockingClient::execute_unit`] |
//! | Raw passthrough | [`Client::execute_raw`] | [`blocking::BlockingClient::execute_raw`] |
//!
//! Blocking shapes time out after the client's configured duration and
//! raise [`Error::Timeout`]; async shapes impose no engine-level timeout.
//!
//! ## Extending the codec registry
//!
//! ```
//! use restbound::{CodecRegistry, MediaTypeHandler, Payload, ReadContext, WriteContext};
//! use std::sync::Arc;
//!
//! struct CsvHandler;
//!
//! impl MediaTypeHandler for CsvHandler {
//!     fn write(&self, payload: &Payload, _ctx: &WriteContext<'_>) -> restbound::Result<Vec<u8>> {
//!         // ... render the payload as CSV ...
//!         # let _ = payload;
//!         # Ok(Vec::new())
//!     }
//!
//!     fn read(&self, body: &[u8], _ctx: &ReadContext<'_>) -> restbound::Result<Payload> {
//!         // ... parse CSV into a payload ...
//!         # let _ = body;
//!         # Ok(Payload::Text(String::new()))
//!     }
//! }
//!
//! let mut registry = CodecRegistry::with_defaults();
//! registry.register_media_type("text/csv", Arc::new(CsvHandler));
//! ```

pub mod blocking;
mod client;
mod codec;
pub mod codecs;
mod descriptor;
mod error;
mod interceptor;
pub mod media_type;
mod params;
mod path;
mod request;

pub use client::{Client, ClientBuilder, RawResponse};
pub use codec::{Body, CodecRegistry, MediaTypeHandler, Payload, ReadContext, WriteContext};
pub use descriptor::{MethodDescriptor, Verb};
pub use error::{Error, Result};
pub use interceptor::{Interceptor, InterceptorBus, Subscription};
pub use params::{ParamValue, ParameterCollection};
pub use path::PathTemplate;
pub use request::{build_request, Credentials};
