//! Per-call endpoint descriptors.
//!
//! A [`MethodDescriptor`] is the structured record of one endpoint
//! invocation: verb, path templates, media types, and parameter bindings.
//! A service adapter builds one fresh per call, populates it in a single
//! pass, and hands it to the client; the request builder consumes it
//! exactly once.

use crate::codec::Body;
use crate::params::{ParamValue, ParameterCollection};
use crate::{media_type, Result};
use http::Method;
use std::collections::HashMap;
use std::fmt;

/// The HTTP verbs supported by descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    /// The corresponding `http::Method`.
    pub fn as_method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_method().as_str())
    }
}

/// The structured, per-call representation of one endpoint's routing and
/// serialization metadata.
///
/// `consumes` governs the outbound `Content-Type` and the request body
/// encoder; `produces` governs the `Accept` header and the response
/// decoder. Both default to `application/json` and can be overridden per
/// descriptor.
///
/// # Examples
///
/// ```
/// use restbound::{MethodDescriptor, Verb};
///
/// let descriptor = MethodDescriptor::new(Verb::Get, "/api/contact", "/{name}")
///     .path_param("name", "Contact1")
///     .query_param("verbose", Some(true))?;
/// # Ok::<(), restbound::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    verb: Verb,
    service_path: String,
    method_path: String,
    consumes: String,
    produces: String,
    header_parameters: Vec<(String, String)>,
    path_parameters: HashMap<String, ParamValue>,
    query_parameters: ParameterCollection,
    form_parameters: ParameterCollection,
    request_body: Option<Body>,
}

impl MethodDescriptor {
    /// Creates a descriptor for one endpoint call.
    ///
    /// `service_path` is the root shared by all of a service's endpoints;
    /// `method_path` is the endpoint's own template. Both may contain
    /// `{name}` placeholders.
    pub fn new(
        verb: Verb,
        service_path: impl Into<String>,
        method_path: impl Into<String>,
    ) -> Self {
        Self {
            verb,
            service_path: service_path.into(),
            method_path: method_path.into(),
            consumes: media_type::APPLICATION_JSON.to_string(),
            produces: media_type::APPLICATION_JSON.to_string(),
            header_parameters: Vec::new(),
            path_parameters: HashMap::new(),
            query_parameters: ParameterCollection::new(),
            form_parameters: ParameterCollection::new(),
            request_body: None,
        }
    }

    /// Overrides the media type of the request body (outbound
    /// `Content-Type`).
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes = media_type.into();
        self
    }

    /// Overrides the media type expected of the response (`Accept` header
    /// and decode format).
    pub fn produces(mut self, media_type: impl Into<String>) -> Self {
        self.produces = media_type.into();
        self
    }

    /// Binds a value to a `{name}` placeholder in the path templates.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter, skipping absent or empty values.
    pub fn query_param(
        mut self,
        name: impl Into<String>,
        value: Option<impl Into<ParamValue>>,
    ) -> Result<Self> {
        self.query_parameters = self.query_parameters.maybe_add(name, value)?;
        Ok(self)
    }

    /// Adds a query parameter that must be present.
    pub fn require_query_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<Self> {
        self.query_parameters = self.query_parameters.add(name, value)?;
        Ok(self)
    }

    /// Adds a form parameter, skipping absent or empty values.
    ///
    /// Non-empty form parameters take precedence over a request body: the
    /// request builder writes them as a url-encoded form body and ignores
    /// [`MethodDescriptor::body`] entirely.
    pub fn form_param(
        mut self,
        name: impl Into<String>,
        value: Option<impl Into<ParamValue>>,
    ) -> Result<Self> {
        self.form_parameters = self.form_parameters.maybe_add(name, value)?;
        Ok(self)
    }

    /// Adds a header parameter.
    ///
    /// Headers named `content-type` or `accept` (case-insensitively)
    /// override the values derived from `consumes`/`produces` instead of
    /// being applied as raw header entries.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_parameters.push((name.into(), value.into()));
        self
    }

    /// Sets the request body.
    ///
    /// At most one body is carried per call; setting another replaces the
    /// first. Ignored when form parameters are present.
    pub fn body(mut self, body: Body) -> Self {
        self.request_body = Some(body);
        self
    }

    pub(crate) fn verb(&self) -> Verb {
        self.verb
    }

    pub(crate) fn service_path(&self) -> &str {
        &self.service_path
    }

    pub(crate) fn method_path(&self) -> &str {
        &self.method_path
    }

    pub(crate) fn consumes_media_type(&self) -> &str {
        &self.consumes
    }

    /// The media type governing response decoding.
    pub(crate) fn produces_media_type(&self) -> &str {
        &self.produces
    }

    pub(crate) fn header_parameters(&self) -> &[(String, String)] {
        &self.header_parameters
    }

    pub(crate) fn path_parameters(&self) -> &HashMap<String, ParamValue> {
        &self.path_parameters
    }

    pub(crate) fn query_parameters(&self) -> &ParameterCollection {
        &self.query_parameters
    }

    pub(crate) fn form_parameters(&self) -> &ParameterCollection {
        &self.form_parameters
    }

    pub(crate) fn request_body(&self) -> Option<&Body> {
        self.request_body.as_ref()
    }
}
