//! Building transport requests from method descriptors.
//!
//! [`build_request`] is a pure function from a descriptor plus client
//! configuration to a ready-to-send `reqwest::Request`. Everything here is
//! an in-memory transformation; the network is only touched when the
//! execution engine dispatches the result.

use crate::codec::{CodecRegistry, WriteContext};
use crate::descriptor::MethodDescriptor;
use crate::path::PathTemplate;
use crate::{Error, Result};
use url::Url;

/// Opaque caller credentials attached to every request of a client.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// HTTP basic authentication.
    Basic {
        username: String,
        password: Option<String>,
    },
    /// A bearer token.
    Bearer(String),
}

/// Builds the transport-level request for one descriptor.
///
/// Steps, in order: concatenate and substitute the path templates (failing
/// fast on an unmapped placeholder), attach percent-encoded query pairs in
/// insertion order, set the verb, derive `Content-Type` from `consumes` and
/// `Accept` from `produces` (an explicit header parameter of either name
/// wins, case-insensitively), apply the remaining header parameters, write
/// the body (url-encoded form parameters when present, otherwise the
/// request body through its resolved codec handler), and finally attach
/// credentials.
pub fn build_request(
    http: &reqwest::Client,
    descriptor: &MethodDescriptor,
    base_url: &Url,
    credentials: Option<&Credentials>,
    registry: &CodecRegistry,
) -> Result<reqwest::Request> {
    let endpoint = PathTemplate::parse(descriptor.service_path())
        .append(&PathTemplate::parse(descriptor.method_path()));
    let path = endpoint.substitute(descriptor.path_parameters())?;

    // The computed path replaces the base address path entirely; a shared
    // prefix belongs in the service path.
    let mut url = base_url.clone();
    url.set_path(path.as_str());
    if !descriptor.query_parameters().is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in descriptor.query_parameters().pairs() {
            pairs.append_pair(name, &value.to_string());
        }
    }

    tracing::debug!(
        verb = %descriptor.verb(),
        url = %url,
        "Built request target"
    );

    let mut content_type = descriptor.consumes_media_type().to_string();
    let mut accept = descriptor.produces_media_type().to_string();

    let mut builder = http.request(descriptor.verb().as_method(), url);

    // Most HTTP client APIs special-case these two headers; routing them
    // through the negotiated values also lets an explicit header win over
    // the descriptor's media types.
    for (name, value) in descriptor.header_parameters() {
        if name.eq_ignore_ascii_case("content-type") {
            content_type = value.clone();
        } else if name.eq_ignore_ascii_case("accept") {
            accept = value.clone();
        } else {
            builder = builder.header(name.as_str(), value.as_str());
        }
    }

    builder = builder
        .header(http::header::CONTENT_TYPE, content_type.as_str())
        .header(http::header::ACCEPT, accept.as_str());

    // Form parameters and a request body are mutually exclusive; form
    // encoding wins when both are present.
    if !descriptor.form_parameters().is_empty() {
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in descriptor.form_parameters().pairs() {
            form.append_pair(name, &value.to_string());
        }
        builder = builder.body(form.finish());
    } else if let Some(body) = descriptor.request_body() {
        let media_type = descriptor.consumes_media_type();
        let handler =
            registry
                .resolve(body.type_id(), media_type)
                .ok_or_else(|| Error::NoHandler {
                    media_type: media_type.to_string(),
                    type_name: body.type_name(),
                })?;
        let encoded = handler.write(body.payload(), &WriteContext { media_type })?;
        builder = builder.body(encoded);
    }

    if let Some(credentials) = credentials {
        builder = match credentials {
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, password.as_ref())
            }
            Credentials::Bearer(token) => builder.bearer_auth(token),
        };
    }

    builder
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build request: {e}")))
}
