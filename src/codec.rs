//! The codec registry: pluggable reader/writer pairs per media type or
//! concrete Rust type.
//!
//! Handlers exchange data with the engine through the type-erased
//! [`Payload`] enum rather than generics, keeping [`MediaTypeHandler`]
//! object-safe so the registry can hold trait objects. The typed boundary
//! (`T: Serialize` going in, `T: DeserializeOwned` coming out) lives in
//! [`Body::serialize`] and [`Payload::into_typed`].
//!
//! Registering a handler is the main extension point of the crate: new
//! content types and new body types need no core changes.

use crate::{Error, Result};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Type-erased request/response payload exchanged between the execution
/// engine and media type handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A structured value, the interchange form for structured-text codecs.
    Json(serde_json::Value),
    /// A plain text value.
    Text(String),
    /// A raw byte value.
    Bytes(Vec<u8>),
    /// A file to be uploaded; only meaningful on the write path.
    File(PathBuf),
}

impl Payload {
    /// Converts a decoded payload into the caller's declared type.
    ///
    /// `Json` and `Text` payloads go through serde; `Bytes` payloads are
    /// handed over directly when `T` is `Vec<u8>`.
    pub fn into_typed<T: DeserializeOwned + 'static>(self) -> Result<T> {
        match self {
            Payload::Json(value) => {
                let raw = value.to_string();
                serde_json::from_value(value).map_err(|e| Error::Decode {
                    raw_response: raw,
                    detail: e.to_string(),
                })
            }
            Payload::Text(text) => {
                if TypeId::of::<T>() == TypeId::of::<String>() {
                    let any: Box<dyn Any> = Box::new(text);
                    return any.downcast::<T>().map(|v| *v).map_err(|_| Error::Decode {
                        raw_response: String::new(),
                        detail: "string downcast failed".to_string(),
                    });
                }
                serde_json::from_value(serde_json::Value::String(text.clone())).map_err(|e| {
                    Error::Decode {
                        raw_response: text,
                        detail: e.to_string(),
                    }
                })
            }
            Payload::Bytes(bytes) => {
                let any: Box<dyn Any> = Box::new(bytes);
                any.downcast::<T>().map(|v| *v).map_err(|_| Error::Decode {
                    raw_response: String::new(),
                    detail: format!(
                        "byte payload cannot decode into `{}`",
                        std::any::type_name::<T>()
                    ),
                })
            }
            Payload::File(path) => Err(Error::Decode {
                raw_response: String::new(),
                detail: format!("file payload `{}` is write-only", path.display()),
            }),
        }
    }
}

/// A request body: a payload plus the concrete type it was built from.
///
/// The captured [`TypeId`] drives the registry's type-specific handler
/// override; the payload is what the resolved handler actually writes.
#[derive(Debug, Clone)]
pub struct Body {
    type_id: TypeId,
    type_name: &'static str,
    payload: Payload,
}

impl Body {
    /// Builds a body from any serializable value.
    pub fn serialize<T: Serialize + 'static>(value: &T) -> Result<Self> {
        let payload = serde_json::to_value(value).map_err(|e| Error::Encode {
            media_type: String::new(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            payload: Payload::Json(payload),
        })
    }

    /// Builds a plain text body.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            type_id: TypeId::of::<String>(),
            type_name: std::any::type_name::<String>(),
            payload: Payload::Text(value.into()),
        }
    }

    /// Builds a raw byte body.
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self {
            type_id: TypeId::of::<Vec<u8>>(),
            type_name: std::any::type_name::<Vec<u8>>(),
            payload: Payload::Bytes(value.into()),
        }
    }

    /// Builds a body that uploads the contents of a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            type_id: TypeId::of::<PathBuf>(),
            type_name: std::any::type_name::<PathBuf>(),
            payload: Payload::File(path.into()),
        }
    }

    /// The `TypeId` of the value the body was built from.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type-erased payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Context passed to a handler's write operation.
#[derive(Debug)]
pub struct WriteContext<'a> {
    /// The negotiated outbound media type.
    pub media_type: &'a str,
}

/// Context passed to a handler's read operation.
#[derive(Debug)]
pub struct ReadContext<'a> {
    /// The media type the response is decoded as.
    pub media_type: &'a str,
    /// The response status code.
    pub status: StatusCode,
}

/// A registered reader/writer pair for one content type or concrete body
/// type.
///
/// Handlers must be stateless or internally synchronized: one instance
/// serves concurrent calls. The registry performs no I/O itself; handlers
/// transform fully buffered bodies.
pub trait MediaTypeHandler: Send + Sync {
    /// Serializes a payload into the outbound request body.
    fn write(&self, payload: &Payload, ctx: &WriteContext<'_>) -> Result<Vec<u8>>;

    /// Deserializes an inbound response body into a payload.
    fn read(&self, body: &[u8], ctx: &ReadContext<'_>) -> Result<Payload>;
}

/// Maps media types and concrete Rust types to their handlers.
///
/// Lookup prefers a type-specific handler over a media-type handler;
/// [`CodecRegistry::resolve`] returns `None` when neither matches, leaving
/// the reaction to the caller. Registration is an upsert: re-registering a
/// key replaces the prior handler.
///
/// The registry is populated before the client is built and shared
/// read-only afterwards, so concurrent calls never contend on it.
///
/// # Examples
///
/// ```
/// use restbound::{media_type, CodecRegistry};
///
/// let registry = CodecRegistry::with_defaults();
/// // A lookup for an unknown media type misses without erroring.
/// assert!(registry
///     .resolve(std::any::TypeId::of::<serde_json::Value>(), "application/msgpack")
///     .is_none());
/// assert!(registry
///     .resolve(std::any::TypeId::of::<serde_json::Value>(), media_type::APPLICATION_JSON)
///     .is_some());
/// ```
#[derive(Clone, Default)]
pub struct CodecRegistry {
    by_media_type: HashMap<String, Arc<dyn MediaTypeHandler>>,
    by_type: HashMap<TypeId, Arc<dyn MediaTypeHandler>>,
}

impl CodecRegistry {
    /// Creates an empty registry with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a media type, replacing any prior handler
    /// for the same type.
    pub fn register_media_type(
        &mut self,
        media_type: impl Into<String>,
        handler: Arc<dyn MediaTypeHandler>,
    ) {
        self.by_media_type.insert(media_type.into(), handler);
    }

    /// Registers an override handler for a concrete Rust type, used in
    /// preference to any media-type handler.
    pub fn register_type<T: 'static>(&mut self, handler: Arc<dyn MediaTypeHandler>) {
        self.by_type.insert(TypeId::of::<T>(), handler);
    }

    /// Resolves a handler for the given concrete type and media type.
    ///
    /// The type-specific mapping wins; a miss on both returns `None`
    /// rather than an error.
    pub fn resolve(&self, type_id: TypeId, media_type: &str) -> Option<Arc<dyn MediaTypeHandler>> {
        self.by_type
            .get(&type_id)
            .or_else(|| self.by_media_type.get(media_type))
            .cloned()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("media_types", &self.by_media_type.keys().collect::<Vec<_>>())
            .field("type_overrides", &self.by_type.len())
            .finish()
    }
}
