//! Built-in media type handlers.
//!
//! These cover the default wire formats: JSON, plain text, raw bytes,
//! fixed-width binary scalars, and raw file uploads. Each is independently
//! pluggable; [`CodecRegistry::with_defaults`] wires the standard set.

use crate::codec::{CodecRegistry, MediaTypeHandler, Payload, ReadContext, WriteContext};
use crate::{media_type, Error, Result};
use bytes::{Buf, BufMut};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

fn encode_err(ctx: &WriteContext<'_>, detail: impl Into<String>) -> Error {
    Error::Encode {
        media_type: ctx.media_type.to_string(),
        detail: detail.into(),
    }
}

fn decode_err(body: &[u8], detail: impl Into<String>) -> Error {
    Error::Decode {
        raw_response: String::from_utf8_lossy(body).into_owned(),
        detail: detail.into(),
    }
}

/// Structured-text handler delegating to `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHandler;

impl MediaTypeHandler for JsonHandler {
    fn write(&self, payload: &Payload, ctx: &WriteContext<'_>) -> Result<Vec<u8>> {
        let value = match payload {
            Payload::Json(value) => value.clone(),
            Payload::Text(text) => Value::String(text.clone()),
            other => return Err(encode_err(ctx, format!("unsupported payload {other:?}"))),
        };
        serde_json::to_vec(&value).map_err(|e| encode_err(ctx, e.to_string()))
    }

    fn read(&self, body: &[u8], _ctx: &ReadContext<'_>) -> Result<Payload> {
        serde_json::from_slice(body)
            .map(Payload::Json)
            .map_err(|e| decode_err(body, e.to_string()))
    }
}

/// Handler for plain text bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHandler;

impl MediaTypeHandler for PlainTextHandler {
    fn write(&self, payload: &Payload, ctx: &WriteContext<'_>) -> Result<Vec<u8>> {
        match payload {
            Payload::Text(text) => Ok(text.clone().into_bytes()),
            Payload::Json(Value::String(text)) => Ok(text.clone().into_bytes()),
            Payload::Json(value) => Ok(value.to_string().into_bytes()),
            other => Err(encode_err(ctx, format!("unsupported payload {other:?}"))),
        }
    }

    fn read(&self, body: &[u8], _ctx: &ReadContext<'_>) -> Result<Payload> {
        String::from_utf8(body.to_vec())
            .map(Payload::Text)
            .map_err(|e| decode_err(body, e.to_string()))
    }
}

/// Passthrough handler for raw byte bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesHandler;

impl MediaTypeHandler for BytesHandler {
    fn write(&self, payload: &Payload, ctx: &WriteContext<'_>) -> Result<Vec<u8>> {
        match payload {
            Payload::Bytes(bytes) => Ok(bytes.clone()),
            Payload::Text(text) => Ok(text.clone().into_bytes()),
            other => Err(encode_err(ctx, format!("unsupported payload {other:?}"))),
        }
    }

    fn read(&self, body: &[u8], _ctx: &ReadContext<'_>) -> Result<Payload> {
        Ok(Payload::Bytes(body.to_vec()))
    }
}

/// The scalar kinds served by [`ScalarHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    fn width(self) -> usize {
        match self {
            ScalarKind::Bool | ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }
}

/// Fixed-width little-endian codec for primitive scalar values.
#[derive(Debug, Clone, Copy)]
pub struct ScalarHandler {
    kind: ScalarKind,
}

impl ScalarHandler {
    /// Creates a handler for one scalar kind.
    pub fn new(kind: ScalarKind) -> Self {
        Self { kind }
    }
}

impl MediaTypeHandler for ScalarHandler {
    fn write(&self, payload: &Payload, ctx: &WriteContext<'_>) -> Result<Vec<u8>> {
        let value = match payload {
            Payload::Json(value) => value,
            other => return Err(encode_err(ctx, format!("unsupported payload {other:?}"))),
        };

        let mut buf = Vec::with_capacity(self.kind.width());
        match (self.kind, value) {
            (ScalarKind::Bool, Value::Bool(b)) => buf.put_u8(*b as u8),
            (ScalarKind::I8, Value::Number(n)) if n.as_i64().is_some() => {
                buf.put_i8(n.as_i64().unwrap_or_default() as i8)
            }
            (ScalarKind::I16, Value::Number(n)) if n.as_i64().is_some() => {
                buf.put_i16_le(n.as_i64().unwrap_or_default() as i16)
            }
            (ScalarKind::I32, Value::Number(n)) if n.as_i64().is_some() => {
                buf.put_i32_le(n.as_i64().unwrap_or_default() as i32)
            }
            (ScalarKind::I64, Value::Number(n)) if n.as_i64().is_some() => {
                buf.put_i64_le(n.as_i64().unwrap_or_default())
            }
            (ScalarKind::U8, Value::Number(n)) if n.as_u64().is_some() => {
                buf.put_u8(n.as_u64().unwrap_or_default() as u8)
            }
            (ScalarKind::U16, Value::Number(n)) if n.as_u64().is_some() => {
                buf.put_u16_le(n.as_u64().unwrap_or_default() as u16)
            }
            (ScalarKind::U32, Value::Number(n)) if n.as_u64().is_some() => {
                buf.put_u32_le(n.as_u64().unwrap_or_default() as u32)
            }
            (ScalarKind::U64, Value::Number(n)) if n.as_u64().is_some() => {
                buf.put_u64_le(n.as_u64().unwrap_or_default())
            }
            (ScalarKind::F32, Value::Number(n)) if n.as_f64().is_some() => {
                buf.put_f32_le(n.as_f64().unwrap_or_default() as f32)
            }
            (ScalarKind::F64, Value::Number(n)) if n.as_f64().is_some() => {
                buf.put_f64_le(n.as_f64().unwrap_or_default())
            }
            (kind, value) => {
                return Err(encode_err(
                    ctx,
                    format!("value {value} does not fit scalar kind {kind:?}"),
                ))
            }
        }
        Ok(buf)
    }

    fn read(&self, body: &[u8], _ctx: &ReadContext<'_>) -> Result<Payload> {
        if body.len() < self.kind.width() {
            return Err(decode_err(
                body,
                format!(
                    "scalar {:?} needs {} bytes, got {}",
                    self.kind,
                    self.kind.width(),
                    body.len()
                ),
            ));
        }

        let mut buf = body;
        let value = match self.kind {
            ScalarKind::Bool => Value::Bool(buf.get_u8() != 0),
            ScalarKind::I8 => Value::from(buf.get_i8()),
            ScalarKind::I16 => Value::from(buf.get_i16_le()),
            ScalarKind::I32 => Value::from(buf.get_i32_le()),
            ScalarKind::I64 => Value::from(buf.get_i64_le()),
            ScalarKind::U8 => Value::from(buf.get_u8()),
            ScalarKind::U16 => Value::from(buf.get_u16_le()),
            ScalarKind::U32 => Value::from(buf.get_u32_le()),
            ScalarKind::U64 => Value::from(buf.get_u64_le()),
            ScalarKind::F32 => serde_json::Number::from_f64(f64::from(buf.get_f32_le()))
                .map(Value::Number)
                .ok_or_else(|| decode_err(body, "non-finite float"))?,
            ScalarKind::F64 => serde_json::Number::from_f64(buf.get_f64_le())
                .map(Value::Number)
                .ok_or_else(|| decode_err(body, "non-finite float"))?,
        };
        Ok(Payload::Json(value))
    }
}

/// Write-only handler that uploads the contents of a file verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileHandler;

impl MediaTypeHandler for FileHandler {
    fn write(&self, payload: &Payload, ctx: &WriteContext<'_>) -> Result<Vec<u8>> {
        match payload {
            Payload::File(path) => std::fs::read(path)
                .map_err(|e| encode_err(ctx, format!("reading `{}`: {e}", path.display()))),
            other => Err(encode_err(ctx, format!("unsupported payload {other:?}"))),
        }
    }

    fn read(&self, body: &[u8], _ctx: &ReadContext<'_>) -> Result<Payload> {
        Err(decode_err(body, "file handler is write-only"))
    }
}

impl CodecRegistry {
    /// Creates a registry pre-populated with the built-in handlers.
    ///
    /// Media types: JSON, plain text / HTML, octet-stream. Type overrides:
    /// `String`, `Vec<u8>`, `PathBuf`, and the primitive scalars as
    /// fixed-width little-endian. All of them can be replaced by
    /// re-registering the key.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let json = Arc::new(JsonHandler);
        let text = Arc::new(PlainTextHandler);
        let bytes = Arc::new(BytesHandler);

        registry.register_media_type(media_type::APPLICATION_JSON, json);
        registry.register_media_type(media_type::TEXT_PLAIN, text.clone());
        registry.register_media_type(media_type::TEXT_HTML, text.clone());
        registry.register_media_type(media_type::APPLICATION_OCTET_STREAM, bytes.clone());

        registry.register_type::<String>(text);
        registry.register_type::<Vec<u8>>(bytes);
        registry.register_type::<PathBuf>(Arc::new(FileHandler));

        registry.register_type::<bool>(Arc::new(ScalarHandler::new(ScalarKind::Bool)));
        registry.register_type::<i8>(Arc::new(ScalarHandler::new(ScalarKind::I8)));
        registry.register_type::<i16>(Arc::new(ScalarHandler::new(ScalarKind::I16)));
        registry.register_type::<i32>(Arc::new(ScalarHandler::new(ScalarKind::I32)));
        registry.register_type::<i64>(Arc::new(ScalarHandler::new(ScalarKind::I64)));
        registry.register_type::<u8>(Arc::new(ScalarHandler::new(ScalarKind::U8)));
        registry.register_type::<u16>(Arc::new(ScalarHandler::new(ScalarKind::U16)));
        registry.register_type::<u32>(Arc::new(ScalarHandler::new(ScalarKind::U32)));
        registry.register_type::<u64>(Arc::new(ScalarHandler::new(ScalarKind::U64)));
        registry.register_type::<f32>(Arc::new(ScalarHandler::new(ScalarKind::F32)));
        registry.register_type::<f64>(Arc::new(ScalarHandler::new(ScalarKind::F64)));

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::any::TypeId;

    fn wctx(media: &str) -> WriteContext<'_> {
        WriteContext { media_type: media }
    }

    fn rctx(media: &str) -> ReadContext<'_> {
        ReadContext {
            media_type: media,
            status: StatusCode::OK,
        }
    }

    #[test]
    fn json_handler_round_trips_structured_values() {
        let handler = JsonHandler;
        let payload = Payload::Json(serde_json::json!({ "name": "Contact1", "age": 3 }));

        let written = handler.write(&payload, &wctx("application/json")).unwrap();
        let read = handler.read(&written, &rctx("application/json")).unwrap();
        assert_eq!(read, payload);
    }

    #[test]
    fn json_handler_reports_invalid_body() {
        let err = JsonHandler
            .read(b"not json", &rctx("application/json"))
            .unwrap_err();
        match err {
            Error::Decode { raw_response, .. } => assert_eq!(raw_response, "not json"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_handler_unwraps_json_strings() {
        let written = PlainTextHandler
            .write(
                &Payload::Json(Value::String("hello".to_string())),
                &wctx("text/plain"),
            )
            .unwrap();
        assert_eq!(written, b"hello");
    }

    #[test]
    fn scalar_handler_encodes_little_endian() {
        let handler = ScalarHandler::new(ScalarKind::I32);
        let written = handler
            .write(&Payload::Json(Value::from(0x0102_0304)), &wctx("application/octet-stream"))
            .unwrap();
        assert_eq!(written, vec![0x04, 0x03, 0x02, 0x01]);

        let read = handler
            .read(&written, &rctx("application/octet-stream"))
            .unwrap();
        assert_eq!(read, Payload::Json(Value::from(0x0102_0304)));
    }

    #[test]
    fn scalar_handler_rejects_short_bodies() {
        let err = ScalarHandler::new(ScalarKind::U64)
            .read(&[1, 2, 3], &rctx("application/octet-stream"))
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn bool_scalar_round_trips() {
        let handler = ScalarHandler::new(ScalarKind::Bool);
        let written = handler
            .write(&Payload::Json(Value::Bool(true)), &wctx("application/octet-stream"))
            .unwrap();
        assert_eq!(written, vec![1]);
        assert_eq!(
            handler
                .read(&written, &rctx("application/octet-stream"))
                .unwrap(),
            Payload::Json(Value::Bool(true))
        );
    }

    #[test]
    fn default_registry_prefers_type_overrides() {
        let registry = CodecRegistry::with_defaults();

        // String resolves to the plain text handler even when the call asks
        // for JSON.
        let handler = registry
            .resolve(TypeId::of::<String>(), media_type::APPLICATION_JSON)
            .unwrap();
        let written = handler
            .write(&Payload::Text("raw".to_string()), &wctx(media_type::APPLICATION_JSON))
            .unwrap();
        assert_eq!(written, b"raw");
    }

    #[test]
    fn default_registry_covers_scalars() {
        let registry = CodecRegistry::with_defaults();
        for type_id in [
            TypeId::of::<bool>(),
            TypeId::of::<i32>(),
            TypeId::of::<u64>(),
            TypeId::of::<f64>(),
        ] {
            assert!(registry.resolve(type_id, "application/json").is_some());
        }
    }

    #[test]
    fn file_handler_is_write_only() {
        let err = FileHandler.read(b"", &rctx("application/octet-stream")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
