//! Common media type constants.

/// Plain text media type.
pub const TEXT_PLAIN: &str = "text/plain";

/// HTML text media type.
pub const TEXT_HTML: &str = "text/html";

/// Application JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// Raw binary media type.
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// URL-encoded form media type.
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
