//! GELF message representation.
//!
//! A [`GelfMessage`] is built once per `send` call, moved through the
//! delivery queue, and consumed by the worker. Additional fields are kept
//! unprefixed here; the encoder adds the `_` marker on the wire.

use std::fmt;

use serde_json::{Map, Value};

/// GELF protocol version stamped on every message.
pub const GELF_VERSION: &str = "1.1";

/// Caller-supplied additional fields, keyed without the `_` prefix.
pub type Extra = Map<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct GelfMessage {
    /// Protocol version, always [`GELF_VERSION`] for constructed messages.
    pub version: String,
    /// Name of the host that produced the message.
    pub host: String,
    /// Short descriptive message. Required by GELF.
    pub short_message: String,
    /// Long message, possibly empty.
    pub full_message: String,
    /// Seconds since the UNIX epoch, zero when unknown.
    pub timestamp: i64,
    /// Syslog severity, see [`Severity`](crate::Severity).
    pub level: u32,
    /// Additional fields.
    pub extra: Extra,
}

impl GelfMessage {
    /// Construct a message stamped with the current wall-clock time.
    pub fn new(host: &str, short_message: &str, full_message: &str, level: u32) -> Self {
        Self {
            version: GELF_VERSION.to_owned(),
            host: host.to_owned(),
            short_message: short_message.to_owned(),
            full_message: full_message.to_owned(),
            timestamp: chrono::Utc::now().timestamp(),
            level,
            extra: Extra::new(),
        }
    }

    /// Attach additional fields, replacing any set previously.
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }

    /// Add a single additional field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Override the timestamp.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Display for GelfMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.host, self.level, self.short_message)
    }
}
