//! GELF JSON serialisation helpers.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    error::GelfError,
    message::{Extra, GelfMessage},
};

/// Bytes appended to every payload to mark the end of a message.
pub const FRAME_TERMINATOR: [u8; 2] = [b'\n', 0];

#[derive(Serialize)]
struct SerializableMessage<'a> {
    version: &'a str,
    host: &'a str,
    short_message: &'a str,
    full_message: &'a str,
    timestamp: i64,
    level: u32,
    #[serde(flatten)]
    additional: AdditionalFields<'a>,
}

/// Serialises extra fields as GELF additional fields, each key prefixed
/// with `_`.
struct AdditionalFields<'a>(&'a Extra);

impl Serialize for AdditionalFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(&format!("_{key}"), value)?;
        }
        map.end()
    }
}

impl<'a> From<&'a GelfMessage> for SerializableMessage<'a> {
    fn from(message: &'a GelfMessage) -> Self {
        Self {
            version: &message.version,
            host: &message.host,
            short_message: &message.short_message,
            full_message: &message.full_message,
            timestamp: message.timestamp,
            level: message.level,
            additional: AdditionalFields(&message.extra),
        }
    }
}

/// Serialise a message into its JSON payload without the terminator.
pub fn serialise_message(message: &GelfMessage) -> Result<Vec<u8>, GelfError> {
    let mut buf = Vec::with_capacity(256);
    serde_json::to_writer(&mut buf, &SerializableMessage::from(message))?;
    Ok(buf)
}

/// Append the `\n\0` terminator to a payload.
pub fn frame_payload(mut payload: Vec<u8>) -> Vec<u8> {
    payload.extend_from_slice(&FRAME_TERMINATOR);
    payload
}

/// Serialise and frame a message, producing the exact datagram body.
pub fn encode_message(message: &GelfMessage) -> Result<Vec<u8>, GelfError> {
    serialise_message(message).map(frame_payload)
}
