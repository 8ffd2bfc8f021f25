//! Fire-and-forget delivery of GELF log messages over UDP.
//!
//! Build a [`GelfDispatcher`] once at start-up and share it with the call
//! sites that emit log events:
//!
//! ```no_run
//! use femtogelf::{Extra, GelfDispatcher, Severity};
//!
//! let dispatcher = GelfDispatcher::initialize("graylog.internal", 12201);
//! let mut extra = Extra::new();
//! extra.insert("volume".into(), "/data".into());
//! dispatcher.send("disk full", "volume /data at 98%", Severity::Error, extra);
//! ```

mod delivery;
mod error;
mod level;
mod log_compat;
mod message;
pub mod rate_limited_warner;

pub use delivery::{
    DEFAULT_FLUSH_TIMEOUT, DEFAULT_GELF_PORT, DEFAULT_QUEUE_CAPACITY, DispatcherConfig, Endpoint,
    FRAME_TERMINATOR, GelfDispatcher, Transport, UdpTransport, encode_message, frame_payload,
    serialise_message,
};
pub use error::GelfError;
pub use level::Severity;
pub use log_compat::{GelfLogAdapter, install_global_logger};
pub use message::{Extra, GELF_VERSION, GelfMessage};
