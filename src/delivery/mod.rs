//! Asynchronous GELF delivery pipeline.
//!
//! [`GelfDispatcher`] stamps each message with the local host name and the
//! current time, then pushes it onto a bounded queue. A single worker thread
//! drains the queue, encodes each message as GELF JSON terminated by `\n\0`,
//! and writes it as one UDP datagram. Delivery is best effort: failures are
//! logged by the worker and never surface to the caller.

mod config;
mod dispatcher;
mod encode;
mod transport;
mod worker;


pub use config::{
    DEFAULT_FLUSH_TIMEOUT, DEFAULT_GELF_PORT, DEFAULT_QUEUE_CAPACITY, DispatcherConfig,
};
pub use dispatcher::GelfDispatcher;
pub use encode::{FRAME_TERMINATOR, encode_message, frame_payload, serialise_message};
pub use transport::{Endpoint, Transport, UdpTransport};
