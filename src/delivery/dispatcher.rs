//! Public dispatcher type exported by the crate.

use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use log::{error, warn};
use parking_lot::Mutex;

use crate::{
    error::GelfError,
    message::{Extra, GelfMessage},
    rate_limited_warner::RateLimitedWarner,
};

use super::{
    config::DispatcherConfig,
    transport::{Endpoint, Transport, UdpTransport},
    worker::{DeliveryCommand, enqueue_message, flush_queue, request_shutdown, spawn_worker},
};

/// Owns the delivery queue, the worker thread, and the cached host name.
///
/// `send` may be called concurrently from any number of threads through a
/// shared reference. It blocks only while the queue is full and never
/// reports delivery failures; those are logged by the worker.
///
/// A dispatcher whose initialisation failed has no queue. Messages sent to
/// it are discarded with a rate-limited warning.
pub struct GelfDispatcher {
    tx: Option<Sender<DeliveryCommand>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    hostname: String,
    warner: RateLimitedWarner,
    config: DispatcherConfig,
}

fn resolve_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(err) => {
            warn!("GELF dispatcher could not determine the local host name: {err}");
            String::new()
        }
    }
}

impl GelfDispatcher {
    /// Open a UDP transport to `address:port` and start the worker.
    ///
    /// Failure is logged and yields an uninitialised dispatcher; see
    /// [`try_initialize`](Self::try_initialize) to handle it instead.
    pub fn initialize(address: &str, port: u16) -> Self {
        Self::initialize_with(DispatcherConfig::new(Endpoint::new(address, port)))
    }

    /// Like [`initialize`](Self::initialize) with a full configuration.
    pub fn initialize_with(config: DispatcherConfig) -> Self {
        let hostname = config.hostname.clone().unwrap_or_else(resolve_hostname);
        match UdpTransport::open(&config.endpoint) {
            Ok(transport) => Self::start(config, hostname, Box::new(transport)),
            Err(err) => {
                error!("critical: GELF dispatcher initialisation failed, logging disabled: {err}");
                Self::uninitialized(config, hostname)
            }
        }
    }

    /// Open the configured endpoint, returning the error instead of logging it.
    pub fn try_initialize(config: DispatcherConfig) -> Result<Self, GelfError> {
        let transport = UdpTransport::open(&config.endpoint)?;
        let hostname = config.hostname.clone().unwrap_or_else(resolve_hostname);
        Ok(Self::start(config, hostname, Box::new(transport)))
    }

    /// Start the pipeline over an already opened transport.
    pub fn with_transport<T: Transport + 'static>(config: DispatcherConfig, transport: T) -> Self {
        let hostname = config.hostname.clone().unwrap_or_else(resolve_hostname);
        Self::start(config, hostname, Box::new(transport))
    }

    fn start(config: DispatcherConfig, hostname: String, transport: Box<dyn Transport>) -> Self {
        let (tx, handle) = spawn_worker(config.capacity, transport);
        Self {
            tx: Some(tx),
            handle: Mutex::new(Some(handle)),
            hostname,
            warner: RateLimitedWarner::new(config.warn_interval),
            config,
        }
    }

    pub(super) fn uninitialized(config: DispatcherConfig, hostname: String) -> Self {
        Self {
            tx: None,
            handle: Mutex::new(None),
            hostname,
            warner: RateLimitedWarner::new(config.warn_interval),
            config,
        }
    }

    /// Close the current worker and transport, then initialise against a
    /// new endpoint.
    pub fn reinitialize(&mut self, address: &str, port: u16) {
        self.close();
        let config = self
            .config
            .clone()
            .with_endpoint(Endpoint::new(address, port));
        *self = Self::initialize_with(config);
    }

    /// Build a message stamped with the cached host name and the current
    /// time, and enqueue it for delivery.
    pub fn send(
        &self,
        short_message: &str,
        full_message: &str,
        level: impl Into<u32>,
        extra: Extra,
    ) {
        let message = GelfMessage::new(&self.hostname, short_message, full_message, level.into())
            .with_extra(extra);
        self.send_message(message);
    }

    /// Enqueue a caller-built message.
    pub fn send_message(&self, message: GelfMessage) {
        let Some(tx) = self.tx.as_ref() else {
            self.warner.record_drop();
            self.warner.warn_if_due(|count| {
                warn!("GELF dispatcher is not initialised; dropped {count} messages");
            });
            return;
        };
        enqueue_message(tx, message, &self.warner);
    }

    /// Whether a queue and worker exist.
    pub fn is_initialized(&self) -> bool {
        self.tx.is_some()
    }

    /// Host name stamped on outgoing messages.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.config.endpoint
    }

    /// Wait until every message enqueued before this call has been handed to
    /// the transport. Returns `false` when uninitialised or on timeout.
    pub fn flush(&self) -> bool {
        let Some(tx) = self.tx.as_ref() else {
            return false;
        };
        self.warner.flush(|count| {
            warn!("GELF dispatcher dropped {count} messages in the last interval");
        });
        flush_queue(tx, self.config.flush_timeout)
    }

    /// Drain the queue, close the transport, and join the worker.
    ///
    /// The shutdown acknowledgement is bounded by the flush timeout but the
    /// join is not: a worker stalled inside `Transport::write` keeps `close`,
    /// and therefore `Drop`, blocked until that write returns.
    pub fn close(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        if !request_shutdown(&tx, self.config.flush_timeout) {
            warn!("GELF worker did not acknowledge shutdown in time");
        }
        drop(tx);
        let Some(handle) = self.handle.lock().take() else {
            return;
        };
        if handle.join().is_err() {
            warn!("GELF worker thread panicked");
        }
    }
}

impl Drop for GelfDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for GelfDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GelfDispatcher")
            .field("endpoint", &self.config.endpoint)
            .field("hostname", &self.hostname)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
