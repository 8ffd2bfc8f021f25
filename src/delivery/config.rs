//! Configuration consumed by [`GelfDispatcher`](super::GelfDispatcher).

use std::time::Duration;

use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

use super::transport::Endpoint;

/// Number of messages that may wait for the worker before `send` blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
/// Conventional GELF UDP port.
pub const DEFAULT_GELF_PORT: u16 = 12201;
/// How long `flush` and `close` wait for the worker to acknowledge.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration object describing how to construct a dispatcher.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub endpoint: Endpoint,
    pub capacity: usize,
    /// Overrides the host name looked up from the operating system.
    pub hostname: Option<String>,
    pub warn_interval: Duration,
    pub flush_timeout: Duration,
}

/// Defaults target a local aggregator so production callers are expected to
/// supply their own endpoint.
impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::new("127.0.0.1", DEFAULT_GELF_PORT),
            capacity: DEFAULT_QUEUE_CAPACITY,
            hostname: None,
            warn_interval: DEFAULT_WARN_INTERVAL,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }
}

impl DispatcherConfig {
    /// Configuration targeting `endpoint` with all other values defaulted.
    pub fn new(endpoint: Endpoint) -> Self {
        Self::default().with_endpoint(endpoint)
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Override the queue capacity. Zero makes every `send` a rendezvous with
    /// the worker.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warn_interval = interval;
        self
    }

    pub fn with_flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }
}
