//! Transport primitives for GELF delivery.

use std::{
    fmt, io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::GelfError;

/// Remote aggregator address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or IP address of the aggregator.
    pub address: String,
    /// UDP port number.
    pub port: u16,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    fn socket_addrs(&self) -> io::Result<Vec<SocketAddr>> {
        (self.address.as_str(), self.port)
            .to_socket_addrs()
            .map(|iter| iter.collect())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.contains(':') {
            write!(f, "[{}]:{}", self.address, self.port)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

/// Parses `host:port` or `[v6addr]:port`.
impl FromStr for Endpoint {
    type Err = GelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GelfError::InvalidEndpoint(s.to_owned());
        let (host, port) = s.rsplit_once(':').ok_or_else(invalid)?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self::new(host, port))
    }
}

/// Destination for encoded GELF payloads.
///
/// The delivery worker is the only caller, so implementations need not be
/// `Sync`. Reliability layers (retry, spooling) wrap a transport rather than
/// living in the worker.
pub trait Transport: Send {
    /// Write one complete payload.
    fn write(&mut self, payload: &[u8]) -> Result<(), GelfError>;

    /// Release the underlying resources. Repeated calls are no-ops.
    fn close(&mut self) -> Result<(), GelfError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, payload: &[u8]) -> Result<(), GelfError> {
        (**self).write(payload)
    }

    fn close(&mut self) -> Result<(), GelfError> {
        (**self).close()
    }
}

/// Connected UDP socket sending one datagram per payload.
#[derive(Debug)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Resolve `endpoint`, bind an ephemeral local port of the same address
    /// family and connect the socket to the first resolved address.
    pub fn open(endpoint: &Endpoint) -> Result<Self, GelfError> {
        let peer = endpoint
            .socket_addrs()
            .and_then(|addrs| {
                addrs.into_iter().next().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")
                })
            })
            .map_err(|source| GelfError::Resolution {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let connect_err = |source| GelfError::Connect {
            endpoint: endpoint.to_string(),
            source,
        };
        let socket = UdpSocket::bind(local).map_err(connect_err)?;
        socket.connect(peer).map_err(connect_err)?;
        Ok(Self {
            socket: Some(socket),
            peer,
        })
    }

    /// Address the socket is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Local address, `None` once closed.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}

impl Transport for UdpTransport {
    fn write(&mut self, payload: &[u8]) -> Result<(), GelfError> {
        let socket = self.socket.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "UDP transport is closed")
        })?;
        let sent = socket.send(payload)?;
        if sent != payload.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram write: {sent} of {} bytes", payload.len()),
            )
            .into());
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), GelfError> {
        // Dropping the socket releases the descriptor; std offers no fallible close.
        self.socket.take();
        Ok(())
    }
}
