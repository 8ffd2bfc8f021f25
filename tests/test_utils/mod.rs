//! Shared helpers for integration tests.
//!
//! Provides a loopback UDP collector standing in for the aggregator, plus a
//! helper for decoding the framed GELF payloads it receives.

#![allow(dead_code)]

use std::{net::UdpSocket, time::Duration};

use femtogelf::{DispatcherConfig, Endpoint, FRAME_TERMINATOR};
use rstest::fixture;
use serde_json::Value;

/// Loopback UDP socket that receives datagrams sent by a dispatcher.
pub struct Collector {
    socket: UdpSocket,
}

impl Collector {
    pub fn bind() -> Self {
        let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("bind collector");
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("set collector timeout");
        Self { socket }
    }

    pub fn endpoint(&self) -> Endpoint {
        let addr = self.socket.local_addr().expect("collector address");
        Endpoint::new(addr.ip().to_string(), addr.port())
    }

    /// Dispatcher configuration targeting this collector.
    pub fn config(&self) -> DispatcherConfig {
        DispatcherConfig::new(self.endpoint())
            .with_hostname("host1")
            .with_flush_timeout(Duration::from_secs(2))
    }

    /// Receive one raw datagram.
    pub fn recv_raw(&self) -> Vec<u8> {
        let mut buf = vec![0u8; 65_536];
        let len = self.socket.recv(&mut buf).expect("datagram received");
        buf.truncate(len);
        buf
    }

    /// Receive one datagram and decode its JSON body.
    pub fn recv_json(&self) -> Value {
        decode(&self.recv_raw())
    }
}

/// Strip the frame terminator and parse the JSON body.
pub fn decode(payload: &[u8]) -> Value {
    let body = payload
        .strip_suffix(&FRAME_TERMINATOR)
        .expect("payload ends with frame terminator");
    serde_json::from_slice(body).expect("payload is JSON")
}

#[fixture]
pub fn collector() -> Collector {
    Collector::bind()
}
