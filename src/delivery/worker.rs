//! Worker thread driving GELF delivery.
//!
//! The worker is the sole consumer of the bounded queue and the sole owner
//! of the transport. Each message is encoded and written; failures are
//! logged and the message dropped, so nothing is reported back to producers.

use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, SendError, Sender, bounded};
use log::{error, warn};

use crate::{error::GelfError, message::GelfMessage, rate_limited_warner::RateLimitedWarner};

use super::{encode::encode_message, transport::Transport};

/// Commands processed by the worker thread, in queue order.
#[derive(Debug)]
pub enum DeliveryCommand {
    Message(GelfMessage),
    /// Acknowledged once every earlier command has been processed.
    Flush(Sender<()>),
    /// Close the transport, acknowledge, and exit.
    Shutdown(Sender<()>),
}

pub fn spawn_worker(
    capacity: usize,
    transport: Box<dyn Transport>,
) -> (Sender<DeliveryCommand>, JoinHandle<()>) {
    let (tx, rx) = bounded(capacity);
    let handle = thread::spawn(move || worker_loop(rx, transport));
    (tx, handle)
}

fn worker_loop(rx: Receiver<DeliveryCommand>, mut transport: Box<dyn Transport>) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            DeliveryCommand::Message(message) => deliver(transport.as_mut(), &message),
            DeliveryCommand::Flush(ack) => {
                let _ = ack.send(());
            }
            DeliveryCommand::Shutdown(ack) => {
                close_transport(transport.as_mut());
                let _ = ack.send(());
                return;
            }
        }
    }
    close_transport(transport.as_mut());
}

fn deliver(transport: &mut dyn Transport, message: &GelfMessage) {
    let result = encode_message(message).and_then(|payload| transport.write(&payload));
    match result {
        Ok(()) => {}
        Err(err @ GelfError::Encoding(_)) => {
            error!("GELF worker dropped message {:?}: {err}", message.short_message);
        }
        Err(err) => {
            error!("GELF worker write failed, message dropped: {err}");
        }
    }
}

fn close_transport(transport: &mut dyn Transport) {
    if let Err(err) = transport.close() {
        error!("GELF worker failed to close transport: {err}");
    }
}

/// Enqueue a message, blocking while the queue is full.
pub fn enqueue_message(
    tx: &Sender<DeliveryCommand>,
    message: GelfMessage,
    warner: &RateLimitedWarner,
) {
    if let Err(SendError(_)) = tx.send(DeliveryCommand::Message(message)) {
        warner.record_drop();
        warner.warn_if_due(|count| {
            warn!("GELF worker has stopped; dropped {count} messages");
        });
    }
}

/// Wait until the worker has processed every command queued before this call.
pub fn flush_queue(tx: &Sender<DeliveryCommand>, timeout: Duration) -> bool {
    let (ack_tx, ack_rx) = bounded(1);
    if tx
        .send_timeout(DeliveryCommand::Flush(ack_tx), timeout)
        .is_err()
    {
        return false;
    }
    ack_rx.recv_timeout(timeout).is_ok()
}

/// Ask the worker to stop after draining earlier messages.
pub fn request_shutdown(tx: &Sender<DeliveryCommand>, timeout: Duration) -> bool {
    let (ack_tx, ack_rx) = bounded(1);
    if tx
        .send_timeout(DeliveryCommand::Shutdown(ack_tx), timeout)
        .is_err()
    {
        return false;
    }
    ack_rx.recv_timeout(timeout).is_ok()
}
