//! Compatibility bridge for the Rust `log` crate.
//!
//! `GelfLogAdapter` implements `log::Log` and forwards each record through a
//! [`GelfDispatcher`], so existing `log::info!` call sites reach the
//! aggregator without changes.

use std::sync::Arc;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::{delivery::GelfDispatcher, level::Severity, message::GelfMessage};

/// Records from this crate are never forwarded; a failing worker would
/// otherwise feed its own error reports back into the queue.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Adapter implementing the Rust `log::Log` trait.
pub struct GelfLogAdapter {
    dispatcher: Arc<GelfDispatcher>,
    max_level: LevelFilter,
}

impl GelfLogAdapter {
    pub fn new(dispatcher: Arc<GelfDispatcher>, max_level: LevelFilter) -> Self {
        Self {
            dispatcher,
            max_level,
        }
    }

    /// Convert a record into a GELF message.
    ///
    /// The first line of the formatted text becomes `short_message`; the full
    /// text is kept in `full_message` only when it spans several lines.
    pub fn to_message(&self, record: &Record<'_>) -> GelfMessage {
        let text = record.args().to_string();
        let (short, full) = match text.split_once('\n') {
            Some((first, _)) => (first, text.as_str()),
            None => (text.as_str(), ""),
        };
        let level = u32::from(Severity::from(record.level()));
        let mut message = GelfMessage::new(self.dispatcher.hostname(), short, full, level)
            .with_field("target", record.target());
        if let Some(module_path) = record.module_path() {
            message = message.with_field("module_path", module_path);
        }
        if let Some(file) = record.file() {
            message = message.with_field("file", file);
        }
        if let Some(line) = record.line() {
            message = message.with_field("line", line);
        }
        message
    }
}

impl log::Log for GelfLogAdapter {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level && !is_own_target(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.dispatcher.send_message(self.to_message(record));
    }

    fn flush(&self) {
        self.dispatcher.flush();
    }
}

/// Install a [`GelfLogAdapter`] as the global `log` logger.
///
/// Fails when another global logger has already been set.
pub fn install_global_logger(
    dispatcher: Arc<GelfDispatcher>,
    max_level: LevelFilter,
) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(GelfLogAdapter::new(dispatcher, max_level)))?;
    log::set_max_level(max_level);
    Ok(())
}
