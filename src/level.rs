//! Syslog severities carried in the GELF `level` field.

use std::fmt;
use std::str::FromStr;

/// Severity levels as defined by syslog (RFC 5424), lowest value most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    Debug = 7,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Informational
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Informational => "INFO",
            Severity::Debug => "DEBUG",
        };
        f.write_str(s)
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EMERGENCY" | "EMERG" => Ok(Self::Emergency),
            "ALERT" => Ok(Self::Alert),
            "CRITICAL" | "CRIT" => Ok(Self::Critical),
            "ERROR" | "ERR" => Ok(Self::Error),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "NOTICE" => Ok(Self::Notice),
            "INFO" | "INFORMATIONAL" => Ok(Self::Informational),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(()),
        }
    }
}

impl From<Severity> for u32 {
    fn from(severity: Severity) -> Self {
        severity as u32
    }
}

impl TryFrom<u32> for Severity {
    type Error = u32;

    // `Self::Error` would be ambiguous with the `Error` variant.
    fn try_from(value: u32) -> Result<Self, u32> {
        match value {
            0 => Ok(Severity::Emergency),
            1 => Ok(Severity::Alert),
            2 => Ok(Severity::Critical),
            3 => Ok(Severity::Error),
            4 => Ok(Severity::Warning),
            5 => Ok(Severity::Notice),
            6 => Ok(Severity::Informational),
            7 => Ok(Severity::Debug),
            other => Err(other),
        }
    }
}

/// `log` has no critical level and folds trace into debug here.
impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Informational,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}
