//! Observability module for the Mailgun client.
//!
//! The client emits `tracing` spans and events; this module offers a
//! subscriber setup for applications that have none, and the redaction used
//! before anything credential-shaped reaches a log line.

mod logging;

pub use logging::{redact, LogFormat, LogLevel, LoggingConfig};
