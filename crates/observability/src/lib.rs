//! # einlass-observability
//!
//! Observability-Crate fuer Einlass:
//! - Structured Logging via tracing-subscriber (Text oder JSON)
//! - Uebersteuerung per Umgebungsvariablen `EINLASS_LOG_LEVEL` / `EINLASS_LOG_FORMAT`

pub mod logging;

pub use logging::{logging_initialisieren, LogFormat, LoggingFehler, LoggingKonfig};
