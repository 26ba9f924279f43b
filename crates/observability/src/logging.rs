//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Datei (`[logging]`) und Umgebungsvariable:
//! - `EINLASS_LOG_LEVEL`: Filter-Ausdruck (z.B. `info` oder `einlass_auth=debug`), Standard: info
//! - `EINLASS_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Umgebungsvariablen haben Vorrang vor der Datei.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG_LEVEL: &str = "EINLASS_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "EINLASS_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum LoggingFehler {
    #[error("Ungueltiger Log-Filter '{0}'")]
    UngueltigerFilter(String),

    #[error("Ungueltiges Log-Format '{0}' (erlaubt: text, json)")]
    UngueltigesFormat(String),

    #[error("Logging bereits initialisiert: {0}")]
    BereitsInitialisiert(String),
}

/// Ausgabeformat der Logzeilen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingFehler;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            anderes => Err(LoggingFehler::UngueltigesFormat(anderes.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Logging-Abschnitt der Konfigurationsdatei
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingKonfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingKonfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingKonfig {
    /// Wendet Uebersteuerungen aus der Umgebung an
    ///
    /// Leere Werte zaehlen als nicht gesetzt.
    pub fn mit_uebersteuerung(
        &self,
        level: Option<String>,
        format: Option<String>,
    ) -> Result<Self, LoggingFehler> {
        let level = level
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.level.clone());
        let format = match format.filter(|f| !f.trim().is_empty()) {
            Some(f) => f.parse()?,
            None => self.format,
        };
        Ok(Self { level, format })
    }

    fn filter(&self) -> Result<EnvFilter, LoggingFehler> {
        EnvFilter::try_new(&self.level)
            .map_err(|_| LoggingFehler::UngueltigerFilter(self.level.clone()))
    }
}

/// Initialisiert das Logging-System.
///
/// Liest `EINLASS_LOG_LEVEL` und `EINLASS_LOG_FORMAT` aus der Umgebung und
/// faellt auf die uebergebene Konfiguration zurueck.
pub fn logging_initialisieren(konfig: &LoggingKonfig) -> Result<(), LoggingFehler> {
    let effektiv = konfig.mit_uebersteuerung(
        std::env::var(ENV_LOG_LEVEL).ok(),
        std::env::var(ENV_LOG_FORMAT).ok(),
    )?;
    let filter = effektiv.filter()?;

    let ergebnis = match effektiv.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };
    ergebnis.map_err(|e| LoggingFehler::BereitsInitialisiert(e.to_string()))?;

    tracing::debug!(level = %effektiv.level, format = %effektiv.format, "Logging initialisiert");
    Ok(())
}

/// Validiert ob ein einfacher Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}
