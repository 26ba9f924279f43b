//! Pruefstand-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Abschnitte haben
//! Standardwerte; nur `[jwt].geheimnis` muss fuer Anmeldungen gesetzt sein.

use einlass_auth::AuthKonfig;
use einlass_observability::LoggingKonfig;
use einlass_store::KontoRecord;
use serde::{Deserialize, Serialize};

/// Vollstaendige Pruefstand-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EinlassConfig {
    /// Logging-Einstellungen
    pub logging: LoggingKonfig,
    /// Einstellungen der Anmelde-Engine
    pub auth: AuthKonfig,
    /// Token-Signatur
    pub jwt: JwtEinstellungen,
    /// Konten fuer den In-Memory-Speicher
    pub konten: Vec<KontoRecord>,
    /// Privilegien je Konto-ID, ueberschreiben die Kontoangaben
    pub privilegien: Vec<PrivilegienEintrag>,
}

/// Token-Signatur (HS256)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtEinstellungen {
    /// Gemeinsames Geheimnis; leer = Anmeldungen nicht moeglich
    pub geheimnis: String,
    /// Optionaler `iss`-Claim
    pub aussteller: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegienEintrag {
    pub konto_id: String,
    pub privilegien: Vec<String>,
}

impl EinlassConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei
    ///
    /// Fehlt die Datei, werden Standardwerte verwendet.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    pub fn aus_toml(inhalt: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(inhalt)?;
        config.auth.validieren()?;
        Ok(config)
    }
}
