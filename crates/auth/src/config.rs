//! Konfiguration der Anmelde-Engine
//!
//! Alle Felder haben sinnvolle Standardwerte, sodass eine teilweise
//! TOML-Konfiguration genuegt.

use chrono::{Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::payload::PayloadFelder;
use crate::sperrung::SperrRichtlinie;
use crate::status::StatusCodeKonfig;

/// Vollstaendige Engine-Konfiguration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthKonfig {
    /// Standard-Lebensdauer eines Tokens in Sekunden
    pub token_ttl_sekunden: i64,
    /// Erlaubte Fehlversuche bevor gesperrt wird (0 = nie)
    pub max_fehlversuche: u32,
    /// Sperrdauer in Minuten (0 = nie)
    pub sperrdauer_minuten: i64,
    /// Lokale Zone fuer Zugangsfenster als Versatz zu UTC in Minuten
    pub zeitzone_offset_minuten: i32,
    /// Claim, der den Besitzer eines Tokens benennt
    pub besitzer_claim: String,
    pub status_codes: StatusCodeKonfig,
    pub payload: PayloadFelder,
    pub zwei_faktor: ZweiFaktorKonfig,
    pub sperrliste: SperrlistenKonfig,
    pub freigabe: FreigabeKonfig,
}

impl Default for AuthKonfig {
    fn default() -> Self {
        Self {
            token_ttl_sekunden: 3600,
            max_fehlversuche: 5,
            sperrdauer_minuten: 15,
            zeitzone_offset_minuten: 0,
            besitzer_claim: "sub".into(),
            status_codes: StatusCodeKonfig::default(),
            payload: PayloadFelder::default(),
            zwei_faktor: ZweiFaktorKonfig::default(),
            sperrliste: SperrlistenKonfig::default(),
            freigabe: FreigabeKonfig::default(),
        }
    }
}

/// Zustellziel fuer Einmalcodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZielFeld {
    #[default]
    Email,
    Telefon,
}

/// Zwei-Faktor-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZweiFaktorKonfig {
    /// Gueltigkeit eines Einmalcodes in Sekunden
    pub code_ttl_sekunden: i64,
    /// Anzahl Ziffern des Standard-Codegenerators
    pub code_laenge: usize,
    pub ziel: ZielFeld,
}

impl Default for ZweiFaktorKonfig {
    fn default() -> Self {
        Self {
            code_ttl_sekunden: 300,
            code_laenge: 6,
            ziel: ZielFeld::Email,
        }
    }
}

/// Einstellungen der Token-Sperrliste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SperrlistenKonfig {
    /// Laengste moegliche Token-Lebensdauer; so lange gilt ein Widerruf aller Tokens
    pub max_token_lebensdauer_sekunden: i64,
    /// Praefix fuer alle Cache-Schluessel
    pub schluessel_praefix: String,
}

impl Default for SperrlistenKonfig {
    fn default() -> Self {
        Self {
            max_token_lebensdauer_sekunden: 86_400,
            schluessel_praefix: "einlass:".into(),
        }
    }
}

/// Vergleichsmodus der Freigabeliste
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreigabeModus {
    /// Nur das zuletzt freigegebene Token ist gueltig
    #[default]
    EinzelSitzung,
    /// Jedes gueltige Token mit gleicher Client-Identitaet ist gueltig
    GeteiltesGeheimnis,
}

/// Einstellungen der Token-Freigabeliste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreigabeKonfig {
    /// Freigabeliste im Sitzungswaechter verwenden
    pub aktiviert: bool,
    pub modus: FreigabeModus,
    /// Claim mit der Client-Identitaet (nur `geteiltes_geheimnis`)
    pub claim: String,
    pub schluessel_praefix: String,
}

impl Default for FreigabeKonfig {
    fn default() -> Self {
        Self {
            aktiviert: false,
            modus: FreigabeModus::EinzelSitzung,
            claim: "ip".into(),
            schluessel_praefix: "einlass:".into(),
        }
    }
}

impl AuthKonfig {
    /// Prueft Wertebereiche; Fehler sind beim Start fatal
    pub fn validieren(&self) -> AuthResult<()> {
        if self.token_ttl_sekunden <= 0 {
            return Err(AuthError::konfiguration("token_ttl_sekunden muss positiv sein"));
        }
        if self.sperrdauer_minuten < 0 {
            return Err(AuthError::konfiguration("sperrdauer_minuten darf nicht negativ sein"));
        }
        if self.zwei_faktor.code_ttl_sekunden <= 0 {
            return Err(AuthError::konfiguration(
                "zwei_faktor.code_ttl_sekunden muss positiv sein",
            ));
        }
        if self.zwei_faktor.code_laenge == 0 {
            return Err(AuthError::konfiguration("zwei_faktor.code_laenge muss positiv sein"));
        }
        if self.sperrliste.max_token_lebensdauer_sekunden <= 0 {
            return Err(AuthError::konfiguration(
                "sperrliste.max_token_lebensdauer_sekunden muss positiv sein",
            ));
        }
        if self.besitzer_claim.is_empty() {
            return Err(AuthError::konfiguration("besitzer_claim darf nicht leer sein"));
        }
        self.zeitzone()?;
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.token_ttl_sekunden)
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::seconds(self.zwei_faktor.code_ttl_sekunden)
    }

    pub fn max_token_lebensdauer(&self) -> Duration {
        Duration::seconds(self.sperrliste.max_token_lebensdauer_sekunden)
    }

    pub fn sperr_richtlinie(&self) -> SperrRichtlinie {
        SperrRichtlinie::neu(self.max_fehlversuche, self.sperrdauer_minuten)
    }

    pub fn zeitzone(&self) -> AuthResult<FixedOffset> {
        FixedOffset::east_opt(self.zeitzone_offset_minuten * 60).ok_or_else(|| {
            AuthError::konfiguration(format!(
                "zeitzone_offset_minuten ausserhalb des gueltigen Bereichs: {}",
                self.zeitzone_offset_minuten
            ))
        })
    }
}
