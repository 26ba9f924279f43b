//! Sperr-Richtlinie nach fehlgeschlagenen Anmeldungen
//!
//! Zustandslos: aus aktuellem Fehlzaehler und Konfiguration entsteht eine
//! Entscheidung, die der Aufrufer ueber den Persistenz-Kollaborateur schreibt.

use chrono::{DateTime, Duration, Utc};

/// Ergebnis eines falschen Passworts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SperrEntscheidung {
    /// Nur den Fehlzaehler erhoehen
    Zaehlen { fehlversuche: u32 },
    /// Konto bis zum Zeitpunkt sperren, Fehlzaehler bleibt unveraendert
    Sperren { gesperrt_bis: DateTime<Utc> },
}

/// Sperr-Richtlinie einer Installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SperrRichtlinie {
    /// Erlaubte Fehlversuche bevor gesperrt wird (0 = nie sperren)
    pub max_fehlversuche: u32,
    /// Sperrdauer in Minuten (0 = nie sperren)
    pub sperrdauer_minuten: i64,
}

impl SperrRichtlinie {
    pub fn neu(max_fehlversuche: u32, sperrdauer_minuten: i64) -> Self {
        Self {
            max_fehlversuche,
            sperrdauer_minuten,
        }
    }

    /// Entscheidung fuer ein falsches Passwort bei `fehlversuche` bisherigen Fehlern
    pub fn bei_falschem_passwort(&self, fehlversuche: u32, jetzt: DateTime<Utc>) -> SperrEntscheidung {
        if self.sperrdauer_minuten > 0
            && self.max_fehlversuche > 0
            && fehlversuche >= self.max_fehlversuche
        {
            SperrEntscheidung::Sperren {
                gesperrt_bis: jetzt + Duration::minutes(self.sperrdauer_minuten),
            }
        } else {
            SperrEntscheidung::Zaehlen {
                fehlversuche: fehlversuche.saturating_add(1),
            }
        }
    }
}

/// Gibt `true` zurueck wenn eine Sperre noch in der Zukunft liegt
pub fn ist_gesperrt(gesperrt_bis: Option<DateTime<Utc>>, jetzt: DateTime<Utc>) -> bool {
    gesperrt_bis.is_some_and(|bis| bis > jetzt)
}
