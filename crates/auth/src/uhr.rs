//! Zeitquelle der Engine
//!
//! Jede zeitabhaengige Entscheidung liest die Uhr genau einmal pro Aufruf.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Liefert den aktuellen Zeitpunkt
pub trait Uhr: Send + Sync {
    fn jetzt(&self) -> DateTime<Utc>;
}

/// Systemuhr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUhr;

impl Uhr for SystemUhr {
    fn jetzt(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Von aussen gesetzte Uhr fuer Tests und Simulationen
#[derive(Debug)]
pub struct FesteUhr {
    zeitpunkt: Mutex<DateTime<Utc>>,
}

impl FesteUhr {
    pub fn neu(zeitpunkt: DateTime<Utc>) -> Self {
        Self {
            zeitpunkt: Mutex::new(zeitpunkt),
        }
    }

    pub fn setzen(&self, zeitpunkt: DateTime<Utc>) {
        *self.zeitpunkt.lock() = zeitpunkt;
    }

    pub fn vorstellen(&self, dauer: Duration) {
        *self.zeitpunkt.lock() += dauer;
    }
}

impl Uhr for FesteUhr {
    fn jetzt(&self) -> DateTime<Utc> {
        *self.zeitpunkt.lock()
    }
}
