//! Status einer Anmeldung und ihre konfigurierbaren Zahlencodes
//!
//! Die Engine arbeitet intern mit [`Status`]. Nach aussen sichtbar ist der
//! Zahlencode, den eine Installation per [`StatusCodeKonfig`] umbelegen kann.
//! Die Konfiguration wird einmal beim Bau der Engine zu [`StatusCodes`]
//! aufgeloest und danach nicht mehr veraendert.

use serde::{Deserialize, Serialize};

/// Ausgang einer Anmeldung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Fehlschlag,
    Erfolg,
    ErfolgReaktiviert,
    ZweiFaktorErforderlich,
    FalschesPasswort,
    PasswortAbgelaufen,
    ZugangszeitGesperrt,
    Gesperrt,
    Suspendiert,
    Deaktiviert,
    NichtGefunden,
    Zeitlimit,
    Fehler,
}

impl Status {
    /// Erfolgsfamilie: nur diese Status tragen ein Sitzungskonto
    pub fn ist_erfolg(self) -> bool {
        matches!(self, Self::Erfolg | Self::ErfolgReaktiviert)
    }
}

/// Optionale Zahlencodes aus der Konfiguration
///
/// Nicht gesetzte Felder fallen auf `fehlschlag` zurueck, ausser
/// `erfolg` (1), `erfolg_reaktiviert` (= `erfolg`), `zwei_faktor_erforderlich` (2),
/// `zeitlimit` (-1) und `fehler` (4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCodeKonfig {
    pub fehlschlag: Option<i32>,
    pub erfolg: Option<i32>,
    pub erfolg_reaktiviert: Option<i32>,
    pub zwei_faktor_erforderlich: Option<i32>,
    pub falsches_passwort: Option<i32>,
    pub passwort_abgelaufen: Option<i32>,
    pub zugangszeit_gesperrt: Option<i32>,
    pub gesperrt: Option<i32>,
    pub suspendiert: Option<i32>,
    pub deaktiviert: Option<i32>,
    pub nicht_gefunden: Option<i32>,
    pub zeitlimit: Option<i32>,
    pub fehler: Option<i32>,
}

impl StatusCodeKonfig {
    /// Loest alle Standardwerte auf
    pub fn aufloesen(&self) -> StatusCodes {
        let fehlschlag = self.fehlschlag.unwrap_or(0);
        let erfolg = self.erfolg.unwrap_or(1);
        StatusCodes {
            fehlschlag,
            erfolg,
            erfolg_reaktiviert: self.erfolg_reaktiviert.unwrap_or(erfolg),
            zwei_faktor_erforderlich: self.zwei_faktor_erforderlich.unwrap_or(2),
            falsches_passwort: self.falsches_passwort.unwrap_or(fehlschlag),
            passwort_abgelaufen: self.passwort_abgelaufen.unwrap_or(fehlschlag),
            zugangszeit_gesperrt: self.zugangszeit_gesperrt.unwrap_or(fehlschlag),
            gesperrt: self.gesperrt.unwrap_or(fehlschlag),
            suspendiert: self.suspendiert.unwrap_or(fehlschlag),
            deaktiviert: self.deaktiviert.unwrap_or(fehlschlag),
            nicht_gefunden: self.nicht_gefunden.unwrap_or(fehlschlag),
            zeitlimit: self.zeitlimit.unwrap_or(-1),
            fehler: self.fehler.unwrap_or(4),
        }
    }
}

/// Aufgeloeste, unveraenderliche Zahlencodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodes {
    fehlschlag: i32,
    erfolg: i32,
    erfolg_reaktiviert: i32,
    zwei_faktor_erforderlich: i32,
    falsches_passwort: i32,
    passwort_abgelaufen: i32,
    zugangszeit_gesperrt: i32,
    gesperrt: i32,
    suspendiert: i32,
    deaktiviert: i32,
    nicht_gefunden: i32,
    zeitlimit: i32,
    fehler: i32,
}

impl StatusCodes {
    /// Zahlencode fuer einen Status
    pub fn code(&self, status: Status) -> i32 {
        match status {
            Status::Fehlschlag => self.fehlschlag,
            Status::Erfolg => self.erfolg,
            Status::ErfolgReaktiviert => self.erfolg_reaktiviert,
            Status::ZweiFaktorErforderlich => self.zwei_faktor_erforderlich,
            Status::FalschesPasswort => self.falsches_passwort,
            Status::PasswortAbgelaufen => self.passwort_abgelaufen,
            Status::ZugangszeitGesperrt => self.zugangszeit_gesperrt,
            Status::Gesperrt => self.gesperrt,
            Status::Suspendiert => self.suspendiert,
            Status::Deaktiviert => self.deaktiviert,
            Status::NichtGefunden => self.nicht_gefunden,
            Status::Zeitlimit => self.zeitlimit,
            Status::Fehler => self.fehler,
        }
    }
}

impl Default for StatusCodes {
    fn default() -> Self {
        StatusCodeKonfig::default().aufloesen()
    }
}
