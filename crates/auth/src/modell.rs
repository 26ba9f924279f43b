//! Ein- und Ausgabetypen der Anmelde-Engine

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use einlass_store::KontoRecord;
use serde::{Deserialize, Serialize};

use crate::status::{Status, StatusCodes};

/// Uebermittelte Anmeldedaten eines Anmeldeversuchs
///
/// `schritt <= 0` ist der erste Faktor (Passwort), `schritt > 0` der zweite
/// Faktor (Einmalcode) desselben Versuchs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Anmeldedaten {
    pub benutzername: String,
    pub passwort: String,
    pub schritt: Option<i32>,
    pub passcode: Option<String>,
    /// Herkunft des Clients, optional in den Token-Inhalt uebernommen
    pub client_ip: Option<String>,
    /// Zusatzparameter fuer den Code-Versand
    pub zusatz: BTreeMap<String, String>,
}

impl Anmeldedaten {
    pub fn passwort(benutzername: impl Into<String>, passwort: impl Into<String>) -> Self {
        Self {
            benutzername: benutzername.into(),
            passwort: passwort.into(),
            ..Default::default()
        }
    }

    /// Zweiter Faktor desselben Anmeldeversuchs
    pub fn passcode(benutzername: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            benutzername: benutzername.into(),
            schritt: Some(1),
            passcode: Some(passcode.into()),
            ..Default::default()
        }
    }

    pub fn schritt(&self) -> i32 {
        self.schritt.unwrap_or(0)
    }

    pub fn ist_zweiter_faktor(&self) -> bool {
        self.schritt() > 0
    }

    /// Passcode, falls nicht leer
    pub fn passcode_wert(&self) -> Option<&str> {
        self.passcode.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Ausgestellte Identitaet nach erfolgreicher Anmeldung
///
/// Traegt nie das Passwort. Felder, die in den Token-Inhalt kopiert und zum
/// Entfernen markiert wurden, sind `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitzungsKonto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benutzername: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anzeigename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollen: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privilegien: Option<Vec<String>>,
    pub token: String,
    pub token_laeuft_ab_am: Option<DateTime<Utc>>,
}

impl SitzungsKonto {
    pub fn aus_konto(konto: &KontoRecord) -> Self {
        let liste = |werte: &Vec<String>| (!werte.is_empty()).then(|| werte.clone());
        Self {
            id: Some(konto.id.clone()),
            benutzername: Some(konto.benutzername.clone()),
            email: konto.email.clone(),
            telefon: konto.telefon.clone(),
            anzeigename: konto.anzeigename.clone(),
            rollen: liste(&konto.rollen),
            privilegien: liste(&konto.privilegien),
            ..Default::default()
        }
    }

    /// Minimale Sitzung ohne Kontenspeicher
    pub fn nur_benutzername(benutzername: &str) -> Self {
        Self {
            benutzername: Some(benutzername.to_string()),
            ..Default::default()
        }
    }
}

/// Ergebnis eines Anmeldeversuchs
///
/// `benutzer` ist genau dann gesetzt, wenn `status` zur Erfolgsfamilie gehoert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthErgebnis {
    pub status: Status,
    /// Zahlencode des Status gemaess Konfiguration
    pub code: i32,
    pub benutzer: Option<SitzungsKonto>,
    pub nachricht: String,
}

impl AuthErgebnis {
    pub fn abgelehnt(codes: &StatusCodes, status: Status, nachricht: impl Into<String>) -> Self {
        Self {
            status,
            code: codes.code(status),
            benutzer: None,
            nachricht: nachricht.into(),
        }
    }

    pub fn erfolg(codes: &StatusCodes, status: Status, benutzer: SitzungsKonto) -> Self {
        Self {
            status,
            code: codes.code(status),
            benutzer: Some(benutzer),
            nachricht: String::new(),
        }
    }

    pub fn ist_erfolg(&self) -> bool {
        self.status.ist_erfolg()
    }
}
