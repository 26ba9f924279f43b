//! Formung des Token-Inhalts aus dem Sitzungskonto
//!
//! Eine geschlossene Menge benannter Felder kann in den Token-Inhalt kopiert
//! werden. Jede Abbildung legt den Claim-Namen fest und optional, dass das
//! Feld danach aus dem ausgehenden Sitzungskonto entfernt wird.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modell::SitzungsKonto;
use crate::token::TokenPayload;

/// Abbildung eines Feldes auf einen Claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeldAbbildung {
    pub name: String,
    #[serde(default)]
    pub aus_sitzung_entfernen: bool,
}

impl FeldAbbildung {
    pub fn neu(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aus_sitzung_entfernen: false,
        }
    }

    /// Feld nach dem Kopieren aus dem Sitzungskonto entfernen
    pub fn entfernen(mut self) -> Self {
        self.aus_sitzung_entfernen = true;
        self
    }
}

/// Welche Felder in welcher Form in den Token-Inhalt gelangen
///
/// Standard: `id` als `sub`, Benutzername als `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadFelder {
    pub id: Option<FeldAbbildung>,
    pub benutzername: Option<FeldAbbildung>,
    pub email: Option<FeldAbbildung>,
    pub telefon: Option<FeldAbbildung>,
    pub anzeigename: Option<FeldAbbildung>,
    pub rollen: Option<FeldAbbildung>,
    pub privilegien: Option<FeldAbbildung>,
    pub client_ip: Option<FeldAbbildung>,
}

impl Default for PayloadFelder {
    fn default() -> Self {
        Self {
            id: Some(FeldAbbildung::neu("sub")),
            benutzername: Some(FeldAbbildung::neu("name")),
            email: None,
            telefon: None,
            anzeigename: None,
            rollen: None,
            privilegien: None,
            client_ip: None,
        }
    }
}

/// Baut den Token-Inhalt und das ausgehende Sitzungskonto
///
/// Reihenfolge der Claims: id, benutzername, email, telefon, anzeigename,
/// rollen, privilegien, client_ip. Fehlende Werte werden uebersprungen.
pub fn payload_formen(
    felder: &PayloadFelder,
    mut sitzung: SitzungsKonto,
    client_ip: Option<&str>,
) -> (TokenPayload, SitzungsKonto) {
    let mut payload = TokenPayload::new();

    uebernehmen(felder.id.as_ref(), &mut sitzung.id, &mut payload);
    uebernehmen(felder.benutzername.as_ref(), &mut sitzung.benutzername, &mut payload);
    uebernehmen(felder.email.as_ref(), &mut sitzung.email, &mut payload);
    uebernehmen(felder.telefon.as_ref(), &mut sitzung.telefon, &mut payload);
    uebernehmen(felder.anzeigename.as_ref(), &mut sitzung.anzeigename, &mut payload);
    uebernehmen(felder.rollen.as_ref(), &mut sitzung.rollen, &mut payload);
    uebernehmen(felder.privilegien.as_ref(), &mut sitzung.privilegien, &mut payload);

    if let (Some(abbildung), Some(ip)) = (felder.client_ip.as_ref(), client_ip) {
        payload.push((abbildung.name.clone(), Value::from(ip)));
    }

    (payload, sitzung)
}

fn uebernehmen<T>(abbildung: Option<&FeldAbbildung>, wert: &mut Option<T>, payload: &mut TokenPayload)
where
    T: Clone + Into<Value>,
{
    let (Some(abbildung), Some(inhalt)) = (abbildung, wert.as_ref()) else {
        return;
    };
    payload.push((abbildung.name.clone(), inhalt.clone().into()));
    if abbildung.aus_sitzung_entfernen {
        *wert = None;
    }
}
