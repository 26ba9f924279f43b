//! Datenmodelle fuer Einlass
//!
//! Reine Datenuebertragungsobjekte zwischen Persistenz-Kollaborateur und
//! Anmelde-Engine. Die Engine liest Konten nur; Schreibzugriffe laufen
//! ausschliesslich ueber die Repository-Traits.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Konten
// ---------------------------------------------------------------------------

/// Konto-Datensatz wie ihn der Persistenz-Kollaborateur liefert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KontoRecord {
    pub id: String,
    pub benutzername: String,
    pub passwort_hash: String,
    /// Administrativ deaktiviert
    pub deaktiviert: bool,
    pub suspendiert: bool,
    /// Wegen Inaktivitaet stillgelegt; eine erfolgreiche Anmeldung reaktiviert
    pub inaktiv: bool,
    pub gesperrt_bis: Option<DateTime<Utc>>,
    pub fehlversuche: u32,
    pub passwort_geaendert_am: Option<DateTime<Utc>>,
    /// Maximales Passwortalter in Tagen (0 = unbegrenzt)
    pub max_passwort_alter_tage: u32,
    pub zugang_datum_von: Option<NaiveDate>,
    pub zugang_datum_bis: Option<NaiveDate>,
    pub zugang_zeit_von: Option<NaiveTime>,
    pub zugang_zeit_bis: Option<NaiveTime>,
    pub zwei_faktor_aktiv: bool,
    pub email: Option<String>,
    pub telefon: Option<String>,
    pub anzeigename: Option<String>,
    pub rollen: Vec<String>,
    pub privilegien: Vec<String>,
}

impl KontoRecord {
    /// Erstellt ein aktives Konto ohne Einschraenkungen
    pub fn neu(id: impl Into<String>, benutzername: impl Into<String>, passwort_hash: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            benutzername: benutzername.into(),
            passwort_hash: passwort_hash.into(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Einmalcodes
// ---------------------------------------------------------------------------

/// Gespeicherter Einmalcode (nur der Hash, nie der Klartext)
///
/// Pro Besitzer existiert hoechstens ein aktiver Code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZweiFaktorCode {
    pub besitzer_id: String,
    pub code_hash: String,
    pub laeuft_ab_am: DateTime<Utc>,
}
