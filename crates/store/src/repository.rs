//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Anmelde-Engine von der konkreten
//! Persistenz. Jeder Aufruf gilt aus Sicht der Engine als atomar; Reihenfolge
//! ueber mehrere Aufrufe hinweg koordiniert der Kollaborateur selbst.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::models::{KontoRecord, ZweiFaktorCode};

/// Konten-Lookup und Ergebnis-Persistenz
#[async_trait]
pub trait KontoRepository: Send + Sync {
    /// Laedt ein Konto anhand des Benutzernamens
    async fn konto_laden(&self, benutzername: &str) -> StoreResult<Option<KontoRecord>>;

    /// Vermerkt eine erfolgreiche Anmeldung: Fehlzaehler und Sperre
    /// zuruecksetzen, bei `war_inaktiv` das Konto reaktivieren
    async fn erfolg_vermerken(&self, id: &str, war_inaktiv: bool) -> StoreResult<()>;

    /// Vermerkt eine fehlgeschlagene Anmeldung mit neuem Zaehlerstand und
    /// optionaler Sperre
    async fn fehlschlag_vermerken(
        &self,
        id: &str,
        fehlversuche: u32,
        gesperrt_bis: Option<DateTime<Utc>>,
    ) -> StoreResult<()>;
}

/// Speicher fuer Einmalcodes (ein aktiver Code pro Besitzer)
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Speichert einen Code-Hash und ersetzt einen vorhandenen Code des
    /// Besitzers. Gibt die Anzahl geschriebener Datensaetze zurueck.
    async fn code_speichern(
        &self,
        besitzer_id: &str,
        code_hash: &str,
        laeuft_ab_am: DateTime<Utc>,
    ) -> StoreResult<u64>;

    async fn code_laden(&self, besitzer_id: &str) -> StoreResult<Option<ZweiFaktorCode>>;

    /// Loescht den Code des Besitzers. Gibt die Anzahl geloeschter Datensaetze zurueck.
    async fn code_loeschen(&self, besitzer_id: &str) -> StoreResult<u64>;
}

/// Key-Value-Cache mit TTL fuer Sperr- und Freigabelisten
#[async_trait]
pub trait WiderrufsCache: Send + Sync {
    async fn setzen(&self, schluessel: &str, wert: &str, ttl: Duration) -> StoreResult<()>;

    async fn holen(&self, schluessel: &str) -> StoreResult<Option<String>>;

    async fn entfernen(&self, schluessel: &str) -> StoreResult<()>;

    /// Laedt mehrere Schluessel in einem Roundtrip; fehlende Schluessel
    /// fehlen in der Ergebnis-Map
    async fn mehrere_holen(&self, schluessel: &[String]) -> StoreResult<HashMap<String, String>>;
}

/// Optionale Quelle fuer Privilegien eines Kontos
#[async_trait]
pub trait PrivilegienQuelle: Send + Sync {
    async fn privilegien_laden(&self, id: &str) -> StoreResult<Vec<String>>;
}
