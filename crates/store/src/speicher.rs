//! In-Memory-Implementierungen aller Kollaborateur-Traits
//!
//! Gedacht fuer Tests und den lokalen Pruefstand. Abgelaufene Cache-Eintraege
//! werden beim Lesen verworfen; `bereinigen()` raeumt den Rest auf.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{KontoRecord, ZweiFaktorCode};
use crate::repository::{CodeStore, KontoRepository, PrivilegienQuelle, WiderrufsCache};

// ---------------------------------------------------------------------------
// Konten
// ---------------------------------------------------------------------------

/// Konten im Speicher, indiziert nach Benutzername
#[derive(Debug, Default)]
pub struct SpeicherKonten {
    konten: RwLock<HashMap<String, KontoRecord>>,
    schreibzugriffe: AtomicU64,
}

impl SpeicherKonten {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Legt ein Konto an oder ersetzt es
    pub fn einfuegen(&self, konto: KontoRecord) {
        self.konten.write().insert(konto.benutzername.clone(), konto);
    }

    /// Momentaufnahme eines Kontos
    pub fn konto(&self, benutzername: &str) -> Option<KontoRecord> {
        self.konten.read().get(benutzername).cloned()
    }

    /// Anzahl der bisherigen Ergebnis-Schreibzugriffe (Erfolg + Fehlschlag)
    pub fn schreibzugriffe(&self) -> u64 {
        self.schreibzugriffe.load(Ordering::SeqCst)
    }

    fn aktualisieren(&self, id: &str, f: impl FnOnce(&mut KontoRecord)) -> StoreResult<()> {
        let mut konten = self.konten.write();
        let konto = konten
            .values_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| StoreError::nicht_gefunden(format!("Konto {id}")))?;
        f(konto);
        self.schreibzugriffe.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl KontoRepository for SpeicherKonten {
    async fn konto_laden(&self, benutzername: &str) -> StoreResult<Option<KontoRecord>> {
        Ok(self.konto(benutzername))
    }

    async fn erfolg_vermerken(&self, id: &str, war_inaktiv: bool) -> StoreResult<()> {
        self.aktualisieren(id, |konto| {
            konto.fehlversuche = 0;
            konto.gesperrt_bis = None;
            if war_inaktiv {
                konto.inaktiv = false;
            }
        })
    }

    async fn fehlschlag_vermerken(
        &self,
        id: &str,
        fehlversuche: u32,
        gesperrt_bis: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        self.aktualisieren(id, |konto| {
            konto.fehlversuche = fehlversuche;
            if gesperrt_bis.is_some() {
                konto.gesperrt_bis = gesperrt_bis;
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Einmalcodes
// ---------------------------------------------------------------------------

/// Einmalcodes im Speicher, ein Eintrag pro Besitzer
#[derive(Debug, Default)]
pub struct SpeicherCodes {
    codes: DashMap<String, ZweiFaktorCode>,
    loeschungen: AtomicU64,
}

impl SpeicherCodes {
    pub fn neu() -> Self {
        Self::default()
    }

    pub fn anzahl(&self) -> usize {
        self.codes.len()
    }

    /// Anzahl der bisherigen Loeschaufrufe (auch wenn nichts geloescht wurde)
    pub fn loeschungen(&self) -> u64 {
        self.loeschungen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeStore for SpeicherCodes {
    async fn code_speichern(
        &self,
        besitzer_id: &str,
        code_hash: &str,
        laeuft_ab_am: DateTime<Utc>,
    ) -> StoreResult<u64> {
        self.codes.insert(
            besitzer_id.to_string(),
            ZweiFaktorCode {
                besitzer_id: besitzer_id.to_string(),
                code_hash: code_hash.to_string(),
                laeuft_ab_am,
            },
        );
        Ok(1)
    }

    async fn code_laden(&self, besitzer_id: &str) -> StoreResult<Option<ZweiFaktorCode>> {
        Ok(self.codes.get(besitzer_id).map(|c| c.value().clone()))
    }

    async fn code_loeschen(&self, besitzer_id: &str) -> StoreResult<u64> {
        self.loeschungen.fetch_add(1, Ordering::SeqCst);
        Ok(self.codes.remove(besitzer_id).map_or(0, |_| 1))
    }
}

// ---------------------------------------------------------------------------
// Widerrufs-Cache
// ---------------------------------------------------------------------------

/// Key-Value-Cache mit TTL pro Eintrag
#[derive(Debug, Default)]
pub struct SpeicherCache {
    /// schluessel -> (wert, ablaufzeitpunkt)
    eintraege: DashMap<String, (String, Instant)>,
}

impl SpeicherCache {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Anzahl der gespeicherten Eintraege (inkl. noch nicht bereinigter abgelaufener)
    pub fn laenge(&self) -> usize {
        self.eintraege.len()
    }

    /// Entfernt abgelaufene Eintraege und gibt deren Anzahl zurueck
    pub fn bereinigen(&self) -> usize {
        let jetzt = Instant::now();
        let vorher = self.eintraege.len();
        self.eintraege.retain(|_, (_, ablauf)| *ablauf > jetzt);
        let entfernt = vorher.saturating_sub(self.eintraege.len());
        if entfernt > 0 {
            tracing::debug!(anzahl = entfernt, "Abgelaufene Cache-Eintraege bereinigt");
        }
        entfernt
    }

    fn gueltiger_wert(&self, schluessel: &str) -> Option<String> {
        let jetzt = Instant::now();
        let wert = self.eintraege.get(schluessel).map(|e| e.value().clone());
        match wert {
            Some((wert, ablauf)) if ablauf > jetzt => Some(wert),
            Some(_) => {
                self.eintraege.remove(schluessel);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl WiderrufsCache for SpeicherCache {
    async fn setzen(&self, schluessel: &str, wert: &str, ttl: Duration) -> StoreResult<()> {
        let ablauf = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| StoreError::Ungueltig(format!("TTL zu gross: {ttl:?}")))?;
        self.eintraege
            .insert(schluessel.to_string(), (wert.to_string(), ablauf));
        Ok(())
    }

    async fn holen(&self, schluessel: &str) -> StoreResult<Option<String>> {
        Ok(self.gueltiger_wert(schluessel))
    }

    async fn entfernen(&self, schluessel: &str) -> StoreResult<()> {
        self.eintraege.remove(schluessel);
        Ok(())
    }

    async fn mehrere_holen(&self, schluessel: &[String]) -> StoreResult<HashMap<String, String>> {
        Ok(schluessel
            .iter()
            .filter_map(|s| self.gueltiger_wert(s).map(|w| (s.clone(), w)))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Privilegien
// ---------------------------------------------------------------------------

/// Privilegien pro Konto-ID
#[derive(Debug, Default)]
pub struct SpeicherPrivilegien {
    privilegien: DashMap<String, Vec<String>>,
}

impl SpeicherPrivilegien {
    pub fn neu() -> Self {
        Self::default()
    }

    pub fn setzen(&self, id: impl Into<String>, privilegien: Vec<String>) {
        self.privilegien.insert(id.into(), privilegien);
    }
}

#[async_trait]
impl PrivilegienQuelle for SpeicherPrivilegien {
    async fn privilegien_laden(&self, id: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .privilegien
            .get(id)
            .map(|p| p.value().clone())
            .unwrap_or_default())
    }
}
