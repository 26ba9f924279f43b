//! Einlass Pruefstand – Verdrahtung der Anmelde-Engine
//!
//! Baut die Engine gegen die In-Memory-Kollaborateure aus `einlass-store`
//! und fuellt sie mit den Konten aus der Konfiguration.

pub mod config;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use einlass_auth::{
    Anmeldedaten, Argon2Hasher, AuthErgebnis, AuthResult, Authentifizierer, CodeVersand,
    JwtCodec, SitzungsWaechter, Status, TokenCodec, TokenFreigabeliste, TokenSperrliste,
    ZweiFaktorDienst,
};
use einlass_store::{SpeicherCache, SpeicherCodes, SpeicherKonten, SpeicherPrivilegien};

use crate::config::EinlassConfig;

/// Versand, der Einmalcodes nur ins Log schreibt
#[derive(Debug, Default)]
pub struct LogVersand;

#[async_trait]
impl CodeVersand for LogVersand {
    async fn senden(
        &self,
        ziel: &str,
        code: &str,
        laeuft_ab_am: DateTime<Utc>,
        zusatz: &BTreeMap<String, String>,
    ) -> AuthResult<()> {
        tracing::info!(
            ziel = %ziel,
            code = %code,
            laeuft_ab_am = %laeuft_ab_am,
            zusatz = ?zusatz,
            "Einmalcode (Pruefstand, kein echter Versand)"
        );
        Ok(())
    }
}

/// Engine samt Sitzungspruefung fuer einen Prozesslauf
pub struct Pruefstand {
    pub engine: Authentifizierer,
    pub waechter: SitzungsWaechter,
    pub freigabeliste: Arc<TokenFreigabeliste>,
    pub konten: Arc<SpeicherKonten>,
}

impl Pruefstand {
    /// Baut den Pruefstand aus der Konfiguration
    pub fn aufbauen(config: &EinlassConfig) -> anyhow::Result<Self> {
        if config.jwt.geheimnis.is_empty() {
            anyhow::bail!("[jwt].geheimnis ist nicht gesetzt");
        }

        let mut jwt = JwtCodec::hs256(config.jwt.geheimnis.as_bytes());
        if let Some(aussteller) = &config.jwt.aussteller {
            jwt = jwt.mit_aussteller(aussteller.clone());
        }
        let codec: Arc<dyn TokenCodec> = Arc::new(jwt);

        let konten = Arc::new(SpeicherKonten::neu());
        for konto in &config.konten {
            konten.einfuegen(konto.clone());
        }

        let privilegien = Arc::new(SpeicherPrivilegien::neu());
        for eintrag in &config.privilegien {
            privilegien.setzen(eintrag.konto_id.clone(), eintrag.privilegien.clone());
        }

        // Einmalcodes leben nur Minuten, daher guenstigere Argon2-Parameter
        let zwei_faktor = ZweiFaktorDienst::aus_konfig(
            &config.auth.zwei_faktor,
            Arc::new(SpeicherCodes::neu()),
            Arc::new(LogVersand),
            Arc::new(Argon2Hasher::mit_parametern(19 * 1024, 2, 1)),
        )?;

        let engine = Authentifizierer::builder(config.auth.clone(), codec.clone())
            .passwort_pruefung(Arc::new(Argon2Hasher::neu()))
            .konten(konten.clone())
            .zwei_faktor(zwei_faktor)
            .privilegien(privilegien)
            .bauen()?;

        let cache = Arc::new(SpeicherCache::neu());
        let sperrliste = Arc::new(TokenSperrliste::neu(cache.clone(), &config.auth.sperrliste));
        let freigabeliste = Arc::new(TokenFreigabeliste::neu(
            cache,
            codec.clone(),
            &config.auth.freigabe,
        ));

        let mut waechter =
            SitzungsWaechter::neu(codec, sperrliste, config.auth.besitzer_claim.clone());
        if config.auth.freigabe.aktiviert {
            waechter = waechter.mit_freigabeliste(freigabeliste.clone());
        }

        tracing::info!(konten = config.konten.len(), "Pruefstand aufgebaut");

        Ok(Self {
            engine,
            waechter,
            freigabeliste,
            konten,
        })
    }

    /// Fuehrt einen Anmeldeversuch aus; Fehler werden zu `Status::Fehler`
    pub async fn anmelden(&self, daten: &Anmeldedaten) -> AuthErgebnis {
        let ergebnis = self.engine.authentifizieren(daten).await;
        self.ergebnis_oder_fehler(daten, ergebnis)
    }

    pub async fn anmelden_mit_zeitlimit(
        &self,
        daten: &Anmeldedaten,
        zeitlimit: Duration,
    ) -> AuthErgebnis {
        let ergebnis = self
            .engine
            .authentifizieren_mit_zeitlimit(daten, zeitlimit)
            .await;
        self.ergebnis_oder_fehler(daten, ergebnis)
    }

    fn ergebnis_oder_fehler(
        &self,
        daten: &Anmeldedaten,
        ergebnis: AuthResult<AuthErgebnis>,
    ) -> AuthErgebnis {
        match ergebnis {
            Ok(ergebnis) => ergebnis,
            Err(e) => {
                tracing::error!(benutzer = %daten.benutzername, fehler = %e, "Anmeldung fehlgeschlagen");
                self.engine.fehler_ergebnis(&e)
            }
        }
    }

    /// Gibt ein ausgestelltes Token frei und prueft es wie eine spaetere Anfrage
    pub async fn sitzung_pruefen(&self, ergebnis: &AuthErgebnis) -> anyhow::Result<()> {
        let Some(sitzung) = ergebnis.benutzer.as_ref().filter(|_| ergebnis.status.ist_erfolg())
        else {
            return Ok(());
        };

        if let Some(id) = &sitzung.id {
            self.freigabeliste.hinzufuegen(id, &sitzung.token).await?;
        }
        let claims = self.waechter.pruefen(&sitzung.token).await?;
        tracing::info!(claims = %serde_json::Value::Object(claims.claims), "Sitzung gueltig");
        Ok(())
    }

    /// Erster Faktor verlangt einen Einmalcode
    pub fn braucht_code(ergebnis: &AuthErgebnis) -> bool {
        ergebnis.status == Status::ZweiFaktorErforderlich
    }
}
