//! Zwei-Faktor-Ablauf mit Einmalcodes
//!
//! Ausstellen: Code erzeugen, hashen, speichern, versenden.
//! Pruefen: gespeicherten Code laden, Ablauf pruefen, Hash vergleichen.
//! Nach Ablauf oder erfolgreichem Vergleich wird der Code in einem
//! abgekoppelten Task mit eigenem Zeitlimit geloescht.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use einlass_store::{CodeStore, KontoRecord};
use rand::Rng;
use tokio::task::JoinHandle;

use crate::config::{ZielFeld, ZweiFaktorKonfig};
use crate::error::{AuthError, AuthResult};
use crate::modell::Anmeldedaten;
use crate::password::Hasher;

/// Zeitlimit fuer das Loeschen eines verbrauchten Codes
const LOESCH_ZEITLIMIT: StdDuration = StdDuration::from_secs(30);

/// Erzeugt Einmalcodes im Klartext
pub trait CodeGenerator: Send + Sync {
    fn erzeugen(&self) -> String;
}

/// Numerischer Code mit fester Stellenzahl
#[derive(Debug, Clone, Copy)]
pub struct ZiffernCode {
    laenge: usize,
}

impl ZiffernCode {
    pub fn neu(laenge: usize) -> Self {
        Self { laenge }
    }
}

impl Default for ZiffernCode {
    fn default() -> Self {
        Self::neu(6)
    }
}

impl CodeGenerator for ZiffernCode {
    fn erzeugen(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.laenge)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}

/// Zustellung eines Codes an den Benutzer (E-Mail, SMS, ...)
#[async_trait]
pub trait CodeVersand: Send + Sync {
    async fn senden(
        &self,
        ziel: &str,
        code: &str,
        laeuft_ab_am: DateTime<Utc>,
        zusatz: &BTreeMap<String, String>,
    ) -> AuthResult<()>;
}

/// Zwei-Faktor-Dienst der Engine
pub struct ZweiFaktorDienst {
    codes: Arc<dyn CodeStore>,
    versand: Arc<dyn CodeVersand>,
    hasher: Arc<dyn Hasher>,
    generator: Arc<dyn CodeGenerator>,
    gueltigkeit: Duration,
    ziel: ZielFeld,
}

impl ZweiFaktorDienst {
    /// Erstellt den Dienst; eine nicht positive Gueltigkeit ist ein
    /// Konfigurationsfehler
    pub fn neu(
        codes: Arc<dyn CodeStore>,
        versand: Arc<dyn CodeVersand>,
        hasher: Arc<dyn Hasher>,
        generator: Arc<dyn CodeGenerator>,
        gueltigkeit: Duration,
        ziel: ZielFeld,
    ) -> AuthResult<Self> {
        if gueltigkeit <= Duration::zero() {
            return Err(AuthError::konfiguration(
                "Gueltigkeit der Einmalcodes muss positiv sein",
            ));
        }
        Ok(Self {
            codes,
            versand,
            hasher,
            generator,
            gueltigkeit,
            ziel,
        })
    }

    /// Dienst mit Standard-Codegenerator aus der Konfiguration
    pub fn aus_konfig(
        konfig: &ZweiFaktorKonfig,
        codes: Arc<dyn CodeStore>,
        versand: Arc<dyn CodeVersand>,
        hasher: Arc<dyn Hasher>,
    ) -> AuthResult<Self> {
        if konfig.code_laenge == 0 {
            return Err(AuthError::konfiguration("Laenge der Einmalcodes muss positiv sein"));
        }
        Self::neu(
            codes,
            versand,
            hasher,
            Arc::new(ZiffernCode::neu(konfig.code_laenge)),
            Duration::seconds(konfig.code_ttl_sekunden),
            konfig.ziel,
        )
    }

    /// Stellt einen neuen Code aus und versendet ihn
    pub async fn ausstellen(
        &self,
        konto: &KontoRecord,
        daten: &Anmeldedaten,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<()> {
        let ziel = match self.ziel {
            ZielFeld::Email => konto.email.as_deref(),
            ZielFeld::Telefon => konto.telefon.as_deref(),
        }
        .filter(|z| !z.trim().is_empty())
        .ok_or_else(|| {
            AuthError::Versand(format!(
                "Konto '{}' hat kein Zustellziel ({:?})",
                konto.benutzername, self.ziel
            ))
        })?;

        let code = self.generator.erzeugen();
        let code_hash = self.hasher.hashen(&code)?;
        let laeuft_ab_am = jetzt + self.gueltigkeit;

        let geschrieben = self
            .codes
            .code_speichern(&konto.id, &code_hash, laeuft_ab_am)
            .await?;
        if geschrieben == 0 {
            return Err(AuthError::ZweiFaktor(format!(
                "Code fuer Konto '{}' wurde nicht gespeichert",
                konto.id
            )));
        }

        self.versand
            .senden(ziel, &code, laeuft_ab_am, &daten.zusatz)
            .await?;

        tracing::info!(
            besitzer = %konto.id,
            laeuft_ab_am = %laeuft_ab_am,
            "Einmalcode ausgestellt"
        );
        Ok(())
    }

    /// Prueft einen eingegebenen Code
    ///
    /// `Ok(false)` wenn kein Code vorliegt, er abgelaufen ist oder nicht passt.
    /// Ein falscher Code wird nicht geloescht.
    pub async fn verifizieren(
        &self,
        besitzer: &str,
        passcode: &str,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let Some(gespeichert) = self.codes.code_laden(besitzer).await? else {
            tracing::debug!(besitzer = %besitzer, "Kein Einmalcode vorhanden");
            return Ok(false);
        };

        if gespeichert.laeuft_ab_am < jetzt {
            tracing::info!(besitzer = %besitzer, "Einmalcode abgelaufen");
            self.loeschen_im_hintergrund(besitzer);
            return Ok(false);
        }

        if !self.hasher.vergleichen(passcode, &gespeichert.code_hash)? {
            tracing::warn!(besitzer = %besitzer, "Falscher Einmalcode");
            return Ok(false);
        }

        self.loeschen_im_hintergrund(besitzer);
        Ok(true)
    }

    /// Loescht den Code des Besitzers in einem abgekoppelten Task
    ///
    /// Der Task gehoert nicht zum Aufrufer: ein abgebrochener Anmeldeversuch
    /// bricht das Loeschen nicht ab. Fehler werden nur protokolliert.
    pub(crate) fn loeschen_im_hintergrund(&self, besitzer: &str) -> JoinHandle<()> {
        let codes = Arc::clone(&self.codes);
        let besitzer = besitzer.to_string();

        tokio::spawn(async move {
            match tokio::time::timeout(LOESCH_ZEITLIMIT, codes.code_loeschen(&besitzer)).await {
                Ok(Ok(anzahl)) => {
                    tracing::debug!(besitzer = %besitzer, anzahl, "Einmalcode geloescht");
                }
                Ok(Err(e)) => {
                    tracing::error!(besitzer = %besitzer, fehler = %e, "Einmalcode konnte nicht geloescht werden");
                }
                Err(_) => {
                    tracing::warn!(besitzer = %besitzer, "Zeitlimit beim Loeschen des Einmalcodes");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use einlass_store::SpeicherCodes;
    use parking_lot::Mutex;

    /// Hasher ohne Kosten fuer Tests
    struct KlarHasher;

    impl Hasher for KlarHasher {
        fn hashen(&self, klartext: &str) -> AuthResult<String> {
            Ok(format!("klar:{klartext}"))
        }

        fn vergleichen(&self, klartext: &str, hash: &str) -> AuthResult<bool> {
            Ok(hash == format!("klar:{klartext}"))
        }
    }

    struct FesterCode(&'static str);

    impl CodeGenerator for FesterCode {
        fn erzeugen(&self) -> String {
            self.0.to_string()
        }
    }

    #[derive(Default)]
    struct Postfach {
        nachrichten: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CodeVersand for Postfach {
        async fn senden(
            &self,
            ziel: &str,
            code: &str,
            _laeuft_ab_am: DateTime<Utc>,
            _zusatz: &BTreeMap<String, String>,
        ) -> AuthResult<()> {
            self.nachrichten.lock().push((ziel.to_string(), code.to_string()));
            Ok(())
        }
    }

    fn konto() -> KontoRecord {
        let mut konto = KontoRecord::neu("k1", "alice", "-");
        konto.email = Some("alice@example.org".into());
        konto
    }

    fn dienst(codes: Arc<SpeicherCodes>, postfach: Arc<Postfach>) -> ZweiFaktorDienst {
        ZweiFaktorDienst::neu(
            codes,
            postfach,
            Arc::new(KlarHasher),
            Arc::new(FesterCode("424242")),
            Duration::minutes(5),
            ZielFeld::Email,
        )
        .unwrap()
    }

    #[test]
    fn ziffern_code_laenge() {
        let code = ZiffernCode::neu(8).erzeugen();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn gueltigkeit_muss_positiv_sein() {
        let ergebnis = ZweiFaktorDienst::neu(
            Arc::new(SpeicherCodes::neu()),
            Arc::new(Postfach::default()),
            Arc::new(KlarHasher),
            Arc::new(ZiffernCode::default()),
            Duration::zero(),
            ZielFeld::Email,
        );
        assert!(matches!(ergebnis, Err(AuthError::Konfiguration(_))));
    }

    #[tokio::test]
    async fn ausstellen_speichert_hash_und_versendet_klartext() {
        let codes = Arc::new(SpeicherCodes::neu());
        let postfach = Arc::new(Postfach::default());
        let dienst = dienst(codes.clone(), postfach.clone());
        let jetzt = Utc::now();

        dienst
            .ausstellen(&konto(), &Anmeldedaten::default(), jetzt)
            .await
            .unwrap();

        let gespeichert = codes.code_laden("k1").await.unwrap().unwrap();
        assert_eq!(gespeichert.code_hash, "klar:424242");
        assert_eq!(gespeichert.laeuft_ab_am, jetzt + Duration::minutes(5));
        assert_eq!(
            *postfach.nachrichten.lock(),
            vec![("alice@example.org".to_string(), "424242".to_string())]
        );
    }

    #[tokio::test]
    async fn ohne_zustellziel_kein_code() {
        let codes = Arc::new(SpeicherCodes::neu());
        let dienst = dienst(codes.clone(), Arc::new(Postfach::default()));
        let ohne_email = KontoRecord::neu("k2", "bob", "-");

        let ergebnis = dienst
            .ausstellen(&ohne_email, &Anmeldedaten::default(), Utc::now())
            .await;
        assert!(matches!(ergebnis, Err(AuthError::Versand(_))));
        assert_eq!(codes.anzahl(), 0);
    }

    #[tokio::test]
    async fn richtiger_code_wird_geloescht() {
        let codes = Arc::new(SpeicherCodes::neu());
        let dienst = dienst(codes.clone(), Arc::new(Postfach::default()));
        let jetzt = Utc::now();
        dienst
            .ausstellen(&konto(), &Anmeldedaten::default(), jetzt)
            .await
            .unwrap();

        assert!(dienst.verifizieren("k1", "424242", jetzt).await.unwrap());
        // Loeschen laeuft abgekoppelt
        for _ in 0..50 {
            if codes.loeschungen() > 0 {
                break;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        assert_eq!(codes.loeschungen(), 1);
        assert_eq!(codes.anzahl(), 0);
    }

    #[tokio::test]
    async fn falscher_code_bleibt_bestehen() {
        let codes = Arc::new(SpeicherCodes::neu());
        let dienst = dienst(codes.clone(), Arc::new(Postfach::default()));
        let jetzt = Utc::now();
        dienst
            .ausstellen(&konto(), &Anmeldedaten::default(), jetzt)
            .await
            .unwrap();

        assert!(!dienst.verifizieren("k1", "000000", jetzt).await.unwrap());
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert_eq!(codes.loeschungen(), 0);
        assert_eq!(codes.anzahl(), 1);
    }

    #[tokio::test]
    async fn abgelaufener_code_wird_geloescht() {
        let codes = Arc::new(SpeicherCodes::neu());
        let dienst = dienst(codes.clone(), Arc::new(Postfach::default()));
        let jetzt = Utc::now();
        dienst
            .ausstellen(&konto(), &Anmeldedaten::default(), jetzt)
            .await
            .unwrap();

        let spaeter = jetzt + Duration::minutes(6);
        assert!(!dienst.verifizieren("k1", "424242", spaeter).await.unwrap());
        dienst.loeschen_im_hintergrund("k1").await.unwrap();
        // Einmal durch verifizieren, einmal direkt
        assert_eq!(codes.loeschungen(), 2);
        assert_eq!(codes.anzahl(), 0);
    }

    #[tokio::test]
    async fn ohne_code_kein_erfolg() {
        let dienst = dienst(Arc::new(SpeicherCodes::neu()), Arc::new(Postfach::default()));
        assert!(!dienst.verifizieren("k1", "424242", Utc::now()).await.unwrap());
    }
}
