//! Anmelde-Engine fuer Einlass
//!
//! Zentraler Einstiegspunkt fuer Anmeldeversuche. Die Engine haelt nach dem
//! Bau keinen veraenderlichen Zustand; jeder dauerhafte Zustand liegt in den
//! Kollaborateuren (Konten, Codes, Cache).
//!
//! Ablauf eines Versuchs:
//! 1. Leere Eingaben ablehnen
//! 2. Eigene Pruefung (falls konfiguriert, nur erster Faktor)
//! 3. Konto laden
//! 4. Passwort vergleichen, bei Fehler Sperr-Richtlinie anwenden
//! 5. Kontorichtlinien und Zugangsfenster
//! 6. Zwei-Faktor-Ablauf
//! 7. Token ausstellen
//! 8. Erfolg vermerken

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use einlass_store::{KontoRecord, KontoRepository, PrivilegienQuelle};

use crate::config::AuthKonfig;
use crate::error::{AuthError, AuthResult};
use crate::modell::{Anmeldedaten, AuthErgebnis, SitzungsKonto};
use crate::password::Hasher;
use crate::payload::{payload_formen, PayloadFelder};
use crate::sperrung::{ist_gesperrt, SperrEntscheidung, SperrRichtlinie};
use crate::status::{Status, StatusCodes};
use crate::token::TokenCodec;
use crate::uhr::{SystemUhr, Uhr};
use crate::zugangsfenster::{datum_fenster_gueltig, tageszeit_gueltig, token_ablauf_begrenzen};
use crate::zwei_faktor::ZweiFaktorDienst;

/// Eigene Pruefung des ersten Faktors anstelle des Passwortvergleichs
///
/// Ein Status ausserhalb der Erfolgsfamilie wird unveraendert zurueckgegeben.
#[async_trait]
pub trait EigenePruefung: Send + Sync {
    async fn pruefen(&self, daten: &Anmeldedaten) -> AuthResult<Status>;
}

/// Pruefung des ersten Faktors, einmal beim Bau festgelegt
#[derive(Clone)]
pub enum PrimaerPruefung {
    /// Passwortvergleich gegen den gespeicherten Hash
    Passwort(Arc<dyn Hasher>),
    /// Eigene Pruefung; mit Kontenspeicher folgen trotzdem alle Kontorichtlinien
    Eigene(Arc<dyn EigenePruefung>),
}

/// Anmelde-Engine
pub struct Authentifizierer {
    primaer: PrimaerPruefung,
    konten: Option<Arc<dyn KontoRepository>>,
    zwei_faktor: Option<ZweiFaktorDienst>,
    privilegien: Option<Arc<dyn PrivilegienQuelle>>,
    codec: Arc<dyn TokenCodec>,
    uhr: Arc<dyn Uhr>,
    codes: StatusCodes,
    payload: PayloadFelder,
    sperr_richtlinie: SperrRichtlinie,
    token_ttl: Duration,
    zeitzone: FixedOffset,
}

/// Builder fuer [`Authentifizierer`]
pub struct AuthentifiziererBuilder {
    konfig: AuthKonfig,
    codec: Arc<dyn TokenCodec>,
    primaer: Option<PrimaerPruefung>,
    konten: Option<Arc<dyn KontoRepository>>,
    zwei_faktor: Option<ZweiFaktorDienst>,
    privilegien: Option<Arc<dyn PrivilegienQuelle>>,
    uhr: Arc<dyn Uhr>,
}

impl AuthentifiziererBuilder {
    /// Passwortvergleich als erster Faktor
    pub fn passwort_pruefung(mut self, hasher: Arc<dyn Hasher>) -> Self {
        self.primaer = Some(PrimaerPruefung::Passwort(hasher));
        self
    }

    /// Eigene Pruefung als erster Faktor
    pub fn eigene_pruefung(mut self, pruefung: Arc<dyn EigenePruefung>) -> Self {
        self.primaer = Some(PrimaerPruefung::Eigene(pruefung));
        self
    }

    pub fn konten(mut self, konten: Arc<dyn KontoRepository>) -> Self {
        self.konten = Some(konten);
        self
    }

    pub fn zwei_faktor(mut self, dienst: ZweiFaktorDienst) -> Self {
        self.zwei_faktor = Some(dienst);
        self
    }

    pub fn privilegien(mut self, quelle: Arc<dyn PrivilegienQuelle>) -> Self {
        self.privilegien = Some(quelle);
        self
    }

    pub fn uhr(mut self, uhr: Arc<dyn Uhr>) -> Self {
        self.uhr = uhr;
        self
    }

    /// Prueft die Verdrahtung und baut die Engine
    ///
    /// Fehlende Pflicht-Kollaborateure sind ein Konfigurationsfehler.
    pub fn bauen(self) -> AuthResult<Authentifizierer> {
        self.konfig.validieren()?;

        let primaer = self.primaer.ok_or_else(|| {
            AuthError::konfiguration("weder Passwortpruefung noch eigene Pruefung konfiguriert")
        })?;
        if matches!(primaer, PrimaerPruefung::Passwort(_)) && self.konten.is_none() {
            return Err(AuthError::konfiguration(
                "Passwortpruefung benoetigt einen Kontenspeicher",
            ));
        }
        if self.zwei_faktor.is_some() && self.konten.is_none() {
            return Err(AuthError::konfiguration(
                "Zwei-Faktor-Ablauf benoetigt einen Kontenspeicher",
            ));
        }

        let engine = Authentifizierer {
            primaer,
            konten: self.konten,
            zwei_faktor: self.zwei_faktor,
            privilegien: self.privilegien,
            codec: self.codec,
            uhr: self.uhr,
            codes: self.konfig.status_codes.aufloesen(),
            payload: self.konfig.payload.clone(),
            sperr_richtlinie: self.konfig.sperr_richtlinie(),
            token_ttl: self.konfig.token_ttl(),
            zeitzone: self.konfig.zeitzone()?,
        };

        tracing::debug!(
            eigene_pruefung = matches!(engine.primaer, PrimaerPruefung::Eigene(_)),
            kontenspeicher = engine.konten.is_some(),
            zwei_faktor = engine.zwei_faktor.is_some(),
            "Anmelde-Engine gebaut"
        );
        Ok(engine)
    }
}

impl Authentifizierer {
    /// Startet den Bau einer Engine
    pub fn builder(konfig: AuthKonfig, codec: Arc<dyn TokenCodec>) -> AuthentifiziererBuilder {
        AuthentifiziererBuilder {
            konfig,
            codec,
            primaer: None,
            konten: None,
            zwei_faktor: None,
            privilegien: None,
            uhr: Arc::new(SystemUhr),
        }
    }

    pub fn status_codes(&self) -> &StatusCodes {
        &self.codes
    }

    /// Fuehrt einen Anmeldeversuch durch
    ///
    /// Richtlinien-Ablehnungen sind `Ok` mit entsprechendem Status.
    /// `Err` bedeutet einen Fehler eines Kollaborateurs.
    pub async fn authentifizieren(&self, daten: &Anmeldedaten) -> AuthResult<AuthErgebnis> {
        let jetzt = self.uhr.jetzt();

        if daten.benutzername.trim().is_empty() && daten.passwort.trim().is_empty() {
            return Ok(self.ohne_sitzung(Status::Fehlschlag, "Anmeldedaten fehlen"));
        }
        if daten.ist_zweiter_faktor() && daten.passcode_wert().is_none() {
            return Ok(self.ohne_sitzung(Status::Fehlschlag, "Einmalcode fehlt"));
        }

        let mut eigene_geprueft = false;
        if let PrimaerPruefung::Eigene(pruefung) = &self.primaer {
            if !daten.ist_zweiter_faktor() {
                let status = pruefung.pruefen(daten).await?;
                if !status.ist_erfolg() {
                    tracing::info!(
                        benutzer = %daten.benutzername,
                        status = ?status,
                        "Eigene Pruefung abgelehnt"
                    );
                    return Ok(self.ohne_sitzung(status, "Eigene Pruefung abgelehnt"));
                }
                eigene_geprueft = true;
            }
        }

        let Some(konten) = &self.konten else {
            if eigene_geprueft {
                return self.zustandslose_sitzung(daten, jetzt);
            }
            return Ok(self.ohne_sitzung(
                Status::Fehlschlag,
                "Zweiter Faktor ohne Kontenspeicher nicht moeglich",
            ));
        };

        let Some(konto) = konten.konto_laden(&daten.benutzername).await? else {
            tracing::info!(benutzer = %daten.benutzername, "Konto nicht gefunden");
            return Ok(self.ohne_sitzung(Status::NichtGefunden, "Konto nicht gefunden"));
        };

        if let PrimaerPruefung::Passwort(hasher) = &self.primaer {
            if !daten.ist_zweiter_faktor() {
                // Gesperrte Konten zaehlen keine weiteren Fehlversuche
                if ist_gesperrt(konto.gesperrt_bis, jetzt) {
                    tracing::info!(benutzer = %konto.benutzername, "Konto gesperrt");
                    return Ok(self.ohne_sitzung(Status::Gesperrt, "Konto gesperrt"));
                }
                if !hasher.vergleichen(&daten.passwort, &konto.passwort_hash)? {
                    return self.falsches_passwort(konten.as_ref(), &konto, jetzt).await;
                }
            }
        }

        if let Some((status, nachricht)) = self.richtlinien_pruefen(&konto, jetzt) {
            tracing::info!(benutzer = %konto.benutzername, status = ?status, "{}", nachricht);
            return Ok(self.ohne_sitzung(status, nachricht));
        }

        if konto.zwei_faktor_aktiv {
            let dienst = self.zwei_faktor.as_ref().ok_or_else(|| {
                AuthError::konfiguration(format!(
                    "Konto '{}' verlangt Zwei-Faktor, aber kein Zwei-Faktor-Dienst konfiguriert",
                    konto.benutzername
                ))
            })?;

            match daten.passcode_wert().filter(|_| daten.ist_zweiter_faktor()) {
                Some(passcode) => {
                    if !dienst.verifizieren(&konto.id, passcode, jetzt).await? {
                        return Ok(self.ohne_sitzung(Status::Fehlschlag, "Einmalcode ungueltig"));
                    }
                }
                None => {
                    dienst.ausstellen(&konto, daten, jetzt).await?;
                    return Ok(self.ohne_sitzung(
                        Status::ZweiFaktorErforderlich,
                        "Einmalcode versendet",
                    ));
                }
            }
        } else if daten.ist_zweiter_faktor() {
            tracing::info!(benutzer = %konto.benutzername, "Einmalcode fuer Konto ohne Zwei-Faktor");
            return Ok(self.ohne_sitzung(Status::Fehlschlag, "Kein zweiter Faktor fuer dieses Konto"));
        }

        self.sitzung_ausstellen(konten.as_ref(), konto, daten, jetzt).await
    }

    /// Anmeldeversuch mit Zeitlimit
    ///
    /// Nach Ablauf wird der Versuch abgebrochen und `Status::Zeitlimit`
    /// geliefert. Bereits gestartetes Loeschen von Einmalcodes laeuft weiter.
    pub async fn authentifizieren_mit_zeitlimit(
        &self,
        daten: &Anmeldedaten,
        zeitlimit: std::time::Duration,
    ) -> AuthResult<AuthErgebnis> {
        match tokio::time::timeout(zeitlimit, self.authentifizieren(daten)).await {
            Ok(ergebnis) => ergebnis,
            Err(_) => {
                tracing::warn!(
                    benutzer = %daten.benutzername,
                    zeitlimit_ms = zeitlimit.as_millis() as u64,
                    "Zeitlimit bei Anmeldung ueberschritten"
                );
                Ok(self.ohne_sitzung(Status::Zeitlimit, "Zeitlimit ueberschritten"))
            }
        }
    }

    /// Wandelt einen Kollaborateur-Fehler in ein Ergebnis mit `Status::Fehler`
    pub fn fehler_ergebnis(&self, fehler: &AuthError) -> AuthErgebnis {
        self.ohne_sitzung(Status::Fehler, fehler.to_string())
    }

    fn ohne_sitzung(&self, status: Status, nachricht: impl Into<String>) -> AuthErgebnis {
        AuthErgebnis::abgelehnt(&self.codes, status, nachricht)
    }

    /// Kontorichtlinien in fester Reihenfolge; liefert die erste Ablehnung
    fn richtlinien_pruefen(
        &self,
        konto: &KontoRecord,
        jetzt: DateTime<Utc>,
    ) -> Option<(Status, &'static str)> {
        if konto.deaktiviert {
            return Some((Status::Deaktiviert, "Konto deaktiviert"));
        }
        if konto.suspendiert {
            return Some((Status::Suspendiert, "Konto suspendiert"));
        }
        if ist_gesperrt(konto.gesperrt_bis, jetzt) {
            return Some((Status::Gesperrt, "Konto gesperrt"));
        }
        if passwort_abgelaufen(konto, jetzt) {
            return Some((Status::PasswortAbgelaufen, "Passwort abgelaufen"));
        }

        let lokal = jetzt.with_timezone(&self.zeitzone);
        if !datum_fenster_gueltig(konto.zugang_datum_von, konto.zugang_datum_bis, &lokal) {
            return Some((Status::Deaktiviert, "Ausserhalb des Zugangszeitraums"));
        }
        if !tageszeit_gueltig(konto.zugang_zeit_von, konto.zugang_zeit_bis, &lokal) {
            return Some((Status::ZugangszeitGesperrt, "Ausserhalb der Zugangszeit"));
        }
        None
    }

    /// Wendet die Sperr-Richtlinie an und schreibt das Ergebnis genau einmal
    async fn falsches_passwort(
        &self,
        konten: &dyn KontoRepository,
        konto: &KontoRecord,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<AuthErgebnis> {
        match self
            .sperr_richtlinie
            .bei_falschem_passwort(konto.fehlversuche, jetzt)
        {
            SperrEntscheidung::Zaehlen { fehlversuche } => {
                konten
                    .fehlschlag_vermerken(&konto.id, fehlversuche, None)
                    .await?;
                tracing::warn!(
                    benutzer = %konto.benutzername,
                    fehlversuche,
                    "Falsches Passwort"
                );
                Ok(self.ohne_sitzung(Status::FalschesPasswort, "Falsches Passwort"))
            }
            SperrEntscheidung::Sperren { gesperrt_bis } => {
                konten
                    .fehlschlag_vermerken(&konto.id, konto.fehlversuche, Some(gesperrt_bis))
                    .await?;
                tracing::warn!(
                    benutzer = %konto.benutzername,
                    gesperrt_bis = %gesperrt_bis,
                    "Konto nach zu vielen Fehlversuchen gesperrt"
                );
                Ok(self.ohne_sitzung(Status::Gesperrt, "Konto gesperrt"))
            }
        }
    }

    /// Stellt Token und Sitzungskonto aus und vermerkt den Erfolg
    async fn sitzung_ausstellen(
        &self,
        konten: &dyn KontoRepository,
        konto: KontoRecord,
        daten: &Anmeldedaten,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<AuthErgebnis> {
        let lokal = jetzt.with_timezone(&self.zeitzone);
        let (laeuft_ab_am, ttl) = token_ablauf_begrenzen(
            konto.zugang_zeit_von,
            konto.zugang_zeit_bis,
            self.token_ttl,
            &lokal,
        );

        let (payload, mut sitzung) = payload_formen(
            &self.payload,
            SitzungsKonto::aus_konto(&konto),
            daten.client_ip.as_deref(),
        );
        sitzung.token = self.codec.erzeugen(&payload, ttl)?;
        sitzung.token_laeuft_ab_am = Some(laeuft_ab_am.with_timezone(&Utc));

        let status = if konto.inaktiv {
            Status::ErfolgReaktiviert
        } else {
            Status::Erfolg
        };

        if let Some(quelle) = &self.privilegien {
            let privilegien = quelle.privilegien_laden(&konto.id).await?;
            if !privilegien.is_empty() {
                sitzung.privilegien = Some(privilegien);
            }
        }

        konten.erfolg_vermerken(&konto.id, konto.inaktiv).await?;

        tracing::info!(
            benutzer = %konto.benutzername,
            konto_id = %konto.id,
            status = ?status,
            laeuft_ab_am = %laeuft_ab_am,
            "Benutzer angemeldet"
        );
        Ok(AuthErgebnis::erfolg(&self.codes, status, sitzung))
    }

    /// Sitzung nur aus den Anmeldedaten, ohne Kontenspeicher
    fn zustandslose_sitzung(
        &self,
        daten: &Anmeldedaten,
        jetzt: DateTime<Utc>,
    ) -> AuthResult<AuthErgebnis> {
        let (payload, mut sitzung) = payload_formen(
            &self.payload,
            SitzungsKonto::nur_benutzername(&daten.benutzername),
            daten.client_ip.as_deref(),
        );
        sitzung.token = self.codec.erzeugen(&payload, self.token_ttl)?;
        sitzung.token_laeuft_ab_am = Some(jetzt + self.token_ttl);

        tracing::info!(benutzer = %daten.benutzername, "Zustandslose Sitzung ausgestellt");
        Ok(AuthErgebnis::erfolg(&self.codes, Status::Erfolg, sitzung))
    }
}

/// Passwortalter in Tagen ueberschritten (0 = unbegrenzt)
fn passwort_abgelaufen(konto: &KontoRecord, jetzt: DateTime<Utc>) -> bool {
    if konto.max_passwort_alter_tage == 0 {
        return false;
    }
    konto.passwort_geaendert_am.is_some_and(|geaendert| {
        jetzt - geaendert > Duration::days(i64::from(konto.max_passwort_alter_tage))
    })
}
