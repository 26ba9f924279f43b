//! Token-Sperrliste (Widerrufe)
//!
//! Einzelne Tokens werden bis zu ihrem Ablauf gesperrt. Ein Widerruf aller
//! Tokens eines Besitzers speichert Grund und Zeitpunkt; gesperrt sind dann
//! alle Tokens, die vor diesem Zeitpunkt ausgestellt wurden.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use einlass_store::WiderrufsCache;

use crate::config::SperrlistenKonfig;
use crate::error::{AuthError, AuthResult};
use crate::uhr::{SystemUhr, Uhr};

/// Trenner zwischen Grund und Zeitpunkt im Besitzer-Eintrag
const TRENNER: char = '|';

/// Grund, wenn der Cache nicht befragt werden konnte
const GRUND_NICHT_PRUEFBAR: &str = "Widerrufsstatus nicht pruefbar";

pub struct TokenSperrliste {
    cache: Arc<dyn WiderrufsCache>,
    praefix: String,
    max_lebensdauer: Duration,
    uhr: Arc<dyn Uhr>,
}

impl TokenSperrliste {
    pub fn neu(cache: Arc<dyn WiderrufsCache>, konfig: &SperrlistenKonfig) -> Self {
        Self {
            cache,
            praefix: konfig.schluessel_praefix.clone(),
            max_lebensdauer: Duration::seconds(konfig.max_token_lebensdauer_sekunden),
            uhr: Arc::new(SystemUhr),
        }
    }

    pub fn mit_uhr(mut self, uhr: Arc<dyn Uhr>) -> Self {
        self.uhr = uhr;
        self
    }

    fn token_schluessel(&self, token: &str) -> String {
        format!("{}t:{}", self.praefix, token)
    }

    fn besitzer_schluessel(&self, besitzer: &str) -> String {
        format!("{}o:{}", self.praefix, besitzer)
    }

    /// Sperrt ein einzelnes Token bis zu seinem Ablauf
    ///
    /// Bereits abgelaufene Tokens werden nicht eingetragen.
    pub async fn widerrufen(
        &self,
        token: &str,
        grund: &str,
        laeuft_ab_am: DateTime<Utc>,
    ) -> AuthResult<()> {
        let Some(ttl) = restdauer(laeuft_ab_am - self.uhr.jetzt()) else {
            tracing::debug!("Token bereits abgelaufen, kein Widerruf noetig");
            return Ok(());
        };

        self.cache
            .setzen(&self.token_schluessel(token), grund, ttl)
            .await?;
        tracing::info!(grund = %grund, "Token widerrufen");
        Ok(())
    }

    /// Sperrt alle bis jetzt ausgestellten Tokens eines Besitzers
    ///
    /// Der Zeitpunkt wird in ganzen Sekunden gespeichert wie `iat`. Tokens aus
    /// derselben Sekunde bleiben gueltig.
    pub async fn alle_widerrufen(&self, besitzer: &str, grund: &str) -> AuthResult<()> {
        let jetzt = self.uhr.jetzt();
        let wert = format!("{grund}{TRENNER}{}", jetzt.timestamp());
        let ttl = restdauer(self.max_lebensdauer).ok_or_else(|| {
            AuthError::konfiguration("maximale Token-Lebensdauer muss positiv sein")
        })?;

        self.cache
            .setzen(&self.besitzer_schluessel(besitzer), &wert, ttl)
            .await?;
        tracing::info!(besitzer = %besitzer, grund = %grund, "Alle Tokens widerrufen");
        Ok(())
    }

    /// Prueft ein Token; gibt den Sperrgrund zurueck oder `None`
    ///
    /// Cache-Fehler gelten als gesperrt.
    pub async fn pruefen(
        &self,
        besitzer: &str,
        token: &str,
        ausgestellt_am: DateTime<Utc>,
    ) -> Option<String> {
        let besitzer_schluessel = self.besitzer_schluessel(besitzer);
        let token_schluessel = self.token_schluessel(token);

        let eintraege = match self
            .cache
            .mehrere_holen(&[besitzer_schluessel.clone(), token_schluessel.clone()])
            .await
        {
            Ok(eintraege) => eintraege,
            Err(e) => {
                tracing::error!(besitzer = %besitzer, fehler = %e, "Sperrliste nicht lesbar");
                return Some(GRUND_NICHT_PRUEFBAR.to_string());
            }
        };

        if let Some(eintrag) = eintraege.get(&besitzer_schluessel) {
            match besitzer_eintrag_lesen(eintrag) {
                Some((grund, widerrufen_am))
                    if widerrufen_am.timestamp() > ausgestellt_am.timestamp() =>
                {
                    return Some(grund.to_string());
                }
                Some(_) => {}
                None => {
                    tracing::error!(besitzer = %besitzer, "Unlesbarer Sperrlisten-Eintrag");
                    return Some(GRUND_NICHT_PRUEFBAR.to_string());
                }
            }
        }

        eintraege.get(&token_schluessel).cloned()
    }

    /// Hebt den Widerruf eines einzelnen Tokens auf
    pub async fn widerruf_aufheben(&self, token: &str) -> AuthResult<()> {
        self.cache.entfernen(&self.token_schluessel(token)).await?;
        Ok(())
    }

    /// Hebt den Widerruf aller Tokens eines Besitzers auf
    pub async fn alle_freigeben(&self, besitzer: &str) -> AuthResult<()> {
        self.cache.entfernen(&self.besitzer_schluessel(besitzer)).await?;
        tracing::info!(besitzer = %besitzer, "Widerruf aller Tokens aufgehoben");
        Ok(())
    }
}

/// Positive Restdauer als std-Duration
pub(crate) fn restdauer(dauer: Duration) -> Option<std::time::Duration> {
    if dauer <= Duration::zero() {
        return None;
    }
    dauer.to_std().ok()
}

fn besitzer_eintrag_lesen(eintrag: &str) -> Option<(&str, DateTime<Utc>)> {
    let (grund, sekunden) = eintrag.rsplit_once(TRENNER)?;
    let sekunden = sekunden.parse::<i64>().ok()?;
    Some((grund, DateTime::<Utc>::from_timestamp(sekunden, 0)?))
}
