//! Sitzungswaechter fuer Anfragen nach der Anmeldung
//!
//! Prueft ein vorgelegtes Token gegen Codec, Sperrliste und optional die
//! Freigabeliste. Wird von der Anfrage-Autorisierung genutzt, nicht von der
//! Anmeldung selbst.

use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::freigabeliste::TokenFreigabeliste;
use crate::sperrliste::TokenSperrliste;
use crate::token::{TokenCodec, VerifizierteClaims};

pub struct SitzungsWaechter {
    codec: Arc<dyn TokenCodec>,
    sperrliste: Arc<TokenSperrliste>,
    freigabeliste: Option<Arc<TokenFreigabeliste>>,
    besitzer_claim: String,
}

impl SitzungsWaechter {
    pub fn neu(
        codec: Arc<dyn TokenCodec>,
        sperrliste: Arc<TokenSperrliste>,
        besitzer_claim: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            sperrliste,
            freigabeliste: None,
            besitzer_claim: besitzer_claim.into(),
        }
    }

    pub fn mit_freigabeliste(mut self, freigabeliste: Arc<TokenFreigabeliste>) -> Self {
        self.freigabeliste = Some(freigabeliste);
        self
    }

    /// Prueft ein Token und gibt die verifizierten Claims zurueck
    pub async fn pruefen(&self, token: &str) -> AuthResult<VerifizierteClaims> {
        let claims = self.codec.verifizieren(token)?;
        let besitzer = claims.text(&self.besitzer_claim).ok_or_else(|| {
            AuthError::Token(format!("Claim '{}' fehlt", self.besitzer_claim))
        })?;

        if let Some(grund) = self
            .sperrliste
            .pruefen(&besitzer, token, claims.ausgestellt_am)
            .await
        {
            tracing::info!(besitzer = %besitzer, grund = %grund, "Widerrufenes Token abgewiesen");
            return Err(AuthError::TokenWiderrufen(grund));
        }

        if let Some(freigabeliste) = &self.freigabeliste {
            if !freigabeliste.pruefen(&besitzer, token).await {
                tracing::info!(besitzer = %besitzer, "Token nicht freigegeben");
                return Err(AuthError::SitzungUngueltig);
            }
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use einlass_store::SpeicherCache;
    use serde_json::Value;

    use crate::config::{FreigabeKonfig, SperrlistenKonfig};
    use crate::token::JwtCodec;

    struct Aufbau {
        codec: Arc<JwtCodec>,
        sperrliste: Arc<TokenSperrliste>,
        freigabeliste: Arc<TokenFreigabeliste>,
    }

    fn aufbau() -> Aufbau {
        let cache = Arc::new(SpeicherCache::neu());
        let codec = Arc::new(JwtCodec::hs256(b"waechter-test"));
        Aufbau {
            sperrliste: Arc::new(TokenSperrliste::neu(cache.clone(), &SperrlistenKonfig::default())),
            freigabeliste: Arc::new(TokenFreigabeliste::neu(
                cache,
                codec.clone(),
                &FreigabeKonfig::default(),
            )),
            codec,
        }
    }

    fn token(codec: &JwtCodec, sub: Option<&str>) -> String {
        let payload = sub
            .map(|s| vec![("sub".to_string(), Value::from(s))])
            .unwrap_or_default();
        codec.erzeugen(&payload, Duration::minutes(5)).unwrap()
    }

    #[tokio::test]
    async fn gueltiges_token_wird_akzeptiert() {
        let a = aufbau();
        let waechter = SitzungsWaechter::neu(a.codec.clone(), a.sperrliste, "sub");
        let claims = waechter.pruefen(&token(&a.codec, Some("k1"))).await.unwrap();
        assert_eq!(claims.text("sub").as_deref(), Some("k1"));
    }

    #[tokio::test]
    async fn ohne_besitzer_claim_abgelehnt() {
        let a = aufbau();
        let waechter = SitzungsWaechter::neu(a.codec.clone(), a.sperrliste, "sub");
        let ergebnis = waechter.pruefen(&token(&a.codec, None)).await;
        assert!(matches!(ergebnis, Err(AuthError::Token(_))));
    }

    #[tokio::test]
    async fn widerrufenes_token_abgelehnt() {
        let a = aufbau();
        let token = token(&a.codec, Some("k1"));
        let claims = a.codec.verifizieren(&token).unwrap();
        a.sperrliste
            .widerrufen(&token, "abgemeldet", claims.laeuft_ab_am)
            .await
            .unwrap();

        let waechter = SitzungsWaechter::neu(a.codec.clone(), a.sperrliste, "sub");
        match waechter.pruefen(&token).await {
            Err(AuthError::TokenWiderrufen(grund)) => assert_eq!(grund, "abgemeldet"),
            anderes => panic!("Widerruf erwartet, erhalten: {anderes:?}"),
        }
    }

    #[tokio::test]
    async fn freigabeliste_ersetzt_alte_sitzung() {
        let a = aufbau();
        let alt = token(&a.codec, Some("k1"));
        let neu = token(&a.codec, Some("k1"));
        a.freigabeliste.hinzufuegen("k1", &alt).await.unwrap();
        a.freigabeliste.hinzufuegen("k1", &neu).await.unwrap();

        let waechter = SitzungsWaechter::neu(a.codec.clone(), a.sperrliste, "sub")
            .mit_freigabeliste(a.freigabeliste);
        assert!(waechter.pruefen(&neu).await.is_ok());
        assert!(matches!(
            waechter.pruefen(&alt).await,
            Err(AuthError::SitzungUngueltig)
        ));
    }
}
