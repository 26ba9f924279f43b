//! Token-Freigabeliste
//!
//! Pro Besitzer ist ein freigegebenes Token hinterlegt. Im Modus
//! `EinzelSitzung` ist nur genau dieses Token gueltig (eine neue Anmeldung
//! ersetzt die alte Sitzung). Im Modus `GeteiltesGeheimnis` gilt jedes
//! gueltige Token mit derselben Client-Identitaet.

use std::sync::Arc;

use einlass_store::WiderrufsCache;

use crate::config::{FreigabeKonfig, FreigabeModus};
use crate::error::{AuthError, AuthResult};
use crate::sperrliste::restdauer;
use crate::token::TokenCodec;
use crate::uhr::{SystemUhr, Uhr};

pub struct TokenFreigabeliste {
    cache: Arc<dyn WiderrufsCache>,
    codec: Arc<dyn TokenCodec>,
    modus: FreigabeModus,
    claim: String,
    praefix: String,
    uhr: Arc<dyn Uhr>,
}

impl TokenFreigabeliste {
    pub fn neu(
        cache: Arc<dyn WiderrufsCache>,
        codec: Arc<dyn TokenCodec>,
        konfig: &FreigabeKonfig,
    ) -> Self {
        Self {
            cache,
            codec,
            modus: konfig.modus,
            claim: konfig.claim.clone(),
            praefix: konfig.schluessel_praefix.clone(),
            uhr: Arc::new(SystemUhr),
        }
    }

    pub fn mit_uhr(mut self, uhr: Arc<dyn Uhr>) -> Self {
        self.uhr = uhr;
        self
    }

    pub fn modus(&self) -> FreigabeModus {
        self.modus
    }

    fn schluessel(&self, besitzer: &str) -> String {
        format!("{}w:{}", self.praefix, besitzer)
    }

    /// Gibt ein Token fuer den Besitzer frei und ersetzt ein vorheriges
    pub async fn hinzufuegen(&self, besitzer: &str, token: &str) -> AuthResult<()> {
        let claims = self.codec.verifizieren(token)?;
        let ttl = restdauer(claims.laeuft_ab_am - self.uhr.jetzt())
            .ok_or(AuthError::TokenAbgelaufen)?;

        self.cache.setzen(&self.schluessel(besitzer), token, ttl).await?;
        tracing::debug!(besitzer = %besitzer, "Token freigegeben");
        Ok(())
    }

    /// Prueft ob ein Token freigegeben ist
    ///
    /// Cache- und Verifikationsfehler gelten als nicht freigegeben.
    pub async fn pruefen(&self, besitzer: &str, token: &str) -> bool {
        let gespeichert = match self.cache.holen(&self.schluessel(besitzer)).await {
            Ok(Some(gespeichert)) => gespeichert,
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(besitzer = %besitzer, fehler = %e, "Freigabeliste nicht lesbar");
                return false;
            }
        };

        match self.modus {
            FreigabeModus::EinzelSitzung => gespeichert == token,
            FreigabeModus::GeteiltesGeheimnis => {
                match (self.client_identitaet(&gespeichert), self.client_identitaet(token)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
        }
    }

    /// Entfernt die Freigabe (Abmeldung)
    pub async fn entfernen(&self, besitzer: &str) -> AuthResult<()> {
        self.cache.entfernen(&self.schluessel(besitzer)).await?;
        tracing::debug!(besitzer = %besitzer, "Freigabe entfernt");
        Ok(())
    }

    fn client_identitaet(&self, token: &str) -> Option<String> {
        match self.codec.verifizieren(token) {
            Ok(claims) => claims.text(&self.claim),
            Err(e) => {
                tracing::debug!(fehler = %e, "Token der Freigabeliste ungueltig");
                None
            }
        }
    }
}
