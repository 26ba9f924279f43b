//! Token-Codec: Ausstellen und Pruefen von Sitzungstokens
//!
//! Die Engine haengt nur am [`TokenCodec`]-Vertrag. [`JwtCodec`] ist die
//! Standardimplementierung (HS256): Payload-Felder werden zu Claims, dazu
//! kommen `iat`, `exp`, `jti` und optional `iss`. Das Geheimnis haelt der Codec.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Geordnete Schluessel-Wert-Liste fuer den Token-Inhalt
pub type TokenPayload = Vec<(String, Value)>;

/// Ergebnis einer erfolgreichen Token-Pruefung
#[derive(Debug, Clone, PartialEq)]
pub struct VerifizierteClaims {
    pub claims: Map<String, Value>,
    pub ausgestellt_am: DateTime<Utc>,
    pub laeuft_ab_am: DateTime<Utc>,
}

impl VerifizierteClaims {
    /// Liest einen Claim als Text; Zahlen werden in Text umgewandelt
    pub fn text(&self, name: &str) -> Option<String> {
        match self.claims.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Vertrag fuer Token-Erzeugung und -Pruefung
pub trait TokenCodec: Send + Sync {
    fn erzeugen(&self, payload: &TokenPayload, ttl: Duration) -> AuthResult<String>;

    /// Prueft Signatur und Ablauf
    ///
    /// Abgelaufene Tokens ergeben `AuthError::TokenAbgelaufen`.
    fn verifizieren(&self, token: &str) -> AuthResult<VerifizierteClaims>;
}

/// JWT-Codec mit gemeinsamem Geheimnis (HS256)
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    aussteller: Option<String>,
}

impl JwtCodec {
    pub fn hs256(geheimnis: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(geheimnis),
            decoding: DecodingKey::from_secret(geheimnis),
            aussteller: None,
        }
    }

    /// Setzt den `iss`-Claim und verlangt ihn bei der Pruefung
    pub fn mit_aussteller(mut self, aussteller: impl Into<String>) -> Self {
        self.aussteller = Some(aussteller.into());
        self
    }

    fn zeitpunkt(claims: &Map<String, Value>, name: &str) -> AuthResult<DateTime<Utc>> {
        claims
            .get(name)
            .and_then(Value::as_i64)
            .and_then(|sekunden| DateTime::<Utc>::from_timestamp(sekunden, 0))
            .ok_or_else(|| AuthError::Token(format!("Claim '{name}' fehlt oder ist ungueltig")))
    }
}

impl TokenCodec for JwtCodec {
    fn erzeugen(&self, payload: &TokenPayload, ttl: Duration) -> AuthResult<String> {
        let jetzt = Utc::now();
        let mut claims: Map<String, Value> = payload.iter().cloned().collect();

        // Registrierte Claims haben Vorrang vor gleichnamigen Payload-Feldern
        claims.insert("iat".into(), jetzt.timestamp().into());
        claims.insert("exp".into(), (jetzt + ttl).timestamp().into());
        claims.insert("jti".into(), Uuid::new_v4().to_string().into());
        if let Some(aussteller) = &self.aussteller {
            claims.insert("iss".into(), aussteller.clone().into());
        }

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(format!("JWT-Erzeugung: {e}")))
    }

    fn verifizieren(&self, token: &str) -> AuthResult<VerifizierteClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);
        if let Some(aussteller) = &self.aussteller {
            validation.set_issuer(&[aussteller]);
        }

        let daten = jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenAbgelaufen,
                _ => AuthError::Token(e.to_string()),
            })?;

        let claims = daten.claims;
        Ok(VerifizierteClaims {
            ausgestellt_am: Self::zeitpunkt(&claims, "iat")?,
            laeuft_ab_am: Self::zeitpunkt(&claims, "exp")?,
            claims,
        })
    }
}
