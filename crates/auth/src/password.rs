//! Hashing von Passwoertern und Einmalcodes
//!
//! Die Engine kennt nur den [`Hasher`]-Vertrag. Die Standardimplementierung
//! nutzt Argon2id mit PHC-Strings (Algorithmus, Parameter und Salt im Hash).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

/// Vertrag fuer Passwort- und Code-Hashing
pub trait Hasher: Send + Sync {
    /// Hasht einen Klartext
    fn hashen(&self, klartext: &str) -> AuthResult<String>;

    /// Vergleicht einen Klartext mit einem gespeicherten Hash
    ///
    /// `Ok(false)` bei Nichtuebereinstimmung, `Err` nur bei kaputtem Hash
    /// oder internem Fehler.
    fn vergleichen(&self, klartext: &str, hash: &str) -> AuthResult<bool>;
}

/// Argon2id-Hasher
///
/// Werte gemaess OWASP-Empfehlungen (Stand 2024):
/// - Speicher: 64 MiB
/// - Iterationen: 3
/// - Parallelismus: 1
#[derive(Debug, Clone, Copy)]
pub struct Argon2Hasher {
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            m_cost: 64 * 1024,
            t_cost: 3,
            p_cost: 1,
        }
    }
}

impl Argon2Hasher {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Guenstigere Parameter, z.B. fuer kurzlebige Einmalcodes
    pub fn mit_parametern(m_cost: u32, t_cost: u32, p_cost: u32) -> Self {
        Self {
            m_cost,
            t_cost,
            p_cost,
        }
    }

    fn argon2_instanz(&self) -> AuthResult<Argon2<'static>> {
        let params = Params::new(self.m_cost, self.t_cost, self.p_cost, None)
            .map_err(|e| AuthError::PasswortHashing(format!("Argon2-Parameter ungueltig: {e}")))?;
        Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Hasher for Argon2Hasher {
    fn hashen(&self, klartext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2_instanz()?
            .hash_password(klartext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    fn vergleichen(&self, klartext: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

        match self
            .argon2_instanz()?
            .verify_password(klartext.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
        }
    }
}
