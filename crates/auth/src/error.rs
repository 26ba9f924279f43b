//! Fehlertypen fuer die Anmelde-Engine
//!
//! Richtlinien-Ablehnungen (falsches Passwort, Sperre, Zugangsfenster ...) sind
//! keine Fehler, sondern ein `AuthErgebnis` mit entsprechendem Status.
//! `AuthError` steht ausschliesslich fuer Kollaborateur- und Systemfehler.

use thiserror::Error;

/// Alle moeglichen Fehler der Anmelde-Engine
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Kollaborateure ---
    #[error("Speicherfehler: {0}")]
    Speicher(#[from] einlass_store::StoreError),

    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    #[error("Eigene Pruefung fehlgeschlagen: {0}")]
    EigenePruefung(String),

    #[error("Code-Versand fehlgeschlagen: {0}")]
    Versand(String),

    #[error("Zwei-Faktor-Fehler: {0}")]
    ZweiFaktor(String),

    // --- Token ---
    #[error("Token ungueltig: {0}")]
    Token(String),

    #[error("Token abgelaufen")]
    TokenAbgelaufen,

    #[error("Token widerrufen: {0}")]
    TokenWiderrufen(String),

    #[error("Sitzung ungueltig oder durch neuere Anmeldung ersetzt")]
    SitzungUngueltig,

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn konfiguration(msg: impl Into<String>) -> Self {
        Self::Konfiguration(msg.into())
    }

    /// Gibt `true` zurueck wenn der Fehler eine Zugriffsverweigerung einer
    /// bereits ausgestellten Sitzung ist (kein Systemfehler)
    pub fn ist_sitzungs_ablehnung(&self) -> bool {
        matches!(
            self,
            Self::TokenAbgelaufen | Self::TokenWiderrufen(_) | Self::SitzungUngueltig | Self::Token(_)
        )
    }
}

/// Result-Alias fuer die Anmelde-Engine
pub type AuthResult<T> = Result<T, AuthError>;
