//! Fehlertypen fuer das Store-Crate

use thiserror::Error;

/// Fehler der Speicher-Kollaborateure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Ungueltige Daten: {0}")]
    Ungueltig(String),

    #[error("Backend nicht erreichbar: {0}")]
    Backend(String),

    #[error("Interner Speicherfehler: {0}")]
    Intern(String),
}

impl StoreError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Alias fuer Speicher-Operationen
pub type StoreResult<T> = Result<T, StoreError>;
