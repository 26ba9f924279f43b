//! einlass-auth – Anmelde-Entscheidungs-Engine
//!
//! Dieses Crate implementiert:
//! - Anmelde-Engine (`Authentifizierer`) mit eigener oder Passwort-Pruefung
//! - Sperr-Richtlinie nach Fehlversuchen
//! - Zugangsfenster (Datum, Tageszeit) und Begrenzung der Token-Laufzeit
//! - Zwei-Faktor-Ablauf mit Einmalcodes
//! - Token-Sperrliste und -Freigabeliste, Sitzungswaechter
//! - Passwort-Hashing mit Argon2id, JWT-Codec
//! - Konfigurierbare Statuscodes und Token-Inhalt

pub mod config;
pub mod error;
pub mod freigabeliste;
pub mod modell;
pub mod password;
pub mod payload;
pub mod service;
pub mod sperrliste;
pub mod sperrung;
pub mod status;
pub mod token;
pub mod uhr;
pub mod waechter;
pub mod zugangsfenster;
pub mod zwei_faktor;

// Bequeme Re-Exporte
pub use config::{AuthKonfig, FreigabeModus, ZielFeld};
pub use error::{AuthError, AuthResult};
pub use freigabeliste::TokenFreigabeliste;
pub use modell::{Anmeldedaten, AuthErgebnis, SitzungsKonto};
pub use password::{Argon2Hasher, Hasher};
pub use payload::{FeldAbbildung, PayloadFelder};
pub use service::{Authentifizierer, AuthentifiziererBuilder, EigenePruefung, PrimaerPruefung};
pub use sperrliste::TokenSperrliste;
pub use status::{Status, StatusCodeKonfig, StatusCodes};
pub use token::{JwtCodec, TokenCodec, TokenPayload, VerifizierteClaims};
pub use uhr::{FesteUhr, SystemUhr, Uhr};
pub use waechter::SitzungsWaechter;
pub use zwei_faktor::{CodeGenerator, CodeVersand, ZiffernCode, ZweiFaktorDienst};
