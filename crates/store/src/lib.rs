//! einlass-store – Kollaborateur-Schnittstellen der Anmelde-Engine
//!
//! Dieses Crate stellt bereit:
//! - Datenmodelle (`KontoRecord`, `ZweiFaktorCode`)
//! - Repository-Traits fuer Konten, Einmalcodes, Widerrufs-Cache und Privilegien
//! - In-Memory-Implementierungen aller Traits (Tests, lokaler Pruefstand)
//!
//! Konkrete Datenbank-Adapter sind nicht Teil dieses Crates; sie implementieren
//! die Traits aus [`repository`].

pub mod error;
pub mod models;
pub mod repository;
pub mod speicher;

// Bequeme Re-Exporte
pub use error::{StoreError, StoreResult};
pub use models::{KontoRecord, ZweiFaktorCode};
pub use repository::{CodeStore, KontoRepository, PrivilegienQuelle, WiderrufsCache};
pub use speicher::{SpeicherCache, SpeicherCodes, SpeicherKonten, SpeicherPrivilegien};
