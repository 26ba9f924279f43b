//! Einlass Pruefstand – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und fuehrt einen
//! Befehl aus.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use einlass_auth::{Anmeldedaten, Argon2Hasher, Hasher};
use einlass_cli::{config::EinlassConfig, Pruefstand};
use einlass_observability::logging_initialisieren;

#[derive(Parser)]
#[command(name = "einlass")]
#[command(about = "Pruefstand fuer die Einlass-Anmelde-Engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Pfad zur Konfigurationsdatei
    #[arg(short, long, env = "EINLASS_CONFIG", default_value = "einlass.toml")]
    config: String,

    #[command(subcommand)]
    befehl: Befehl,
}

#[derive(Subcommand)]
enum Befehl {
    /// Erzeugt einen Argon2id-Hash fuer `passwort_hash` in der Konfiguration
    Hash {
        passwort: String,
    },

    /// Fuehrt eine Anmeldung durch; fragt bei Bedarf den Einmalcode ab
    Anmelden {
        benutzername: String,
        passwort: String,

        /// Client-Adresse fuer den Token-Inhalt
        #[arg(long)]
        ip: Option<String>,

        /// Zeitlimit fuer jeden Anmeldeschritt in Millisekunden
        #[arg(long, default_value_t = 5000)]
        zeitlimit_ms: u64,
    },

    /// Gibt die wirksame Konfiguration aus
    Konfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = EinlassConfig::laden(&cli.config)?;

    logging_initialisieren(&config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "Einlass Pruefstand wird initialisiert"
    );

    match cli.befehl {
        Befehl::Hash { passwort } => {
            println!("{}", Argon2Hasher::neu().hashen(&passwort)?);
        }
        Befehl::Konfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Befehl::Anmelden {
            benutzername,
            passwort,
            ip,
            zeitlimit_ms,
        } => {
            let pruefstand = Pruefstand::aufbauen(&config)?;
            let zeitlimit = Duration::from_millis(zeitlimit_ms);

            let mut daten = Anmeldedaten::passwort(&benutzername, passwort);
            daten.client_ip = ip.clone();
            let mut ergebnis = pruefstand.anmelden_mit_zeitlimit(&daten, zeitlimit).await;

            if Pruefstand::braucht_code(&ergebnis) {
                let code = code_abfragen()?;
                let mut daten = Anmeldedaten::passcode(&benutzername, code);
                daten.client_ip = ip;
                ergebnis = pruefstand.anmelden_mit_zeitlimit(&daten, zeitlimit).await;
            }

            println!("{}", serde_json::to_string_pretty(&ergebnis)?);
            pruefstand.sitzung_pruefen(&ergebnis).await?;
        }
    }

    Ok(())
}

/// Liest den Einmalcode von der Standardeingabe
fn code_abfragen() -> Result<String> {
    eprint!("Einmalcode: ");
    std::io::stderr().flush()?;
    let mut zeile = String::new();
    std::io::stdin().lock().read_line(&mut zeile)?;
    Ok(zeile.trim().to_string())
}
