//! Integration-Tests fuer die Anmelde-Engine (erster Faktor, Richtlinien)

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use einlass_auth::{
    Anmeldedaten, AuthError, AuthKonfig, AuthResult, Authentifizierer, EigenePruefung,
    FeldAbbildung, FesteUhr, Hasher, JwtCodec, Status, TokenCodec, Uhr,
};
use einlass_store::{
    KontoRecord, KontoRepository, SpeicherKonten, SpeicherPrivilegien, StoreError, StoreResult,
};

/// Hasher ohne Kosten: "klar:<passwort>"
struct KlarHasher;

impl Hasher for KlarHasher {
    fn hashen(&self, klartext: &str) -> AuthResult<String> {
        Ok(format!("klar:{klartext}"))
    }

    fn vergleichen(&self, klartext: &str, hash: &str) -> AuthResult<bool> {
        Ok(hash == format!("klar:{klartext}"))
    }
}

fn startzeit() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap()
}

fn konto(benutzername: &str) -> KontoRecord {
    let mut konto = KontoRecord::neu(
        format!("id-{benutzername}"),
        benutzername,
        format!("klar:{benutzername}-pw"),
    );
    konto.email = Some(format!("{benutzername}@example.org"));
    konto
}

struct Umgebung {
    engine: Authentifizierer,
    konten: Arc<SpeicherKonten>,
    uhr: Arc<FesteUhr>,
    codec: Arc<JwtCodec>,
}

fn umgebung_mit(konfig: AuthKonfig, konten: Vec<KontoRecord>) -> Umgebung {
    let speicher = Arc::new(SpeicherKonten::neu());
    for konto in konten {
        speicher.einfuegen(konto);
    }
    let uhr = Arc::new(FesteUhr::neu(startzeit()));
    let codec = Arc::new(JwtCodec::hs256(b"integration"));

    let engine = Authentifizierer::builder(konfig, codec.clone())
        .passwort_pruefung(Arc::new(KlarHasher))
        .konten(speicher.clone())
        .uhr(uhr.clone())
        .bauen()
        .expect("Engine konnte nicht gebaut werden");

    Umgebung {
        engine,
        konten: speicher,
        uhr,
        codec,
    }
}

fn umgebung(konten: Vec<KontoRecord>) -> Umgebung {
    umgebung_mit(AuthKonfig::default(), konten)
}

#[tokio::test]
async fn erfolgreiche_anmeldung() {
    let mut alice = konto("alice");
    alice.fehlversuche = 2;
    let u = umgebung(vec![alice]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "alice-pw"))
        .await
        .unwrap();

    assert_eq!(ergebnis.status, Status::Erfolg);
    assert_eq!(ergebnis.code, 1);
    let sitzung = ergebnis.benutzer.expect("Sitzung erwartet");
    assert_eq!(sitzung.benutzername.as_deref(), Some("alice"));
    assert_eq!(
        sitzung.token_laeuft_ab_am,
        Some(startzeit() + Duration::hours(1))
    );

    let claims = u.codec.verifizieren(&sitzung.token).unwrap();
    assert_eq!(claims.text("sub").as_deref(), Some("id-alice"));
    assert_eq!(claims.text("name").as_deref(), Some("alice"));

    // Genau ein Schreibzugriff, Zaehler zurueckgesetzt
    assert_eq!(u.konten.schreibzugriffe(), 1);
    assert_eq!(u.konten.konto("alice").unwrap().fehlversuche, 0);
}

#[tokio::test]
async fn leere_anmeldedaten_ohne_schreibzugriff() {
    let u = umgebung(vec![konto("alice")]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("", " "))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Fehlschlag);
    assert_eq!(u.konten.schreibzugriffe(), 0);
}

#[tokio::test]
async fn unbekanntes_konto() {
    let u = umgebung(vec![konto("alice")]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("mallory", "x"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::NichtGefunden);
    assert!(ergebnis.benutzer.is_none());
    assert_eq!(u.konten.schreibzugriffe(), 0);
}

#[tokio::test]
async fn falsches_passwort_erhoeht_zaehler() {
    let u = umgebung(vec![konto("alice")]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "falsch"))
        .await
        .unwrap();

    assert_eq!(ergebnis.status, Status::FalschesPasswort);
    assert!(ergebnis.benutzer.is_none());
    assert_eq!(u.konten.schreibzugriffe(), 1);
    let gespeichert = u.konten.konto("alice").unwrap();
    assert_eq!(gespeichert.fehlversuche, 1);
    assert_eq!(gespeichert.gesperrt_bis, None);
}

#[tokio::test]
async fn sperre_nach_zu_vielen_fehlversuchen() {
    let konfig = AuthKonfig {
        max_fehlversuche: 3,
        sperrdauer_minuten: 15,
        ..Default::default()
    };
    let mut alice = konto("alice");
    alice.fehlversuche = 3;
    let u = umgebung_mit(konfig, vec![alice]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "falsch"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Gesperrt);

    let gespeichert = u.konten.konto("alice").unwrap();
    assert_eq!(gespeichert.gesperrt_bis, Some(startzeit() + Duration::minutes(15)));
    assert_eq!(gespeichert.fehlversuche, 3);
    assert_eq!(u.konten.schreibzugriffe(), 1);

    // Auch mit richtigem Passwort bleibt das Konto gesperrt
    u.uhr.vorstellen(Duration::minutes(14));
    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "alice-pw"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Gesperrt);

    // Nach Ablauf der Sperre wieder moeglich
    u.uhr.vorstellen(Duration::minutes(2));
    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "alice-pw"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Erfolg);
    assert_eq!(u.konten.konto("alice").unwrap().gesperrt_bis, None);
}

#[tokio::test]
async fn nach_ablauf_der_sperre_sperrt_naechster_fehlversuch_sofort() {
    let konfig = AuthKonfig {
        max_fehlversuche: 3,
        sperrdauer_minuten: 15,
        ..Default::default()
    };
    let mut alice = konto("alice");
    alice.fehlversuche = 3;
    let u = umgebung_mit(konfig, vec![alice]);
    let falsch = Anmeldedaten::passwort("alice", "falsch");

    let ergebnis = u.engine.authentifizieren(&falsch).await.unwrap();
    assert_eq!(ergebnis.status, Status::Gesperrt);

    // Sperre abgelaufen, Zaehler steht weiter auf der Grenze
    u.uhr.vorstellen(Duration::minutes(16));
    let ergebnis = u.engine.authentifizieren(&falsch).await.unwrap();
    assert_eq!(ergebnis.status, Status::Gesperrt);

    let gespeichert = u.konten.konto("alice").unwrap();
    assert_eq!(gespeichert.fehlversuche, 3);
    assert_eq!(
        gespeichert.gesperrt_bis,
        Some(startzeit() + Duration::minutes(16) + Duration::minutes(15))
    );
    assert_eq!(u.konten.schreibzugriffe(), 2);
}

#[tokio::test]
async fn gesperrt_ist_idempotent() {
    let mut alice = konto("alice");
    alice.gesperrt_bis = Some(startzeit() + Duration::minutes(10));
    alice.fehlversuche = 1;
    let u = umgebung(vec![alice]);

    for _ in 0..2 {
        let ergebnis = u
            .engine
            .authentifizieren(&Anmeldedaten::passwort("alice", "falsch"))
            .await
            .unwrap();
        assert_eq!(ergebnis.status, Status::Gesperrt);
    }

    // Keine weiteren Fehlversuche gezaehlt
    assert_eq!(u.konten.schreibzugriffe(), 0);
    assert_eq!(u.konten.konto("alice").unwrap().fehlversuche, 1);
}

#[tokio::test]
async fn richtlinien_in_fester_reihenfolge() {
    let mut deaktiviert = konto("dora");
    deaktiviert.deaktiviert = true;
    deaktiviert.suspendiert = true;

    let mut suspendiert = konto("sven");
    suspendiert.suspendiert = true;
    suspendiert.max_passwort_alter_tage = 1;
    suspendiert.passwort_geaendert_am = Some(startzeit() - Duration::days(10));

    let mut abgelaufen = konto("paul");
    abgelaufen.max_passwort_alter_tage = 90;
    abgelaufen.passwort_geaendert_am = Some(startzeit() - Duration::days(91));

    let mut ausserhalb_zeitraum = konto("zora");
    ausserhalb_zeitraum.zugang_datum_bis = NaiveDate::from_ymd_opt(2026, 3, 9);

    let u = umgebung(vec![deaktiviert, suspendiert, abgelaufen, ausserhalb_zeitraum]);

    for (name, erwartet) in [
        ("dora", Status::Deaktiviert),
        ("sven", Status::Suspendiert),
        ("paul", Status::PasswortAbgelaufen),
        ("zora", Status::Deaktiviert),
    ] {
        let ergebnis = u
            .engine
            .authentifizieren(&Anmeldedaten::passwort(name, format!("{name}-pw")))
            .await
            .unwrap();
        assert_eq!(ergebnis.status, erwartet, "Konto {name}");
        assert!(ergebnis.benutzer.is_none());
    }

    // Richtlinien-Ablehnungen schreiben nichts
    assert_eq!(u.konten.schreibzugriffe(), 0);
}

#[tokio::test]
async fn zugangsfenster_ueber_mitternacht() {
    let konfig = AuthKonfig {
        token_ttl_sekunden: 8 * 3600,
        ..Default::default()
    };
    let mut nacht = konto("nina");
    nacht.zugang_zeit_von = NaiveTime::from_hms_opt(22, 0, 0);
    nacht.zugang_zeit_bis = NaiveTime::from_hms_opt(6, 0, 0);
    let u = umgebung_mit(konfig, vec![nacht]);
    let daten = Anmeldedaten::passwort("nina", "nina-pw");

    // 23:30: im Fenster, Token endet um 06:00
    let ergebnis = u.engine.authentifizieren(&daten).await.unwrap();
    assert_eq!(ergebnis.status, Status::Erfolg);
    assert_eq!(
        ergebnis.benutzer.unwrap().token_laeuft_ab_am,
        Some(Utc.with_ymd_and_hms(2026, 3, 11, 6, 0, 0).unwrap())
    );

    // 01:00: das Fenster beginnt erst heute um 22:00
    u.uhr.setzen(Utc.with_ymd_and_hms(2026, 3, 11, 1, 0, 0).unwrap());
    let ergebnis = u.engine.authentifizieren(&daten).await.unwrap();
    assert_eq!(ergebnis.status, Status::ZugangszeitGesperrt);
    assert!(ergebnis.benutzer.is_none());

    // 22:00: Fensterbeginn ist gueltig, Ende morgen 06:00
    u.uhr.setzen(Utc.with_ymd_and_hms(2026, 3, 11, 22, 0, 0).unwrap());
    let ergebnis = u.engine.authentifizieren(&daten).await.unwrap();
    assert_eq!(ergebnis.status, Status::Erfolg);
    assert_eq!(
        ergebnis.benutzer.unwrap().token_laeuft_ab_am,
        Some(Utc.with_ymd_and_hms(2026, 3, 12, 6, 0, 0).unwrap())
    );

    // 12:00: ausserhalb
    u.uhr.setzen(Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap());
    let ergebnis = u.engine.authentifizieren(&daten).await.unwrap();
    assert_eq!(ergebnis.status, Status::ZugangszeitGesperrt);
}

#[tokio::test]
async fn zugangsfenster_in_lokaler_zone() {
    // UTC+2: 23:30 UTC ist 01:30 lokal, ausserhalb von 08:00-18:00
    let konfig = AuthKonfig {
        zeitzone_offset_minuten: 120,
        ..Default::default()
    };
    let mut tag = konto("tim");
    tag.zugang_zeit_von = NaiveTime::from_hms_opt(8, 0, 0);
    tag.zugang_zeit_bis = NaiveTime::from_hms_opt(18, 0, 0);
    let u = umgebung_mit(konfig, vec![tag]);
    let daten = Anmeldedaten::passwort("tim", "tim-pw");

    let ergebnis = u.engine.authentifizieren(&daten).await.unwrap();
    assert_eq!(ergebnis.status, Status::ZugangszeitGesperrt);

    // 15:30 UTC = 17:30 lokal: Token endet um 18:00 lokal = 16:00 UTC
    u.uhr.setzen(Utc.with_ymd_and_hms(2026, 3, 11, 15, 30, 0).unwrap());
    let ergebnis = u.engine.authentifizieren(&daten).await.unwrap();
    assert_eq!(ergebnis.status, Status::Erfolg);
    assert_eq!(
        ergebnis.benutzer.unwrap().token_laeuft_ab_am,
        Some(Utc.with_ymd_and_hms(2026, 3, 11, 16, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn inaktives_konto_wird_reaktiviert() {
    let mut ruhend = konto("rita");
    ruhend.inaktiv = true;
    let u = umgebung(vec![ruhend]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("rita", "rita-pw"))
        .await
        .unwrap();

    assert_eq!(ergebnis.status, Status::ErfolgReaktiviert);
    assert!(ergebnis.ist_erfolg());
    assert!(!u.konten.konto("rita").unwrap().inaktiv);
    assert_eq!(u.konten.schreibzugriffe(), 1);
}

#[tokio::test]
async fn statuscodes_umbelegt() {
    let mut konfig = AuthKonfig::default();
    konfig.status_codes.fehlschlag = Some(-5);
    konfig.status_codes.gesperrt = Some(7);
    konfig.status_codes.erfolg = Some(200);
    let mut gesperrt = konto("gina");
    gesperrt.gesperrt_bis = Some(startzeit() + Duration::hours(1));
    let u = umgebung_mit(konfig, vec![gesperrt, konto("alice")]);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("gina", "gina-pw"))
        .await
        .unwrap();
    assert_eq!(ergebnis.code, 7);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "falsch"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::FalschesPasswort);
    assert_eq!(ergebnis.code, -5);

    let ergebnis = u
        .engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "alice-pw"))
        .await
        .unwrap();
    // Erfolg reaktiviert erbt den Erfolgscode
    assert_eq!(ergebnis.code, 200);
    assert_eq!(u.engine.status_codes().code(Status::ErfolgReaktiviert), 200);
}

#[tokio::test]
async fn payload_felder_und_privilegien() {
    let mut konfig = AuthKonfig::default();
    konfig.payload.email = Some(FeldAbbildung::neu("mail").entfernen());
    konfig.payload.client_ip = Some(FeldAbbildung::neu("ip"));

    let mut alice = konto("alice");
    alice.privilegien = vec!["lesen".into()];
    let speicher = Arc::new(SpeicherKonten::neu());
    speicher.einfuegen(alice);
    let privilegien = Arc::new(SpeicherPrivilegien::neu());
    privilegien.setzen("id-alice", vec!["lesen".into(), "schreiben".into()]);
    let codec = Arc::new(JwtCodec::hs256(b"integration"));

    let engine = Authentifizierer::builder(konfig, codec.clone())
        .passwort_pruefung(Arc::new(KlarHasher))
        .konten(speicher)
        .privilegien(privilegien)
        .uhr(Arc::new(FesteUhr::neu(startzeit())))
        .bauen()
        .unwrap();

    let mut daten = Anmeldedaten::passwort("alice", "alice-pw");
    daten.client_ip = Some("10.1.2.3".into());
    let ergebnis = engine.authentifizieren(&daten).await.unwrap();

    let sitzung = ergebnis.benutzer.unwrap();
    assert_eq!(sitzung.email, None, "E-Mail nur im Token");
    assert_eq!(
        sitzung.privilegien,
        Some(vec!["lesen".to_string(), "schreiben".to_string()])
    );

    let claims = codec.verifizieren(&sitzung.token).unwrap();
    assert_eq!(claims.text("mail").as_deref(), Some("alice@example.org"));
    assert_eq!(claims.text("ip").as_deref(), Some("10.1.2.3"));
}

// ---------------------------------------------------------------------------
// Eigene Pruefung
// ---------------------------------------------------------------------------

struct FesteAntwort(Status);

#[async_trait]
impl EigenePruefung for FesteAntwort {
    async fn pruefen(&self, _daten: &Anmeldedaten) -> AuthResult<Status> {
        Ok(self.0)
    }
}

struct KaputtePruefung;

#[async_trait]
impl EigenePruefung for KaputtePruefung {
    async fn pruefen(&self, _daten: &Anmeldedaten) -> AuthResult<Status> {
        Err(AuthError::EigenePruefung("Verzeichnisdienst nicht erreichbar".into()))
    }
}

struct LangsamePruefung;

#[async_trait]
impl EigenePruefung for LangsamePruefung {
    async fn pruefen(&self, _daten: &Anmeldedaten) -> AuthResult<Status> {
        tokio::time::sleep(StdDuration::from_millis(500)).await;
        Ok(Status::Erfolg)
    }
}

#[tokio::test]
async fn eigene_pruefung_ohne_kontenspeicher() {
    let codec = Arc::new(JwtCodec::hs256(b"integration"));
    let engine = Authentifizierer::builder(AuthKonfig::default(), codec.clone())
        .eigene_pruefung(Arc::new(FesteAntwort(Status::Erfolg)))
        .uhr(Arc::new(FesteUhr::neu(startzeit())))
        .bauen()
        .unwrap();

    let ergebnis = engine
        .authentifizieren(&Anmeldedaten::passwort("extern", "egal"))
        .await
        .unwrap();

    assert_eq!(ergebnis.status, Status::Erfolg);
    let sitzung = ergebnis.benutzer.unwrap();
    assert_eq!(sitzung.id, None);
    assert_eq!(sitzung.benutzername.as_deref(), Some("extern"));
    let claims = codec.verifizieren(&sitzung.token).unwrap();
    assert_eq!(claims.text("name").as_deref(), Some("extern"));
    assert_eq!(claims.text("sub"), None);
}

#[tokio::test]
async fn eigene_pruefung_ablehnung_unveraendert() {
    let speicher = Arc::new(SpeicherKonten::neu());
    speicher.einfuegen(konto("alice"));
    let engine = Authentifizierer::builder(
        AuthKonfig::default(),
        Arc::new(JwtCodec::hs256(b"integration")),
    )
    .eigene_pruefung(Arc::new(FesteAntwort(Status::Suspendiert)))
    .konten(speicher.clone())
    .bauen()
    .unwrap();

    let ergebnis = engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "egal"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Suspendiert);
    assert_eq!(speicher.schreibzugriffe(), 0);
}

#[tokio::test]
async fn eigene_pruefung_und_kontorichtlinien_gelten_beide() {
    // Bewusste Doppelpruefung: eigene Pruefung erfolgreich, Konto trotzdem deaktiviert
    let mut dora = konto("dora");
    dora.deaktiviert = true;
    let speicher = Arc::new(SpeicherKonten::neu());
    speicher.einfuegen(dora);
    speicher.einfuegen(konto("alice"));

    let engine = Authentifizierer::builder(
        AuthKonfig::default(),
        Arc::new(JwtCodec::hs256(b"integration")),
    )
    .eigene_pruefung(Arc::new(FesteAntwort(Status::Erfolg)))
    .konten(speicher.clone())
    .uhr(Arc::new(FesteUhr::neu(startzeit())))
    .bauen()
    .unwrap();

    let ergebnis = engine
        .authentifizieren(&Anmeldedaten::passwort("dora", "beliebig"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Deaktiviert);

    // Passwort wird bei eigener Pruefung nicht verglichen
    let ergebnis = engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "beliebig"))
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Erfolg);
    assert_eq!(speicher.schreibzugriffe(), 1);
}

#[tokio::test]
async fn fehler_der_eigenen_pruefung_wird_durchgereicht() {
    let engine = Authentifizierer::builder(
        AuthKonfig::default(),
        Arc::new(JwtCodec::hs256(b"integration")),
    )
    .eigene_pruefung(Arc::new(KaputtePruefung))
    .bauen()
    .unwrap();

    let fehler = engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "x"))
        .await
        .unwrap_err();
    assert!(matches!(fehler, AuthError::EigenePruefung(_)));
    assert_eq!(engine.fehler_ergebnis(&fehler).status, Status::Fehler);
}

#[tokio::test]
async fn zeitlimit_bricht_anmeldung_ab() {
    let engine = Authentifizierer::builder(
        AuthKonfig::default(),
        Arc::new(JwtCodec::hs256(b"integration")),
    )
    .eigene_pruefung(Arc::new(LangsamePruefung))
    .bauen()
    .unwrap();

    let ergebnis = engine
        .authentifizieren_mit_zeitlimit(
            &Anmeldedaten::passwort("alice", "x"),
            StdDuration::from_millis(20),
        )
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Zeitlimit);
    assert_eq!(ergebnis.code, -1);

    let ergebnis = engine
        .authentifizieren_mit_zeitlimit(
            &Anmeldedaten::passwort("alice", "x"),
            StdDuration::from_secs(5),
        )
        .await
        .unwrap();
    assert_eq!(ergebnis.status, Status::Erfolg);
}

// ---------------------------------------------------------------------------
// Kollaborateur-Fehler
// ---------------------------------------------------------------------------

struct KaputteKonten;

#[async_trait]
impl KontoRepository for KaputteKonten {
    async fn konto_laden(&self, _benutzername: &str) -> StoreResult<Option<KontoRecord>> {
        Err(StoreError::backend("Verbindung verloren"))
    }

    async fn erfolg_vermerken(&self, _id: &str, _war_inaktiv: bool) -> StoreResult<()> {
        Err(StoreError::backend("Verbindung verloren"))
    }

    async fn fehlschlag_vermerken(
        &self,
        _id: &str,
        _fehlversuche: u32,
        _gesperrt_bis: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        Err(StoreError::backend("Verbindung verloren"))
    }
}

#[tokio::test]
async fn speicherfehler_wird_durchgereicht() {
    let engine = Authentifizierer::builder(
        AuthKonfig::default(),
        Arc::new(JwtCodec::hs256(b"integration")),
    )
    .passwort_pruefung(Arc::new(KlarHasher))
    .konten(Arc::new(KaputteKonten))
    .bauen()
    .unwrap();

    let ergebnis = engine
        .authentifizieren(&Anmeldedaten::passwort("alice", "alice-pw"))
        .await;
    assert!(matches!(ergebnis, Err(AuthError::Speicher(_))));
}

#[tokio::test]
async fn gleichzeitige_anmeldungen() {
    let u = umgebung(vec![konto("alice"), konto("bob")]);
    let engine = Arc::new(u.engine);

    let mut handles = Vec::new();
    for name in ["alice", "bob", "alice", "bob"] {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .authentifizieren(&Anmeldedaten::passwort(name, format!("{name}-pw")))
                .await
        }));
    }
    for handle in handles {
        let ergebnis = handle.await.unwrap().unwrap();
        assert_eq!(ergebnis.status, Status::Erfolg);
    }
    assert_eq!(u.konten.schreibzugriffe(), 4);
    assert_eq!(u.uhr.jetzt(), startzeit());
}
