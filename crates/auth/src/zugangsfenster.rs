//! Zugangsfenster: Datums- und Tageszeitbereiche eines Kontos
//!
//! Reine Funktionen ohne I/O. Alle Vergleiche laufen in der lokalen Zone von
//! `jetzt`; ein `DateTime<FixedOffset>` legt diese Zone fest.
//!
//! - Datumsfenster: `bis` schliesst den ganzen Kalendertag ein (`bis + 24h`).
//! - Tageszeitfenster: `bis <= von` bedeutet ein Fenster ueber Mitternacht,
//!   `bis` wird dann um 24h verschoben. Das Fenster beginnt immer heute um
//!   `von`; vor `von` ist der Zugang gesperrt. Beide Grenzen zaehlen als gueltig.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Prueft ob `jetzt` im Datumsfenster `[von, bis + 24h)` liegt
pub fn datum_fenster_gueltig(
    von: Option<NaiveDate>,
    bis: Option<NaiveDate>,
    jetzt: &DateTime<FixedOffset>,
) -> bool {
    let lokal = jetzt.naive_local();
    let nach_beginn = von.map_or(true, |v| v.and_time(NaiveTime::MIN) <= lokal);
    let vor_ende = bis.map_or(true, |b| b.and_time(NaiveTime::MIN) + Duration::hours(24) > lokal);
    nach_beginn && vor_ende
}

/// Prueft ob `jetzt` im Tageszeitfenster `[von, bis]` liegt
pub fn tageszeit_gueltig(
    von: Option<NaiveTime>,
    bis: Option<NaiveTime>,
    jetzt: &DateTime<FixedOffset>,
) -> bool {
    let lokal = jetzt.naive_local();
    let heute = lokal.date();
    match (von, bis) {
        (None, None) => true,
        (Some(v), None) => heute.and_time(v) <= lokal,
        (None, Some(b)) => lokal <= heute.and_time(b),
        (Some(v), Some(b)) => {
            let (beginn, ende) = tagesfenster(v, b, lokal);
            beginn <= lokal && lokal <= ende
        }
    }
}

/// Berechnet Ablaufzeitpunkt und effektive Lebensdauer eines Tokens
///
/// Ohne vollstaendiges Tageszeitfenster gilt `jetzt + ttl`. Sonst endet das
/// Token spaetestens am Fensterende.
pub fn token_ablauf_begrenzen(
    von: Option<NaiveTime>,
    bis: Option<NaiveTime>,
    ttl: Duration,
    jetzt: &DateTime<FixedOffset>,
) -> (DateTime<FixedOffset>, Duration) {
    let (Some(v), Some(b)) = (von, bis) else {
        return (*jetzt + ttl, ttl);
    };

    let lokal = jetzt.naive_local();
    let (_, ende) = tagesfenster(v, b, lokal);
    let rest = (ende - lokal).max(Duration::zero());

    if rest < ttl {
        (*jetzt + rest, rest)
    } else {
        (*jetzt + ttl, ttl)
    }
}

/// Fenster des heutigen Tages; bei `bis <= von` endet es morgen
fn tagesfenster(von: NaiveTime, bis: NaiveTime, lokal: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let heute = lokal.date();
    let beginn = heute.and_time(von);
    let ende = heute.and_time(bis);

    if bis > von {
        (beginn, ende)
    } else {
        (beginn, ende + Duration::days(1))
    }
}
