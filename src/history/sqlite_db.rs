use rusqlite::{Connection, Row};
use tracing::warn;

use crate::history::timestamp::{self, TimestampError};
use crate::history::{Browser, VisitRecord};

const SAFARI_VISITS: &str = "SELECT history_items.url, history_visits.visit_time \
     FROM history_visits JOIN history_items ON history_items.id = history_visits.history_item \
     ORDER BY visit_time DESC";

const CHROMIUM_VISITS: &str = "SELECT urls.url, urls.last_visit_time FROM urls \
     ORDER BY last_visit_time DESC";

const FIREFOX_VISITS: &str = "SELECT moz_places.url, moz_historyvisits.visit_date \
     FROM moz_places JOIN moz_historyvisits ON moz_places.id = moz_historyvisits.place_id \
     ORDER BY visit_date DESC";

/// Rows read from one history database.
#[derive(Debug, Default)]
pub struct VisitRows {
    pub records: Vec<VisitRecord>,
    /// Rows with a NULL url/time or a time outside the representable range.
    pub skipped: usize,
}

/// Read every visit in the database's native (most recent first) order.
pub fn read_visits(conn: &Connection, browser: Browser) -> rusqlite::Result<VisitRows> {
    let sql = match browser {
        Browser::Safari => SAFARI_VISITS,
        Browser::Chrome | Browser::Brave => CHROMIUM_VISITS,
        Browser::Firefox => FIREFOX_VISITS,
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| decode_row(row, browser))?;

    let mut out = VisitRows::default();
    for row in rows {
        match row? {
            Some((url, Ok(visit_time))) => out.records.push(VisitRecord {
                url,
                visit_time,
                browser,
            }),
            Some((url, Err(err))) => {
                warn!("dropping visit to {url}: {err}");
                out.skipped += 1;
            }
            None => out.skipped += 1,
        }
    }
    Ok(out)
}

type DecodedRow = Option<(
    String,
    Result<chrono::DateTime<chrono::Utc>, TimestampError>,
)>;

fn decode_row(row: &Row<'_>, browser: Browser) -> rusqlite::Result<DecodedRow> {
    let url: Option<String> = row.get(0)?;
    let Some(url) = url else {
        return Ok(None);
    };
    let decoded = match browser {
        Browser::Safari => {
            let seconds: Option<f64> = row.get(1)?;
            seconds.map(timestamp::decode_safari_seconds)
        }
        _ => {
            let raw: Option<i64> = row.get(1)?;
            raw.map(|raw| timestamp::decode(browser, raw))
        }
    };
    Ok(decoded.map(|time| (url, time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_chrome_urls_most_recent_first() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History");
        let conn = Connection::open(&path).expect("conn");
        conn.execute(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT, title TEXT, last_visit_time INTEGER)",
            [],
        )
        .expect("create");
        for (url, time) in [
            ("https://old.example.com", 13_300_000_000_000_000i64),
            ("https://new.example.com", 13_320_000_000_000_000i64),
        ] {
            conn.execute(
                "INSERT INTO urls (url, title, last_visit_time) VALUES (?1, 'x', ?2)",
                (url, time),
            )
            .expect("insert");
        }

        let rows = read_visits(&conn, Browser::Chrome).expect("visits");
        assert_eq!(rows.skipped, 0);
        let urls: Vec<_> = rows.records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["https://new.example.com", "https://old.example.com"]);
        assert!(rows.records.iter().all(|r| r.browser == Browser::Chrome));
    }

    #[test]
    fn reads_safari_real_visit_times() {
        let dir = tempdir().expect("tempdir");
        let conn = Connection::open(dir.path().join("History.db")).expect("conn");
        conn.execute_batch(
            "CREATE TABLE history_items (id INTEGER PRIMARY KEY, url TEXT);
             CREATE TABLE history_visits (id INTEGER PRIMARY KEY, history_item INTEGER, visit_time REAL);
             INSERT INTO history_items (id, url) VALUES (1, 'https://www.coursera.org/learn/ml');
             INSERT INTO history_visits (history_item, visit_time) VALUES (1, 704592000.5);",
        )
        .expect("schema");

        let rows = read_visits(&conn, Browser::Safari).expect("visits");
        assert_eq!(rows.records.len(), 1);
        assert_eq!(rows.records[0].visit_time.timestamp(), 1_682_899_200);
    }

    #[test]
    fn skips_null_and_overflowing_rows() {
        let dir = tempdir().expect("tempdir");
        let conn = Connection::open(dir.path().join("places.sqlite")).expect("conn");
        conn.execute_batch(
            "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT);
             CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, place_id INTEGER, visit_date INTEGER);
             INSERT INTO moz_places (id, url) VALUES (1, 'https://a.example'), (2, NULL), (3, 'https://c.example');
             INSERT INTO moz_historyvisits (place_id, visit_date) VALUES
                 (1, 1700000000000000), (2, 1700000000000000), (3, NULL), (1, 9223372036854775807);",
        )
        .expect("schema");

        let rows = read_visits(&conn, Browser::Firefox).expect("visits");
        assert_eq!(rows.records.len(), 1);
        assert_eq!(rows.records[0].url, "https://a.example");
        assert_eq!(rows.skipped, 3);
    }

    #[test]
    fn missing_tables_are_a_query_error() {
        let dir = tempdir().expect("tempdir");
        let conn = Connection::open(dir.path().join("empty.sqlite")).expect("conn");
        assert!(read_visits(&conn, Browser::Brave).is_err());
    }
}
