//! Shared test infrastructure: fake home directories populated with
//! browser history databases in each browser's real schema.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use eduhistory::history::locator::{HomeLocator, HostOs};

/// Unix seconds of 2023-05-01T00:00:00Z.
pub const MAY_2023: i64 = 1_682_899_200;

pub struct FakeHome {
    pub dir: TempDir,
    pub os: HostOs,
}

impl FakeHome {
    pub fn new(os: HostOs) -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            os,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn locator(&self) -> HomeLocator {
        HomeLocator::new(self.path(), self.os)
    }

    pub fn scratch(&self) -> PathBuf {
        self.path().join("scratch")
    }

    fn db_path(&self, relative: &str) -> PathBuf {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
        path
    }

    /// Chrome-schema `urls` table; `unix_secs` are converted to the
    /// 1601-based microsecond encoding.
    pub fn add_chromium(&self, relative: &str, visits: &[(&str, i64)]) -> PathBuf {
        let path = self.db_path(relative);
        let conn = Connection::open(&path).expect("conn");
        conn.execute(
            "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
             visit_count INTEGER DEFAULT 0, last_visit_time INTEGER NOT NULL)",
            [],
        )
        .expect("create urls");
        for (url, unix_secs) in visits {
            conn.execute(
                "INSERT INTO urls (url, title, last_visit_time) VALUES (?1, '', ?2)",
                (url, (unix_secs + 11_644_473_600) * 1_000_000),
            )
            .expect("insert url");
        }
        path
    }

    pub fn add_chrome(&self, visits: &[(&str, i64)]) -> PathBuf {
        let relative = match self.os {
            HostOs::MacOs => "Library/Application Support/Google/Chrome/Default/History",
            _ => ".config/google-chrome/Default/History",
        };
        self.add_chromium(relative, visits)
    }

    pub fn add_brave(&self, visits: &[(&str, i64)]) -> PathBuf {
        let relative = match self.os {
            HostOs::MacOs => {
                "Library/Application Support/BraveSoftware/Brave-Browser/Default/History"
            }
            _ => ".config/BraveSoftware/Brave-Browser/Default/History",
        };
        self.add_chromium(relative, visits)
    }

    /// One Firefox profile directory with a `places.sqlite`.
    pub fn add_firefox_profile(&self, profile: &str, visits: &[(&str, i64)]) -> PathBuf {
        let root = match self.os {
            HostOs::MacOs => "Library/Application Support/Firefox/Profiles",
            _ => ".mozilla/firefox",
        };
        let path = self.db_path(&format!("{root}/{profile}/places.sqlite"));
        let conn = Connection::open(&path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR);
             CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, place_id INTEGER, visit_date INTEGER, visit_type INTEGER);",
        )
        .expect("schema");
        for (idx, (url, unix_secs)) in visits.iter().enumerate() {
            let id = idx as i64 + 1;
            conn.execute("INSERT INTO moz_places (id, url) VALUES (?1, ?2)", (id, url))
                .expect("insert place");
            conn.execute(
                "INSERT INTO moz_historyvisits (place_id, visit_date, visit_type) VALUES (?1, ?2, 1)",
                (id, unix_secs * 1_000_000),
            )
            .expect("insert visit");
        }
        path
    }

    /// Safari `History.db` (macOS layout only).
    pub fn add_safari(&self, visits: &[(&str, f64)]) -> PathBuf {
        let path = self.db_path("Library/Safari/History.db");
        let conn = Connection::open(&path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE history_items (id INTEGER PRIMARY KEY, url TEXT NOT NULL UNIQUE);
             CREATE TABLE history_visits (id INTEGER PRIMARY KEY, history_item INTEGER NOT NULL, visit_time REAL NOT NULL);",
        )
        .expect("schema");
        for (idx, (url, unix_secs)) in visits.iter().enumerate() {
            let id = idx as i64 + 1;
            conn.execute("INSERT INTO history_items (id, url) VALUES (?1, ?2)", (id, url))
                .expect("insert item");
            conn.execute(
                "INSERT INTO history_visits (history_item, visit_time) VALUES (?1, ?2)",
                (id, unix_secs - 978_307_200.0),
            )
            .expect("insert visit");
        }
        path
    }
}

/// Number of entries left in a scratch directory (0 if it does not exist).
pub fn scratch_entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
