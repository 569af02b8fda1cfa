//! # History Module
//!
//! Best-effort extraction of visit records from the local Safari, Chrome,
//! Firefox and Brave history databases.
//!
//! Every browser is read from a scratch copy of its database (see
//! [`snapshot`]). A browser that is missing, unsupported on this OS or whose
//! database cannot be read yields an [`ExtractError`] for that browser only;
//! [`HistoryExtractor::aggregate`] logs it and carries on with the others.

pub mod locator;
pub mod snapshot;
pub mod sqlite_db;
pub mod timestamp;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use locator::{StorageLocation, StorageLocator};
use snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Safari,
    Chrome,
    Firefox,
    Brave,
}

impl Browser {
    /// Fixed aggregation order.
    pub const ALL: [Browser; 4] = [
        Browser::Safari,
        Browser::Chrome,
        Browser::Firefox,
        Browser::Brave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Safari => "safari",
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Brave => "brave",
        }
    }

    /// File name of this browser's scratch copy. Distinct per browser so
    /// concurrent extractors never share a snapshot path.
    fn snapshot_name(&self) -> &'static str {
        match self {
            Browser::Safari => "Safari_History.db",
            Browser::Chrome => "Chrome_History",
            Browser::Firefox => "Firefox_places.sqlite",
            Browser::Brave => "Brave_History",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRecord {
    pub url: String,
    pub visit_time: DateTime<Utc>,
    pub browser: Browser,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{browser} history unavailable: {reason}")]
    SourceUnavailable { browser: Browser, reason: String },
    #[error("{browser} snapshot of {} failed: {source}", path.display())]
    Snapshot {
        browser: Browser,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{browser} history query failed: {source}")]
    Query {
        browser: Browser,
        #[source]
        source: rusqlite::Error,
    },
}

/// Outcome of one browser's extraction.
#[derive(Debug)]
pub struct SourceResult {
    pub browser: Browser,
    pub result: Result<Vec<VisitRecord>, ExtractError>,
}

pub struct HistoryExtractor<L: StorageLocator> {
    locator: L,
    scratch_dir: PathBuf,
}

impl<L: StorageLocator> HistoryExtractor<L> {
    pub fn new(locator: L, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            locator,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Extract one browser's visits, most recent first.
    pub fn extract(&self, browser: Browser) -> Result<Vec<VisitRecord>, ExtractError> {
        let location =
            self.locator
                .locate(browser)
                .ok_or_else(|| ExtractError::SourceUnavailable {
                    browser,
                    reason: format!("no known storage on {}", std::env::consts::OS),
                })?;
        if !location.path().exists() {
            return Err(ExtractError::SourceUnavailable {
                browser,
                reason: format!("{} not found", location.path().display()),
            });
        }

        match location {
            StorageLocation::Database(db) => self.extract_database(browser, &db),
            StorageLocation::ProfileRoot(root) => self.extract_profiles(browser, &root),
        }
    }

    fn extract_database(
        &self,
        browser: Browser,
        db: &Path,
    ) -> Result<Vec<VisitRecord>, ExtractError> {
        let snapshot = Snapshot::take(db, &self.scratch_dir, browser.snapshot_name()).map_err(
            |source| ExtractError::Snapshot {
                browser,
                path: db.to_path_buf(),
                source,
            },
        )?;
        let rows = snapshot
            .open()
            .and_then(|conn| sqlite_db::read_visits(&conn, browser))
            .map_err(|source| ExtractError::Query { browser, source })?;
        if rows.skipped > 0 {
            warn!("{browser}: skipped {} unreadable visit rows", rows.skipped);
        }
        Ok(rows.records)
    }

    /// Firefox keeps one `places.sqlite` per profile directory; profiles are
    /// read in name order and concatenated. An unreadable profile is logged
    /// and skipped; only an unreadable profile root fails the browser.
    fn extract_profiles(
        &self,
        browser: Browser,
        root: &Path,
    ) -> Result<Vec<VisitRecord>, ExtractError> {
        let entries = std::fs::read_dir(root).map_err(|source| ExtractError::Snapshot {
            browser,
            path: root.to_path_buf(),
            source,
        })?;
        let mut profiles: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        profiles.sort();

        let mut out = Vec::new();
        for profile in profiles {
            let places = profile.join("places.sqlite");
            if !places.exists() {
                continue;
            }
            debug!("{browser}: reading profile {}", profile.display());
            match self.extract_database(browser, &places) {
                Ok(records) => out.extend(records),
                Err(err) => warn!("skipping profile {}: {err}", profile.display()),
            }
        }
        Ok(out)
    }

    /// Run every extractor and report each outcome, in [`Browser::ALL`] order.
    ///
    /// Extractors run on separate threads; each owns its own snapshot path.
    pub fn extract_all(&self) -> Vec<SourceResult> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = Browser::ALL
                .into_iter()
                .map(|browser| (browser, scope.spawn(move || self.extract(browser))))
                .collect();
            handles
                .into_iter()
                .map(|(browser, handle)| SourceResult {
                    browser,
                    result: handle.join().unwrap_or_else(|_| {
                        Err(ExtractError::SourceUnavailable {
                            browser,
                            reason: "extractor thread panicked".to_string(),
                        })
                    }),
                })
                .collect()
        })
    }

    /// Concatenate all available sources in fixed order; failed sources are
    /// logged and contribute nothing.
    pub fn aggregate(&self) -> Vec<VisitRecord> {
        let mut combined = Vec::new();
        for SourceResult { browser, result } in self.extract_all() {
            match result {
                Ok(records) => {
                    info!("{browser} history: {} items", records.len());
                    combined.extend(records);
                }
                Err(err) => {
                    warn!("{err}");
                    info!("{browser} history: 0 items");
                }
            }
        }
        combined
    }
}
