//! Per-OS storage path resolution.

use std::path::{Path, PathBuf};

use crate::history::Browser;

/// Operating systems with known browser storage layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        }
    }
}

/// Where a browser keeps its history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A single SQLite database file.
    Database(PathBuf),
    /// A directory holding one sub-directory per profile, each with its own
    /// `places.sqlite`.
    ProfileRoot(PathBuf),
}

impl StorageLocation {
    pub fn path(&self) -> &Path {
        match self {
            StorageLocation::Database(p) | StorageLocation::ProfileRoot(p) => p,
        }
    }
}

pub trait StorageLocator: Send + Sync {
    /// `None` means the browser has no known storage on this OS.
    fn locate(&self, browser: Browser) -> Option<StorageLocation>;
}

/// Resolves paths relative to a home directory for a given OS.
#[derive(Debug, Clone)]
pub struct HomeLocator {
    home: PathBuf,
    os: HostOs,
}

impl HomeLocator {
    pub fn new(home: impl Into<PathBuf>, os: HostOs) -> Self {
        Self {
            home: home.into(),
            os,
        }
    }

    /// Locator for the current user on the current OS; `None` when no home
    /// directory can be determined.
    pub fn system() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home, HostOs::current()))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

impl StorageLocator for HomeLocator {
    fn locate(&self, browser: Browser) -> Option<StorageLocation> {
        let relative = match (self.os, browser) {
            (HostOs::MacOs, Browser::Safari) => "Library/Safari/History.db",
            (HostOs::MacOs, Browser::Chrome) => {
                "Library/Application Support/Google/Chrome/Default/History"
            }
            (HostOs::Linux, Browser::Chrome) => ".config/google-chrome/Default/History",
            (HostOs::MacOs, Browser::Firefox) => "Library/Application Support/Firefox/Profiles",
            (HostOs::Linux, Browser::Firefox) => ".mozilla/firefox",
            (HostOs::MacOs, Browser::Brave) => {
                "Library/Application Support/BraveSoftware/Brave-Browser/Default/History"
            }
            (HostOs::Linux, Browser::Brave) => ".config/BraveSoftware/Brave-Browser/Default/History",
            _ => return None,
        };
        let path = self.home.join(relative);
        Some(match browser {
            Browser::Firefox => StorageLocation::ProfileRoot(path),
            _ => StorageLocation::Database(path),
        })
    }
}
