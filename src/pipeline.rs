//! # Pipeline Module
//!
//! The `collect` run: extract every browser's history, normalize and
//! classify each visit, keep the educational web visits, and write the
//! public (and optionally private) output files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::classify::papers;
use crate::config::Config;
use crate::history::HistoryExtractor;
use crate::history::locator::StorageLocator;
use crate::normalize::{self, NormalizedUrl, UrlRecord};
use crate::output::{self, json};
use crate::privacy;
use crate::schedule;
use crate::title::TitleFetcher;
use crate::util;

pub const ENCRYPTED_HISTORY_FILE: &str = "browser_history_enc.json";
pub const CLEAR_HISTORY_FILE: &str = "browser_history_clear.json";
pub const PAPERS_FILE: &str = "paper_stats.json";
pub const PRIVATE_HISTORY_FILE: &str = "browser_history_private.json";

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub output_dir: PathBuf,
    pub private: bool,
    pub force: bool,
}

/// Counts from one collect run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub visits: usize,
    pub failed: usize,
    pub educational: usize,
    pub papers: usize,
    pub files: Vec<PathBuf>,
}

/// Run `collect`. Returns `None` when the run interval has not elapsed.
pub fn run_collect<L: StorageLocator>(
    cfg: &Config,
    locator: L,
    titles: &dyn TitleFetcher,
    opts: &CollectOptions,
    now: DateTime<Utc>,
) -> Result<Option<CollectSummary>> {
    if !opts.force {
        let due = schedule::should_run(&cfg.state_dir(), &cfg.api_name, cfg.interval_secs, now)
            .context("checking run interval")?;
        if !due {
            info!("skipping {}, not enough time has passed", cfg.api_name);
            return Ok(None);
        }
    }

    util::ensure_output_dir(&opts.output_dir)?;

    let extractor = HistoryExtractor::new(locator, cfg.scratch_dir());
    let visits = extractor.aggregate();
    info!("collected {} visits", visits.len());

    let mut summary = CollectSummary {
        visits: visits.len(),
        ..CollectSummary::default()
    };
    let mut educational = Vec::new();
    for visit in &visits {
        match normalize::normalize_with_titles(&visit.url, opts.private, titles) {
            UrlRecord::Normalized(record) => {
                if is_educational_web_visit(&record) {
                    educational.push(record);
                }
            }
            UrlRecord::Failed(failed) => {
                debug!("skipping {}: {}", failed.url, failed.error);
                summary.failed += 1;
            }
        }
    }
    if summary.failed > 0 {
        warn!("{} visited urls could not be parsed", summary.failed);
    }
    summary.educational = educational.len();

    let paper_list = papers::paper_stats(&educational);
    summary.papers = paper_list.len();

    let netlocs: Vec<&str> = educational.iter().map(|r| r.netloc.as_str()).collect();
    let hashed: Vec<String> = netlocs
        .iter()
        .filter_map(|netloc| privacy::hash_domain(netloc))
        .collect();

    summary.files.push(write(
        &opts.output_dir,
        ENCRYPTED_HISTORY_FILE,
        output::HISTORY_LABEL,
        &hashed,
        now,
    )?);
    if cfg.allow_top {
        summary.files.push(write(
            &opts.output_dir,
            CLEAR_HISTORY_FILE,
            output::HISTORY_LABEL,
            &netlocs,
            now,
        )?);
        summary.files.push(write(
            &opts.output_dir,
            PAPERS_FILE,
            output::PAPERS_LABEL,
            &paper_list,
            now,
        )?);
    }
    if opts.private {
        if util::is_world_readable(&opts.output_dir)? {
            warn!(
                "output directory is world-readable; private history may be exposed: {}",
                opts.output_dir.display()
            );
        }
        summary.files.push(write(
            &opts.output_dir,
            PRIVATE_HISTORY_FILE,
            output::HISTORY_LABEL,
            &educational,
            now,
        )?);
    }

    info!(
        "collect finished: visits={} educational={} papers={} failed={}",
        summary.visits, summary.educational, summary.papers, summary.failed
    );
    Ok(Some(summary))
}

/// Educational, and fetched over http(s).
pub fn is_educational_web_visit(record: &NormalizedUrl) -> bool {
    record.classification.is_educational()
        && matches!(record.scheme.to_lowercase().as_str(), "http" | "https")
}

fn write<T: serde::Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    label: &str,
    collection: &T,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = dir.join(name);
    json::write_envelope(&path, label, collection, now)
        .with_context(|| format!("writing {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> NormalizedUrl {
        normalize::normalize(url, false)
            .into_normalized()
            .expect("record")
    }

    #[test]
    fn keeps_only_educational_http_visits() {
        assert!(is_educational_web_visit(&record("https://arxiv.org/abs/1")));
        assert!(is_educational_web_visit(&record("http://web.mit.edu/")));
        assert!(!is_educational_web_visit(&record("https://news.ycombinator.com/")));
        // Research by empty host, but not a web visit.
        assert!(!is_educational_web_visit(&record("file:///tmp/research/x")));
    }
}
