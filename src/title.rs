//! Page-title lookup boundary.
//!
//! Fetching titles needs the network and is not done by this crate; callers
//! that have a fetcher plug it in through [`TitleFetcher`].

pub trait TitleFetcher: Send + Sync {
    /// Title of the page at `url`, or `None` on any failure.
    fn fetch_title(&self, url: &str) -> Option<String>;
}

/// Never returns a title.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTitleFetcher;

impl TitleFetcher for NoTitleFetcher {
    fn fetch_title(&self, _url: &str) -> Option<String> {
        None
    }
}

/// Drop `\n`, `\r` and `\t`, then collapse runs of whitespace.
pub fn clean_title(title: &str) -> String {
    title
        .replace(['\n', '\r', '\t'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
