//! Paper statistics over already-filtered records.

use crate::normalize::NormalizedUrl;

pub const PAPER_HOSTS: &[&str] = &[
    "arxiv.org",
    "ieee.org",
    "acm.org",
    "neurips.cc",
    "icml.cc",
    "iclr.cc",
    "aaai.org",
    "ijcai.org",
    "usenix.org",
    "aclweb.org",
    "openreview.net",
    "dl.acm.org",
    "computer.org",
    "semantic.scholar.org",
    "dblp.org",
    "researchgate.net",
];

/// Path fragments that mark listing or profile pages on generic paper
/// hosts. `/` is part of the list, so only path-less URLs pass there.
pub const NON_PAPER_PATH_PARTS: &[&str] = &[
    "search",
    "profile",
    "citations",
    "author",
    "browse",
    "/",
    "index",
];

/// Whether a record on a paper host points at a paper.
pub fn is_paper(host: &str, path: &str) -> bool {
    let path = path.to_lowercase();
    match host {
        "arxiv.org" => path.starts_with("/pdf/"),
        "researchgate.net" => path.starts_with("/publication/"),
        _ => !NON_PAPER_PATH_PARTS.iter().any(|part| path.contains(part)),
    }
}

/// `host + path` for every record that points at a paper on a known host.
pub fn paper_stats(records: &[NormalizedUrl]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| {
            let host = record
                .netloc
                .strip_prefix("www.")
                .unwrap_or(&record.netloc);
            (PAPER_HOSTS.contains(&host) && is_paper(host, &record.path))
                .then(|| format!("{host}{}", record.path))
        })
        .collect()
}
