//! # URL Normalizer
//!
//! Splits a visited URL into the components the similarity scorer compares
//! and attaches its [`Category`].
//!
//! Query strings are dropped unless the caller asks for private mode; a
//! public record therefore never carries `query`, `fragment` or
//! `query_params`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::classify::{self, Category};
use crate::title::{self, NoTitleFetcher, TitleFetcher};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedUrl {
    pub scheme: String,
    pub subdomain: String,
    pub domain: String,
    /// Public suffix, e.g. `co.uk`.
    pub tld: String,
    pub netloc: String,
    pub path: String,
    pub classification: Category,
    /// Raw query string; private mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Raw fragment; private mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    /// Decoded query; private mode only, and only when a query exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A URL that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUrl {
    pub error: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlRecord {
    Normalized(NormalizedUrl),
    Failed(FailedUrl),
}

impl UrlRecord {
    pub fn as_normalized(&self) -> Option<&NormalizedUrl> {
        match self {
            UrlRecord::Normalized(n) => Some(n),
            UrlRecord::Failed(_) => None,
        }
    }

    pub fn into_normalized(self) -> Option<NormalizedUrl> {
        match self {
            UrlRecord::Normalized(n) => Some(n),
            UrlRecord::Failed(_) => None,
        }
    }
}

pub fn normalize(url: &str, private: bool) -> UrlRecord {
    normalize_with_titles(url, private, &NoTitleFetcher)
}

pub fn normalize_with_titles(url: &str, private: bool, titles: &dyn TitleFetcher) -> UrlRecord {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => {
            return UrlRecord::Failed(FailedUrl {
                error: err.to_string(),
                url: url.to_string(),
            });
        }
    };

    let (subdomain, domain, tld) = match parsed.host() {
        Some(Host::Domain(host)) => split_host(host),
        Some(Host::Ipv4(addr)) => (String::new(), addr.to_string(), String::new()),
        Some(Host::Ipv6(addr)) => (String::new(), format!("[{addr}]"), String::new()),
        None => (String::new(), String::new(), String::new()),
    };
    let classification = classify::classify_url(url);

    let (query, fragment, query_params) = if private {
        let query = parsed.query().unwrap_or_default().to_string();
        let params = (!query.is_empty()).then(|| query_params(&parsed));
        (
            Some(query),
            Some(parsed.fragment().unwrap_or_default().to_string()),
            params,
        )
    } else {
        (None, None, None)
    };

    let title = if classification.is_educational() {
        titles.fetch_title(url).map(|t| title::clean_title(&t))
    } else {
        None
    };

    UrlRecord::Normalized(NormalizedUrl {
        scheme: parsed.scheme().to_string(),
        subdomain,
        domain,
        tld,
        netloc: classify::netloc_of(&parsed),
        path: written_path(url, &parsed),
        classification,
        query,
        fragment,
        query_params,
        title,
    })
}

/// The path as written. Hierarchical URLs always report at least `/`, so a
/// bare authority such as `https://dblp.org` or `https://dblp.org?q=1` maps
/// back to an empty path.
fn written_path(raw: &str, parsed: &Url) -> String {
    let path = parsed.path();
    if path != "/" || !parsed.has_host() {
        return path.to_string();
    }
    let after_scheme = raw
        .trim()
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    match after_scheme.find(['/', '\\', '?', '#']) {
        Some(idx) if matches!(after_scheme.as_bytes()[idx], b'/' | b'\\') => path.to_string(),
        _ => String::new(),
    }
}

/// Blank values are dropped; repeated keys keep their values in order.
fn query_params(url: &Url) -> BTreeMap<String, Vec<String>> {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}

/// Split a host into `(subdomain, registrable label, public suffix)` using
/// the public suffix list. Hosts under an unlisted suffix keep an empty
/// suffix and use their last label as the domain.
pub fn split_host(host: &str) -> (String, String, String) {
    let host = host.trim_end_matches('.').to_lowercase();
    let suffix = psl::suffix(host.as_bytes())
        .filter(|s| s.is_known())
        .and_then(|s| std::str::from_utf8(s.as_bytes()).ok())
        .map(str::to_string)
        .unwrap_or_default();

    if !suffix.is_empty() && suffix == host {
        return (String::new(), String::new(), suffix);
    }

    let rest = if suffix.is_empty() {
        host.as_str()
    } else {
        host.strip_suffix(&suffix)
            .and_then(|r| r.strip_suffix('.'))
            .unwrap_or(host.as_str())
    };
    let (subdomain, domain) = match rest.rsplit_once('.') {
        Some((sub, domain)) => (sub.to_string(), domain.to_string()),
        None => (String::new(), rest.to_string()),
    };
    (subdomain, domain, suffix)
}
