use sha2::{Digest, Sha256};
use url::Url;

/// One-way identifier for a bare domain.
///
/// The input is lower-cased and trimmed; a full URL is reduced to its host;
/// a leading `www.` and trailing dots are removed before hashing, so
/// `https://WWW.Example.com./x` and `example.com` hash the same.
pub fn hash_domain(domain: &str) -> Option<String> {
    let mut domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        return None;
    }
    if domain.contains("://") {
        domain = Url::parse(&domain)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();
    }
    let domain = domain.strip_prefix("www.").unwrap_or(&domain);
    let domain = domain.trim_end_matches('.');

    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    Some(hex::encode(hasher.finalize()))
}
