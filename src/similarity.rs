//! # Similarity Module
//!
//! Pairwise similarity between normalized URLs and the full comparison
//! matrix between two histories.
//!
//! Each of the nine [`Component`]s is scored with the longest-matching-blocks
//! ratio `2 * M / T` (`M` matched characters, `T` total characters of both
//! strings) and the nine ratios are averaged with equal weight.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::normalize::{NormalizedUrl, UrlRecord};

/// `matrix[i][j]` is the similarity of record `i` of history A to record `j`
/// of history B.
pub type SimilarityMatrix = Vec<Vec<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Scheme,
    Subdomain,
    Domain,
    Tld,
    Netloc,
    Path,
    Query,
    Fragment,
    Classification,
}

impl Component {
    pub const ALL: [Component; 9] = [
        Component::Scheme,
        Component::Subdomain,
        Component::Domain,
        Component::Tld,
        Component::Netloc,
        Component::Path,
        Component::Query,
        Component::Fragment,
        Component::Classification,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Component::Scheme => "scheme",
            Component::Subdomain => "subdomain",
            Component::Domain => "domain",
            Component::Tld => "tld",
            Component::Netloc => "netloc",
            Component::Path => "path",
            Component::Query => "query",
            Component::Fragment => "fragment",
            Component::Classification => "classification",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("record has no `{component}` component")]
    MissingComponent { component: &'static str },
    #[error("record pair ({row}, {column}) has no `{component}` component")]
    MissingInPair {
        component: &'static str,
        row: usize,
        column: usize,
    },
}

/// Access to the comparable components of a record.
pub trait UrlComponents {
    fn component(&self, component: Component) -> Option<&str>;
}

impl UrlComponents for NormalizedUrl {
    fn component(&self, component: Component) -> Option<&str> {
        match component {
            Component::Scheme => Some(&self.scheme),
            Component::Subdomain => Some(&self.subdomain),
            Component::Domain => Some(&self.domain),
            Component::Tld => Some(&self.tld),
            Component::Netloc => Some(&self.netloc),
            Component::Path => Some(&self.path),
            Component::Query => self.query.as_deref(),
            Component::Fragment => self.fragment.as_deref(),
            Component::Classification => Some(self.classification.as_str()),
        }
    }
}

impl UrlComponents for UrlRecord {
    fn component(&self, component: Component) -> Option<&str> {
        self.as_normalized()?.component(component)
    }
}

/// Mean component ratio of two records, in `[0, 1]`.
///
/// A record lacking any component fails the comparison; there is no
/// default substitution.
pub fn compare_urls<A, B>(a: &A, b: &B) -> Result<f64, ComparisonError>
where
    A: UrlComponents + ?Sized,
    B: UrlComponents + ?Sized,
{
    let mut total = 0.0;
    for component in Component::ALL {
        let missing = || ComparisonError::MissingComponent {
            component: component.key(),
        };
        let left = a.component(component).ok_or_else(missing)?;
        let right = b.component(component).ok_or_else(missing)?;
        total += ratio(left, right);
    }
    Ok(total / Component::ALL.len() as f64)
}

/// Compare every record of `a` with every record of `b`.
pub fn compare_histories<T>(a: &[T], b: &[T]) -> Result<SimilarityMatrix, ComparisonError>
where
    T: UrlComponents + Sync,
{
    compare_histories_parallel(a, b, 1)
}

/// [`compare_histories`] with rows spread over `workers` threads. The
/// result is identical for any worker count.
pub fn compare_histories_parallel<T>(
    a: &[T],
    b: &[T],
    workers: usize,
) -> Result<SimilarityMatrix, ComparisonError>
where
    T: UrlComponents + Sync,
{
    debug!(
        "comparing histories rows={} columns={} workers={}",
        a.len(),
        b.len(),
        workers
    );
    if workers <= 1 || a.len() < 2 {
        return a
            .iter()
            .enumerate()
            .map(|(row, record)| compare_row(row, record, b))
            .collect();
    }

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
    let (row_tx, row_rx) = crossbeam_channel::unbounded();
    for row in 0..a.len() {
        if job_tx.send(row).is_err() {
            break;
        }
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers.min(a.len()) {
            let job_rx = job_rx.clone();
            let row_tx = row_tx.clone();
            scope.spawn(move || {
                for row in job_rx {
                    if row_tx.send((row, compare_row(row, &a[row], b))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(row_tx);

    let mut rows: Vec<Option<Result<Vec<f64>, ComparisonError>>> = vec![None; a.len()];
    for (row, result) in row_rx {
        rows[row] = Some(result);
    }
    rows.into_iter()
        .map(|row| row.unwrap_or_else(|| Ok(Vec::new())))
        .collect()
}

fn compare_row<T: UrlComponents>(
    row: usize,
    record: &T,
    b: &[T],
) -> Result<Vec<f64>, ComparisonError> {
    b.iter()
        .enumerate()
        .map(|(column, other)| {
            compare_urls(record, other).map_err(|err| match err {
                ComparisonError::MissingComponent { component } => {
                    ComparisonError::MissingInPair {
                        component,
                        row,
                        column,
                    }
                }
                err => err,
            })
        })
        .collect()
}

/// Longest-matching-blocks similarity of two strings, in `[0, 1]`.
/// Two empty strings are identical.
///
/// The greedy block search can find different alignments depending on
/// argument order; both orders are run and the larger match count is used,
/// so `ratio(a, b) == ratio(b, a)`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let forward = SequenceMatcher::new(&a, &b).matching_characters();
    let backward = SequenceMatcher::new(&b, &a).matching_characters();
    2.0 * forward.max(backward) as f64 / total as f64
}

/// Ratcliff/Obershelp matcher.
///
/// For `b` of 200 or more characters, characters occurring in more than
/// 1% of `b` are "popular": they never seed a match, though matches may
/// still extend across them.
struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

const AUTOJUNK_MIN_LEN: usize = 200;

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Longest block `(i, j, size)` with `a[i..i+size] == b[j..j+size]`
    /// inside the given ranges; earliest in `a`, then in `b`, on ties.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }
        (best_i, best_j, best_size)
    }

    /// Total size of all matching blocks.
    fn matching_characters(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }
}
