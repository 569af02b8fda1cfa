//! # Classification Module
//!
//! Assigns one [`Category`] to a URL by walking [`RULE_ORDER`]; the first
//! rule that fires decides. Classification is a pure function of the URL
//! string and is safe to call from any number of threads.

pub mod papers;
pub mod rules;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OnlineCourse,
    Lms,
    VideoPlatform,
    EducationalVideo,
    Tutorial,
    Academic,
    Research,
    GithubRepo,
    /// Not educational; excluded from analysis.
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::OnlineCourse => "online_course",
            Category::Lms => "lms",
            Category::VideoPlatform => "video_platform",
            Category::EducationalVideo => "educational_video",
            Category::Tutorial => "tutorial",
            Category::Academic => "academic",
            Category::Research => "research",
            Category::GithubRepo => "github_repo",
            Category::General => "general",
        }
    }

    pub fn is_educational(&self) -> bool {
        *self != Category::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Category::OnlineCourse,
            Category::Lms,
            Category::VideoPlatform,
            Category::EducationalVideo,
            Category::Tutorial,
            Category::Academic,
            Category::Research,
            Category::GithubRepo,
            Category::General,
        ]
        .into_iter()
        .find(|c| c.as_str() == s)
        .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Classification rules, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Platform,
    TutorialPath,
    Academic,
    ResearchPath,
    GithubRepo,
}

pub const RULE_ORDER: [Rule; 5] = [
    Rule::Platform,
    Rule::TutorialPath,
    Rule::Academic,
    Rule::ResearchPath,
    Rule::GithubRepo,
];

/// The parts of a URL the rules look at.
#[derive(Debug)]
pub struct UrlView {
    /// Whole URL, lower-cased.
    pub lower: String,
    /// Lower-cased `host[:port]` with a leading `www.` removed.
    pub domain: String,
    /// Lower-cased `host[:port]` as written.
    pub netloc: String,
    /// Lower-cased path.
    pub path: String,
    /// Decoded query pairs from the original (not lower-cased) URL.
    pub query: Vec<(String, String)>,
}

impl UrlView {
    /// Strings that do not parse as absolute URLs are treated as having no
    /// host and no query.
    pub fn new(url: &str) -> Self {
        let lower = url.to_lowercase();
        let (netloc, path, query) = match Url::parse(url) {
            Ok(parsed) => (
                netloc_of(&parsed).to_lowercase(),
                parsed.path().to_lowercase(),
                parsed
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            ),
            Err(_) => (String::new(), lower.clone(), Vec::new()),
        };
        let domain = netloc.strip_prefix("www.").unwrap_or(&netloc).to_string();
        Self {
            lower,
            domain,
            netloc,
            path,
            query,
        }
    }

    fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }
}

/// `host[:port]` of a parsed URL, empty when it has no host.
pub fn netloc_of(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

pub fn classify_url(url: &str) -> Category {
    let view = UrlView::new(url);
    RULE_ORDER
        .iter()
        .find_map(|rule| rule.apply(&view))
        .unwrap_or(Category::General)
}

impl Rule {
    pub fn apply(&self, view: &UrlView) -> Option<Category> {
        match self {
            Rule::Platform => platform_category(view),
            Rule::TutorialPath => rules::TUTORIAL_SET
                .is_match(&view.lower)
                .then_some(Category::Tutorial),
            Rule::Academic => (is_educational_domain(&view.domain)
                || is_research_repository(&view.domain))
            .then_some(Category::Academic),
            Rule::ResearchPath => (view.lower.contains("/research/") || view.domain.is_empty())
                .then_some(Category::Research),
            Rule::GithubRepo => is_github_repo(view).then_some(Category::GithubRepo),
        }
    }
}

/// The host must be a table key; the label comes from the first key (in
/// table order) contained in the host.
fn platform_category(view: &UrlView) -> Option<Category> {
    if !rules::PLATFORMS.iter().any(|(key, _)| *key == view.domain) {
        return None;
    }
    let category = rules::PLATFORMS
        .iter()
        .find(|(key, _)| view.domain.contains(key))
        .map(|(_, category)| *category)?;
    if category == Category::VideoPlatform && is_educational_video(view) {
        return Some(Category::EducationalVideo);
    }
    Some(category)
}

fn is_educational_video(view: &UrlView) -> bool {
    if !rules::YOUTUBE_HOSTS
        .iter()
        .any(|host| view.domain.contains(host))
    {
        return false;
    }
    if view.lower.contains("/playlist") && view.lower.contains("learning") {
        return true;
    }
    if view.lower.contains("/c/") || view.lower.contains("/channel/") {
        return rules::EDUCATIONAL_CHANNELS
            .iter()
            .any(|channel| view.lower.contains(channel));
    }
    let video_title = view
        .query_values("title")
        .chain(view.query_values("v"))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    rules::EDUCATIONAL_KEYWORDS
        .iter()
        .any(|keyword| video_title.contains(keyword))
}

pub fn is_educational_domain(domain: &str) -> bool {
    rules::EDU_DOMAIN_SET.is_match(&domain.to_lowercase())
}

pub fn is_research_repository(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    rules::RESEARCH_REPOSITORIES.contains(&domain.as_str())
}

fn is_github_repo(view: &UrlView) -> bool {
    if !rules::GITHUB_HOSTS.contains(&view.netloc.as_str()) {
        return false;
    }
    let parts: Vec<&str> = view.path.split('/').filter(|p| !p.is_empty()).collect();
    parts.len() >= 2 && !rules::GITHUB_NON_REPO_PATHS.contains(&parts[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_table_labels() {
        assert_eq!(
            classify_url("https://www.coursera.org/specializations/deep-learning"),
            Category::OnlineCourse
        );
        assert_eq!(classify_url("https://moodle.org/"), Category::Lms);
        assert_eq!(
            classify_url("https://teachertube.com/videos/1"),
            Category::VideoPlatform
        );
    }

    #[test]
    fn platform_lookup_requires_exact_host() {
        // Subdomains are not table keys.
        assert_ne!(
            classify_url("https://m.udemy.com/"),
            Category::OnlineCourse
        );
        assert_eq!(classify_url("https://m.udemy.com/"), Category::General);
    }

    #[test]
    fn youtube_keyword_in_title_or_video_id() {
        assert_eq!(
            classify_url("https://www.youtube.com/watch?v=xyz&title=Python+Tutorial+for+Beginners"),
            Category::EducationalVideo
        );
        assert_eq!(
            classify_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Category::VideoPlatform
        );
    }

    #[test]
    fn youtube_playlist_needs_learning() {
        assert_eq!(
            classify_url("https://www.youtube.com/playlist?list=machine-learning"),
            Category::EducationalVideo
        );
        assert_eq!(
            classify_url("https://www.youtube.com/playlist?list=PLabc"),
            Category::VideoPlatform
        );
    }

    #[test]
    fn youtube_channel_decides_without_keywords() {
        assert_eq!(
            classify_url("https://www.youtube.com/c/3blue1brown"),
            Category::EducationalVideo
        );
        // A non-educational channel does not fall through to the title test.
        assert_eq!(
            classify_url("https://www.youtube.com/channel/UCxyz?title=tutorial"),
            Category::VideoPlatform
        );
    }

    #[test]
    fn tutorial_paths() {
        assert_eq!(
            classify_url("https://doc.rust-lang.org/book/tutorial.html"),
            Category::Tutorial
        );
        assert_eq!(
            classify_url("https://example.com/crash-course/intro"),
            Category::Tutorial
        );
    }

    #[test]
    fn academic_domains_and_repositories() {
        assert_eq!(classify_url("https://web.mit.edu/"), Category::Academic);
        assert_eq!(classify_url("https://www.ox.ac.uk/admissions"), Category::Academic);
        assert_eq!(classify_url("https://www.tum.uni-muenchen.de/"), Category::Academic);
        assert_eq!(classify_url("https://arxiv.org/abs/1706.03762"), Category::Academic);
        assert_eq!(classify_url("https://openreview.net/forum?id=1"), Category::Academic);
    }

    #[test]
    fn research_paths_and_hostless_urls() {
        assert_eq!(
            classify_url("https://labs.acme.org/research/papers"),
            Category::Research
        );
        assert_eq!(classify_url("file:///home/me/notes.txt"), Category::Research);
        assert_eq!(classify_url("not a url"), Category::Research);
    }

    #[test]
    fn github_repositories() {
        assert_eq!(
            classify_url("https://github.com/torvalds/linux"),
            Category::GithubRepo
        );
        assert_eq!(
            classify_url("https://github.com/marketplace/foo"),
            Category::General
        );
        assert_eq!(classify_url("https://github.com/torvalds"), Category::General);
    }

    #[test]
    fn everything_else_is_general() {
        assert_eq!(classify_url("https://news.ycombinator.com/"), Category::General);
        assert_eq!(classify_url("https://www.example.com/shop?item=1"), Category::General);
    }

    #[test]
    fn earlier_rules_win() {
        // Tutorial path outranks the academic domain.
        assert_eq!(
            classify_url("https://cs.stanford.edu/tutorial/intro"),
            Category::Tutorial
        );
        // Platform outranks the tutorial path.
        assert_eq!(
            classify_url("https://www.udemy.com/course/rust"),
            Category::OnlineCourse
        );
        // Academic outranks /research/.
        assert_eq!(
            classify_url("https://cs.cmu.edu/research/groups"),
            Category::Academic
        );
        // /learn on github is a tutorial, not a repository.
        assert_eq!(
            classify_url("https://github.com/owner/learn-rust"),
            Category::Tutorial
        );
    }

    #[test]
    fn classification_is_stable() {
        let url = "https://www.youtube.com/watch?v=abc&title=Deep+Dive";
        let first = classify_url(url);
        for _ in 0..10 {
            assert_eq!(classify_url(url), first);
        }
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in [Category::GithubRepo, Category::EducationalVideo, Category::General] {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            serde_json::to_string(&Category::OnlineCourse).expect("json"),
            "\"online_course\""
        );
    }
}
