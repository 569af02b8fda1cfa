//! Classification tables.
//!
//! Every list here is plain data consulted by the rules in
//! [`crate::classify`]. Extending a table never requires touching the
//! rule evaluation code.

use once_cell::sync::Lazy;
use regex::RegexSet;

use crate::classify::Category;

/// Known learning platforms, matched against the `www.`-stripped host.
/// Order matters: the first key contained in the host decides the label.
pub const PLATFORMS: &[(&str, Category)] = &[
    ("coursera.org", Category::OnlineCourse),
    ("udemy.com", Category::OnlineCourse),
    ("edx.org", Category::OnlineCourse),
    ("khanacademy.org", Category::OnlineCourse),
    ("udacity.com", Category::OnlineCourse),
    ("skillshare.com", Category::OnlineCourse),
    ("pluralsight.com", Category::OnlineCourse),
    ("linkedin.com/learning", Category::OnlineCourse),
    ("codecademy.com", Category::OnlineCourse),
    ("brilliant.org", Category::OnlineCourse),
    ("duolingo.com", Category::OnlineCourse),
    ("canvas.net", Category::Lms),
    ("blackboard.com", Category::Lms),
    ("moodle.org", Category::Lms),
    ("youtube.com", Category::VideoPlatform),
    ("youtu.be", Category::VideoPlatform),
    ("teachertube.com", Category::VideoPlatform),
];

/// Hosts on which the educational-video heuristics apply.
pub const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

pub const EDUCATIONAL_CHANNELS: &[&str] = &[
    "crash course",
    "khan academy",
    "mit",
    "stanford",
    "harvard",
    "ted-ed",
    "vsauce",
    "3blue1brown",
    "codecademy",
    "freecodecamp",
    "coursera",
];

pub const EDUCATIONAL_KEYWORDS: &[&str] = &[
    "tutorial",
    "learn",
    "course",
    "lesson",
    "lecture",
    "educational",
    "teaching",
    "explained",
    "introduction",
    "guide",
    "how to",
    "basics",
    "fundamentals",
    "principles",
    "crash course",
    "for beginners",
    "101",
    "masterclass",
    "workshop",
    "training",
    "education",
    "walkthrough",
    "step by step",
    "introduction to",
    "getting started",
    "complete guide",
    "deep dive",
    "explanation",
    "understand",
    "concept",
    "theory",
    "practice",
    "example",
    "demonstration",
    "review",
];

pub const TUTORIAL_PATTERNS: &[&str] = &[
    r"/tutorial",
    r"/learn",
    r"/course",
    r"/lesson",
    r"/documentation",
    r"/workshop",
    r"/training",
    r"/lecture",
    r"/class",
    r"/syllabus",
    r"/curriculum",
    r"/mooc",
    r"/resources",
    r"/study",
    r"/teach",
    r"/explained",
    r"/introduction",
    r"/basics",
    r"/degree",
    r"/assignment",
    r"/practice",
    r"/exercise",
    r"/problem",
    r"/solution",
    r"/example",
    r"/demo",
    r"/showcase",
    r"/walkthrough",
    r"/step-by-step",
    r"/crash-course",
];

pub const EDU_DOMAIN_PATTERNS: &[&str] = &[
    r"\.edu$",
    r"\.edu\.[a-z]{2}$",
    r"\.ac\.[a-z]{2}$",
    r"\.edu\.",
    r"\.ac\.jp$",
    r"\.ac\.uk$",
    r"\.ac\.nz$",
    r"\.ac\.za$",
    r"\.edu\.au$",
    r"\.edu\.cn$",
    r"\.edu\.hk$",
    r"\.edu\.sg$",
    r"\.edu\.my$",
    r"\.edu\.in$",
    r"\.edu\.br$",
    r"\.edu\.mx$",
    r"\.edu\.ar$",
    r"\.edu\.es$",
    r"\.edu\.pl$",
    r"\.edu\.ru$",
    r"\.edu\.tr$",
    r"\.ac\.ir$",
    r"\.ac\.kr$",
    r"\.ac\.th$",
    r"\.ac\.id$",
    r"\.uni-[^.]+\.de$",
    r"\.univ-[^.]+\.fr$",
    r"\.uni-[^.]+\.at$",
    r"\.uni-[^.]+\.ch$",
    r"\.universitet\.dk$",
    r"\.universiteit\.nl$",
    r"university\.",
    r"\.uni\.",
    r"\.college\.",
    r"\.institute\.",
    r"\.school\.",
];

/// Research repositories and venues, matched exactly against the
/// `www.`-stripped host.
pub const RESEARCH_REPOSITORIES: &[&str] = &[
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
    "researchgate.net",
    "scholar.google.com",
    "semantic.scholar.org",
    "dblp.org",
];

pub const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// First path segments on github.com that are site pages, not `owner/repo`.
pub const GITHUB_NON_REPO_PATHS: &[&str] = &[
    "marketplace",
    "sponsors",
    "settings",
    "notifications",
    "explore",
    "topics",
    "collections",
    "events",
    "features",
    "security",
    "enterprise",
    "pricing",
    "search",
];

pub static TUTORIAL_SET: Lazy<RegexSet> = Lazy::new(|| build_set(TUTORIAL_PATTERNS));

pub static EDU_DOMAIN_SET: Lazy<RegexSet> = Lazy::new(|| build_set(EDU_DOMAIN_PATTERNS));

fn build_set(patterns: &[&str]) -> RegexSet {
    // The tables are compile-time constants covered by tests; an invalid
    // pattern degrades to a set that never matches.
    RegexSet::new(patterns).unwrap_or_else(|err| {
        tracing::error!("invalid classification pattern table: {err}");
        RegexSet::empty()
    })
}
