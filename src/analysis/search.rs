//! Fuzzy subsequence matching and filtered file search.

use super::classify::{Category, categorize};
use crate::model::FileEntry;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULTS: usize = 30;

const SMALL_LIMIT: u64 = 10 * 1024;
const LARGE_LIMIT: u64 = 100 * 1024;
const PREFIX_BONUS: u32 = 100;
const RUN_BONUS: u32 = 10;

/// Score `query` against `text`, case-insensitively.
///
/// Every query character must appear in `text` in order. Each match adds
/// `10 × current run length`, and a mismatch resets the run. A text that
/// starts with the whole query gets a further `+100`. Returns 0 when the
/// query is not a subsequence of the text.
pub fn fuzzy_match(text: &str, query: &str) -> u32 {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let query: Vec<char> = query.to_lowercase().chars().collect();

    let mut qi = 0;
    let mut run = 0;
    let mut score = 0;

    for ch in &text {
        if qi == query.len() {
            break;
        }
        if *ch == query[qi] {
            qi += 1;
            run += 1;
            score += run * RUN_BONUS;
        } else {
            run = 0;
        }
    }

    if qi < query.len() {
        return 0;
    }
    if text.starts_with(&query) {
        score += PREFIX_BONUS;
    }
    score
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SizeBand {
    /// Under 10 KB.
    Small,
    /// 10 KB to 100 KB inclusive.
    Medium,
    /// Over 100 KB.
    Large,
}

impl SizeBand {
    pub fn contains(self, size: u64) -> bool {
        match self {
            SizeBand::Small => size < SMALL_LIMIT,
            SizeBand::Medium => (SMALL_LIMIT..=LARGE_LIMIT).contains(&size),
            SizeBand::Large => size > LARGE_LIMIT,
        }
    }
}

impl std::str::FromStr for SizeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(SizeBand::Small),
            "medium" => Ok(SizeBand::Medium),
            "large" => Ok(SizeBand::Large),
            _ => Err(format!("Unknown size band: {} (use small, medium or large)", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub category: Option<Category>,
    /// Extension without the dot, matched against the end of the path.
    pub extension: Option<String>,
    pub size: Option<SizeBand>,
    /// Result cap; 0 means the default of 30.
    pub max_results: usize,
}

impl SearchFilters {
    fn accepts(&self, file: &FileEntry) -> bool {
        if self.category.is_some_and(|c| categorize(file) != c) {
            return false;
        }
        if let Some(ext) = &self.extension {
            let suffix = format!(".{}", ext.trim_start_matches('.').to_lowercase());
            if !file.lower_path().ends_with(&suffix) {
                return false;
            }
        }
        self.size.is_none_or(|band| band.contains(file.size))
    }

    fn limit(&self) -> usize {
        if self.max_results == 0 {
            DEFAULT_MAX_RESULTS
        } else {
            self.max_results
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub file: FileEntry,
    pub score: u32,
}

/// Queries that look like an email address rather than a path.
pub fn is_rejected_query(query: &str) -> bool {
    query.contains('@') && !query.contains('/')
}

/// Rank `files` against `query` after applying `filters`.
///
/// An empty query returns the first filtered files unscored. Ties keep the
/// input order.
pub fn search_files(files: &[FileEntry], query: &str, filters: &SearchFilters) -> Vec<SearchHit> {
    if is_rejected_query(query) {
        return Vec::new();
    }

    let candidates = files.iter().filter(|f| filters.accepts(f));

    if query.is_empty() {
        return candidates
            .take(filters.limit())
            .map(|f| SearchHit {
                file: f.clone(),
                score: 0,
            })
            .collect();
    }

    let mut hits: Vec<SearchHit> = candidates
        .filter_map(|f| {
            let score = fuzzy_match(&f.path, query);
            (score > 0).then(|| SearchHit {
                file: f.clone(),
                score,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(filters.limit());
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match_subsequence() {
        assert!(fuzzy_match("index.js", "inx") > 0);
        assert_eq!(fuzzy_match("index.js", "xdi"), 0);
        assert_eq!(fuzzy_match("index.js", "indexes"), 0);
        // i, d and x appear in order, each as a run of one
        assert_eq!(fuzzy_match("index.js", "idx"), 30);
    }

    #[test]
    fn test_consecutive_run_dominates() {
        let full = fuzzy_match("readme.md", "readme");
        let sparse = fuzzy_match("readme.md", "rm");
        assert!(full > sparse);
        // 10+20+30+40+50+60 plus the prefix bonus
        assert_eq!(full, 310);
    }

    #[test]
    fn test_fuzzy_match_case_insensitive() {
        assert_eq!(
            fuzzy_match("src/Main.RS", "MAIN"),
            fuzzy_match("src/main.rs", "main")
        );
    }

    #[test]
    fn test_empty_query_matches_with_prefix_bonus() {
        assert_eq!(fuzzy_match("anything", ""), PREFIX_BONUS);
    }

    fn files() -> Vec<FileEntry> {
        vec![
            FileEntry::new("src/app.ts", 2_000),
            FileEntry::new("src/api/routes.py", 50_000),
            FileEntry::new("README.md", 500),
            FileEntry::new("assets/app-bundle.js", 300_000),
        ]
    }

    #[test]
    fn test_search_ranks_by_score() {
        let hits = search_files(&files(), "app", &SearchFilters::default());
        let paths: Vec<&str> = hits.iter().map(|h| h.file.path.as_str()).collect();
        // routes.py matches a, p, then the p of ".py"
        assert_eq!(
            paths,
            vec!["src/app.ts", "src/api/routes.py", "assets/app-bundle.js"]
        );
        assert_eq!(hits[0].score, 60);
        assert_eq!(hits[1].score, hits[2].score);
    }

    #[test]
    fn test_search_filters() {
        let filters = SearchFilters {
            size: Some(SizeBand::Large),
            ..Default::default()
        };
        let hits = search_files(&files(), "", &filters);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file.path, "assets/app-bundle.js");

        let filters = SearchFilters {
            extension: Some("py".into()),
            ..Default::default()
        };
        assert_eq!(search_files(&files(), "", &filters).len(), 1);

        let filters = SearchFilters {
            category: Some(Category::Docs),
            ..Default::default()
        };
        let hits = search_files(&files(), "read", &filters);
        assert_eq!(hits[0].file.path, "README.md");
    }

    #[test]
    fn test_size_band_boundaries() {
        assert!(SizeBand::Small.contains(10_239));
        assert!(SizeBand::Medium.contains(10_240));
        assert!(SizeBand::Medium.contains(102_400));
        assert!(SizeBand::Large.contains(102_401));
    }

    #[test]
    fn test_email_like_query_rejected() {
        assert!(search_files(&files(), "dev@example.com", &SearchFilters::default()).is_empty());
        assert!(!is_rejected_query("@types/node"));
    }

    #[test]
    fn test_result_cap() {
        let many: Vec<FileEntry> = (0..50)
            .map(|i| FileEntry::new(format!("src/f{}.rs", i), 1))
            .collect();
        assert_eq!(search_files(&many, "src", &SearchFilters::default()).len(), 30);
        let capped = SearchFilters {
            max_results: 5,
            ..Default::default()
        };
        assert_eq!(search_files(&many, "", &capped).len(), 5);
    }
}
