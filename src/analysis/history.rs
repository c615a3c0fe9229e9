//! Commit-history analysis: growth timeline, hotspots, co-change and
//! structural relationships, deleted files.

use super::quality::base_name;
use crate::model::{Commit, FileEntry, file_name, parent_dir, strip_extension};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const MONTH_WINDOW: usize = 12;
const WEEK_WINDOW: usize = 12;
const DAY_WINDOW: usize = 14;
const HOTSPOT_LIMIT: usize = 10;
const PARTNER_LIMIT: usize = 5;
const DELETED_LIMIT: usize = 10;
const DELETED_SCAN: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GrowthPoint {
    pub label: String,
    pub commits: usize,
    pub cumulative: usize,
    pub unit: TimeUnit,
}

/// Count commits per bucket. Keys sort chronologically.
fn bucket<F>(dates: &[DateTime<Utc>], key: F) -> BTreeMap<NaiveDate, usize>
where
    F: Fn(NaiveDate) -> NaiveDate,
{
    let mut buckets = BTreeMap::new();
    for date in dates {
        *buckets.entry(key(date.date_naive())).or_default() += 1;
    }
    buckets
}

fn series<L>(
    buckets: BTreeMap<NaiveDate, usize>,
    window: usize,
    unit: TimeUnit,
    label: L,
) -> Vec<GrowthPoint>
where
    L: Fn(NaiveDate) -> String,
{
    let skip = buckets.len().saturating_sub(window);
    let mut cumulative = 0;
    buckets
        .into_iter()
        .skip(skip)
        .map(|(start, commits)| {
            cumulative += commits;
            GrowthPoint {
                label: label(start),
                commits,
                cumulative,
                unit,
            }
        })
        .collect()
}

fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

fn week_start(d: NaiveDate) -> NaiveDate {
    d - Duration::days(d.weekday().num_days_from_sunday() as i64)
}

/// Commit activity over time at the coarsest granularity with at least two
/// buckets: months, then weeks (starting Sunday), then days. Cumulative
/// counts restart at the beginning of the returned window.
pub fn analyze_repository_growth(commits: &[Commit]) -> Vec<GrowthPoint> {
    let dates: Vec<DateTime<Utc>> = commits.iter().filter_map(Commit::date).collect();
    if dates.is_empty() {
        return Vec::new();
    }

    let months = bucket(&dates, month_start);
    if months.len() >= 2 {
        return series(months, MONTH_WINDOW, TimeUnit::Month, |d| {
            d.format("%Y-%m").to_string()
        });
    }

    let weeks = bucket(&dates, week_start);
    if weeks.len() >= 2 {
        return series(weeks, WEEK_WINDOW, TimeUnit::Week, |d| {
            format!("Week of {}", d.format("%b %-d"))
        });
    }

    let days = bucket(&dates, |d| d);
    series(days, DAY_WINDOW, TimeUnit::Day, |d| d.format("%b %-d").to_string())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Hotspot {
    pub path: String,
    pub edit_count: usize,
    pub size: u64,
}

/// Files appearing most often in commit change lists.
pub fn analyze_file_hotspots(commits: &[Commit], files: &[FileEntry]) -> Vec<Hotspot> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for file in commits.iter().flat_map(Commit::changed_files) {
        *counts.entry(file.filename.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(HOTSPOT_LIMIT)
        .map(|(path, edit_count)| Hotspot {
            path: path.to_string(),
            edit_count,
            size: files
                .iter()
                .find(|f| f.path == path)
                .map(|f| f.size)
                .unwrap_or(0),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CoChange {
    pub file: String,
    pub strength: usize,
}

/// For each file, the files most often changed in the same commit.
pub fn analyze_file_relationships(
    commits: &[Commit],
    files: &[FileEntry],
) -> BTreeMap<String, Vec<CoChange>> {
    let mut pairs: HashMap<(&str, &str), usize> = HashMap::new();

    for commit in commits {
        let changed = commit.changed_files();
        for (i, a) in changed.iter().enumerate() {
            for b in &changed[i + 1..] {
                let (x, y) = (a.filename.as_str(), b.filename.as_str());
                let key = if x <= y { (x, y) } else { (y, x) };
                *pairs.entry(key).or_default() += 1;
            }
        }
    }

    files
        .iter()
        .map(|file| {
            let path = file.path.as_str();
            let mut related: Vec<CoChange> = pairs
                .iter()
                .filter_map(|(&(a, b), &strength)| {
                    let other = if a == path {
                        b
                    } else if b == path {
                        a
                    } else {
                        return None;
                    };
                    Some(CoChange {
                        file: other.to_string(),
                        strength,
                    })
                })
                .collect();
            related.sort_by(|a, b| b.strength.cmp(&a.strength).then_with(|| a.file.cmp(&b.file)));
            related.truncate(PARTNER_LIMIT);
            (file.path.clone(), related)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RelationKind {
    #[serde(rename = "Test file")]
    TestFile,
    #[serde(rename = "Source file")]
    SourceFile,
    #[serde(rename = "Same directory")]
    SameDirectory,
    #[serde(rename = "Module index")]
    ModuleIndex,
    #[serde(rename = "Similar name")]
    SimilarName,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Relation {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
}

fn relation(file: &FileEntry, kind: RelationKind) -> Relation {
    Relation {
        file: file.path.clone(),
        kind,
    }
}

fn is_test_name(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains(".test.") || lower.contains(".spec.")
}

/// Files related to `path` by naming conventions alone.
pub fn find_related_files_by_structure(path: &str, files: &[FileEntry]) -> Vec<Relation> {
    let mut related = Vec::new();
    let name = file_name(path);
    let dir = parent_dir(path);
    let base = base_name(name);

    if !is_test_name(path) {
        let candidates = [
            format!("{}.test.js", base),
            format!("{}.test.ts", base),
            format!("{}.spec.js", base),
            format!("{}.spec.ts", base),
            format!("{}_test.py", base),
            format!("{}_spec.rb", base),
        ];
        for candidate in &candidates {
            let tests_dir = format!("__tests__/{}", candidate);
            let test_dir = format!("test/{}", candidate);
            if let Some(f) = files.iter().find(|f| {
                f.path.ends_with(candidate.as_str())
                    || f.path.contains(&tests_dir)
                    || f.path.contains(&test_dir)
            }) {
                related.push(relation(f, RelationKind::TestFile));
            }
        }
    } else if let Some(f) = files
        .iter()
        .find(|f| f.path.contains(&base) && !is_test_name(&f.path))
    {
        related.push(relation(f, RelationKind::SourceFile));
    }

    let depth = path.split('/').count();
    let prefix = format!("{}/", dir);
    related.extend(
        files
            .iter()
            .filter(|f| f.path.starts_with(&prefix) && f.path != path && f.depth() == depth)
            .take(3)
            .map(|f| relation(f, RelationKind::SameDirectory)),
    );

    if name != "index.js" && name != "index.ts" {
        let js = format!("{}/index.js", dir);
        let ts = format!("{}/index.ts", dir);
        if let Some(f) = files.iter().find(|f| f.path == js || f.path == ts) {
            related.push(relation(f, RelationKind::ModuleIndex));
        }
    }

    related.extend(
        files
            .iter()
            .filter(|f| f.path != path && strip_extension(f.name()).contains(&base))
            .take(2)
            .map(|f| relation(f, RelationKind::SimilarName)),
    );

    related
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeletedFile {
    pub path: String,
    pub deleted_at: Option<String>,
    pub deleted_by: String,
    pub commit_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_url: Option<String>,
}

/// Files removed in recent commits, newest deletion first as listed.
pub fn detect_deleted_files(commits: &[Commit]) -> Vec<DeletedFile> {
    let mut deleted: Vec<DeletedFile> = Vec::new();

    for commit in commits.iter().take(DELETED_SCAN) {
        for file in commit.changed_files().iter().filter(|f| f.status == "removed") {
            if deleted.iter().any(|d| d.path == file.filename) {
                continue;
            }
            deleted.push(DeletedFile {
                path: file.filename.clone(),
                deleted_at: commit.commit.author.as_ref().and_then(|a| a.date.clone()),
                deleted_by: commit.author_name().to_string(),
                commit_message: commit.summary().to_string(),
                commit_url: commit.html_url.clone(),
            });
        }
    }

    deleted.truncate(DELETED_LIMIT);
    deleted
}
