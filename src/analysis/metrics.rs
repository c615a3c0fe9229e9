//! Repository statistics, health score and code metrics.

use super::code_files;
use crate::model::{Commit, FileEntry, RepoInfo};
use serde::Serialize;
use std::collections::BTreeMap;

/// Files above this size count as large.
pub const LARGE_FILE_BYTES: u64 = 100_000;
const LARGE_FILE_LIMIT: usize = 10;
const TOP_EXTENSIONS: usize = 8;
const BYTES_PER_LINE: f64 = 50.0;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RepoStats {
    pub total_files: usize,
    pub total_folders: usize,
    pub total_size: u64,
    pub largest_file: Option<FileEntry>,
    /// Number of files over 100 KB, before truncation of `large_files`.
    pub large_file_count: usize,
    /// Up to ten largest files over 100 KB, biggest first.
    pub large_files: Vec<FileEntry>,
    pub top_extensions: Vec<ExtensionCount>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub health_score: u8,
}

impl RepoStats {
    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_score(self.health_score)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => HealthBand::Excellent,
            60..=79 => HealthBand::Good,
            40..=59 => HealthBand::Fair,
            _ => HealthBand::Poor,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HealthBand::Excellent => "Excellent repository health!",
            HealthBand::Good => "Good repository health",
            HealthBand::Fair => "Fair repository health",
            HealthBand::Poor => "Needs improvement",
        }
    }
}

pub fn calculate_stats(files: &[FileEntry], folders: &[String], info: &RepoInfo) -> RepoStats {
    let mut extensions: Vec<ExtensionCount> = Vec::new();
    let mut total_size = 0;
    let mut largest: Option<&FileEntry> = None;

    for file in files {
        if let Some(ext) = file.extension() {
            match extensions.iter_mut().find(|e| e.extension == ext) {
                Some(entry) => entry.count += 1,
                None => extensions.push(ExtensionCount {
                    extension: ext,
                    count: 1,
                }),
            }
        }
        total_size += file.size;
        if largest.is_none_or(|l| file.size > l.size) {
            largest = Some(file);
        }
    }

    // stable: ties keep first-seen order
    extensions.sort_by(|a, b| b.count.cmp(&a.count));
    extensions.truncate(TOP_EXTENSIONS);

    let mut large: Vec<FileEntry> = files
        .iter()
        .filter(|f| f.size > LARGE_FILE_BYTES)
        .cloned()
        .collect();
    let large_file_count = large.len();
    large.sort_by(|a, b| b.size.cmp(&a.size));
    large.truncate(LARGE_FILE_LIMIT);

    RepoStats {
        total_files: files.len(),
        total_folders: folders.len(),
        total_size,
        largest_file: largest.cloned(),
        large_file_count,
        large_files: large,
        top_extensions: extensions,
        language: info.language.clone(),
        stars: info.stargazers_count,
        forks: info.forks_count,
        open_issues: info.open_issues_count,
        health_score: calculate_health_score(files, large_file_count),
    }
}

fn has_readme(files: &[FileEntry]) -> bool {
    files.iter().any(|f| f.lower_path() == "readme.md")
}

fn has_license(files: &[FileEntry]) -> bool {
    files.iter().any(|f| f.lower_path().contains("license"))
}

/// Baseline 100 minus penalties for large files, missing tests, README and
/// license, and very large repositories.
pub fn calculate_health_score(files: &[FileEntry], large_count: usize) -> u8 {
    let mut score: i32 = 100;

    if large_count > 10 {
        score -= 20;
    } else if large_count > 5 {
        score -= 10;
    }
    if !files.iter().any(|f| f.path.contains("test")) {
        score -= 15;
    }
    if !has_readme(files) {
        score -= 10;
    }
    if !has_license(files) {
        score -= 5;
    }
    if files.len() > 1000 {
        score -= 10;
    }

    score.clamp(0, 100) as u8
}

/// Concrete suggestions for the penalties `calculate_health_score` applies,
/// plus a missing .gitignore.
pub fn health_tips(files: &[FileEntry], large_count: usize) -> Vec<&'static str> {
    let mut tips = Vec::new();

    if large_count > 10 {
        tips.push("Split large files into smaller modules");
    } else if large_count > 5 {
        tips.push("Consider refactoring some large files");
    }

    let has_tests = files.iter().any(|f| {
        f.path.contains("test") || f.path.contains("spec") || f.path.contains("__tests__")
    });
    if !has_tests {
        tips.push("Add test coverage to improve reliability");
    }
    if !has_readme(files) {
        tips.push("Add a README.md with project documentation");
    }
    if !has_license(files) {
        tips.push("Add a LICENSE file for legal clarity");
    }
    if files.len() > 1000 {
        tips.push("Consider archiving or removing unused files");
    }
    if !files.iter().any(|f| f.path == ".gitignore") {
        tips.push("Add .gitignore to exclude unnecessary files");
    }

    tips
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityBand {
    Low,
    Moderate,
    High,
}

impl ComplexityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => ComplexityBand::Low,
            30..=59 => ComplexityBand::Moderate,
            _ => ComplexityBand::High,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ComplexityBand::Low => "Low complexity - easy to maintain",
            ComplexityBand::Moderate => "Moderate complexity",
            ComplexityBand::High => "High complexity - may need refactoring",
        }
    }
}

/// Structural complexity from nesting depth, large files and file count.
pub fn calculate_complexity_score(files: &[FileEntry]) -> u8 {
    let deep = files.iter().filter(|f| f.depth() > 5).count();
    let large = files.iter().filter(|f| f.size > LARGE_FILE_BYTES).count();
    let mut score = 0u8;

    score += match deep {
        51.. => 30,
        21..=50 => 15,
        _ => 0,
    };
    score += match large {
        11.. => 30,
        6..=10 => 15,
        _ => 0,
    };
    score += match files.len() {
        1001.. => 20,
        501..=1000 => 10,
        _ => 0,
    };

    score.min(100)
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CodeMetrics {
    /// Total size divided by 50 bytes per line.
    pub estimated_lines: u64,
    pub code_files: usize,
    pub avg_file_size: u64,
    /// Commit counts keyed by `YYYY-MM`.
    pub commits_by_month: BTreeMap<String, usize>,
    pub avg_commits_per_month: usize,
    pub complexity: u8,
}

impl CodeMetrics {
    pub fn complexity_band(&self) -> ComplexityBand {
        ComplexityBand::from_score(self.complexity)
    }
}

pub fn calculate_code_metrics(files: &[FileEntry], commits: &[Commit]) -> CodeMetrics {
    let total: u64 = files.iter().map(|f| f.size).sum();

    let mut commits_by_month: BTreeMap<String, usize> = BTreeMap::new();
    for date in commits.iter().filter_map(Commit::date) {
        *commits_by_month
            .entry(date.format("%Y-%m").to_string())
            .or_default() += 1;
    }
    let dated: usize = commits_by_month.values().sum();
    let avg_commits_per_month = if commits_by_month.is_empty() {
        0
    } else {
        (dated as f64 / commits_by_month.len() as f64).round() as usize
    };

    let code: Vec<&FileEntry> = code_files(files).collect();
    let avg_file_size = if code.is_empty() {
        0
    } else {
        (code.iter().map(|f| f.size).sum::<u64>() as f64 / code.len() as f64).round() as u64
    };

    CodeMetrics {
        estimated_lines: (total as f64 / BYTES_PER_LINE).round() as u64,
        code_files: code.len(),
        avg_file_size,
        commits_by_month,
        avg_commits_per_month,
        complexity: calculate_complexity_score(files),
    }
}
