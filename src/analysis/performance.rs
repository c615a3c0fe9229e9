//! Bundle-size and dependency-weight heuristics.

use super::dependencies::DependencyMap;
use super::pattern;
use crate::model::FileEntry;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static BUNDLE_FILE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\.(js|jsx|ts|tsx|css|scss|sass|json)$"));
static IMPORTING_FILE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\.(js|jsx|ts|tsx|py|dart|rs)$"));

const LARGE_BUNDLE_FILE: u64 = 50_000;
const LARGEST_LIMIT: usize = 10;
const UNUSED_LIMIT: usize = 5;

/// Approximate minified sizes of well-known heavy packages.
const HEAVY_PACKAGES: &[(&str, &str)] = &[
    ("moment", "~300KB"),
    ("lodash", "~70KB"),
    ("axios", "~15KB"),
    ("react", "~40KB"),
    ("vue", "~90KB"),
    ("angular", "~500KB"),
    ("jquery", "~90KB"),
    ("bootstrap", "~150KB"),
    ("@material-ui/core", "~300KB"),
    ("antd", "~1.2MB"),
    ("chart.js", "~200KB"),
];

const ALTERNATIVES: &[(&str, &str)] = &[
    ("moment", "date-fns or dayjs"),
    ("lodash", "lodash-es or native ES6"),
    ("jquery", "Vanilla JS"),
    ("bootstrap", "Tailwind CSS"),
    ("@material-ui/core", "Headless UI or Radix"),
    ("antd", "Shadcn/ui"),
    ("chart.js", "Recharts or Victory"),
];

const DEFAULT_ALTERNATIVE: &str = "Check bundlephobia.com";

pub fn alternative_for(package: &str) -> &'static str {
    ALTERNATIVES
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, alt)| *alt)
        .unwrap_or(DEFAULT_ALTERNATIVE)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BundleFile {
    pub path: String,
    pub size: u64,
    /// Share of the total bundle size, one decimal place.
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BundleSize {
    pub total: u64,
    pub by_type: BTreeMap<String, u64>,
    pub largest: Vec<BundleFile>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeavyDependency {
    pub name: String,
    pub size: String,
    pub alternative: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PerformanceMetrics {
    pub bundle_size: BundleSize,
    /// Dependency names never seen in a source path.
    pub unused_deps: Vec<String>,
    pub heavy_deps: Vec<HeavyDependency>,
}

fn is_bundle_file(file: &FileEntry) -> bool {
    BUNDLE_FILE.is_match(&file.path)
        && !file.path.contains("node_modules")
        && !file.path.contains("test")
        && !file.path.contains("spec")
}

pub fn calculate_performance_metrics(
    files: &[FileEntry],
    deps: &DependencyMap,
) -> PerformanceMetrics {
    let mut bundle = BundleSize::default();
    let bundle_files: Vec<&FileEntry> = files.iter().filter(|f| is_bundle_file(f)).collect();

    for file in &bundle_files {
        let ext = file.extension().unwrap_or_default();
        bundle.total += file.size;
        *bundle.by_type.entry(ext).or_default() += file.size;
    }

    let mut large: Vec<&FileEntry> = bundle_files
        .iter()
        .copied()
        .filter(|f| f.size > LARGE_BUNDLE_FILE)
        .collect();
    large.sort_by(|a, b| b.size.cmp(&a.size));
    bundle.largest = large
        .into_iter()
        .take(LARGEST_LIMIT)
        .map(|f| BundleFile {
            path: f.path.clone(),
            size: f.size,
            percentage: (f.size as f64 / bundle.total as f64 * 1000.0).round() / 10.0,
        })
        .collect();

    let scanned: Vec<_> = deps.scanned().collect();

    let mut unused_deps = Vec::new();
    if !scanned.is_empty() {
        let code_paths = files
            .iter()
            .filter(|f| IMPORTING_FILE.is_match(&f.path))
            .map(FileEntry::lower_path)
            .collect::<Vec<_>>()
            .join(" ");

        unused_deps = scanned
            .iter()
            .filter(|d| !code_paths.contains(&d.name.to_lowercase().replace('-', "")))
            .take(UNUSED_LIMIT)
            .map(|d| d.name.clone())
            .collect();
    }

    let heavy_deps = scanned
        .iter()
        .filter_map(|d| {
            HEAVY_PACKAGES
                .iter()
                .find(|(name, _)| *name == d.name)
                .map(|(name, size)| HeavyDependency {
                    name: name.to_string(),
                    size: size.to_string(),
                    alternative: alternative_for(name).to_string(),
                })
        })
        .collect();

    PerformanceMetrics {
        bundle_size: bundle,
        unused_deps,
        heavy_deps,
    }
}
