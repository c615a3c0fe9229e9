use crate::analysis::{CodeMetrics, DependencyMap, RepoStats, TechStack};
use crate::model::{AnalysisResult, SecurityIssue};
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

pub struct JsonOutput {
    full: bool,
}

impl JsonOutput {
    /// The exported report: stats, metrics, dependencies, security and
    /// tech stack.
    pub fn summary() -> Self {
        Self { full: false }
    }

    /// Every field of the analysis.
    pub fn full() -> Self {
        Self { full: true }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::summary()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    repository: String,
    analyzed_at: DateTime<Utc>,
    stats: &'a RepoStats,
    metrics: &'a CodeMetrics,
    dependencies: &'a DependencyMap,
    security: &'a [SecurityIssue],
    tech_stack: &'a TechStack,
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        let json = if self.full {
            serde_json::to_string_pretty(result)
        } else {
            serde_json::to_string_pretty(&JsonReport {
                repository: result.repo.to_string(),
                analyzed_at: Utc::now(),
                stats: &result.stats,
                metrics: &result.metrics,
                dependencies: &result.dependencies,
                security: &result.security,
                tech_stack: &result.tech_stack,
            })
        }
        .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}
