use crate::analysis::{Ecosystem, TechCategory};
use crate::model::AnalysisResult;
use crate::output::{OutputFormatter, thousands};
use chrono::{DateTime, Utc};
use std::io::Write;

/// Human-readable repository report.
pub struct MarkdownOutput {
    generated_at: DateTime<Utc>,
}

impl MarkdownOutput {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
        }
    }

    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self { generated_at }
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new()
    }
}

const TECH_SECTIONS: [(TechCategory, &str); 6] = [
    (TechCategory::Frontend, "Frontend"),
    (TechCategory::Backend, "Backend"),
    (TechCategory::Database, "Database"),
    (TechCategory::Devops, "DevOps"),
    (TechCategory::Testing, "Testing"),
    (TechCategory::Mobile, "Mobile"),
];

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        let stats = &result.stats;
        let metrics = &result.metrics;

        writeln!(writer, "# {} - Repository Analysis\n", result.repo)?;
        writeln!(
            writer,
            "Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;

        writeln!(writer, "## Overview\n")?;
        writeln!(
            writer,
            "- **Language**: {}",
            stats.language.as_deref().unwrap_or("Unknown")
        )?;
        writeln!(writer, "- **Stars**: {}", thousands(stats.stars))?;
        writeln!(writer, "- **Forks**: {}", thousands(stats.forks))?;
        writeln!(
            writer,
            "- **Total Files**: {}",
            thousands(stats.total_files as u64)
        )?;
        writeln!(
            writer,
            "- **Health Score**: {}/100 ({})\n",
            stats.health_score,
            stats.health_band().message()
        )?;

        writeln!(writer, "## Code Metrics\n")?;
        writeln!(
            writer,
            "- **Estimated Lines**: {}",
            thousands(metrics.estimated_lines)
        )?;
        writeln!(writer, "- **Code Files**: {}", metrics.code_files)?;
        writeln!(writer, "- **Complexity Score**: {}", metrics.complexity)?;
        writeln!(
            writer,
            "- **Code Quality**: {}/100 ({})\n",
            result.quality.scores.overall,
            result.quality.band().label()
        )?;

        if !result.tech_stack.is_empty() {
            writeln!(writer, "## Tech Stack\n")?;
            for (category, label) in TECH_SECTIONS {
                let names: Vec<_> = result
                    .tech_stack
                    .get(category)
                    .iter()
                    .map(|t| t.name.as_str())
                    .collect();
                if !names.is_empty() {
                    writeln!(writer, "- **{}**: {}", label, names.join(", "))?;
                }
            }
            writeln!(writer)?;
        }

        if !result.key_files.is_empty() {
            writeln!(writer, "## Key Files\n")?;
            for key in &result.key_files {
                writeln!(writer, "- `{}` ({})", key.path, key.role)?;
            }
            writeln!(writer)?;
        }

        if !result.dependencies.is_empty() {
            writeln!(writer, "## Dependencies\n")?;
            for ecosystem in Ecosystem::ALL {
                let deps = result.dependencies.get(ecosystem);
                if deps.is_empty() {
                    continue;
                }
                writeln!(writer, "### {}\n", ecosystem.label())?;
                for dep in deps {
                    let flag = if dep.outdated { " (range)" } else { "" };
                    writeln!(writer, "- {} `{}`{}", dep.name, dep.version, flag)?;
                }
                writeln!(writer)?;
            }
        }

        if !result.security.is_empty() {
            writeln!(writer, "## Security Issues\n")?;
            for issue in &result.security {
                writeln!(
                    writer,
                    "- **[{}]** {}: {}",
                    issue.severity.to_string().to_uppercase(),
                    issue.title,
                    issue.description
                )?;
            }
            writeln!(writer)?;
        }

        if !result.vulnerabilities.is_empty() {
            writeln!(writer, "## Known Vulnerabilities\n")?;
            for vuln in &result.vulnerabilities {
                writeln!(
                    writer,
                    "- **{}** `{}` ({}, affected {}): {}",
                    vuln.package, vuln.version, vuln.cve, vuln.affected, vuln.description
                )?;
            }
            writeln!(writer)?;
        }

        if !result.checklist.is_empty() {
            writeln!(writer, "## Security Checklist\n")?;
            for item in &result.checklist {
                let mark = if item.passed { "x" } else { " " };
                writeln!(writer, "- [{}] {}", mark, item.label)?;
            }
            writeln!(writer)?;
        }

        let docs = &result.documentation;
        writeln!(writer, "## Documentation\n")?;
        writeln!(writer, "- **Score**: {}/100", docs.score)?;
        writeln!(
            writer,
            "- **Documented Files**: {}/{}\n",
            docs.documented_files, docs.total_files
        )?;

        if !result.hotspots.is_empty() {
            writeln!(writer, "## Hotspots\n")?;
            for spot in &result.hotspots {
                writeln!(writer, "- `{}`: {} edits", spot.path, spot.edit_count)?;
            }
            writeln!(writer)?;
        }

        if !result.onboarding.is_empty() {
            writeln!(writer, "## Getting Started\n")?;
            for (i, step) in result.onboarding.iter().enumerate() {
                match &step.command {
                    Some(cmd) => writeln!(
                        writer,
                        "{}. {}: `{}` (`{}`)",
                        i + 1,
                        step.title,
                        step.file,
                        cmd
                    )?,
                    None => writeln!(writer, "{}. {}: `{}`", i + 1, step.title, step.file)?,
                }
            }
        }

        Ok(())
    }
}
