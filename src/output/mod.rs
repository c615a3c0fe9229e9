mod json;
mod markdown;
mod mermaid;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;
pub use mermaid::{MermaidOutput, detailed_diagram, overview_diagram};

use crate::model::AnalysisResult;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()>;
}

/// Downloadable report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportKind {
    Json,
    #[default]
    Markdown,
    Mermaid,
    MermaidDetailed,
}

impl ExportKind {
    /// Suggested file name for the export of `repo`.
    pub fn file_name(self, repo: &str) -> String {
        match self {
            ExportKind::Json => format!("{}-analysis.json", repo),
            ExportKind::Markdown => format!("{}-analysis.md", repo),
            ExportKind::Mermaid => format!("{}-architecture.mmd", repo),
            ExportKind::MermaidDetailed => format!("{}-detailed-structure.mmd", repo),
        }
    }
}

/// Render `result` as `kind` into a string.
pub fn render(result: &AnalysisResult, kind: ExportKind) -> std::io::Result<String> {
    let mut buf = Vec::new();
    match kind {
        ExportKind::Json => JsonOutput::summary().format(result, &mut buf)?,
        ExportKind::Markdown => MarkdownOutput::new().format(result, &mut buf)?,
        ExportKind::Mermaid => MermaidOutput::overview().format(result, &mut buf)?,
        ExportKind::MermaidDetailed => MermaidOutput::detailed().format(result, &mut buf)?,
    }
    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_export_file_names() {
        assert_eq!(ExportKind::Json.file_name("demo"), "demo-analysis.json");
        assert_eq!(
            ExportKind::MermaidDetailed.file_name("demo"),
            "demo-detailed-structure.mmd"
        );
    }
}
