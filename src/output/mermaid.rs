use crate::model::{AnalysisResult, FileEntry};
use crate::output::OutputFormatter;
use std::io::Write;

const PREVIEW_FILES: usize = 3;
const DETAILED_FOLDERS: usize = 5;

/// Mermaid flowchart of the repository layout.
pub struct MermaidOutput {
    detailed: bool,
}

impl MermaidOutput {
    /// Category overview, top-down.
    pub fn overview() -> Self {
        Self { detailed: false }
    }

    /// Top-level folders and their first files, left to right.
    pub fn detailed() -> Self {
        Self { detailed: true }
    }
}

impl OutputFormatter for MermaidOutput {
    fn format<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> std::io::Result<()> {
        let diagram = if self.detailed {
            detailed_diagram(&result.files)
        } else {
            overview_diagram(result)
        };
        write!(writer, "{}", diagram)
    }
}

fn node_label(file: &FileEntry) -> String {
    file.name().replace('.', "_")
}

fn safe_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn overview_diagram(result: &AnalysisResult) -> String {
    let categories = &result.categorized;
    let mut diagram = String::from("graph TD\n");
    diagram.push_str("    Root[Repository]\n");

    let groups: [(&[FileEntry], &str, &str, char); 3] = [
        (&categories.frontend, "Frontend", "Frontend", 'F'),
        (&categories.backend, "Backend", "Backend", 'B'),
        (&categories.config, "Config", "Configuration", 'C'),
    ];
    for (files, id, label, prefix) in groups {
        if files.is_empty() {
            continue;
        }
        diagram.push_str(&format!("    Root --> {}[{}]\n", id, label));
        for (idx, file) in files.iter().take(PREVIEW_FILES).enumerate() {
            diagram.push_str(&format!(
                "    {} --> {}{}[{}]\n",
                id,
                prefix,
                idx,
                node_label(file)
            ));
        }
    }

    if !categories.tests.is_empty() {
        diagram.push_str("    Root --> Tests[Tests]\n");
    }
    if !categories.docs.is_empty() {
        diagram.push_str("    Root --> Docs[Documentation]\n");
    }

    diagram.push_str("\n    classDef frontend fill:#61dafb\n");
    diagram.push_str("    classDef backend fill:#3fb950\n");
    diagram.push_str("    classDef config fill:#d29922\n");
    diagram.push_str("    class Frontend frontend\n");
    diagram.push_str("    class Backend backend\n");
    diagram.push_str("    class Config config\n");
    diagram
}

/// Files nested at least one folder deep, grouped by their top-level folder
/// in order of first appearance.
pub fn detailed_diagram(files: &[FileEntry]) -> String {
    let mut folders: Vec<(&str, Vec<&FileEntry>)> = Vec::new();
    for file in files {
        let Some((folder, _)) = file.path.split_once('/') else {
            continue;
        };
        match folders.iter_mut().find(|(name, _)| *name == folder) {
            Some((_, list)) => list.push(file),
            None => folders.push((folder, vec![file])),
        }
    }

    let mut diagram = String::from("graph LR\n");
    for (folder, list) in folders.iter().take(DETAILED_FOLDERS) {
        let id = safe_id(folder);
        diagram.push_str(&format!("    {}[{}]\n", id, folder));
        for (idx, file) in list.iter().take(PREVIEW_FILES).enumerate() {
            diagram.push_str(&format!("    {} --> {}_{}[{}]\n", id, id, idx, file.name()));
        }
    }
    diagram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_result;

    #[test]
    fn test_overview_diagram() {
        let diagram = overview_diagram(&sample_result());
        let expected = "graph TD
    Root[Repository]
    Root --> Frontend[Frontend]
    Frontend --> F0[index_js]
    Frontend --> F1[App_jsx]
    Frontend --> F2[Header_jsx]
    Root --> Backend[Backend]
    Backend --> B0[models_py]
    Root --> Config[Configuration]
    Config --> C0[package_json]
    Root --> Docs[Documentation]

    classDef frontend fill:#61dafb
    classDef backend fill:#3fb950
    classDef config fill:#d29922
    class Frontend frontend
    class Backend backend
    class Config config
";
        assert_eq!(diagram, expected);
    }

    #[test]
    fn test_detailed_diagram() {
        let diagram = detailed_diagram(&sample_result().files);
        let expected = "graph LR
    src[src]
    src --> src_0[index.js]
    src --> src_1[App.jsx]
    src --> src_2[Header.jsx]
    server[server]
    server --> server_0[api.js]
    server --> server_1[models.py]
    docs[docs]
    docs --> docs_0[guide.md]
";
        assert_eq!(diagram, expected);
    }

    #[test]
    fn test_detailed_caps_folders_and_sanitizes_ids() {
        let files: Vec<FileEntry> = (0..7)
            .map(|i| FileEntry::new(format!("my-dir.{}/a.rs", i), 1))
            .collect();
        let diagram = detailed_diagram(&files);
        assert_eq!(diagram.matches("[my-dir.").count(), 5);
        assert!(diagram.contains("    my_dir_0[my-dir.0]\n"));
        assert!(diagram.contains("    my_dir_0 --> my_dir_0_0[a.rs]\n"));
        assert!(!diagram.contains("my-dir.5"));
    }

    #[test]
    fn test_empty_repository() {
        assert_eq!(detailed_diagram(&[]), "graph LR\n");
    }
}
