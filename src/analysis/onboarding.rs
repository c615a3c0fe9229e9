use super::classify::{CategorizedFiles, KeyFile, KeyFileRole};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OnboardingStep {
    pub title: String,
    /// File or folder to look at, or a free-text hint for the fallback step.
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl OnboardingStep {
    fn new(title: &str, file: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            file: file.into(),
            command: None,
        }
    }
}

fn install_command(config: &KeyFile) -> &'static str {
    match config.name.as_str() {
        "package.json" => "npm install",
        "pubspec.yaml" => "flutter pub get",
        "requirements.txt" => "pip install -r requirements.txt",
        "cargo.toml" => "cargo build",
        "go.mod" => "go mod download",
        _ => "Check configuration file",
    }
}

/// Getting-started steps: install from the first manifest, open the entry
/// point, then explore the top folder of the main code.
pub fn generate_onboarding_steps(
    key_files: &[KeyFile],
    categorized: &CategorizedFiles,
) -> Vec<OnboardingStep> {
    let mut steps = Vec::new();

    if let Some(config) = key_files.iter().find(|k| k.role.is_config()) {
        let mut step = OnboardingStep::new("Install Dependencies", &config.path);
        step.command = Some(install_command(config).to_string());
        steps.push(step);
    }

    if let Some(entry) = key_files.iter().find(|k| k.role == KeyFileRole::EntryPoint) {
        steps.push(OnboardingStep::new("Explore Entry Point", &entry.path));
    }

    let main_code = categorized
        .frontend
        .first()
        .or_else(|| categorized.backend.first());
    if let Some(file) = main_code {
        let folder = file.path.split('/').next().unwrap_or_default();
        steps.push(OnboardingStep::new("Explore Main Code", format!("{}/", folder)));
    }

    if steps.is_empty() {
        steps.push(OnboardingStep::new(
            "Browse Repository",
            "Explore the files in the tree tab",
        ));
    }
    steps
}
