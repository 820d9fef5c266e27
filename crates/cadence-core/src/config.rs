use crate::calendar::CalendarView;
use crate::error::{CadenceError, ErrorCode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project-level configuration, read from `.cadence/config.toml`. Every
/// field has a default so a missing or partial file behaves sensibly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub completions: CompletionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// View used when `cad calendar` is run without `--view`.
    #[serde(default)]
    pub default_view: CalendarView,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Permit re-completing an occurrence that already has a log record.
    /// Off by default; duplicates make completion status ambiguous.
    #[serde(default)]
    pub allow_duplicates: bool,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".cadence/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content).map_err(|err| {
        CadenceError::with_message(
            ErrorCode::ConfigParseError,
            format!("{}: {err}", path.display()),
        )
        .into()
    })
}
