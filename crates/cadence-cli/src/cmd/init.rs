//! `cad init` — create the `.cadence/` schedule skeleton.

use crate::output::{OutputMode, render_confirmation};
use anyhow::{Context as _, Result};
use cadence_core::error::{CadenceError, ErrorCode};
use cadence_core::storage::Store;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.cadence/` already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[calendar]\n\
    default_view = \"month\"\n\
    \n\
    [completions]\n\
    allow_duplicates = false\n";

/// Execute `cad init`. Creates the project skeleton:
///
/// ```text
/// .cadence/
///   store/
///     tasks.json          (ordered task list)
///     completions.json    (append-only completion log)
///     task_status.json    (per-task completed-by/verified-by names)
///   config.toml           (default project config template)
/// ```
///
/// # Errors
///
/// Returns an error if `.cadence/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(
    args: &InitArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> Result<()> {
    let cadence_dir = project_root.join(".cadence");

    if cadence_dir.exists() && !args.force {
        return Err(CadenceError::with_message(
            ErrorCode::AlreadyInitialized,
            format!("{} already exists", cadence_dir.display()),
        )
        .into());
    }

    Store::initialize(project_root).with_context(|| {
        format!(
            "Failed to create store directory under {}",
            cadence_dir.display()
        )
    })?;

    let config_path = cadence_dir.join("config.toml");
    std::fs::write(&config_path, CONFIG_TOML)
        .with_context(|| format!("Failed to write config template: {}", config_path.display()))?;

    render_confirmation(output, quiet, "Initialized empty schedule in .cadence/")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CONFIG_TOML;

    #[test]
    fn config_template_parses_with_defaults() {
        let config: cadence_core::config::ProjectConfig =
            toml::from_str(CONFIG_TOML).expect("template must stay valid toml");
        assert!(!config.completions.allow_duplicates);
    }
}
