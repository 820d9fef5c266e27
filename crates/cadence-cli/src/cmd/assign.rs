//! `cad assign` — update a task's completed-by / verified-by names.

use crate::output::{OutputMode, render_confirmation};
use anyhow::Result;
use cadence_core::storage::Store;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Task index (as shown by `cad list`).
    pub index: usize,

    /// Name recorded as having completed the task.
    #[arg(long)]
    pub completed_by: Option<String>,

    /// Name recorded as having verified the task.
    #[arg(long)]
    pub verified_by: Option<String>,
}

pub fn run_assign(
    args: &AssignArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> Result<()> {
    if args.completed_by.is_none() && args.verified_by.is_none() {
        anyhow::bail!("nothing to update: pass --completed-by and/or --verified-by");
    }

    let store = Store::open(project_root)?;
    let mut schedule = store.load();
    let names = schedule.set_status_names(
        args.index,
        args.completed_by.clone(),
        args.verified_by.clone(),
    )?;
    let summary = format!(
        "Task {}: completed-by '{}', verified-by '{}'",
        args.index, names.completed_by, names.verified_by
    );
    store.persist(&schedule);

    render_confirmation(output, quiet, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_args_require_index() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AssignArgs,
        }
        let w = Wrapper::parse_from(["test", "2", "--completed-by", "J. Doe"]);
        assert_eq!(w.args.index, 2);
        assert_eq!(w.args.completed_by.as_deref(), Some("J. Doe"));
        assert!(w.args.verified_by.is_none());
    }
}
