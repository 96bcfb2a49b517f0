use anyhow::{Context, Result};

use super::{
    CommandResult, CommandSummary, DiffSummary,
    helper::{finish, load_catalog, load_context},
};
use crate::{
    cli::args::DiffCommand,
    core::{
        catalog::{list_snapshots, load_snapshot},
        diff::diff_catalogs,
    },
};

pub fn diff(cmd: DiffCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let current = load_catalog(&ctx)?;
    let snapshot_dir = ctx.snapshot_dir();

    // Default: the newest snapshot older than the current catalog.
    let from = match cmd.from {
        Some(version) => Some(version),
        None => list_snapshots(&snapshot_dir)?
            .into_iter()
            .rev()
            .find(|v| *v < current.meta.version),
    };

    let previous = match &from {
        Some(version) => Some(
            load_snapshot(&snapshot_dir, version)?
                .with_context(|| format!("No snapshot for catalog version {}", version))?,
        ),
        None => None,
    };

    let diff = diff_catalogs(previous.as_ref(), &current);
    Ok(finish(
        CommandSummary::Diff(DiffSummary {
            from,
            to: current.meta.version,
            diff: diff.into(),
            list_all: cmd.all,
        }),
        Vec::new(),
        true,
    ))
}
