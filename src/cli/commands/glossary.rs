use anyhow::{Context, Result};
use chrono::Utc;

use super::{
    CommandResult, CommandSummary, GlossarySummary,
    helper::{finish, load_catalog, load_context, load_glossary},
};
use crate::{
    cli::args::GlossaryCommand,
    core::{glossary::curate, persist::write_json_atomic},
};

const TOP_TERMS: usize = 10;

pub fn glossary(cmd: GlossaryCommand) -> Result<CommandResult> {
    let ctx = load_context(&cmd.common)?;
    let catalog = load_catalog(&ctx)?;
    let definition = load_glossary(&ctx)?
        .with_context(|| format!("No glossary at {}", ctx.glossary_path().display()))?;

    let report = curate(&definition, &catalog, Utc::now()).context("Invalid glossary term")?;
    let path = ctx.curation_path();
    write_json_atomic(&path, &report)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(finish(
        CommandSummary::Glossary(GlossarySummary {
            path,
            total_terms: report.total_terms,
            top_terms: report
                .terms
                .iter()
                .take(TOP_TERMS)
                .map(|t| (t.term.clone(), t.occurrences))
                .collect(),
            unused_terms: report.unused_terms,
        }),
        Vec::new(),
        true,
    ))
}
