use std::{env, fs};

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary, InitSummary, helper::finish};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init() -> Result<CommandResult> {
    let config_path = env::current_dir()
        .context("Failed to read current directory")?
        .join(CONFIG_FILE_NAME);

    let error = if config_path.exists() {
        Some(format!("{} already exists", CONFIG_FILE_NAME))
    } else {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        None
    };

    Ok(finish(
        CommandSummary::Init(InitSummary {
            path: config_path,
            error,
        }),
        Vec::new(),
        true,
    ))
}
