mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use smeta::ledger::Ledger;
use smeta::settings::Settings;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let (config_dir, data_dir) = project_dirs()?;
    let settings = Settings::load(Some(config_dir.as_path()))
        .with_context(|| format!("Failed to load settings from {}", config_dir.display()))?;
    let log_path = smeta::logging::init(&data_dir, &settings.log_level)?;
    info!(log = %log_path.display(), currency = %settings.currency, "smeta starting");

    let mut ledger = Ledger::new();

    match args.len() {
        1 => run::as_tui(&mut ledger, &settings),
        2.. => run::as_cli(&args, &settings),
        _ => {
            eprintln!("Usage: smeta [command]");
            Ok(())
        }
    }
}

fn project_dirs() -> Result<(PathBuf, PathBuf)> {
    let proj_dirs = directories::ProjectDirs::from("com", "smeta", "Smeta")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok((proj_dirs.config_dir().to_path_buf(), data_dir.to_path_buf()))
}
