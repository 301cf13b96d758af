use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "http://localhost:8000";

pub struct Config {
    pub data_dir: PathBuf,
    pub filter_state_path: PathBuf,
    pub api_base: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "barkeep").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let filter_state_path = data_dir.join("filter-state.json");

        let api_base = std::env::var("BARKEEP_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            data_dir,
            filter_state_path,
            api_base,
        })
    }
}
