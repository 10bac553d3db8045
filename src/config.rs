use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub geojson: PathBuf,
    pub name_property: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_url: cli.api_url.clone(),
            geojson: cli.geojson.clone(),
            name_property: cli.name_property.clone(),
            log_file: cli.log_file.clone(),
        }
    }

    /// Log file for the dashboard, which cannot log to the terminal it draws on
    pub fn dashboard_log_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("ee", "", "iive-map")
            .context("Could not determine data directory")?;
        let dir = proj_dirs.data_local_dir();
        fs::create_dir_all(dir).context("Failed to create data directory")?;
        Ok(dir.join("iive-map.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_log_file_wins() {
        let cli = Cli::try_parse_from(["iive-map", "--log-file", "/tmp/x.log"]).unwrap();
        let settings = Settings::from_cli(&cli);
        assert_eq!(
            settings.dashboard_log_file().unwrap(),
            PathBuf::from("/tmp/x.log")
        );
    }
}
