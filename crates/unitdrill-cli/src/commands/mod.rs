//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use unitdrill_core::config::{load_config_from, DrillConfig};
use unitdrill_core::loader::load_dataset;
use unitdrill_core::model::Dataset;

pub mod drill;
pub mod init;
pub mod normalize;
pub mod units;
pub mod validate;

/// Where to find the vocabulary file.
#[derive(Debug, Clone, Default, Args)]
pub struct DataArgs {
    /// Vocabulary JSON file (overrides config and UNITDRILL_DATA)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl DataArgs {
    /// Resolve the effective configuration, applying `--data` last.
    pub fn config(&self) -> Result<DrillConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(data) = &self.data {
            config.data = data.clone();
        }
        Ok(config)
    }

    /// Resolve configuration and load the vocabulary it points at.
    pub fn load(&self) -> Result<(DrillConfig, Dataset)> {
        let config = self.config()?;
        let dataset = load_dataset(&config.data)?;
        Ok((config, dataset))
    }
}
