//! The `unitdrill normalize` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::DataArgs;

pub fn execute(output: Option<PathBuf>, source: DataArgs) -> Result<()> {
    let (_, dataset) = source.load()?;
    let json = serde_json::to_string_pretty(&dataset)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} unit(s) to {}",
                dataset.units.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
