//! The `unitdrill validate` command.

use anyhow::Result;

use unitdrill_core::loader::load_document;
use unitdrill_core::normalizer::normalize;
use unitdrill_core::validate::{validate_dataset, validate_document};

use super::DataArgs;

pub fn execute(source: DataArgs) -> Result<()> {
    let config = source.config()?;
    let raw = load_document(&config.data)?;
    let dataset = normalize(&raw);

    println!(
        "Vocabulary: {} ({} units, {} words)",
        config.data.display(),
        dataset.units.len(),
        dataset.word_count()
    );

    let mut warnings = validate_document(&raw);
    warnings.extend(validate_dataset(&dataset));
    for w in &warnings {
        let prefix = w
            .unit_id
            .map(|id| format!("  [#{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Vocabulary valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
