//! The `unitdrill units` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use unitdrill_core::model::Dataset;

use super::DataArgs;

pub fn execute(source: DataArgs) -> Result<()> {
    let (_, dataset) = source.load()?;

    if dataset.is_empty() {
        println!("No units found in vocabulary.");
        return Ok(());
    }

    println!("{}", units_table(&dataset));
    println!(
        "{} unit(s), {} word(s).",
        dataset.units.len(),
        dataset.word_count()
    );
    Ok(())
}

/// Render the unit chooser as a table.
pub fn units_table(dataset: &Dataset) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Unit", "Words"]);
    for choice in dataset.choices() {
        table.add_row(vec![Cell::new(choice.label), Cell::new(choice.word_count)]);
    }
    table
}
