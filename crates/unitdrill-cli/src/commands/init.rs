//! The `unitdrill init` command.

use std::path::Path;

use anyhow::Result;

use unitdrill_core::config::CONFIG_FILE;
use unitdrill_core::loader::DEFAULT_DATA_FILE;

pub fn execute() -> Result<()> {
    write_if_absent(Path::new(CONFIG_FILE), SAMPLE_CONFIG)?;
    write_if_absent(Path::new(DEFAULT_DATA_FILE), SAMPLE_WORDS)?;

    println!("\nNext steps:");
    println!("  1. Replace {DEFAULT_DATA_FILE} with your own vocabulary");
    println!("  2. Run: unitdrill validate");
    println!("  3. Run: unitdrill drill");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# unitdrill configuration

# Vocabulary file; ${VAR} references are expanded.
data = "words.json"

# Show how many cards are left in the unit.
show_remaining = true

# Text shown for words without a definition.
definition_placeholder = "(no definition available)"
"#;

const SAMPLE_WORDS: &str = r#"{
  "units": [
    {
      "id": 1,
      "title": "Animals",
      "words": [
        { "w": "cat", "def": "a small domesticated feline" },
        { "w": "owl", "def": "a nocturnal bird of prey" },
        { "word": "otter", "meaning": "a playful aquatic mammal" }
      ]
    },
    {
      "id": "unit-2",
      "words": [
        { "term": "serendipity", "definition": "a fortunate accident" },
        { "term": "ephemeral" }
      ]
    }
  ]
}
"#;
