//! Library-pair configuration.
//!
//! `config.json` holds a list of pairs to process. `newLibrary` may be
//! omitted to run extraction-only (bootstrap a mapping file before the new
//! library exists).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LibraryConfig {
    /// Maven coordinates of the library whose async clients are migrated away from.
    pub old_library: String,

    /// Maven coordinates of the replacement library, when it exists.
    #[serde(default)]
    pub new_library: Option<String>,

    /// Explicit old-client → new-client pairings, consulted before the
    /// naming convention.
    #[serde(default)]
    pub client_mappings: BTreeMap<String, String>,
}

pub fn load_config(path: &Path) -> Result<Vec<LibraryConfig>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let configs: Vec<LibraryConfig> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    for config in &configs {
        if config.old_library.trim().is_empty() {
            bail!("config {}: oldLibrary must not be empty", path.display());
        }
    }
    Ok(configs)
}
