//! Prompt catalog: the read-only set of prompt records behind every view.
//!
//! DESIGN
//! ======
//! The catalog is loaded once at startup, either from the embedded demo
//! dataset or from a JSON file named by `PROMPTS_PATH`, and shared behind an
//! `Arc` afterwards. Nothing mutates it. Records that omit `includes` get
//! them from the `# Imports` section of their prompt text.

pub mod imports;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ErrorCode;

const DEMO_PROMPTS: &str = include_str!("../../data/prompts.json");
const DEMO_PRD: &str = include_str!("../../data/prd.md");

const PROMPT_SUFFIX: &str = ".prompt";

// =============================================================================
// TYPES
// =============================================================================

/// The four text artifacts associated with one prompt record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevUnit {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub test: String,
}

/// Selects one artifact of a [`DevUnit`]; one tab in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Artifact {
    Prompt,
    Code,
    Example,
    Test,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [Artifact::Prompt, Artifact::Code, Artifact::Example, Artifact::Test];
}

/// A named unit of prompt text plus the ids of the prompts it includes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptRecord {
    pub id: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default, alias = "devUnit")]
    pub dev_unit: DevUnit,
}

#[cfg(test)]
impl PromptRecord {
    pub fn new(id: impl Into<String>, includes: &[&str]) -> Self {
        Self {
            id: id.into(),
            includes: includes.iter().map(|s| (*s).to_owned()).collect(),
            dev_unit: DevUnit::default(),
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.dev_unit.prompt = prompt.into();
        self
    }
}

/// Dataset file shape. `includes` is optional so it can be derived.
#[derive(Deserialize)]
struct RecordFile {
    id: String,
    includes: Option<Vec<String>>,
    #[serde(default, alias = "devUnit")]
    dev_unit: DevUnit,
}

impl From<RecordFile> for PromptRecord {
    fn from(file: RecordFile) -> Self {
        let includes = file
            .includes
            .unwrap_or_else(|| imports::scan_imports(&file.dev_unit.prompt));
        Self { id: file.id, includes, dev_unit: file.dev_unit }
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid prompt dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_CATALOG_IO",
            Self::Parse(_) => "E_CATALOG_PARSE",
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Read-only prompt dataset plus the product requirements document it serves.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<PromptRecord>,
    index: HashMap<String, usize>,
    prd: String,
}

impl Catalog {
    /// Build from records in order. The first record wins for a repeated id.
    #[must_use]
    pub fn new(records: Vec<PromptRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.contains_key(&record.id) {
                warn!(id = %record.id, "catalog: duplicate prompt id ignored in lookup");
                continue;
            }
            index.insert(record.id.clone(), i);
        }
        Self { records, index, prd: String::new() }
    }

    #[must_use]
    pub fn with_prd(mut self, prd: impl Into<String>) -> Self {
        self.prd = prd.into();
        self
    }

    /// Parse a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the JSON is not an array of records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let files: Vec<RecordFile> = serde_json::from_str(json)?;
        Ok(Self::new(files.into_iter().map(PromptRecord::from).collect()))
    }

    /// The embedded demo dataset and PRD.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded dataset is malformed.
    pub fn demo() -> Result<Self, CatalogError> {
        Ok(Self::from_json(DEMO_PROMPTS)?.with_prd(DEMO_PRD))
    }

    /// Load the catalog, falling back to the embedded demo data for any path
    /// that is not given.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be read or parsed.
    pub fn load(prompts_path: Option<&Path>, prd_path: Option<&Path>) -> Result<Self, CatalogError> {
        let mut catalog = match prompts_path {
            Some(path) => Self::from_json(&read_file(path)?)?.with_prd(DEMO_PRD),
            None => Self::demo()?,
        };
        if let Some(path) = prd_path {
            catalog = catalog.with_prd(read_file(path)?);
        }
        if catalog.is_empty() {
            warn!(from_file = prompts_path.is_some(), "catalog: no prompt records loaded");
        }
        info!(prompts = catalog.len(), from_file = prompts_path.is_some(), "catalog loaded");
        Ok(catalog)
    }

    #[must_use]
    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PromptRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    #[must_use]
    pub fn prd(&self) -> &str {
        &self.prd
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })
}

// =============================================================================
// DISPLAY HELPERS
// =============================================================================

/// Last path segment of an id with a trailing `.prompt` removed.
#[must_use]
pub fn label_for(id: &str) -> &str {
    let last = id.rsplit('/').next().unwrap_or(id);
    let label = last.strip_suffix(PROMPT_SUFFIX).unwrap_or(last);
    if label.is_empty() { id } else { label }
}

/// Everything before the last `/`, or `./` when the id has no directory.
#[must_use]
pub fn directory_for(id: &str) -> &str {
    match id.rfind('/') {
        Some(0) | None => "./",
        Some(i) => &id[..i],
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
