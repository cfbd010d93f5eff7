//! Sample documents offered on the landing page.
//!
//! Examples are read once from `examples.json` in the resource directory and
//! never change while the server runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the example fixture inside the resource directory
pub const EXAMPLES_FILE: &str = "examples.json";

/// A sample document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: i64,
    pub topic: String,
    pub source_type: String,
    pub title: String,
    /// Where the text was taken from
    pub doc_source: String,
    pub text: String,
}

impl Example {
    /// Menu label, e.g. `Example 1 (covid-news): Masks work`
    pub fn label(&self) -> String {
        format!(
            "Example {} ({}-{}): {}",
            self.id, self.topic, self.source_type, self.title
        )
    }
}

/// Errors loading the example fixture
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read examples file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse examples file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Examples file {} contains no examples", .path.display())]
    Empty { path: PathBuf },
}

/// Non-empty, ordered list of examples
#[derive(Debug, Clone)]
pub struct ExampleSet {
    examples: Vec<Example>,
}

impl ExampleSet {
    /// Wrap a list of examples; `None` if the list is empty
    pub fn new(examples: Vec<Example>) -> Option<Self> {
        if examples.is_empty() {
            None
        } else {
            Some(Self { examples })
        }
    }

    /// Load examples from a JSON file
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let examples: Vec<Example> =
            serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let set = Self::new(examples).ok_or_else(|| FixtureError::Empty {
            path: path.to_path_buf(),
        })?;

        tracing::info!(path = %path.display(), count = set.len(), "Loaded examples");
        Ok(set)
    }

    /// Look up an example by id
    pub fn get(&self, id: i64) -> Option<&Example> {
        self.examples.iter().find(|e| e.id == id)
    }

    pub fn first(&self) -> &Example {
        &self.examples[0]
    }

    /// Example for a requested id, falling back to the first one
    pub fn select(&self, id: Option<i64>) -> &Example {
        id.and_then(|id| self.get(id)).unwrap_or_else(|| self.first())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Example> {
        self.examples.iter()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
