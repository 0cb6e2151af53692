//! Source-list configuration.
//!
//! A run is configured by a JSON array of records, one per source file:
//!
//! ```json
//! [
//!   {
//!     "file": "src/a.x",
//!     "defines": ["DEBUG"],
//!     "includes": ["include"],
//!     "extraArgs": []
//!   }
//! ]
//! ```
//!
//! All lists default to empty. Configuration errors are fatal to the whole
//! run: there is no partial-config recovery.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or does not match the schema.
    #[error("cannot parse config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the indexer needs to know about one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceFileInfo {
    /// Path of the file to index.
    pub file: String,
    /// Preprocessor defines; each becomes a `-D<name>` flag.
    pub defines: Vec<String>,
    /// Include directories; each becomes an `-I<dir>` flag.
    pub includes: Vec<String>,
    /// Extra flags passed through to the front end verbatim.
    pub extra_args: Vec<String>,
}

impl SourceFileInfo {
    /// A config entry with just a path and no flags.
    pub fn with_path(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Flattens the per-file options into the front-end flag list:
    /// `-D<define>...`, then `-I<include>...`, then the extras verbatim.
    pub fn front_end_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(
            self.defines.len() + self.includes.len() + self.extra_args.len(),
        );
        for define in &self.defines {
            args.push(format!("-D{define}"));
        }
        for include in &self.includes {
            args.push(format!("-I{include}"));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Loads the ordered source list from a JSON config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Vec<SourceFileInfo>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}
