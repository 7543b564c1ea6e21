//! Suite and seed file loading.
//!
//! The format is chosen by extension: `.yaml`/`.yml` or `.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use sonde_domain::Suite;
use thiserror::Error;
use tracing::debug;

use super::json::{SerializationError, from_json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl FileFormat {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Errors raised while loading suites and seed files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The extension is neither YAML nor JSON.
    #[error("unsupported file format for {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat {
        /// Offending file.
        path: PathBuf,
    },

    /// YAML parse or shape error.
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        /// Offending file.
        path: PathBuf,
        /// Parser error, with location.
        source: serde_yaml::Error,
    },

    /// JSON parse or shape error.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// Offending file.
        path: PathBuf,
        /// Parser error, with location.
        source: SerializationError,
    },
}

/// Parses a document in the given format.
///
/// `origin` is only used in error messages.
///
/// # Errors
///
/// Returns `LoadError::Yaml` or `LoadError::Json` if the content does not
/// parse into `T`.
pub fn parse_document<T: DeserializeOwned>(
    content: &str,
    format: FileFormat,
    origin: &Path,
) -> Result<T, LoadError> {
    match format {
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: origin.to_path_buf(),
            source,
        }),
        FileFormat::Json => from_json(content).map_err(|source| LoadError::Json {
            path: origin.to_path_buf(),
            source,
        }),
    }
}

async fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let format = FileFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    parse_document(&content, format, path)
}

/// Loads a suite file.
///
/// # Errors
///
/// Returns `LoadError` if the file cannot be read or parsed.
pub async fn load_suite(path: impl AsRef<Path>) -> Result<Suite, LoadError> {
    let path = path.as_ref();
    let suite: Suite = load_document(path).await?;
    debug!(
        path = %path.display(),
        suite = %suite.name,
        scenarios = suite.scenarios.len(),
        "loaded suite"
    );
    Ok(suite)
}

/// Loads a seed fixture file: a mapping from variable name to value.
///
/// # Errors
///
/// Returns `LoadError` if the file cannot be read or is not a mapping.
pub async fn load_seeds(path: impl AsRef<Path>) -> Result<BTreeMap<String, Value>, LoadError> {
    let path = path.as_ref();
    let seeds: BTreeMap<String, Value> = load_document(path).await?;
    debug!(path = %path.display(), seeds = seeds.len(), "loaded seeds");
    Ok(seeds)
}
