//! Artifact file parsing.
//!
//! Artifact documents are YAML by convention, with JSON and TOML accepted for
//! inline-declared sources. Everything normalizes to a JSON mapping so the
//! rest of the crate is format-agnostic.

use std::ffi::OsStr;
use std::path::Path;

use serde_json::Value;

use crate::error::{ComplianceError, ComplianceResult};

/// Parsed artifact content: a mapping of string keys to JSON values.
pub type ArtifactData = serde_json::Map<String, Value>;

/// Read and parse an artifact file, dispatching on its extension.
///
/// `.json` and `.toml` parse as those formats; everything else (including
/// `.yml`/`.yaml` and extension-less files) parses as YAML.
pub fn parse_artifact_file(path: &Path) -> ComplianceResult<ArtifactData> {
    let content = std::fs::read_to_string(path).map_err(|source| ComplianceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_artifact_str(&content, path)
}

/// Parse artifact content already read from `path`.
pub fn parse_artifact_str(content: &str, path: &Path) -> ComplianceResult<ArtifactData> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    let value: Value = match extension.as_deref() {
        Some("json") => serde_json::from_str(content).map_err(|err| parse_error(path, err))?,
        Some("toml") => {
            let document: toml::Value =
                toml::from_str(content).map_err(|err| parse_error(path, err))?;
            serde_json::to_value(document).map_err(|err| parse_error(path, err))?
        }
        _ => serde_yaml::from_str(content).map_err(|err| parse_error(path, err))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ComplianceError::Parse {
            path: path.display().to_string(),
            reason: format!("expected a mapping document, got {}", json_type_name(&other)),
        }),
    }
}

/// Derive an artifact identity from a filename: the base name without its
/// extension.
pub(crate) fn file_identity(path: &Path) -> ComplianceResult<String> {
    path.file_stem()
        .and_then(OsStr::to_str)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ComplianceError::InvalidArtifactPath {
            path: path.display().to_string(),
        })
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> ComplianceError {
    ComplianceError::Parse {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
