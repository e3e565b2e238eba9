//! Scan inputs and their per-run collection.
//!
//! An input file is a key/value mapping merged into the scanner's global
//! input map. Its identity is the filename without extension. Inline inputs
//! declared directly in policy code bypass the artifact list and accumulate
//! in a separate raw map.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::collection::{Collection, Selectable};
use crate::error::ComplianceResult;
use crate::events::{ArtifactKind, EventSink};
use crate::parse::{file_identity, parse_artifact_file, ArtifactData};

/// An input file discovered in a content unit.
#[derive(Debug, Clone)]
pub struct Input {
    identity_name: String,
    origin_unit: String,
    source_path: PathBuf,
    payload: ArtifactData,
    enabled: bool,
}

impl Input {
    /// Construct an input from parsed document data.
    ///
    /// The identity is derived from the filename; fails when none can be.
    pub fn from_map(
        payload: ArtifactData,
        path: impl Into<PathBuf>,
        unit: impl Into<String>,
    ) -> ComplianceResult<Self> {
        let source_path = path.into();
        let identity_name = file_identity(&source_path)?;

        Ok(Self {
            identity_name,
            origin_unit: unit.into(),
            source_path,
            payload,
            enabled: false,
        })
    }

    /// Read and construct an input from its document file.
    pub fn from_file(path: impl AsRef<Path>, unit: impl Into<String>) -> ComplianceResult<Self> {
        let path = path.as_ref();
        let payload = parse_artifact_file(path)?;
        Self::from_map(payload, path, unit)
    }

    /// The raw input mapping.
    pub fn payload(&self) -> &ArtifactData {
        &self.payload
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

impl Selectable for Input {
    type Export = ArtifactData;
    const KIND: ArtifactKind = ArtifactKind::Input;
    const NOTIFIES_ON_ENABLE: bool = true;

    fn identity_name(&self) -> &str {
        &self.identity_name
    }

    fn origin_unit(&self) -> &str {
        &self.origin_unit
    }

    fn source_path(&self) -> Option<&Path> {
        Some(&self.source_path)
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn export(&self) -> ArtifactData {
        self.payload.clone()
    }
}

/// Argument to [`InputCollection::include_input`]: a selector string or an
/// inline mapping.
#[derive(Debug, Clone)]
pub enum InputSource {
    Selector(String),
    Inline(ArtifactData),
}

impl From<&str> for InputSource {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for InputSource {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ArtifactData> for InputSource {
    fn from(map: ArtifactData) -> Self {
        Self::Inline(map)
    }
}

/// Ordered set of input files for one run, plus the raw inline map.
#[derive(Debug)]
pub struct InputCollection {
    inner: Collection<Input>,
    raw: ArtifactData,
}

impl InputCollection {
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            inner: Collection::new(events),
            raw: ArtifactData::new(),
        }
    }

    /// Load an input file from `path`, attributing it to `unit`.
    pub fn from_file(&mut self, path: impl AsRef<Path>, unit: &str) -> ComplianceResult<()> {
        let input = Input::from_file(path, unit)?;
        self.inner.push(input);
        Ok(())
    }

    /// Append an already-constructed input.
    pub fn push(&mut self, input: Input) {
        self.inner.push(input);
    }

    /// Enable input files matching a selector, or merge an inline mapping
    /// into the raw map (later keys overwrite earlier ones).
    pub fn include_input(&mut self, source: impl Into<InputSource>) -> ComplianceResult<()> {
        match source.into() {
            InputSource::Selector(selector) => {
                self.inner.enable_matching(&selector)?;
            }
            InputSource::Inline(map) => {
                for (key, value) in map {
                    self.raw.insert(key, value);
                }
            }
        }
        Ok(())
    }

    /// Enabled input mappings in load order. The raw map is not included;
    /// see [`InputCollection::merged`].
    pub fn export_enabled(&self) -> Vec<ArtifactData> {
        self.inner.export_enabled()
    }

    /// Inline inputs accumulated so far.
    pub fn raw(&self) -> &ArtifactData {
        &self.raw
    }

    /// Single merged input map: enabled file inputs folded in load order,
    /// then the raw inline map, with later keys overwriting earlier ones.
    pub fn merged(&self) -> ArtifactData {
        let mut merged = ArtifactData::new();
        for payload in self.export_enabled() {
            for (key, value) in payload {
                merged.insert(key, value);
            }
        }
        for (key, value) in &self.raw {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Input> {
        self.inner.iter()
    }
}
