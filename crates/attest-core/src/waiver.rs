//! Scan waivers and their per-run collection.
//!
//! A waiver file maps control names to `{expiration_date, run,
//! justification}` entries and is handed to the scanner as a path reference.
//! Waivers can also be declared inline; [`WaiverEntry`] builds and validates
//! the control mapping for that case.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{json, Value};

use crate::collection::{Collection, Selectable};
use crate::error::{ComplianceError, ComplianceResult};
use crate::events::{ArtifactKind, EventSink};
use crate::parse::{file_identity, parse_artifact_file, ArtifactData};

/// A waiver file discovered in a content unit.
#[derive(Debug, Clone)]
pub struct Waiver {
    identity_name: String,
    origin_unit: String,
    source_path: PathBuf,
    payload: ArtifactData,
    enabled: bool,
}

impl Waiver {
    /// Construct a waiver from parsed document data.
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

    /// Read and construct a waiver from its document file.
    pub fn from_file(path: impl AsRef<Path>, unit: impl Into<String>) -> ComplianceResult<Self> {
        let path = path.as_ref();
        let payload = parse_artifact_file(path)?;
        Self::from_map(payload, path, unit)
    }

    /// The raw control mapping.
    pub fn payload(&self) -> &ArtifactData {
        &self.payload
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

impl Selectable for Waiver {
    type Export = WaiverExport;
    const KIND: ArtifactKind = ArtifactKind::Waiver;
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

    /// The scanner consumes file waivers by path.
    fn export(&self) -> WaiverExport {
        WaiverExport::File(self.source_path.clone())
    }
}

/// Waiver shape handed to the external scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaiverExport {
    /// Path to a waiver file on disk.
    File(PathBuf),
    /// Control mapping built from an inline declaration.
    Inline(ArtifactData),
}

/// Argument to [`WaiverCollection::include_waiver`]: a selector string or an
/// inline control mapping.
#[derive(Debug, Clone)]
pub enum WaiverSource {
    Selector(String),
    Inline(ArtifactData),
}

impl From<&str> for WaiverSource {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for WaiverSource {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ArtifactData> for WaiverSource {
    fn from(map: ArtifactData) -> Self {
        Self::Inline(map)
    }
}

/// Ordered set of waiver files for one run, plus inline control mappings.
#[derive(Debug)]
pub struct WaiverCollection {
    inner: Collection<Waiver>,
    inline: Vec<ArtifactData>,
}

impl WaiverCollection {
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            inner: Collection::new(events),
            inline: Vec::new(),
        }
    }

    /// Load a waiver file from `path`, attributing it to `unit`.
    pub fn from_file(&mut self, path: impl AsRef<Path>, unit: &str) -> ComplianceResult<()> {
        let waiver = Waiver::from_file(path, unit)?;
        self.inner.push(waiver);
        Ok(())
    }

    /// Append an already-constructed waiver.
    pub fn push(&mut self, waiver: Waiver) {
        self.inner.push(waiver);
    }

    /// Enable waiver files matching a selector, or record an inline control
    /// mapping.
    pub fn include_waiver(&mut self, source: impl Into<WaiverSource>) -> ComplianceResult<()> {
        match source.into() {
            WaiverSource::Selector(selector) => {
                self.inner.enable_matching(&selector)?;
            }
            WaiverSource::Inline(map) => {
                self.inline.push(map);
            }
        }
        Ok(())
    }

    /// Enabled file waivers in load order, then inline mappings in
    /// declaration order.
    pub fn export_enabled(&self) -> Vec<WaiverExport> {
        let mut exported = self.inner.export_enabled();
        exported.extend(self.inline.iter().cloned().map(WaiverExport::Inline));
        exported
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waiver> {
        self.inner.iter()
    }
}

/// Builder for an inline waiver declaration.
///
/// Produces the `{control: {expiration_date?, run?, justification}}` mapping
/// the scanner expects. A justification is required; the expiration date,
/// when present, must be a real `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone)]
pub struct WaiverEntry {
    control: String,
    expiration: Option<String>,
    run_test: Option<bool>,
    justification: Option<String>,
}

impl WaiverEntry {
    pub fn new(control: impl Into<String>) -> Self {
        Self {
            control: control.into(),
            expiration: None,
            run_test: None,
            justification: None,
        }
    }

    /// Expiration date in `YYYY-MM-DD` format.
    pub fn expiration(mut self, date: impl Into<String>) -> Self {
        self.expiration = Some(date.into());
        self
    }

    /// Whether the waived control still runs (reported but not failing).
    pub fn run_test(mut self, run: bool) -> Self {
        self.run_test = Some(run);
        self
    }

    /// Reason for the waiver and who signed off on it.
    pub fn justification(mut self, text: impl Into<String>) -> Self {
        self.justification = Some(text.into());
        self
    }

    /// Validate and build the control mapping.
    pub fn build(self) -> ComplianceResult<ArtifactData> {
        let justification = self
            .justification
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ComplianceError::MissingJustification {
                control: self.control.clone(),
            })?;

        if let Some(date) = &self.expiration {
            validate_expiration(&self.control, date)?;
        }

        let mut entry = ArtifactData::new();
        if let Some(date) = self.expiration {
            entry.insert("expiration_date".to_string(), json!(date));
        }
        if let Some(run) = self.run_test {
            entry.insert("run".to_string(), json!(run));
        }
        entry.insert("justification".to_string(), json!(justification));

        let mut map = ArtifactData::new();
        map.insert(self.control, Value::Object(entry));
        Ok(map)
    }
}

static EXPIRATION_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"));

/// Expiration dates must be zero-padded `YYYY-MM-DD` and a valid calendar
/// date.
fn validate_expiration(control: &str, date: &str) -> ComplianceResult<()> {
    let valid =
        EXPIRATION_SHAPE.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(ComplianceError::InvalidExpiration {
            control: control.to_string(),
            date: date.to_string(),
        })
    }
}
