//! Scan profiles and their per-run collection.
//!
//! A profile is loaded from a `inspec.yml`-shaped document inside a content
//! unit. Its identity is the `name` field declared in the document itself,
//! not the filename.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::collection::{Collection, Selectable};
use crate::error::{ComplianceError, ComplianceResult};
use crate::events::{ArtifactKind, EventSink};
use crate::parse::{parse_artifact_file, parse_artifact_str, ArtifactData};

/// A scan profile discovered in a content unit.
#[derive(Debug, Clone)]
pub struct Profile {
    name: String,
    origin_unit: String,
    source_path: PathBuf,
    payload: ArtifactData,
    enabled: bool,
}

impl Profile {
    /// Construct a profile from parsed document data.
    ///
    /// Fails when the document has no non-empty string `name`.
    pub fn from_map(
        payload: ArtifactData,
        path: impl Into<PathBuf>,
        unit: impl Into<String>,
    ) -> ComplianceResult<Self> {
        let source_path = path.into();
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ComplianceError::MissingProfileName {
                path: source_path.display().to_string(),
            })?
            .to_string();

        Ok(Self {
            name,
            origin_unit: unit.into(),
            source_path,
            payload,
            enabled: false,
        })
    }

    /// Construct a profile from a YAML string.
    pub fn from_yaml(
        content: &str,
        path: impl Into<PathBuf>,
        unit: impl Into<String>,
    ) -> ComplianceResult<Self> {
        let path = path.into();
        let payload = parse_artifact_str(content, &path)?;
        Self::from_map(payload, path, unit)
    }

    /// Read and construct a profile from its document file.
    pub fn from_file(path: impl AsRef<Path>, unit: impl Into<String>) -> ComplianceResult<Self> {
        let path = path.as_ref();
        let payload = parse_artifact_file(path)?;
        Self::from_map(payload, path, unit)
    }

    /// The name declared inside the profile document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw profile document.
    pub fn payload(&self) -> &ArtifactData {
        &self.payload
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

impl Selectable for Profile {
    type Export = ProfileExport;
    const KIND: ArtifactKind = ArtifactKind::Profile;
    const NOTIFIES_ON_ENABLE: bool = false;

    fn identity_name(&self) -> &str {
        &self.name
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

    /// The scanner consumes the profile's directory, not the document file.
    fn export(&self) -> ProfileExport {
        ProfileExport {
            name: self.name.clone(),
            path: self
                .source_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

/// Profile shape handed to the external scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileExport {
    pub name: String,
    pub path: PathBuf,
}

/// Ordered set of profiles for one run.
#[derive(Debug)]
pub struct ProfileCollection {
    inner: Collection<Profile>,
}

impl ProfileCollection {
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            inner: Collection::new(events),
        }
    }

    /// Load a profile document from `path`, attributing it to `unit`.
    pub fn from_file(&mut self, path: impl AsRef<Path>, unit: &str) -> ComplianceResult<()> {
        let profile = Profile::from_file(path, unit)?;
        self.inner.push(profile);
        Ok(())
    }

    /// Append an already-constructed profile.
    pub fn push(&mut self, profile: Profile) {
        self.inner.push(profile);
    }

    /// Enable profiles matching a `unit_pattern::name_pattern` selector.
    ///
    /// A selector without `::` enables every profile in matching units.
    pub fn include_profile(&mut self, selector: &str) -> ComplianceResult<()> {
        self.inner.enable_matching(selector)?;
        Ok(())
    }

    /// True when at least one profile has been enabled.
    pub fn using_profiles(&self) -> bool {
        self.inner.has_any_enabled()
    }

    /// Enabled profiles in load order, shaped for the scanner.
    pub fn export_enabled(&self) -> Vec<ProfileExport> {
        self.inner.export_enabled()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEvents;

    fn profile(name: &str, unit: &str) -> Profile {
        Profile::from_yaml(
            &format!("name: {name}\ntitle: {name} baseline\n"),
            format!("/units/{unit}/compliance/profiles/{name}/inspec.yml"),
            unit,
        )
        .unwrap()
    }

    #[test]
    fn name_comes_from_the_document() {
        let profile = profile("ssh", "acme_unit");
        assert_eq!(profile.name(), "ssh");
        assert_eq!(profile.origin_unit(), "acme_unit");
        assert!(!profile.is_enabled());
    }

    #[test]
    fn missing_name_fails_construction() {
        let err = Profile::from_yaml("title: no name here\n", "/tmp/inspec.yml", "unit")
            .unwrap_err();
        assert!(matches!(err, ComplianceError::MissingProfileName { .. }));
        assert!(err.to_string().contains("/tmp/inspec.yml"));
    }

    #[test]
    fn empty_name_fails_construction() {
        let err = Profile::from_yaml("name: ''\n", "/tmp/inspec.yml", "unit").unwrap_err();
        assert!(matches!(err, ComplianceError::MissingProfileName { .. }));
    }

    #[test]
    fn export_uses_the_profile_directory() {
        let exported = profile("ssh", "acme_unit").export();
        assert_eq!(
            exported,
            ProfileExport {
                name: "ssh".into(),
                path: "/units/acme_unit/compliance/profiles/ssh".into(),
            }
        );
    }

    #[test]
    fn include_profile_matches_declared_names() {
        let mut profiles = ProfileCollection::new(Arc::new(NullEvents));
        profiles.push(profile("base", "unit_a"));
        profiles.push(profile("ssh", "unit_a"));
        profiles.push(profile("base", "unit_b"));

        profiles.include_profile("unit_a::ssh").unwrap();

        assert!(profiles.using_profiles());
        let exported = profiles.export_enabled();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].name, "ssh");
    }

    #[test]
    fn no_match_is_a_descriptive_error() {
        let mut profiles = ProfileCollection::new(Arc::new(NullEvents));
        profiles.push(profile("base", "unit_a"));

        let err = profiles.include_profile("unit_a::ssh").unwrap_err();
        assert_eq!(
            err.to_string(),
            "no profiles matching 'ssh' found in units matching 'unit_a'"
        );
        assert!(!profiles.using_profiles());
    }
}
