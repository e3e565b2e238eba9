//! Error types for compliance-phase configuration.

use crate::events::ArtifactKind;

/// Compliance-phase errors.
///
/// All of these are fatal to the current run: artifact loading and selection
/// either fully completes or aborts. Nothing is caught or retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    /// Profile document has no usable `name` field.
    #[error("profile at {path} has no name")]
    MissingProfileName { path: String },

    /// No artifact identity can be derived from the filename.
    #[error("cannot derive an artifact name from '{path}'")]
    InvalidArtifactPath { path: String },

    /// A selector pattern failed to compile as a regex.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A `unit::name` selector matched zero artifacts.
    #[error("no {kind}s matching '{name_pattern}' found in units matching '{unit_pattern}'")]
    NoMatch {
        kind: ArtifactKind,
        selector: String,
        name_pattern: String,
        unit_pattern: String,
    },

    /// A unit-only selector matched zero artifacts.
    #[error("no {kind}s found in units matching '{unit_pattern}'")]
    EmptyUnit {
        kind: ArtifactKind,
        selector: String,
        unit_pattern: String,
    },

    /// Inline waiver entry without a justification.
    #[error("waiver entry for '{control}' must have a justification")]
    MissingJustification { control: String },

    /// Inline waiver entry with a malformed or impossible expiration date.
    #[error("waiver entry for '{control}' has invalid expiration date '{date}': expected a valid YYYY-MM-DD date")]
    InvalidExpiration { control: String, date: String },

    /// Artifact file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not a valid mapping document.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl ComplianceError {
    /// Whether the error is a configuration-authoring mistake (bad selector
    /// or empty selection) as opposed to malformed artifact content.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelector { .. } | Self::NoMatch { .. } | Self::EmptyUnit { .. }
        )
    }
}

/// Result type for compliance-phase operations.
pub type ComplianceResult<T> = Result<T, ComplianceError>;
