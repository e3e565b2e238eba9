//! Run-event notification for artifact loads and enables.
//!
//! Collections notify an [`EventSink`] when an artifact is appended and when
//! a selection statement enables one. Notifications are fire-and-forget: no
//! return value, and implementations must not fail.

use std::fmt;
use std::path::Path;

/// The three artifact kinds managed during the compliance phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Profile,
    Input,
    Waiver,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Input => "input",
            Self::Waiver => "waiver",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for compliance-phase run events.
///
/// Default method bodies are no-ops, so sinks only override what they care
/// about. `path` is `None` for inline-declared artifacts.
pub trait EventSink: Send + Sync {
    /// An artifact was loaded into a collection.
    fn artifact_loaded(&self, kind: ArtifactKind, unit: &str, name: &str, path: Option<&Path>) {
        let _ = (kind, unit, name, path);
    }

    /// An artifact was enabled by a selection statement.
    fn artifact_enabled(&self, kind: ArtifactKind, unit: &str, name: &str, path: Option<&Path>) {
        let _ = (kind, unit, name, path);
    }
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEvents;

impl EventSink for NullEvents {}

/// Sink that emits structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn artifact_loaded(&self, kind: ArtifactKind, unit: &str, name: &str, path: Option<&Path>) {
        tracing::debug!(kind = %kind, unit, name, path = ?path, "compliance artifact loaded");
    }

    fn artifact_enabled(&self, kind: ArtifactKind, unit: &str, name: &str, path: Option<&Path>) {
        tracing::info!(kind = %kind, unit, name, path = ?path, "compliance artifact enabled");
    }
}
