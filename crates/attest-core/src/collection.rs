//! Generic ordered artifact collection with selective enablement.
//!
//! One [`Collection`] per artifact kind per run: mutated only by appends and
//! enable-matching, read by export at the end of the run, then dropped.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ComplianceError, ComplianceResult};
use crate::events::{ArtifactKind, EventSink};
use crate::selector::Selector;

/// Interface shared by the three artifact kinds.
///
/// Artifacts are immutable after construction except for the enabled flag,
/// which only transitions false→true within a run.
pub trait Selectable {
    /// Shape handed to the external scanner for this artifact kind.
    type Export;

    const KIND: ArtifactKind;

    /// Whether enabling this kind emits an [`EventSink::artifact_enabled`]
    /// notification. Profile enables are silent.
    const NOTIFIES_ON_ENABLE: bool;

    /// The name a selector's `name_pattern` matches against.
    fn identity_name(&self) -> &str;

    /// The content unit a selector's `unit_pattern` matches against.
    fn origin_unit(&self) -> &str;

    /// Filesystem origin, `None` for inline-declared artifacts.
    fn source_path(&self) -> Option<&Path>;

    fn enable(&mut self);

    fn is_enabled(&self) -> bool;

    fn export(&self) -> Self::Export;
}

/// Ordered, append-only sequence of artifacts for one run.
///
/// Insertion order is load order; nothing is reordered or deduplicated, and
/// duplicate identities are retained.
pub struct Collection<A> {
    artifacts: Vec<A>,
    events: Arc<dyn EventSink>,
}

impl<A: Selectable> Collection<A> {
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self {
            artifacts: Vec::new(),
            events,
        }
    }

    /// Append an artifact and notify the load event.
    pub fn push(&mut self, artifact: A) {
        self.events.artifact_loaded(
            A::KIND,
            artifact.origin_unit(),
            artifact.identity_name(),
            artifact.source_path(),
        );
        self.artifacts.push(artifact);
    }

    /// Enable every artifact matching `selector`, in load order.
    ///
    /// Fails with [`ComplianceError::NoMatch`] (or
    /// [`ComplianceError::EmptyUnit`] for unit-only selectors) when nothing
    /// matches, leaving all flags unchanged. Returns the number of artifacts
    /// matched.
    pub fn enable_matching(&mut self, selector: &str) -> ComplianceResult<usize> {
        let selector = Selector::parse(selector)?;

        let matched: Vec<usize> = self
            .artifacts
            .iter()
            .enumerate()
            .filter(|(_, artifact)| {
                selector.matches(artifact.origin_unit(), artifact.identity_name())
            })
            .map(|(index, _)| index)
            .collect();

        if matched.is_empty() {
            return Err(match selector.name_source() {
                Some(name_pattern) => ComplianceError::NoMatch {
                    kind: A::KIND,
                    selector: selector.raw().to_string(),
                    name_pattern: name_pattern.to_string(),
                    unit_pattern: selector.unit_source().to_string(),
                },
                None => ComplianceError::EmptyUnit {
                    kind: A::KIND,
                    selector: selector.raw().to_string(),
                    unit_pattern: selector.unit_source().to_string(),
                },
            });
        }

        for index in &matched {
            let artifact = &mut self.artifacts[*index];
            artifact.enable();
            if A::NOTIFIES_ON_ENABLE {
                self.events.artifact_enabled(
                    A::KIND,
                    artifact.origin_unit(),
                    artifact.identity_name(),
                    artifact.source_path(),
                );
            }
        }

        Ok(matched.len())
    }

    /// Export shapes for all enabled artifacts, in load order.
    pub fn export_enabled(&self) -> Vec<A::Export> {
        self.artifacts
            .iter()
            .filter(|artifact| artifact.is_enabled())
            .map(Selectable::export)
            .collect()
    }

    /// True when at least one artifact is enabled.
    pub fn has_any_enabled(&self) -> bool {
        self.artifacts.iter().any(Selectable::is_enabled)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.artifacts.iter()
    }
}

// The event sink is deliberately absent from the debug representation.
impl<A: fmt::Debug> fmt::Debug for Collection<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEvents;

    #[derive(Debug)]
    struct Fake {
        unit: &'static str,
        name: &'static str,
        enabled: bool,
    }

    impl Selectable for Fake {
        type Export = String;
        const KIND: ArtifactKind = ArtifactKind::Input;
        const NOTIFIES_ON_ENABLE: bool = true;

        fn identity_name(&self) -> &str {
            self.name
        }

        fn origin_unit(&self) -> &str {
            self.unit
        }

        fn source_path(&self) -> Option<&Path> {
            None
        }

        fn enable(&mut self) {
            self.enabled = true;
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn export(&self) -> String {
            format!("{}::{}", self.unit, self.name)
        }
    }

    fn collection() -> Collection<Fake> {
        let mut collection = Collection::new(Arc::new(NullEvents));
        for (unit, name) in [
            ("acme_unit", "ssh-001"),
            ("acme_unit", "tls"),
            ("other_unit", "ssh-001"),
        ] {
            collection.push(Fake {
                unit,
                name,
                enabled: false,
            });
        }
        collection
    }

    #[test]
    fn nothing_exported_before_enable() {
        let collection = collection();
        assert!(collection.export_enabled().is_empty());
        assert!(!collection.has_any_enabled());
    }

    #[test]
    fn exact_selector_enables_one() {
        let mut collection = collection();
        assert_eq!(collection.enable_matching("acme_unit::tls").unwrap(), 1);
        assert_eq!(collection.export_enabled(), vec!["acme_unit::tls"]);
    }

    #[test]
    fn no_match_leaves_flags_unchanged() {
        let mut collection = collection();
        let err = collection.enable_matching("acme_unit::nope").unwrap_err();
        assert!(matches!(err, ComplianceError::NoMatch { .. }));
        assert!(!collection.has_any_enabled());
    }

    #[test]
    fn no_match_error_carries_selector_and_both_patterns() {
        let mut collection = collection();
        match collection.enable_matching("acme_unit::nope").unwrap_err() {
            ComplianceError::NoMatch {
                kind,
                selector,
                name_pattern,
                unit_pattern,
            } => {
                assert_eq!(kind, ArtifactKind::Input);
                assert_eq!(selector, "acme_unit::nope");
                assert_eq!(name_pattern, "nope");
                assert_eq!(unit_pattern, "acme_unit");
            }
            other => panic!("expected NoMatch, got {other:?}"),
        }

        match collection.enable_matching("missing_unit").unwrap_err() {
            ComplianceError::EmptyUnit {
                selector,
                unit_pattern,
                ..
            } => {
                assert_eq!(selector, "missing_unit");
                assert_eq!(unit_pattern, "missing_unit");
            }
            other => panic!("expected EmptyUnit, got {other:?}"),
        }
    }

    #[test]
    fn unit_only_selector_reports_empty_unit() {
        let mut collection = collection();
        let err = collection.enable_matching("missing_unit").unwrap_err();
        assert!(matches!(err, ComplianceError::EmptyUnit { .. }));
        assert_eq!(
            err.to_string(),
            "no inputs found in units matching 'missing_unit'"
        );
    }

    #[test]
    fn enabling_is_monotonic() {
        let mut collection = collection();
        collection.enable_matching("acme_unit::ssh-001").unwrap();
        collection.enable_matching("acme_unit").unwrap();
        collection.enable_matching("acme_unit::ssh-001").unwrap();
        assert_eq!(
            collection.export_enabled(),
            vec!["acme_unit::ssh-001", "acme_unit::tls"]
        );
    }

    #[test]
    fn export_preserves_load_order_not_enable_order() {
        let mut collection = collection();
        collection.enable_matching("other_unit::ssh-001").unwrap();
        collection.enable_matching("acme_unit::ssh-001").unwrap();
        assert_eq!(
            collection.export_enabled(),
            vec!["acme_unit::ssh-001", "other_unit::ssh-001"]
        );
    }

    #[test]
    fn debug_omits_event_sink() {
        let rendered = format!("{:?}", collection());
        assert!(rendered.contains("artifacts"));
        assert!(!rendered.contains("events"));
    }
}
