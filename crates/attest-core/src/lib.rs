//! Compliance-phase artifact selection for scanner invocations.
//!
//! This crate manages the three selection collections a configuration run
//! builds before invoking the external compliance scanner:
//!
//! - **Profiles** — scan profile documents, identified by their declared
//!   `name` field
//! - **Inputs** — key/value mappings merged into the scanner's input map,
//!   identified by filename
//! - **Waivers** — control waiver files or inline declarations, identified
//!   by filename
//!
//! Each collection loads artifacts discovered in content units, enables a
//! subset through `unit_pattern::name_pattern` selectors, and exports the
//! enabled subset in the scanner's expected shape.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use attest_core::{ProfileCollection, TracingEvents};
//!
//! # fn example() -> attest_core::ComplianceResult<()> {
//! let mut profiles = ProfileCollection::new(Arc::new(TracingEvents));
//!
//! // One load per discovered document, attributed to its content unit.
//! profiles.from_file("/units/acme_unit/compliance/profiles/ssh/inspec.yml", "acme_unit")?;
//!
//! // Selection statements from the declarative layer.
//! profiles.include_profile("acme_unit::ssh")?;
//!
//! // Enabled subset, shaped for the scanner.
//! for profile in profiles.export_enabled() {
//!     println!("{} -> {}", profile.name, profile.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Selectors
//!
//! Both selector segments are anchored whole-string regexes:
//!
//! - `acme_unit::ssh-001` — exact artifact in a unit
//! - `acme_unit::ssh.*` — regex match within a unit
//! - `.*::ssh.*` — regex match across all units
//! - `acme_unit` — every artifact in matching units
//!
//! A selection that matches nothing is a fatal, descriptive error: a
//! compliance configuration mistake must not silently produce an incomplete
//! scan.

pub mod collection;
pub mod error;
pub mod events;
pub mod input;
pub mod parse;
pub mod profile;
pub mod selector;
pub mod waiver;

pub use collection::{Collection, Selectable};
pub use error::{ComplianceError, ComplianceResult};
pub use events::{ArtifactKind, EventSink, NullEvents, TracingEvents};
pub use input::{Input, InputCollection, InputSource};
pub use parse::{parse_artifact_file, ArtifactData};
pub use profile::{Profile, ProfileCollection, ProfileExport};
pub use selector::Selector;
pub use waiver::{Waiver, WaiverCollection, WaiverEntry, WaiverExport, WaiverSource};
