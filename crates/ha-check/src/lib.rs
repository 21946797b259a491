//! Configuration checks for Home Assistant
//!
//! Cross-checks a configuration directory: every entity referenced by an
//! automation must be declared locally or belong to a trusted integration,
//! template sensors must not reuse a `unique_id`, and automations must have
//! the fields and triggers the deployment relies on.
//!
//! ```text
//! documents ─┬─> EntityExtractor ──> used IDs ─┐
//!            ├─> RegistryBuilder ──> registry ─┴─> resolve ──> Report
//!            ├─> scan_unique_ids ───────────────────────────> Report
//!            └─> structural / behaviour checks ─────────────> Report
//! ```
//!
//! # Key Types
//!
//! - [`EntityExtractor`] - Collects entity IDs from a document tree
//! - [`LocalRegistry`] - Entity IDs declared by the configuration
//! - [`ResolutionReport`] - Used IDs split into resolved, external, missing
//! - [`Report`] - Findings of one run; decides the exit status
//!
//! # Example
//!
//! ```ignore
//! use ha_check::{run, Suite};
//! use ha_config::{ValidatorSettings, YamlLoader};
//!
//! let loader = YamlLoader::new("config");
//! let report = run(&loader, &ValidatorSettings::default(), &Suite::ALL);
//! println!("{report}");
//! std::process::exit(if report.has_failures() { 1 } else { 0 });
//! ```

pub mod behaviors;
pub mod duplicates;
pub mod extract;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod structure;
pub mod suites;
pub mod templates;

pub use duplicates::{scan_unique_ids, DuplicateUniqueId, UniqueIdLocation, UniqueIdScan};
pub use extract::{extract_entity_ids, EntityExtractor, ReferenceScanner, TemplatePatternScanner};
pub use registry::{build_local_registry, slugify, LocalRegistry, RegistryBuilder};
pub use report::{Finding, Report, Severity, Summary};
pub use resolve::{classify, resolve, Resolution, ResolutionReport};
pub use structure::{structural_issues, StructuralIssue};
pub use suites::{run, Suite};
pub use templates::{template_definitions, SensorDefinition, SensorKind};
