//! Reference resolution
//!
//! Every used entity ID is either owned by an external integration, declared
//! locally, or missing. Missing is advisory: template scanning can both miss
//! and invent references.

use ha_config::Allowlists;
use ha_core::domain_of;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::registry::LocalRegistry;

/// Where a used entity ID comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Declared by the configuration or a known external entity
    Resolved,
    /// Domain owned by an external integration; never checked further
    External,
    /// Neither declared nor external
    Missing,
}

/// Classify one entity ID
///
/// External domains win over registry membership.
pub fn classify(entity_id: &str, registry: &LocalRegistry, allowlists: &Allowlists) -> Resolution {
    if allowlists.is_external_domain(domain_of(entity_id)) {
        Resolution::External
    } else if registry.contains(entity_id) {
        Resolution::Resolved
    } else {
        Resolution::Missing
    }
}

/// Used entity IDs partitioned by [`Resolution`], each in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub resolved: Vec<String>,
    pub external: Vec<String>,
    pub missing: Vec<String>,
}

impl ResolutionReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn total(&self) -> usize {
        self.resolved.len() + self.external.len() + self.missing.len()
    }
}

/// Partition `used` against the registry and the external-domain allowlist
pub fn resolve(
    used: &BTreeSet<String>,
    registry: &LocalRegistry,
    allowlists: &Allowlists,
) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    // BTreeSet iteration keeps every partition sorted
    for entity_id in used {
        let bucket = match classify(entity_id, registry, allowlists) {
            Resolution::Resolved => &mut report.resolved,
            Resolution::External => &mut report.external,
            Resolution::Missing => &mut report.missing,
        };
        bucket.push(entity_id.clone());
    }
    report
}
