//! Duplicate `unique_id` detection
//!
//! Sensors and binary sensors share one `unique_id` space here, so a sensor
//! and a binary sensor with the same ID collide.

use ha_config::Node;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;

use crate::templates::{template_definitions, SensorKind};

/// Position of a definition in the template sensor document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueIdLocation {
    pub kind: SensorKind,
    pub block: usize,
    pub index: usize,
}

impl fmt::Display for UniqueIdLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}][{}]", self.kind, self.block, self.index)
    }
}

/// A `unique_id` seen a second time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateUniqueId {
    pub unique_id: String,
    /// Where the ID was first declared
    pub first: UniqueIdLocation,
    pub duplicate: UniqueIdLocation,
}

impl fmt::Display for DuplicateUniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate unique_id '{}' at {} (first declared at {})",
            self.unique_id, self.duplicate, self.first
        )
    }
}

/// Result of scanning a template sensor document
#[derive(Debug, Clone, Default)]
pub struct UniqueIdScan {
    /// First location of every distinct ID, in declaration order
    pub tracked: IndexMap<String, UniqueIdLocation>,
    pub duplicates: Vec<DuplicateUniqueId>,
}

impl UniqueIdScan {
    pub fn distinct(&self) -> usize {
        self.tracked.len()
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Track every `unique_id`; later repeats are recorded, never overwrite
pub fn scan_unique_ids(document: &Node) -> UniqueIdScan {
    let mut scan = UniqueIdScan::default();

    for definition in template_definitions(document) {
        let Some(unique_id) = definition.unique_id() else {
            continue;
        };
        let location = UniqueIdLocation {
            kind: definition.kind,
            block: definition.block,
            index: definition.index,
        };
        match scan.tracked.entry(unique_id) {
            Entry::Occupied(entry) => scan.duplicates.push(DuplicateUniqueId {
                unique_id: entry.key().clone(),
                first: *entry.get(),
                duplicate: location,
            }),
            Entry::Vacant(entry) => {
                entry.insert(location);
            }
        }
    }

    scan
}
