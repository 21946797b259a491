//! Structural checks on automation and template sensor documents
//!
//! These run as part of the syntax suite. Every issue found here is a
//! warning: a structurally odd automation still loads.

use ha_automation::{automations, node_kind, Automation, AutomationResult};
use ha_config::Node;
use ha_core::is_valid_entity_reference;
use std::fmt;

use crate::report::Report;
use crate::templates::count_definitions;

/// Problem with the shape of one automation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralIssue {
    /// Neither `id` nor `alias`
    MissingIdentity { index: usize },
    /// No `trigger`/`triggers`
    MissingTriggers { index: usize, name: String },
    /// No `action`/`actions`
    MissingActions { index: usize, name: String },
    /// A trigger `entity_id` that is neither an entity ID nor a template
    InvalidTriggerEntity { name: String, entity_id: String },
}

impl StructuralIssue {
    /// Issues that stop the "automations validated" count from being reported
    pub fn is_missing_section(&self) -> bool {
        matches!(
            self,
            StructuralIssue::MissingTriggers { .. } | StructuralIssue::MissingActions { .. }
        )
    }
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralIssue::MissingIdentity { index } => {
                write!(f, "[{index}] has neither id nor alias")
            }
            StructuralIssue::MissingTriggers { index, name } => {
                write!(f, "[{index}] {name} has no trigger/triggers")
            }
            StructuralIssue::MissingActions { index, name } => {
                write!(f, "[{index}] {name} has no action/actions")
            }
            StructuralIssue::InvalidTriggerEntity { name, entity_id } => {
                write!(f, "{name} has an invalid trigger entity_id: {entity_id}")
            }
        }
    }
}

/// Issues of a single automation, in check order
pub fn automation_issues(automation: &Automation<'_>) -> Vec<StructuralIssue> {
    let mut issues = Vec::new();
    let index = automation.index();

    if automation.id().is_none() && automation.alias().is_none() {
        issues.push(StructuralIssue::MissingIdentity { index });
    }
    if !automation.has_triggers() {
        issues.push(StructuralIssue::MissingTriggers {
            index,
            name: automation.display_name(),
        });
    }
    if !automation.has_actions() {
        issues.push(StructuralIssue::MissingActions {
            index,
            name: automation.display_name(),
        });
    }

    for trigger in automation.triggers() {
        for entity_id in trigger.entity_ids() {
            if !is_valid_entity_reference(entity_id) {
                issues.push(StructuralIssue::InvalidTriggerEntity {
                    name: automation.display_name(),
                    entity_id: entity_id.to_string(),
                });
            }
        }
    }

    issues
}

/// Issues of every automation in a document
///
/// Fails only when the document is not a list.
pub fn structural_issues(document: &Node) -> AutomationResult<Vec<StructuralIssue>> {
    Ok(automations(document)?
        .iter()
        .flat_map(automation_issues)
        .collect())
}

/// Report the structural issues of an automation document
pub fn check_automation_structure(file: &str, document: &Node, report: &mut Report) {
    let issues = match structural_issues(document) {
        Ok(issues) => issues,
        Err(e) => {
            report.warn(format!("{file}: {e}"));
            return;
        }
    };

    for issue in &issues {
        report.warn(format!("{file} {issue}"));
    }

    if !issues.iter().any(StructuralIssue::is_missing_section) {
        report.info(format!(
            "{file}: {} automations validated",
            document.count()
        ));
    }
}

/// Report how many template sensors a document defines
pub fn check_template_sensor_structure(file: &str, document: &Node, report: &mut Report) {
    if document.as_sequence().is_none() {
        report.warn(format!(
            "{file}: expected a list of template blocks, found {}",
            node_kind(document)
        ));
        return;
    }

    let (sensors, binary_sensors) = count_definitions(document);
    report.info(format!(
        "{file}: {sensors} sensors, {binary_sensors} binary_sensors"
    ));
}
