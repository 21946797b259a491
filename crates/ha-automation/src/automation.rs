//! Automation views
//!
//! An automation ties together triggers, conditions, and actions. The types
//! here read an automation straight from its document node: nothing is
//! deserialized up front, so a malformed automation can still be inspected
//! field by field.

use ha_config::Node;
use std::borrow::Cow;
use std::str::FromStr;
use thiserror::Error;

use crate::trigger::TriggerView;

/// Automation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutomationError {
    #[error("expected a list of automations, found {0}")]
    NotAList(&'static str),
}

/// Result type for automation operations
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Execution mode for automations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Default - ignore new triggers while running
    #[default]
    Single,

    /// Restart from beginning on new trigger
    Restart,

    /// Queue triggers
    Queued,

    /// Run all simultaneously
    Parallel,
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(ExecutionMode::Single),
            "restart" => Ok(ExecutionMode::Restart),
            "queued" => Ok(ExecutionMode::Queued),
            "parallel" => Ok(ExecutionMode::Parallel),
            other => Err(format!("unknown execution mode '{other}'")),
        }
    }
}

/// A single automation within an automation document
#[derive(Debug, Clone, Copy)]
pub struct Automation<'a> {
    index: usize,
    node: &'a Node,
}

impl<'a> Automation<'a> {
    /// Wrap the automation at `index` of its document
    pub fn new(index: usize, node: &'a Node) -> Self {
        Self { index, node }
    }

    /// Position within the document
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stable identifier (`id:`), in string form
    pub fn id(&self) -> Option<Cow<'a, str>> {
        self.node
            .get("id")
            .and_then(Node::scalar_text)
            .filter(|id| !id.is_empty())
    }

    /// Human-readable name (`alias:`)
    pub fn alias(&self) -> Option<&'a str> {
        self.node
            .get("alias")
            .and_then(Node::as_str)
            .filter(|alias| !alias.is_empty())
    }

    /// Get display name (alias, then ID, then position)
    pub fn display_name(&self) -> String {
        match (self.alias(), self.id()) {
            (Some(alias), _) => alias.to_string(),
            (None, Some(id)) => id.into_owned(),
            (None, None) => format!("#{}", self.index),
        }
    }

    /// Alias contains `needle` (case-sensitive)
    pub fn alias_contains(&self, needle: &str) -> bool {
        self.alias().is_some_and(|alias| alias.contains(needle))
    }

    /// Alias contains `needle`, ignoring case
    pub fn alias_contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.alias()
            .is_some_and(|alias| alias.to_lowercase().contains(&needle))
    }

    /// Triggers (`trigger:` or `triggers:`), normalised to a list
    pub fn triggers(&self) -> Vec<TriggerView<'a>> {
        self.field(&["trigger", "triggers"])
            .into_iter()
            .map(TriggerView::new)
            .collect()
    }

    /// Actions (`action:` or `actions:`), normalised to a list
    pub fn actions(&self) -> Vec<&'a Node> {
        self.field(&["action", "actions"])
    }

    pub fn has_triggers(&self) -> bool {
        self.has_field(&["trigger", "triggers"])
    }

    pub fn has_conditions(&self) -> bool {
        self.has_field(&["condition", "conditions"])
    }

    pub fn has_actions(&self) -> bool {
        self.has_field(&["action", "actions"])
    }

    /// Whether `mode:` is set at all
    pub fn declares_mode(&self) -> bool {
        self.node.has_key("mode")
    }

    /// Parsed execution mode, if declared and recognised
    pub fn mode(&self) -> Option<ExecutionMode> {
        self.node
            .get("mode")
            .and_then(Node::as_str)
            .and_then(|mode| mode.parse().ok())
    }

    /// Whether the automation is enabled (defaults to true)
    pub fn enabled(&self) -> bool {
        self.node
            .get("enabled")
            .and_then(Node::as_bool)
            .unwrap_or(true)
    }

    fn field(&self, keys: &[&str]) -> Vec<&'a Node> {
        self.node
            .get_any(keys)
            .map(Node::one_or_many)
            .unwrap_or_default()
    }

    fn has_field(&self, keys: &[&str]) -> bool {
        self.node.get_any(keys).is_some_and(Node::has_content)
    }
}

/// Read the automations of a document
///
/// A null document (empty file) holds no automations.
pub fn automations(document: &Node) -> AutomationResult<Vec<Automation<'_>>> {
    match document {
        Node::Null => Ok(Vec::new()),
        Node::Sequence(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, node)| Automation::new(index, node))
            .collect()),
        other => Err(AutomationError::NotAList(node_kind(other))),
    }
}

/// Short name of a node's shape, for messages
pub fn node_kind(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Scalar(_) => "a scalar",
        Node::Sequence(_) => "a list",
        Node::Mapping(_) => "a mapping",
        Node::Tagged(_) => "a tagged value",
    }
}
