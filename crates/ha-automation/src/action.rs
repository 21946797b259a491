//! Action helpers
//!
//! Actions are only inspected, never executed: which service an action calls,
//! and how a `repeat` block is bounded.

use ha_config::Node;
use std::fmt;

/// Service called by an action (`service:` or the newer `action:` key)
pub fn service_name(action: &Node) -> Option<&str> {
    action.get_any(&["service", "action"]).and_then(Node::as_str)
}

/// How a `repeat` block terminates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatExit {
    /// Fixed number of iterations (number or template)
    Count(String),
    /// Stops once a condition holds
    Until,
    /// Runs while a condition holds
    While,
    /// One iteration per list item
    ForEach,
}

impl fmt::Display for RepeatExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatExit::Count(count) => write!(f, "count: {count}"),
            RepeatExit::Until => f.write_str("until"),
            RepeatExit::While => f.write_str("while"),
            RepeatExit::ForEach => f.write_str("for_each"),
        }
    }
}

/// Exit strategy declared by a `repeat` configuration, if any
pub fn repeat_exit(repeat: &Node) -> Option<RepeatExit> {
    if let Some(count) = repeat.get("count").filter(|n| !n.is_null()) {
        let text = count
            .scalar_text()
            .map(|t| t.into_owned())
            .unwrap_or_else(|| "?".to_string());
        return Some(RepeatExit::Count(text));
    }
    if repeat.has_key("until") {
        return Some(RepeatExit::Until);
    }
    if repeat.has_key("while") {
        return Some(RepeatExit::While);
    }
    if repeat.has_key("for_each") {
        return Some(RepeatExit::ForEach);
    }
    None
}

/// Keys whose values hold nested actions
const NESTED_ACTION_KEYS: &[&str] = &["sequence", "choose", "then", "else", "default", "parallel"];

/// Every `repeat` configuration reachable from a list of actions
///
/// Nested blocks (`choose`, `if`/`then`/`else`, `sequence`, `parallel`, a
/// repeat's own sequence) are searched too. Service payloads (`data:`,
/// `target:`) and conditions are not. Only mapping-valued `repeat` keys count.
pub fn find_repeats<'a>(actions: &[&'a Node]) -> Vec<&'a Node> {
    let mut found = Vec::new();
    for action in actions {
        collect_repeats(action, &mut found);
    }
    found
}

fn collect_repeats<'a>(node: &'a Node, found: &mut Vec<&'a Node>) {
    match node {
        Node::Mapping(map) => {
            if let Some(repeat) = map.get("repeat").filter(|n| n.as_mapping().is_some()) {
                found.push(repeat);
                collect_repeats(repeat, found);
            }
            for key in NESTED_ACTION_KEYS {
                if let Some(nested) = map.get(*key) {
                    collect_repeats(nested, found);
                }
            }
        }
        Node::Sequence(items) => {
            for item in items {
                collect_repeats(item, found);
            }
        }
        _ => {}
    }
}
