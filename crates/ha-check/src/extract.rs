//! Entity identifier extraction
//!
//! Walks a document tree and collects every entity ID it mentions: whole
//! strings shaped like an entity ID, `entity_id` fields, and entity IDs passed
//! to `states()`, `is_state()` and `state_attr()` inside template strings.
//!
//! Template scanning is a pattern match, not a parse. It sits behind
//! [`ReferenceScanner`] so a real template parser can replace it.

use ha_config::Node;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Finds entity IDs embedded in a template string
pub trait ReferenceScanner {
    /// Add every entity ID referenced by `text` to `found`
    fn scan(&self, text: &str, found: &mut BTreeSet<String>);
}

/// Scanner for `states('x.y')`, `is_state('x.y', ...)` and `state_attr('x.y', ...)`
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePatternScanner;

fn template_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r#"states\(['"]([a-z_]+\.[a-z0-9_]+)['"]\)"#,
            r#"is_state\(['"]([a-z_]+\.[a-z0-9_]+)['"]"#,
            r#"state_attr\(['"]([a-z_]+\.[a-z0-9_]+)['"]"#,
        ]
        .map(|pattern| Regex::new(pattern).expect("valid template pattern"))
    })
}

impl ReferenceScanner for TemplatePatternScanner {
    fn scan(&self, text: &str, found: &mut BTreeSet<String>) {
        for pattern in template_patterns() {
            for captures in pattern.captures_iter(text) {
                if let Some(entity_id) = captures.get(1) {
                    found.insert(entity_id.as_str().to_string());
                }
            }
        }
    }
}

/// Collects the entity IDs used anywhere in a document tree
#[derive(Debug, Clone, Default)]
pub struct EntityExtractor<S = TemplatePatternScanner> {
    scanner: S,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: ReferenceScanner> EntityExtractor<S> {
    /// Use a different template scanner
    pub fn with_scanner(scanner: S) -> Self {
        Self { scanner }
    }

    /// Entity IDs reachable from `node`
    ///
    /// Every call starts from an empty set.
    pub fn extract(&self, node: &Node) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.walk(node, &mut found);
        found
    }

    /// Union of the entity IDs of several trees
    pub fn extract_all<'a>(&self, nodes: impl IntoIterator<Item = &'a Node>) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for node in nodes {
            self.walk(node, &mut found);
        }
        found
    }

    fn walk(&self, node: &Node, found: &mut BTreeSet<String>) {
        match node {
            Node::Scalar(_) => {
                if let Some(text) = node.as_str() {
                    self.visit_string(text, found);
                }
            }
            Node::Sequence(items) => {
                for item in items {
                    self.walk(item, found);
                }
            }
            Node::Mapping(map) => {
                if let Some(field) = map.get("entity_id") {
                    for value in field.one_or_many().into_iter().filter_map(Node::as_str) {
                        let value = value.trim();
                        if !value.is_empty() {
                            found.insert(value.to_lowercase());
                        }
                    }
                }
                for value in map.values() {
                    self.walk(value, found);
                }
            }
            // Tag payloads name files and secrets, not entities
            Node::Null | Node::Tagged(_) => {}
        }
    }

    fn visit_string(&self, text: &str, found: &mut BTreeSet<String>) {
        if ha_core::is_entity_id(text) {
            found.insert(text.to_string());
        }
        self.scanner.scan(text, found);
    }
}

/// Entity IDs used anywhere in `node`, with the default template scanner
pub fn extract_entity_ids(node: &Node) -> BTreeSet<String> {
    EntityExtractor::new().extract(node)
}
