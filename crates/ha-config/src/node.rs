//! Generic document tree
//!
//! Configuration documents are loaded into [`Node`], a tagged union over the
//! shapes YAML can produce. Every accessor returns an `Option` so callers never
//! assume a shape without checking it.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// Ordered mapping of stringified keys to nodes
pub type Mapping = IndexMap<String, Node>;

/// A scalar leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// String form of the scalar (`0` and `"0"` both give `"0"`)
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Scalar::String(s) => Cow::Borrowed(s.as_str()),
            Scalar::Bool(b) => Cow::Owned(b.to_string()),
            Scalar::Integer(i) => Cow::Owned(i.to_string()),
            Scalar::Float(f) => Cow::Owned(f.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Home Assistant's custom YAML tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaTag {
    Include,
    IncludeDirList,
    IncludeDirMergeList,
    IncludeDirNamed,
    IncludeDirMergeNamed,
    Secret,
    EnvVar,
}

impl HaTag {
    /// Every recognised tag
    pub const ALL: [HaTag; 7] = [
        HaTag::Include,
        HaTag::IncludeDirList,
        HaTag::IncludeDirMergeList,
        HaTag::IncludeDirNamed,
        HaTag::IncludeDirMergeNamed,
        HaTag::Secret,
        HaTag::EnvVar,
    ];

    /// Look up a tag by name, with or without the leading `!`
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.strip_prefix('!').unwrap_or(name);
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }

    /// Tag name without the leading `!`
    pub fn as_str(&self) -> &'static str {
        match self {
            HaTag::Include => "include",
            HaTag::IncludeDirList => "include_dir_list",
            HaTag::IncludeDirMergeList => "include_dir_merge_list",
            HaTag::IncludeDirNamed => "include_dir_named",
            HaTag::IncludeDirMergeNamed => "include_dir_merge_named",
            HaTag::Secret => "secret",
            HaTag::EnvVar => "env_var",
        }
    }
}

impl fmt::Display for HaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.as_str())
    }
}

/// A tagged scalar such as `!secret api_key`, kept unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedNode {
    pub tag: HaTag,
    pub value: Scalar,
}

/// A node of a loaded configuration document
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    Tagged(Box<TaggedNode>),
}

impl Node {
    /// Build a string node
    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(s.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Anything except null and an empty sequence
    pub fn has_content(&self) -> bool {
        match self {
            Node::Null => false,
            Node::Sequence(items) => !items.is_empty(),
            _ => true,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<&TaggedNode> {
        match self {
            Node::Tagged(tagged) => Some(tagged),
            _ => None,
        }
    }

    /// The string value, if this node is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// String form of any scalar node
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        self.as_scalar().map(Scalar::text)
    }

    /// Look up a mapping key
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// First of `keys` that is present with a non-null value
    ///
    /// Used for fields with singular/plural spellings (`trigger`/`triggers`).
    pub fn get_any(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|node| !node.is_null())
    }

    /// Whether a mapping key is present with a non-null value
    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some_and(|node| !node.is_null())
    }

    /// Normalise a one-or-many field to a list
    pub fn one_or_many(&self) -> Vec<&Node> {
        match self {
            Node::Null => Vec::new(),
            Node::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Number of entries for a one-or-many field
    pub fn count(&self) -> usize {
        match self {
            Node::Null => 0,
            Node::Sequence(items) => items.len(),
            _ => 1,
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::string(s)
    }
}
