//! YAML document loader with custom tag support
//!
//! Accepts Home Assistant's custom YAML tags without resolving them:
//! - `!include path`
//! - `!include_dir_list dir`, `!include_dir_merge_list dir`
//! - `!include_dir_named dir`, `!include_dir_merge_named dir`
//! - `!secret key`
//! - `!env_var VAR`
//!
//! Each tag is kept in the tree as a [`Node::Tagged`] carrying the tag and its
//! scalar payload. Any other tag is a parse error.

use crate::error::{ConfigError, ConfigResult};
use crate::node::{HaTag, Mapping, Node, Scalar, TaggedNode};
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// YAML loader rooted at a configuration directory
#[derive(Debug, Clone)]
pub struct YamlLoader {
    /// Base directory for resolving relative paths
    config_dir: PathBuf,
}

impl YamlLoader {
    /// Create a new YAML loader for the given config directory
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Load the first document of a YAML file (`Node::Null` if it has none)
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<Node> {
        let documents = self.load_documents(path)?;
        Ok(documents.into_iter().next().unwrap_or_default())
    }

    /// Load every document of a YAML file
    pub fn load_documents(&self, path: impl AsRef<Path>) -> ConfigResult<Vec<Node>> {
        let path = self.resolve_path(path.as_ref());
        debug!("Loading YAML file: {:?}", path);

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        self.load_string(&content, &path)
    }

    /// Load every document of a YAML string
    pub fn load_string(&self, content: &str, source_path: &Path) -> ConfigResult<Vec<Node>> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|e| ConfigError::ParseYaml {
                path: source_path.to_path_buf(),
                source: e,
            })?;
            documents.push(self.convert(value, source_path)?);
        }
        trace!(
            "Parsed {} document(s) from {:?}",
            documents.len(),
            source_path
        );
        Ok(documents)
    }

    /// Convert a YAML value into a document node
    fn convert(&self, value: Value, source_path: &Path) -> ConfigResult<Node> {
        match value {
            Value::Null => Ok(Node::Null),
            Value::Bool(b) => Ok(Node::Scalar(Scalar::Bool(b))),
            Value::Number(n) => Ok(Node::Scalar(number_to_scalar(&n))),
            Value::String(s) => Ok(Node::Scalar(Scalar::String(s))),
            Value::Sequence(seq) => {
                let result: ConfigResult<Vec<Node>> = seq
                    .into_iter()
                    .map(|v| self.convert(v, source_path))
                    .collect();
                Ok(Node::Sequence(result?))
            }
            Value::Mapping(map) => {
                let mut result = Mapping::with_capacity(map.len());
                for (k, v) in map {
                    result.insert(key_to_string(k), self.convert(v, source_path)?);
                }
                Ok(Node::Mapping(result))
            }
            Value::Tagged(tagged) => self.convert_tagged(*tagged, source_path),
        }
    }

    /// Convert a tagged value, keeping the tag unresolved
    fn convert_tagged(
        &self,
        tagged: serde_yaml::value::TaggedValue,
        source_path: &Path,
    ) -> ConfigResult<Node> {
        let name = tagged.tag.to_string();
        trace!("Processing tag '{}' with value {:?}", name, tagged.value);

        let tag = HaTag::parse(&name).ok_or_else(|| ConfigError::UnknownTag {
            path: source_path.to_path_buf(),
            tag: name.clone(),
        })?;

        let value = match tagged.value {
            Value::Null => Scalar::String(String::new()),
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => number_to_scalar(&n),
            Value::String(s) => Scalar::String(s),
            _ => {
                return Err(ConfigError::InvalidTagPayload {
                    path: source_path.to_path_buf(),
                    tag: tag.as_str().to_string(),
                })
            }
        };

        Ok(Node::Tagged(Box::new(TaggedNode { tag, value })))
    }

    /// Resolve a path relative to the config directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    /// Whether a file exists relative to the config directory
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolve_path(path.as_ref()).is_file()
    }

    /// Names of all YAML files in the config directory, sorted
    pub fn yaml_files(&self) -> ConfigResult<Vec<String>> {
        let dir = &self.config_dir;
        let mut files: Vec<String> = fs::read_dir(dir)
            .map_err(|e| ConfigError::ReadFile {
                path: dir.clone(),
                source: e,
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .filter_map(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
            .collect();

        files.sort();
        Ok(files)
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn number_to_scalar(n: &serde_yaml::Number) -> Scalar {
    match n.as_i64() {
        Some(i) => Scalar::Integer(i),
        None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// Mapping keys are stringified; non-scalar keys use their YAML rendering
fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .unwrap_or_default()
            .trim()
            .to_string(),
    }
}

/// Load the first document of a YAML string
pub fn load_yaml_string(content: &str, source_name: &str) -> ConfigResult<Node> {
    let documents = YamlLoader::new(".").load_string(content, Path::new(source_name))?;
    Ok(documents.into_iter().next().unwrap_or_default())
}
