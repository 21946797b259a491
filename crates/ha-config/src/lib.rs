//! YAML configuration loading for Home Assistant configuration checks
//!
//! Documents are read into a generic [`Node`] tree. Home Assistant's tags
//! (`!include`, the four `!include_dir_*` forms, `!secret`, `!env_var`) are
//! accepted and kept as [`Node::Tagged`] values: includes are not followed
//! and secrets are never read, so a configuration can be checked without the
//! files or credentials it points at. Any other tag is a parse error.
//!
//! It also holds the [`ValidatorSettings`] that say which documents to check.
//!
//! # Example
//!
//! ```ignore
//! use ha_config::YamlLoader;
//!
//! let loader = YamlLoader::new("/config");
//! let automations = loader.load_file("automations.yaml")?;
//! assert!(automations.as_sequence().is_some());
//!
//! for file in loader.yaml_files()? {
//!     let documents = loader.load_documents(&file)?;
//! }
//! ```

mod error;
mod loader;
mod node;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml_string, YamlLoader};
pub use node::{HaTag, Mapping, Node, Scalar, TaggedNode};
pub use settings::{Allowlists, BehaviorExpectations, ParameterSource, ValidatorSettings};
