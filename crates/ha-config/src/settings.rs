//! Validator settings
//!
//! Which files are checked, where local entities are declared, which
//! integrations are trusted, and which automations the deployment is expected
//! to carry. Every field has a default so a settings file only needs to name
//! what it changes.

use ha_core::domains::{EXTERNAL_DOMAINS, KNOWN_EXTERNAL_ENTITIES, PARAMETER_SOURCES};
use ha_core::EntityId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Files checked by the syntax suite in the stock layout
const DEFAULT_SYNTAX_FILES: &[&str] = &[
    "automations_battery.yaml",
    "automations.yaml",
    "automations_errors.yaml",
    "template_sensors.yaml",
    "input_numbers.yaml",
    "input_boolean.yaml",
    "input_text.yaml",
    "input_select.yaml",
    "configuration.yaml",
    "scripts.yaml",
    "scenes.yaml",
    "utility_meter.yaml",
    "logger.yaml",
];

/// Automation documents scanned for entity references
const DEFAULT_AUTOMATION_FILES: &[&str] = &[
    "automations_battery.yaml",
    "automations.yaml",
    "automations_errors.yaml",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Top-level validator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorSettings {
    /// Files checked for syntax; empty means every YAML file in the directory
    pub syntax_files: Vec<String>,

    /// Automation documents scanned for entity references
    pub automation_files: Vec<String>,

    /// Files declaring parameter entities (`input_number`, ...)
    pub parameter_sources: Vec<ParameterSource>,

    /// File holding template sensor blocks
    pub template_sensor_file: String,

    /// Trusted integrations
    pub allowlists: Allowlists,

    /// Deployment-specific automation expectations
    pub behaviors: BehaviorExpectations,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            syntax_files: strings(DEFAULT_SYNTAX_FILES),
            automation_files: strings(DEFAULT_AUTOMATION_FILES),
            parameter_sources: PARAMETER_SOURCES
                .iter()
                .map(|(file, domain)| ParameterSource {
                    file: file.to_string(),
                    domain: domain.to_string(),
                })
                .collect(),
            template_sensor_file: "template_sensors.yaml".to_string(),
            allowlists: Allowlists::default(),
            behaviors: BehaviorExpectations::default(),
        }
    }
}

impl ValidatorSettings {
    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadSettings {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings = Self::from_yaml_str(&content).map_err(|e| ConfigError::ParseSettings {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("Loaded validator settings from {:?}", path);
        Ok(settings)
    }

    /// Parse settings from YAML text (an empty document gives the defaults)
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// A file whose top-level keys declare entities under one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSource {
    pub file: String,
    pub domain: String,
}

/// Entities and domains owned outside the configuration corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Allowlists {
    /// Domains whose entities are never checked
    pub external_domains: Vec<String>,

    /// Individual entities treated as declared; malformed entries are rejected
    pub known_external_entities: Vec<EntityId>,
}

impl Default for Allowlists {
    fn default() -> Self {
        Self {
            external_domains: strings(EXTERNAL_DOMAINS),
            known_external_entities: KNOWN_EXTERNAL_ENTITIES
                .iter()
                .filter_map(|entity| entity.parse().ok())
                .collect(),
        }
    }
}

impl Allowlists {
    /// Check if a domain is owned by an external integration
    pub fn is_external_domain(&self, domain: &str) -> bool {
        self.external_domains.iter().any(|d| d == domain)
    }
}

/// Automations a deployment is expected to carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorExpectations {
    /// Automation file holding the main control loop
    pub primary_file: String,

    /// Alias substring of the automation that runs every hour
    pub hourly_alias: String,

    /// Service name fragments that count as running an external script
    pub script_services: Vec<String>,

    /// Alias substring of the automation that runs once a day
    pub daily_alias: String,

    /// Time of day the daily automation fires (`HH:MM` or `HH:MM:SS`)
    pub daily_time: String,

    /// Case-insensitive alias keywords of required safety automations
    pub safety_keywords: Vec<String>,

    /// Automation file holding notifications
    pub notification_file: String,

    /// Case-insensitive alias keywords of required notification automations
    pub notification_keywords: Vec<String>,

    /// Automation file holding superseded automations
    pub legacy_file: String,

    /// Alias substring marking a superseded automation
    pub legacy_marker: String,
}

impl Default for BehaviorExpectations {
    fn default() -> Self {
        Self {
            primary_file: "automations_battery.yaml".to_string(),
            hourly_alias: "Wykonaj strategię (co 1h)".to_string(),
            script_services: strings(&["python_script", "pyscript"]),
            daily_alias: "Oblicz strategię dzienną".to_string(),
            daily_time: "21:05".to_string(),
            safety_keywords: strings(&["temperatura", "cwu"]),
            notification_file: "automations_errors.yaml".to_string(),
            notification_keywords: strings(&["event log", "telegram"]),
            legacy_file: "automations.yaml".to_string(),
            legacy_marker: "TOU".to_string(),
        }
    }
}
