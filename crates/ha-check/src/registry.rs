//! Local entity registry
//!
//! The set of entity IDs the configuration declares itself: parameter helpers
//! (`input_number`, `input_boolean`, ...), template sensors, and the entities
//! of external integrations listed in the settings. Built once per run and
//! read-only afterwards.

use ha_config::{ConfigError, Node, ValidatorSettings, YamlLoader};
use ha_core::EntityId;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::report::Report;
use crate::templates::template_definitions;

/// Entity object ID synthesized from a friendly name
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_`, and strips `_` from both ends: `"Battery SOC (%)"` gives
/// `battery_soc`.
pub fn slugify(name: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new("[^a-z0-9]+").expect("valid slug pattern"));

    let lower = name.to_lowercase();
    separators
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Entity IDs declared by the configuration
///
/// Every member is a well-formed [`EntityId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalRegistry {
    entities: BTreeSet<EntityId>,
}

impl LocalRegistry {
    /// Whether `entity_id` is declared; a malformed ID never is
    pub fn contains(&self, entity_id: &str) -> bool {
        entity_id
            .parse::<EntityId>()
            .is_ok_and(|id| self.entities.contains(&id))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity IDs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.iter()
    }
}

impl FromIterator<EntityId> for LocalRegistry {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

/// Accumulates declarations into a [`LocalRegistry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entities: BTreeSet<EntityId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `<domain>.<key>` for every top-level key of a parameter document
    ///
    /// Returns how many entity IDs were added. A non-mapping document
    /// declares nothing; a key that does not form a valid entity ID is
    /// skipped.
    pub fn add_parameters(&mut self, domain: &str, document: &Node) -> usize {
        let Some(map) = document.as_mapping() else {
            return 0;
        };
        map.keys()
            .filter(|key| self.insert(domain, key.as_str()))
            .count()
    }

    /// Add the entity ID of every template sensor definition
    ///
    /// `unique_id` wins over `name`; a definition with neither, or whose name
    /// slugifies to nothing, is skipped. Returns how many entity IDs were
    /// added.
    pub fn add_template_sensors(&mut self, document: &Node) -> usize {
        let mut added = 0;
        for definition in template_definitions(document) {
            let object_id = match (definition.unique_id(), definition.name()) {
                (Some(unique_id), _) => unique_id,
                (None, Some(name)) => slugify(name),
                (None, None) => continue,
            };
            if self.insert(definition.kind.domain(), &object_id) {
                added += 1;
            }
        }
        added
    }

    /// Add entity IDs declared outside the configuration
    pub fn add_known<I>(&mut self, entity_ids: I)
    where
        I: IntoIterator<Item = EntityId>,
    {
        self.entities.extend(entity_ids);
    }

    pub fn build(self) -> LocalRegistry {
        LocalRegistry {
            entities: self.entities,
        }
    }

    /// Insert `<domain>.<object_id>`; false when it is not a valid entity ID
    fn insert(&mut self, domain: &str, object_id: &str) -> bool {
        match EntityId::new(domain, object_id) {
            Ok(entity_id) => {
                self.entities.insert(entity_id);
                true
            }
            Err(e) => {
                debug!("Skipping declaration '{}.{}': {}", domain, object_id, e);
                false
            }
        }
    }
}

/// Load a declaration source; failures become a warning and `None`
fn load_source(loader: &YamlLoader, file: &str, report: &mut Report) -> Option<Node> {
    match loader.load_file(file) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!("Declaration source {} skipped: {}", file, e);
            report.warn(source_failure(file, &e));
            None
        }
    }
}

fn source_failure(file: &str, error: &ConfigError) -> String {
    if error.is_not_found() {
        format!("{file}: file not found")
    } else {
        format!("{file}: {error}")
    }
}

/// Build the registry from the sources named in `settings`
///
/// Never fails: an unreadable source is reported as a warning and contributes
/// nothing.
pub fn build_local_registry(
    loader: &YamlLoader,
    settings: &ValidatorSettings,
    report: &mut Report,
) -> LocalRegistry {
    let mut builder = RegistryBuilder::new();

    for source in &settings.parameter_sources {
        if let Some(document) = load_source(loader, &source.file, report) {
            let count = builder.add_parameters(&source.domain, &document);
            report.info(format!("{}: {} entities", source.file, count));
        }
    }

    let sensor_file = settings.template_sensor_file.as_str();
    if let Some(document) = load_source(loader, sensor_file, report) {
        let count = builder.add_template_sensors(&document);
        report.info(format!("{sensor_file}: {count} template sensors"));
    }

    builder.add_known(settings.allowlists.known_external_entities.iter().cloned());

    let registry = builder.build();
    debug!("Local registry holds {} entities", registry.len());
    report.info(format!("{} known entities in total", registry.len()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_config::load_yaml_string;

    fn doc(yaml: &str) -> Node {
        load_yaml_string(yaml, "source.yaml").unwrap()
    }

    #[test]
    fn test_slugify_table() {
        let cases = [
            ("Battery SOC (%)", "battery_soc"),
            ("Battery SOC", "battery_soc"),
            ("Grid -- Power", "grid_power"),
            ("already_slug", "already_slug"),
            ("__Leading and trailing__", "leading_and_trailing"),
            ("PV 2 Power", "pv_2_power"),
            ("Cena prądu", "cena_pr_du"),
            ("%%%", ""),
        ];
        for (name, expected) in cases {
            assert_eq!(slugify(name), expected, "{name}");
        }
    }

    #[test]
    fn test_add_parameters() {
        let mut builder = RegistryBuilder::new();
        let count = builder.add_parameters(
            "input_number",
            &doc("battery_min_soc:\n  min: 0\ngrid_limit:\n  max: 10\n"),
        );
        assert_eq!(count, 2);
        assert_eq!(builder.add_parameters("input_text", &Node::Null), 0);

        let registry = builder.build();
        assert!(registry.contains("input_number.battery_min_soc"));
        assert!(registry.contains("input_number.grid_limit"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_add_template_sensors() {
        let mut builder = RegistryBuilder::new();
        let added = builder.add_template_sensors(&doc(r#"
- sensor:
    - name: Battery SOC (%)
    - name: Ignored name
      unique_id: grid_power_avg
    - state: "{{ 1 }}"
  binary_sensor:
    name: Cheap Hour
"#));
        assert_eq!(added, 3);

        let registry = builder.build();
        let all: Vec<String> = registry.iter().map(EntityId::to_string).collect();
        assert_eq!(
            all,
            vec![
                "binary_sensor.cheap_hour",
                "sensor.battery_soc",
                "sensor.grid_power_avg",
            ]
        );
        assert!(!registry.contains("sensor.ignored_name"));
    }

    #[test]
    fn test_unusable_names_declare_nothing() {
        let mut builder = RegistryBuilder::new();
        let added = builder.add_template_sensors(&doc(r#"
- sensor:
    - name: "%%%"
    - unique_id: Grid-Power
  binary_sensor:
    - name: "(!)"
"#));
        assert_eq!(added, 0);

        let registry = builder.build();
        assert!(registry.is_empty());
        assert!(!registry.contains("sensor."));
        assert!(!registry.contains("binary_sensor."));
    }

    #[test]
    fn test_malformed_parameter_keys_skipped() {
        let mut builder = RegistryBuilder::new();
        let count = builder.add_parameters(
            "input_boolean",
            &doc("auto_mode:\n  name: Auto\nBad Key:\n  name: Bad\n"),
        );
        assert_eq!(count, 1);

        let registry = builder.build();
        assert!(registry.contains("input_boolean.auto_mode"));
        assert!(!registry.contains("input_boolean.Bad Key"));
    }

    #[test]
    fn test_add_known() {
        let mut builder = RegistryBuilder::new();
        let sun: EntityId = "sun.sun".parse().unwrap();
        builder.add_known([sun.clone(), "weather.home".parse().unwrap()]);
        builder.add_known(vec![sun]);
        assert_eq!(builder.build().len(), 2);
    }
}
