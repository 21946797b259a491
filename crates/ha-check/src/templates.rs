//! Template sensor blocks
//!
//! A template sensor document is a list of blocks. Each block may hold a
//! `sensor` and/or a `binary_sensor` field, each one definition or a list.

use ha_config::Node;
use ha_core::domains::{BINARY_SENSOR_DOMAIN, SENSOR_DOMAIN};
use std::fmt;

/// Kind of template sensor, which is also its entity domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Sensor,
    BinarySensor,
}

impl SensorKind {
    pub const ALL: [SensorKind; 2] = [SensorKind::Sensor, SensorKind::BinarySensor];

    /// Entity domain of sensors of this kind
    pub fn domain(&self) -> &'static str {
        match self {
            SensorKind::Sensor => SENSOR_DOMAIN,
            SensorKind::BinarySensor => BINARY_SENSOR_DOMAIN,
        }
    }

    /// Block field holding definitions of this kind
    pub fn key(&self) -> &'static str {
        self.domain()
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One sensor definition and where it sits in the document
#[derive(Debug, Clone, Copy)]
pub struct SensorDefinition<'a> {
    pub kind: SensorKind,
    /// Index of the block in the document
    pub block: usize,
    /// Index of the definition within the block's field
    pub index: usize,
    pub node: &'a Node,
}

impl<'a> SensorDefinition<'a> {
    /// `unique_id:` in string form
    pub fn unique_id(&self) -> Option<String> {
        self.node
            .get("unique_id")
            .and_then(Node::scalar_text)
            .map(|id| id.into_owned())
            .filter(|id| !id.is_empty())
    }

    /// `name:` if it is a plain string
    pub fn name(&self) -> Option<&'a str> {
        self.node.get("name").and_then(Node::as_str)
    }
}

/// Every definition of a template sensor document, block by block
///
/// Within a block, `sensor` definitions come before `binary_sensor` ones.
/// Blocks that are not mappings are skipped, and so is a non-list document.
pub fn template_definitions(document: &Node) -> Vec<SensorDefinition<'_>> {
    let blocks = document.as_sequence().unwrap_or_default();
    let mut definitions = Vec::new();

    for (block, node) in blocks.iter().enumerate() {
        if node.as_mapping().is_none() {
            continue;
        }
        for kind in SensorKind::ALL {
            let entries = node.get(kind.key()).map(Node::one_or_many).unwrap_or_default();
            definitions.extend(entries.into_iter().enumerate().map(|(index, node)| {
                SensorDefinition {
                    kind,
                    block,
                    index,
                    node,
                }
            }));
        }
    }

    definitions
}

/// Number of definitions of each kind: `(sensors, binary_sensors)`
pub fn count_definitions(document: &Node) -> (usize, usize) {
    template_definitions(document)
        .iter()
        .fold((0, 0), |(sensors, binary), def| match def.kind {
            SensorKind::Sensor => (sensors + 1, binary),
            SensorKind::BinarySensor => (sensors, binary + 1),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_config::load_yaml_string;

    fn doc(yaml: &str) -> Node {
        load_yaml_string(yaml, "template_sensors.yaml").unwrap()
    }

    #[test]
    fn test_definitions_in_order() {
        let document = doc(r#"
- binary_sensor:
    - name: Grid available
  sensor:
    - name: Battery SOC (%)
      unique_id: battery_soc
    - name: Load
- sensor:
    name: Single
- "not a block"
"#);
        let defs = template_definitions(&document);
        let seen: Vec<(SensorKind, usize, usize)> =
            defs.iter().map(|d| (d.kind, d.block, d.index)).collect();
        assert_eq!(
            seen,
            vec![
                (SensorKind::Sensor, 0, 0),
                (SensorKind::Sensor, 0, 1),
                (SensorKind::BinarySensor, 0, 0),
                (SensorKind::Sensor, 1, 0),
            ]
        );
        assert_eq!(defs[0].unique_id().as_deref(), Some("battery_soc"));
        assert_eq!(defs[3].name(), Some("Single"));
        assert_eq!(count_definitions(&document), (3, 1));
    }

    #[test]
    fn test_numeric_unique_id() {
        let document = doc("- sensor:\n    - unique_id: 42\n");
        let defs = template_definitions(&document);
        assert_eq!(defs[0].unique_id().as_deref(), Some("42"));
    }

    #[test]
    fn test_non_list_document() {
        assert!(template_definitions(&doc("sensor: []\n")).is_empty());
        assert!(template_definitions(&Node::Null).is_empty());
    }
}
