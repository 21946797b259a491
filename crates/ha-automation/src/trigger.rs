//! Trigger views
//!
//! Triggers are event detectors that initiate automations. Both the current
//! `trigger:` key and the older `platform:` key name the trigger type.

use chrono::NaiveTime;
use ha_config::Node;
use std::borrow::Cow;

/// Minute patterns that make a `time_pattern` trigger fire on the hour, or every minute
const HOURLY_MINUTES: &[&str] = &["0", "00", "/1"];

/// A single trigger of an automation
#[derive(Debug, Clone, Copy)]
pub struct TriggerView<'a> {
    node: &'a Node,
}

impl<'a> TriggerView<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self { node }
    }

    /// Trigger platform name (e.g., "state", "time", "time_pattern")
    pub fn platform(&self) -> Option<&'a str> {
        self.node
            .get_any(&["trigger", "platform"])
            .and_then(Node::as_str)
    }

    /// String entries of the `entity_id` field (single value or list)
    pub fn entity_ids(&self) -> Vec<&'a str> {
        self.node
            .get("entity_id")
            .map(Node::one_or_many)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Node::as_str)
            .collect()
    }

    pub fn is_time_pattern(&self) -> bool {
        self.platform() == Some("time_pattern")
    }

    /// `hours:` of a time pattern, in string form
    pub fn hours(&self) -> Option<Cow<'a, str>> {
        self.node.get("hours").and_then(Node::scalar_text)
    }

    /// `minutes:` of a time pattern, in string form
    pub fn minutes(&self) -> Option<Cow<'a, str>> {
        self.node.get("minutes").and_then(Node::scalar_text)
    }

    /// A time pattern firing every hour on minute zero, or every minute
    ///
    /// `hours` must be absent or `*`.
    pub fn is_hourly(&self) -> bool {
        if !self.is_time_pattern() {
            return false;
        }
        let minutes_ok = self
            .minutes()
            .is_some_and(|m| HOURLY_MINUTES.iter().any(|pattern| *pattern == m));
        let hours_ok = self.hours().map_or(true, |h| h == "*");
        minutes_ok && hours_ok
    }

    /// Fixed times of day in `at:` (single value or list)
    ///
    /// Entity references and unparseable values are skipped.
    pub fn at_times(&self) -> Vec<NaiveTime> {
        self.node
            .get("at")
            .map(Node::one_or_many)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Node::as_str)
            .filter_map(parse_time_of_day)
            .collect()
    }

    /// Whether `at:` includes the given time of day
    pub fn fires_at(&self, time: NaiveTime) -> bool {
        self.at_times().contains(&time)
    }
}

/// Parse `HH:MM:SS` or `HH:MM`
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ha_config::load_yaml_string;

    fn trigger(yaml: &str) -> Node {
        load_yaml_string(yaml, "trigger.yaml").unwrap()
    }

    #[test]
    fn test_platform_keys() {
        let current = trigger("trigger: state\nentity_id: sensor.a\n");
        let legacy = trigger("platform: numeric_state\nentity_id: [sensor.a, sensor.b]\n");
        assert_eq!(TriggerView::new(&current).platform(), Some("state"));
        assert_eq!(TriggerView::new(&legacy).platform(), Some("numeric_state"));
        assert_eq!(TriggerView::new(&legacy).entity_ids(), vec!["sensor.a", "sensor.b"]);
    }

    #[test]
    fn test_entity_ids_skip_non_strings() {
        let node = trigger("platform: state\nentity_id: [sensor.a, 5, null]\n");
        assert_eq!(TriggerView::new(&node).entity_ids(), vec!["sensor.a"]);
    }

    #[test]
    fn test_hourly_patterns() {
        let cases = [
            ("trigger: time_pattern\nhours: '*'\nminutes: 0\n", true),
            ("trigger: time_pattern\nminutes: '00'\n", true),
            ("platform: time_pattern\nminutes: '/1'\n", true),
            ("trigger: time_pattern\nhours: '*'\nminutes: '/5'\n", false),
            ("trigger: time_pattern\nhours: '/2'\nminutes: 0\n", false),
            ("trigger: time\nat: '10:00'\n", false),
        ];
        for (yaml, expected) in cases {
            let node = trigger(yaml);
            assert_eq!(TriggerView::new(&node).is_hourly(), expected, "{yaml}");
        }
    }

    #[test]
    fn test_fixed_time() {
        let target = parse_time_of_day("21:05").unwrap();
        let short = trigger("trigger: time\nat: '21:05'\n");
        let long = trigger("trigger: time\nat: '21:05:00'\n");
        let list = trigger("trigger: time\nat: ['06:00', input_datetime.wake, '21:05']\n");
        let other = trigger("trigger: time\nat: '21:06'\n");
        assert!(TriggerView::new(&short).fires_at(target));
        assert!(TriggerView::new(&long).fires_at(target));
        assert!(TriggerView::new(&list).fires_at(target));
        assert!(!TriggerView::new(&other).fires_at(target));
    }

    #[test]
    fn test_parse_time_of_day() {
        assert!(parse_time_of_day("25:00").is_none());
        assert!(parse_time_of_day("sensor.time").is_none());
        assert_eq!(
            parse_time_of_day(" 07:30:15 "),
            NaiveTime::from_hms_opt(7, 30, 15)
        );
    }
}
