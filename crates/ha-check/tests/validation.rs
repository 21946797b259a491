//! End-to-end runs over fixture configuration directories

use ha_check::{run, Report, Severity, Suite};
use ha_config::{ValidatorSettings, YamlLoader};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    let mut file = fs::File::create(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

fn run_suite(dir: &Path, suite: Suite) -> Report {
    let loader = YamlLoader::new(dir);
    run(&loader, &ValidatorSettings::default(), &[suite])
}

fn messages(report: &Report, severity: Severity) -> Vec<String> {
    report
        .findings()
        .iter()
        .filter(|f| f.severity == severity)
        .map(|f| f.message.clone())
        .collect()
}

const BATTERY_AUTOMATIONS: &str = r#"
- id: "1700000000001"
  alias: Wykonaj strategię (co 1h)
  mode: single
  trigger:
    - platform: time_pattern
      hours: "*"
      minutes: "00"
  condition:
    - condition: template
      value_template: "{{ states('sensor.akumulatory_stan_pojemnosci') | float > 10 }}"
  action:
    - service: pyscript.battery_algorithm
      data:
        soc: "{{ states('sensor.battery_soc') }}"
- id: "1700000000002"
  alias: Oblicz strategię dzienną
  trigger:
    - platform: time
      at: "21:05:00"
  action:
    - service: pyscript.daily_strategy
- id: "1700000000003"
  alias: Ochrona temperatura baterii
  trigger:
    - platform: numeric_state
      entity_id: sensor.battery_temperature
      above: 45
  action:
    - service: switch.turn_off
      target:
        entity_id: switch.batteries_force_charge_discharge
- id: "1700000000004"
  alias: CWU grzanie
  trigger:
    - platform: state
      entity_id: water_heater.bodynek_nb_tank
  action:
    - repeat:
        count: 5
        sequence:
          - delay: 1
"#;

const TEMPLATE_SENSORS: &str = r#"
- sensor:
    - name: Battery SOC (%)
      state: "{{ 50 }}"
    - name: Grid Power
      unique_id: grid_power
  binary_sensor:
    - name: Cheap Hour
      unique_id: cheap_hour
"#;

fn healthy_config(dir: &Path) {
    write_file(dir, "automations_battery.yaml", BATTERY_AUTOMATIONS);
    write_file(
        dir,
        "automations_errors.yaml",
        r#"
- id: err1
  alias: Event log błędów
  trigger: {platform: event, event_type: system_log_event}
  condition:
    - condition: state
      entity_id: input_boolean.notifications
      state: "on"
  action:
    - service: notify.notify
- id: err2
  alias: Telegram alert
  trigger: {platform: homeassistant, event: start}
  action:
    - service: telegram_bot.send_message
"#,
    );
    write_file(
        dir,
        "automations.yaml",
        "- id: tou1\n  alias: TOU charge\n  enabled: false\n  trigger: {platform: time, at: '02:00'}\n  action: []\n",
    );
    write_file(dir, "template_sensors.yaml", TEMPLATE_SENSORS);
    write_file(dir, "input_boolean.yaml", "notifications:\n  name: Notifications\n");
    write_file(dir, "input_numbers.yaml", "min_soc:\n  min: 0\n  max: 100\n");
    write_file(dir, "input_text.yaml", "");
    write_file(dir, "input_select.yaml", "mode:\n  options: [a, b]\n");
    write_file(
        dir,
        "configuration.yaml",
        "homeassistant:\n  name: Home\nautomation: !include automations.yaml\napi_key: !secret api_key\n",
    );
}

#[test]
fn test_healthy_configuration_passes() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());

    let loader = YamlLoader::new(dir.path());
    let report = run(&loader, &ValidatorSettings::default(), &[]);

    assert!(!report.has_failures(), "{report}");
    assert!(report.summary().passed > 0);
    // Files absent from the fixture are skipped, not failed
    assert!(messages(&report, Severity::Skip).contains(&"scenes.yaml: file not found".to_string()));
}

#[test]
fn test_syntax_suite() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    write_file(dir.path(), "scripts.yaml", "broken: [unclosed\n");
    write_file(dir.path(), "logger.yaml", "# nothing yet\n");
    write_file(dir.path(), "scenes.yaml", "scene: !custom_tag x\n");

    let report = run_suite(dir.path(), Suite::Syntax);

    let failed = messages(&report, Severity::Fail);
    assert_eq!(
        failed,
        vec!["scripts.yaml: syntax error", "scenes.yaml: syntax error"]
    );
    assert!(messages(&report, Severity::Warn).contains(&"logger.yaml: file is empty".to_string()));
    // One failing file does not stop the others
    assert!(messages(&report, Severity::Pass)
        .contains(&"configuration.yaml: valid YAML syntax".to_string()));
    assert!(messages(&report, Severity::Info)
        .contains(&"template_sensors.yaml: 2 sensors, 1 binary_sensors".to_string()));
    assert!(messages(&report, Severity::Info)
        .contains(&"automations_battery.yaml: 4 automations validated".to_string()));
}

#[test]
fn test_structural_warnings() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "automations.yaml",
        r#"
- description: no identity, no trigger
  action: []
- alias: Bad trigger
  trigger:
    platform: state
    entity_id: [sensor.ok, Not-An-Entity]
  action:
    service: light.turn_on
"#,
    );

    let report = run_suite(dir.path(), Suite::Syntax);

    let warnings = messages(&report, Severity::Warn);
    assert_eq!(warnings.len(), 4, "{warnings:?}");
    assert!(warnings.contains(&"automations.yaml [0] has neither id nor alias".to_string()));
    assert!(warnings
        .contains(&"automations.yaml Bad trigger has an invalid trigger entity_id: Not-An-Entity".to_string()));
    assert!(!report.has_failures());
}

#[test]
fn test_entities_suite_resolves_everything() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());

    let report = run_suite(dir.path(), Suite::Entities);

    assert!(!report.has_failures(), "{report}");
    let passed = messages(&report, Severity::Pass);
    assert!(passed.contains(&"all entities are declared or external".to_string()));
    assert!(passed.contains(&"no duplicate unique_id (2 distinct)".to_string()));
    assert!(messages(&report, Severity::Info).contains(&"input_text.yaml: 0 entities".to_string()));
}

#[test]
fn test_missing_entities_are_warnings() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    write_file(
        dir.path(),
        "automations_errors.yaml",
        r#"
- alias: Uses unknown
  trigger:
    platform: state
    entity_id: sensor.nonexistent_thing
  action:
    - service: light.turn_on
      target:
        entity_id: light.zzz_lamp
"#,
    );

    let report = run_suite(dir.path(), Suite::Entities);

    assert!(!report.has_failures());
    assert_eq!(
        messages(&report, Severity::Warn),
        vec![
            "possibly missing entity: light.turn_on",
            "possibly missing entity: light.zzz_lamp",
            "possibly missing entity: sensor.nonexistent_thing",
        ]
    );
}

#[test]
fn test_registry_sources_degrade_to_warnings() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "input_numbers.yaml", "key: [broken\n");

    let report = run_suite(dir.path(), Suite::Entities);

    let warnings = messages(&report, Severity::Warn);
    assert!(warnings.iter().any(|w| w.starts_with("input_numbers.yaml: failed to parse")));
    assert!(warnings.contains(&"input_boolean.yaml: file not found".to_string()));
    assert!(warnings.contains(&"template_sensors.yaml: file not found".to_string()));
    assert!(!report.has_failures());
}

#[test]
fn test_nameless_template_sensor_declares_nothing() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    let sensors = format!("{TEMPLATE_SENSORS}- sensor:\n    - name: \"%%%\"\n");
    write_file(dir.path(), "template_sensors.yaml", &sensors);
    write_file(
        dir.path(),
        "automations_errors.yaml",
        "- alias: Blank\n  trigger: {platform: state, entity_id: \"sensor.\"}\n  action: []\n",
    );

    let report = run_suite(dir.path(), Suite::Entities);

    assert!(messages(&report, Severity::Info)
        .contains(&"template_sensors.yaml: 3 template sensors".to_string()));
    assert_eq!(
        messages(&report, Severity::Warn),
        vec!["possibly missing entity: sensor."]
    );
}

#[test]
fn test_duplicate_unique_id_fails() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    write_file(
        dir.path(),
        "template_sensors.yaml",
        r#"
- sensor:
    - unique_id: grid
- binary_sensor:
    - unique_id: grid
"#,
    );

    let report = run_suite(dir.path(), Suite::Entities);

    assert_eq!(
        messages(&report, Severity::Fail),
        vec!["duplicate unique_id 'grid' at binary_sensor[1][0] (first declared at sensor[0][0])"]
    );
    assert!(report.has_failures());
}

#[test]
fn test_automations_suite() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());

    let report = run_suite(dir.path(), Suite::Automations);

    assert!(!report.has_failures(), "{report}");
    assert!(messages(&report, Severity::Warn).is_empty(), "{report}");
    let info = messages(&report, Severity::Info);
    assert!(info.contains(&"1/4 automations declare a mode".to_string()));
    assert!(info.contains(&"1/2 automations have conditions".to_string()));
    assert!(messages(&report, Severity::Pass)
        .contains(&"\"CWU grzanie\" repeat has an exit condition (count: 5)".to_string()));
}

#[test]
fn test_duplicate_automation_ids_fail_once() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    write_file(
        dir.path(),
        "automations_battery.yaml",
        "- id: same\n  alias: A\n- id: same\n  alias: B\n- id: other\n",
    );

    let report = run_suite(dir.path(), Suite::Automations);

    assert_eq!(report.count(Severity::Fail), 1);
    assert_eq!(messages(&report, Severity::Fail), vec!["duplicate automation ids"]);
}

#[test]
fn test_empty_legacy_file_passes() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    write_file(dir.path(), "automations.yaml", "");

    let report = run_suite(dir.path(), Suite::Automations);

    assert!(messages(&report, Severity::Pass).contains(&"no legacy (TOU) automations".to_string()));
    assert!(!report.has_failures());
}

#[test]
fn test_unreadable_automation_file_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());
    fs::remove_file(dir.path().join("automations_errors.yaml")).unwrap();

    let report = run_suite(dir.path(), Suite::Automations);

    assert_eq!(
        messages(&report, Severity::Fail),
        vec!["automations_errors.yaml: cannot be loaded"]
    );
    assert!(messages(&report, Severity::Pass)
        .contains(&"all legacy (TOU) automations are disabled".to_string()));
}

#[test]
fn test_custom_settings() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "helpers.yaml", "boost:\n  name: Boost\n");
    write_file(
        dir.path(),
        "rules.yaml",
        "- alias: Boost\n  trigger: {platform: state, entity_id: input_boolean.boost}\n  action: {service: mqtt.publish}\n",
    );

    let settings = ValidatorSettings::from_yaml_str(
        r#"
syntax_files: []
automation_files: [rules.yaml]
parameter_sources:
  - file: helpers.yaml
    domain: input_boolean
allowlists:
  external_domains: [mqtt]
  known_external_entities: []
"#,
    )
    .unwrap();

    let loader = YamlLoader::new(dir.path());
    let report = run(&loader, &settings, &[Suite::Syntax, Suite::Entities]);

    // Empty syntax list means every YAML file in the directory
    assert_eq!(
        messages(&report, Severity::Pass)
            .iter()
            .filter(|m| m.ends_with("valid YAML syntax"))
            .count(),
        2
    );
    assert!(messages(&report, Severity::Pass)
        .contains(&"all entities are declared or external".to_string()));
}

#[test]
fn test_report_serializes() {
    let dir = TempDir::new().unwrap();
    healthy_config(dir.path());

    let report = run_suite(dir.path(), Suite::Entities);
    let json = serde_json::to_value(&report).unwrap();

    let findings = json["findings"].as_array().unwrap();
    assert_eq!(findings.len(), report.findings().len());
    assert_eq!(findings[0]["section"], "Local entities");
}
