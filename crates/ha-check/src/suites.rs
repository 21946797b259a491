//! Validation suites
//!
//! A run is a sequence of suites sharing one [`Report`]. Each document is
//! loaded and checked on its own: a broken file is reported and the run moves
//! on to the next one.

use ha_automation::AutomationResult;
use ha_config::{BehaviorExpectations, ConfigError, Node, ValidatorSettings, YamlLoader};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::behaviors::{check_legacy, check_notifications, check_primary};
use crate::duplicates::scan_unique_ids;
use crate::extract::EntityExtractor;
use crate::registry::build_local_registry;
use crate::report::{Report, Severity};
use crate::resolve::resolve;
use crate::structure::{check_automation_structure, check_template_sensor_structure};

/// A group of checks selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    /// YAML syntax and automation structure
    Syntax,
    /// Entity reference resolution and duplicate `unique_id`s
    Entities,
    /// Deployment-specific automation checks
    Automations,
}

impl Suite {
    /// Every suite, in run order
    pub const ALL: [Suite; 3] = [Suite::Syntax, Suite::Entities, Suite::Automations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Syntax => "syntax",
            Suite::Entities => "entities",
            Suite::Automations => "automations",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suite::ALL
            .into_iter()
            .find(|suite| suite.as_str() == s)
            .ok_or_else(|| format!("unknown suite '{s}'"))
    }
}

/// Run the given suites in order (all of them when `suites` is empty)
pub fn run(loader: &YamlLoader, settings: &ValidatorSettings, suites: &[Suite]) -> Report {
    let suites = if suites.is_empty() {
        &Suite::ALL[..]
    } else {
        suites
    };

    let mut report = Report::new();
    for suite in suites {
        info!("Running {} suite in {:?}", suite, loader.config_dir());
        match suite {
            Suite::Syntax => run_syntax(loader, settings, &mut report),
            Suite::Entities => run_entities(loader, settings, &mut report),
            Suite::Automations => run_automations(loader, settings, &mut report),
        }
    }
    report
}

/// Files the syntax suite checks
fn syntax_targets(
    loader: &YamlLoader,
    settings: &ValidatorSettings,
    report: &mut Report,
) -> Vec<String> {
    if !settings.syntax_files.is_empty() {
        return settings.syntax_files.clone();
    }
    match loader.yaml_files() {
        Ok(files) => files,
        Err(e) => {
            report.fail(format!("cannot list configuration directory: {e}"));
            Vec::new()
        }
    }
}

/// Parse every target file and run the structural checks
pub fn run_syntax(loader: &YamlLoader, settings: &ValidatorSettings, report: &mut Report) {
    report.section("YAML syntax");

    for file in syntax_targets(loader, settings, report) {
        if !loader.exists(&file) {
            report.skip(format!("{file}: file not found"));
            continue;
        }

        let documents = match loader.load_documents(&file) {
            Ok(documents) => documents,
            Err(e) => {
                report.record(
                    Severity::Fail,
                    format!("{file}: syntax error"),
                    vec![e.to_string()],
                );
                continue;
            }
        };

        if documents.iter().all(Node::is_null) {
            report.warn(format!("{file}: file is empty"));
            continue;
        }
        // Structural checks look at the first document only
        let document = &documents[0];

        if file.starts_with("automations") {
            check_automation_structure(&file, document, report);
        }
        if file == settings.template_sensor_file {
            check_template_sensor_structure(&file, document, report);
        }

        report.pass(format!("{file}: valid YAML syntax"));
    }
}

/// Build the registry, resolve used entity IDs, and look for duplicate `unique_id`s
pub fn run_entities(loader: &YamlLoader, settings: &ValidatorSettings, report: &mut Report) {
    report.section("Local entities");
    let registry = build_local_registry(loader, settings, report);

    report.section("Used entities");
    let extractor = EntityExtractor::new();
    let mut documents = Vec::new();
    for file in &settings.automation_files {
        match loader.load_file(file) {
            Ok(document) => {
                debug!("Scanning {} for entity references", file);
                report.info(format!("{file}: analysed"));
                documents.push(document);
            }
            Err(e) => {
                warn!("Skipping {}: {}", file, e);
                report.warn(format!("{file}: {}", failure_reason(&e)));
            }
        }
    }
    // Only list documents hold automations
    let used = extractor.extract_all(documents.iter().filter(|d| d.as_sequence().is_some()));
    report.info(format!("{} entities used in total", used.len()));

    report.section("Entity resolution");
    let resolution = resolve(&used, &registry, &settings.allowlists);
    debug!("Classified {} used entities", resolution.total());
    if resolution.is_complete() {
        report.pass("all entities are declared or external");
    } else {
        for entity_id in &resolution.missing {
            report.warn(format!("possibly missing entity: {entity_id}"));
        }
    }
    report.info(format!(
        "{} external, {} resolved",
        resolution.external.len(),
        resolution.resolved.len()
    ));

    report.section("Duplicate unique_id");
    let file = settings.template_sensor_file.as_str();
    match loader.load_file(file) {
        Ok(document) => {
            let scan = scan_unique_ids(&document);
            for duplicate in &scan.duplicates {
                report.fail(duplicate.to_string());
            }
            if !scan.has_duplicates() {
                report.pass(format!(
                    "no duplicate unique_id ({} distinct)",
                    scan.distinct()
                ));
            }
        }
        Err(e) => report.warn(format!("{file}: {}", failure_reason(&e))),
    }
}

/// Deployment-specific checks, one automation file at a time
pub fn run_automations(loader: &YamlLoader, settings: &ValidatorSettings, report: &mut Report) {
    let behaviors = &settings.behaviors;
    type Check = fn(&Node, &BehaviorExpectations, &mut Report) -> AutomationResult<()>;

    let files: [(&str, Check); 3] = [
        (behaviors.primary_file.as_str(), check_primary),
        (behaviors.notification_file.as_str(), check_notifications),
        (behaviors.legacy_file.as_str(), check_legacy),
    ];

    for (file, check) in files {
        report.section(file);
        let document = match loader.load_file(file) {
            Ok(document) => document,
            Err(e) => {
                report.record(
                    Severity::Fail,
                    format!("{file}: cannot be loaded"),
                    vec![failure_reason(&e)],
                );
                continue;
            }
        };
        if let Err(e) = check(&document, behaviors, report) {
            report.fail(format!("{file}: {e}"));
        }
    }
}

fn failure_reason(error: &ConfigError) -> String {
    if error.is_not_found() {
        "file not found".to_string()
    } else {
        error.to_string()
    }
}
