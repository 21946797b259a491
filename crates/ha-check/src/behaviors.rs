//! Deployment-specific automation checks
//!
//! A deployment expects certain automations to exist: an hourly control loop
//! that runs a script, a daily planning run at a fixed time, safety guards,
//! notifications. What to look for comes from [`BehaviorExpectations`].
//!
//! Absent or misconfigured automations are warnings. Only a repeated
//! automation `id` fails the run.

use chrono::NaiveTime;
use ha_automation::{
    automations, find_repeats, parse_time_of_day, repeat_exit, service_name, Automation,
    AutomationResult,
};
use ha_config::{BehaviorExpectations, Node};
use indexmap::IndexMap;

use crate::report::{Report, Severity};

/// Check that no two automations share an `id`
///
/// All repeated IDs are reported together as a single failure.
pub fn check_unique_ids(automations: &[Automation<'_>], report: &mut Report) {
    let mut seen: IndexMap<String, usize> = IndexMap::new();
    for automation in automations {
        if let Some(id) = automation.id() {
            *seen.entry(id.into_owned()).or_default() += 1;
        }
    }

    let duplicated: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| format!("{id} ({count}x)"))
        .collect();

    if duplicated.is_empty() {
        report.pass("all automation ids are unique");
    } else {
        report.record(Severity::Fail, "duplicate automation ids", duplicated);
    }
}

fn find_by_alias<'a, 'b>(
    automations: &'b [Automation<'a>],
    needle: &str,
) -> Option<&'b Automation<'a>> {
    automations.iter().find(|a| a.alias_contains(needle))
}

/// Check the hourly automation, its trigger, and that it runs a script
pub fn check_hourly(
    automations: &[Automation<'_>],
    expectations: &BehaviorExpectations,
    report: &mut Report,
) {
    let alias = expectations.hourly_alias.as_str();
    let Some(hourly) = find_by_alias(automations, alias) else {
        report.warn(format!("no automation with alias containing '{alias}'"));
        return;
    };
    report.pass(format!("hourly automation exists ({alias})"));

    let triggers = hourly.triggers();
    if triggers.iter().any(|t| t.is_hourly()) {
        report.pass("hourly automation fires every hour");
    } else {
        let minutes = triggers
            .iter()
            .find(|t| t.is_time_pattern())
            .and_then(|t| t.minutes())
            .map(|m| m.into_owned())
            .unwrap_or_else(|| "none".to_string());
        report.warn(format!(
            "hourly automation has no hourly time_pattern trigger (minutes={minutes})"
        ));
    }

    let script = hourly
        .actions()
        .into_iter()
        .filter_map(service_name)
        .find(|service| {
            expectations
                .script_services
                .iter()
                .any(|fragment| service.contains(fragment.as_str()))
        });
    match script {
        Some(service) => report.pass(format!("hourly automation runs a script ({service})")),
        None => report.warn("hourly automation does not run a script"),
    }
}

/// Check the daily automation and its fixed-time trigger
pub fn check_daily(
    automations: &[Automation<'_>],
    expectations: &BehaviorExpectations,
    report: &mut Report,
) {
    let alias = expectations.daily_alias.as_str();
    let Some(daily) = find_by_alias(automations, alias) else {
        report.warn(format!("no automation with alias containing '{alias}'"));
        return;
    };
    report.pass(format!("daily automation exists ({alias})"));

    let Some(time) = parse_time_of_day(&expectations.daily_time) else {
        report.warn(format!(
            "daily_time '{}' is not a time of day",
            expectations.daily_time
        ));
        return;
    };

    if fires_at(daily, time) {
        report.pass(format!("daily automation fires at {}", expectations.daily_time));
    } else {
        report.warn(format!(
            "daily automation has no trigger at {}",
            expectations.daily_time
        ));
    }
}

fn fires_at(automation: &Automation<'_>, time: NaiveTime) -> bool {
    automation.triggers().iter().any(|t| t.fires_at(time))
}

/// Check that an automation exists for every keyword (alias, any case)
pub fn check_keywords(
    automations: &[Automation<'_>],
    keywords: &[String],
    report: &mut Report,
) {
    for keyword in keywords {
        if automations
            .iter()
            .any(|a| a.alias_contains_ignore_case(keyword))
        {
            report.pass(format!("'{keyword}' automation exists"));
        } else {
            report.warn(format!("no '{keyword}' automation"));
        }
    }
}

/// Report how many automations declare an execution mode
///
/// A declared mode Home Assistant does not know is a warning.
pub fn check_modes(automations: &[Automation<'_>], report: &mut Report) {
    let with_mode = automations.iter().filter(|a| a.declares_mode()).count();
    for automation in automations {
        if automation.declares_mode() && automation.mode().is_none() {
            report.warn(format!(
                "\"{}\" has an unknown mode",
                automation.display_name()
            ));
        }
    }
    report.info(format!(
        "{with_mode}/{} automations declare a mode",
        automations.len()
    ));
}

/// Check that every `repeat` in the actions has an exit condition
pub fn check_repeats(automations: &[Automation<'_>], report: &mut Report) {
    for automation in automations {
        let actions = automation.actions();
        for repeat in find_repeats(&actions) {
            let name = automation.display_name();
            match repeat_exit(repeat) {
                Some(exit) => report.pass(format!("\"{name}\" repeat has an exit condition ({exit})")),
                None => report.warn(format!("\"{name}\" repeat has no exit condition")),
            }
        }
    }
}

/// Checks on the primary automation file
pub fn check_primary(
    document: &Node,
    expectations: &BehaviorExpectations,
    report: &mut Report,
) -> AutomationResult<()> {
    let automations = automations(document)?;

    check_unique_ids(&automations, report);
    check_hourly(&automations, expectations, report);
    check_daily(&automations, expectations, report);
    check_keywords(&automations, &expectations.safety_keywords, report);
    check_modes(&automations, report);
    check_repeats(&automations, report);

    report.info(format!("{} automations in total", automations.len()));
    Ok(())
}

/// Checks on the notification automation file
pub fn check_notifications(
    document: &Node,
    expectations: &BehaviorExpectations,
    report: &mut Report,
) -> AutomationResult<()> {
    let automations = automations(document)?;

    check_keywords(&automations, &expectations.notification_keywords, report);

    let with_conditions = automations.iter().filter(|a| a.has_conditions()).count();
    report.info(format!(
        "{with_conditions}/{} automations have conditions",
        automations.len()
    ));
    Ok(())
}

/// Checks that legacy automations are gone or all disabled
pub fn check_legacy(
    document: &Node,
    expectations: &BehaviorExpectations,
    report: &mut Report,
) -> AutomationResult<()> {
    let automations = automations(document)?;
    let marker = expectations.legacy_marker.as_str();

    let legacy: Vec<&Automation<'_>> = automations
        .iter()
        .filter(|a| a.alias_contains(marker))
        .collect();
    let enabled = legacy.iter().filter(|a| a.enabled()).count();

    report.info(format!("{} legacy ({marker}) automations", legacy.len()));
    if legacy.is_empty() {
        report.pass(format!("no legacy ({marker}) automations"));
    } else if enabled == 0 {
        report.pass(format!("all legacy ({marker}) automations are disabled"));
    } else {
        report.warn(format!(
            "{enabled} legacy ({marker}) automations are still enabled"
        ));
    }

    report.info(format!("{} automations in total", automations.len()));
    Ok(())
}
