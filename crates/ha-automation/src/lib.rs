//! Automation documents
//!
//! This crate reads automation definitions out of loaded configuration
//! documents. Automations are event-driven rules:
//!
//! ```text
//! AUTOMATION = TRIGGER → CONDITIONS → ACTIONS
//! ```
//!
//! - **Triggers**: Event detectors that initiate the automation
//! - **Conditions**: State-based tests evaluated at trigger time
//! - **Actions**: Sequence of tasks to execute
//!
//! Each of the three may be written as a single mapping or as a list, under a
//! singular or plural key; the views here normalise all of those forms.
//!
//! # Key Types
//!
//! - [`Automation`] - One automation of a document
//! - [`TriggerView`] - One trigger of an automation
//! - [`RepeatExit`] - How a `repeat` block terminates

pub mod action;
pub mod automation;
pub mod trigger;

pub use action::{find_repeats, repeat_exit, service_name, RepeatExit};
pub use automation::{
    automations, node_kind, Automation, AutomationError, AutomationResult, ExecutionMode,
};
pub use trigger::{parse_time_of_day, TriggerView};
