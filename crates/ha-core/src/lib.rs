//! Core types for configuration validation
//!
//! This crate provides the entity identifier rules and the built-in domain
//! allowlists shared by the loader, the automation views and the checks.

pub mod domains;
mod entity_id;

pub use entity_id::{
    domain_of, is_entity_id, is_templated, is_valid_entity_reference, EntityId, EntityIdError,
};
