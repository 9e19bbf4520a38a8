//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model, streak and persistence calls into use-case APIs.
//! - Keep hosts (CLI, UI bindings) decoupled from storage details.

pub mod habit_store;
