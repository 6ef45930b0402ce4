//! # pms-core
//!
//! Core records, store contracts, and error types for the panel grading engine.
//!
//! This crate provides the foundational types shared across all pms crates:
//! - Entity records flowing between stages (questions, students, panels, metrics)
//! - Artifact shapes persisted between stages (cluster ranking, tag distribution, shortlist)
//! - Collaborator traits for the question/student/panel/metric stores
//! - Cross-cutting error types

pub mod artifacts;
pub mod entities;
pub mod errors;
pub mod snapshot;
pub mod store;
