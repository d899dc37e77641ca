//! # moqi-core
//!
//! Core types, ID prefixes, and error types for MoQi.
//!
//! This crate provides the foundational types shared across all MoQi crates:
//! - Entity structs for startups, swipers, and interactions
//! - Enums for feedback preferences, swipe decisions, and the pipeline stage machine
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types
//! - The `MatchStore` data-access trait the pipeline consumes

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod store;
