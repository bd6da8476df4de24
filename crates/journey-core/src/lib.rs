//! # journey-core
//!
//! Insight model types, validation rules, and error types for Insight Journey.
//!
//! This crate is the contract between the analytics that produce insights and
//! the API that serves them:
//! - Entity structs for every insight variant and the `Insight` tagged union
//! - Kind, lifecycle status, and visualization enums
//! - Violations and the `Validate` trait
//! - Clock abstraction for default timestamps
//! - ID prefix constants and generation
//! - Cross-cutting error types and their HTTP mapping
//! - API response envelopes
//! - Name and description formatting helpers
//!
//! Everything here is pure and synchronous. I/O lives in `journey-store`.

pub mod clock;
pub mod describe;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod insight;
pub mod responses;
pub mod validation;
