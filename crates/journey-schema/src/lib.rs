//! # journey-schema
//!
//! JSON Schema generation, validation, and the insight codec for Insight Journey.
//!
//! This crate provides:
//! - `SchemaRegistry`: central store of every JSON Schema in the model
//! - `InsightCodec`: construct, serialize, and deserialize insights with
//!   schema checks, default timestamps, and the configured strictness
//! - Field helpers that name offending fields the way `Validate` does
//!
//! ## Architecture
//!
//! Model types are defined in `journey-core` with `#[derive(JsonSchema)]`.
//! This crate imports those types and provides the registry, validation, and
//! codec layer. `journey-store` and `journey-cli` depend on it.

pub mod codec;
pub mod error;
pub mod fields;
pub mod registry;

pub use codec::InsightCodec;
pub use error::SchemaError;
pub use registry::SchemaRegistry;
