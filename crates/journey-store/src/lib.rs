//! # journey-store
//!
//! Persistence seam for Insight Journey.
//!
//! - [`InsightStore`]: save / get / list-for-user / delete over validated
//!   insights
//! - [`MemoryStore`]: process-local map
//! - [`JsonlStore`]: append-only `insights.jsonl` log replayed on open
//!
//! Both stores keep raw field maps and decode them through an
//! [`InsightCodec`](journey_schema::InsightCodec) on every read.

mod error;
mod jsonl;
mod memory;
pub mod op;
mod store;

pub use error::StoreError;
pub use jsonl::{JsonlStore, LOG_FILE, ReplayStats};
pub use memory::MemoryStore;
pub use store::InsightStore;
