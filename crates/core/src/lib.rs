//! Core types and shared functionality for docmirror.
//!
//! This crate provides:
//! - The document store interface with SQLite and in-memory backends
//! - The registry API over the store
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod store;

pub use cache::CacheDb;
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use store::{DocId, DocumentEntry, DocumentStore, MemoryStore, RecordOutcome};
