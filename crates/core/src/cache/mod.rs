//! SQLite-backed document cache.
//!
//! This module provides the persistent [`DocumentStore`](crate::store::DocumentStore)
//! implementation using SQLite with async access via tokio-rusqlite. It supports:
//!
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - SHA-256 digests of cached content for change detection

pub mod connection;
pub mod documents;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
