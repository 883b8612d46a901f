//! Client code for docmirror.
//!
//! This crate provides the fetch pipeline, HTML sanitization, the refresh
//! orchestrator and scheduler, and rendering of cached documents.

pub mod fetch;
pub mod refresh;
pub mod render;
pub mod sanitize;

pub use fetch::{FetchClient, FetchConfig, FetchFailure, FetchedDocument, Fetcher};
pub use refresh::{EntryFailure, RefreshReport, RefreshSummary, Refresher, Scheduler};
pub use render::render_document;
pub use sanitize::sanitize;
