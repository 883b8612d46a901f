//! MCP tool implementations.
//!
//! Each submodule holds the params, output and `*_impl` function for one
//! group of tools. The handler only routes to these.

pub mod fetch_now;
pub mod registry;
pub mod show;

pub use registry::{DocDeleteParams, DocSaveParams};
pub use show::DocShowParams;
