#![deny(missing_docs)]
//! # conduit-tool
//!
//! The tool registry plus built-in tools: `EchoTool` (test fixture) and
//! `WebSearchTool` (§4.11).

mod echo;
mod registry;
mod web_search;

pub use echo::EchoTool;
pub use registry::ToolRegistry;
pub use web_search::WebSearchTool;
