//! Model Context Protocol (MCP) integration for CV MCP.
//!
//! This module wires the résumé service into an MCP server so editors and agent hosts can ask
//! about the résumé over stdio. The surface area consists of:
//!
//! - Tools: `search_resume`, `latest_role`, and `metrics`.
//! - Resources: `resume://me` (markdown), `resume://sections`, and `mcp://health`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::CvMcpServer;
