#![deny(missing_docs)]

//! Core library for the CV MCP server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and adapters.
pub mod embedding;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Query metrics helpers.
pub mod metrics;
/// Résumé extraction, indexing, and answering.
pub mod resume;
