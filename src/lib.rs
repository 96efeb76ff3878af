//! Agent-memory API endpoints exposed as callable tools.
//!
//! Each tool validates its arguments, makes one call through a shared
//! [`crate::clients::memory_api::ServerContext`], and returns a
//! [`crate::core::content::ToolResult`] envelope. Failures never escape a tool.

pub mod api;
pub mod cli;
pub mod clients;
pub mod core;
pub mod infra;
pub mod tools;
