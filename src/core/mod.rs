//! Core types & traits: tool contract, result envelope, error taxonomy, RPC frames.

pub mod content;
pub mod error;
pub mod mcp;
pub mod tool;
