//! Backends module - Commands that produce output
//!
//! Provides:
//! - scan: Directory traversal with token and cost metrics
//! - cost_table: Pricing table listing

pub mod cost_table;
pub mod scan;
