//! Core module - Data structures and building blocks for the scanner
//!
//! This module provides:
//! - Row model and error type
//! - Token counting and the pricing table
//! - File classification and ignore rules
//! - Rendering for the supported output formats

pub mod file_reader;
pub mod ignore_rules;
pub mod metrics;
pub mod model;
pub mod paths;
pub mod pricing;
pub mod render;
pub mod tokenizer;
