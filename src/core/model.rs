//! Row model
//!
//! Every traversal mode produces a flat, ordered list of `Entry` rows. The
//! presentation layer consumes these rows without any further access to the
//! filesystem or to traversal state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of row emitted by the traversal engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    /// A real filesystem node
    Normal,
    /// Subtotal appended after an expanded subdirectory's contents
    Cumulative,
    /// Single aggregate replacing a subdirectory's contents
    Collapsed,
}

/// How directories are handled during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// List the root's immediate children only
    #[default]
    Flat,
    /// Descend into every non-ignored directory, inserting subtotal rows
    RecursiveExpand,
    /// One aggregated row per top-level directory
    RecursiveCollapse,
}

/// Token count and the two cost estimates derived from it.
///
/// `output_cost` is `None` when the output pricing model has no output rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub tokens: usize,
    pub input_cost: f64,
    pub output_cost: Option<f64>,
}

/// One output row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Base name of the node (no path)
    pub name: String,

    /// Path relative to the scan root, using '/' as separator
    pub path: String,

    pub is_directory: bool,

    pub is_ignored: bool,

    /// Any execute bit set (files only, unix)
    #[serde(default)]
    pub executable: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_cost: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_cost: Option<f64>,

    /// Nesting depth relative to the scan root (display only)
    pub indent: usize,

    pub row_type: RowType,
}

impl Entry {
    /// A directory row with no metrics. `size` is the directory's own stat
    /// size and never feeds an aggregate.
    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        is_ignored: bool,
        size: Option<u64>,
        indent: usize,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: true,
            is_ignored,
            executable: false,
            size,
            tokens: None,
            input_cost: None,
            output_cost: None,
            indent,
            row_type: RowType::Normal,
        }
    }

    /// A file row; metrics are attached separately with `with_metrics`
    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        is_ignored: bool,
        size: Option<u64>,
        indent: usize,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: false,
            is_ignored,
            executable: false,
            size,
            tokens: None,
            input_cost: None,
            output_cost: None,
            indent,
            row_type: RowType::Normal,
        }
    }

    /// A synthetic aggregate row for a directory
    pub fn summary(
        name: impl Into<String>,
        path: impl Into<String>,
        row_type: RowType,
        is_ignored: bool,
        indent: usize,
    ) -> Self {
        Self {
            row_type,
            ..Self::directory(name, path, is_ignored, None, indent)
        }
    }

    /// Populate tokens and costs together
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.tokens = Some(metrics.tokens);
        self.input_cost = Some(metrics.input_cost);
        self.output_cost = metrics.output_cost;
        self
    }

    /// Populate size and metrics from a subtree aggregate
    pub fn with_aggregate(mut self, aggregate: &Aggregate, has_output_rate: bool) -> Self {
        self.size = Some(aggregate.size);
        self.tokens = Some(aggregate.tokens);
        self.input_cost = Some(aggregate.input_cost);
        self.output_cost = has_output_rate.then_some(aggregate.output_cost);
        self
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    pub fn with_executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    pub fn has_metrics(&self) -> bool {
        self.tokens.is_some()
    }
}

/// Running totals for one subtree.
///
/// Only non-ignored files that produced metrics are folded in; directories
/// contribute nothing of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    pub size: u64,
    pub tokens: usize,
    pub input_cost: f64,
    pub output_cost: f64,
    pub files: usize,
}

impl Aggregate {
    pub fn add_file(&mut self, size: u64, metrics: &Metrics) {
        self.size += size;
        self.tokens += metrics.tokens;
        self.input_cost += metrics.input_cost;
        self.output_cost += metrics.output_cost.unwrap_or(0.0);
        self.files += 1;
    }

    pub fn merge(&mut self, other: &Aggregate) {
        self.size += other.size;
        self.tokens += other.tokens;
        self.input_cost += other.input_cost;
        self.output_cost += other.output_cost;
        self.files += other.files;
    }
}

/// Fatal errors; per-entry failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum TacosError {
    #[error("Directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown {role} model: {name}. Available: {available}")]
    UnknownModel {
        role: &'static str,
        name: String,
        available: String,
    },
}
