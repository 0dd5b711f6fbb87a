//! Directory traversal backend
//!
//! Walks the scan root once and produces ordered rows in one of three modes.
//! Each directory is handled by its own frame that returns `(rows,
//! aggregate)` to its parent; nothing is accumulated globally, so any subtree
//! can be computed on its own.
//!
//! Ignored directories are never entered and never contribute to an
//! aggregate. Per-entry failures degrade the affected fields to `None`; only
//! a failure to list the scan root itself is fatal.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::file_reader::read_file;
use crate::core::ignore_rules::IgnoreMatcher;
use crate::core::metrics::MetricsResolver;
use crate::core::model::{Aggregate, Entry, RowType, TacosError, TraversalMode};
use crate::core::paths::{file_name, join_relative};
use crate::core::pricing::{resolve_model, ModelRole};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::tokenizer::TokenEncoding;

/// Rows and totals produced by one directory frame
#[derive(Debug, Default)]
struct Frame {
    rows: Vec<Entry>,
    aggregate: Aggregate,
}

impl Frame {
    fn row(entry: Entry) -> Self {
        Self {
            rows: vec![entry],
            aggregate: Aggregate::default(),
        }
    }

    fn absorb(&mut self, other: Frame) {
        self.rows.extend(other.rows);
        self.aggregate.merge(&other.aggregate);
    }
}

/// An immediate child of the directory being listed
#[derive(Debug)]
struct Child {
    name: String,
    path: PathBuf,
    relative: String,
    is_dir: bool,
}

struct Walker<'a> {
    ignore: IgnoreMatcher,
    resolver: &'a MetricsResolver<'a>,
    mode: TraversalMode,
}

/// Walk `root` and return its rows in pre-order.
///
/// Fails only when `root` is missing, not a directory, or cannot be listed.
pub fn traverse(
    root: &Path,
    resolver: &MetricsResolver<'_>,
    mode: TraversalMode,
) -> Result<Vec<Entry>, TacosError> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TacosError::RootNotFound(root.to_path_buf()),
        _ => TacosError::ReadDir {
            path: root.to_path_buf(),
            source: e,
        },
    })?;
    if !metadata.is_dir() {
        return Err(TacosError::NotADirectory(root.to_path_buf()));
    }

    let walker = Walker {
        ignore: IgnoreMatcher::load(root),
        resolver,
        mode,
    };

    tracing::debug!(root = %root.display(), ?mode, "starting traversal");
    let frame = walker.walk_dir(root, "", 0, true)?;
    tracing::debug!(
        rows = frame.rows.len(),
        files = frame.aggregate.files,
        tokens = frame.aggregate.tokens,
        "traversal finished"
    );
    Ok(frame.rows)
}

/// List the immediate children of `dir`, sorted by file name
fn list_children(dir: &Path, relative: &str) -> Result<Vec<Child>, TacosError> {
    let mut children = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(TacosError::ReadDir {
                    path: dir.to_path_buf(),
                    source: io::Error::from(e),
                });
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let name = file_name(entry.path());
        children.push(Child {
            relative: join_relative(relative, &name),
            name,
            path: entry.path().to_path_buf(),
            is_dir: entry.file_type().is_dir(),
        });
    }

    Ok(children)
}

/// The directory's own stat size; it is shown but never aggregated
fn dir_size(child: &Child) -> Option<u64> {
    match fs::metadata(&child.path) {
        Ok(m) => Some(m.len()),
        Err(e) => {
            tracing::warn!(path = %child.path.display(), error = %e, "cannot stat directory");
            None
        }
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}

impl Walker<'_> {
    /// One directory frame. With `emit` false only the aggregate is built.
    fn walk_dir(
        &self,
        dir: &Path,
        relative: &str,
        indent: usize,
        emit: bool,
    ) -> Result<Frame, TacosError> {
        let children = list_children(dir, relative)?;

        let mut frame = Frame::default();
        for child_frame in self.visit_all(&children, indent, emit) {
            frame.absorb(child_frame);
        }
        Ok(frame)
    }

    #[cfg(not(feature = "parallel"))]
    fn visit_all(&self, children: &[Child], indent: usize, emit: bool) -> Vec<Frame> {
        children
            .iter()
            .map(|child| self.visit(child, indent, emit))
            .collect()
    }

    // Order-preserving collect keeps rows in pre-order.
    #[cfg(feature = "parallel")]
    fn visit_all(&self, children: &[Child], indent: usize, emit: bool) -> Vec<Frame> {
        use rayon::prelude::*;
        children
            .par_iter()
            .map(|child| self.visit(child, indent, emit))
            .collect()
    }

    fn visit(&self, child: &Child, indent: usize, emit: bool) -> Frame {
        let is_ignored = self.ignore.is_ignored(&child.relative, child.is_dir);
        if child.is_dir {
            self.visit_dir(child, is_ignored, indent, emit)
        } else {
            self.visit_file(child, is_ignored, indent, emit)
        }
    }

    fn visit_file(&self, child: &Child, is_ignored: bool, indent: usize, emit: bool) -> Frame {
        if is_ignored && !emit {
            return Frame::default();
        }

        let metadata = match fs::metadata(&child.path) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(path = %child.path.display(), error = %e, "cannot stat file");
                None
            }
        };
        let size = metadata.as_ref().map(|m| m.len());

        let metrics = if is_ignored {
            None
        } else {
            read_file(&child.path)
                .text()
                .map(|text| self.resolver.resolve(text))
        };

        let mut frame = Frame::default();
        if let Some(m) = &metrics {
            frame.aggregate.add_file(size.unwrap_or(0), m);
        }
        if emit {
            let mut entry = Entry::file(&child.name, &child.relative, is_ignored, size, indent)
                .with_executable(metadata.as_ref().is_some_and(is_executable));
            if let Some(m) = metrics {
                entry = entry.with_metrics(m);
            }
            frame.rows.push(entry);
        }
        frame
    }

    fn visit_dir(&self, child: &Child, is_ignored: bool, indent: usize, emit: bool) -> Frame {
        if !emit {
            if is_ignored {
                return Frame::default();
            }
            return Frame {
                rows: Vec::new(),
                aggregate: self.subtree_aggregate(child, indent).unwrap_or_default(),
            };
        }

        match self.mode {
            TraversalMode::Flat => Frame::row(Entry::directory(
                &child.name,
                &child.relative,
                is_ignored,
                dir_size(child),
                indent,
            )),
            TraversalMode::RecursiveExpand => self.expand_dir(child, is_ignored, indent),
            TraversalMode::RecursiveCollapse => {
                let row = Entry::summary(
                    &child.name,
                    &child.relative,
                    RowType::Collapsed,
                    is_ignored,
                    indent,
                );
                if is_ignored {
                    return Frame::row(row.with_size(dir_size(child)));
                }
                match self.subtree_aggregate(child, indent) {
                    Some(aggregate) => Frame {
                        rows: vec![row.with_aggregate(&aggregate, self.resolver.has_output_rate())],
                        aggregate,
                    },
                    None => Frame::row(row.with_size(dir_size(child))),
                }
            }
        }
    }

    fn expand_dir(&self, child: &Child, is_ignored: bool, indent: usize) -> Frame {
        let mut frame = Frame::row(Entry::directory(
            &child.name,
            &child.relative,
            is_ignored,
            dir_size(child),
            indent,
        ));
        if is_ignored {
            return frame;
        }

        match self.walk_dir(&child.path, &child.relative, indent + 1, true) {
            Ok(sub) => {
                let cumulative = Entry::summary(
                    &child.name,
                    &child.relative,
                    RowType::Cumulative,
                    false,
                    indent + 1,
                )
                .with_aggregate(&sub.aggregate, self.resolver.has_output_rate());
                frame.absorb(sub);
                frame.rows.push(cumulative);
            }
            Err(e) => {
                tracing::warn!(error = %e, "treating unreadable directory as a leaf");
            }
        }
        frame
    }

    /// Silent descent; `None` when the directory cannot be listed
    fn subtree_aggregate(&self, child: &Child, indent: usize) -> Option<Aggregate> {
        match self.walk_dir(&child.path, &child.relative, indent + 1, false) {
            Ok(sub) => Some(sub.aggregate),
            Err(e) => {
                tracing::warn!(error = %e, "treating unreadable directory as a leaf");
                None
            }
        }
    }
}

/// Run the scan command
pub fn run_scan(
    root: &Path,
    input_model: &str,
    output_model: &str,
    encoding: TokenEncoding,
    mode: TraversalMode,
    config: RenderConfig,
) -> Result<()> {
    let input = resolve_model(input_model, ModelRole::Input)?;
    let output = resolve_model(output_model, ModelRole::Output)?;
    tracing::debug!(input = input.key, output = output.key, %encoding, "resolved models");

    let resolver = MetricsResolver::new(&encoding, input, output);
    let entries = traverse(root, &resolver, mode)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let renderer = Renderer::with_config(config);
    renderer.render_to(&entries, io::stdout().lock())?;

    Ok(())
}
