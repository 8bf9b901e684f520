//! Markdown theme
//!
//! `MarkdownTheme` is the entry point used by the documentation pipeline:
//! it resolves the project root, builds the per-run `ThemeContext` and
//! runs the [`UrlPlanner`] over the reflection tree.

use crate::diagnostics::{Diagnostic, MarkError, MarkResult};
use crate::mapping::MappingTable;
use crate::options::{ThemeContext, ThemeOptions, DOCUMENT_EXTENSION, INDEX_FILE};
use crate::planner::{UrlPlan, UrlPlanner};
use crate::reflection::{ReflectionId, ReflectionKind, ReflectionTree};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Diagnostic code for an entry point that could not be used
pub const ENTRY_POINT_FALLBACK: &str = "entry-point";

/// Markdown output theme
#[derive(Debug, Clone)]
pub struct MarkdownTheme {
    options: ThemeOptions,
    mappings: MappingTable,
}

impl MarkdownTheme {
    /// Create a theme; single file mode starts from an empty mapping table
    pub fn new(options: ThemeOptions) -> Self {
        let mappings = if options.single_file {
            MappingTable::empty()
        } else {
            MappingTable::markdown()
        };
        Self { options, mappings }
    }

    /// Replace the grouping rules
    pub fn with_mappings(mut self, mappings: MappingTable) -> Self {
        self.mappings = mappings;
        self
    }

    /// Options of this theme
    pub fn options(&self) -> &ThemeOptions {
        &self.options
    }

    /// Grouping rules of this theme
    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    /// Map the reflections of `tree` to output documents.
    ///
    /// Returns the planned documents, the project index first. URLs and
    /// anchors are written into the tree.
    pub fn get_urls(&self, tree: &mut ReflectionTree) -> MarkResult<UrlPlan> {
        let (entry, fallback) = self.entry_point(tree);
        let project_name = tree.try_get(entry)?.name.clone();
        debug!(project = %project_name, flavor = %self.options.md_flavour, "planning urls");

        let context = ThemeContext::new(self.options.clone(), project_name);
        let roots = tree.children(entry).to_vec();
        let mut plan = UrlPlanner::new(&context, &self.mappings, entry).plan(tree, &roots)?;

        if let Some(diagnostic) = fallback {
            plan.diagnostics.insert(0, diagnostic);
        }
        Ok(plan)
    }

    /// Reflection documented as the project root.
    ///
    /// Falls back to the tree root when the configured entry point is
    /// missing or is not a module.
    fn entry_point(&self, tree: &ReflectionTree) -> (ReflectionId, Option<Diagnostic>) {
        let Some(name) = self.options.entry_point.as_deref() else {
            return (tree.root(), None);
        };

        let message = match tree.find_by_qualified_name(name) {
            Some(id)
                if matches!(
                    tree[id].kind,
                    ReflectionKind::Module | ReflectionKind::ExternalModule
                ) =>
            {
                return (id, None);
            }
            Some(id) => format!(
                "entry point `{}` is a {}, not a module",
                name,
                tree[id].kind.display_name().to_lowercase()
            ),
            None => format!("entry point `{}` not found", name),
        };

        warn!(entry_point = %name, "{}, documenting the whole project", message);
        let diagnostic = Diagnostic::warning(message)
            .on(name)
            .with_code(ENTRY_POINT_FALLBACK);
        (tree.root(), Some(diagnostic))
    }

    /// Test whether `path` holds documentation generated by this theme.
    ///
    /// True when the directory contains a file named `README.md`, or
    /// exactly one file and that file has the markdown extension. A
    /// heuristic used before cleaning an output directory, not a guarantee.
    pub fn is_output_directory(&self, path: &Path) -> MarkResult<bool> {
        if !path.is_dir() {
            return Err(MarkError::InvalidPath(path.to_path_buf()));
        }
        if path.join(INDEX_FILE).is_file() {
            return Ok(true);
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() {
                entries.push(entry.into_path());
            }
        }

        Ok(entries.len() == 1
            && entries[0]
                .extension()
                .is_some_and(|ext| ext == DOCUMENT_EXTENSION))
    }
}

impl Default for MarkdownTheme {
    fn default() -> Self {
        Self::new(ThemeOptions::default())
    }
}
