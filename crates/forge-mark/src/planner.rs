//! URL planning
//!
//! The planner walks the reflection tree top-down. Reflections whose kind
//! has a grouping rule become documents; everything else is handed to the
//! [`AnchorResolver`] and folded into the nearest documented ancestor.

use crate::anchor::AnchorResolver;
use crate::diagnostics::{Diagnostic, MarkError, MarkResult};
use crate::mapping::{IndexContext, MappingTable, UrlMapping};
use crate::options::{ThemeContext, DOCUMENT_EXTENSION, INDEX_FILE};
use crate::reflection::{ReflectionId, ReflectionTree};
use crate::slug::is_external_url;
use indexmap::IndexMap;
use tracing::debug;

/// Diagnostic code for a document reflection linked outside the plan
pub const EXTERNAL_LINK: &str = "external-link";

/// Outcome of one planning run
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPlan {
    /// Planned documents, index first, then in declaration order
    pub mappings: Vec<UrlMapping>,
    /// Recoverable problems found while planning
    pub diagnostics: Vec<Diagnostic>,
}

impl UrlPlan {
    /// The project index document
    pub fn index(&self) -> Option<&UrlMapping> {
        self.mappings.iter().find(|m| m.is_index())
    }

    /// Document planned at `url`
    pub fn document(&self, url: &str) -> Option<&UrlMapping> {
        self.mappings.iter().find(|m| m.url == url)
    }

    /// Output paths in emission order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(|m| m.url.as_str())
    }
}

/// Plans documents and anchors for one project
pub struct UrlPlanner<'a> {
    context: &'a ThemeContext,
    table: &'a MappingTable,
    /// Reflection rendered as the index document
    index_root: ReflectionId,
    resolver: AnchorResolver<'a>,
    urls: Vec<UrlMapping>,
    /// Output paths already handed out
    claimed: IndexMap<String, ReflectionId>,
}

impl<'a> UrlPlanner<'a> {
    /// Create a planner whose index document is rendered from `index_root`
    pub fn new(context: &'a ThemeContext, table: &'a MappingTable, index_root: ReflectionId) -> Self {
        Self {
            context,
            table,
            index_root,
            resolver: AnchorResolver::new(context),
            urls: Vec::new(),
            claimed: IndexMap::new(),
        }
    }

    /// Plan the index document followed by every reflection below `roots`.
    ///
    /// Fails before returning any mapping when two documents would share
    /// an output path.
    pub fn plan(mut self, tree: &mut ReflectionTree, roots: &[ReflectionId]) -> MarkResult<UrlPlan> {
        tree.try_get(self.index_root)?;
        self.push_index(tree)?;

        for &root in roots {
            tree.try_get(root)?;
            self.build_urls(tree, root)?;
        }

        debug!(documents = self.urls.len(), "url planning complete");
        Ok(UrlPlan {
            mappings: self.urls,
            diagnostics: self.resolver.into_diagnostics().into_vec(),
        })
    }

    fn push_index(&mut self, tree: &mut ReflectionTree) -> MarkResult<()> {
        let context = self.context;
        let options = &context.options;
        let index = IndexContext {
            project_name: context.project_name.clone(),
            display_readme: options.display_readme(),
            hide_breadcrumbs: true,
            is_index: true,
        };

        self.claim(tree, INDEX_FILE, self.index_root)?;
        let root = &mut tree[self.index_root];
        root.url = Some(INDEX_FILE.to_string());
        root.has_own_document = true;

        self.urls.push(
            UrlMapping::new(INDEX_FILE, self.index_root, options.index_template.clone())
                .with_index(index),
        );
        Ok(())
    }

    /// Plan `node` and, depending on its grouping rule, its descendants
    pub fn build_urls(&mut self, tree: &mut ReflectionTree, node: ReflectionId) -> MarkResult<()> {
        let table = self.table;
        let Some(mapping) = table.get(tree[node].kind) else {
            let container = self.container_of(tree, node);
            self.resolver.resolve(tree, node, container);
            return Ok(());
        };

        // Members of a reflection linked outside this plan fold into the
        // nearest planned document.
        let mut container = node;
        if tree[node].has_assigned_url() {
            if !tree[node].has_own_document {
                container = self.container_of(tree, node);
            }
            let url = tree[node].url.clone().unwrap_or_default();
            if is_external_url(&url) {
                debug!(reflection = %tree[node].name, url = %url, "linked externally");
                self.resolver.diagnostics_mut().add(
                    Diagnostic::info(format!(
                        "linked to `{}`, members documented in `{}`",
                        url,
                        tree[container].url.as_deref().unwrap_or_default()
                    ))
                    .on(tree.qualified_name(node))
                    .with_code(EXTERNAL_LINK),
                );
            }
        } else {
            let file = format!("{}.{}", tree.qualified_url(node, None, "."), DOCUMENT_EXTENSION);
            let url = if mapping.directory.is_empty() {
                file
            } else {
                format!("{}/{}", mapping.directory, file)
            };

            self.claim(tree, &url, node)?;
            debug!(reflection = %tree[node].name, url = %url, "document planned");

            let reflection = &mut tree[node];
            reflection.url = Some(url.clone());
            reflection.has_own_document = true;
            self.urls.push(UrlMapping::new(url, node, mapping.template.clone()));
        }

        let children = tree.children(node).to_vec();
        for child in children {
            if !tree[child].kind.is_declaration() {
                continue;
            }
            if mapping.is_leaf {
                self.resolver.resolve(tree, child, container);
            } else {
                self.build_urls(tree, child)?;
            }
        }

        Ok(())
    }

    /// Nearest ancestor owning a document, or the index root
    fn container_of(&self, tree: &ReflectionTree, node: ReflectionId) -> ReflectionId {
        tree.ancestors(node)
            .find(|&ancestor| tree[ancestor].has_own_document && tree[ancestor].has_assigned_url())
            .unwrap_or(self.index_root)
    }

    fn claim(&mut self, tree: &ReflectionTree, url: &str, node: ReflectionId) -> MarkResult<()> {
        if let Some(&first) = self.claimed.get(url) {
            return Err(MarkError::duplicate_path(
                url,
                tree.qualified_name(first),
                tree.qualified_name(node),
            ));
        }
        self.claimed.insert(url.to_string(), node);
        Ok(())
    }
}
