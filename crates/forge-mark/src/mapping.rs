//! Grouping rules and document mappings
//!
//! A `MappingTable` decides which reflection kinds get a document of
//! their own, in which directory, and whether everything beneath them
//! is folded into that document. `UrlMapping` is one planned document
//! handed to the renderer.

use crate::options::DEFAULT_TEMPLATE;
use crate::reflection::{ReflectionId, ReflectionKind};
use serde::{Deserialize, Serialize};

/// Grouping rule for a set of reflection kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMapping {
    /// Kinds this rule applies to
    pub kinds: Vec<ReflectionKind>,
    /// Output directory, relative to the documentation root
    pub directory: String,
    /// When set, children fold into this document instead of being planned
    pub is_leaf: bool,
    /// Template name passed through to the renderer
    pub template: String,
}

impl TemplateMapping {
    /// Create a non-leaf rule using the default template
    pub fn new(kinds: impl IntoIterator<Item = ReflectionKind>, directory: impl Into<String>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            directory: directory.into(),
            is_leaf: false,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Mark this rule as a leaf group
    pub fn leaf(mut self) -> Self {
        self.is_leaf = true;
        self
    }

    /// Use a different template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Whether this rule covers `kind`
    pub fn matches(&self, kind: ReflectionKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Ordered list of grouping rules; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    mappings: Vec<TemplateMapping>,
}

impl MappingTable {
    /// Table without any rule; every reflection folds into the index
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from rules
    pub fn new(mappings: Vec<TemplateMapping>) -> Self {
        Self { mappings }
    }

    /// One document per class, interface, enum and module
    pub fn markdown() -> Self {
        Self::new(vec![
            TemplateMapping::new([ReflectionKind::Class], "classes"),
            TemplateMapping::new([ReflectionKind::Interface], "interfaces"),
            TemplateMapping::new([ReflectionKind::Enum], "enums"),
            TemplateMapping::new(
                [ReflectionKind::Module, ReflectionKind::ExternalModule],
                "modules",
            ),
        ])
    }

    /// Append a rule
    pub fn push(&mut self, mapping: TemplateMapping) {
        self.mappings.push(mapping);
    }

    /// Rule for `kind`, if any
    pub fn get(&self, kind: ReflectionKind) -> Option<&TemplateMapping> {
        self.mappings.iter().find(|m| m.matches(kind))
    }

    /// Rules in lookup order
    pub fn iter(&self) -> impl Iterator<Item = &TemplateMapping> {
        self.mappings.iter()
    }

    /// Whether the table holds no rule
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Project metadata attached to the index document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexContext {
    /// Display name of the project
    pub project_name: String,
    /// Whether the readme is rendered on the index
    pub display_readme: bool,
    /// Whether breadcrumb navigation is suppressed
    pub hide_breadcrumbs: bool,
    /// Always true; marks the entry as the index document
    pub is_index: bool,
}

/// One planned document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMapping {
    /// Output path, `/` separated
    pub url: String,
    /// Reflection rendered at the root of the document
    pub model: ReflectionId,
    /// Template name
    pub template: String,
    /// Present on the index document only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexContext>,
}

impl UrlMapping {
    /// Create a mapping for a reflection document
    pub fn new(url: impl Into<String>, model: ReflectionId, template: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model,
            template: template.into(),
            index: None,
        }
    }

    /// Attach the index context
    pub fn with_index(mut self, index: IndexContext) -> Self {
        self.index = Some(index);
        self
    }

    /// Whether this is the project index document
    pub fn is_index(&self) -> bool {
        self.index.as_ref().is_some_and(|i| i.is_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_table() {
        let table = MappingTable::markdown();
        assert_eq!(table.get(ReflectionKind::Class).unwrap().directory, "classes");
        assert_eq!(table.get(ReflectionKind::ExternalModule).unwrap().directory, "modules");
        assert_eq!(table.get(ReflectionKind::Module).unwrap().directory, "modules");
        assert!(table.get(ReflectionKind::Method).is_none());
        assert!(table.iter().all(|m| !m.is_leaf && m.template == "reflection.hbs"));
    }

    #[test]
    fn test_first_rule_wins() {
        let mut table = MappingTable::new(vec![
            TemplateMapping::new([ReflectionKind::Class], "types").leaf(),
        ]);
        table.push(TemplateMapping::new([ReflectionKind::Class], "classes"));
        let rule = table.get(ReflectionKind::Class).unwrap();
        assert_eq!(rule.directory, "types");
        assert!(rule.is_leaf);
    }

    #[test]
    fn test_empty_table() {
        assert!(MappingTable::empty().is_empty());
        assert!(MappingTable::empty().get(ReflectionKind::Class).is_none());
    }

    #[test]
    fn test_url_mapping_serialization() {
        let tree = crate::reflection::ReflectionTree::new("demo");
        let mapping = UrlMapping::new("README.md", tree.root(), "reflection.hbs").with_index(
            IndexContext {
                project_name: "demo".into(),
                display_readme: true,
                hide_breadcrumbs: true,
                is_index: true,
            },
        );
        assert!(mapping.is_index());
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["url"], "README.md");
        assert_eq!(json["model"], 0);
        assert_eq!(json["index"]["hideBreadcrumbs"], true);

        let plain = UrlMapping::new("classes/foo.md", tree.root(), "reflection.hbs");
        assert!(!plain.is_index());
        assert!(serde_json::to_value(&plain).unwrap().get("index").is_none());
    }
}
