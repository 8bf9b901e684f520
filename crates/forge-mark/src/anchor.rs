//! Anchor resolution for folded reflections
//!
//! Reflections without a document of their own are linked through an
//! anchor inside the document of their nearest documented ancestor, the
//! *container*. The anchor reference depends on the reflection kind and
//! on the markdown flavor; the bare anchor is always the dotted alias
//! path relative to the container.

use crate::diagnostics::{Diagnostic, DiagnosticsCollector};
use crate::options::ThemeContext;
use crate::reflection::{ReflectionId, ReflectionKind, ReflectionTree};
use crate::slug::anchor_ref;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Diagnostic code for two reflections sharing an anchor in one document
pub const ANCHOR_COLLISION: &str = "anchor-collision";

/// Assigns `container#anchor` URLs to folded reflections
#[derive(Debug)]
pub struct AnchorResolver<'a> {
    context: &'a ThemeContext,
    /// Anchor references handed out per container document
    assigned: IndexMap<ReflectionId, IndexMap<String, ReflectionId>>,
    diagnostics: DiagnosticsCollector,
}

impl<'a> AnchorResolver<'a> {
    /// Create a resolver for one planning run
    pub fn new(context: &'a ThemeContext) -> Self {
        Self {
            context,
            assigned: IndexMap::new(),
            diagnostics: DiagnosticsCollector::new(),
        }
    }

    /// Anchor `node` and its declaration descendants inside `container`.
    ///
    /// Reflections that already carry a planned URL keep it, but their
    /// descendants are still visited.
    pub fn resolve(&mut self, tree: &mut ReflectionTree, node: ReflectionId, container: ReflectionId) {
        if !tree[node].has_assigned_url() {
            self.apply(tree, node, container);
        }

        let children = tree.children(node).to_vec();
        for child in children {
            if tree[child].kind.is_declaration() {
                self.resolve(tree, child, container);
            }
        }
    }

    /// Diagnostics raised so far
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut DiagnosticsCollector {
        &mut self.diagnostics
    }

    /// Consume the resolver, keeping its diagnostics
    pub fn into_diagnostics(self) -> DiagnosticsCollector {
        self.diagnostics
    }

    fn apply(&mut self, tree: &mut ReflectionTree, node: ReflectionId, container: ReflectionId) {
        let mut anchor = tree.qualified_url(node, Some(container), ".");
        if tree[node].is_static() {
            anchor = format!("static-{}", anchor);
        }

        let reference = self.anchor_reference(tree, node, &anchor);
        self.check_collision(tree, node, container, &reference);

        let base = tree[container].url.clone().unwrap_or_default();
        let url = format!("{}#{}", base, reference);
        debug!(reflection = %tree[node].name, url = %url, "anchor assigned");

        let reflection = &mut tree[node];
        reflection.url = Some(url);
        reflection.anchor = Some(anchor);
        reflection.has_own_document = false;
    }

    /// Anchor reference for `node`, given its bare anchor.
    ///
    /// Module and Enum are resolved independently: a module nested
    /// below a class or another module stays `module-<name>`.
    pub fn anchor_reference(&self, tree: &ReflectionTree, node: ReflectionId, anchor: &str) -> String {
        let flavor = self.context.flavor();
        let reflection = &tree[node];
        let name = anchor_ref(&reflection.name, flavor);

        match reflection.kind {
            ReflectionKind::ExternalModule => format!("external-module-{}-", name),
            ReflectionKind::Class => format!("class-{}", name),
            ReflectionKind::Interface => format!("interface-{}", name),
            ReflectionKind::Module => format!("module-{}", name),
            ReflectionKind::Enum => {
                let top_level = reflection.parent().map_or(true, |parent| {
                    matches!(
                        tree[parent].kind,
                        ReflectionKind::Global | ReflectionKind::ExternalModule
                    )
                });
                if top_level {
                    format!("module-{}", name)
                } else {
                    format!("enumeration-{}", name)
                }
            }
            _ if flavor.is_strict() => {
                let mut prefix = String::new();
                if reflection.kind == ReflectionKind::ObjectLiteral {
                    prefix.push_str("object-literal-");
                }
                for flag in &reflection.flags {
                    prefix.push_str(flag.as_str());
                    prefix.push('-');
                }
                format!("markdown-header-{}{}", anchor_ref(&prefix, flavor), name)
            }
            _ => anchor.to_string(),
        }
    }

    fn check_collision(
        &mut self,
        tree: &ReflectionTree,
        node: ReflectionId,
        container: ReflectionId,
        reference: &str,
    ) {
        let taken = self.assigned.entry(container).or_default();
        match taken.get(reference) {
            Some(&first) if first != node => {
                let message = format!(
                    "anchor `{}` in document `{}` is shared with `{}`",
                    reference,
                    tree[container].url.as_deref().unwrap_or_default(),
                    tree.qualified_name(first)
                );
                warn!(reflection = %tree.qualified_name(node), "{}", message);
                self.diagnostics.add(
                    Diagnostic::warning(message)
                        .on(tree.qualified_name(node))
                        .with_code(ANCHOR_COLLISION),
                );
            }
            Some(_) => {}
            None => {
                taken.insert(reference.to_string(), node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::MarkdownFlavor;
    use crate::options::ThemeOptions;
    use crate::reflection::ReflectionFlag;
    use pretty_assertions::assert_eq;

    fn context(flavor: MarkdownFlavor) -> ThemeContext {
        ThemeContext::new(ThemeOptions::new(flavor), "demo")
    }

    fn documented_class(tree: &mut ReflectionTree) -> ReflectionId {
        let class = tree.add_child(tree.root(), "Reader", ReflectionKind::Class);
        tree[class].url = Some("classes/reader.md".into());
        tree[class].has_own_document = true;
        class
    }

    #[test]
    fn test_member_generic() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let foo = tree.add_child(class, "foo", ReflectionKind::Property);

        AnchorResolver::new(&ctx).resolve(&mut tree, foo, class);
        assert_eq!(tree[foo].url.as_deref(), Some("classes/reader.md#foo"));
        assert_eq!(tree[foo].anchor.as_deref(), Some("foo"));
        assert!(!tree[foo].has_own_document);
    }

    #[test]
    fn test_member_strict() {
        let ctx = context(MarkdownFlavor::StrictHeaderSlug);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let foo = tree.add_child(class, "foo", ReflectionKind::Property);

        AnchorResolver::new(&ctx).resolve(&mut tree, foo, class);
        assert_eq!(
            tree[foo].url.as_deref(),
            Some("classes/reader.md#markdown-header-foo")
        );
    }

    #[test]
    fn test_static_member() {
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let bar = tree.add_child_with_flags(class, "bar", ReflectionKind::Method, [ReflectionFlag::Static]);

        let generic = context(MarkdownFlavor::Generic);
        AnchorResolver::new(&generic).resolve(&mut tree, bar, class);
        assert_eq!(tree[bar].anchor.as_deref(), Some("static-bar"));
        assert_eq!(tree[bar].url.as_deref(), Some("classes/reader.md#static-bar"));

        let strict = context(MarkdownFlavor::StrictHeaderSlug);
        let resolver = AnchorResolver::new(&strict);
        assert_eq!(
            resolver.anchor_reference(&tree, bar, "static-bar"),
            "markdown-header-static-bar"
        );
    }

    #[test]
    fn test_flag_prefix_order() {
        let ctx = context(MarkdownFlavor::StrictHeaderSlug);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let member = tree.add_child_with_flags(
            class,
            "secret",
            ReflectionKind::Property,
            [ReflectionFlag::Private, ReflectionFlag::Static],
        );
        let resolver = AnchorResolver::new(&ctx);
        assert_eq!(
            resolver.anchor_reference(&tree, member, "static-secret"),
            "markdown-header-private-static-secret"
        );
    }

    #[test]
    fn test_object_literal_strict() {
        let ctx = context(MarkdownFlavor::StrictHeaderSlug);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let literal = tree.add_child_with_flags(
            class,
            "defaults",
            ReflectionKind::ObjectLiteral,
            [ReflectionFlag::Const],
        );

        AnchorResolver::new(&ctx).resolve(&mut tree, literal, class);
        let url = tree[literal].url.clone().unwrap();
        assert!(url.starts_with("classes/reader.md#markdown-header-object-literal-"));
        assert!(url.ends_with("#markdown-header-object-literal-const-defaults"));
    }

    #[test]
    fn test_kind_dispatch() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let external = tree.add_child(tree.root(), "\"src/io\"", ReflectionKind::ExternalModule);
        let class = tree.add_child(external, "Stream", ReflectionKind::Class);
        let iface = tree.add_child(external, "Options", ReflectionKind::Interface);
        let enum_in_module = tree.add_child(external, "Mode", ReflectionKind::Enum);
        let enum_in_class = tree.add_child(class, "State", ReflectionKind::Enum);
        let resolver = AnchorResolver::new(&ctx);

        assert_eq!(resolver.anchor_reference(&tree, external, ""), "external-module-srcio-");
        assert_eq!(resolver.anchor_reference(&tree, class, ""), "class-stream");
        assert_eq!(resolver.anchor_reference(&tree, iface, ""), "interface-options");
        assert_eq!(resolver.anchor_reference(&tree, enum_in_module, ""), "module-mode");
        assert_eq!(resolver.anchor_reference(&tree, enum_in_class, ""), "enumeration-state");
    }

    #[test]
    fn test_top_level_enum_uses_module_prefix() {
        let ctx = context(MarkdownFlavor::StrictHeaderSlug);
        let mut tree = ReflectionTree::new("demo");
        let color = tree.add_child(tree.root(), "Color", ReflectionKind::Enum);
        let resolver = AnchorResolver::new(&ctx);
        assert_eq!(resolver.anchor_reference(&tree, color, ""), "module-color");
    }

    #[test]
    fn test_nested_module_does_not_fall_into_enum_rule() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let outer = tree.add_child(class, "Outer", ReflectionKind::Module);
        let inner = tree.add_child(outer, "Inner", ReflectionKind::Module);
        let resolver = AnchorResolver::new(&ctx);
        assert_eq!(resolver.anchor_reference(&tree, outer, ""), "module-outer");
        assert_eq!(resolver.anchor_reference(&tree, inner, ""), "module-inner");
    }

    #[test]
    fn test_descendants_share_container() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let literal = tree.add_child(class, "config", ReflectionKind::ObjectLiteral);
        let nested = tree.add_child(literal, "timeout", ReflectionKind::Variable);
        let signature = tree.add_child(literal, "__call", ReflectionKind::CallSignature);

        AnchorResolver::new(&ctx).resolve(&mut tree, literal, class);
        assert_eq!(tree[nested].url.as_deref(), Some("classes/reader.md#config.timeout"));
        assert_eq!(tree[nested].anchor.as_deref(), Some("config.timeout"));
        assert_eq!(tree[signature].url, None);
    }

    #[test]
    fn test_assigned_url_is_kept_but_children_visited() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let linked = tree.add_child(class, "linked", ReflectionKind::ObjectLiteral);
        tree[linked].url = Some("https://example.com/linked".into());
        let child = tree.add_child(linked, "value", ReflectionKind::Property);

        AnchorResolver::new(&ctx).resolve(&mut tree, linked, class);
        assert_eq!(tree[linked].url.as_deref(), Some("https://example.com/linked"));
        assert_eq!(tree[linked].anchor, None);
        assert_eq!(tree[child].url.as_deref(), Some("classes/reader.md#linked.value"));
    }

    #[test]
    fn test_bare_fragment_is_reassigned() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let foo = tree.add_child(class, "foo", ReflectionKind::Property);
        tree[foo].url = Some("#foo".into());

        AnchorResolver::new(&ctx).resolve(&mut tree, foo, class);
        assert_eq!(tree[foo].url.as_deref(), Some("classes/reader.md#foo"));
    }

    #[test]
    fn test_container_without_url() {
        let ctx = context(MarkdownFlavor::Generic);
        let mut tree = ReflectionTree::new("demo");
        let class = tree.add_child(tree.root(), "Loose", ReflectionKind::Class);
        let foo = tree.add_child(class, "foo", ReflectionKind::Property);

        AnchorResolver::new(&ctx).resolve(&mut tree, foo, class);
        assert_eq!(tree[foo].url.as_deref(), Some("#foo"));
    }

    #[test]
    fn test_collision_is_reported_not_fixed() {
        let ctx = context(MarkdownFlavor::StrictHeaderSlug);
        let mut tree = ReflectionTree::new("demo");
        let class = documented_class(&mut tree);
        let upper = tree.add_child(class, "Value", ReflectionKind::Property);
        let lower = tree.add_child(class, "value", ReflectionKind::Property);

        let mut resolver = AnchorResolver::new(&ctx);
        resolver.resolve(&mut tree, upper, class);
        resolver.resolve(&mut tree, lower, class);

        assert_eq!(tree[upper].url, tree[lower].url);
        let collisions: Vec<_> = resolver
            .diagnostics()
            .diagnostics()
            .iter()
            .filter(|d| d.code.as_deref() == Some(ANCHOR_COLLISION))
            .collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].reflection.as_deref(), Some("Reader.value"));
    }
}
