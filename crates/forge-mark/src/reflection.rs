//! Reflection tree types
//!
//! This module provides `ReflectionTree`, the arena holding every
//! documented program element produced by the analyzer. Nodes own their
//! children through ordered id lists; the parent link is a plain id used
//! for upward lookups only.

use crate::diagnostics::{MarkError, MarkResult};
use crate::slug;
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Kind of documented program element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReflectionKind {
    /// Project root
    Global,
    /// File level module (`"src/fs"`)
    ExternalModule,
    /// Namespace
    Module,
    Enum,
    EnumMember,
    Variable,
    Function,
    Class,
    Interface,
    Constructor,
    Property,
    Method,
    CallSignature,
    IndexSignature,
    ConstructorSignature,
    Parameter,
    TypeLiteral,
    TypeParameter,
    Accessor,
    GetSignature,
    SetSignature,
    ObjectLiteral,
    TypeAlias,
    Event,
}

impl ReflectionKind {
    /// Every kind, in analyzer numbering order
    pub const ALL: [ReflectionKind; 24] = [
        ReflectionKind::Global,
        ReflectionKind::ExternalModule,
        ReflectionKind::Module,
        ReflectionKind::Enum,
        ReflectionKind::EnumMember,
        ReflectionKind::Variable,
        ReflectionKind::Function,
        ReflectionKind::Class,
        ReflectionKind::Interface,
        ReflectionKind::Constructor,
        ReflectionKind::Property,
        ReflectionKind::Method,
        ReflectionKind::CallSignature,
        ReflectionKind::IndexSignature,
        ReflectionKind::ConstructorSignature,
        ReflectionKind::Parameter,
        ReflectionKind::TypeLiteral,
        ReflectionKind::TypeParameter,
        ReflectionKind::Accessor,
        ReflectionKind::GetSignature,
        ReflectionKind::SetSignature,
        ReflectionKind::ObjectLiteral,
        ReflectionKind::TypeAlias,
        ReflectionKind::Event,
    ];

    /// Kind carrying the analyzer bit value `bits`
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.bits() == bits)
    }

    /// Analyzer bit value of this kind
    pub fn bits(&self) -> u32 {
        match self {
            ReflectionKind::Global => 0,
            ReflectionKind::ExternalModule => 1,
            ReflectionKind::Module => 1 << 1,
            ReflectionKind::Enum => 1 << 2,
            ReflectionKind::EnumMember => 1 << 4,
            ReflectionKind::Variable => 1 << 5,
            ReflectionKind::Function => 1 << 6,
            ReflectionKind::Class => 1 << 7,
            ReflectionKind::Interface => 1 << 8,
            ReflectionKind::Constructor => 1 << 9,
            ReflectionKind::Property => 1 << 10,
            ReflectionKind::Method => 1 << 11,
            ReflectionKind::CallSignature => 1 << 12,
            ReflectionKind::IndexSignature => 1 << 13,
            ReflectionKind::ConstructorSignature => 1 << 14,
            ReflectionKind::Parameter => 1 << 15,
            ReflectionKind::TypeLiteral => 1 << 16,
            ReflectionKind::TypeParameter => 1 << 17,
            ReflectionKind::Accessor => 1 << 18,
            ReflectionKind::GetSignature => 1 << 19,
            ReflectionKind::SetSignature => 1 << 20,
            ReflectionKind::ObjectLiteral => 1 << 21,
            ReflectionKind::TypeAlias => 1 << 22,
            ReflectionKind::Event => 1 << 23,
        }
    }

    /// Get display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ReflectionKind::Global => "Project",
            ReflectionKind::ExternalModule => "External module",
            ReflectionKind::Module => "Module",
            ReflectionKind::Enum => "Enumeration",
            ReflectionKind::EnumMember => "Enumeration member",
            ReflectionKind::Variable => "Variable",
            ReflectionKind::Function => "Function",
            ReflectionKind::Class => "Class",
            ReflectionKind::Interface => "Interface",
            ReflectionKind::Constructor => "Constructor",
            ReflectionKind::Property => "Property",
            ReflectionKind::Method => "Method",
            ReflectionKind::CallSignature => "Call signature",
            ReflectionKind::IndexSignature => "Index signature",
            ReflectionKind::ConstructorSignature => "Constructor signature",
            ReflectionKind::Parameter => "Parameter",
            ReflectionKind::TypeLiteral => "Type literal",
            ReflectionKind::TypeParameter => "Type parameter",
            ReflectionKind::Accessor => "Accessor",
            ReflectionKind::GetSignature => "Get signature",
            ReflectionKind::SetSignature => "Set signature",
            ReflectionKind::ObjectLiteral => "Object literal",
            ReflectionKind::TypeAlias => "Type alias",
            ReflectionKind::Event => "Event",
        }
    }

    /// Whether reflections of this kind are declarations.
    ///
    /// Signatures, parameters and type literals hang off declarations but
    /// never receive a URL of their own.
    pub fn is_declaration(&self) -> bool {
        !matches!(
            self,
            ReflectionKind::Global
                | ReflectionKind::CallSignature
                | ReflectionKind::IndexSignature
                | ReflectionKind::ConstructorSignature
                | ReflectionKind::GetSignature
                | ReflectionKind::SetSignature
                | ReflectionKind::Parameter
                | ReflectionKind::TypeParameter
                | ReflectionKind::TypeLiteral
        )
    }
}

/// Modifier attached to a reflection by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReflectionFlag {
    Private,
    Protected,
    Public,
    Static,
    Exported,
    ExportAssignment,
    External,
    Optional,
    DefaultValue,
    Rest,
    ConstructorProperty,
    Abstract,
    Const,
    Let,
}

impl ReflectionFlag {
    /// Tag name as the analyzer spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            ReflectionFlag::Private => "Private",
            ReflectionFlag::Protected => "Protected",
            ReflectionFlag::Public => "Public",
            ReflectionFlag::Static => "Static",
            ReflectionFlag::Exported => "Exported",
            ReflectionFlag::ExportAssignment => "ExportAssignment",
            ReflectionFlag::External => "External",
            ReflectionFlag::Optional => "Optional",
            ReflectionFlag::DefaultValue => "DefaultValue",
            ReflectionFlag::Rest => "Rest",
            ReflectionFlag::ConstructorProperty => "ConstructorProperty",
            ReflectionFlag::Abstract => "Abstract",
            ReflectionFlag::Const => "Const",
            ReflectionFlag::Let => "Let",
        }
    }
}

impl fmt::Display for ReflectionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier set in analyzer order
pub type ReflectionFlags = IndexSet<ReflectionFlag>;

/// Index of a reflection inside its `ReflectionTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionId(usize);

impl ReflectionId {
    /// Raw arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ReflectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A documented program element
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    /// Arena id
    pub id: ReflectionId,
    /// Declared name, unique among siblings
    pub name: String,
    /// Element kind
    pub kind: ReflectionKind,
    /// Modifiers in analyzer order
    pub flags: ReflectionFlags,
    /// Planned document path or `path#anchor`
    pub url: Option<String>,
    /// Bare anchor, set for folded reflections only
    pub anchor: Option<String>,
    /// Whether this reflection is the root of its own document
    pub has_own_document: bool,
    parent: Option<ReflectionId>,
    children: Vec<ReflectionId>,
}

impl Reflection {
    fn new(id: ReflectionId, name: String, kind: ReflectionKind, parent: Option<ReflectionId>) -> Self {
        Self {
            id,
            name,
            kind,
            flags: ReflectionFlags::new(),
            url: None,
            anchor: None,
            has_own_document: false,
            parent,
            children: Vec::new(),
        }
    }

    /// Containing reflection, `None` for the project root
    pub fn parent(&self) -> Option<ReflectionId> {
        self.parent
    }

    /// Children in declaration order
    pub fn children(&self) -> &[ReflectionId] {
        &self.children
    }

    /// Whether the analyzer marked this reflection static
    pub fn is_static(&self) -> bool {
        self.flags.contains(&ReflectionFlag::Static)
    }

    /// Whether a URL has already been planned for this reflection
    pub fn has_assigned_url(&self) -> bool {
        self.url.as_deref().is_some_and(slug::is_assigned_url)
    }
}

/// Serialized form of a reflection subtree, as emitted by the analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionNode {
    pub name: String,
    /// Kind name (`"class"`) or the analyzer's bit value (`128`)
    #[serde(deserialize_with = "deserialize_kind")]
    pub kind: ReflectionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ReflectionFlag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ReflectionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn deserialize_kind<'de, D>(deserializer: D) -> Result<ReflectionKind, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KindRepr {
        Bits(u32),
        Name(ReflectionKind),
    }

    match KindRepr::deserialize(deserializer)? {
        KindRepr::Bits(bits) => ReflectionKind::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown reflection kind {}", bits))
        }),
        KindRepr::Name(kind) => Ok(kind),
    }
}

/// Arena of reflections rooted at the project
#[derive(Debug, Clone)]
pub struct ReflectionTree {
    nodes: Vec<Reflection>,
}

impl ReflectionTree {
    /// Create a tree holding only the project root
    pub fn new(project_name: impl Into<String>) -> Self {
        let root = Reflection::new(ReflectionId(0), project_name.into(), ReflectionKind::Global, None);
        Self { nodes: vec![root] }
    }

    /// Build a tree from the analyzer's JSON output.
    ///
    /// The top-level object must describe the project (`"kind": "global"`).
    pub fn from_json(json: &str) -> MarkResult<Self> {
        let node: ReflectionNode = serde_json::from_str(json)?;
        Self::from_node(node)
    }

    /// Build a tree from an already deserialized project node
    pub fn from_node(node: ReflectionNode) -> MarkResult<Self> {
        if node.kind != ReflectionKind::Global {
            return Err(MarkError::config(format!(
                "tree root `{}` must be of kind global, found {:?}",
                node.name, node.kind
            )));
        }

        let mut tree = Self::new(node.name);
        let root = tree.root();
        tree[root].url = node.url;
        for child in node.children {
            tree.insert_node(root, child);
        }
        Ok(tree)
    }

    fn insert_node(&mut self, parent: ReflectionId, node: ReflectionNode) {
        let id = self.add_child_with_flags(parent, node.name, node.kind, node.flags);
        self[id].url = node.url;
        for child in node.children {
            self.insert_node(id, child);
        }
    }

    /// Project root id
    pub fn root(&self) -> ReflectionId {
        ReflectionId(0)
    }

    /// Append a child under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(
        &mut self,
        parent: ReflectionId,
        name: impl Into<String>,
        kind: ReflectionKind,
    ) -> ReflectionId {
        let id = ReflectionId(self.nodes.len());
        self.nodes.push(Reflection::new(id, name.into(), kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a child carrying modifier flags
    pub fn add_child_with_flags(
        &mut self,
        parent: ReflectionId,
        name: impl Into<String>,
        kind: ReflectionKind,
        flags: impl IntoIterator<Item = ReflectionFlag>,
    ) -> ReflectionId {
        let id = self.add_child(parent, name, kind);
        self.nodes[id.0].flags.extend(flags);
        id
    }

    /// Look up a reflection
    pub fn get(&self, id: ReflectionId) -> Option<&Reflection> {
        self.nodes.get(id.0)
    }

    /// Look up a reflection mutably
    pub fn get_mut(&mut self, id: ReflectionId) -> Option<&mut Reflection> {
        self.nodes.get_mut(id.0)
    }

    /// Look up a reflection, failing with `UnknownReflection`
    pub fn try_get(&self, id: ReflectionId) -> MarkResult<&Reflection> {
        self.get(id).ok_or(MarkError::UnknownReflection(id.0))
    }

    /// Number of reflections including the project root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the project root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All reflections in arena order
    pub fn iter(&self) -> impl Iterator<Item = &Reflection> {
        self.nodes.iter()
    }

    /// Children of `id` in declaration order
    pub fn children(&self, id: ReflectionId) -> &[ReflectionId] {
        self.get(id).map(Reflection::children).unwrap_or(&[])
    }

    /// Parent of `id`
    pub fn parent(&self, id: ReflectionId) -> Option<ReflectionId> {
        self.get(id).and_then(Reflection::parent)
    }

    /// Descendants of `id`, depth first in declaration order, excluding `id`
    pub fn descendants(&self, id: ReflectionId) -> Vec<ReflectionId> {
        let mut out = Vec::new();
        let mut stack: Vec<ReflectionId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Ancestors of `id`, nearest first, ending at the project root
    pub fn ancestors(&self, id: ReflectionId) -> impl Iterator<Item = ReflectionId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Resolve a dotted name such as `"src/fs".Reader.read` from the root
    pub fn find_by_qualified_name(&self, name: &str) -> Option<ReflectionId> {
        name.split('.').try_fold(self.root(), |current, part| {
            self.children(current)
                .iter()
                .copied()
                .find(|&child| self.nodes[child.0].name == part)
        })
    }

    /// Dotted display path of `id`, excluding the project root
    pub fn qualified_name(&self, id: ReflectionId) -> String {
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .filter(|&a| a != self.root())
            .map(|a| self.nodes[a.0].name.as_str())
            .collect();
        parts.reverse();
        if let Some(node) = self.get(id) {
            parts.push(&node.name);
        }
        parts.join(".")
    }

    /// File-safe alias of a single reflection
    pub fn alias(&self, id: ReflectionId) -> String {
        let alias = self.get(id).map(|r| slug::alias(&r.name)).unwrap_or_default();
        if alias.is_empty() {
            format!("reflection-{}", id.0)
        } else {
            alias
        }
    }

    /// Aliases of `id` and its ancestors joined with `separator`.
    ///
    /// The walk stops below `relative_to` (when it is an ancestor) or
    /// below the project root.
    pub fn qualified_url(
        &self,
        id: ReflectionId,
        relative_to: Option<ReflectionId>,
        separator: &str,
    ) -> String {
        let mut parts = vec![self.alias(id)];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if Some(parent) == relative_to || self.nodes[parent.0].kind == ReflectionKind::Global {
                break;
            }
            parts.push(self.alias(parent));
            current = self.parent(parent);
        }
        parts.reverse();
        parts.join(separator)
    }
}

impl Index<ReflectionId> for ReflectionTree {
    type Output = Reflection;

    fn index(&self, id: ReflectionId) -> &Reflection {
        &self.nodes[id.0]
    }
}

impl IndexMut<ReflectionId> for ReflectionTree {
    fn index_mut(&mut self, id: ReflectionId) -> &mut Reflection {
        &mut self.nodes[id.0]
    }
}
