//! forge-mark: Markdown theme URL planning for Forge documentation
//!
//! This crate decides where every documented reflection ends up in the
//! generated markdown:
//! - Reflections whose kind has a grouping rule (classes, interfaces,
//!   enums, modules) get a document of their own
//! - Everything else is folded into the nearest documented ancestor and
//!   linked through an anchor
//! - Anchors follow the selected markdown flavor (generic, or the strict
//!   `markdown-header-` convention)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ ReflectionTree  │    │  ThemeOptions    │
//! │ (analyzer)      │    │  (flavor, ...)   │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!              ┌──────────────┐
//!              │  UrlPlanner  │──────┐
//!              └──────┬───────┘      ▼
//!                     │       ┌──────────────┐
//!                     │       │AnchorResolver│
//!                     ▼       └──────────────┘
//!              ┌──────────────┐
//!              │   UrlPlan    │ → renderer
//!              └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use forge_mark::{MarkdownFlavor, MarkdownTheme, ReflectionKind, ReflectionTree, ThemeOptions};
//!
//! let mut tree = ReflectionTree::new("demo");
//! let class = tree.add_child(tree.root(), "Reader", ReflectionKind::Class);
//! let read = tree.add_child(class, "read", ReflectionKind::Method);
//!
//! let theme = MarkdownTheme::new(ThemeOptions::new(MarkdownFlavor::StrictHeaderSlug));
//! let plan = theme.get_urls(&mut tree).unwrap();
//!
//! assert_eq!(plan.mappings[0].url, "README.md");
//! assert_eq!(tree[class].url.as_deref(), Some("classes/reader.md"));
//! assert_eq!(tree[read].url.as_deref(), Some("classes/reader.md#markdown-header-read"));
//! ```

// Core types
pub mod flavor;
pub mod options;
pub mod reflection;

// Planning
pub mod anchor;
pub mod mapping;
pub mod planner;
pub mod slug;
pub mod theme;

// Errors and output
pub mod diagnostics;
pub mod printer;

// Re-exports for convenience
pub use anchor::AnchorResolver;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, DiagnosticsCollector, MarkError, MarkResult};
pub use flavor::MarkdownFlavor;
pub use mapping::{IndexContext, MappingTable, TemplateMapping, UrlMapping};
pub use options::{ThemeContext, ThemeOptions};
pub use planner::{UrlPlan, UrlPlanner};
pub use printer::PlanPrinter;
pub use reflection::{
    Reflection, ReflectionFlag, ReflectionFlags, ReflectionId, ReflectionKind, ReflectionNode,
    ReflectionTree,
};
pub use theme::MarkdownTheme;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
