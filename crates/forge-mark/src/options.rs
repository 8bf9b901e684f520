//! Theme options
//!
//! `ThemeOptions` is the configuration surface selected once before
//! planning. `ThemeContext` pairs it with the resolved project name and
//! is passed by reference to every planner and resolver call.

use crate::diagnostics::MarkResult;
use crate::flavor::MarkdownFlavor;
use serde::{Deserialize, Serialize};

/// Template used for the index document and reflection pages
pub const DEFAULT_TEMPLATE: &str = "reflection.hbs";

/// Output path of the project index document
pub const INDEX_FILE: &str = "README.md";

/// Extension of every generated document
pub const DOCUMENT_EXTENSION: &str = "md";

/// Configuration for the markdown theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOptions {
    /// Anchor-format convention
    pub md_flavour: MarkdownFlavor,
    /// Readme source; `"none"` hides the readme on the index document
    pub readme: Option<String>,
    /// Qualified name of the reflection documented as the project root
    pub entry_point: Option<String>,
    /// Template of the index document
    pub index_template: String,
    /// Fold every reflection into the index document
    pub single_file: bool,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            md_flavour: MarkdownFlavor::Generic,
            readme: None,
            entry_point: None,
            index_template: DEFAULT_TEMPLATE.to_string(),
            single_file: false,
        }
    }
}

impl ThemeOptions {
    /// Create options for the given flavor
    pub fn new(md_flavour: MarkdownFlavor) -> Self {
        Self {
            md_flavour,
            ..Default::default()
        }
    }

    /// Load options from a TOML document.
    ///
    /// ```
    /// use forge_mark::{MarkdownFlavor, ThemeOptions};
    ///
    /// let options = ThemeOptions::from_toml_str(r#"
    ///     mdFlavour = "strict-header-slug"
    ///     readme = "none"
    /// "#).unwrap();
    /// assert_eq!(options.md_flavour, MarkdownFlavor::StrictHeaderSlug);
    /// assert!(!options.display_readme());
    /// ```
    pub fn from_toml_str(source: &str) -> MarkResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Set the readme source
    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = Some(readme.into());
        self
    }

    /// Set the entry point
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = Some(entry_point.into());
        self
    }

    /// Set the index template name
    pub fn with_index_template(mut self, template: impl Into<String>) -> Self {
        self.index_template = template.into();
        self
    }

    /// Enable or disable single file output
    pub fn with_single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    /// Whether the index document should show the readme
    pub fn display_readme(&self) -> bool {
        self.readme.as_deref() != Some("none")
    }
}

/// Read-only state shared by one planning run
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeContext {
    /// Options selected for the run
    pub options: ThemeOptions,
    /// Name of the reflection documented as the project root
    pub project_name: String,
}

impl ThemeContext {
    /// Create a context
    pub fn new(options: ThemeOptions, project_name: impl Into<String>) -> Self {
        Self {
            options,
            project_name: project_name.into(),
        }
    }

    /// Flavor selected for the run
    pub fn flavor(&self) -> MarkdownFlavor {
        self.options.md_flavour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ThemeOptions::default();
        assert_eq!(options.md_flavour, MarkdownFlavor::Generic);
        assert_eq!(options.index_template, "reflection.hbs");
        assert!(options.display_readme());
        assert!(!options.single_file);
    }

    #[test]
    fn test_builder() {
        let options = ThemeOptions::new(MarkdownFlavor::StrictHeaderSlug)
            .with_readme("none")
            .with_entry_point("\"index\"")
            .with_index_template("index.hbs")
            .with_single_file(true);
        assert!(!options.display_readme());
        assert_eq!(options.entry_point.as_deref(), Some("\"index\""));
        assert_eq!(options.index_template, "index.hbs");
        assert!(options.single_file);
    }

    #[test]
    fn test_from_toml() {
        let options = ThemeOptions::from_toml_str(
            r#"
            mdFlavour = "generic"
            readme = "docs/intro.md"
            singleFile = true
            "#,
        )
        .unwrap();
        assert!(options.display_readme());
        assert!(options.single_file);
        assert_eq!(options.index_template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_from_toml_unknown_flavor() {
        let err = ThemeOptions::from_toml_str(r#"mdFlavour = "gitlab""#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_context() {
        let context = ThemeContext::new(ThemeOptions::default(), "demo");
        assert_eq!(context.flavor(), MarkdownFlavor::Generic);
        assert_eq!(context.project_name, "demo");
    }
}
