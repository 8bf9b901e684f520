//! Markdown output flavors
//!
//! The flavor decides how anchor references are spelled. Generic
//! markdown hosts derive header ids from the slugged qualified path;
//! the strict header-slug host prefixes every header id with
//! `markdown-header-` and spells modifier flags into the id.

use crate::diagnostics::MarkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anchor-format convention of the generated markdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkdownFlavor {
    /// Anchors are the slugged path relative to the owning document
    #[default]
    Generic,
    /// Anchors follow the `markdown-header-<slug>` convention
    StrictHeaderSlug,
}

impl MarkdownFlavor {
    /// Every recognized flavor
    pub const ALL: [MarkdownFlavor; 2] = [MarkdownFlavor::Generic, MarkdownFlavor::StrictHeaderSlug];

    /// Configuration spelling of this flavor
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkdownFlavor::Generic => "generic",
            MarkdownFlavor::StrictHeaderSlug => "strict-header-slug",
        }
    }

    /// Whether anchors use the `markdown-header-` convention
    pub fn is_strict(&self) -> bool {
        matches!(self, MarkdownFlavor::StrictHeaderSlug)
    }
}

impl fmt::Display for MarkdownFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkdownFlavor {
    type Err = MarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flavor| flavor.as_str() == s.trim())
            .ok_or_else(|| {
                MarkError::config(format!(
                    "unknown markdown flavor `{}` (expected `generic` or `strict-header-slug`)",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flavor() {
        assert_eq!("generic".parse::<MarkdownFlavor>().unwrap(), MarkdownFlavor::Generic);
        assert_eq!(
            "strict-header-slug".parse::<MarkdownFlavor>().unwrap(),
            MarkdownFlavor::StrictHeaderSlug
        );
    }

    #[test]
    fn test_unknown_flavor_is_config_error() {
        let err = "gitlab".parse::<MarkdownFlavor>().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("gitlab"));
    }

    #[test]
    fn test_flavor_serde() {
        let json = serde_json::to_string(&MarkdownFlavor::StrictHeaderSlug).unwrap();
        assert_eq!(json, "\"strict-header-slug\"");
        let back: MarkdownFlavor = serde_json::from_str("\"generic\"").unwrap();
        assert_eq!(back, MarkdownFlavor::Generic);
        assert_eq!(MarkdownFlavor::default(), MarkdownFlavor::Generic);
    }
}
