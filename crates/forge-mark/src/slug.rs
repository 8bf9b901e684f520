//! URL slug generation for markdown documents and anchors
//!
//! This module provides the pure string normalizations used by the
//! planner and the anchor resolver. File aliases are flavor independent;
//! anchor references follow the header-slug rules of the selected
//! markdown flavor.

use crate::flavor::MarkdownFlavor;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Absolute URLs pointing outside the generated documentation
    static ref URL_PREFIX: Regex = Regex::new(r"^(http|ftp)s?://").unwrap();
}

/// Generate the file-safe alias of a single reflection name.
///
/// Every character outside `[A-Za-z0-9]` becomes `_` and the result is
/// lowercased. Returns an empty string for names without any characters;
/// callers substitute an id based fallback.
///
/// # Examples
///
/// ```
/// use forge_mark::slug::alias;
///
/// assert_eq!(alias("MyClass"), "myclass");
/// assert_eq!(alias("\"src/fs\""), "_src_fs_");
/// ```
pub fn alias(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

/// Normalize a display string into an anchor-safe token.
///
/// Both flavors lowercase their input. The generic flavor keeps
/// `[a-z0-9_-]`, turns whitespace into `-` and drops everything else.
/// The strict header-slug flavor keeps `[a-z0-9-]`, turns whitespace,
/// `_`, `.` and `/` into `-` and drops everything else. Trailing
/// separators survive, so `anchor_ref("static-", ..)` stays `static-`.
///
/// # Examples
///
/// ```
/// use forge_mark::flavor::MarkdownFlavor;
/// use forge_mark::slug::anchor_ref;
///
/// assert_eq!(anchor_ref("My Class", MarkdownFlavor::Generic), "my-class");
/// assert_eq!(anchor_ref("read_file", MarkdownFlavor::Generic), "read_file");
/// assert_eq!(anchor_ref("read_file", MarkdownFlavor::StrictHeaderSlug), "read-file");
/// ```
pub fn anchor_ref(s: &str, flavor: MarkdownFlavor) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match flavor {
            MarkdownFlavor::Generic => match c {
                'a'..='z' | '0'..='9' | '-' | '_' => out.push(c),
                c if c.is_whitespace() => out.push('-'),
                _ => {}
            },
            MarkdownFlavor::StrictHeaderSlug => match c {
                'a'..='z' | '0'..='9' | '-' => out.push(c),
                '_' | '.' | '/' => out.push('-'),
                c if c.is_whitespace() => out.push('-'),
                _ => {}
            },
        }
    }
    out
}

/// Whether `url` already points at a planned location.
///
/// Empty strings and bare `#fragment`s (produced for a container that
/// had no document of its own) do not count.
pub fn is_assigned_url(url: &str) -> bool {
    !url.is_empty() && !url.starts_with('#')
}

/// Whether `url` is an absolute link to an external site.
pub fn is_external_url(url: &str) -> bool {
    URL_PREFIX.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_basic() {
        assert_eq!(alias("Foo"), "foo");
        assert_eq!(alias("readFile"), "readfile");
        assert_eq!(alias("v1.2"), "v1_2");
        assert_eq!(alias(""), "");
    }

    #[test]
    fn test_alias_module_names() {
        assert_eq!(alias("\"lib/index\""), "_lib_index_");
        assert_eq!(alias("$store"), "_store");
    }

    #[test]
    fn test_anchor_ref_generic() {
        assert_eq!(anchor_ref("Foo", MarkdownFlavor::Generic), "foo");
        assert_eq!(anchor_ref("foo.bar", MarkdownFlavor::Generic), "foobar");
        assert_eq!(anchor_ref("Return Value", MarkdownFlavor::Generic), "return-value");
        assert_eq!(anchor_ref("$ref", MarkdownFlavor::Generic), "ref");
    }

    #[test]
    fn test_anchor_ref_strict() {
        let strict = MarkdownFlavor::StrictHeaderSlug;
        assert_eq!(anchor_ref("Static-", strict), "static-");
        assert_eq!(anchor_ref("Private-Static-", strict), "private-static-");
        assert_eq!(anchor_ref("\"src/fs\"", strict), "src-fs");
        assert_eq!(anchor_ref("my_value", strict), "my-value");
    }

    #[test]
    fn test_anchor_ref_keeps_trailing_separator() {
        assert_eq!(anchor_ref("object-literal-", MarkdownFlavor::Generic), "object-literal-");
        assert_eq!(anchor_ref("", MarkdownFlavor::StrictHeaderSlug), "");
    }

    #[test]
    fn test_is_assigned_url() {
        assert!(is_assigned_url("classes/foo.md"));
        assert!(is_assigned_url("README.md#foo"));
        assert!(!is_assigned_url(""));
        assert!(!is_assigned_url("#foo"));
    }

    #[test]
    fn test_is_external_url() {
        assert!(is_external_url("https://example.com/docs"));
        assert!(is_external_url("ftp://mirror/docs"));
        assert!(!is_external_url("classes/foo.md"));
    }
}
