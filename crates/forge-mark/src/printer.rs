//! Terminal printer for URL plans
//!
//! Lists every planned document with the anchors folded into it, with
//! optional colored output.
//!
//! # Example
//!
//! ```no_run
//! use forge_mark::printer::PlanPrinter;
//! use forge_mark::{MarkdownTheme, ReflectionTree};
//!
//! let mut tree = ReflectionTree::new("demo");
//! let plan = MarkdownTheme::default().get_urls(&mut tree).unwrap();
//! PlanPrinter::new(&plan, &tree, true).print_to_stdout();
//! ```

use crate::diagnostics::DiagnosticSeverity;
use crate::mapping::UrlMapping;
use crate::planner::UrlPlan;
use crate::reflection::{Reflection, ReflectionTree};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{self, Write as _};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Terminal printer for a `UrlPlan`
pub struct PlanPrinter<'a> {
    plan: &'a UrlPlan,
    tree: &'a ReflectionTree,
    use_color: bool,
}

impl<'a> PlanPrinter<'a> {
    /// Create a new printer
    pub fn new(plan: &'a UrlPlan, tree: &'a ReflectionTree, use_color: bool) -> Self {
        Self {
            plan,
            tree,
            use_color,
        }
    }

    /// Reflections folded into `mapping`, in declaration order
    fn anchors_of(&self, mapping: &UrlMapping) -> Vec<&'a Reflection> {
        let prefix = format!("{}#", mapping.url);
        let tree = self.tree;
        tree.descendants(tree.root())
            .into_iter()
            .map(|id| &tree[id])
            .filter(|r| !r.has_own_document)
            .filter(|r| r.url.as_deref().is_some_and(|u| u.starts_with(&prefix)))
            .collect()
    }

    fn heading(&self, mapping: &UrlMapping) -> String {
        let model = &self.tree[mapping.model];
        format!(
            "{} {} [{}]",
            model.kind.display_name(),
            self.tree.qualified_name(mapping.model),
            mapping.template
        )
    }

    /// Print directly to stdout
    pub fn print_to_stdout(&self) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        if let Err(e) = self.write_colored(&mut stdout) {
            eprintln!("Error printing url plan: {}", e);
        }
    }

    /// Write with colors to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        for mapping in &self.plan.mappings {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            write!(w, "{}", mapping.url)?;
            w.reset()?;
            w.set_color(ColorSpec::new().set_dimmed(true))?;
            writeln!(w, "  {}", self.heading(mapping))?;
            w.reset()?;

            for reflection in self.anchors_of(mapping) {
                write!(w, "  ")?;
                w.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
                write!(w, "#{}", fragment(reflection))?;
                w.reset()?;
                writeln!(w, "  {}", self.tree.qualified_name(reflection.id))?;
            }
        }

        for diagnostic in &self.plan.diagnostics {
            let color = match diagnostic.severity {
                DiagnosticSeverity::Warning => Color::Yellow,
                DiagnosticSeverity::Info => Color::Blue,
            };
            w.set_color(ColorSpec::new().set_fg(Some(color)))?;
            writeln!(w, "{}", diagnostic.format())?;
            w.reset()?;
        }
        Ok(())
    }
}

fn fragment(reflection: &Reflection) -> &str {
    reflection
        .url
        .as_deref()
        .and_then(|u| u.split_once('#'))
        .map(|(_, f)| f)
        .unwrap_or_default()
}

impl Display for PlanPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for mapping in &self.plan.mappings {
            writeln!(f, "{}  {}", mapping.url, self.heading(mapping))?;
            for reflection in self.anchors_of(mapping) {
                writeln!(
                    f,
                    "  #{}  {}",
                    fragment(reflection),
                    self.tree.qualified_name(reflection.id)
                )?;
            }
        }
        for diagnostic in &self.plan.diagnostics {
            writeln!(f, "{}", diagnostic.format())?;
        }
        Ok(())
    }
}
