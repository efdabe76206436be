//! Logging and debugging facilities.
//!
//! The crates use `tracing` for instrumentation. Install a subscriber in the
//! host application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_inspector=debug")
//!     .init();
//! ```
//!
//! [`ObjectTreeDebug`] renders an object subtree through any
//! [`ObjectSubstrate`], which is handy when a projection shows something
//! unexpected.

use std::fmt::Write as FmtWrite;

use crate::error::ObjectResult;
use crate::object::ObjectId;
use crate::substrate::ObjectSubstrate;

/// Target names for log filtering.
pub mod targets {
    /// Substrate crate target.
    pub const CORE: &str = "horizon_inspector_core";
    /// Object registry target.
    pub const OBJECT: &str = "horizon_inspector_core::object";
    /// Property reads and writes in the registry.
    pub const PROPERTY: &str = "horizon_inspector_core::property";
    /// Signal emission target.
    pub const SIGNAL: &str = "horizon_inspector_core::signal";
}

/// Style options for object tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for [`ObjectTreeDebug`].
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Show the class name after each object.
    pub show_types: bool,
    /// List declared and dynamic property values under each object.
    pub show_properties: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_types: true,
            show_properties: false,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Options that include property values.
    pub fn detailed() -> Self {
        Self {
            show_properties: true,
            ..Default::default()
        }
    }
}

/// Renders an object subtree as indented text.
#[derive(Debug, Clone, Default)]
pub struct ObjectTreeDebug {
    options: TreeFormatOptions,
}

impl ObjectTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, substrate: &dyn ObjectSubstrate, root: ObjectId) -> ObjectResult<String> {
        let mut output = String::new();
        self.format_into(substrate, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_into(
        &self,
        substrate: &dyn ObjectSubstrate,
        id: ObjectId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> ObjectResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let name = substrate.object_name(id)?;
        output.push_str(&self.prefix(depth, is_last));
        output.push_str(if name.is_empty() { "(unnamed)" } else { &name });
        if self.options.show_types {
            let _ = write!(output, " ({})", substrate.type_name(id)?);
        }
        output.push('\n');

        if self.options.show_properties {
            let indent = self.continuation(depth + 1);
            let declared = substrate.properties(id)?.into_iter().map(|m| m.name);
            let dynamic = substrate.dynamic_property_names(id)?;
            for prop in declared.chain(dynamic) {
                let value = substrate.property(id, &prop).unwrap_or_default();
                let _ = writeln!(output, "{indent}.{prop} = {value:?}");
            }
        }

        let children = substrate.children(id)?;
        let child_count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_into(substrate, child, depth + 1, i + 1 == child_count, output)?;
        }
        Ok(())
    }

    fn prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }
        let connector = match (self.options.style, is_last) {
            (TreeStyle::Ascii, false) => "+-- ",
            (TreeStyle::Ascii, true) => "`-- ",
            (TreeStyle::Unicode, false) => "\u{251c}\u{2500}\u{2500} ",
            (TreeStyle::Unicode, true) => "\u{2514}\u{2500}\u{2500} ",
        };
        format!("{}{connector}", self.continuation(depth - 1))
    }

    fn continuation(&self, depth: usize) -> String {
        let branch = match self.options.style {
            TreeStyle::Ascii => "|   ",
            TreeStyle::Unicode => "\u{2502}   ",
        };
        branch.repeat(depth)
    }
}
