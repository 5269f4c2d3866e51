//! Run options and their defaults.

use crate::anchor::AnchorStyle;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Member sections rendered by default, in output order.
pub const DEFAULT_MEMBER_SECTIONS: &[&str] = &[
    "define",
    "enum",
    "func",
    "property",
    "public-attrib",
    "public-func",
    "protected-attrib",
    "protected-func",
    "signal",
    "public-slot",
    "protected-slot",
    "public-type",
    "private-attrib",
    "private-func",
    "private-slot",
    "public-static-func",
    "private-static-func",
];

/// Compound kinds rendered by default, in output order.
pub const DEFAULT_COMPOUND_KINDS: &[&str] =
    &["namespace", "class", "struct", "union", "typedef", "interface"];

/// Recognized categories. Order is output order; anything unlisted is
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub members: Vec<String>,
    pub compounds: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            members: DEFAULT_MEMBER_SECTIONS.iter().map(|s| s.to_string()).collect(),
            compounds: DEFAULT_COMPOUND_KINDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Options {
    /// Doxygen XML output directory.
    pub directory: PathBuf,
    /// Output file template; `None` picks `api.<ext>` or `api_%s.<ext>`.
    pub output: Option<String>,
    /// One document per group.
    pub groups: bool,
    /// One document per top-level namespace.
    pub classes: bool,
    /// One extra document per page.
    pub pages: bool,
    /// Leave the index out of single-file output.
    pub noindex: bool,
    pub anchors: bool,
    pub html_anchors: bool,
    /// Language tag for code fences.
    pub language: String,
    /// Renderer name: markdown, md or json.
    pub format: String,
    pub filters: Filters,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            output: None,
            groups: false,
            classes: false,
            pages: false,
            noindex: false,
            anchors: false,
            html_anchors: false,
            language: "cpp".to_string(),
            format: "markdown".to_string(),
            filters: Filters::default(),
        }
    }
}

impl Options {
    /// Whether the primary output is split into one file per group/namespace.
    pub fn is_split(&self) -> bool {
        self.groups || self.classes
    }

    /// Effective output path template for files with extension `ext`.
    ///
    /// Split modes need a `%s` placeholder for the group or namespace name.
    pub fn output_template(&self, ext: &str) -> Result<String> {
        let template = match &self.output {
            Some(output) => output.clone(),
            None if self.is_split() => format!("api_%s.{}", ext),
            None => format!("api.{}", ext),
        };

        if self.is_split() && !template.contains("%s") {
            return Err(Error::MissingPlaceholder { output: template });
        }
        Ok(template)
    }

    pub fn anchor_style(&self) -> AnchorStyle {
        if self.anchors {
            AnchorStyle::Attribute
        } else if self.html_anchors {
            AnchorStyle::Html
        } else {
            AnchorStyle::None
        }
    }
}
