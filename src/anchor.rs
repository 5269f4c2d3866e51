//! Anchors and cross-reference placeholders.
//!
//! Rendered text refers to other compounds and members through
//! `{#ref <refid> #}` placeholders. They are resolved into real links only
//! once every output file is known, see [`crate::output::Locator`].

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{#ref ([^ ]+) #\}").unwrap());

/// How headings expose their id as a link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorStyle {
    /// No explicit anchor.
    #[default]
    None,
    /// Pandoc/kramdown style `{#id}` heading attribute.
    Attribute,
    /// `<a id="id"></a>`.
    Html,
}

/// Anchor markup for `id`, placed at the end of a heading.
pub fn anchor(style: AnchorStyle, id: &str) -> String {
    match style {
        AnchorStyle::None => String::new(),
        AnchorStyle::Attribute => format!("{{#{}}}", id),
        AnchorStyle::Html => format!("<a id=\"{}\"></a>", id),
    }
}

/// Unresolved link target for `refid`.
pub fn placeholder(refid: &str) -> String {
    format!("{{#ref {} #}}", refid)
}

/// Markdown link to `refid` with an unresolved target.
pub fn ref_link(text: &str, refid: &str) -> String {
    format!("[{}]({})", text, placeholder(refid))
}

/// Replace every placeholder in `text` with `target(refid)`.
pub fn resolve_refs(text: &str, target: impl Fn(&str) -> String) -> String {
    RE_REF
        .replace_all(text, |caps: &Captures| target(&caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_anchor() {
        assert_eq!(anchor(AnchorStyle::Attribute, "classfoo"), "{#classfoo}");
    }

    #[test]
    fn html_anchor() {
        assert_eq!(anchor(AnchorStyle::Html, "classfoo"), "<a id=\"classfoo\"></a>");
    }

    #[test]
    fn no_anchor() {
        assert_eq!(anchor(AnchorStyle::None, "classfoo"), "");
    }

    #[test]
    fn ref_link_wraps_placeholder() {
        assert_eq!(ref_link("`Foo`", "classfoo"), "[`Foo`]({#ref classfoo #})");
    }

    #[test]
    fn resolves_every_placeholder() {
        let text = "see [a]({#ref x #}) and [b]({#ref y_1a2 #})";
        let resolved = resolve_refs(text, |id| format!("#{}", id));
        assert_eq!(resolved, "see [a](#x) and [b](#y_1a2)");
    }
}
