//! GitHub-flavored markdown renderer.
//!
//! Template selection is a dispatch on the compound kind:
//!
//! - `index` → summary table of everything that survived filtering
//! - `page` → title and body
//! - `group`, `namespace` → namespace template
//! - `class`, `struct`, `interface` → class template
//!
//! Any other kind is skipped with a warning.

use crate::anchor::{self, AnchorStyle};
use crate::error::Result;
use crate::model::{Kind, Member};
use crate::orchestrator::OutputUnit;
use crate::render::{RenderOptions, Renderer};
use crate::tree::{Compound, NodeId, Tree};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static RE_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\r\n|\r|\n){3,}").unwrap());

const FOOTER: &str = "Generated by doxmark";

const TABLE_HEADER: &str = " Members                        | Descriptions\n\
--------------------------------|---------------------------------------------";

const VALUES_HEADER: &str = " Values                         | Descriptions\n\
--------------------------------|---------------------------------------------";

pub struct MarkdownRenderer {
    language: String,
    anchors: AnchorStyle,
}

impl MarkdownRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            language: options.language.clone(),
            anchors: options.anchors,
        }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, tree: &Tree, node: NodeId) -> Result<Option<String>> {
        let compound = tree.node(node);
        debug!("rendering {} {}", compound.kind, compound.name);

        let text = match compound.kind {
            Kind::Index => self.render_index(tree),
            Kind::Page => self.render_page(compound),
            Kind::Group | Kind::Namespace => {
                if wraps_single_namespace(tree, compound) {
                    return Ok(None);
                }
                self.render_namespace(tree, compound)
            }
            Kind::Class | Kind::Struct | Kind::Interface => self.render_class(tree, compound),
            _ => {
                warn!("cannot render {} {}", compound.kind, compound.name);
                return Ok(None);
            }
        };

        Ok(Some(collapse_blank_lines(&text)))
    }

    fn render_unit(&self, tree: &Tree, unit: &OutputUnit) -> Result<String> {
        let mut blocks = Vec::new();
        for &node in &unit.nodes {
            if let Some(block) = self.render(tree, node)? {
                blocks.push(block);
            }
        }
        if unit.footer {
            blocks.push(format!("{}\n", FOOTER));
        }
        Ok(blocks.join("\n"))
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

impl MarkdownRenderer {
    fn heading(&self, level: usize, text: &str, id: &str) -> String {
        let anchor = anchor::anchor(self.anchors, id);
        let hashes = "#".repeat(level);
        if anchor.is_empty() {
            format!("{} {}", hashes, title(text))
        } else {
            format!("{} {} {}", hashes, title(text), anchor)
        }
    }

    fn render_index(&self, tree: &Tree) -> String {
        let root = tree.root();
        let mut lines = vec![self.heading(1, "Summary", &tree.node(root).id), String::new()];

        let rows: Vec<String> = tree
            .collect_filtered(root)
            .into_iter()
            .map(|n| compound_row(tree.node(n)))
            .collect();
        if !rows.is_empty() {
            lines.push(TABLE_HEADER.to_string());
            lines.extend(rows);
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn render_page(&self, page: &Compound) -> String {
        let lines = vec![
            self.heading(1, page.display_title(), &page.id),
            String::new(),
            page.brief.clone(),
            String::new(),
            page.detailed.clone(),
            String::new(),
        ];
        lines.join("\n")
    }

    fn render_namespace(&self, tree: &Tree, compound: &Compound) -> String {
        let heading = match compound.kind {
            Kind::Group => compound.display_title().to_string(),
            _ => format!("{} `{}`", compound.kind, compound.name),
        };
        let mut lines = vec![self.heading(1, &heading, &compound.id), String::new()];
        push_descriptions(&mut lines, compound);
        self.push_summary_and_members(&mut lines, tree, compound);
        lines.join("\n")
    }

    fn render_class(&self, tree: &Tree, compound: &Compound) -> String {
        let heading = format!("{} `{}`", compound.kind, compound.name);
        let mut lines = vec![self.heading(1, &heading, &compound.id), String::new()];

        lines.push(format!("```{}", self.language));
        lines.push(format!("{} {}", compound.kind, compound.name));
        for (i, base) in compound.base_refs().iter().enumerate() {
            let lead = if i == 0 { ":" } else { "," };
            let virt = if base.virt == "virtual" { "virtual " } else { "" };
            lines.push(format!("  {} {} {}{}", lead, base.prot, virt, base.name));
        }
        lines.push("```".to_string());
        lines.push(String::new());

        push_descriptions(&mut lines, compound);
        self.push_summary_and_members(&mut lines, tree, compound);
        lines.join("\n")
    }

    fn push_summary_and_members(&self, lines: &mut Vec<String>, tree: &Tree, compound: &Compound) {
        let children: Vec<&Compound> = compound
            .filtered()
            .map(|f| f.compounds.iter().map(|&c| tree.node(c)).collect())
            .unwrap_or_default();
        let members: Vec<&Member> = compound.filtered_members().collect();

        if children.is_empty() && members.is_empty() {
            return;
        }

        lines.push("## Summary".to_string());
        lines.push(String::new());
        lines.push(TABLE_HEADER.to_string());
        lines.extend(children.iter().map(|c| compound_row(c)));
        lines.extend(members.iter().map(|m| member_row(m)));
        lines.push(String::new());

        if members.is_empty() {
            return;
        }

        lines.push("## Members".to_string());
        lines.push(String::new());
        for member in members {
            self.push_member(lines, member);
        }
    }

    fn push_member(&self, lines: &mut Vec<String>, member: &Member) {
        lines.push(self.heading(4, &format!("`{}`", member.signature()), &member.id));
        lines.push(String::new());
        lines.push(member.brief.clone());
        lines.push(String::new());
        lines.push(member.detailed.clone());
        lines.push(String::new());

        if !member.enum_values.is_empty() {
            lines.push(VALUES_HEADER.to_string());
            for value in &member.enum_values {
                let name = if value.initializer.is_empty() {
                    value.name.clone()
                } else {
                    format!("{} {}", value.name, value.initializer)
                };
                lines.push(format!("`{}` | {}", cell(&name), cell(&value.brief)));
            }
            lines.push(String::new());
        }
    }
}

fn push_descriptions(lines: &mut Vec<String>, compound: &Compound) {
    lines.push(compound.brief.clone());
    lines.push(String::new());
    lines.push(compound.detailed.clone());
    lines.push(String::new());
}

fn compound_row(compound: &Compound) -> String {
    let link = anchor::ref_link(&format!("`{}`", cell(&compound.name)), &compound.id);
    format!("`{}` {} | {}", compound.kind, link, cell(&compound.brief))
        .trim_end()
        .to_string()
}

fn member_row(member: &Member) -> String {
    let link = anchor::ref_link(&format!("`{}`", cell(&member.signature())), &member.id);
    format!("{} | {}", link, cell(&member.brief))
        .trim_end()
        .to_string()
}

/// A namespace or group whose only child is a namespace renders as nothing;
/// the nested namespace carries the content.
fn wraps_single_namespace(tree: &Tree, compound: &Compound) -> bool {
    match compound.compounds() {
        [only] => tree.node(*only).kind == Kind::Namespace,
        _ => false,
    }
}

/// Escape text for a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br/>")
}

/// Escape text for a heading.
fn title(text: &str) -> String {
    text.replace('\n', "<br/>")
}

fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_LINES.replace_all(text, "$1\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Filters;
    use crate::model::{BaseRef, EnumValue};
    use crate::tree::testutil::add;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn renderer(anchors: AnchorStyle) -> MarkdownRenderer {
        MarkdownRenderer::new(&RenderOptions {
            language: "cpp".to_string(),
            anchors,
        })
    }

    fn function(id: &str, name: &str, section: &str, brief: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            kind: "function".to_string(),
            section: section.to_string(),
            ty: "void".to_string(),
            args: "()".to_string(),
            brief: brief.to_string(),
            ..Default::default()
        }
    }

    fn render(tree: &Tree, node: NodeId, anchors: AnchorStyle) -> Option<String> {
        renderer(anchors).render(tree, node).unwrap()
    }

    #[test]
    fn class_template() {
        let mut tree = Tree::new();
        let root = tree.root();
        let class = add(&mut tree, root, "classgeo_1_1_point", "class");
        tree.node_mut(class).name = "geo::Point".to_string();
        tree.node_mut(class).brief = "A point.".to_string();
        tree.add_base_ref(
            class,
            BaseRef {
                refid: None,
                name: "geo::Shape".to_string(),
                prot: "public".to_string(),
                virt: "non-virtual".to_string(),
            },
        );
        tree.add_member(class, function("p_1a", "reset", "public-func", "Reset | clear."));
        tree.filter_children(root, &Filters::default(), None);

        let out = render(&tree, class, AnchorStyle::Attribute).unwrap();
        let expected = "\
# class `geo::Point` {#classgeo_1_1_point}

```cpp
class geo::Point
  : public geo::Shape
```

A point.

## Summary

 Members                        | Descriptions
--------------------------------|---------------------------------------------
[`void reset()`]({#ref p_1a #}) | Reset \\| clear.

## Members

#### `void reset()` {#p_1a}

Reset | clear.

";
        assert_eq!(out, expected);
    }

    #[test]
    fn namespace_lists_filtered_children_and_members() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ns = add(&mut tree, root, "namespacegeo", "namespace");
        tree.node_mut(ns).name = "geo".to_string();
        let class = add(&mut tree, ns, "classgeo_1_1_point", "class");
        tree.node_mut(class).name = "geo::Point".to_string();
        tree.node_mut(class).brief = "A point.".to_string();
        let mut axis = Member {
            id: "ns_1axis".to_string(),
            name: "Axis".to_string(),
            kind: "enum".to_string(),
            section: "enum".to_string(),
            ..Default::default()
        };
        axis.enum_values.push(EnumValue {
            name: "X".to_string(),
            initializer: "= 0".to_string(),
            brief: "horizontal".to_string(),
            ..Default::default()
        });
        tree.add_member(ns, axis);
        tree.filter_children(root, &Filters::default(), None);

        let out = render(&tree, ns, AnchorStyle::None).unwrap();
        let expected = "\
# namespace `geo`

## Summary

 Members                        | Descriptions
--------------------------------|---------------------------------------------
`class` [`geo::Point`]({#ref classgeo_1_1_point #}) | A point.
[`enum Axis`]({#ref ns_1axis #}) |

## Members

#### `enum Axis`

 Values                         | Descriptions
--------------------------------|---------------------------------------------
`X = 0` | horizontal
";
        assert_eq!(out, expected);
    }

    #[test]
    fn namespace_wrapping_single_namespace_renders_nothing() {
        let mut tree = Tree::new();
        let root = tree.root();
        let outer = add(&mut tree, root, "outer", "namespace");
        add(&mut tree, outer, "inner", "namespace");
        assert_eq!(render(&tree, outer, AnchorStyle::None), None);
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let mut tree = Tree::new();
        let root = tree.root();
        let file = add(&mut tree, root, "file_8h", "file");
        assert_eq!(render(&tree, file, AnchorStyle::None), None);
    }

    #[test]
    fn page_uses_title() {
        let mut tree = Tree::new();
        let root = tree.root();
        let page = add(&mut tree, root, "intro", "page");
        tree.node_mut(page).title = "Introduction".to_string();
        tree.node_mut(page).detailed = "Welcome.".to_string();
        let out = render(&tree, page, AnchorStyle::Html).unwrap();
        assert_eq!(out, "# Introduction <a id=\"intro\"></a>\n\nWelcome.\n");
    }

    #[test]
    fn index_lists_all_filtered_compounds() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ns = add(&mut tree, root, "ns", "namespace");
        let class = add(&mut tree, ns, "ns_a", "class");
        tree.add_member(class, function("a_1f", "f", "public-func", ""));
        tree.filter_children(root, &Filters::default(), None);

        let out = render(&tree, root, AnchorStyle::None).unwrap();
        assert!(out.starts_with("# Summary\n\n"));
        assert!(out.contains("\n`namespace` [`ns`]({#ref ns #}) |\n"));
        assert!(out.contains("\n`class` [`ns_a`]({#ref ns_a #}) |\n"));
    }

    #[test]
    fn unit_appends_footer() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.filter_children(root, &Filters::default(), None);
        let unit = OutputUnit {
            path: PathBuf::from("api.md"),
            nodes: vec![root],
            footer: true,
        };
        let out = renderer(AnchorStyle::None).render_unit(&tree, &unit).unwrap();
        assert_eq!(out, "# Summary\n\nGenerated by doxmark\n");
    }

    #[test]
    fn collapses_runs_of_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn escapes_cells() {
        assert_eq!(cell("a|b\nc"), "a\\|b<br/>c");
    }
}
