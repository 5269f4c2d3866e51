//! Doxygen description markup → Markdown.
//!
//! Only the subset Doxygen emits for ordinary C/C++ comments is handled;
//! unknown elements contribute their text.

use super::xml::{Element, Node};
use crate::anchor;

/// Convert a `briefdescription`/`detaileddescription` element.
pub fn description(el: Option<&Element>) -> String {
    let Some(el) = el else {
        return String::new();
    };
    let mut blocks: Vec<String> = Vec::new();
    collect_blocks(el, &mut blocks);
    blocks.join("\n\n")
}

fn collect_blocks(el: &Element, blocks: &mut Vec<String>) {
    for node in &el.children {
        match node {
            Node::Text(text) => push_block(blocks, text.trim().to_string()),
            Node::Element(child) => match child.name.as_str() {
                "para" => push_block(blocks, inline(child)),
                "sect1" | "sect2" | "sect3" | "sect4" => {
                    let level = child.name[4..].parse::<usize>().unwrap_or(1) + 2;
                    let title = child.child_text("title");
                    if !title.is_empty() {
                        blocks.push(format!("{} {}", "#".repeat(level.min(6)), title));
                    }
                    collect_blocks(child, blocks);
                }
                "title" => {}
                _ => collect_blocks(child, blocks),
            },
        }
    }
}

fn push_block(blocks: &mut Vec<String>, block: String) {
    let block = block.trim();
    if !block.is_empty() {
        blocks.push(block.to_string());
    }
}

/// Inline content of a paragraph, with nested lists and code blocks
/// rendered on their own lines.
fn inline(el: &Element) -> String {
    let mut out = String::new();
    for node in &el.children {
        match node {
            Node::Text(text) => out.push_str(&text.replace('\n', " ")),
            Node::Element(child) => out.push_str(&element(child)),
        }
    }
    out
}

fn element(el: &Element) -> String {
    match el.name.as_str() {
        "bold" => format!("**{}**", inline(el).trim()),
        "emphasis" => format!("*{}*", inline(el).trim()),
        "computeroutput" => format!("`{}`", el.text().trim()),
        "ref" => match el.attr("refid") {
            Some(refid) => anchor::ref_link(inline(el).trim(), refid),
            None => inline(el),
        },
        "ulink" => {
            let text = inline(el);
            match el.attr("url") {
                Some(url) => format!("[{}]({})", text.trim(), url),
                None => text,
            }
        }
        "linebreak" => "<br/>".to_string(),
        "sp" => " ".to_string(),
        "ndash" => "–".to_string(),
        "mdash" => "—".to_string(),
        "itemizedlist" => list(el, false),
        "orderedlist" => list(el, true),
        "programlisting" => code_block(el),
        "verbatim" => format!("\n\n```\n{}\n```\n\n", el.text().trim_end()),
        "simplesect" => simple_section(el),
        "parameterlist" => parameter_list(el),
        "para" => format!("{} ", inline(el).trim()),
        "anchor" | "indexentry" | "xrefsect" => String::new(),
        _ => inline(el),
    }
}

fn list(el: &Element, ordered: bool) -> String {
    let mut out = String::from("\n\n");
    for (i, item) in el.children_named("listitem").enumerate() {
        let bullet = if ordered {
            format!("{}.", i + 1)
        } else {
            "*".to_string()
        };
        out.push_str(&format!("{} {}\n", bullet, inline(item).trim()));
    }
    out.push('\n');
    out
}

fn code_block(el: &Element) -> String {
    let lines: Vec<String> = el
        .children_named("codeline")
        .map(|line| {
            let mut text = String::new();
            code_text(line, &mut text);
            text
        })
        .collect();
    format!("\n\n```\n{}\n```\n\n", lines.join("\n"))
}

fn code_text(el: &Element, out: &mut String) {
    for node in &el.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) if child.name == "sp" => out.push(' '),
            Node::Element(child) => code_text(child, out),
        }
    }
}

fn simple_section(el: &Element) -> String {
    let label = match el.attr("kind").unwrap_or("") {
        "return" => "Returns".to_string(),
        "see" => "See also".to_string(),
        "note" => "Note".to_string(),
        "warning" => "Warning".to_string(),
        "since" => "Since".to_string(),
        "deprecated" => "Deprecated".to_string(),
        "par" => el.child_text("title"),
        other => capitalize(other),
    };
    let body: Vec<String> = el
        .children_named("para")
        .map(|para| inline(para).trim().to_string())
        .collect();
    format!("\n\n**{}**: {}\n\n", label, body.join(" "))
}

fn parameter_list(el: &Element) -> String {
    let title = match el.attr("kind").unwrap_or("param") {
        "retval" => "Return values",
        "exception" => "Exceptions",
        "templateparam" => "Template parameters",
        _ => "Parameters",
    };
    let mut out = format!("\n\n#### {}\n", title);
    for item in el.children_named("parameteritem") {
        let names: Vec<String> = item
            .children_named("parameternamelist")
            .flat_map(|list| list.children_named("parametername"))
            .map(|name| format!("`{}`", name.text().trim()))
            .collect();
        let desc = item
            .child("parameterdescription")
            .map(|d| inline(d).trim().to_string())
            .unwrap_or_default();
        out.push_str(&format!("* {} {}\n", names.join(", "), desc));
    }
    out.push('\n');
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
