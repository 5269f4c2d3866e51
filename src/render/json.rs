//! JSON renderer for tooling integration.
//!
//! Each compound of a unit becomes one object carrying its filtered
//! members and the ids of its filtered child compounds.

use crate::error::Result;
use crate::model::Member;
use crate::orchestrator::OutputUnit;
use crate::render::Renderer;
use crate::tree::{Compound, NodeId, Tree};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct CompoundView<'a> {
    kind: &'a str,
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    title: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    brief: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    detailed: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    groupid: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bases: Vec<&'a str>,
    members: Vec<MemberView<'a>>,
    compounds: Vec<&'a str>,
}

#[derive(Serialize)]
struct MemberView<'a> {
    id: &'a str,
    name: &'a str,
    kind: &'a str,
    section: &'a str,
    signature: String,
    #[serde(skip_serializing_if = "is_blank")]
    brief: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    detailed: &'a str,
}

fn is_blank(text: &&str) -> bool {
    text.is_empty()
}

impl<'a> CompoundView<'a> {
    fn new(tree: &'a Tree, compound: &'a Compound) -> Self {
        let compounds: Vec<&str> = compound
            .filtered()
            .map(|f| f.compounds.iter().map(|&c| tree.node(c).id.as_str()).collect())
            .unwrap_or_default();
        Self {
            kind: compound.kind.as_str(),
            id: &compound.id,
            name: &compound.name,
            title: &compound.title,
            brief: &compound.brief,
            detailed: &compound.detailed,
            groupid: compound.groupid.as_deref(),
            bases: compound.base_refs().iter().map(|b| b.name.as_str()).collect(),
            members: compound.filtered_members().map(MemberView::new).collect(),
            compounds,
        }
    }
}

impl<'a> MemberView<'a> {
    fn new(member: &'a Member) -> Self {
        Self {
            id: &member.id,
            name: &member.name,
            kind: &member.kind,
            section: &member.section,
            signature: member.signature(),
            brief: &member.brief,
            detailed: &member.detailed,
        }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, tree: &Tree, node: NodeId) -> Result<Option<String>> {
        let view = CompoundView::new(tree, tree.node(node));
        Ok(Some(serde_json::to_string_pretty(&view)?))
    }

    fn render_unit(&self, tree: &Tree, unit: &OutputUnit) -> Result<String> {
        let views: Vec<CompoundView> = unit
            .nodes
            .iter()
            .map(|&node| CompoundView::new(tree, tree.node(node)))
            .collect();
        let mut out = serde_json::to_string_pretty(&views)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
