//! Records which compound kinds and attributes appear at each traversal
//! depth. A debugging aid for new Doxygen versions.

use crate::orchestrator::{depth, TraversalObserver};
use crate::tree::Compound;
use std::collections::BTreeMap;
use std::fmt::Write;

const RULE: &str = "--------------------------------------------";
const DOUBLE_RULE: &str = "============================================";

#[derive(Debug, Default)]
struct Level {
    kinds: Vec<String>,
    attributes: Vec<&'static str>,
}

#[derive(Debug, Default)]
pub struct StructureCapture {
    levels: BTreeMap<usize, Level>,
}

impl StructureCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// One block per depth: the entity label with its kinds, then every
    /// attribute seen populated at that depth.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for (depth, level) in &self.levels {
            let _ = writeln!(out, "{}: {}", entity(*depth), level.kinds.join(", "));
            let _ = writeln!(out, "{}", RULE);
            for attribute in &level.attributes {
                let _ = writeln!(out, "--> {}", attribute);
            }
            let _ = writeln!(out, "{}", DOUBLE_RULE);
        }
        out
    }
}

impl TraversalObserver for StructureCapture {
    fn visit(&mut self, depth: usize, compound: &Compound) {
        let level = self.levels.entry(depth).or_default();
        let kind = compound.kind.as_str();
        if !level.kinds.iter().any(|k| k == kind) {
            level.kinds.push(kind.to_string());
        }
        for attribute in populated(compound) {
            if !level.attributes.contains(&attribute) {
                level.attributes.push(attribute);
            }
        }
    }
}

fn entity(depth: usize) -> &'static str {
    match depth {
        depth::SINGLE_FILE => "index",
        depth::NAMESPACE => "namespace",
        depth::CLASS => "class",
        depth::GROUP => "group",
        depth::PAGE => "page",
        _ => "compound",
    }
}

fn populated(compound: &Compound) -> Vec<&'static str> {
    let mut attributes = vec!["id", "name", "kind"];
    if compound.parent().is_some() {
        attributes.push("parent");
    }
    if !compound.title.is_empty() {
        attributes.push("title");
    }
    if !compound.brief.is_empty() {
        attributes.push("brief");
    }
    if !compound.detailed.is_empty() {
        attributes.push("detailed");
    }
    if compound.language.is_some() {
        attributes.push("language");
    }
    if compound.groupid.is_some() {
        attributes.push("groupid");
    }
    if !compound.compounds().is_empty() {
        attributes.push("compounds");
    }
    if !compound.members().is_empty() {
        attributes.push("members");
    }
    if !compound.base_refs().is_empty() {
        attributes.push("basecompoundref");
    }
    if compound.filtered().is_some() {
        attributes.push("filtered");
    }
    attributes
}
