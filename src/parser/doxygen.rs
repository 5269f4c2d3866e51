//! Doxygen XML output → compound tree.

use super::markup::description;
use super::xml::Element;
use crate::model::{BaseRef, EnumValue, Kind, Member, Param};
use crate::tree::{NodeId, Tree};
use std::collections::{HashMap, HashSet};

/// One `<compounddef>`, flattened.
#[derive(Debug, Clone, Default)]
pub struct CompoundDef {
    pub id: String,
    pub kind: Option<Kind>,
    pub name: String,
    pub title: String,
    pub language: Option<String>,
    pub brief: String,
    pub detailed: String,
    pub bases: Vec<BaseRef>,
    /// `(element name, refid)` of every `inner*` reference, in file order.
    pub inner: Vec<(String, String)>,
    pub members: Vec<Member>,
}

impl CompoundDef {
    pub fn parse(el: &Element) -> Self {
        let bases = el
            .children_named("basecompoundref")
            .map(|base| BaseRef {
                refid: base.attr("refid").map(str::to_string),
                name: base.text().trim().to_string(),
                prot: base.attr("prot").unwrap_or("public").to_string(),
                virt: base.attr("virt").unwrap_or("non-virtual").to_string(),
            })
            .collect();

        let inner = el
            .elements()
            .filter(|child| child.name.starts_with("inner"))
            .filter_map(|child| Some((child.name.clone(), child.attr("refid")?.to_string())))
            .collect();

        let members = el
            .children_named("sectiondef")
            .flat_map(|section| {
                let kind = section.attr("kind").unwrap_or("").to_string();
                section
                    .children_named("memberdef")
                    .map(move |def| parse_member(def, &kind))
            })
            .collect();

        Self {
            id: el.attr("id").unwrap_or("").to_string(),
            kind: el.attr("kind").map(Kind::from),
            name: el.child_text("compoundname"),
            title: el.child_text("title"),
            language: el.attr("language").map(str::to_string),
            brief: description(el.child("briefdescription")),
            detailed: description(el.child("detaileddescription")),
            bases,
            inner,
            members,
        }
    }

    fn is(&self, kind: &Kind) -> bool {
        self.kind.as_ref() == Some(kind)
    }

    /// Whether referencing a compound through `tag` makes it a child of
    /// `self`.
    fn claims(&self, tag: &str) -> bool {
        match tag {
            "innerclass" | "innernamespace" => self.kind.as_ref().is_some_and(Kind::is_scope),
            "innergroup" => self.is(&Kind::Group),
            "innerpage" => self.is(&Kind::Page),
            _ => false,
        }
    }
}

fn parse_member(el: &Element, section: &str) -> Member {
    let params = el
        .children_named("param")
        .map(|param| {
            let name = match param.child_text("declname") {
                name if name.is_empty() => param.child_text("defname"),
                name => name,
            };
            Param {
                ty: param.child_text("type"),
                name,
                default: param.child_text("defval"),
            }
        })
        .collect();

    let enum_values = el
        .children_named("enumvalue")
        .map(|value| EnumValue {
            id: value.attr("id").unwrap_or("").to_string(),
            name: value.child_text("name"),
            initializer: value.child_text("initializer"),
            brief: description(value.child("briefdescription")),
        })
        .collect();

    Member {
        id: el.attr("id").unwrap_or("").to_string(),
        name: el.child_text("name"),
        kind: el.attr("kind").unwrap_or("").to_string(),
        section: section.to_string(),
        groupid: None,
        prot: el.attr("prot").unwrap_or("").to_string(),
        is_static: el.attr("static") == Some("yes"),
        ty: el.child_text("type"),
        args: el.child_text("argsstring"),
        initializer: el.child_text("initializer"),
        brief: description(el.child("briefdescription")),
        detailed: description(el.child("detaileddescription")),
        params,
        enum_values,
    }
}

/// Assemble the tree from parsed compound definitions.
///
/// Namespaces and classes own what they reference through
/// `innernamespace`/`innerclass`, groups own their subgroups and pages their
/// subpages. Groups only tag the compounds and members they list; a tagged
/// compound stays where its scope (or the root) puts it. Everything else
/// hangs off the root.
pub fn build_tree(defs: &[CompoundDef]) -> Tree {
    Builder::new(defs).build()
}

struct Builder<'a> {
    defs: &'a [CompoundDef],
    by_id: HashMap<&'a str, usize>,
    parent: HashMap<&'a str, &'a str>,
    children: HashMap<&'a str, Vec<&'a str>>,
    compound_groups: HashMap<&'a str, &'a str>,
    member_groups: HashMap<&'a str, &'a str>,
    created: HashSet<&'a str>,
    tree: Tree,
}

impl<'a> Builder<'a> {
    fn new(defs: &'a [CompoundDef]) -> Self {
        let by_id = defs
            .iter()
            .enumerate()
            .map(|(i, def)| (def.id.as_str(), i))
            .collect();
        Self {
            defs,
            by_id,
            parent: HashMap::new(),
            children: HashMap::new(),
            compound_groups: HashMap::new(),
            member_groups: HashMap::new(),
            created: HashSet::new(),
            tree: Tree::new(),
        }
    }

    fn build(mut self) -> Tree {
        let defs = self.defs;

        for def in defs {
            for (tag, refid) in &def.inner {
                if def.claims(tag) {
                    self.claim(def, refid);
                }
            }
        }

        for def in defs.iter().filter(|def| def.is(&Kind::Group)) {
            for (tag, refid) in &def.inner {
                if tag == "innerclass" || tag == "innernamespace" {
                    self.compound_groups
                        .entry(refid.as_str())
                        .or_insert(def.id.as_str());
                }
            }
            for member in &def.members {
                self.member_groups
                    .entry(member.id.as_str())
                    .or_insert(def.id.as_str());
            }
        }

        let root = self.tree.root();
        for (i, def) in defs.iter().enumerate() {
            if !self.parent.contains_key(def.id.as_str()) {
                self.attach(root, i);
            }
        }
        // whatever sits on a reference cycle is still reachable from the root
        for i in 0..defs.len() {
            self.attach(root, i);
        }

        self.tree
    }

    fn claim(&mut self, owner: &'a CompoundDef, refid: &'a str) {
        if refid == owner.id || !self.by_id.contains_key(refid) || self.parent.contains_key(refid) {
            return;
        }
        self.parent.insert(refid, owner.id.as_str());
        self.children
            .entry(owner.id.as_str())
            .or_default()
            .push(refid);
    }

    fn attach(&mut self, parent: NodeId, index: usize) {
        let defs = self.defs;
        let def = &defs[index];
        if !self.created.insert(def.id.as_str()) {
            return;
        }
        let Some(node) = self.tree.find(parent, &def.id, &def.name, true) else {
            return;
        };

        let compound = self.tree.node_mut(node);
        compound.kind = def.kind.clone().unwrap_or(Kind::Other(String::new()));
        compound.title = def.title.clone();
        compound.brief = def.brief.clone();
        compound.detailed = def.detailed.clone();
        compound.language = def.language.clone();
        compound.groupid = self.compound_groups.get(def.id.as_str()).map(|g| g.to_string());

        for base in &def.bases {
            self.tree.add_base_ref(node, base.clone());
        }

        let own_group = def.is(&Kind::Group).then_some(def.id.as_str());
        for member in &def.members {
            let mut member = member.clone();
            member.groupid = own_group
                .or_else(|| self.member_groups.get(member.id.as_str()).copied())
                .map(str::to_string);
            self.tree.add_member(node, member);
        }

        let children = self.children.get(def.id.as_str()).cloned().unwrap_or_default();
        for child in children {
            if let Some(&i) = self.by_id.get(child) {
                self.attach(node, i);
            }
        }
    }
}
