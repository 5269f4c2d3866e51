//! The in-memory compound tree.
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by [`NodeId`].
//! Ownership flows parent → child only; the `parent` link is a plain id used
//! for lookups. The tree is built once by the parser and never shrinks.

mod filter;
mod query;

pub use filter::{filter, Categorized};

use crate::model::{BaseRef, Kind, Member};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Handle to a compound stored in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Post-filter view of a compound: indices into its `members` and ids of the
/// surviving child compounds, both in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    pub members: Vec<usize>,
    pub compounds: Vec<NodeId>,
}

impl Filtered {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.compounds.is_empty()
    }
}

/// One documentable entity: namespace, class, group, page, ...
#[derive(Debug, Clone)]
pub struct Compound {
    parent: Option<NodeId>,
    pub id: String,
    pub name: String,
    pub kind: Kind,
    pub title: String,
    pub brief: String,
    pub detailed: String,
    pub language: Option<String>,
    /// Group this compound was declared under, if any.
    pub groupid: Option<String>,
    compounds: Vec<NodeId>,
    index: HashMap<String, NodeId>,
    members: Vec<Member>,
    base_refs: Vec<BaseRef>,
    filtered: Option<Filtered>,
}

impl Compound {
    fn new(parent: Option<NodeId>, id: &str, name: &str) -> Self {
        Self {
            parent,
            id: id.to_string(),
            name: name.to_string(),
            kind: Kind::Other(String::new()),
            title: String::new(),
            brief: String::new(),
            detailed: String::new(),
            language: None,
            groupid: None,
            compounds: Vec::new(),
            index: HashMap::new(),
            members: Vec::new(),
            base_refs: Vec::new(),
            filtered: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children, in insertion order.
    pub fn compounds(&self) -> &[NodeId] {
        &self.compounds
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn base_refs(&self) -> &[BaseRef] {
        &self.base_refs
    }

    /// The last computed filtered view, `None` before any filter pass.
    pub fn filtered(&self) -> Option<&Filtered> {
        self.filtered.as_ref()
    }

    /// Members that survived the last filter pass, in category order.
    pub fn filtered_members(&self) -> impl Iterator<Item = &Member> {
        self.filtered
            .iter()
            .flat_map(|f| f.members.iter())
            .filter_map(|&i| self.members.get(i))
    }

    /// Title for pages and groups, falling back to the name.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// Arena holding every compound of one run, rooted at a synthetic `index`
/// compound.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Compound>,
    refs: HashMap<String, NodeId>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let mut root = Compound::new(None, "index", "index");
        root.kind = Kind::Index;
        let mut refs = HashMap::new();
        refs.insert(root.id.clone(), NodeId(0));
        Self {
            nodes: vec![root],
            refs,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing but the root has been added.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> &Compound {
        &self.nodes[id.0]
    }

    /// Mutable access to a compound's descriptive attributes. Containment
    /// is only changed through [`Tree::find`] and [`Tree::add_member`].
    pub fn node_mut(&mut self, id: NodeId) -> &mut Compound {
        &mut self.nodes[id.0]
    }

    /// Look up the child `id` of `parent`; create it when absent and
    /// `create` is set. Returns `None` when absent without `create`.
    pub fn find(&mut self, parent: NodeId, id: &str, name: &str, create: bool) -> Option<NodeId> {
        if let Some(found) = self.lookup(parent, id) {
            return Some(found);
        }
        if !create {
            return None;
        }

        let child = NodeId(self.nodes.len());
        self.nodes.push(Compound::new(Some(parent), id, name));
        let owner = &mut self.nodes[parent.0];
        owner.compounds.push(child);
        owner.index.insert(id.to_string(), child);
        self.refs.entry(id.to_string()).or_insert(child);
        Some(child)
    }

    /// Non-creating child lookup.
    pub fn lookup(&self, parent: NodeId, id: &str) -> Option<NodeId> {
        self.nodes[parent.0].index.get(id).copied()
    }

    /// Append a member and register its id. Groups repeat the members of
    /// the compounds they list, so the declaring compound wins over a group
    /// regardless of load order.
    pub fn add_member(&mut self, node: NodeId, member: Member) {
        let in_group = self.nodes[node.0].kind == Kind::Group;
        match self.refs.entry(member.id.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(node);
            }
            Entry::Occupied(mut entry) => {
                if !in_group && self.nodes[entry.get().0].kind == Kind::Group {
                    entry.insert(node);
                }
            }
        }
        self.nodes[node.0].members.push(member);
    }

    pub fn add_base_ref(&mut self, node: NodeId, base: BaseRef) {
        self.nodes[node.0].base_refs.push(base);
    }

    /// Compound owning the compound or member with the given Doxygen id.
    /// The first registration of an id wins.
    pub fn owner_of(&self, refid: &str) -> Option<NodeId> {
        self.refs.get(refid).copied()
    }

    fn set_filtered(&mut self, node: NodeId, filtered: Filtered) {
        self.nodes[node.0].filtered = Some(filtered);
    }
}
