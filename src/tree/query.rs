//! Depth-first flattening of the compound tree.

use super::{NodeId, Tree};

impl Tree {
    /// Every descendant compound of `node`, pre-order, optionally restricted
    /// to one kind. The kind only decides inclusion: subtrees of
    /// non-matching compounds are still searched.
    pub fn collect_by_kind(&self, node: NodeId, kind: Option<&str>) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(node, kind, &mut out);
        out
    }

    fn walk(&self, node: NodeId, kind: Option<&str>, out: &mut Vec<NodeId>) {
        for &child in self.node(node).compounds() {
            if kind.map_or(true, |k| self.node(child).kind.as_str() == k) {
                out.push(child);
            }
            self.walk(child, kind, out);
        }
    }

    /// Pre-order flattening of the filtered view below `node`. Empty until
    /// [`Tree::filter_children`] has run over the subtree.
    pub fn collect_filtered(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk_filtered(node, &mut out);
        out
    }

    fn walk_filtered(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(filtered) = self.node(node).filtered() else {
            return;
        };
        for &child in &filtered.compounds {
            out.push(child);
            self.walk_filtered(child, out);
        }
    }
}
