//! Category filtering: decides which members and child compounds survive
//! into the rendered output, and in which order.

use super::{Compound, Filtered, NodeId, Tree};
use crate::config::Filters;
use crate::model::{Kind, Member};
use std::collections::HashMap;
use tracing::debug;

/// An item that can be bucketed by category.
pub trait Categorized {
    /// Bucket key: `section` for members, `kind` for compounds.
    fn category(&self) -> &str;
    fn groupid(&self) -> Option<&str>;
    fn label(&self) -> &str;
    /// Namespaces whose filtered view is empty (or not computed) carry
    /// nothing to render.
    fn is_empty_namespace(&self) -> bool {
        false
    }
}

impl Categorized for Member {
    fn category(&self) -> &str {
        &self.section
    }

    fn groupid(&self) -> Option<&str> {
        self.groupid.as_deref()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Categorized for Compound {
    fn category(&self) -> &str {
        self.kind.as_str()
    }

    fn groupid(&self) -> Option<&str> {
        self.groupid.as_deref()
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn is_empty_namespace(&self) -> bool {
        self.kind == Kind::Namespace && self.filtered().map_or(true, Filtered::is_empty)
    }
}

/// Bucket `collection` by category and concatenate the buckets in `order`.
///
/// Categories missing from `order` are dropped. Empty namespaces are
/// skipped, and with `groupid` set only items tagged with exactly that group
/// survive. Items keep their relative order inside a bucket. Returns the keys
/// of the surviving items.
pub fn filter<'a, K, T>(
    collection: impl IntoIterator<Item = (K, &'a T)>,
    order: &[String],
    groupid: Option<&str>,
) -> Vec<K>
where
    K: Copy,
    T: Categorized + 'a,
{
    let mut buckets: HashMap<&'a str, Vec<K>> = HashMap::new();

    for (key, item) in collection {
        if item.is_empty_namespace() {
            debug!("skip empty namespace: {}", item.label());
            continue;
        }
        if let Some(group) = groupid {
            if item.groupid() != Some(group) {
                debug!(
                    "skip item from foreign group: {} (group {:?}, wanted {})",
                    item.label(),
                    item.groupid(),
                    group
                );
                continue;
            }
        }
        buckets.entry(item.category()).or_default().push(key);
    }

    order
        .iter()
        .flat_map(|category| buckets.get(category.as_str()).into_iter().flatten().copied())
        .collect()
}

impl Tree {
    /// Recompute the filtered view of `node` and of every compound below it.
    ///
    /// Children are filtered before their parents so that the empty
    /// namespace rule always sees the current pass's result. Each call
    /// overwrites whatever an earlier pass (possibly with another group)
    /// left behind.
    pub fn filter_children(&mut self, node: NodeId, filters: &Filters, groupid: Option<&str>) {
        // Reversed pre-order puts every descendant ahead of its ancestors.
        let mut order = self.collect_by_kind(node, None);
        order.reverse();
        order.push(node);

        for id in order {
            let compound = self.node(id);
            let members = filter(
                compound.members().iter().enumerate(),
                &filters.members,
                groupid,
            );
            let compounds = filter(
                compound.compounds().iter().map(|&child| (child, self.node(child))),
                &filters.compounds,
                groupid,
            );
            self.set_filtered(id, Filtered { members, compounds });
        }
    }
}
