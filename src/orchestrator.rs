//! Decides which compounds land in which output file.
//!
//! A run goes through three steps: the tree is filtered for each output
//! unit, every unit is rendered, and cross references are resolved once
//! all file locations are known.

use crate::config::Options;
use crate::error::{Error, Result};
use crate::model::Kind;
use crate::output::{self, Locator};
use crate::render::{self, RenderOptions, Renderer};
use crate::tree::{filter, Compound, NodeId, Tree};
use std::path::PathBuf;
use tracing::{debug, info};

/// Traversal depths reported to a [`TraversalObserver`].
pub mod depth {
    pub const SINGLE_FILE: usize = 0;
    pub const NAMESPACE: usize = 1;
    pub const CLASS: usize = 2;
    pub const GROUP: usize = 3;
    pub const PAGE: usize = 4;
}

/// One output document: where it goes and which compounds it holds, in
/// render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub path: PathBuf,
    pub nodes: Vec<NodeId>,
    /// Append the "Generated by" footer.
    pub footer: bool,
}

/// Notified of every compound the orchestrator emits, with the traversal
/// depth it was reached at.
pub trait TraversalObserver {
    fn visit(&mut self, depth: usize, compound: &Compound);
}

/// Filter pass a unit was planned under. Replayed before rendering so a
/// later unit's pass cannot leak into an earlier unit's view.
#[derive(Debug, Clone)]
struct Scope {
    nodes: Vec<NodeId>,
    groupid: Option<String>,
}

pub struct Orchestrator<'a> {
    options: &'a Options,
    renderer: Box<dyn Renderer>,
    observer: Option<&'a mut dyn TraversalObserver>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(options: &'a Options) -> Result<Self> {
        let render_options = RenderOptions {
            language: options.language.clone(),
            anchors: options.anchor_style(),
        };
        let renderer = render::create_renderer(&options.format, &render_options)?;
        Ok(Self {
            options,
            renderer,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: &'a mut dyn TraversalObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Filter the tree and lay out the output units for the configured mode.
    pub fn plan(&mut self, tree: &mut Tree) -> Result<Vec<OutputUnit>> {
        Ok(self
            .plan_scoped(tree)?
            .into_iter()
            .map(|(unit, _)| unit)
            .collect())
    }

    /// Plan, render and write every output unit. Returns the written paths.
    pub fn run(&mut self, tree: &mut Tree) -> Result<Vec<PathBuf>> {
        let planned = self.plan_scoped(tree)?;

        let mut documents = Vec::with_capacity(planned.len());
        for (unit, scope) in &planned {
            if let Some(scope) = scope {
                for &node in &scope.nodes {
                    tree.filter_children(node, &self.options.filters, scope.groupid.as_deref());
                }
            }
            documents.push(self.renderer.render_unit(tree, unit)?);
        }

        let units: Vec<OutputUnit> = planned.into_iter().map(|(unit, _)| unit).collect();
        let locator = Locator::new(tree, &units);
        let mut written = Vec::with_capacity(units.len());
        for (unit, document) in units.iter().zip(documents) {
            let contents = locator.resolve(&document, &unit.path);
            output::write_unit(&unit.path, &contents)?;
            written.push(unit.path.clone());
        }

        info!("wrote {} file(s)", written.len());
        Ok(written)
    }

    fn plan_scoped(&mut self, tree: &mut Tree) -> Result<Vec<(OutputUnit, Option<Scope>)>> {
        let ext = self.renderer.file_extension().to_string();
        let template = self.options.output_template(&ext)?;

        let mut units = if self.options.groups {
            self.plan_groups(tree, &template, &ext)?
        } else if self.options.classes {
            self.plan_classes(tree, &template, &ext)?
        } else {
            self.plan_single(tree, &template)
        };

        if self.options.pages {
            units.extend(self.plan_pages(tree, &template, &ext)?);
        }

        debug!("planned {} output unit(s)", units.len());
        Ok(units)
    }

    fn plan_groups(
        &mut self,
        tree: &mut Tree,
        template: &str,
        ext: &str,
    ) -> Result<Vec<(OutputUnit, Option<Scope>)>> {
        let groups = tree.collect_by_kind(tree.root(), Some(Kind::Group.as_str()));
        if groups.is_empty() {
            return Err(Error::NothingFound { what: "groups" });
        }

        let mut units = Vec::with_capacity(groups.len());
        for group in groups {
            self.observe(depth::GROUP, tree.node(group));
            let groupid = tree.node(group).id.clone();
            tree.filter_children(group, &self.options.filters, Some(&groupid));

            let mut nodes = vec![group];
            nodes.extend(tree.collect_filtered(group));

            // Tagged compounds stay under their scope owner; pull them in here.
            let tagged = tagged_outside(tree, group, &groupid);
            for &node in &tagged {
                tree.filter_children(node, &self.options.filters, Some(&groupid));
            }
            let kept = filter(
                tagged.iter().map(|&node| (node, tree.node(node))),
                &self.options.filters.compounds,
                Some(&groupid),
            );
            for node in kept {
                nodes.push(node);
                nodes.extend(tree.collect_filtered(node));
            }

            let path = output::compound_path(tree.node(group), self.options, template, ext);
            let mut scoped = vec![group];
            scoped.extend(tagged);
            units.push((
                OutputUnit {
                    path,
                    nodes,
                    footer: false,
                },
                Some(Scope {
                    nodes: scoped,
                    groupid: Some(groupid),
                }),
            ));
        }
        Ok(units)
    }

    fn plan_classes(
        &mut self,
        tree: &mut Tree,
        template: &str,
        ext: &str,
    ) -> Result<Vec<(OutputUnit, Option<Scope>)>> {
        let root = tree.root();
        let namespaces: Vec<NodeId> = tree
            .collect_by_kind(root, Some(Kind::Namespace.as_str()))
            .into_iter()
            .filter(|&ns| tree.node(ns).parent() == Some(root))
            .collect();
        if namespaces.is_empty() {
            return Err(Error::NothingFound { what: "classes" });
        }

        let mut units = Vec::with_capacity(namespaces.len());
        for ns in namespaces {
            self.observe(depth::NAMESPACE, tree.node(ns));
            tree.filter_children(ns, &self.options.filters, None);

            let mut nodes = vec![ns];
            nodes.extend(tree.collect_filtered(ns));
            for &node in &nodes[1..] {
                self.observe(depth::CLASS, tree.node(node));
            }
            let path = output::compound_path(tree.node(ns), self.options, template, ext);
            units.push((
                OutputUnit {
                    path,
                    nodes,
                    footer: false,
                },
                Some(Scope {
                    nodes: vec![ns],
                    groupid: None,
                }),
            ));
        }
        Ok(units)
    }

    fn plan_single(&mut self, tree: &mut Tree, template: &str) -> Vec<(OutputUnit, Option<Scope>)> {
        let root = tree.root();
        self.observe(depth::SINGLE_FILE, tree.node(root));
        tree.filter_children(root, &self.options.filters, None);

        let mut nodes = Vec::new();
        if !self.options.noindex {
            nodes.push(root);
        }
        nodes.extend(tree.collect_filtered(root));
        vec![(
            OutputUnit {
                path: PathBuf::from(template),
                nodes,
                footer: true,
            },
            Some(Scope {
                nodes: vec![root],
                groupid: None,
            }),
        )]
    }

    fn plan_pages(
        &mut self,
        tree: &Tree,
        template: &str,
        ext: &str,
    ) -> Result<Vec<(OutputUnit, Option<Scope>)>> {
        let pages = tree.collect_by_kind(tree.root(), Some(Kind::Page.as_str()));
        if pages.is_empty() {
            return Err(Error::NothingFound { what: "pages" });
        }

        let mut units = Vec::with_capacity(pages.len());
        for page in pages {
            self.observe(depth::PAGE, tree.node(page));
            let path = output::compound_path(tree.node(page), self.options, template, ext);
            units.push((
                OutputUnit {
                    path,
                    nodes: vec![page],
                    footer: false,
                },
                None,
            ));
        }
        Ok(units)
    }

    fn observe(&mut self, depth: usize, compound: &Compound) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.visit(depth, compound);
        }
    }
}

/// Compounds outside `group` tagged with `groupid`, pre-order, skipping any
/// whose ancestor is already tagged (it comes along with that ancestor).
fn tagged_outside(tree: &Tree, group: NodeId, groupid: &str) -> Vec<NodeId> {
    let tagged = |node: NodeId| tree.node(node).groupid.as_deref() == Some(groupid);
    tree.collect_by_kind(tree.root(), None)
        .into_iter()
        .filter(|&node| node != group && tagged(node))
        .filter(|&node| {
            let mut parent = tree.node(node).parent();
            while let Some(id) = parent {
                if id == group || tagged(id) {
                    return false;
                }
                parent = tree.node(id).parent();
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Member;
    use crate::parser::doxygen::{build_tree, CompoundDef};
    use crate::tree::testutil::{add, member};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        let ns = add(&mut tree, root, "ns", "namespace");
        tree.node_mut(ns).name = "geo".to_string();
        let class = add(&mut tree, ns, "ns_a", "class");
        tree.node_mut(class).name = "geo::A".to_string();
        member(&mut tree, class, "ns_a_1f", "public-func");
        let detail = add(&mut tree, ns, "ns_detail", "namespace");
        member(&mut tree, detail, "ns_detail_1v", "var");

        let group = add(&mut tree, root, "group__g", "group");
        tree.node_mut(group).name = "g".to_string();
        let grouped = add(&mut tree, group, "classC", "class");
        tree.node_mut(grouped).groupid = Some("group__g".to_string());
        let page = add(&mut tree, root, "intro", "page");
        tree.node_mut(page).name = "intro".to_string();
        tree
    }

    #[derive(Default)]
    struct Recorder(Vec<(usize, String)>);

    impl TraversalObserver for Recorder {
        fn visit(&mut self, depth: usize, compound: &Compound) {
            self.0.push((depth, compound.id.clone()));
        }
    }

    fn ids(tree: &Tree, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|&n| tree.node(n).id.clone()).collect()
    }

    #[test]
    fn single_file_holds_index_and_filtered_compounds() {
        let mut tree = sample();
        let options = Options::default();
        let units = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, PathBuf::from("api.md"));
        assert!(units[0].footer);
        assert_eq!(ids(&tree, &units[0].nodes), vec!["index", "ns", "ns_a"]);
    }

    #[test]
    fn noindex_leaves_the_root_out() {
        let mut tree = sample();
        let options = Options {
            noindex: true,
            ..Default::default()
        };
        let units = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap();
        assert_eq!(ids(&tree, &units[0].nodes), vec!["ns", "ns_a"]);
    }

    #[test]
    fn classes_mode_emits_one_unit_per_top_level_namespace() {
        let mut tree = sample();
        let options = Options {
            classes: true,
            ..Default::default()
        };
        let mut recorder = Recorder::default();
        let units = Orchestrator::new(&options)
            .unwrap()
            .with_observer(&mut recorder)
            .plan(&mut tree)
            .unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, PathBuf::from("api_geo.md"));
        assert_eq!(ids(&tree, &units[0].nodes), vec!["ns", "ns_a"]);
        assert_eq!(
            recorder.0,
            vec![
                (depth::NAMESPACE, "ns".to_string()),
                (depth::CLASS, "ns_a".to_string())
            ]
        );
    }

    #[test]
    fn groups_mode_scopes_by_group_id() {
        let mut tree = sample();
        let options = Options {
            groups: true,
            output: Some("out/%s.md".to_string()),
            ..Default::default()
        };
        let units = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, PathBuf::from("out/g.md"));
        assert_eq!(ids(&tree, &units[0].nodes), vec!["group__g", "classC"]);
    }

    #[test]
    fn pages_are_added_as_single_node_units() {
        let mut tree = sample();
        let options = Options {
            pages: true,
            ..Default::default()
        };
        let mut recorder = Recorder::default();
        let units = Orchestrator::new(&options)
            .unwrap()
            .with_observer(&mut recorder)
            .plan(&mut tree)
            .unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[1].path, PathBuf::from("page-intro.md"));
        assert_eq!(ids(&tree, &units[1].nodes), vec!["intro"]);
        assert_eq!(
            recorder.0,
            vec![
                (depth::SINGLE_FILE, "index".to_string()),
                (depth::PAGE, "intro".to_string())
            ]
        );
    }

    fn grouped_defs() -> Vec<CompoundDef> {
        let def = |id: &str, name: &str, kind: &str, inner: &[(&str, &str)]| CompoundDef {
            id: id.to_string(),
            kind: Some(Kind::from(kind)),
            name: name.to_string(),
            inner: inner
                .iter()
                .map(|(tag, refid)| (tag.to_string(), refid.to_string()))
                .collect(),
            ..Default::default()
        };
        let func = |id: &str, section: &str| Member {
            id: id.to_string(),
            name: id.to_string(),
            kind: "function".to_string(),
            section: section.to_string(),
            ..Default::default()
        };

        let mut geo = def("namespacegeo", "geo", "namespace", &[("innerclass", "classgeo_1_1a")]);
        geo.members.push(func("namespacegeo_1a1", "func"));
        let mut class = def("classgeo_1_1a", "geo::A", "class", &[]);
        class.members.push(func("classgeo_1_1a_1a1", "public-func"));
        let mut group = def(
            "group__g",
            "g",
            "group",
            &[("innernamespace", "namespacegeo"), ("innerclass", "classColor")],
        );
        group.members.push(func("namespacegeo_1a1", "func"));
        vec![geo, class, def("classColor", "Color", "class", &[]), group]
    }

    #[test]
    fn grouped_compounds_stay_in_single_file_output() {
        let mut tree = build_tree(&grouped_defs());
        let options = Options::default();
        let units = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap();
        assert_eq!(
            ids(&tree, &units[0].nodes),
            vec!["index", "namespacegeo", "classgeo_1_1a", "classColor"]
        );
    }

    #[test]
    fn grouped_namespace_is_still_a_top_level_namespace() {
        let mut tree = build_tree(&grouped_defs());
        let options = Options {
            classes: true,
            ..Default::default()
        };
        let units = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, PathBuf::from("api_geo.md"));
        assert_eq!(ids(&tree, &units[0].nodes), vec!["namespacegeo", "classgeo_1_1a"]);
    }

    #[test]
    fn groups_mode_pulls_in_tagged_compounds() {
        let mut tree = build_tree(&grouped_defs());
        let options = Options {
            groups: true,
            ..Default::default()
        };
        let units = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, PathBuf::from("api_g.md"));
        assert_eq!(
            ids(&tree, &units[0].nodes),
            vec!["group__g", "namespacegeo", "classColor"]
        );
    }

    #[test]
    fn split_mode_without_placeholder_fails() {
        let mut tree = sample();
        let options = Options {
            groups: true,
            output: Some("api.md".to_string()),
            ..Default::default()
        };
        let err = Orchestrator::new(&options).unwrap().plan(&mut tree).unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder { .. }));
    }

    #[test]
    fn modes_without_matching_compounds_fail() {
        let options = Options {
            groups: true,
            ..Default::default()
        };
        let err = Orchestrator::new(&options).unwrap().plan(&mut Tree::new()).unwrap_err();
        assert!(matches!(err, Error::NothingFound { what: "groups" }));

        let options = Options {
            classes: true,
            ..Default::default()
        };
        let err = Orchestrator::new(&options).unwrap().plan(&mut Tree::new()).unwrap_err();
        assert!(matches!(err, Error::NothingFound { what: "classes" }));

        let options = Options {
            pages: true,
            ..Default::default()
        };
        let err = Orchestrator::new(&options).unwrap().plan(&mut Tree::new()).unwrap_err();
        assert!(matches!(err, Error::NothingFound { what: "pages" }));
    }

    #[test]
    fn unknown_format_is_rejected_up_front() {
        let options = Options {
            format: "html".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Orchestrator::new(&options).err(),
            Some(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn run_writes_resolved_documents() {
        let dir = TempDir::new().unwrap();
        let mut tree = sample();
        let options = Options {
            classes: true,
            pages: true,
            output: Some(dir.path().join("api_%s.md").to_string_lossy().into_owned()),
            ..Default::default()
        };
        let written = Orchestrator::new(&options).unwrap().run(&mut tree).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("api_geo.md"), dir.path().join("page-intro.md")]
        );
        let geo = fs::read_to_string(dir.path().join("api_geo.md")).unwrap();
        assert!(geo.contains("(#ns_a)"));
        assert!(!geo.contains("{#ref"));
    }
}
