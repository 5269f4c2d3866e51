//! Output paths, cross-reference resolution and file writing.

use crate::anchor;
use crate::config::Options;
use crate::error::{Error, Result};
use crate::model::Kind;
use crate::orchestrator::OutputUnit;
use crate::tree::{Compound, NodeId, Tree};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Path of the document holding `compound`.
///
/// Pages go next to the output template as `page-<name>.<ext>`; in split
/// modes `%s` is replaced with the group or namespace name.
pub fn compound_path(compound: &Compound, options: &Options, template: &str, ext: &str) -> PathBuf {
    if compound.kind == Kind::Page {
        let dir = Path::new(template).parent().unwrap_or_else(|| Path::new(""));
        return dir.join(format!("page-{}.{}", compound.name, ext));
    }
    if options.groups {
        return PathBuf::from(template.replace("%s", &compound.name));
    }
    if options.classes {
        return PathBuf::from(template.replace("%s", &file_stem_for(&compound.name)));
    }
    PathBuf::from(template)
}

/// `geo::Vec<T>` → `geo--Vec(T)`
fn file_stem_for(name: &str) -> String {
    name.replace(':', "-").replace('<', "(").replace('>', ")")
}

/// Maps every rendered compound to the file it lands in, and turns
/// `{#ref id #}` placeholders into links relative to the current file.
pub struct Locator<'a> {
    tree: &'a Tree,
    homes: HashMap<NodeId, &'a Path>,
}

impl<'a> Locator<'a> {
    pub fn new(tree: &'a Tree, units: &'a [OutputUnit]) -> Self {
        let mut homes = HashMap::new();
        for unit in units {
            for &node in &unit.nodes {
                homes.entry(node).or_insert(unit.path.as_path());
            }
        }
        Self { tree, homes }
    }

    /// Link target for `refid` as seen from the file at `current`. Members
    /// and compounds that are not rendered themselves resolve to the file of
    /// their nearest rendered ancestor.
    pub fn target(&self, refid: &str, current: &Path) -> String {
        let mut node = self.tree.owner_of(refid);
        while let Some(id) = node {
            if let Some(home) = self.homes.get(&id) {
                if *home == current {
                    break;
                }
                let file = home
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return format!("{}#{}", file, refid);
            }
            node = self.tree.node(id).parent();
        }
        format!("#{}", refid)
    }

    pub fn resolve(&self, text: &str, current: &Path) -> String {
        anchor::resolve_refs(text, |refid| self.target(refid, current))
    }
}

/// Write one finished document, creating its directory when needed.
pub fn write_unit(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))?;
    info!("wrote {}", path.display());
    Ok(())
}
