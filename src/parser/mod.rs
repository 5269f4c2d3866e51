//! Reads a Doxygen XML output directory into a [`Tree`].

pub mod doxygen;
pub mod markup;
pub mod xml;

use crate::error::{Error, Result};
use crate::tree::Tree;
use doxygen::CompoundDef;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load `dir/index.xml` and every compound file it lists.
///
/// Compound files that are missing are skipped with a warning.
pub fn load(dir: &Path) -> Result<Tree> {
    let index = read_xml(&dir.join("index.xml"))?;

    let mut defs: Vec<CompoundDef> = Vec::new();
    for entry in index.children_named("compound") {
        let Some(refid) = entry.attr("refid") else {
            continue;
        };
        let path = dir.join(format!("{}.xml", refid));
        if !path.is_file() {
            warn!("skipping {}: {} not found", refid, path.display());
            continue;
        }

        let doc = read_xml(&path)?;
        for def in doc.children_named("compounddef") {
            defs.push(CompoundDef::parse(def));
        }
    }

    debug!("loaded {} compound definitions from {}", defs.len(), dir.display());
    Ok(doxygen::build_tree(&defs))
}

fn read_xml(path: &Path) -> Result<xml::Element> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    xml::parse(&source).map_err(|source| Error::Xml {
        path: path.to_path_buf(),
        source,
    })
}
