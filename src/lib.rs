//! doxmark — render Doxygen XML output as Markdown.
//!
//! The pipeline is: [`parser::load`] reads a Doxygen XML directory into a
//! [`Tree`], the [`orchestrator`] filters the tree and lays out output
//! units, a [`render::Renderer`] turns each unit into a document, and
//! [`output`] resolves cross references and writes the files.

pub mod anchor;
pub mod capture;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod render;
pub mod tree;

pub use error::{Error, Result};
pub use tree::{Compound, Filtered, NodeId, Tree};
