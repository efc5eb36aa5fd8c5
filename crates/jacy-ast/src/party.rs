//! The compilation-unit root.

use jacy_span::FileId;

use crate::item::Item;
use crate::node_id::{NodeId, PR};

/// Items of one parsed file.
#[derive(Clone, Debug)]
pub struct FileItems {
    pub file: FileId,
    pub items: Vec<PR<Item>>,
}

/// The root of the AST for one crate: the per-file item lists plus
/// how many node ids the parser issued (unique across the party).
#[derive(Clone, Debug)]
pub struct Party {
    pub id: NodeId,
    pub files: Vec<FileItems>,
    /// Number of node ids issued while parsing, the root included.
    pub node_count: u32,
}

impl Party {
    pub fn new(files: Vec<FileItems>, node_count: u32) -> Self {
        Self {
            id: NodeId::ROOT,
            files,
            node_count,
        }
    }

    /// All items of all files in file order.
    pub fn items(&self) -> impl Iterator<Item = &PR<Item>> {
        self.files.iter().flat_map(|file| file.items.iter())
    }
}
