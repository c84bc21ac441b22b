//! Page selection over a project-wide record collection, and multi-page
//! Load/Save batches.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::child_index::ChildIndex;
use crate::config::BridgeConfig;
use crate::load::blocks_to_serialized_nodes;
use crate::model::{BlockRecord, EditorNodeGraph};
use crate::save::flatten_graph;

/// The live root record of a page. Only a page's root carries `page_id`.
pub fn find_page_root<'a>(records: &'a [BlockRecord], page_id: &str) -> Option<&'a BlockRecord> {
    records
        .iter()
        .find(|r| !r.archived && r.page_id.as_deref() == Some(page_id))
}

/// Non-archived records of the tree under `root_id`, root first, in
/// pre-order. Empty when the root is missing.
pub fn collect_page_blocks(records: &[BlockRecord], root_id: &str) -> Vec<BlockRecord> {
    let root = match records.iter().find(|r| !r.archived && r.id == root_id) {
        Some(root) => root,
        None => return Vec::new(),
    };

    let index = ChildIndex::build(records);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(record) = stack.pop() {
        if !seen.insert(record.id.as_str()) {
            continue;
        }
        out.push(record.clone());
        // reversed so the first sibling is popped first
        for &child in index.children_of(&record.id).iter().rev() {
            stack.push(child);
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLoad {
    pub root_id: String,
    pub blocks: Vec<BlockRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSave {
    pub page_id: String,
    pub root_block_id: String,
    pub nodes: EditorNodeGraph,
}

/// Loads every page independently; results are in input order.
pub fn load_pages(pages: &[PageLoad], config: &BridgeConfig) -> Vec<EditorNodeGraph> {
    debug!(pages = pages.len(), "loading page batch");
    pages
        .par_iter()
        .map(|page| blocks_to_serialized_nodes(&page.blocks, &page.root_id, config))
        .collect()
}

/// Saves every page independently; results are in input order.
pub fn save_pages(pages: &[PageSave], config: &BridgeConfig) -> Vec<Vec<BlockRecord>> {
    debug!(pages = pages.len(), "saving page batch");
    pages
        .par_iter()
        .map(|page| flatten_graph(&page.nodes, &page.page_id, &page.root_block_id, config))
        .collect()
}
