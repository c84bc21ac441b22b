//! # Load: flat block records -> editor node graph
//!
//! Pre-order descent from the page root through the child index. Every record
//! becomes one node keyed by its id, except the root which is keyed by the
//! reserved root key so the canvas engine can address it uniformly. The
//! original root id and type are kept in the root node's `custom` bag.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::child_index::ChildIndex;
use crate::config::BridgeConfig;
use crate::model::{
    text_mirror, BlockProps, BlockRecord, EditorNode, EditorNodeGraph, NodeType,
    CUSTOM_ORIGINAL_BLOCK_TYPE, CUSTOM_ROOT_BLOCK_ID,
};
use crate::root_alias::RootAlias;

/// Builds the editor node graph for one page rooted at `root_id`.
///
/// A missing root yields a graph holding only an empty synthetic root.
pub fn blocks_to_serialized_nodes(
    records: &[BlockRecord],
    root_id: &str,
    config: &BridgeConfig,
) -> EditorNodeGraph {
    let root = match records.iter().find(|r| !r.archived && r.id == root_id) {
        Some(root) => root,
        None => {
            debug!(root_id, records = records.len(), "root block not found, using empty root");
            return empty_root_graph(config);
        }
    };

    let index = ChildIndex::build(records);
    let alias = RootAlias::new(config.root_key.as_str(), root_id);
    let (graph, materialized) = materialize(root, &index, &alias, config);

    let unreachable = index.len().saturating_sub(materialized);
    if unreachable > 0 {
        debug!(root_id, unreachable, "records not reachable from page root were skipped");
    }

    graph
}

/// The graph a page renders when its declared root record is gone.
pub fn empty_root_graph(config: &BridgeConfig) -> EditorNodeGraph {
    let block_type = config.fallback_root_type.clone();
    let mut graph = EditorNodeGraph::new();
    graph.insert(
        config.root_key.clone(),
        EditorNode {
            node_type: NodeType {
                resolved_name: config.node_resolver.clone(),
            },
            is_canvas: true,
            props: BlockProps {
                block_type: block_type.clone(),
                name: block_type.clone(),
                ..BlockProps::default()
            },
            display_name: block_type,
            parent: None,
            nodes: Vec::new(),
            linked_nodes: IndexMap::new(),
            hidden: false,
            custom: Map::new(),
        },
    );
    graph
}

/// Pre-order walk with an explicit stack, so tree depth never grows the call
/// stack. A record is claimed when its parent is materialized; a second claim
/// on the same id (cycle or duplicate id) drops that edge. Returns the graph
/// and the number of records claimed.
fn materialize<'a>(
    root: &'a BlockRecord,
    index: &'a ChildIndex<'a>,
    alias: &RootAlias,
    config: &BridgeConfig,
) -> (EditorNodeGraph, usize) {
    let mut graph = EditorNodeGraph::new();
    let mut claimed: HashSet<&'a str> = HashSet::new();
    claimed.insert(root.id.as_str());

    let mut stack: Vec<(&'a BlockRecord, Option<String>)> = vec![(root, None)];
    while let Some((record, parent_key)) = stack.pop() {
        let key = alias.node_key(&record.id).to_string();
        let is_root = parent_key.is_none();
        let mut node = node_from_record(record, parent_key, config);
        if is_root && !alias.is_identity() {
            node.custom.insert(
                CUSTOM_ROOT_BLOCK_ID.to_string(),
                Value::String(record.id.clone()),
            );
            node.custom.insert(
                CUSTOM_ORIGINAL_BLOCK_TYPE.to_string(),
                Value::String(record.block_type.clone()),
            );
        }

        let mut children = Vec::new();
        for &child in index.children_of(&record.id) {
            if !claimed.insert(child.id.as_str()) {
                warn!(
                    parent = %record.id,
                    child = %child.id,
                    "block already materialized, dropping repeated edge"
                );
                continue;
            }
            node.nodes.push(child.id.clone());
            children.push(child);
        }

        // reversed so the first sibling is popped first
        for child in children.into_iter().rev() {
            stack.push((child, Some(key.clone())));
        }
        graph.insert(key, node);
    }

    (graph, claimed.len())
}

fn node_from_record(record: &BlockRecord, parent: Option<String>, config: &BridgeConfig) -> EditorNode {
    let name = record.display_name().to_string();
    let text = text_mirror(&record.properties);

    EditorNode {
        node_type: NodeType {
            resolved_name: config.node_resolver.clone(),
        },
        is_canvas: config.is_container(&record.block_type),
        props: BlockProps {
            block_type: record.block_type.clone(),
            name: name.clone(),
            block_id: Some(record.id.clone()),
            styles: record.styles.clone(),
            responsive_styles: record.responsive_styles.clone(),
            properties: record.properties.clone(),
            bindings: record.bindings.clone(),
            event_handlers: record.event_handlers.clone(),
            classes: record.classes.clone(),
            component_id: record.component_id.clone(),
            slot: record.slot.clone(),
            text,
        },
        display_name: name,
        parent,
        nodes: Vec::new(),
        linked_nodes: IndexMap::new(),
        hidden: false,
        custom: Map::new(),
    }
}
