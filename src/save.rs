//! # Save: editor node graph -> flat block records
//!
//! Pre-order walk from the reserved root key over each node's `nodes` list.
//!
//! ## Invariants
//!
//! 1. **Root identity**: the reserved root key always resolves to the caller's
//!    `root_block_id`, both as a record id and as a parent id.
//! 2. **Global order**: `order` is one counter for the whole page, bumped once
//!    per emitted record. It is not reset per sibling group.
//! 3. **Structure from traversal**: `parent_id` is the resolved id of the node
//!    that listed the child, and `children` is regenerated from the same lists
//!    with the same resolution. A node listed
//!    under two parents is emitted twice.
//! 4. **Only the root carries `page_id`**.

use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::model::{
    text_mirror, BlockRecord, EditorNode, EditorNodeGraph, CUSTOM_ORIGINAL_BLOCK_TYPE,
    TEXT_PROPERTY,
};
use crate::root_alias::RootAlias;

/// Save input: an already materialized graph or its JSON text.
#[derive(Debug, Clone, Copy)]
pub enum NodesInput<'a> {
    Graph(&'a EditorNodeGraph),
    Text(&'a str),
}

impl<'a> From<&'a EditorNodeGraph> for NodesInput<'a> {
    fn from(graph: &'a EditorNodeGraph) -> Self {
        NodesInput::Graph(graph)
    }
}

impl<'a> From<&'a str> for NodesInput<'a> {
    fn from(text: &'a str) -> Self {
        NodesInput::Text(text)
    }
}

impl<'a> From<&'a String> for NodesInput<'a> {
    fn from(text: &'a String) -> Self {
        NodesInput::Text(text.as_str())
    }
}

/// Flattens a page's node graph into records ready for a bulk replace.
///
/// Text input that does not parse as a node graph is an error. A graph
/// without the reserved root key yields no records.
pub fn serialized_nodes_to_blocks<'a>(
    input: impl Into<NodesInput<'a>>,
    page_id: &str,
    root_block_id: &str,
    config: &BridgeConfig,
) -> Result<Vec<BlockRecord>, BridgeError> {
    match input.into() {
        NodesInput::Graph(graph) => Ok(flatten_graph(graph, page_id, root_block_id, config)),
        NodesInput::Text(text) => {
            let graph = EditorNodeGraph::from_json_str(text)?;
            Ok(flatten_graph(&graph, page_id, root_block_id, config))
        }
    }
}

pub fn flatten_graph(
    graph: &EditorNodeGraph,
    page_id: &str,
    root_block_id: &str,
    config: &BridgeConfig,
) -> Vec<BlockRecord> {
    let alias = RootAlias::new(config.root_key.as_str(), root_block_id);
    let root = match graph.get(alias.reserved_key()) {
        Some(root) => root,
        None => {
            debug!(page_id, nodes = graph.len(), "graph has no root node, nothing to save");
            return Vec::new();
        }
    };

    let mut flattener = Flattener {
        graph,
        alias: &alias,
        page_id,
        next_order: config.order_start,
        records: Vec::with_capacity(graph.len()),
    };
    flattener.walk(alias.reserved_key(), root);
    flattener.records
}

struct Frame<'a> {
    key: &'a str,
    node: &'a EditorNode,
    parent_id: Option<String>,
    depth: usize,
}

struct Flattener<'a> {
    graph: &'a EditorNodeGraph,
    alias: &'a RootAlias,
    page_id: &'a str,
    next_order: i64,
    records: Vec<BlockRecord>,
}

impl<'a> Flattener<'a> {
    /// Pre-order walk with an explicit stack. `path` holds the keys of the
    /// current node and its ancestors; a child already on it is a cycle.
    fn walk(&mut self, root_key: &'a str, root: &'a EditorNode) {
        let graph = self.graph;
        let mut path: Vec<&'a str> = Vec::new();
        let mut on_path: HashSet<&'a str> = HashSet::new();
        let mut stack = vec![Frame {
            key: root_key,
            node: root,
            parent_id: None,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            for left in path.drain(frame.depth..) {
                on_path.remove(left);
            }
            path.push(frame.key);
            on_path.insert(frame.key);

            let (key, node) = (frame.key, frame.node);
            let order = self.next_order;
            self.next_order += 1;

            let mut children = Vec::with_capacity(node.nodes.len());
            let mut descend = Vec::with_capacity(node.nodes.len());
            for child_key in &node.nodes {
                let child = match graph.get(child_key) {
                    Some(child) => child,
                    None => {
                        debug!(parent = key, child = %child_key, "skipping dangling child key");
                        continue;
                    }
                };
                if on_path.contains(child_key.as_str()) {
                    warn!(parent = key, child = %child_key, "child key is its own ancestor, not descending");
                    continue;
                }
                children.push(self.resolve_id(child_key, child));
                descend.push((child_key.as_str(), child));
            }

            let id = self.resolve_id(key, node);
            if key != self.alias.reserved_key() && id != key {
                debug!(key, id = %id, "node key differs from its blockId, children point at the blockId");
            }

            // reversed so the first sibling is popped first
            for (child_key, child) in descend.into_iter().rev() {
                stack.push(Frame {
                    key: child_key,
                    node: child,
                    parent_id: Some(id.clone()),
                    depth: frame.depth + 1,
                });
            }

            let record = record_from_node(node, id, frame.parent_id, order, self.page_id, children);
            self.records.push(record);
        }
    }

    /// Reserved key -> true root id; otherwise `props.blockId`, else the key.
    fn resolve_id(&self, key: &str, node: &EditorNode) -> String {
        if key == self.alias.reserved_key() {
            return self.alias.root_block_id().to_string();
        }
        match node.props.block_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => key.to_string(),
        }
    }
}

fn record_from_node(
    node: &EditorNode,
    id: String,
    parent_id: Option<String>,
    order: i64,
    page_id: &str,
    children: Vec<String>,
) -> BlockRecord {
    let props = &node.props;

    // Untouched mirrors leave the canonical value (and its JSON type) alone.
    let mut properties = props.properties.clone();
    if let Some(text) = &props.text {
        if text_mirror(&properties).as_deref() != Some(text.as_str()) {
            properties.insert(TEXT_PROPERTY.to_string(), Value::String(text.clone()));
        }
    }

    let block_type = if props.block_type.is_empty() {
        match node.custom.get(CUSTOM_ORIGINAL_BLOCK_TYPE) {
            Some(Value::String(original)) => original.clone(),
            _ => String::new(),
        }
    } else {
        props.block_type.clone()
    };
    let name = if props.name.is_empty() {
        block_type.clone()
    } else {
        props.name.clone()
    };

    BlockRecord {
        id,
        page_id: parent_id.is_none().then(|| page_id.to_string()),
        parent_id,
        block_type,
        name,
        order,
        properties,
        styles: props.styles.clone(),
        responsive_styles: props.responsive_styles.clone(),
        bindings: props.bindings.clone(),
        event_handlers: props.event_handlers.clone(),
        classes: props.classes.clone(),
        component_id: props.component_id.clone(),
        slot: props.slot.clone(),
        archived: false,
        children: Some(children),
    }
}
