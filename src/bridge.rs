//! Node-API entry points for the editor host.
//!
//! Block lists and node graphs cross the boundary as JSON. Each call takes an
//! optional config document; blank or missing means defaults.

use napi_derive::napi;

use crate::config::BridgeConfig;
use crate::digest::page_digest;
use crate::error::BridgeError;
use crate::load::blocks_to_serialized_nodes;
use crate::model::{BlockRecord, EditorNodeGraph};
use crate::save::{flatten_graph, serialized_nodes_to_blocks};

#[napi]
pub fn bridge_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Block records JSON -> serialized node graph JSON.
#[napi]
pub fn blocks_to_serialized_nodes_native(
    blocks_json: String,
    root_id: String,
    config_json: Option<String>,
) -> napi::Result<String> {
    let config = BridgeConfig::from_optional_json(config_json.as_deref())?;
    let blocks = BlockRecord::list_from_json_str(&blocks_json)?;
    let graph = blocks_to_serialized_nodes(&blocks, &root_id, &config);
    Ok(graph.to_json_string()?)
}

/// Serialized node graph JSON -> block records JSON.
#[napi]
pub fn serialized_nodes_to_blocks_native(
    nodes_json: String,
    page_id: String,
    root_block_id: String,
    config_json: Option<String>,
) -> napi::Result<String> {
    let config = BridgeConfig::from_optional_json(config_json.as_deref())?;
    let records = serialized_nodes_to_blocks(&nodes_json, &page_id, &root_block_id, &config)?;
    Ok(serde_json::to_string(&records).map_err(BridgeError::Serialize)?)
}

/// Same as `serialized_nodes_to_blocks_native` for a graph the host already
/// holds as an object.
#[napi]
pub fn serialized_value_to_blocks_native(
    nodes: serde_json::Value,
    page_id: String,
    root_block_id: String,
    config_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let config = BridgeConfig::from_optional_json(config_json.as_deref())?;
    let graph = EditorNodeGraph::from_value(nodes)?;
    let records = flatten_graph(&graph, &page_id, &root_block_id, &config);
    Ok(serde_json::to_value(records).map_err(BridgeError::Serialize)?)
}

#[napi]
pub fn page_digest_native(blocks_json: String) -> napi::Result<String> {
    let blocks = BlockRecord::list_from_json_str(&blocks_json)?;
    Ok(page_digest(&blocks)?)
}
