//! # Block Bridge Ground Truth
//!
//! Converts a page between its two shapes:
//!
//! - **Block records**: the flat list the persistence layer stores, one record
//!   per visual element, structure carried by `parent_id` and sibling position
//!   by `order`.
//! - **Editor node graph**: the keyed map the nested canvas engine renders,
//!   structure carried by each node's `parent` and ordered `nodes` list.
//!
//! ## Invariants
//!
//! 1. **Root key**: the canvas addresses a page root only through the reserved
//!    root key (`ROOT`). Load keys the root node by it, Save maps it back to the
//!    persisted root id. The persisted root id never appears as a node key.
//!
//! 2. **Node identity**: every other node key is the id of the record it came
//!    from, and `props.blockId` repeats it.
//!
//! 3. **Sibling order**: Load sorts siblings ascending by `order` (stable on
//!    ties). Save numbers records with one page-wide counter in pre-order, so
//!    values only need to sort correctly within each parent.
//!
//! 4. **Text mirror**: `properties.text` is copied to `props.text` on Load and
//!    `props.text` is written back over `properties.text` on Save.
//!
//! 5. **Total functions**: a missing root on Load renders an empty root, a
//!    graph without the root key saves nothing, dangling child keys are
//!    skipped. Only unparsable input text is an error.

#[cfg(feature = "napi")]
mod bridge;
mod child_index;
mod config;
mod digest;
mod error;
mod load;
mod model;
mod page;
mod root_alias;
mod roundtrip;
mod save;

#[cfg(test)]
mod save_tests;

#[cfg(feature = "napi")]
pub use bridge::{
    blocks_to_serialized_nodes_native, bridge_version, page_digest_native,
    serialized_nodes_to_blocks_native, serialized_value_to_blocks_native,
};

pub use child_index::{ChildIndex, NO_PARENT};
pub use config::{
    BridgeConfig, DEFAULT_CONTAINER_TYPES, DEFAULT_FALLBACK_ROOT_TYPE, DEFAULT_NODE_RESOLVER,
    DEFAULT_ROOT_KEY,
};
pub use digest::{has_changes, page_digest};
pub use error::BridgeError;
pub use load::{blocks_to_serialized_nodes, empty_root_graph};
pub use model::*;
pub use page::{
    collect_page_blocks, find_page_root, load_pages, save_pages, PageLoad, PageSave,
};
pub use root_alias::RootAlias;
pub use roundtrip::{compare_pages, sibling_sequences, FieldMismatch, RoundTripReport};
pub use save::{flatten_graph, serialized_nodes_to_blocks, NodesInput};
