//! Identity table between the canvas engine's reserved root key and the
//! persisted id of a page's root block.
//!
//! Load maps record ids to node keys, Save maps node keys back to record ids.
//! Both directions go through this table so the two transforms stay inverses.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootAlias {
    reserved_key: String,
    root_block_id: String,
}

impl RootAlias {
    pub fn new(reserved_key: impl Into<String>, root_block_id: impl Into<String>) -> Self {
        Self {
            reserved_key: reserved_key.into(),
            root_block_id: root_block_id.into(),
        }
    }

    pub fn reserved_key(&self) -> &str {
        &self.reserved_key
    }

    pub fn root_block_id(&self) -> &str {
        &self.root_block_id
    }

    /// True when the persisted root id already is the reserved key.
    pub fn is_identity(&self) -> bool {
        self.reserved_key == self.root_block_id
    }

    /// Record id -> node key.
    pub fn node_key<'a>(&'a self, block_id: &'a str) -> &'a str {
        if block_id == self.root_block_id {
            &self.reserved_key
        } else {
            block_id
        }
    }

    /// Node key -> record id.
    pub fn block_id<'a>(&'a self, node_key: &'a str) -> &'a str {
        if node_key == self.reserved_key {
            &self.root_block_id
        } else {
            node_key
        }
    }
}
