use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::BridgeError;

/// Node key the canvas engine hardcodes for a page root. Never persisted.
pub const DEFAULT_ROOT_KEY: &str = "ROOT";

/// Resolved name of the single generic block renderer.
pub const DEFAULT_NODE_RESOLVER: &str = "Block";

/// Block type given to the synthetic root when a page's root record is missing.
pub const DEFAULT_FALLBACK_ROOT_TYPE: &str = "container";

lazy_static::lazy_static! {
    /// Block types that may hold children in the editor.
    pub static ref DEFAULT_CONTAINER_TYPES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("container");
        s.insert("section");
        s.insert("row");
        s.insert("column");
        s.insert("grid");
        s.insert("flex");
        s.insert("stack");
        s.insert("card");
        s.insert("form");
        s.insert("list");
        s.insert("modal");
        s.insert("tabs");
        s.insert("page");
        s
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    pub container_types: HashSet<String>,
    pub root_key: String,
    pub node_resolver: String,
    pub fallback_root_type: String,
    /// First `order` value handed out by Save.
    pub order_start: i64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            container_types: DEFAULT_CONTAINER_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            root_key: DEFAULT_ROOT_KEY.to_string(),
            node_resolver: DEFAULT_NODE_RESOLVER.to_string(),
            fallback_root_type: DEFAULT_FALLBACK_ROOT_TYPE.to_string(),
            order_start: 0,
        }
    }
}

impl BridgeConfig {
    /// Parses a (possibly partial) config document; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        let config: BridgeConfig = serde_json::from_str(text)
            .map_err(|e| BridgeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `None` or blank text means the default config.
    pub fn from_optional_json(text: Option<&str>) -> Result<Self, BridgeError> {
        match text {
            Some(t) if !t.trim().is_empty() => Self::from_json(t),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.root_key.is_empty() {
            return Err(BridgeError::InvalidConfig(
                "rootKey must not be empty".to_string(),
            ));
        }
        if self.node_resolver.is_empty() {
            return Err(BridgeError::InvalidConfig(
                "nodeResolver must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_container_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.container_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_container(&self, block_type: &str) -> bool {
        self.container_types.contains(block_type)
    }
}
