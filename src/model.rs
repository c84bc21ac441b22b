use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BridgeError;

// ═══════════════════════════════════════════════════════════════════════════════
// OPEN MAPPINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Free-form semantic payload of a block. Only `text` is interpreted here.
pub type PropertyMap = Map<String, Value>;

/// CSS-like property name -> scalar value.
pub type StyleMap = IndexMap<String, StyleValue>;

/// Breakpoint name -> style overrides for that breakpoint.
pub type ResponsiveStyles = IndexMap<String, StyleMap>;

/// Property name -> data-binding descriptor.
pub type BindingMap = IndexMap<String, DataBinding>;

/// Reserved key inside `properties` mirrored to `props.text` for inline editing.
pub const TEXT_PROPERTY: &str = "text";

/// Keys written into the root node's `custom` bag when the root is remapped.
pub const CUSTOM_ROOT_BLOCK_ID: &str = "rootBlockId";
pub const CUSTOM_ORIGINAL_BLOCK_TYPE: &str = "originalBlockType";

/// `props.text` view of a property bag: strings verbatim, other non-null
/// values as their JSON text.
pub fn text_mirror(properties: &PropertyMap) -> Option<String> {
    match properties.get(TEXT_PROPERTY)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value.into())
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        StyleValue::Number(value.into())
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBinding {
    #[serde(rename = "type")]
    pub binding_type: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandler {
    pub event: String,
    #[serde(alias = "logic_flow_id")]
    pub logic_flow_id: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCK RECORD (flat, persisted)
// ═══════════════════════════════════════════════════════════════════════════════

/// One visual element of a page as the persistence layer stores it.
///
/// Structure lives in `parent_id`; `children` is a derived convenience list and
/// is never read back as structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: String,
    #[serde(default, alias = "parent_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, alias = "page_id", skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, alias = "block_type")]
    pub block_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub styles: StyleMap,
    #[serde(default, alias = "responsive_styles")]
    pub responsive_styles: ResponsiveStyles,
    #[serde(default)]
    pub bindings: BindingMap,
    #[serde(default, alias = "event_handlers")]
    pub event_handlers: Vec<EventHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    #[serde(default, alias = "component_id", skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl BlockRecord {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            page_id: None,
            block_type: block_type.into(),
            name: String::new(),
            order: 0,
            properties: PropertyMap::new(),
            styles: StyleMap::new(),
            responsive_styles: ResponsiveStyles::new(),
            bindings: BindingMap::new(),
            event_handlers: Vec::new(),
            classes: None,
            component_id: None,
            slot: None,
            archived: false,
            children: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    /// Label shown in the outline: the name, or the block type when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.block_type
        } else {
            &self.name
        }
    }

    /// Parses a JSON array of records.
    pub fn list_from_json_str(text: &str) -> Result<Vec<BlockRecord>, BridgeError> {
        serde_json::from_str(text).map_err(BridgeError::Parse)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EDITOR NODE (nested, in-memory)
// ═══════════════════════════════════════════════════════════════════════════════

/// Renderer selector. Every node in this system uses the same generic block
/// renderer; the visual variation lives in `props.block_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeType {
    #[serde(default)]
    pub resolved_name: String,
}

/// Payload of an editor node: the non-structural fields of a block record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockProps {
    #[serde(default)]
    pub block_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default)]
    pub styles: StyleMap,
    #[serde(default)]
    pub responsive_styles: ResponsiveStyles,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub bindings: BindingMap,
    #[serde(default)]
    pub event_handlers: Vec<EventHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    /// Mirror of `properties.text`; written back on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorNode {
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub is_canvas: bool,
    #[serde(default)]
    pub props: BlockProps,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub linked_nodes: IndexMap<String, String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub custom: Map<String, Value>,
}

/// Keyed node graph handed to the canvas engine. Key order is insertion order,
/// so a graph produced by Load serializes deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EditorNodeGraph {
    nodes: IndexMap<String, EditorNode>,
}

impl EditorNodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(text).map_err(BridgeError::Parse)
    }

    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        serde_json::from_value(value).map_err(BridgeError::Parse)
    }

    pub fn to_json_string(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(BridgeError::Serialize)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: EditorNode) -> Option<EditorNode> {
        self.nodes.insert(key.into(), node)
    }

    pub fn get(&self, key: &str) -> Option<&EditorNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut EditorNode> {
        self.nodes.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EditorNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
