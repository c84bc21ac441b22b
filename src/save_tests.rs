//! Save tests: editor node graph -> block records.

#[cfg(test)]
mod tests {
    use crate::config::BridgeConfig;
    use crate::error::BridgeError;
    use crate::model::{BlockProps, BlockRecord, EditorNode, EditorNodeGraph, NodeType};
    use crate::save::serialized_nodes_to_blocks;
    use assert_matches::assert_matches;
    use serde_json::{json, Map};

    fn config() -> BridgeConfig {
        BridgeConfig::default()
    }

    fn node(block_type: &str, block_id: Option<&str>, parent: Option<&str>, nodes: &[&str]) -> EditorNode {
        EditorNode {
            node_type: NodeType {
                resolved_name: "Block".to_string(),
            },
            is_canvas: false,
            props: BlockProps {
                block_type: block_type.to_string(),
                name: String::new(),
                block_id: block_id.map(str::to_string),
                ..BlockProps::default()
            },
            display_name: block_type.to_string(),
            parent: parent.map(str::to_string),
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            linked_nodes: Default::default(),
            hidden: false,
            custom: Map::new(),
        }
    }

    /// ROOT (blk-42) -> [a -> [a1], b]
    fn graph() -> EditorNodeGraph {
        let mut graph = EditorNodeGraph::new();
        graph.insert("ROOT", node("container", Some("blk-42"), None, &["a", "b"]));
        graph.insert("a", node("section", Some("a"), Some("ROOT"), &["a1"]));
        graph.insert("a1", node("text", Some("a1"), Some("a"), &[]));
        graph.insert("b", node("image", Some("b"), Some("ROOT"), &[]));
        graph
    }

    fn save(graph: &EditorNodeGraph) -> Vec<BlockRecord> {
        serialized_nodes_to_blocks(graph, "p1", "blk-42", &config()).unwrap()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ROOT HANDLING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_missing_root_key_saves_nothing() {
        let graph = graph();
        let mut without_root = EditorNodeGraph::new();
        for key in ["a", "a1", "b"] {
            without_root.insert(key, graph.get(key).unwrap().clone());
        }
        let records = serialized_nodes_to_blocks(&without_root, "p1", "missing", &config()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_text_graph_saves_nothing() {
        let records = serialized_nodes_to_blocks("{}", "p1", "missing", &config()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_root_maps_to_root_block_id() {
        let records = save(&graph());
        let root = &records[0];
        assert_eq!(root.id, "blk-42");
        assert_eq!(root.parent_id, None);
        assert_eq!(root.page_id.as_deref(), Some("p1"));
        assert_eq!(records[1].parent_id.as_deref(), Some("blk-42"));
        assert_eq!(records[3].parent_id.as_deref(), Some("blk-42"));
    }

    #[test]
    fn test_root_block_id_argument_wins_over_props() {
        let records = serialized_nodes_to_blocks(&graph(), "p1", "other-root", &config()).unwrap();
        assert_eq!(records[0].id, "other-root");
        assert_eq!(records[1].parent_id.as_deref(), Some("other-root"));
    }

    #[test]
    fn test_only_root_carries_page_id() {
        let records = save(&graph());
        assert!(records[1..].iter().all(|r| r.page_id.is_none()));
    }

    #[test]
    fn test_root_type_falls_back_to_custom() {
        let mut graph = graph();
        let root = graph.get_mut("ROOT").unwrap();
        root.props.block_type = String::new();
        root.custom
            .insert("originalBlockType".to_string(), json!("section"));
        let records = save(&graph);
        assert_eq!(records[0].block_type, "section");
        assert_eq!(records[0].name, "section");
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ORDER & STRUCTURE
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_preorder_emission() {
        let ids: Vec<String> = save(&graph()).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["blk-42", "a", "a1", "b"]);
    }

    #[test]
    fn test_global_monotonic_order() {
        let records = save(&graph());
        let orders: Vec<i64> = records.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_order_start_configurable() {
        let mut config = config();
        config.order_start = 10;
        let records = serialized_nodes_to_blocks(&graph(), "p1", "blk-42", &config).unwrap();
        let orders: Vec<i64> = records.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![10, 11, 12, 13]);
    }

    #[test]
    fn test_children_regenerated_from_nodes() {
        let records = save(&graph());
        assert_eq!(
            records[0].children,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(records[1].children, Some(vec!["a1".to_string()]));
        assert_eq!(records[2].children, Some(vec![]));
    }

    #[test]
    fn test_block_id_used_for_id_and_children() {
        let mut graph = graph();
        graph.get_mut("b").unwrap().props.block_id = Some("persisted-b".to_string());
        let records = save(&graph);
        assert_eq!(records[3].id, "persisted-b");
        assert_eq!(
            records[0].children,
            Some(vec!["a".to_string(), "persisted-b".to_string()])
        );
    }

    #[test]
    fn test_parent_id_matches_parent_block_id() {
        let mut graph = EditorNodeGraph::new();
        graph.insert("ROOT", node("container", Some("r"), None, &["k1"]));
        graph.insert("k1", node("section", Some("b1"), Some("ROOT"), &["k2"]));
        graph.insert("k2", node("text", Some("b2"), Some("k1"), &[]));
        let records = serialized_nodes_to_blocks(&graph, "p1", "r", &config()).unwrap();
        assert_eq!(records[1].id, "b1");
        assert_eq!(records[1].children, Some(vec!["b2".to_string()]));
        assert_eq!(records[2].id, "b2");
        assert_eq!(records[2].parent_id.as_deref(), Some("b1"));
    }

    #[test]
    fn test_missing_block_id_falls_back_to_key() {
        let mut graph = graph();
        graph.get_mut("a1").unwrap().props.block_id = None;
        graph.get_mut("b").unwrap().props.block_id = Some(String::new());
        let records = save(&graph);
        assert_eq!(records[2].id, "a1");
        assert_eq!(records[3].id, "b");
    }

    #[test]
    fn test_dangling_child_skipped() {
        let mut graph = graph();
        graph.get_mut("a").unwrap().nodes.push("ghost".to_string());
        let records = save(&graph);
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].children, Some(vec!["a1".to_string()]));
    }

    #[test]
    fn test_node_listed_twice_is_emitted_twice() {
        let mut graph = graph();
        graph.get_mut("b").unwrap().nodes.push("a1".to_string());
        let records = save(&graph);
        let copies: Vec<&BlockRecord> = records.iter().filter(|r| r.id == "a1").collect();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].parent_id.as_deref(), Some("a"));
        assert_eq!(copies[1].parent_id.as_deref(), Some("b"));
        assert_eq!(records.last().unwrap().order, 4);
    }

    #[test]
    fn test_cycle_does_not_recurse() {
        let mut graph = graph();
        graph.get_mut("a1").unwrap().nodes.push("a".to_string());
        graph.get_mut("b").unwrap().nodes.push("ROOT".to_string());
        let records = save(&graph);
        assert_eq!(records.len(), 4);
        assert_eq!(records[2].children, Some(vec![]));
        assert_eq!(records[3].children, Some(vec![]));
    }

    #[test]
    fn test_unlisted_nodes_not_saved() {
        let mut graph = graph();
        graph.insert("floating", node("text", Some("floating"), Some("ROOT"), &[]));
        let records = save(&graph);
        assert!(records.iter().all(|r| r.id != "floating"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // PAYLOAD
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_text_written_back_over_properties() {
        let mut graph = graph();
        let props = &mut graph.get_mut("a1").unwrap().props;
        props
            .properties
            .insert("text".to_string(), json!("Hello"));
        props.text = Some("Goodbye".to_string());
        let records = save(&graph);
        assert_eq!(records[2].properties.get("text"), Some(&json!("Goodbye")));
    }

    #[test]
    fn test_unchanged_mirror_keeps_non_string_text() {
        let mut graph = graph();
        let props = &mut graph.get_mut("a1").unwrap().props;
        props.properties.insert("text".to_string(), json!(42));
        props.text = Some("42".to_string());
        let records = save(&graph);
        assert_eq!(records[2].properties.get("text"), Some(&json!(42)));
    }

    #[test]
    fn test_edited_mirror_replaces_non_string_text() {
        let mut graph = graph();
        let props = &mut graph.get_mut("a1").unwrap().props;
        props.properties.insert("text".to_string(), json!(42));
        props.text = Some("43".to_string());
        let records = save(&graph);
        assert_eq!(records[2].properties.get("text"), Some(&json!("43")));
    }

    #[test]
    fn test_text_added_when_properties_lack_it() {
        let mut graph = graph();
        graph.get_mut("b").unwrap().props.text = Some("caption".to_string());
        let records = save(&graph);
        assert_eq!(records[3].properties.get("text"), Some(&json!("caption")));
    }

    #[test]
    fn test_properties_untouched_without_text() {
        let mut graph = graph();
        graph
            .get_mut("a1")
            .unwrap()
            .props
            .properties
            .insert("src".to_string(), json!("/img.png"));
        let records = save(&graph);
        assert_eq!(records[2].properties.get("text"), None);
        assert_eq!(records[2].properties.get("src"), Some(&json!("/img.png")));
    }

    #[test]
    fn test_name_defaults_and_archived_false() {
        let records = save(&graph());
        assert_eq!(records[1].name, "section");
        assert!(records.iter().all(|r| !r.archived));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // TEXT INPUT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_text_input_matches_graph_input() {
        let graph = graph();
        let text = graph.to_json_string().unwrap();
        let from_text = serialized_nodes_to_blocks(&text, "p1", "blk-42", &config()).unwrap();
        assert_eq!(from_text, save(&graph));
    }

    #[test]
    fn test_text_input_with_canvas_shape() {
        let text = r#"{
            "ROOT": {
                "type": { "resolvedName": "Block" },
                "isCanvas": true,
                "props": { "blockType": "container", "blockId": "r1" },
                "displayName": "container",
                "parent": null,
                "nodes": ["t1"],
                "linkedNodes": {},
                "hidden": false,
                "custom": {}
            },
            "t1": {
                "type": { "resolvedName": "Block" },
                "props": { "blockType": "text", "blockId": "t1", "text": "Hi",
                           "styles": { "fontSize": 14, "color": "red", "bold": true } },
                "parent": "ROOT",
                "nodes": []
            }
        }"#;
        let records = serialized_nodes_to_blocks(text, "home", "r1", &config()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parent_id.as_deref(), Some("r1"));
        assert_eq!(records[1].properties.get("text"), Some(&json!("Hi")));
        assert_eq!(records[1].styles.len(), 3);
    }

    #[test]
    fn test_malformed_text_is_error() {
        let err = serialized_nodes_to_blocks("{ not json", "p1", "r", &config()).unwrap_err();
        assert_matches!(err, BridgeError::Parse(_));

        let err = serialized_nodes_to_blocks("[1, 2, 3]", "p1", "r", &config()).unwrap_err();
        assert_matches!(err, BridgeError::Parse(_));
    }
}
