//! Consistency checks between a page's records before Load and after Save.
//!
//! Absolute `order` values are expected to change across a round trip, so
//! ordering is only compared through each parent's sibling sequence.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::child_index::ChildIndex;
use crate::model::BlockRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMismatch {
    pub id: String,
    pub field: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTripReport {
    pub missing_ids: Vec<String>,
    pub unexpected_ids: Vec<String>,
    pub parent_mismatches: Vec<String>,
    pub field_mismatches: Vec<FieldMismatch>,
    /// Parent ids whose ordered child list differs.
    pub sibling_mismatches: Vec<String>,
}

impl RoundTripReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_ids.is_empty()
            && self.unexpected_ids.is_empty()
            && self.parent_mismatches.is_empty()
            && self.field_mismatches.is_empty()
            && self.sibling_mismatches.is_empty()
    }
}

/// Child ids of every parent, in `order` sequence. Keyed by parent id, with
/// parentless records under the child index's no-parent sentinel.
pub fn sibling_sequences(records: &[BlockRecord]) -> BTreeMap<String, Vec<String>> {
    let index = ChildIndex::build(records);
    index
        .parent_keys()
        .map(|parent| {
            let ids = index
                .children_of(parent)
                .iter()
                .map(|r| r.id.clone())
                .collect();
            (parent.to_string(), ids)
        })
        .collect()
}

pub fn compare_pages(original: &[BlockRecord], saved: &[BlockRecord]) -> RoundTripReport {
    let before = by_id(original);
    let after = by_id(saved);
    let mut report = RoundTripReport::default();

    let before_ids: BTreeSet<&str> = before.keys().copied().collect();
    let after_ids: BTreeSet<&str> = after.keys().copied().collect();

    report.missing_ids = before_ids
        .difference(&after_ids)
        .map(|id| id.to_string())
        .collect();
    report.unexpected_ids = after_ids
        .difference(&before_ids)
        .map(|id| id.to_string())
        .collect();

    for id in before_ids.intersection(&after_ids) {
        let (a, b) = (before[id], after[id]);
        if a.parent_id != b.parent_id {
            report.parent_mismatches.push(id.to_string());
        }
        for field in differing_fields(a, b) {
            report.field_mismatches.push(FieldMismatch {
                id: id.to_string(),
                field,
            });
        }
    }

    let before_seq = sibling_sequences(original);
    let after_seq = sibling_sequences(saved);
    let parents: BTreeSet<&String> = before_seq.keys().chain(after_seq.keys()).collect();
    for parent in parents {
        if before_seq.get(parent) != after_seq.get(parent) {
            report.sibling_mismatches.push(parent.clone());
        }
    }

    report
}

fn by_id(records: &[BlockRecord]) -> HashMap<&str, &BlockRecord> {
    let mut map = HashMap::new();
    for record in records.iter().filter(|r| !r.archived) {
        map.entry(record.id.as_str()).or_insert(record);
    }
    map
}

fn differing_fields(a: &BlockRecord, b: &BlockRecord) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if a.block_type != b.block_type {
        fields.push("blockType");
    }
    // Load fills an empty name with the block type.
    if a.display_name() != b.display_name() {
        fields.push("name");
    }
    if a.properties != b.properties {
        fields.push("properties");
    }
    if a.styles != b.styles {
        fields.push("styles");
    }
    if a.responsive_styles != b.responsive_styles {
        fields.push("responsiveStyles");
    }
    if a.bindings != b.bindings {
        fields.push("bindings");
    }
    if a.event_handlers != b.event_handlers {
        fields.push("eventHandlers");
    }
    if a.classes != b.classes {
        fields.push("classes");
    }
    if a.component_id != b.component_id {
        fields.push("componentId");
    }
    if a.slot != b.slot {
        fields.push("slot");
    }
    fields
}
