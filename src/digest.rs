//! Content fingerprint of a page's record set.
//!
//! Two record sets that describe the same tree hash the same, regardless of
//! input order or absolute `order` values. Lets the persistence side skip a
//! bulk replace when a save changed nothing.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::child_index::ChildIndex;
use crate::error::BridgeError;
use crate::model::BlockRecord;

pub fn page_digest(records: &[BlockRecord]) -> Result<String, BridgeError> {
    let canonical = canonicalize(records);
    let mut hasher = Sha256::new();
    for record in &canonical {
        let bytes = serde_json::to_vec(record).map_err(BridgeError::Serialize)?;
        hasher.update(&bytes);
        hasher.update(b"\n");
    }
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn has_changes(before: &[BlockRecord], after: &[BlockRecord]) -> Result<bool, BridgeError> {
    Ok(page_digest(before)? != page_digest(after)?)
}

/// Non-archived records sorted by id, with `order` replaced by sibling rank
/// and derived fields cleared.
fn canonicalize(records: &[BlockRecord]) -> Vec<BlockRecord> {
    let index = ChildIndex::build(records);
    let mut rank: HashMap<&str, i64> = HashMap::new();
    for parent in index.parent_keys() {
        for (i, child) in index.children_of(parent).iter().enumerate() {
            rank.insert(child.id.as_str(), i as i64);
        }
    }

    let mut canonical: Vec<BlockRecord> = records
        .iter()
        .filter(|r| !r.archived)
        .map(|r| {
            let mut c = r.clone();
            c.order = rank.get(r.id.as_str()).copied().unwrap_or(0);
            c.name = r.display_name().to_string();
            c.children = None;
            c
        })
        .collect();
    canonical.sort_by(|a, b| a.id.cmp(&b.id));
    canonical
}
