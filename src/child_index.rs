use std::collections::HashMap;

use crate::model::BlockRecord;

/// Grouping key for records that carry no `parent_id`.
pub const NO_PARENT: &str = "__no_parent__";

/// Direct children of every parent id observed in a page's record set, each
/// group sorted ascending by `order`. Equal orders keep input sequence.
#[derive(Debug, Default)]
pub struct ChildIndex<'a> {
    groups: HashMap<&'a str, Vec<&'a BlockRecord>>,
    len: usize,
}

impl<'a> ChildIndex<'a> {
    pub fn build(records: &'a [BlockRecord]) -> Self {
        let mut groups: HashMap<&'a str, Vec<&'a BlockRecord>> = HashMap::new();
        let mut len = 0;

        for record in records.iter().filter(|r| !r.archived) {
            let key = record.parent_id.as_deref().unwrap_or(NO_PARENT);
            groups.entry(key).or_default().push(record);
            len += 1;
        }

        // sort_by_key is stable
        for children in groups.values_mut() {
            children.sort_by_key(|r| r.order);
        }

        Self { groups, len }
    }

    pub fn children_of(&self, parent_id: &str) -> &[&'a BlockRecord] {
        self.groups
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records with no parent at all.
    pub fn roots(&self) -> &[&'a BlockRecord] {
        self.children_of(NO_PARENT)
    }

    pub fn has_children(&self, parent_id: &str) -> bool {
        !self.children_of(parent_id).is_empty()
    }

    pub fn parent_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys().copied()
    }

    /// Number of indexed (non-archived) records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
