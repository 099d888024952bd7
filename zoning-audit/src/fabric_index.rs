//! Fabric Label Index.
//!
//! Maps a switch of a collected configuration to the fabric name and label
//! assigned by the labeling stage. The index is read-only and built once per
//! run from the `fabric_labels` table.

use std::collections::BTreeMap;

use san_snapshot::{normalize_wwn, FabricLabelRow};

use crate::model::FabricRef;

#[derive(Debug, Clone, Default)]
pub struct FabricLabelIndex {
    by_record: BTreeMap<(String, String), FabricRef>,
    by_switch: BTreeMap<String, FabricRef>,
}

impl FabricLabelIndex {
    /// Build the index. When one switch WWN appears under several
    /// configurations the first row wins for switch-only lookups.
    pub fn from_rows(rows: &[FabricLabelRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            let switch = normalize_wwn(&row.switch_wwn);
            let fabric = FabricRef::new(&row.fabric_name, &row.fabric_label);
            index
                .by_record
                .entry((row.config_id.clone(), switch.clone()))
                .or_insert_with(|| fabric.clone());
            index.by_switch.entry(switch).or_insert(fabric);
        }
        index
    }

    /// Fabric of a switch. The record of `config_id` wins when given and
    /// labeled; otherwise the switch is looked up on its own.
    pub fn resolve(&self, config_id: Option<&str>, switch_wwn: &str) -> Option<&FabricRef> {
        let switch = normalize_wwn(switch_wwn);
        config_id
            .and_then(|id| self.by_record.get(&(id.to_string(), switch.clone())))
            .or_else(|| self.by_switch.get(&switch))
    }
}
