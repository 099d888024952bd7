//! Deterministic ordering and zone cross-referencing.
//!
//! ## Passes
//!
//! - **Duplicates**: zones of one configuration with identical port sets
//! - **Pairs**: zones replicated across the labels of one fabric, matched
//!   by device host names since redundant fabrics use different port WWNs
//! - **Sort**: effective before defined, then fabric label, then the
//!   structural keys
//!
//! Duplicate and pair relations are symmetric: every zone of a group carries
//! the same canonical name and the same member list.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ZoneKey, ZoningRow};

mod duplicates;
mod pairs;
mod sort;

pub use duplicates::mark_duplicate_zones;
pub use pairs::mark_paired_zones;
pub use sort::{sort_aliases, sort_zoning};

/// Collect a per-zone set of values, skipping peer zone property members.
fn zone_value_sets<F>(rows: &[ZoningRow], value: F) -> BTreeMap<ZoneKey, BTreeSet<String>>
where
    F: Fn(&ZoningRow) -> Option<String>,
{
    let mut out: BTreeMap<ZoneKey, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        let entry = out.entry(row.zone_key()).or_default();
        if row.is_property() {
            continue;
        }
        if let Some(v) = value(row) {
            entry.insert(v);
        }
    }
    out
}

fn join(values: impl IntoIterator<Item = String>) -> String {
    values.into_iter().collect::<Vec<_>>().join(", ")
}
