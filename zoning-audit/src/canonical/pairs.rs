//! Paired zone detection across the labels of one fabric.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{join, zone_value_sets};
use crate::model::{CfgType, ZoningRow};

/// Match zones of different labels of the same fabric by their device host
/// name sets.
///
/// Only fabrics with two or more labels take part, and only zones of the same
/// configuration type are compared. A zone gets one `zone_pairs` entry per
/// other label it has a match in; the entries are also rendered into
/// `zone_paired_note` as `label: zone, zone; label: zone`.
pub fn mark_paired_zones(rows: &mut [ZoningRow]) {
    let mut labels: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows.iter() {
        labels
            .entry(row.fabric_name.clone())
            .or_default()
            .insert(row.fabric_label.clone());
    }

    let hosts = zone_value_sets(rows, |row| {
        row.resolution
            .attachment
            .as_ref()
            .and_then(|a| a.device_host_name.clone())
    });

    let mut index: BTreeMap<(String, CfgType, String, &BTreeSet<String>), BTreeSet<String>> =
        BTreeMap::new();
    for (key, set) in &hosts {
        if set.is_empty() {
            continue;
        }
        index
            .entry((
                key.fabric_name.clone(),
                key.cfg_type,
                key.fabric_label.clone(),
                set,
            ))
            .or_default()
            .insert(key.zone_name.clone());
    }

    let mut pairs = BTreeMap::new();
    for (key, set) in &hosts {
        let Some(fabric_labels) = labels.get(&key.fabric_name) else {
            continue;
        };
        if set.is_empty() || fabric_labels.len() < 2 {
            continue;
        }
        let mut found: BTreeMap<String, String> = BTreeMap::new();
        for label in fabric_labels.iter().filter(|l| **l != key.fabric_label) {
            let lookup = (key.fabric_name.clone(), key.cfg_type, label.clone(), set);
            if let Some(names) = index.get(&lookup) {
                found.insert(label.clone(), join(names.iter().cloned()));
            }
        }
        pairs.insert(key.clone(), found);
    }
    debug!(
        paired_zones = pairs.values().filter(|p| !p.is_empty()).count(),
        "matched zone pairs across fabric labels"
    );

    for row in rows.iter_mut() {
        let Some(found) = pairs.get(&row.zone_key()) else {
            continue;
        };
        row.zone_pairs = found.clone();
        row.zone_paired_note = pair_note(found);
    }
}

fn pair_note(pairs: &BTreeMap<String, String>) -> Option<String> {
    if pairs.is_empty() {
        return None;
    }
    Some(
        pairs
            .iter()
            .map(|(label, zones)| format!("{label}: {zones}"))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
