//! Duplicate zone detection.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{join, zone_value_sets};
use crate::model::{CfgType, ZoneKey, ZoningRow};
use crate::settings::TieBreak;

type Scope = (String, String, String, CfgType);

/// Mark zones whose resolved port sets are identical within one
/// configuration.
///
/// Every zone gets `zone_duplicates_free`: its own name, or the canonical
/// name of its duplicate group. Members of a group also get the full
/// comma-joined list of the group's zone names. Zones with no resolved
/// members never form a group.
pub fn mark_duplicate_zones(rows: &mut [ZoningRow], tie_break: TieBreak) {
    let ports = zone_value_sets(rows, |row| row.member_identity().map(ToOwned::to_owned));

    let mut first_seen: Vec<ZoneKey> = Vec::new();
    let mut seen = BTreeSet::new();
    for row in rows.iter() {
        let key = row.zone_key();
        if seen.insert(key.clone()) {
            first_seen.push(key);
        }
    }

    let mut groups: BTreeMap<(Scope, &BTreeSet<String>), Vec<String>> = BTreeMap::new();
    for key in &first_seen {
        let Some(set) = ports.get(key).filter(|set| !set.is_empty()) else {
            continue;
        };
        groups
            .entry((scope(key), set))
            .or_default()
            .push(key.zone_name.clone());
    }

    let mut canonical: BTreeMap<(Scope, String), (String, String)> = BTreeMap::new();
    for ((scope, _), names) in &groups {
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() < 2 {
            continue;
        }
        let chosen = match tie_break {
            TieBreak::Lexicographic => sorted[0].clone(),
            TieBreak::FirstOccurrence => names[0].clone(),
        };
        let listed = join(sorted.iter().cloned());
        for name in &sorted {
            canonical.insert(
                (scope.clone(), name.clone()),
                (chosen.clone(), listed.clone()),
            );
        }
    }
    debug!(duplicated_zones = canonical.len(), "marked duplicate zones");

    for row in rows.iter_mut() {
        let key = (scope(&row.zone_key()), row.zone_name.clone());
        match canonical.get(&key) {
            Some((chosen, listed)) => {
                row.zone_duplicates_free = Some(chosen.clone());
                row.zone_duplicates = Some(listed.clone());
            }
            None => {
                row.zone_duplicates_free = Some(row.zone_name.clone());
                row.zone_duplicates = None;
            }
        }
    }
}

fn scope(key: &ZoneKey) -> Scope {
    (
        key.fabric_name.clone(),
        key.fabric_label.clone(),
        key.cfg_name.clone(),
        key.cfg_type,
    )
}

#[cfg(test)]
mod tests {
    use super::mark_duplicate_zones;
    use crate::model::{CfgType, FabricRef, ZoningRow};
    use crate::settings::TieBreak;

    fn row(cfg: &str, zone: &str, wwnp: &str) -> ZoningRow {
        let mut row = ZoningRow::new(
            &FabricRef::new("SAN1", "A"),
            cfg,
            CfgType::Effective,
            zone,
            Some(wwnp.to_string()),
            Some(wwnp.to_string()),
        );
        row.resolution.wwnp = Some(wwnp.to_string());
        row
    }

    fn rows() -> Vec<ZoningRow> {
        vec![
            row("prod", "z_b", "10:00:00:00:00:00:00:01"),
            row("prod", "z_b", "50:00:00:00:00:00:00:01"),
            row("prod", "z_a", "50:00:00:00:00:00:00:01"),
            row("prod", "z_a", "10:00:00:00:00:00:00:01"),
            row("prod", "z_a", "10:00:00:00:00:00:00:01"),
            row("prod", "z_c", "10:00:00:00:00:00:00:02"),
            row("test", "z_d", "10:00:00:00:00:00:00:01"),
            row("test", "z_d", "50:00:00:00:00:00:00:01"),
        ]
    }

    #[test]
    fn duplicate_relation_is_symmetric() {
        let mut rows = rows();
        mark_duplicate_zones(&mut rows, TieBreak::Lexicographic);

        for row in rows.iter().filter(|r| r.zone_name == "z_a" || r.zone_name == "z_b") {
            assert_eq!(row.zone_duplicates_free.as_deref(), Some("z_a"));
            assert_eq!(row.zone_duplicates.as_deref(), Some("z_a, z_b"));
        }
        let other = rows.iter().find(|r| r.zone_name == "z_c").expect("z_c");
        assert_eq!(other.zone_duplicates_free.as_deref(), Some("z_c"));
        assert_eq!(other.zone_duplicates, None);
        let other_cfg = rows.iter().find(|r| r.zone_name == "z_d").expect("z_d");
        assert_eq!(other_cfg.zone_duplicates, None);
    }

    #[test]
    fn first_occurrence_tie_break_uses_input_order() {
        let mut rows = rows();
        mark_duplicate_zones(&mut rows, TieBreak::FirstOccurrence);

        let a = rows.iter().find(|r| r.zone_name == "z_a").expect("z_a");
        assert_eq!(a.zone_duplicates_free.as_deref(), Some("z_b"));
        assert_eq!(a.zone_duplicates.as_deref(), Some("z_a, z_b"));
    }
}
