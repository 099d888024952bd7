//! Fabric rollups and label symmetry.
//!
//! Redundant fabrics (labels A and B of one fabric name) are expected to be
//! built alike. Each rollup column is compared across the labels and every
//! column with more than one distinct value is named in the asymmetry note.

use std::collections::{BTreeMap, BTreeSet};

use san_snapshot::{normalize_wwn, SwitchRecord};
use serde::Serialize;

use super::zone_stats::ZoneStatistics;
use crate::model::{AliasRow, CfgType, FabricRef};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FabricStatistics {
    pub fabric_name: String,
    pub fabric_label: String,
    pub switch_quantity: usize,
    pub port_quantity: u64,
    pub bandwidth_gbps: u64,
    pub effective_zone_quantity: usize,
    pub defined_zone_quantity: usize,
    pub alias_quantity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabricSymmetry {
    pub fabric_name: String,
    pub labels: Vec<String>,
    pub asymmetry_note: Option<String>,
}

/// One rollup per fabric name and label seen in any of the inputs.
pub fn summarize_fabrics(
    switches: &[SwitchRecord],
    zones: &[ZoneStatistics],
    aliases: &[AliasRow],
) -> Vec<FabricStatistics> {
    let mut out: BTreeMap<FabricRef, FabricStatistics> = BTreeMap::new();
    let mut seen_switches = BTreeSet::new();
    for switch in switches {
        let fabric = FabricRef::new(&switch.fabric_name, &switch.fabric_label);
        if !seen_switches.insert((fabric.clone(), normalize_wwn(&switch.switch_wwn))) {
            continue;
        }
        let stats = entry(&mut out, fabric);
        stats.switch_quantity += 1;
        stats.port_quantity += u64::from(switch.port_quantity);
        stats.bandwidth_gbps += u64::from(switch.bandwidth_gbps);
    }
    for zone in zones {
        let stats = entry(
            &mut out,
            FabricRef::new(&zone.fabric_name, &zone.fabric_label),
        );
        match zone.cfg_type {
            CfgType::Effective => stats.effective_zone_quantity += 1,
            CfgType::Defined => stats.defined_zone_quantity += 1,
        }
    }
    let mut alias_names: BTreeMap<FabricRef, BTreeSet<&str>> = BTreeMap::new();
    for alias in aliases {
        alias_names
            .entry(FabricRef::new(&alias.fabric_name, &alias.fabric_label))
            .or_default()
            .insert(&alias.alias_name);
    }
    for (fabric, names) in alias_names {
        entry(&mut out, fabric).alias_quantity = names.len();
    }
    out.into_values().collect()
}

fn entry(
    out: &mut BTreeMap<FabricRef, FabricStatistics>,
    fabric: FabricRef,
) -> &mut FabricStatistics {
    out.entry(fabric.clone()).or_insert_with(|| FabricStatistics {
        fabric_name: fabric.fabric_name,
        fabric_label: fabric.fabric_label,
        ..FabricStatistics::default()
    })
}

type Column = (&'static str, fn(&FabricStatistics) -> u64);

const SYMMETRY_COLUMNS: [Column; 3] = [
    ("switch_quantity", switch_quantity),
    ("port_quantity", port_quantity),
    ("bandwidth_gbps", bandwidth_gbps),
];

fn switch_quantity(stats: &FabricStatistics) -> u64 {
    stats.switch_quantity as u64
}

fn port_quantity(stats: &FabricStatistics) -> u64 {
    stats.port_quantity
}

fn bandwidth_gbps(stats: &FabricStatistics) -> u64 {
    stats.bandwidth_gbps
}

/// Compare the rollups of sibling labels. Single label fabrics never carry
/// a note.
pub fn fabric_symmetry(fabrics: &[FabricStatistics]) -> Vec<FabricSymmetry> {
    let mut by_name: BTreeMap<&str, Vec<&FabricStatistics>> = BTreeMap::new();
    for stats in fabrics {
        by_name.entry(&stats.fabric_name).or_default().push(stats);
    }
    by_name
        .into_iter()
        .map(|(name, labels)| {
            let asymmetric = SYMMETRY_COLUMNS
                .iter()
                .filter(|(_, value)| {
                    labels
                        .iter()
                        .map(|stats| value(stats))
                        .collect::<BTreeSet<_>>()
                        .len()
                        > 1
                })
                .map(|(column, _)| *column)
                .collect::<Vec<_>>();
            FabricSymmetry {
                fabric_name: name.to_string(),
                labels: labels.iter().map(|s| s.fabric_label.clone()).collect(),
                asymmetry_note: (!asymmetric.is_empty()).then(|| asymmetric.join(", ")),
            }
        })
        .collect()
}
