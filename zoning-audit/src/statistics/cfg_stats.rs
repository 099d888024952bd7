use std::collections::BTreeMap;

use serde::Serialize;

use super::zone_stats::{StatusCounts, ZoneStatistics};
use crate::model::CfgType;

/// Rollup of one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CfgStatistics {
    pub fabric_name: String,
    pub fabric_label: String,
    pub cfg_name: String,
    pub cfg_type: CfgType,
    pub zone_quantity: usize,
    pub member_quantity: usize,
    pub status: StatusCounts,
    pub duplicated_zones: usize,
    pub paired_zones: usize,
    /// Zones per `Target_Initiator_note` value.
    pub target_initiator_notes: BTreeMap<String, usize>,
    pub target_model_notes: usize,
    pub zone_member_notes: usize,
}

type CfgKey = (CfgType, String, String, String);

pub fn summarize_configurations(zones: &[ZoneStatistics]) -> Vec<CfgStatistics> {
    let mut out: BTreeMap<CfgKey, CfgStatistics> = BTreeMap::new();
    for zone in zones {
        let key = (
            zone.cfg_type,
            zone.fabric_label.clone(),
            zone.fabric_name.clone(),
            zone.cfg_name.clone(),
        );
        let cfg = out.entry(key).or_insert_with(|| CfgStatistics {
            fabric_name: zone.fabric_name.clone(),
            fabric_label: zone.fabric_label.clone(),
            cfg_name: zone.cfg_name.clone(),
            cfg_type: zone.cfg_type,
            zone_quantity: 0,
            member_quantity: 0,
            status: StatusCounts::default(),
            duplicated_zones: 0,
            paired_zones: 0,
            target_initiator_notes: BTreeMap::new(),
            target_model_notes: 0,
            zone_member_notes: 0,
        });
        cfg.zone_quantity += 1;
        cfg.member_quantity += zone.counts.member_quantity;
        cfg.status.merge(&zone.counts.status);
        if zone.zone_duplicates.is_some() {
            cfg.duplicated_zones += 1;
        }
        if zone.zone_paired_note.is_some() {
            cfg.paired_zones += 1;
        }
        if let Some(note) = zone.target_initiator_note {
            *cfg
                .target_initiator_notes
                .entry(note.as_str().to_string())
                .or_default() += 1;
        }
        if zone.target_model_note.is_some() {
            cfg.target_model_notes += 1;
        }
        if zone.zone_member_note.is_some() {
            cfg.zone_member_notes += 1;
        }
    }
    out.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::summarize_configurations;
    use crate::model::{CfgType, TargetInitiatorNote};
    use crate::statistics::zone_stats::{ZoneCounts, ZoneStatistics};

    fn zone(cfg_type: CfgType, name: &str, note: Option<TargetInitiatorNote>) -> ZoneStatistics {
        ZoneStatistics {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            cfg_name: "prod".to_string(),
            cfg_type,
            zone_name: name.to_string(),
            peer_zone: false,
            lsan_zone: false,
            counts: ZoneCounts {
                member_quantity: 2,
                ..ZoneCounts::default()
            },
            storage_models: Vec::new(),
            zone_duplicates_free: None,
            zone_duplicates: None,
            zone_paired_note: None,
            target_initiator_note: note,
            target_model_note: None,
            zone_member_note: None,
        }
    }

    #[test]
    fn effective_and_defined_are_rolled_up_separately() {
        let zones = vec![
            zone(CfgType::Effective, "z1", None),
            zone(CfgType::Effective, "z2", Some(TargetInitiatorNote::NoTarget)),
            zone(CfgType::Defined, "z1", Some(TargetInitiatorNote::NoTarget)),
        ];

        let cfgs = summarize_configurations(&zones);

        assert_eq!(cfgs.len(), 2);
        assert_eq!(cfgs[0].cfg_type, CfgType::Effective);
        assert_eq!(cfgs[0].zone_quantity, 2);
        assert_eq!(cfgs[0].member_quantity, 4);
        assert_eq!(cfgs[0].target_initiator_notes.get("no_target"), Some(&1));
        assert_eq!(cfgs[1].zone_quantity, 1);
    }
}
