//! Per-zone cross tabulation.

use std::collections::{BTreeMap, BTreeSet};

use san_snapshot::{DeviceClass, PeerMemberType};
use serde::Serialize;

use super::notes::{member_notes, model_note, target_initiator_note, ZoneFacts};
use crate::model::{
    CfgType, FabricDeviceStatus, TargetInitiatorNote, WwnType, ZoneKey, ZoningRow,
};
use crate::settings::AuditSettings;

/// Members per fabric device status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub local: usize,
    pub remote_imported: usize,
    pub remote_configured: usize,
    pub remote_initializing: usize,
    pub remote_na: usize,
    pub absent: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: FabricDeviceStatus) {
        let slot = match status {
            FabricDeviceStatus::Local => &mut self.local,
            FabricDeviceStatus::RemoteImported => &mut self.remote_imported,
            FabricDeviceStatus::RemoteConfigured => &mut self.remote_configured,
            FabricDeviceStatus::RemoteInitializing => &mut self.remote_initializing,
            FabricDeviceStatus::RemoteNa => &mut self.remote_na,
            FabricDeviceStatus::Absent => &mut self.absent,
        };
        *slot += 1;
    }

    pub fn merge(&mut self, other: &StatusCounts) {
        self.local += other.local;
        self.remote_imported += other.remote_imported;
        self.remote_configured += other.remote_configured;
        self.remote_initializing += other.remote_initializing;
        self.remote_na += other.remote_na;
        self.absent += other.absent;
    }

    pub fn total(&self) -> usize {
        self.local
            + self.remote_imported
            + self.remote_configured
            + self.remote_initializing
            + self.remote_na
            + self.absent
    }
}

/// Distinct member counts of one zone. Peer zone property members are not
/// devices and are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneCounts {
    pub member_quantity: usize,
    pub srv: usize,
    pub storage: usize,
    pub lib: usize,
    pub switch: usize,
    pub unknown_device: usize,
    /// Members seen connected somewhere (any status but `absent`).
    pub present: usize,
    /// Members not reachable from the configuration's fabric.
    pub unreachable: usize,
    pub wwnp: usize,
    /// Distinct node WWNs named by the zone, however many ports they
    /// unpacked into.
    pub wwnn: usize,
    pub wwn_unknown: usize,
    pub principal: usize,
    pub peer: usize,
    pub status: StatusCounts,
    /// Node WWNs that unpacked into more than one port.
    pub unpacked_nodes: usize,
    /// Ports listed more than once in the zone.
    pub duplicated_ports: usize,
}

/// Rollup and findings of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneStatistics {
    pub fabric_name: String,
    pub fabric_label: String,
    pub cfg_name: String,
    pub cfg_type: CfgType,
    pub zone_name: String,
    pub peer_zone: bool,
    pub lsan_zone: bool,
    #[serde(flatten)]
    pub counts: ZoneCounts,
    pub storage_models: Vec<String>,
    pub zone_duplicates_free: Option<String>,
    pub zone_duplicates: Option<String>,
    pub zone_paired_note: Option<String>,
    pub target_initiator_note: Option<TargetInitiatorNote>,
    pub target_model_note: Option<String>,
    pub zone_member_note: Option<String>,
}

impl ZoneStatistics {
    pub fn key(&self) -> ZoneKey {
        ZoneKey {
            cfg_type: self.cfg_type,
            fabric_label: self.fabric_label.clone(),
            fabric_name: self.fabric_name.clone(),
            cfg_name: self.cfg_name.clone(),
            zone_name: self.zone_name.clone(),
        }
    }

    pub fn has_findings(&self) -> bool {
        self.target_initiator_note.is_some()
            || self.target_model_note.is_some()
            || self.zone_member_note.is_some()
            || self.zone_duplicates.is_some()
    }
}

/// Cross-tabulate every zone and evaluate the zone findings.
pub fn summarize_zones(rows: &[ZoningRow], settings: &AuditSettings) -> Vec<ZoneStatistics> {
    let mut zones: BTreeMap<ZoneKey, Vec<&ZoningRow>> = BTreeMap::new();
    for row in rows {
        zones.entry(row.zone_key()).or_default().push(row);
    }
    zones
        .into_iter()
        .map(|(key, zone_rows)| zone_statistics(key, &zone_rows, settings))
        .collect()
}

fn zone_statistics(key: ZoneKey, rows: &[&ZoningRow], settings: &AuditSettings) -> ZoneStatistics {
    let (counts, storage_models) = count_members(rows);
    let first = rows.first();
    let peer_zone = first.is_some_and(|r| r.peer_zone);
    let facts = ZoneFacts {
        counts: counts.clone(),
        peer_zone,
        storage_models: storage_models.len(),
    };
    let ti_note = target_initiator_note(&facts);
    let model = if settings.storage_model_check {
        model_note(&facts, ti_note)
    } else {
        None
    };

    ZoneStatistics {
        fabric_name: key.fabric_name,
        fabric_label: key.fabric_label,
        cfg_name: key.cfg_name,
        cfg_type: key.cfg_type,
        zone_name: key.zone_name,
        peer_zone,
        lsan_zone: first.is_some_and(|r| r.lsan_zone),
        counts,
        storage_models: storage_models.into_iter().collect(),
        zone_duplicates_free: first.and_then(|r| r.zone_duplicates_free.clone()),
        zone_duplicates: first.and_then(|r| r.zone_duplicates.clone()),
        zone_paired_note: first.and_then(|r| r.zone_paired_note.clone()),
        target_initiator_note: ti_note,
        target_model_note: model,
        zone_member_note: member_notes(&facts),
    }
}

fn count_members(rows: &[&ZoningRow]) -> (ZoneCounts, BTreeSet<String>) {
    let mut counts = ZoneCounts::default();
    let mut models = BTreeSet::new();
    let mut seen = BTreeSet::new();
    let mut unpacked: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut nodes = BTreeSet::new();
    let mut duplicated = BTreeSet::new();

    for row in rows.iter().filter(|r| !r.is_property()) {
        let Some(identity) = row.member_identity() else {
            continue;
        };
        if row.wwnp_instance_number_per_zone > 1 {
            duplicated.insert(identity);
        }
        if row.resolution.wwn_type == Some(WwnType::Wwnn) {
            nodes.insert(row.alias_member.as_deref().unwrap_or(identity));
        }
        if row.resolution.unpacked_from_node {
            if let (Some(node), Some(port)) =
                (row.alias_member.as_deref(), row.resolution.wwnp.as_deref())
            {
                unpacked.entry(node).or_default().insert(port);
            }
        }
        if !seen.insert(identity) {
            continue;
        }

        counts.member_quantity += 1;
        let resolution = &row.resolution;
        counts.status.add(resolution.fabric_device_status);
        if resolution.fabric_device_status != FabricDeviceStatus::Absent {
            counts.present += 1;
        }
        if resolution.member_in_cfg_fabric != Some(true) {
            counts.unreachable += 1;
        }
        match resolution.wwn_type {
            Some(WwnType::Wwnp) => counts.wwnp += 1,
            Some(WwnType::Wwnn) => {}
            Some(WwnType::Unknown) | None => counts.wwn_unknown += 1,
        }
        match row.peerzone_member_type {
            Some(PeerMemberType::Principal) => counts.principal += 1,
            Some(PeerMemberType::Peer) => counts.peer += 1,
            Some(PeerMemberType::Property) | None => {}
        }
        let Some(attachment) = resolution.attachment.as_ref() else {
            continue;
        };
        match attachment.device_class {
            DeviceClass::Srv => counts.srv += 1,
            DeviceClass::Storage => {
                counts.storage += 1;
                if let Some(model) = attachment.device_model.as_deref() {
                    models.insert(model.trim().to_string());
                }
            }
            DeviceClass::Lib => counts.lib += 1,
            DeviceClass::Switch => counts.switch += 1,
            DeviceClass::Unknown => counts.unknown_device += 1,
        }
    }

    counts.wwnn = nodes.len();
    counts.unpacked_nodes = unpacked.values().filter(|ports| ports.len() > 1).count();
    counts.duplicated_ports = duplicated.len();
    (counts, models)
}

/// Copy zone findings onto each zoning row of the zone.
pub fn apply_zone_notes(rows: &mut [ZoningRow], zones: &[ZoneStatistics]) {
    let by_key = zones
        .iter()
        .map(|zone| (zone.key(), zone))
        .collect::<BTreeMap<_, _>>();
    for row in rows.iter_mut() {
        let Some(zone) = by_key.get(&row.zone_key()) else {
            continue;
        };
        row.target_initiator_note = zone.target_initiator_note;
        row.target_model_note = zone.target_model_note.clone();
        row.zone_member_note = zone.zone_member_note.clone();
    }
}
