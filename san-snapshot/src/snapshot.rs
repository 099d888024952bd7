use serde::{Deserialize, Serialize};

use crate::tables::{
    AliasMemberRow, CfgEffectiveRow, CfgRow, DeviceAttachment, FabricLabelRow, FcrEdgeRow,
    FcrFabricRow, LsanMemberRow, PeerZoneRow, SwitchRecord, ZoneMemberRow,
};

/// All tables of one collection run.
///
/// Tables that a consumer may require are `Option` so that a table missing
/// from the dump is distinguishable from a table that was collected empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub fabric_labels: Vec<FabricLabelRow>,
    pub cfg: Option<Vec<CfgRow>>,
    pub zone: Option<Vec<ZoneMemberRow>>,
    pub alias: Option<Vec<AliasMemberRow>>,
    pub cfg_effective: Option<Vec<CfgEffectiveRow>>,
    #[serde(default)]
    pub peerzone: Vec<PeerZoneRow>,
    #[serde(default)]
    pub peerzone_effective: Vec<PeerZoneRow>,
    pub fcrfabric: Option<Vec<FcrFabricRow>>,
    pub lsan: Option<Vec<LsanMemberRow>>,
    pub fcredge: Option<Vec<FcrEdgeRow>>,
    pub portshow_aggregated: Option<Vec<DeviceAttachment>>,
    #[serde(default)]
    pub switches: Vec<SwitchRecord>,
}

impl Snapshot {
    /// Names of the FC-routing tables absent from this snapshot.
    pub fn missing_routing_tables(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.fcrfabric.is_none() {
            out.push("fcrfabric");
        }
        if self.lsan.is_none() {
            out.push("lsan");
        }
        if self.fcredge.is_none() {
            out.push("fcredge");
        }
        out
    }
}
