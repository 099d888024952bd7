//! Annotated zoning and alias records.
//!
//! The flattener creates one [`ZoningRow`] per (configuration, zone, member)
//! and one [`AliasRow`] per (alias, member). Identity columns are filled once
//! and never touched again; every later stage only fills annotation columns.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use san_snapshot::{DeviceClass, LsanState, PeerMemberType};
use serde::Serialize;

/// Whether a configuration is the active one on its fabric.
///
/// Ordering puts `Effective` before `Defined`, which is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CfgType {
    Effective,
    Defined,
}

impl CfgType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Effective => "effective",
            Self::Defined => "defined",
        }
    }
}

impl Display for CfgType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port or node identity of a member value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WwnType {
    Wwnp,
    Wwnn,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Relationship of a member to the fabric its configuration is defined in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FabricDeviceStatus {
    Local,
    RemoteImported,
    RemoteConfigured,
    RemoteInitializing,
    RemoteNa,
    #[default]
    Absent,
}

impl FabricDeviceStatus {
    pub const ALL: [FabricDeviceStatus; 6] = [
        Self::Local,
        Self::RemoteImported,
        Self::RemoteConfigured,
        Self::RemoteInitializing,
        Self::RemoteNa,
        Self::Absent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::RemoteImported => "remote_imported",
            Self::RemoteConfigured => "remote_configured",
            Self::RemoteInitializing => "remote_initializing",
            Self::RemoteNa => "remote_na",
            Self::Absent => "absent",
        }
    }
}

impl Display for FabricDeviceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fabric name and label pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FabricRef {
    pub fabric_name: String,
    pub fabric_label: String,
}

impl FabricRef {
    pub fn new(fabric_name: impl Into<String>, fabric_label: impl Into<String>) -> Self {
        Self {
            fabric_name: fabric_name.into(),
            fabric_label: fabric_label.into(),
        }
    }

    pub fn matches(&self, fabric_name: &str, fabric_label: &str) -> bool {
        self.fabric_name == fabric_name && self.fabric_label == fabric_label
    }
}

impl Display for FabricRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fabric_name, self.fabric_label)
    }
}

/// Physical location of a member port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberAttachment {
    pub fabric_name: String,
    pub fabric_label: String,
    pub switch_name: String,
    pub switch_wwn: String,
    pub port: Option<String>,
    pub node_name: Option<String>,
    pub device_host_name: Option<String>,
    pub device_class: DeviceClass,
    pub device_model: Option<String>,
}

impl MemberAttachment {
    pub fn fabric(&self) -> FabricRef {
        FabricRef::new(&self.fabric_name, &self.fabric_label)
    }
}

/// Cross-fabric resolution of an LSAN zone member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LsanResolution {
    /// Fabric the member really lives in, recovered through router edges.
    pub fabric: Option<FabricRef>,
    pub state: Option<LsanState>,
}

/// Member resolution columns shared by zoning and alias rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberResolution {
    pub wwn_type: Option<WwnType>,
    /// Strict port WWN after node unpacking.
    pub wwnp: Option<String>,
    pub unpacked_from_node: bool,
    pub attachment: Option<MemberAttachment>,
    pub fabric_device_status: FabricDeviceStatus,
    pub member_in_cfg_fabric: Option<bool>,
}

impl MemberResolution {
    pub fn device_class(&self) -> Option<DeviceClass> {
        self.attachment.as_ref().map(|a| a.device_class)
    }
}

/// Per-zone consistency finding about target/initiator balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetInitiatorNote {
    NoTargetNoInitiator,
    ReplicationZone,
    NoInitiator,
    NoTarget,
    NoTargetSeveralInitiators,
    SeveralInitiators,
}

impl TargetInitiatorNote {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoTargetNoInitiator => "no_target, no_initiator",
            Self::ReplicationZone => "replication_zone",
            Self::NoInitiator => "no_initiator",
            Self::NoTarget => "no_target",
            Self::NoTargetSeveralInitiators => "no_target, several_initiators",
            Self::SeveralInitiators => "several_initiators",
        }
    }
}

impl Display for TargetInitiatorNote {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TargetInitiatorNote {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One member of one zone of one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoningRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub cfg_name: String,
    pub cfg_type: CfgType,
    pub zone_name: String,
    pub zone_member: Option<String>,
    /// Alias the zone member resolved to, with the alias table's spelling.
    pub resolved_alias: Option<String>,
    pub alias_member: Option<String>,
    pub peerzone_member_type: Option<PeerMemberType>,
    pub peer_zone: bool,
    pub lsan_zone: bool,
    #[serde(flatten)]
    pub resolution: MemberResolution,
    pub wwnp_instance_number_per_zone: usize,
    pub lsan: Option<LsanResolution>,
    pub zone_duplicates_free: Option<String>,
    pub zone_duplicates: Option<String>,
    pub zone_pairs: BTreeMap<String, String>,
    pub zone_paired_note: Option<String>,
    pub target_initiator_note: Option<TargetInitiatorNote>,
    pub target_model_note: Option<String>,
    pub zone_member_note: Option<String>,
}

impl ZoningRow {
    pub fn new(
        fabric: &FabricRef,
        cfg_name: &str,
        cfg_type: CfgType,
        zone_name: &str,
        zone_member: Option<String>,
        alias_member: Option<String>,
    ) -> Self {
        Self {
            fabric_name: fabric.fabric_name.clone(),
            fabric_label: fabric.fabric_label.clone(),
            cfg_name: cfg_name.to_string(),
            cfg_type,
            zone_name: zone_name.to_string(),
            zone_member,
            resolved_alias: None,
            alias_member,
            peerzone_member_type: None,
            peer_zone: false,
            lsan_zone: false,
            resolution: MemberResolution::default(),
            wwnp_instance_number_per_zone: 0,
            lsan: None,
            zone_duplicates_free: None,
            zone_duplicates: None,
            zone_pairs: BTreeMap::new(),
            zone_paired_note: None,
            target_initiator_note: None,
            target_model_note: None,
            zone_member_note: None,
        }
    }

    /// Key of the zone this row belongs to.
    pub fn zone_key(&self) -> ZoneKey {
        ZoneKey {
            cfg_type: self.cfg_type,
            fabric_label: self.fabric_label.clone(),
            fabric_name: self.fabric_name.clone(),
            cfg_name: self.cfg_name.clone(),
            zone_name: self.zone_name.clone(),
        }
    }

    /// Resolved identity of the member: strict port WWN, else the raw value.
    pub fn member_identity(&self) -> Option<&str> {
        self.resolution
            .wwnp
            .as_deref()
            .or(self.alias_member.as_deref())
    }

    pub fn is_property(&self) -> bool {
        self.peerzone_member_type == Some(PeerMemberType::Property)
    }
}

/// Composite key of a zone inside a configuration, in report order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ZoneKey {
    pub cfg_type: CfgType,
    pub fabric_label: String,
    pub fabric_name: String,
    pub cfg_name: String,
    pub zone_name: String,
}

/// One WWN bound to an alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub alias_name: String,
    pub alias_member: Option<String>,
    #[serde(flatten)]
    pub resolution: MemberResolution,
    pub wwnp_instance_number_per_alias: usize,
    pub alias_unpacked: bool,
    pub alias_duplicated: Option<String>,
    pub cfg_type: Option<CfgType>,
    pub zones: Option<String>,
}

impl AliasRow {
    pub fn new(fabric: &FabricRef, alias_name: &str, alias_member: Option<String>) -> Self {
        Self {
            fabric_name: fabric.fabric_name.clone(),
            fabric_label: fabric.fabric_label.clone(),
            alias_name: alias_name.to_string(),
            alias_member,
            resolution: MemberResolution::default(),
            wwnp_instance_number_per_alias: 0,
            alias_unpacked: false,
            alias_duplicated: None,
            cfg_type: None,
            zones: None,
        }
    }
}

/// Seam shared by the member resolution stages.
///
/// Both zoning and alias rows carry a member value, a home fabric and the
/// [`MemberResolution`] columns, so classification, unpacking, connectivity
/// and fabric membership are written once over this trait.
pub trait MemberRecord: Clone {
    fn member_value(&self) -> Option<&str>;
    fn home_fabric(&self) -> (&str, &str);
    fn resolution(&self) -> &MemberResolution;
    fn resolution_mut(&mut self) -> &mut MemberResolution;
    fn lsan(&self) -> Option<&LsanResolution> {
        None
    }
}

impl MemberRecord for ZoningRow {
    fn member_value(&self) -> Option<&str> {
        self.alias_member.as_deref()
    }

    fn home_fabric(&self) -> (&str, &str) {
        (&self.fabric_name, &self.fabric_label)
    }

    fn resolution(&self) -> &MemberResolution {
        &self.resolution
    }

    fn resolution_mut(&mut self) -> &mut MemberResolution {
        &mut self.resolution
    }

    fn lsan(&self) -> Option<&LsanResolution> {
        self.lsan.as_ref()
    }
}

impl MemberRecord for AliasRow {
    fn member_value(&self) -> Option<&str> {
        self.alias_member.as_deref()
    }

    fn home_fabric(&self) -> (&str, &str) {
        (&self.fabric_name, &self.fabric_label)
    }

    fn resolution(&self) -> &MemberResolution {
        &self.resolution
    }

    fn resolution_mut(&mut self) -> &mut MemberResolution {
        &mut self.resolution
    }
}
