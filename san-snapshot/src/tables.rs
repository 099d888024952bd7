//! Flat records for each snapshot table.
//!
//! Every record is already labeled with the fabric it was collected from
//! (`fabric_name`/`fabric_label`). Fields the upstream parser could not fill
//! are `None`; absence is data here, not an error.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Fabric Label Index source row: one switch of one collected configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricLabelRow {
    pub config_id: String,
    pub switch_wwn: String,
    pub fabric_name: String,
    pub fabric_label: String,
}

/// `cfg` table: one zone reference inside a zoning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub cfg_name: String,
    pub zone_name: String,
}

/// `zone` table: one member reference (WWN or alias name) of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMemberRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub zone_name: String,
    #[serde(default)]
    pub zone_member: Option<String>,
}

/// `alias` table: one WWN bound to an alias name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasMemberRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub alias_name: String,
    #[serde(default)]
    pub alias_member: Option<String>,
}

/// `cfg_effective` table: the active configuration name of a fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgEffectiveRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub cfg_name: String,
}

/// Peer-zoning role of a zone member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerMemberType {
    Principal,
    Peer,
    Property,
}

impl PeerMemberType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Principal => "principal",
            Self::Peer => "peer",
            Self::Property => "property",
        }
    }
}

impl Display for PeerMemberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `peerzone` / `peerzone_effective` tables: one member of a peer zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerZoneRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub zone_name: String,
    #[serde(default)]
    pub zone_member: Option<String>,
    pub member_type: PeerMemberType,
}

/// `fcrfabric` table: an edge fabric reachable through a backbone router.
///
/// `fabric_name`/`fabric_label` label the backbone the router belongs to.
/// The edge fabric itself is identified by its principal switch WWN and must
/// be resolved through the Fabric Label Index. `edge_config_id` names the
/// collected configuration the principal was seen in, when the collector
/// recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FcrFabricRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub router_wwn: String,
    pub fabric_id: u32,
    pub edge_principal_wwn: String,
    #[serde(default)]
    pub edge_config_id: Option<String>,
}

/// LSAN device lifecycle state reported by a backbone router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LsanState {
    #[serde(alias = "imported", alias = "IMPORTED")]
    Imported,
    #[serde(alias = "configured", alias = "CONFIGURED")]
    Configured,
    #[serde(alias = "initializing", alias = "INITIALIZING")]
    Initializing,
}

impl LsanState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Imported => "Imported",
            Self::Configured => "Configured",
            Self::Initializing => "Initializing",
        }
    }
}

impl Display for LsanState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `lsan` table: one member of an LSAN zone as seen by a backbone router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsanMemberRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub router_wwn: String,
    /// Fabric id of the edge fabric the LSAN zone is defined in.
    pub fabric_id: u32,
    pub zone_name: String,
    pub zone_member: String,
    #[serde(default)]
    pub state: Option<LsanState>,
}

/// `fcredge` table: a proxy device created by a backbone router.
///
/// The device physically exists in `exported_fabric_id` and is presented
/// into `imported_fabric_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FcrEdgeRow {
    pub fabric_name: String,
    pub fabric_label: String,
    pub router_wwn: String,
    pub exported_fabric_id: u32,
    pub imported_fabric_id: u32,
    pub port_name: String,
}

/// Device classification assigned by the connectivity resolver.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceClass {
    Srv,
    Storage,
    Lib,
    Switch,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Srv => "SRV",
            Self::Storage => "STORAGE",
            Self::Lib => "LIB",
            Self::Switch => "SWITCH",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Display for DeviceClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `portshow_aggregated` equivalent: where a port WWN physically lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttachment {
    pub fabric_name: String,
    pub fabric_label: String,
    pub switch_name: String,
    pub switch_wwn: String,
    #[serde(default = "native_mode")]
    pub switch_mode: String,
    #[serde(default)]
    pub port: Option<String>,
    pub port_name: String,
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub device_host_name: Option<String>,
    #[serde(default)]
    pub device_class: DeviceClass,
    #[serde(default)]
    pub device_model: Option<String>,
}

/// Switch inventory row used for fabric rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRecord {
    pub fabric_name: String,
    pub fabric_label: String,
    pub switch_name: String,
    pub switch_wwn: String,
    #[serde(default = "native_mode")]
    pub switch_mode: String,
    #[serde(default)]
    pub port_quantity: u32,
    #[serde(default)]
    pub bandwidth_gbps: u32,
}

fn native_mode() -> String {
    "native".to_string()
}
