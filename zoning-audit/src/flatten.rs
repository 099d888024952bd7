//! Configuration flattening.
//!
//! Joins the raw `cfg -> zone -> alias` tables into one row per
//! (configuration, zone, member) and produces the parallel alias table.
//!
//! ## Join Rules
//!
//! 1. `cfg_type` is `effective` when the configuration name is the fabric's
//!    effective configuration, `defined` otherwise
//! 2. Each zone reference expands into the zone's members (peer zone tables
//!    take precedence over the plain zone table)
//! 3. Each member expands into the alias members it names; a member that is
//!    not an alias is its own `alias_member`
//!
//! A zone or alias without members still yields one row with a null member,
//! so every configuration keeps its full zone list.

use std::collections::{BTreeMap, BTreeSet};

use san_snapshot::{
    normalize_wwn, AliasMemberRow, CfgEffectiveRow, CfgRow, PeerMemberType, PeerZoneRow,
    ZoneMemberRow,
};
use tracing::debug;

use crate::model::{AliasRow, CfgType, FabricRef, ZoningRow};
use crate::settings::AuditSettings;

/// Raw zoning tables of one run.
#[derive(Debug, Clone, Copy)]
pub struct ZoningTables<'a> {
    pub cfg: &'a [CfgRow],
    pub zone: &'a [ZoneMemberRow],
    pub alias: &'a [AliasMemberRow],
    pub cfg_effective: &'a [CfgEffectiveRow],
    pub peerzone: &'a [PeerZoneRow],
    pub peerzone_effective: &'a [PeerZoneRow],
}

/// Output of the flattener.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    pub zoning: Vec<ZoningRow>,
    pub aliases: Vec<AliasRow>,
}

type ObjectKey = (String, String, String);
type PeerMembers = Vec<(Option<String>, PeerMemberType)>;

/// Flatten raw tables into zoning and alias rows.
pub fn flatten(tables: &ZoningTables<'_>, settings: &AuditSettings) -> Flattened {
    let effective = effective_names(tables.cfg_effective);
    let zones = zone_members(tables.zone);
    let peer_defined = peer_members(tables.peerzone);
    let peer_effective = peer_members(tables.peerzone_effective);
    let aliases = AliasLookup::new(tables.alias);

    let mut zoning = Vec::new();
    for cfg in tables.cfg {
        let fabric = FabricRef::new(&cfg.fabric_name, &cfg.fabric_label);
        let cfg_type = if effective
            .get(&(fabric.fabric_name.clone(), fabric.fabric_label.clone()))
            .is_some_and(|names| names.contains(&cfg.cfg_name))
        {
            CfgType::Effective
        } else {
            CfgType::Defined
        };
        let key = object_key(&cfg.fabric_name, &cfg.fabric_label, &cfg.zone_name);
        let lsan_zone = settings.is_lsan_zone(&cfg.zone_name);

        let peers = match cfg_type {
            CfgType::Effective => peer_effective.get(&key).or_else(|| peer_defined.get(&key)),
            CfgType::Defined => peer_defined.get(&key).or_else(|| peer_effective.get(&key)),
        };
        let members: Vec<(Option<String>, Option<PeerMemberType>)> = match peers {
            Some(peers) => peers.iter().map(|(m, t)| (m.clone(), Some(*t))).collect(),
            None => match zones.get(&key) {
                Some(members) => members.iter().map(|m| (m.clone(), None)).collect(),
                None => vec![(None, None)],
            },
        };

        for (member, member_type) in members {
            let (resolved_alias, alias_members) = aliases.expand(&fabric, member.as_deref());
            for alias_member in alias_members {
                let mut row = ZoningRow::new(
                    &fabric,
                    &cfg.cfg_name,
                    cfg_type,
                    &cfg.zone_name,
                    member.clone(),
                    alias_member,
                );
                row.resolved_alias = resolved_alias.clone();
                row.peerzone_member_type = member_type;
                row.peer_zone = peers.is_some();
                row.lsan_zone = lsan_zone;
                zoning.push(row);
            }
        }
    }

    let aliases = tables
        .alias
        .iter()
        .map(|row| {
            AliasRow::new(
                &FabricRef::new(&row.fabric_name, &row.fabric_label),
                row.alias_name.trim(),
                member_text(row.alias_member.as_deref()).map(|m| normalize_wwn(&m)),
            )
        })
        .collect::<Vec<_>>();

    debug!(
        zoning_rows = zoning.len(),
        alias_rows = aliases.len(),
        "flattened zoning configuration"
    );
    Flattened { zoning, aliases }
}

fn effective_names(rows: &[CfgEffectiveRow]) -> BTreeMap<(String, String), BTreeSet<String>> {
    let mut out: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        out.entry((row.fabric_name.clone(), row.fabric_label.clone()))
            .or_default()
            .insert(row.cfg_name.clone());
    }
    out
}

fn zone_members(rows: &[ZoneMemberRow]) -> BTreeMap<ObjectKey, Vec<Option<String>>> {
    let mut out: BTreeMap<ObjectKey, Vec<Option<String>>> = BTreeMap::new();
    for row in rows {
        out.entry(object_key(&row.fabric_name, &row.fabric_label, &row.zone_name))
            .or_default()
            .push(member_text(row.zone_member.as_deref()));
    }
    out
}

fn peer_members(rows: &[PeerZoneRow]) -> BTreeMap<ObjectKey, PeerMembers> {
    let mut out: BTreeMap<ObjectKey, PeerMembers> = BTreeMap::new();
    for row in rows {
        out.entry(object_key(&row.fabric_name, &row.fabric_label, &row.zone_name))
            .or_default()
            .push((member_text(row.zone_member.as_deref()), row.member_type));
    }
    out
}

fn object_key(fabric_name: &str, fabric_label: &str, name: &str) -> ObjectKey {
    (
        fabric_name.to_string(),
        fabric_label.to_string(),
        name.trim().to_string(),
    )
}

fn member_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// Alias name to member lookup for one run.
struct AliasLookup {
    exact: BTreeMap<ObjectKey, Vec<Option<String>>>,
    folded: BTreeMap<ObjectKey, BTreeSet<String>>,
}

impl AliasLookup {
    fn new(rows: &[AliasMemberRow]) -> Self {
        let mut exact: BTreeMap<ObjectKey, Vec<Option<String>>> = BTreeMap::new();
        let mut folded: BTreeMap<ObjectKey, BTreeSet<String>> = BTreeMap::new();
        for row in rows {
            let name = row.alias_name.trim();
            exact
                .entry(object_key(&row.fabric_name, &row.fabric_label, name))
                .or_default()
                .push(member_text(row.alias_member.as_deref()).map(|m| normalize_wwn(&m)));
            folded
                .entry(object_key(
                    &row.fabric_name,
                    &row.fabric_label,
                    &name.to_ascii_lowercase(),
                ))
                .or_default()
                .insert(name.to_string());
        }
        Self { exact, folded }
    }

    /// Resolve a zone member into the alias it names and the alias members
    /// it stands for.
    ///
    /// An exact alias name match wins. Otherwise a case-insensitive match is
    /// tried and, when several aliases differ only by case, the smallest name
    /// is used. A member matching no alias resolves to itself.
    fn expand(
        &self,
        fabric: &FabricRef,
        member: Option<&str>,
    ) -> (Option<String>, Vec<Option<String>>) {
        let Some(member) = member else {
            return (None, vec![None]);
        };
        let key = object_key(&fabric.fabric_name, &fabric.fabric_label, member);
        if let Some(found) = self.exact.get(&key) {
            return (Some(key.2), found.clone());
        }
        let folded_key = object_key(
            &fabric.fabric_name,
            &fabric.fabric_label,
            &member.to_ascii_lowercase(),
        );
        let candidate = self
            .folded
            .get(&folded_key)
            .and_then(|names| names.iter().next());
        if let Some(name) = candidate {
            let key = object_key(&fabric.fabric_name, &fabric.fabric_label, name);
            if let Some(found) = self.exact.get(&key) {
                return (Some(key.2), found.clone());
            }
        }
        (None, vec![Some(normalize_wwn(member))])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use san_snapshot::{
        AliasMemberRow, CfgEffectiveRow, CfgRow, PeerMemberType, PeerZoneRow, ZoneMemberRow,
    };

    use super::{flatten, ZoningTables};
    use crate::model::CfgType;
    use crate::settings::AuditSettings;

    fn cfg(name: &str, zone: &str) -> CfgRow {
        CfgRow {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            cfg_name: name.to_string(),
            zone_name: zone.to_string(),
        }
    }

    fn zone(name: &str, member: Option<&str>) -> ZoneMemberRow {
        ZoneMemberRow {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            zone_name: name.to_string(),
            zone_member: member.map(ToOwned::to_owned),
        }
    }

    fn alias(name: &str, member: &str) -> AliasMemberRow {
        AliasMemberRow {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            alias_name: name.to_string(),
            alias_member: Some(member.to_string()),
        }
    }

    fn effective(name: &str) -> CfgEffectiveRow {
        CfgEffectiveRow {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            cfg_name: name.to_string(),
        }
    }

    #[test]
    fn joins_cfg_zone_and_alias() {
        let cfgs = vec![cfg("prod", "z_host1"), cfg("old", "z_host1")];
        let zones = vec![
            zone("z_host1", Some("host1")),
            zone("z_host1", Some("50:00:00:00:00:00:00:AA")),
        ];
        let aliases = vec![
            alias("host1", "10:00:00:00:00:00:00:01"),
            alias("host1", "10:00:00:00:00:00:00:02"),
        ];
        let eff = vec![effective("prod")];
        let tables = ZoningTables {
            cfg: &cfgs,
            zone: &zones,
            alias: &aliases,
            cfg_effective: &eff,
            peerzone: &[],
            peerzone_effective: &[],
        };

        let out = flatten(&tables, &AuditSettings::default());

        assert_eq!(out.zoning.len(), 6);
        assert_eq!(out.aliases.len(), 2);
        let prod = out
            .zoning
            .iter()
            .filter(|r| r.cfg_name == "prod")
            .collect::<Vec<_>>();
        assert!(prod.iter().all(|r| r.cfg_type == CfgType::Effective));
        assert_eq!(prod[0].resolved_alias.as_deref(), Some("host1"));
        assert_eq!(prod[2].resolved_alias, None);
        let members = prod
            .iter()
            .map(|r| (r.zone_member.as_deref(), r.alias_member.as_deref()))
            .collect::<Vec<_>>();
        assert_eq!(
            members,
            vec![
                (Some("host1"), Some("10:00:00:00:00:00:00:01")),
                (Some("host1"), Some("10:00:00:00:00:00:00:02")),
                (
                    Some("50:00:00:00:00:00:00:AA"),
                    Some("50:00:00:00:00:00:00:aa")
                ),
            ]
        );
        assert!(out
            .zoning
            .iter()
            .filter(|r| r.cfg_name == "old")
            .all(|r| r.cfg_type == CfgType::Defined));
    }

    #[test]
    fn empty_and_unknown_zones_keep_a_null_member_row() {
        let cfgs = vec![cfg("prod", "z_empty"), cfg("prod", "z_missing")];
        let zones = vec![zone("z_empty", None)];
        let eff = vec![effective("prod")];
        let tables = ZoningTables {
            cfg: &cfgs,
            zone: &zones,
            alias: &[],
            cfg_effective: &eff,
            peerzone: &[],
            peerzone_effective: &[],
        };

        let out = flatten(&tables, &AuditSettings::default());

        assert_eq!(out.zoning.len(), 2);
        assert!(out.zoning.iter().all(|r| r.alias_member.is_none()));
        assert!(out.zoning.iter().all(|r| r.peerzone_member_type.is_none()));
    }

    #[test]
    fn peer_zone_members_carry_roles() {
        let cfgs = vec![cfg("prod", "pz_array")];
        let peers = vec![
            PeerZoneRow {
                fabric_name: "SAN1".to_string(),
                fabric_label: "A".to_string(),
                zone_name: "pz_array".to_string(),
                zone_member: Some("50:00:00:00:00:00:00:01".to_string()),
                member_type: PeerMemberType::Principal,
            },
            PeerZoneRow {
                fabric_name: "SAN1".to_string(),
                fabric_label: "A".to_string(),
                zone_name: "pz_array".to_string(),
                zone_member: Some("10:00:00:00:00:00:00:01".to_string()),
                member_type: PeerMemberType::Peer,
            },
        ];
        let eff = vec![effective("prod")];
        let tables = ZoningTables {
            cfg: &cfgs,
            zone: &[],
            alias: &[],
            cfg_effective: &eff,
            peerzone: &peers,
            peerzone_effective: &[],
        };

        let out = flatten(&tables, &AuditSettings::default());

        assert!(out.zoning.iter().all(|r| r.peer_zone));
        assert_eq!(
            out.zoning
                .iter()
                .map(|r| r.peerzone_member_type)
                .collect::<Vec<_>>(),
            vec![Some(PeerMemberType::Principal), Some(PeerMemberType::Peer)]
        );
    }

    #[test]
    fn alias_match_falls_back_to_case_insensitive() {
        let cfgs = vec![cfg("prod", "lsan_z1")];
        let zones = vec![zone("lsan_z1", Some("HOST1"))];
        let aliases = vec![alias("host1", "10:00:00:00:00:00:00:01")];
        let tables = ZoningTables {
            cfg: &cfgs,
            zone: &zones,
            alias: &aliases,
            cfg_effective: &[],
            peerzone: &[],
            peerzone_effective: &[],
        };

        let out = flatten(&tables, &AuditSettings::default());

        assert_eq!(out.zoning.len(), 1);
        assert!(out.zoning[0].lsan_zone);
        assert_eq!(out.zoning[0].zone_member.as_deref(), Some("HOST1"));
        assert_eq!(out.zoning[0].resolved_alias.as_deref(), Some("host1"));
        assert_eq!(
            out.zoning[0].alias_member.as_deref(),
            Some("10:00:00:00:00:00:00:01")
        );
    }
}
