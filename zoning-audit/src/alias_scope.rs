//! Alias scope classification and alias notes.
//!
//! An alias is `effective` when some effective-configuration zone resolves a
//! member to it, `defined` when only defined configurations do,
//! and left null (unused) otherwise.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{AliasRow, CfgType, ZoningRow};

type AliasKey = (String, String, String, String);

/// Tag every alias row with the configuration scope it is used in and the
/// zones using it within that scope.
pub fn classify_alias_scope(aliases: &mut [AliasRow], zoning: &[ZoningRow]) {
    let mut usage: BTreeMap<(CfgType, AliasKey), BTreeSet<String>> = BTreeMap::new();
    for row in zoning {
        let (Some(alias_name), Some(alias_member)) =
            (row.resolved_alias.as_ref(), row.alias_member.as_ref())
        else {
            continue;
        };
        let key = (
            row.fabric_name.clone(),
            row.fabric_label.clone(),
            alias_name.clone(),
            alias_member.clone(),
        );
        usage
            .entry((row.cfg_type, key))
            .or_default()
            .insert(row.zone_name.clone());
    }

    for alias in aliases.iter_mut() {
        let Some(alias_member) = alias.alias_member.clone() else {
            continue;
        };
        let key = (
            alias.fabric_name.clone(),
            alias.fabric_label.clone(),
            alias.alias_name.clone(),
            alias_member,
        );
        for cfg_type in [CfgType::Effective, CfgType::Defined] {
            if let Some(zones) = usage.get(&(cfg_type, key.clone())) {
                alias.cfg_type = Some(cfg_type);
                alias.zones = Some(zones.iter().cloned().collect::<Vec<_>>().join(", "));
                break;
            }
        }
    }
}

/// Name every alias that shares its port WWN with another alias of the same
/// fabric.
pub fn mark_duplicated_aliases(aliases: &mut [AliasRow]) {
    let mut names_by_port: BTreeMap<(String, String, String), BTreeSet<String>> =
        BTreeMap::new();
    for alias in aliases.iter() {
        if let Some(wwnp) = alias.resolution.wwnp.clone() {
            names_by_port
                .entry((alias.fabric_name.clone(), alias.fabric_label.clone(), wwnp))
                .or_default()
                .insert(alias.alias_name.clone());
        }
    }
    for alias in aliases.iter_mut() {
        let Some(wwnp) = alias.resolution.wwnp.clone() else {
            continue;
        };
        let key = (alias.fabric_name.clone(), alias.fabric_label.clone(), wwnp);
        alias.alias_duplicated = names_by_port
            .get(&key)
            .filter(|names| names.len() > 1)
            .map(|names| names.iter().cloned().collect::<Vec<_>>().join(", "));
    }
}
