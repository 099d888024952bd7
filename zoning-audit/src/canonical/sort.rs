//! Report ordering.

use std::cmp::Ordering;

use crate::model::{AliasRow, CfgType, ZoningRow};

/// Effective before defined, then fabric label, then structural keys.
pub fn sort_zoning(rows: &mut [ZoningRow]) {
    rows.sort_by(compare_zoning);
}

fn compare_zoning(a: &ZoningRow, b: &ZoningRow) -> Ordering {
    a.cfg_type
        .cmp(&b.cfg_type)
        .then_with(|| a.fabric_label.cmp(&b.fabric_label))
        .then_with(|| a.fabric_name.cmp(&b.fabric_name))
        .then_with(|| a.cfg_name.cmp(&b.cfg_name))
        .then_with(|| a.zone_name.cmp(&b.zone_name))
        .then_with(|| a.resolution.device_class().cmp(&b.resolution.device_class()))
        .then_with(|| a.zone_member.cmp(&b.zone_member))
        .then_with(|| a.alias_member.cmp(&b.alias_member))
        .then_with(|| a.resolution.wwnp.cmp(&b.resolution.wwnp))
}

/// Used aliases first (effective, then defined), unused last.
pub fn sort_aliases(rows: &mut [AliasRow]) {
    rows.sort_by(|a, b| {
        scope_rank(a.cfg_type)
            .cmp(&scope_rank(b.cfg_type))
            .then_with(|| a.fabric_label.cmp(&b.fabric_label))
            .then_with(|| a.fabric_name.cmp(&b.fabric_name))
            .then_with(|| a.alias_name.cmp(&b.alias_name))
            .then_with(|| a.alias_member.cmp(&b.alias_member))
            .then_with(|| a.resolution.wwnp.cmp(&b.resolution.wwnp))
    });
}

fn scope_rank(cfg_type: Option<CfgType>) -> u8 {
    match cfg_type {
        Some(CfgType::Effective) => 0,
        Some(CfgType::Defined) => 1,
        None => 2,
    }
}
