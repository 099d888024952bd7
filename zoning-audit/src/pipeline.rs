//! End to end aggregation of one snapshot.
//!
//! Stages run in a fixed order and each one only fills columns of the rows
//! produced by the flattener, so the run is deterministic: the same snapshot
//! and settings always give the same report.

use std::collections::BTreeSet;

use san_snapshot::{Snapshot, SwitchRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alias_scope::{classify_alias_scope, mark_duplicated_aliases};
use crate::canonical::{mark_duplicate_zones, mark_paired_zones, sort_aliases, sort_zoning};
use crate::connectivity::{attach_members, AttachmentIndex};
use crate::error::{FabricError, FabricFailure, ZoningError};
use crate::fabric_index::FabricLabelIndex;
use crate::flatten::{flatten, ZoningTables};
use crate::lsan::{resolve_lsan_members, LsanResolver};
use crate::membership;
use crate::model::{AliasRow, FabricRef, ZoningRow};
use crate::settings::AuditSettings;
use crate::statistics::{
    apply_zone_notes, fabric_symmetry, summarize_configurations, summarize_fabrics,
    summarize_zones, CfgStatistics, FabricStatistics, FabricSymmetry, ZoneStatistics,
};
use crate::unpack::{count_alias_instances, count_zone_instances, unpack_members, NodePortRelation};
use crate::wwn_type::{self, WwnCatalogue};

/// Full result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoningReport {
    pub zoning: Vec<ZoningRow>,
    pub aliases: Vec<AliasRow>,
    pub zones: Vec<ZoneStatistics>,
    pub configurations: Vec<CfgStatistics>,
    pub fabrics: Vec<FabricStatistics>,
    pub symmetry: Vec<FabricSymmetry>,
    pub failed_fabrics: Vec<FabricFailure>,
}

impl ZoningReport {
    pub fn has_failures(&self) -> bool {
        !self.failed_fabrics.is_empty()
    }
}

/// Run every stage over `snapshot`.
///
/// Fails only when a table every fabric depends on is missing. A fabric that
/// cannot be analyzed on its own is listed in `failed_fabrics` and left out
/// of every other section.
pub fn aggregate(snapshot: &Snapshot, settings: &AuditSettings) -> Result<ZoningReport, ZoningError> {
    let cfg = required(snapshot.cfg.as_deref(), "cfg")?;
    let zone = required(snapshot.zone.as_deref(), "zone")?;
    let alias = required(snapshot.alias.as_deref(), "alias")?;
    let cfg_effective = required(snapshot.cfg_effective.as_deref(), "cfg_effective")?;
    let attachments = required(snapshot.portshow_aggregated.as_deref(), "portshow_aggregated")?;

    let labels = FabricLabelIndex::from_rows(&snapshot.fabric_labels);
    let tables = ZoningTables {
        cfg,
        zone,
        alias,
        cfg_effective,
        peerzone: &snapshot.peerzone,
        peerzone_effective: &snapshot.peerzone_effective,
    };
    let flat = flatten(&tables, settings);
    let (mut zoning, mut aliases, failed_fabrics) =
        exclude_unroutable(flat.zoning, flat.aliases, snapshot);
    info!(
        zoning = zoning.len(),
        aliases = aliases.len(),
        failed = failed_fabrics.len(),
        "flattened zoning configuration"
    );

    let catalogue = WwnCatalogue::from_attachments(attachments);
    wwn_type::classify_members(&mut zoning, &catalogue);
    wwn_type::classify_members(&mut aliases, &catalogue);

    let relation = NodePortRelation::from_attachments(attachments);
    let mut zoning = unpack_members(zoning, &relation);
    let mut aliases = unpack_members(aliases, &relation);
    count_zone_instances(&mut zoning);
    count_alias_instances(&mut aliases);

    let index = AttachmentIndex::new(attachments, settings);
    attach_members(&mut zoning, &index);
    attach_members(&mut aliases, &index);

    if let (Some(fcrfabric), Some(lsan), Some(fcredge)) = (
        snapshot.fcrfabric.as_deref(),
        snapshot.lsan.as_deref(),
        snapshot.fcredge.as_deref(),
    ) {
        let resolver = LsanResolver::new(fcrfabric, lsan, fcredge, &labels);
        resolve_lsan_members(&mut zoning, &resolver);
    } else {
        debug!("FC-routing tables incomplete, skipping LSAN resolution");
    }

    membership::classify_members(&mut zoning);
    membership::classify_members(&mut aliases);

    classify_alias_scope(&mut aliases, &zoning);
    mark_duplicated_aliases(&mut aliases);

    mark_duplicate_zones(&mut zoning, settings.canonical_tie_break);
    mark_paired_zones(&mut zoning);
    sort_zoning(&mut zoning);
    sort_aliases(&mut aliases);

    let zones = summarize_zones(&zoning, settings);
    apply_zone_notes(&mut zoning, &zones);
    let configurations = summarize_configurations(&zones);
    let switches = analyzed_switches(snapshot, &failed_fabrics);
    let fabrics = summarize_fabrics(&switches, &zones, &aliases);
    let symmetry = fabric_symmetry(&fabrics);
    info!(
        zones = zones.len(),
        configurations = configurations.len(),
        fabrics = fabrics.len(),
        "aggregated zoning statistics"
    );

    Ok(ZoningReport {
        zoning,
        aliases,
        zones,
        configurations,
        fabrics,
        symmetry,
        failed_fabrics,
    })
}

fn required<'a, T>(table: Option<&'a [T]>, name: &'static str) -> Result<&'a [T], ZoningError> {
    table.ok_or(ZoningError::MissingTable(name))
}

/// Switches of every fabric that was not excluded from the run.
fn analyzed_switches(snapshot: &Snapshot, failed: &[FabricFailure]) -> Vec<SwitchRecord> {
    let failed = failed
        .iter()
        .map(|f| FabricRef::new(&f.fabric_name, &f.fabric_label))
        .collect::<BTreeSet<_>>();
    snapshot
        .switches
        .iter()
        .filter(|s| !failed.contains(&FabricRef::new(&s.fabric_name, &s.fabric_label)))
        .cloned()
        .collect()
}

/// Drop fabrics whose LSAN zones cannot be resolved because routing tables
/// are missing from the snapshot.
fn exclude_unroutable(
    zoning: Vec<ZoningRow>,
    aliases: Vec<AliasRow>,
    snapshot: &Snapshot,
) -> (Vec<ZoningRow>, Vec<AliasRow>, Vec<FabricFailure>) {
    let missing = snapshot.missing_routing_tables();
    if missing.is_empty() {
        return (zoning, aliases, Vec::new());
    }
    let routed = zoning
        .iter()
        .filter(|row| row.lsan_zone)
        .map(|row| FabricRef::new(&row.fabric_name, &row.fabric_label))
        .collect::<BTreeSet<_>>();
    if routed.is_empty() {
        return (zoning, aliases, Vec::new());
    }

    let err = FabricError::MissingRoutingTables(missing);
    let failures = routed
        .iter()
        .map(|fabric| {
            warn!(fabric = %fabric, error = %err, "fabric could not be analyzed");
            FabricFailure::new(&fabric.fabric_name, &fabric.fabric_label, &err)
        })
        .collect();
    let zoning = zoning
        .into_iter()
        .filter(|row| !routed.contains(&FabricRef::new(&row.fabric_name, &row.fabric_label)))
        .collect();
    let aliases = aliases
        .into_iter()
        .filter(|row| !routed.contains(&FabricRef::new(&row.fabric_name, &row.fabric_label)))
        .collect();
    (zoning, aliases, failures)
}
