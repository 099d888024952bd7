//! Cross-fabric (LSAN) resolution.
//!
//! Backbone routers present devices of one edge fabric into another as proxy
//! devices. For a member of an LSAN zone this module recovers the edge fabric
//! the device really lives in and the lifecycle state the router reports for
//! it.
//!
//! ## Resolution Steps
//!
//! 1. Find the fabric ids under which the zone's own fabric is known to each
//!    backbone (`fcrfabric`, edge principal switch -> Fabric Label Index)
//! 2. Look up proxy devices imported into those fabric ids for the member's
//!    port WWN (`fcredge`) and map their exported fabric id back to an edge
//!    fabric
//! 3. Take the member's lifecycle state from the backbone's LSAN zone record
//!    (`lsan`)
//!
//! Several routers of one backbone report the same mapping, so matches are
//! collected into ordered sets. When they still disagree the smallest fabric
//! wins and `Imported` outranks `Initializing`, which outranks `Configured`.

use std::collections::{BTreeMap, BTreeSet};

use san_snapshot::{normalize_wwn, FcrEdgeRow, FcrFabricRow, LsanMemberRow, LsanState};
use tracing::{debug, warn};

use crate::fabric_index::FabricLabelIndex;
use crate::model::{FabricRef, LsanResolution, ZoningRow};

type BackboneId = (FabricRef, u32);

/// Lookup tables derived from the FC-routing snapshot.
#[derive(Debug, Clone, Default)]
pub struct LsanResolver {
    ids_by_edge: BTreeMap<FabricRef, BTreeSet<BackboneId>>,
    edge_by_id: BTreeMap<BackboneId, BTreeSet<FabricRef>>,
    exported_ids: BTreeMap<(BackboneId, String), BTreeSet<u32>>,
    states: BTreeMap<(BackboneId, String, String), BTreeSet<StateRank>>,
}

/// Lifecycle state ordered by how far the import progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct StateRank(u8, LsanState);

impl From<LsanState> for StateRank {
    fn from(state: LsanState) -> Self {
        let rank = match state {
            LsanState::Imported => 0,
            LsanState::Initializing => 1,
            LsanState::Configured => 2,
        };
        Self(rank, state)
    }
}

impl LsanResolver {
    pub fn new(
        fcrfabric: &[FcrFabricRow],
        lsan: &[LsanMemberRow],
        fcredge: &[FcrEdgeRow],
        labels: &FabricLabelIndex,
    ) -> Self {
        let mut resolver = Self::default();
        for row in fcrfabric {
            let Some(edge) = labels.resolve(row.edge_config_id.as_deref(), &row.edge_principal_wwn) else {
                warn!(
                    backbone = %FabricRef::new(&row.fabric_name, &row.fabric_label),
                    fabric_id = row.fabric_id,
                    principal = %row.edge_principal_wwn,
                    "edge fabric principal switch is not labeled"
                );
                continue;
            };
            let id = backbone_id(&row.fabric_name, &row.fabric_label, row.fabric_id);
            resolver
                .ids_by_edge
                .entry(edge.clone())
                .or_default()
                .insert(id.clone());
            resolver
                .edge_by_id
                .entry(id)
                .or_default()
                .insert(edge.clone());
        }
        for row in fcredge {
            let id = backbone_id(&row.fabric_name, &row.fabric_label, row.imported_fabric_id);
            resolver
                .exported_ids
                .entry((id, normalize_wwn(&row.port_name)))
                .or_default()
                .insert(row.exported_fabric_id);
        }
        for row in lsan {
            let Some(state) = row.state else {
                continue;
            };
            let id = backbone_id(&row.fabric_name, &row.fabric_label, row.fabric_id);
            resolver
                .states
                .entry((
                    id,
                    row.zone_name.trim().to_ascii_lowercase(),
                    normalize_wwn(&row.zone_member),
                ))
                .or_default()
                .insert(state.into());
        }
        debug!(
            edges = resolver.ids_by_edge.len(),
            proxies = resolver.exported_ids.len(),
            states = resolver.states.len(),
            "built LSAN routing tables"
        );
        resolver
    }

    /// Resolve one member of an LSAN zone defined in `home`.
    pub fn resolve(&self, home: &FabricRef, zone_name: &str, wwnp: &str) -> Option<LsanResolution> {
        let ids = self.ids_by_edge.get(home)?;
        let zone = zone_name.trim().to_ascii_lowercase();
        let mut fabrics = BTreeSet::new();
        let mut states = BTreeSet::new();
        for id in ids {
            let exported = self
                .exported_ids
                .get(&(id.clone(), wwnp.to_string()))
                .into_iter()
                .flatten();
            for exported_id in exported {
                let exported_key = (id.0.clone(), *exported_id);
                if let Some(edges) = self.edge_by_id.get(&exported_key) {
                    fabrics.extend(edges.iter().cloned());
                }
            }
            if let Some(found) = self
                .states
                .get(&(id.clone(), zone.clone(), wwnp.to_string()))
            {
                states.extend(found.iter().copied());
            }
        }
        if fabrics.is_empty() && states.is_empty() {
            return None;
        }
        Some(LsanResolution {
            fabric: fabrics.into_iter().next(),
            state: states.into_iter().next().map(|StateRank(_, state)| state),
        })
    }
}

fn backbone_id(fabric_name: &str, fabric_label: &str, fabric_id: u32) -> BackboneId {
    (FabricRef::new(fabric_name, fabric_label), fabric_id)
}

/// Fill the LSAN columns of every LSAN zone member.
pub fn resolve_lsan_members(rows: &mut [ZoningRow], resolver: &LsanResolver) {
    let mut resolved = 0usize;
    for row in rows.iter_mut().filter(|r| r.lsan_zone) {
        let Some(wwnp) = row.resolution.wwnp.as_deref() else {
            continue;
        };
        let home = FabricRef::new(&row.fabric_name, &row.fabric_label);
        row.lsan = resolver.resolve(&home, &row.zone_name, wwnp);
        if row.lsan.is_some() {
            resolved += 1;
        }
    }
    debug!(resolved, "resolved LSAN zone members");
}

#[cfg(test)]
mod tests {
    use san_snapshot::{FabricLabelRow, FcrEdgeRow, FcrFabricRow, LsanMemberRow, LsanState};

    use super::LsanResolver;
    use crate::fabric_index::FabricLabelIndex;
    use crate::model::FabricRef;

    const HOST: &str = "10:00:00:00:c9:00:00:01";

    fn labels() -> FabricLabelIndex {
        let row = |switch: &str, name: &str| FabricLabelRow {
            config_id: "c1".to_string(),
            switch_wwn: switch.to_string(),
            fabric_name: name.to_string(),
            fabric_label: "A".to_string(),
        };
        FabricLabelIndex::from_rows(&[
            row("10:00:00:05:1e:00:00:01", "EDGE1"),
            row("10:00:00:05:1e:00:00:02", "EDGE2"),
        ])
    }

    fn fcr(fabric_id: u32, principal: &str) -> FcrFabricRow {
        FcrFabricRow {
            fabric_name: "BB".to_string(),
            fabric_label: "A".to_string(),
            router_wwn: "10:00:00:05:1e:00:00:99".to_string(),
            fabric_id,
            edge_principal_wwn: principal.to_string(),
            edge_config_id: None,
        }
    }

    fn resolver(state: Option<LsanState>) -> LsanResolver {
        let fabrics = vec![
            fcr(1, "10:00:00:05:1e:00:00:01"),
            fcr(2, "10:00:00:05:1e:00:00:02"),
        ];
        let edges = vec![FcrEdgeRow {
            fabric_name: "BB".to_string(),
            fabric_label: "A".to_string(),
            router_wwn: "10:00:00:05:1e:00:00:99".to_string(),
            exported_fabric_id: 2,
            imported_fabric_id: 1,
            port_name: HOST.to_string(),
        }];
        let lsan = vec![LsanMemberRow {
            fabric_name: "BB".to_string(),
            fabric_label: "A".to_string(),
            router_wwn: "10:00:00:05:1e:00:00:99".to_string(),
            fabric_id: 1,
            zone_name: "LSAN_host1_array1".to_string(),
            zone_member: HOST.to_string(),
            state,
        }];
        LsanResolver::new(&fabrics, &lsan, &edges, &labels())
    }

    #[test]
    fn recovers_true_fabric_and_state() {
        let resolver = resolver(Some(LsanState::Imported));

        let found = resolver
            .resolve(&FabricRef::new("EDGE1", "A"), "lsan_host1_array1", HOST)
            .expect("resolved");

        assert_eq!(found.fabric, Some(FabricRef::new("EDGE2", "A")));
        assert_eq!(found.state, Some(LsanState::Imported));
    }

    #[test]
    fn unrouted_fabric_is_not_resolved() {
        let resolver = resolver(Some(LsanState::Configured));
        assert!(resolver
            .resolve(&FabricRef::new("OTHER", "A"), "lsan_host1_array1", HOST)
            .is_none());
    }

    #[test]
    fn member_without_routing_records_is_not_resolved() {
        let resolver = resolver(Some(LsanState::Imported));
        assert!(resolver
            .resolve(
                &FabricRef::new("EDGE1", "A"),
                "lsan_host1_array1",
                "50:00:00:00:00:00:00:01",
            )
            .is_none());
    }

    #[test]
    fn configured_state_is_reported() {
        let resolver = resolver(Some(LsanState::Configured));

        let found = resolver
            .resolve(&FabricRef::new("EDGE1", "A"), "LSAN_HOST1_ARRAY1", HOST)
            .expect("resolved");

        assert_eq!(found.state, Some(LsanState::Configured));
    }

    #[test]
    fn edge_configuration_selects_principal_label() {
        let row = |config_id: &str, name: &str| FabricLabelRow {
            config_id: config_id.to_string(),
            switch_wwn: "10:00:00:05:1e:00:00:01".to_string(),
            fabric_name: name.to_string(),
            fabric_label: "A".to_string(),
        };
        let labels = FabricLabelIndex::from_rows(&[row("c1", "EDGE1"), row("c2", "EDGE9")]);
        let mut fabric = fcr(1, "10:00:00:05:1e:00:00:01");
        fabric.edge_config_id = Some("c2".to_string());
        let lsan = vec![LsanMemberRow {
            fabric_name: "BB".to_string(),
            fabric_label: "A".to_string(),
            router_wwn: "10:00:00:05:1e:00:00:99".to_string(),
            fabric_id: 1,
            zone_name: "lsan_z".to_string(),
            zone_member: HOST.to_string(),
            state: Some(LsanState::Configured),
        }];

        let resolver = LsanResolver::new(&[fabric], &lsan, &[], &labels);

        assert!(resolver
            .resolve(&FabricRef::new("EDGE1", "A"), "lsan_z", HOST)
            .is_none());
        let found = resolver
            .resolve(&FabricRef::new("EDGE9", "A"), "lsan_z", HOST)
            .expect("resolved");
        assert_eq!(found.state, Some(LsanState::Configured));
    }
}
