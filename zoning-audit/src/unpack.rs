//! Node-to-port unpacking.
//!
//! Members classified as node WWNs are rewritten into the port WWNs sharing
//! that node identity. The relation is one-to-many: a node with N ports turns
//! one row into N rows, each with its own strict port WWN. Rows that are
//! already ports, unknown or empty keep their member value as `wwnp`, so the
//! row count never shrinks.

use std::collections::{BTreeMap, BTreeSet};

use san_snapshot::{normalize_wwn, DeviceAttachment};
use tracing::debug;

use crate::model::{AliasRow, MemberRecord, WwnType, ZoningRow};

/// Node WWN -> port WWNs relation from the device attachment snapshot.
#[derive(Debug, Clone, Default)]
pub struct NodePortRelation {
    ports_by_node: BTreeMap<String, Vec<String>>,
}

impl NodePortRelation {
    pub fn from_attachments(attachments: &[DeviceAttachment]) -> Self {
        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for row in attachments {
            let Some(node) = row.node_name.as_deref() else {
                continue;
            };
            grouped
                .entry(normalize_wwn(node))
                .or_default()
                .insert(normalize_wwn(&row.port_name));
        }
        Self {
            ports_by_node: grouped
                .into_iter()
                .map(|(node, ports)| (node, ports.into_iter().collect()))
                .collect(),
        }
    }

    /// Ports of a node, sorted. Empty when the node is unknown.
    pub fn ports(&self, node: &str) -> &[String] {
        self.ports_by_node
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Expand node members into one row per port.
pub fn unpack_members<T: MemberRecord>(rows: Vec<T>, relation: &NodePortRelation) -> Vec<T> {
    let before = rows.len();
    let mut out = Vec::with_capacity(before);
    for mut row in rows {
        let ports = match (row.resolution().wwn_type, row.member_value()) {
            (Some(WwnType::Wwnn), Some(node)) => relation.ports(node),
            _ => &[],
        };
        if ports.is_empty() {
            let wwnp = row.member_value().map(ToOwned::to_owned);
            row.resolution_mut().wwnp = wwnp;
            out.push(row);
            continue;
        }
        for port in ports {
            let mut expanded = row.clone();
            let resolution = expanded.resolution_mut();
            resolution.wwnp = Some(port.clone());
            resolution.unpacked_from_node = true;
            out.push(expanded);
        }
    }
    debug!(before, after = out.len(), "unpacked node WWN members");
    out
}

/// Count how often each port appears inside the same zone.
pub fn count_zone_instances(rows: &mut [ZoningRow]) {
    let mut counts: BTreeMap<(String, String, String, String, String, String), usize> =
        BTreeMap::new();
    let key = |row: &ZoningRow| {
        row.resolution.wwnp.clone().map(|wwnp| {
            (
                row.fabric_name.clone(),
                row.fabric_label.clone(),
                row.cfg_name.clone(),
                row.cfg_type.as_str().to_string(),
                row.zone_name.clone(),
                wwnp,
            )
        })
    };
    for row in rows.iter() {
        if let Some(k) = key(row) {
            *counts.entry(k).or_default() += 1;
        }
    }
    for row in rows.iter_mut() {
        let count = key(&*row).and_then(|k| counts.get(&k).copied());
        row.wwnp_instance_number_per_zone = count.unwrap_or(0);
    }
}

/// Count port repetitions per alias and flag aliases unpacked into several
/// ports through a node WWN.
pub fn count_alias_instances(rows: &mut [AliasRow]) {
    let mut counts: BTreeMap<(String, String, String, String), usize> = BTreeMap::new();
    let mut unpacked_ports: BTreeMap<(String, String, String), BTreeSet<String>> =
        BTreeMap::new();
    for row in rows.iter() {
        let Some(wwnp) = row.resolution.wwnp.clone() else {
            continue;
        };
        *counts
            .entry((
                row.fabric_name.clone(),
                row.fabric_label.clone(),
                row.alias_name.clone(),
                wwnp.clone(),
            ))
            .or_default() += 1;
        if row.resolution.unpacked_from_node {
            unpacked_ports
                .entry((
                    row.fabric_name.clone(),
                    row.fabric_label.clone(),
                    row.alias_name.clone(),
                ))
                .or_default()
                .insert(wwnp);
        }
    }
    for row in rows.iter_mut() {
        let alias_key = (
            row.fabric_name.clone(),
            row.fabric_label.clone(),
            row.alias_name.clone(),
        );
        row.alias_unpacked = unpacked_ports
            .get(&alias_key)
            .is_some_and(|ports| ports.len() > 1);
        row.wwnp_instance_number_per_alias = match row.resolution.wwnp.clone() {
            Some(wwnp) => counts
                .get(&(alias_key.0, alias_key.1, alias_key.2, wwnp))
                .copied()
                .unwrap_or(0),
            None => 0,
        };
    }
}

#[cfg(test)]
mod tests {
    use san_snapshot::{DeviceAttachment, DeviceClass};

    use super::{count_alias_instances, unpack_members, NodePortRelation};
    use crate::model::{AliasRow, FabricRef, WwnType};
    use crate::wwn_type::{classify_members, WwnCatalogue};

    fn attachment(port: &str, node: &str) -> DeviceAttachment {
        DeviceAttachment {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            switch_name: "sw1".to_string(),
            switch_wwn: "10:00:00:05:1e:00:00:01".to_string(),
            switch_mode: "native".to_string(),
            port: None,
            port_name: port.to_string(),
            node_name: Some(node.to_string()),
            device_host_name: Some("array1".to_string()),
            device_class: DeviceClass::Storage,
            device_model: None,
        }
    }

    fn alias_rows(members: &[&str]) -> Vec<AliasRow> {
        let fabric = FabricRef::new("SAN1", "A");
        members
            .iter()
            .map(|m| AliasRow::new(&fabric, "array1", Some(m.to_string())))
            .collect()
    }

    #[test]
    fn node_with_three_ports_expands_into_three_rows() {
        let attachments = vec![
            attachment("50:00:00:00:00:00:00:01", "50:00:00:00:00:00:00:00"),
            attachment("50:00:00:00:00:00:00:02", "50:00:00:00:00:00:00:00"),
            attachment("50:00:00:00:00:00:00:03", "50:00:00:00:00:00:00:00"),
        ];
        let catalogue = WwnCatalogue::from_attachments(&attachments);
        let relation = NodePortRelation::from_attachments(&attachments);
        let mut rows = alias_rows(&["50:00:00:00:00:00:00:00"]);
        classify_members(&mut rows, &catalogue);

        let mut rows = unpack_members(rows, &relation);
        count_alias_instances(&mut rows);

        assert_eq!(rows.len(), 3);
        let ports = rows
            .iter()
            .map(|r| r.resolution.wwnp.as_deref().unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(
            ports,
            vec![
                "50:00:00:00:00:00:00:01",
                "50:00:00:00:00:00:00:02",
                "50:00:00:00:00:00:00:03"
            ]
        );
        assert!(rows.iter().all(|r| r.alias_name == "array1"));
        assert!(rows.iter().all(|r| r.alias_unpacked));
        assert!(rows.iter().all(|r| r.wwnp_instance_number_per_alias == 1));
    }

    #[test]
    fn ambiguous_port_is_not_expanded() {
        let attachments = vec![
            attachment("50:00:00:00:00:00:00:01", "50:00:00:00:00:00:00:00"),
            attachment("50:00:00:00:00:00:00:00", "50:00:00:00:00:00:00:09"),
        ];
        let catalogue = WwnCatalogue::from_attachments(&attachments);
        let relation = NodePortRelation::from_attachments(&attachments);
        let mut rows = alias_rows(&["50:00:00:00:00:00:00:00"]);
        classify_members(&mut rows, &catalogue);
        assert_eq!(rows[0].resolution.wwn_type, Some(WwnType::Wwnp));

        let rows = unpack_members(rows, &relation);

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].resolution.wwnp.as_deref(),
            Some("50:00:00:00:00:00:00:00")
        );
        assert!(!rows[0].resolution.unpacked_from_node);
    }

    #[test]
    fn unknown_and_empty_members_keep_their_value() {
        let relation = NodePortRelation::default();
        let catalogue = WwnCatalogue::default();
        let fabric = FabricRef::new("SAN1", "A");
        let mut rows = vec![
            AliasRow::new(&fabric, "gone", Some("10:00:00:00:00:00:00:99".to_string())),
            AliasRow::new(&fabric, "empty", None),
        ];
        classify_members(&mut rows, &catalogue);

        let rows = unpack_members(rows, &relation);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].resolution.wwn_type, Some(WwnType::Unknown));
        assert_eq!(
            rows[0].resolution.wwnp.as_deref(),
            Some("10:00:00:00:00:00:00:99")
        );
        assert_eq!(rows[1].resolution.wwn_type, None);
        assert_eq!(rows[1].resolution.wwnp, None);
    }
}
