//! WWN type classification.
//!
//! A member value is classified against the port and node WWN catalogues of
//! the device attachment snapshot. Rules are evaluated in order and the first
//! match wins:
//!
//! 1. known as both a port and a node WWN -> `Wwnp`
//! 2. known port WWN -> `Wwnp`
//! 3. known node WWN -> `Wwnn`
//! 4. anything else -> `unknown`

use std::collections::BTreeSet;

use san_snapshot::{normalize_wwn, DeviceAttachment};

use crate::model::{MemberRecord, WwnType};

/// Immutable port and node WWN universes of one run.
#[derive(Debug, Clone, Default)]
pub struct WwnCatalogue {
    ports: BTreeSet<String>,
    nodes: BTreeSet<String>,
}

type Rule = (fn(&WwnCatalogue, &str) -> bool, WwnType);

const RULES: [Rule; 3] = [
    (is_port_and_node, WwnType::Wwnp),
    (is_port, WwnType::Wwnp),
    (is_node, WwnType::Wwnn),
];

impl WwnCatalogue {
    pub fn from_attachments(attachments: &[DeviceAttachment]) -> Self {
        let mut catalogue = Self::default();
        for row in attachments {
            catalogue.ports.insert(normalize_wwn(&row.port_name));
            if let Some(node) = row.node_name.as_deref() {
                catalogue.nodes.insert(normalize_wwn(node));
            }
        }
        catalogue
    }

    pub fn classify(&self, value: &str) -> WwnType {
        RULES
            .iter()
            .find(|(matches, _)| matches(self, value))
            .map_or(WwnType::Unknown, |(_, wwn_type)| *wwn_type)
    }
}

fn is_port_and_node(catalogue: &WwnCatalogue, value: &str) -> bool {
    is_port(catalogue, value) && is_node(catalogue, value)
}

fn is_port(catalogue: &WwnCatalogue, value: &str) -> bool {
    catalogue.ports.contains(value)
}

fn is_node(catalogue: &WwnCatalogue, value: &str) -> bool {
    catalogue.nodes.contains(value)
}

/// Fill `wwn_type` on every row. Rows without a member stay unclassified.
pub fn classify_members<T: MemberRecord>(rows: &mut [T], catalogue: &WwnCatalogue) {
    for row in rows.iter_mut() {
        let wwn_type = row.member_value().map(|value| catalogue.classify(value));
        row.resolution_mut().wwn_type = wwn_type;
    }
}
