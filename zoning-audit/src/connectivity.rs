//! Device connectivity resolution.
//!
//! Attaches the physical location of each strict port WWN from the device
//! attachment snapshot. Attachments reported through access gateway switches
//! are skipped: the same port is also visible on the native switch the
//! gateway logs into, and keeping both would report one device twice.

use std::collections::BTreeMap;

use san_snapshot::{normalize_wwn, DeviceAttachment};
use tracing::debug;

use crate::model::{MemberAttachment, MemberRecord};
use crate::settings::AuditSettings;

/// Port WWN -> attachments relation restricted to native mode switches.
///
/// A port normally has one attachment. When it has several (stale
/// collections, for example) the attachment in the member's home fabric is
/// preferred, then the first one in fabric/switch/port order. The relation
/// never multiplies rows.
#[derive(Debug, Clone, Default)]
pub struct AttachmentIndex {
    by_port: BTreeMap<String, Vec<MemberAttachment>>,
}

impl AttachmentIndex {
    pub fn new(attachments: &[DeviceAttachment], settings: &AuditSettings) -> Self {
        let mut by_port: BTreeMap<String, Vec<MemberAttachment>> = BTreeMap::new();
        let mut skipped = 0usize;
        for row in attachments {
            if settings.is_gateway_mode(&row.switch_mode) {
                skipped += 1;
                continue;
            }
            by_port
                .entry(normalize_wwn(&row.port_name))
                .or_default()
                .push(to_member_attachment(row));
        }
        for found in by_port.values_mut() {
            found.sort_by(|a, b| {
                (&a.fabric_name, &a.fabric_label, &a.switch_name, &a.port).cmp(&(
                    &b.fabric_name,
                    &b.fabric_label,
                    &b.switch_name,
                    &b.port,
                ))
            });
        }
        debug!(
            ports = by_port.len(),
            gateway_skipped = skipped,
            "indexed device attachments"
        );
        Self { by_port }
    }

    /// All attachments of a port.
    pub fn matches(&self, wwnp: &str) -> &[MemberAttachment] {
        self.by_port
            .get(wwnp)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The attachment used for a member of `home` fabric.
    pub fn resolve(&self, wwnp: &str, home: (&str, &str)) -> Option<&MemberAttachment> {
        let found = self.matches(wwnp);
        found
            .iter()
            .find(|a| a.fabric_name == home.0 && a.fabric_label == home.1)
            .or_else(|| found.first())
    }
}

fn to_member_attachment(row: &DeviceAttachment) -> MemberAttachment {
    MemberAttachment {
        fabric_name: row.fabric_name.clone(),
        fabric_label: row.fabric_label.clone(),
        switch_name: row.switch_name.clone(),
        switch_wwn: normalize_wwn(&row.switch_wwn),
        port: row.port.clone(),
        node_name: row.node_name.as_deref().map(normalize_wwn),
        device_host_name: row
            .device_host_name
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(ToOwned::to_owned),
        device_class: row.device_class,
        device_model: row.device_model.clone(),
    }
}

/// Fill the attachment columns of every row with a strict port WWN.
pub fn attach_members<T: MemberRecord>(rows: &mut [T], index: &AttachmentIndex) {
    let mut attached = 0usize;
    for row in rows.iter_mut() {
        let found = row
            .resolution()
            .wwnp
            .as_deref()
            .and_then(|wwnp| index.resolve(wwnp, row.home_fabric()))
            .cloned();
        if found.is_some() {
            attached += 1;
        }
        row.resolution_mut().attachment = found;
    }
    debug!(rows = rows.len(), attached, "resolved member connectivity");
}
