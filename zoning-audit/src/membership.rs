//! Fabric membership classification.
//!
//! Assigns every member exactly one [`FabricDeviceStatus`] relative to the
//! fabric its configuration (or alias) is defined in. Rules run top to bottom
//! and the first match wins; `absent` is the fallback, so no row is left
//! unclassified.
//!
//! The member's resolved fabric is the LSAN true fabric when the routers
//! report one, otherwise the fabric of its physical attachment.

use san_snapshot::LsanState;

use crate::model::{FabricDeviceStatus, FabricRef, MemberRecord};

/// Facts a membership rule looks at.
#[derive(Debug, Clone, Copy)]
pub struct MemberFacts<'a> {
    pub home: (&'a str, &'a str),
    pub resolved: Option<&'a FabricRef>,
    pub lsan_state: Option<LsanState>,
}

type Rule = (fn(&MemberFacts<'_>) -> bool, FabricDeviceStatus);

pub const RULES: [Rule; 5] = [
    (is_local, FabricDeviceStatus::Local),
    (is_imported, FabricDeviceStatus::RemoteImported),
    (is_configured, FabricDeviceStatus::RemoteConfigured),
    (is_initializing, FabricDeviceStatus::RemoteInitializing),
    (is_elsewhere, FabricDeviceStatus::RemoteNa),
];

fn is_local(facts: &MemberFacts<'_>) -> bool {
    facts
        .resolved
        .is_some_and(|fabric| fabric.matches(facts.home.0, facts.home.1))
}

fn is_imported(facts: &MemberFacts<'_>) -> bool {
    facts.lsan_state == Some(LsanState::Imported)
}

fn is_configured(facts: &MemberFacts<'_>) -> bool {
    facts.lsan_state == Some(LsanState::Configured)
}

fn is_initializing(facts: &MemberFacts<'_>) -> bool {
    facts.lsan_state == Some(LsanState::Initializing)
}

fn is_elsewhere(facts: &MemberFacts<'_>) -> bool {
    facts.resolved.is_some()
}

/// Evaluate the rule table for one member.
pub fn classify(facts: &MemberFacts<'_>) -> FabricDeviceStatus {
    RULES
        .iter()
        .find(|(matches, _)| matches(facts))
        .map_or(FabricDeviceStatus::Absent, |(_, status)| *status)
}

/// `Member_in_cfg_Fabric`: reachable from the configuration's fabric,
/// known but elsewhere, or never observed.
pub fn member_in_cfg_fabric(status: FabricDeviceStatus) -> Option<bool> {
    match status {
        FabricDeviceStatus::Local | FabricDeviceStatus::RemoteImported => Some(true),
        FabricDeviceStatus::RemoteConfigured
        | FabricDeviceStatus::RemoteInitializing
        | FabricDeviceStatus::RemoteNa => Some(false),
        FabricDeviceStatus::Absent => None,
    }
}

/// Classify every row in place.
pub fn classify_members<T: MemberRecord>(rows: &mut [T]) {
    for row in rows.iter_mut() {
        let attached = row.resolution().attachment.as_ref().map(|a| a.fabric());
        let lsan = row.lsan();
        let resolved = lsan.and_then(|l| l.fabric.as_ref()).or(attached.as_ref());
        let facts = MemberFacts {
            home: row.home_fabric(),
            resolved,
            lsan_state: lsan.and_then(|l| l.state),
        };
        let status = classify(&facts);
        let resolution = row.resolution_mut();
        resolution.fabric_device_status = status;
        resolution.member_in_cfg_fabric = member_in_cfg_fabric(status);
    }
}

#[cfg(test)]
mod tests {
    use san_snapshot::LsanState;

    use super::{classify, member_in_cfg_fabric, MemberFacts};
    use crate::model::{FabricDeviceStatus, FabricRef};

    fn facts<'a>(resolved: Option<&'a FabricRef>, state: Option<LsanState>) -> MemberFacts<'a> {
        MemberFacts {
            home: ("BB", "A"),
            resolved,
            lsan_state: state,
        }
    }

    #[test]
    fn local_wins_over_lsan_state() {
        let home = FabricRef::new("BB", "A");
        let status = classify(&facts(Some(&home), Some(LsanState::Configured)));
        assert_eq!(status, FabricDeviceStatus::Local);
        assert_eq!(member_in_cfg_fabric(status), Some(true));
    }

    #[test]
    fn imported_member_of_other_fabric_is_reachable() {
        let other = FabricRef::new("Y", "A");
        let status = classify(&facts(Some(&other), Some(LsanState::Imported)));
        assert_eq!(status, FabricDeviceStatus::RemoteImported);
        assert_eq!(member_in_cfg_fabric(status), Some(true));
    }

    #[test]
    fn imported_state_without_resolved_fabric_is_reachable() {
        let status = classify(&facts(None, Some(LsanState::Imported)));
        assert_eq!(status, FabricDeviceStatus::RemoteImported);
        assert_eq!(member_in_cfg_fabric(status), Some(true));
    }

    #[test]
    fn configured_and_initializing_do_not_need_a_fabric() {
        assert_eq!(
            classify(&facts(None, Some(LsanState::Configured))),
            FabricDeviceStatus::RemoteConfigured
        );
        assert_eq!(
            classify(&facts(None, Some(LsanState::Initializing))),
            FabricDeviceStatus::RemoteInitializing
        );
    }

    #[test]
    fn known_elsewhere_and_never_seen_differ() {
        let other = FabricRef::new("X", "B");
        let status = classify(&facts(Some(&other), None));
        assert_eq!(status, FabricDeviceStatus::RemoteNa);
        assert_eq!(member_in_cfg_fabric(status), Some(false));

        let status = classify(&facts(None, None));
        assert_eq!(status, FabricDeviceStatus::Absent);
        assert_eq!(member_in_cfg_fabric(status), None);
    }
}
