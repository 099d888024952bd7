//! Zone finding rules.

use super::zone_stats::ZoneCounts;
use crate::model::TargetInitiatorNote;

/// Counts a zone finding rule looks at.
#[derive(Debug, Clone, Default)]
pub struct ZoneFacts {
    pub counts: ZoneCounts,
    pub peer_zone: bool,
    /// Distinct storage models among attached storage members.
    pub storage_models: usize,
}

impl ZoneFacts {
    fn targets(&self) -> usize {
        self.counts.storage + self.counts.lib
    }
}

type Rule = (fn(&ZoneFacts) -> bool, TargetInitiatorNote);

/// Evaluated in order; the first matching rule names the zone.
pub const TARGET_INITIATOR_RULES: [Rule; 7] = [
    (nothing_present, TargetInitiatorNote::NoTargetNoInitiator),
    (storage_only, TargetInitiatorNote::ReplicationZone),
    (unreachable_initiator, TargetInitiatorNote::NoInitiator),
    (single_initiator_alone, TargetInitiatorNote::NoTarget),
    (peer_initiators_alone, TargetInitiatorNote::NoTarget),
    (initiators_alone, TargetInitiatorNote::NoTargetSeveralInitiators),
    (several_initiators, TargetInitiatorNote::SeveralInitiators),
];

fn nothing_present(facts: &ZoneFacts) -> bool {
    facts.counts.present == 0
}

fn storage_only(facts: &ZoneFacts) -> bool {
    facts.counts.member_quantity > 1 && facts.counts.storage == facts.counts.member_quantity
}

fn unreachable_initiator(facts: &ZoneFacts) -> bool {
    facts.counts.srv == 0 && facts.targets() >= 1 && facts.counts.unreachable > 0
}

fn single_initiator_alone(facts: &ZoneFacts) -> bool {
    facts.counts.srv == 1 && facts.targets() == 0
}

fn peer_initiators_alone(facts: &ZoneFacts) -> bool {
    facts.peer_zone && initiators_alone(facts)
}

fn initiators_alone(facts: &ZoneFacts) -> bool {
    facts.counts.srv > 1 && facts.targets() == 0
}

fn several_initiators(facts: &ZoneFacts) -> bool {
    facts.counts.srv > 1
}

pub fn target_initiator_note(facts: &ZoneFacts) -> Option<TargetInitiatorNote> {
    TARGET_INITIATOR_RULES
        .iter()
        .find(|(matches, _)| matches(facts))
        .map(|(_, note)| *note)
}

/// Storage heterogeneity inside one zone.
///
/// Replication zones and zones without a reachable initiator are skipped.
pub fn model_note(facts: &ZoneFacts, ti_note: Option<TargetInitiatorNote>) -> Option<String> {
    if matches!(
        ti_note,
        Some(TargetInitiatorNote::ReplicationZone | TargetInitiatorNote::NoInitiator)
    ) {
        return None;
    }
    let mut notes = Vec::new();
    if facts.storage_models > 1 {
        notes.push("storage_models_mixed");
    }
    if facts.counts.storage > 0 && facts.counts.lib > 0 {
        notes.push("storage_library_mixed");
    }
    join_notes(&notes)
}

/// Member level findings, in fixed order.
pub fn member_notes(facts: &ZoneFacts) -> Option<String> {
    let counts = &facts.counts;
    let checks = [
        (counts.wwnn > 0, "wwnn_in_zone"),
        (counts.unpacked_nodes > 0, "wwnn_unpacked"),
        (counts.duplicated_ports > 0, "wwnp_duplicated"),
        (counts.status.absent > 0, "absent_member"),
        (counts.status.remote_na > 0, "remote_na_member"),
    ];
    let notes = checks
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, note)| *note)
        .collect::<Vec<_>>();
    join_notes(&notes)
}

fn join_notes(notes: &[&str]) -> Option<String> {
    (!notes.is_empty()).then(|| notes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::{member_notes, model_note, target_initiator_note, ZoneFacts};
    use crate::model::TargetInitiatorNote;

    fn facts(srv: usize, storage: usize, lib: usize, unreachable: usize) -> ZoneFacts {
        let mut facts = ZoneFacts::default();
        facts.counts.srv = srv;
        facts.counts.storage = storage;
        facts.counts.lib = lib;
        facts.counts.member_quantity = srv + storage + lib;
        facts.counts.present = srv + storage + lib;
        facts.counts.unreachable = unreachable;
        facts
    }

    #[test]
    fn decision_table_order() {
        assert_eq!(
            target_initiator_note(&ZoneFacts::default()),
            Some(TargetInitiatorNote::NoTargetNoInitiator)
        );
        assert_eq!(
            target_initiator_note(&facts(0, 2, 0, 0)),
            Some(TargetInitiatorNote::ReplicationZone)
        );
        assert_eq!(
            target_initiator_note(&facts(0, 1, 1, 1)),
            Some(TargetInitiatorNote::NoInitiator)
        );
        assert_eq!(
            target_initiator_note(&facts(1, 0, 0, 0)),
            Some(TargetInitiatorNote::NoTarget)
        );
        assert_eq!(
            target_initiator_note(&facts(2, 0, 0, 0)),
            Some(TargetInitiatorNote::NoTargetSeveralInitiators)
        );
        assert_eq!(
            target_initiator_note(&facts(3, 1, 0, 0)),
            Some(TargetInitiatorNote::SeveralInitiators)
        );
        assert_eq!(target_initiator_note(&facts(1, 1, 0, 0)), None);
    }

    #[test]
    fn peer_zone_initiators_are_no_target_only() {
        let mut peer = facts(2, 0, 0, 0);
        peer.peer_zone = true;
        assert_eq!(
            target_initiator_note(&peer),
            Some(TargetInitiatorNote::NoTarget)
        );
    }

    #[test]
    fn model_check_skips_replication_zones() {
        let mut mixed = facts(0, 2, 0, 0);
        mixed.storage_models = 2;
        assert_eq!(
            model_note(&mixed, Some(TargetInitiatorNote::ReplicationZone)),
            None
        );

        let mut mixed = facts(1, 2, 1, 0);
        mixed.storage_models = 2;
        assert_eq!(
            model_note(&mixed, None).as_deref(),
            Some("storage_models_mixed, storage_library_mixed")
        );
    }

    #[test]
    fn member_notes_keep_fixed_order() {
        let mut zone = facts(1, 1, 0, 0);
        zone.counts.status.remote_na = 1;
        zone.counts.wwnn = 2;
        zone.counts.unpacked_nodes = 1;
        assert_eq!(
            member_notes(&zone).as_deref(),
            Some("wwnn_in_zone, wwnn_unpacked, remote_na_member")
        );
        assert_eq!(member_notes(&facts(1, 1, 0, 0)), None);
    }
}
