use colored::Colorize;

use crate::error::FabricFailure;
use crate::pipeline::ZoningReport;
use crate::statistics::{CfgStatistics, FabricStatistics, FabricSymmetry, ZoneStatistics};

/// Render the aggregation summary for terminal output.
pub fn render_summary(report: &ZoningReport) -> String {
    let mut out = Vec::new();
    out.push(
        format!(
            "zoning rows={} aliases={} zones={} configurations={} fabrics={}",
            report.zoning.len(),
            report.aliases.len(),
            report.zones.len(),
            report.configurations.len(),
            report.fabrics.len()
        )
        .cyan()
        .to_string(),
    );

    out.push(String::new());
    out.push("configurations".to_string());
    for cfg in &report.configurations {
        out.push(render_configuration(cfg));
    }

    let flagged = report.zones.iter().filter(|z| z.has_findings()).count();
    out.push(String::new());
    out.push(format!("zones_with_findings={flagged}"));

    let asymmetric = report
        .symmetry
        .iter()
        .filter(|s| s.asymmetry_note.is_some())
        .collect::<Vec<_>>();
    if !asymmetric.is_empty() {
        out.push(String::new());
        out.push("asymmetry".to_string());
        for symmetry in asymmetric {
            out.push(render_symmetry(symmetry));
        }
    }

    if !report.failed_fabrics.is_empty() {
        out.push(String::new());
        out.push("failed_fabrics".to_string());
        for failure in &report.failed_fabrics {
            out.push(render_failure(failure));
        }
    }
    out.join("\n")
}

fn render_configuration(cfg: &CfgStatistics) -> String {
    let notes = cfg
        .target_initiator_notes
        .iter()
        .map(|(note, count)| format!("{note}={count}"))
        .collect::<Vec<_>>();
    let mut line = format!(
        "- {}/{} {} ({}): zones={} members={} local={} remote={} absent={} duplicated={} paired={}",
        cfg.fabric_name,
        cfg.fabric_label,
        cfg.cfg_name,
        cfg.cfg_type,
        cfg.zone_quantity,
        cfg.member_quantity,
        cfg.status.local,
        cfg.status.total() - cfg.status.local - cfg.status.absent,
        cfg.status.absent,
        cfg.duplicated_zones,
        cfg.paired_zones
    );
    if !notes.is_empty() {
        line.push_str(&format!(" notes=[{}]", notes.join(" ")));
    }
    line
}

fn render_failure(failure: &FabricFailure) -> String {
    format!(
        "- {}/{}: {}",
        failure.fabric_name, failure.fabric_label, failure.reason
    )
    .red()
    .to_string()
}

/// Render per-zone statistics and findings.
pub fn render_zones(zones: &[ZoneStatistics], notes_only: bool) -> String {
    let mut out = Vec::new();
    for zone in zones.iter().filter(|z| !notes_only || z.has_findings()) {
        let header = format!(
            "{}/{} {} ({}) {}",
            zone.fabric_name, zone.fabric_label, zone.cfg_name, zone.cfg_type, zone.zone_name
        );
        out.push(header.bold().to_string());
        let counts = &zone.counts;
        out.push(format!(
            "  members={} srv={} storage={} lib={} unknown={} local={} absent={}",
            counts.member_quantity,
            counts.srv,
            counts.storage,
            counts.lib,
            counts.unknown_device,
            counts.status.local,
            counts.status.absent
        ));
        if let Some(note) = zone.target_initiator_note {
            out.push(format!("  target_initiator: {}", note.as_str().yellow()));
        }
        push_note(&mut out, "target_model", zone.target_model_note.as_deref());
        push_note(&mut out, "zone_member", zone.zone_member_note.as_deref());
        push_note(&mut out, "duplicates", zone.zone_duplicates.as_deref());
        push_note(&mut out, "pairs", zone.zone_paired_note.as_deref());
    }
    if out.is_empty() {
        out.push("no zones".to_string());
    }
    out.join("\n")
}

fn push_note(out: &mut Vec<String>, name: &str, note: Option<&str>) {
    if let Some(note) = note {
        out.push(format!("  {name}: {}", note.yellow()));
    }
}

/// Render fabric rollups followed by the label symmetry check.
pub fn render_fabrics(fabrics: &[FabricStatistics], symmetry: &[FabricSymmetry]) -> String {
    let mut out = Vec::new();
    out.push("fabrics".to_string());
    for fabric in fabrics {
        out.push(format!(
            "- {}/{}: switches={} ports={} bandwidth_gbps={} effective_zones={} defined_zones={} aliases={}",
            fabric.fabric_name,
            fabric.fabric_label,
            fabric.switch_quantity,
            fabric.port_quantity,
            fabric.bandwidth_gbps,
            fabric.effective_zone_quantity,
            fabric.defined_zone_quantity,
            fabric.alias_quantity
        ));
    }
    out.push(String::new());
    out.push("symmetry".to_string());
    for item in symmetry {
        out.push(render_symmetry(item));
    }
    out.join("\n")
}

fn render_symmetry(symmetry: &FabricSymmetry) -> String {
    let labels = symmetry.labels.join(",");
    match symmetry.asymmetry_note.as_deref() {
        Some(note) => format!(
            "- {} [{}]: {}",
            symmetry.fabric_name,
            labels,
            note.red()
        ),
        None => format!("- {} [{}]: {}", symmetry.fabric_name, labels, "symmetric".green()),
    }
}

#[cfg(test)]
mod tests {
    use super::{render_fabrics, render_zones};
    use crate::model::CfgType;
    use crate::statistics::{FabricStatistics, FabricSymmetry, ZoneCounts, ZoneStatistics};

    fn zone(name: &str, note: Option<&str>) -> ZoneStatistics {
        ZoneStatistics {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            cfg_name: "prod".to_string(),
            cfg_type: CfgType::Effective,
            zone_name: name.to_string(),
            peer_zone: false,
            lsan_zone: false,
            counts: ZoneCounts::default(),
            storage_models: Vec::new(),
            zone_duplicates_free: None,
            zone_duplicates: None,
            zone_paired_note: None,
            target_initiator_note: None,
            target_model_note: None,
            zone_member_note: note.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn notes_only_hides_clean_zones() {
        colored::control::set_override(false);
        let zones = vec![zone("clean", None), zone("dirty", Some("absent_member"))];

        let text = render_zones(&zones, true);

        assert!(text.contains("dirty"));
        assert!(text.contains("zone_member: absent_member"));
        assert!(!text.contains("clean"));
    }

    #[test]
    fn fabrics_list_asymmetric_columns() {
        colored::control::set_override(false);
        let fabrics = vec![FabricStatistics {
            fabric_name: "SAN1".to_string(),
            fabric_label: "A".to_string(),
            ..FabricStatistics::default()
        }];
        let symmetry = vec![FabricSymmetry {
            fabric_name: "SAN1".to_string(),
            labels: vec!["A".to_string(), "B".to_string()],
            asymmetry_note: Some("bandwidth_gbps".to_string()),
        }];

        let text = render_fabrics(&fabrics, &symmetry);

        assert!(text.contains("- SAN1 [A,B]: bandwidth_gbps"));
    }
}
