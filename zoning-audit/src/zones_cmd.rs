use anyhow::Result;
use zoning_audit::report::render_zones;

use crate::cli::{OutputFormat, ZonesArgs};
use crate::run_pipeline;

pub fn run_zones(args: ZonesArgs) -> Result<()> {
    let report = run_pipeline(&args.snapshot, args.settings.as_deref())?;
    let zones = report
        .zones
        .into_iter()
        .filter(|z| !args.notes_only || z.has_findings())
        .collect::<Vec<_>>();

    match args.format {
        OutputFormat::Text => println!("{}", render_zones(&zones, args.notes_only)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&zones)?),
    }

    Ok(())
}
