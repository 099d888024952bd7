use anyhow::{bail, Context, Result};
use san_snapshot::write_file;
use zoning_audit::report::render_summary;

use crate::cli::{AggregateArgs, OutputFormat};
use crate::run_pipeline;

pub fn run_aggregate(args: AggregateArgs) -> Result<()> {
    let report = run_pipeline(&args.snapshot, args.settings.as_deref())?;

    if let Some(path) = &args.output {
        write_file(&report, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    match args.format {
        OutputFormat::Text => println!("{}", render_summary(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if args.strict && report.has_failures() {
        let names = report
            .failed_fabrics
            .iter()
            .map(|f| format!("{}/{}", f.fabric_name, f.fabric_label))
            .collect::<Vec<_>>();
        bail!(
            "strict mode failed: fabrics could not be analyzed: {}",
            names.join(", ")
        );
    }

    Ok(())
}
