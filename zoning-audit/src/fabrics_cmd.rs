use anyhow::Result;
use serde::Serialize;
use zoning_audit::report::render_fabrics;
use zoning_audit::statistics::{FabricStatistics, FabricSymmetry};

use crate::cli::{FabricsArgs, OutputFormat};
use crate::run_pipeline;

#[derive(Serialize)]
struct FabricsReport {
    fabrics: Vec<FabricStatistics>,
    symmetry: Vec<FabricSymmetry>,
}

pub fn run_fabrics(args: FabricsArgs) -> Result<()> {
    let report = run_pipeline(&args.snapshot, args.settings.as_deref())?;

    match args.format {
        OutputFormat::Text => println!("{}", render_fabrics(&report.fabrics, &report.symmetry)),
        OutputFormat::Json => {
            let out = FabricsReport {
                fabrics: report.fabrics,
                symmetry: report.symmetry,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
