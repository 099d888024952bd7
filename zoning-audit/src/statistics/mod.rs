//! Zone, configuration and fabric rollups with qualitative findings.
//!
//! ## Findings
//!
//! - **Target_Initiator_note**: target/initiator balance of a zone, from an
//!   ordered decision table
//! - **Target_model_note**: storage model or storage/library mixing
//! - **Zone_member_note**: node WWN use, unpacking, repeated ports and
//!   members outside the fabric
//! - **Asymmetry_note**: rollup columns that differ between the labels of
//!   one fabric
//!
//! Zone findings are also copied back onto every zoning row of the zone.

mod cfg_stats;
mod fabric_stats;
mod notes;
mod zone_stats;

pub use cfg_stats::{summarize_configurations, CfgStatistics};
pub use fabric_stats::{fabric_symmetry, summarize_fabrics, FabricStatistics, FabricSymmetry};
pub use notes::{member_notes, model_note, target_initiator_note, ZoneFacts};
pub use zone_stats::{apply_zone_notes, summarize_zones, StatusCounts, ZoneCounts, ZoneStatistics};
