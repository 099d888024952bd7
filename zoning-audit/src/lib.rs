//! Fibre Channel SAN zoning aggregation and consistency analysis.
//!
//! This library turns a statically collected SAN snapshot (zoning
//! configurations, aliases, peer zones, FC-routing state and device
//! attachments) into a flat, annotated view of every zone member, and derives
//! per-zone, per-configuration and per-fabric findings from it. Zoning is
//! configured per fabric by hand and drifts over time; this crate finds the
//! drift without touching any switch.
//!
//! # Architecture
//!
//! The library is organized as a pipeline of stages. Each stage only adds
//! columns to the rows built by the flattener.
//!
//! ## Resolution
//!
//! - [`flatten`] — Join `cfg -> zone -> alias` into one row per member
//! - [`wwn_type`] — Classify members as port or node WWNs
//! - [`unpack`] — Expand node WWNs into the ports sharing them
//! - [`connectivity`] — Attach the physical location of each port
//! - [`fabric_index`] — Switch WWN to fabric name/label lookup
//! - [`lsan`] — Recover the true fabric of routed (LSAN) members
//! - [`membership`] — Classify each member against its configuration's fabric
//! - [`alias_scope`] — Tag aliases as effective, defined or unused
//!
//! ## Cross-referencing
//!
//! - [`canonical`] — Duplicate zones, paired zones and report ordering
//! - [`statistics`] — Zone, configuration and fabric rollups with findings
//!
//! ## Running
//!
//! - [`pipeline`] — Run every stage over one snapshot
//! - [`settings`] — Tunables loaded from TOML
//! - [`report`] — Terminal-friendly colored output
//!
//! # Examples
//!
//! ```ignore
//! use san_snapshot::parse_file;
//! use zoning_audit::pipeline::aggregate;
//! use zoning_audit::settings::default_settings;
//!
//! let snapshot = parse_file("san.json")?;
//! let report = aggregate(&snapshot, &default_settings())?;
//! for zone in report.zones.iter().filter(|z| z.has_findings()) {
//!     println!("{} {:?}", zone.zone_name, zone.target_initiator_note);
//! }
//! ```
//!
//! # Built on san-snapshot
//!
//! Raw tables, JSON loading and WWN normalization live in `san-snapshot`.
//! All zoning-specific logic is contained in this crate.

pub mod alias_scope;
pub mod canonical;
pub mod connectivity;
pub mod error;
pub mod fabric_index;
pub mod flatten;
pub mod lsan;
pub mod membership;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod statistics;
pub mod unpack;
pub mod wwn_type;
