//! Typed tables for statically collected Fibre Channel SAN snapshots.
//!
//! The crate knows nothing about zoning analysis. It defines the flat records
//! produced by upstream dump parsers, loads them from JSON and writes any
//! serializable result back out.

pub mod parser;
pub mod snapshot;
pub mod tables;
pub mod writer;
pub mod wwn;

pub use parser::{parse, parse_file, ParseError};
pub use snapshot::Snapshot;
pub use tables::{
    AliasMemberRow, CfgEffectiveRow, CfgRow, DeviceAttachment, DeviceClass, FabricLabelRow,
    FcrEdgeRow, FcrFabricRow, LsanMemberRow, LsanState, PeerMemberType, PeerZoneRow,
    SwitchRecord, ZoneMemberRow,
};
pub use writer::{write, write_file, WriteError};
pub use wwn::normalize_wwn;
