//! Probes: one per metric family.
//!
//! Every probe is a failure-isolation boundary. It reads only through
//! [`Sources`](crate::source::Sources) and reports problems as a
//! [`ProbeError`], never by panicking or aborting the pass.

pub mod battery;
pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod memory;
pub mod network;
pub mod os;
pub mod thermal;
pub mod uptime;

use crate::config::{CollectOptions, Variant};
use crate::report::{Family, FamilyValue};
use crate::source::{SourceError, Sources};
use std::fmt;
use thiserror::Error;

/// Why a probe produced no structured value
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Not offered on this platform; the family is left out of the report
    #[error("not supported on this platform")]
    Unsupported,
    /// Hardware absent or query failed; the family becomes a placeholder
    #[error("{0}")]
    Unavailable(String),
}

impl ProbeError {
    /// Treat any failure as soft-unavailable, including unsupported queries.
    pub fn unavailable(reason: impl fmt::Display) -> Self {
        ProbeError::Unavailable(reason.to_string())
    }
}

impl From<SourceError> for ProbeError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Unsupported(_) => ProbeError::Unsupported,
            other => ProbeError::Unavailable(other.to_string()),
        }
    }
}

pub type ProbeResult = Result<FamilyValue, ProbeError>;

/// Everything a probe may read
#[derive(Clone)]
pub struct ProbeContext {
    pub sources: Sources,
    pub options: CollectOptions,
}

impl ProbeContext {
    pub fn new(sources: Sources, options: CollectOptions) -> Self {
        Self { sources, options }
    }
}

const MINIMAL: [Family; 6] = [
    Family::Os,
    Family::Cpu,
    Family::Memory,
    Family::Disk,
    Family::Network,
    Family::Battery,
];

/// Families collected for a variant, in report order
pub fn families(variant: Variant) -> &'static [Family] {
    match variant {
        Variant::Minimal => &MINIMAL,
        Variant::Extended => &Family::ALL,
    }
}

/// Run the probe responsible for `family`.
pub fn run(family: Family, ctx: &ProbeContext) -> ProbeResult {
    match family {
        Family::Os => os::probe(ctx),
        Family::Cpu => cpu::probe(ctx),
        Family::Memory => memory::probe(ctx),
        Family::Disk => disk::probe(ctx),
        Family::Partitions => disk::probe_partitions(ctx),
        Family::Network => network::probe(ctx),
        Family::Interfaces => network::probe_interfaces(ctx),
        Family::Uptime => uptime::probe(ctx),
        Family::Battery => battery::probe(ctx),
        Family::Temperature => thermal::probe(ctx),
        Family::Gpu => gpu::probe(ctx),
    }
}
