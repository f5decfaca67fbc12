//! CPU model, core counts and utilization.
//!
//! Utilization blocks for the configured sampling window; this is the only
//! probe with an intrinsic delay.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{CpuInfo, FamilyValue};
use crate::source::CpuCounts;
use tracing::{debug, warn};

pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let resources = &ctx.sources.resources;

    let model = resources.cpu_model().unwrap_or_else(|e| {
        debug!("CPU model unreadable: {}", e);
        String::new()
    });

    // Restricted environments may hide the topology; counts become unavailable
    let counts = resources.cpu_counts().unwrap_or_else(|e| {
        warn!("CPU core counts unavailable: {}", e);
        CpuCounts::default()
    });

    let usage = resources
        .cpu_percent(ctx.options.cpu_sample_window)
        .map_err(ProbeError::unavailable)?;

    Ok(FamilyValue::Cpu(CpuInfo {
        model,
        physical_cores: counts.physical,
        logical_cores: counts.logical,
        usage,
    }))
}
