//! Physical memory usage.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{FamilyValue, MemoryInfo};
use crate::units::format_bytes;

/// Any failure, unsupported platforms included, makes the whole family
/// unavailable rather than partially populated.
pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let memory = ctx
        .sources
        .resources
        .memory()
        .map_err(ProbeError::unavailable)?;

    Ok(FamilyValue::Memory(MemoryInfo {
        total: format_bytes(memory.total),
        available: format_bytes(memory.available),
        used: format_bytes(memory.used),
        usage: memory.percent,
    }))
}
