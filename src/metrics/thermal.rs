//! CPU temperature from a single named sensor group.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::FamilyValue;

/// First reading of the configured group; no other groups are consulted.
pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let group = &ctx.options.sensor_group;
    let readings = ctx
        .sources
        .resources
        .temperatures(group)
        .map_err(ProbeError::unavailable)?;

    readings
        .first()
        .map(|celsius| FamilyValue::Temperature(*celsius))
        .ok_or_else(|| ProbeError::unavailable(format!("no readings in sensor group {}", group)))
}
