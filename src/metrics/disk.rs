//! Root volume usage and per-partition usage.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{DiskInfo, FamilyValue, PartitionInfo};
use crate::units::format_bytes;
use std::path::Path;
use tracing::warn;

/// Aggregate usage of the configured root volume
pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let usage = ctx
        .sources
        .resources
        .disk_usage(&ctx.options.root_volume)
        .map_err(ProbeError::unavailable)?;

    Ok(FamilyValue::Disk(DiskInfo {
        total: format_bytes(usage.total),
        free: format_bytes(usage.free),
        used: format_bytes(usage.used),
        usage: usage.percent,
    }))
}

/// Every mounted physical partition, in mount order.
///
/// A mount point whose usage cannot be read (e.g. a removed device) keeps
/// its identity fields and reports its figures as unavailable.
pub fn probe_partitions(ctx: &ProbeContext) -> ProbeResult {
    let resources = &ctx.sources.resources;
    let partitions = resources.partitions().map_err(ProbeError::unavailable)?;

    let records = partitions
        .into_iter()
        .map(|partition| {
            let mut record = PartitionInfo {
                device: partition.device,
                mountpoint: partition.mountpoint,
                fstype: partition.fstype,
                total: None,
                used: None,
                free: None,
                usage: None,
            };

            match resources.disk_usage(Path::new(&record.mountpoint)) {
                Ok(usage) => {
                    record.total = Some(format_bytes(usage.total));
                    record.used = Some(format_bytes(usage.used));
                    record.free = Some(format_bytes(usage.free));
                    record.usage = Some(usage.percent);
                }
                Err(e) => warn!("usage of {} unavailable: {}", record.mountpoint, e),
            }
            record
        })
        .collect();

    Ok(FamilyValue::Partitions(records))
}
