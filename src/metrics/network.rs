//! Hostname, resolved address and per-interface addresses.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{FamilyValue, InterfaceInfo, NetworkInfo};
use tracing::warn;

/// Hostname and the address it resolves to.
///
/// A resolution failure stays inside this family: the hostname is still
/// reported and the address is marked unavailable.
pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let resolver = &ctx.sources.resolver;
    let hostname = resolver.hostname().map_err(ProbeError::unavailable)?;

    let ip_address = match resolver.resolve(&hostname) {
        Ok(ip) => Some(ip.to_string()),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    Ok(FamilyValue::Network(NetworkInfo {
        hostname,
        ip_address,
    }))
}

/// One record per interface address, with link state looked up by name.
pub fn probe_interfaces(ctx: &ProbeContext) -> ProbeResult {
    let resources = &ctx.sources.resources;
    let addresses = resources
        .interface_addresses()
        .map_err(ProbeError::unavailable)?;
    let stats = resources
        .interface_stats()
        .map_err(ProbeError::unavailable)?;

    let records = addresses
        .into_iter()
        .map(|addr| {
            let is_up = stats
                .get(&addr.interface)
                .map(|s| s.is_up)
                .unwrap_or(false);
            InterfaceInfo {
                family: addr.family.label().to_string(),
                interface: addr.interface,
                address: addr.address,
                netmask: addr.netmask,
                broadcast: addr.broadcast,
                is_up,
            }
        })
        .collect();

    Ok(FamilyValue::Interfaces(records))
}
