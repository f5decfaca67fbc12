//! Operating system identity.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{FamilyValue, OsInfo};

pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let identity = ctx
        .sources
        .platform
        .os_identity()
        .map_err(ProbeError::unavailable)?;

    Ok(FamilyValue::Os(OsInfo {
        system: identity.system,
        version: identity.version,
        release: identity.release,
        architecture: identity.architecture,
    }))
}
