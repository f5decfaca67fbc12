//! External utilities and hostname resolution.

use super::{sys, CommandRunner, HostResolver, SourceError, SourceResult};
use std::net::{IpAddr, ToSocketAddrs};
use std::process::Command;
use tracing::trace;

/// Runs programs found on `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> SourceResult<String> {
        trace!("running {} {:?}", program, args);
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| SourceError::Command {
                program: program.to_string(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SourceError::Command {
                program: program.to_string(),
                detail: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Hostname from the kernel, addresses from the system resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn hostname(&self) -> SourceResult<String> {
        sys::hostname().map_err(|e| SourceError::io("gethostname", e))
    }

    fn resolve(&self, host: &str) -> SourceResult<IpAddr> {
        let addresses: Vec<IpAddr> = (host, 0)
            .to_socket_addrs()
            .map_err(|e| SourceError::Resolve {
                host: host.to_string(),
                detail: e.to_string(),
            })?
            .map(|addr| addr.ip())
            .collect();

        first_address(&addresses).ok_or_else(|| SourceError::Resolve {
            host: host.to_string(),
            detail: "no addresses returned".to_string(),
        })
    }
}

/// First IPv4 result, or the first result of any family
fn first_address(addresses: &[IpAddr]) -> Option<IpAddr> {
    addresses
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
}
