//! Access to the host's external data sources.
//!
//! Probes never touch the operating system directly. They go through the
//! traits in this module so tests can substitute in-memory implementations
//! (see [`mock`]).

pub mod command;
pub mod mock;
pub mod procfs;
mod sys;

use crate::config::CollectOptions;
use crate::metrics::gpu::{self, GpuQuery};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use command::{ProcessRunner, SystemResolver};
pub use procfs::ProcSource;

/// Failure of a single source query
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("{program} failed: {detail}")]
    Command { program: String, detail: String },
    #[error("could not resolve {host}: {detail}")]
    Resolve { host: String, detail: String },
    #[error("{0} not found")]
    Missing(&'static str),
}

impl SourceError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        SourceError::Parse {
            what,
            detail: detail.into(),
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Operating system identity as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OsIdentity {
    pub system: String,
    pub version: String,
    pub release: String,
    pub architecture: (String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuCounts {
    pub physical: Option<usize>,
    pub logical: Option<usize>,
}

/// Memory figures in bytes, with the source-computed usage percentage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryReading {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f64,
}

/// Filesystem usage in bytes for one mount point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiskUsageReading {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReading {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Link,
}

impl AddressFamily {
    pub fn label(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
            AddressFamily::Link => "MAC",
        }
    }
}

/// One address bound to a network interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddressReading {
    pub interface: String,
    pub family: AddressFamily,
    pub address: String,
    pub netmask: Option<String>,
    pub broadcast: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceStatsReading {
    pub is_up: bool,
}

/// Battery time remaining as reported by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecsLeft {
    Seconds(u64),
    Unlimited,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub percent: f64,
    pub power_plugged: bool,
    pub secs_left: SecsLeft,
}

/// OS and platform metadata
pub trait PlatformQuery: Send + Sync {
    fn os_identity(&self) -> SourceResult<OsIdentity>;
}

/// Process and resource statistics
pub trait ResourceQuery: Send + Sync {
    fn cpu_model(&self) -> SourceResult<String>;
    fn cpu_counts(&self) -> SourceResult<CpuCounts>;
    /// Blocks for `window` to measure utilization between two samples.
    fn cpu_percent(&self, window: Duration) -> SourceResult<f64>;
    fn memory(&self) -> SourceResult<MemoryReading>;
    fn disk_usage(&self, path: &Path) -> SourceResult<DiskUsageReading>;
    fn partitions(&self) -> SourceResult<Vec<PartitionReading>>;
    fn interface_addresses(&self) -> SourceResult<Vec<InterfaceAddressReading>>;
    fn interface_stats(&self) -> SourceResult<HashMap<String, InterfaceStatsReading>>;
    /// Boot time as Unix seconds
    fn boot_time(&self) -> SourceResult<i64>;
    fn load_average(&self) -> SourceResult<(f64, f64, f64)>;
    /// `None` when the host has no battery
    fn battery(&self) -> SourceResult<Option<BatteryReading>>;
    /// Temperature readings (°C) of one sensor group, in sensor order
    fn temperatures(&self, group: &str) -> SourceResult<Vec<f64>>;
}

/// Hostname lookup and resolution
pub trait HostResolver: Send + Sync {
    fn hostname(&self) -> SourceResult<String>;
    fn resolve(&self, host: &str) -> SourceResult<IpAddr>;
}

/// Runs external utilities and returns their standard output
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> SourceResult<String>;
}

/// Every source a collection pass reads from
#[derive(Clone)]
pub struct Sources {
    pub platform: Arc<dyn PlatformQuery>,
    pub resources: Arc<dyn ResourceQuery>,
    pub resolver: Arc<dyn HostResolver>,
    pub gpu: Arc<dyn GpuQuery>,
}

impl Sources {
    /// Real host sources. The GPU strategy is picked here, once, from the
    /// platform this binary runs on.
    pub fn system(options: &CollectOptions) -> Self {
        let proc_source = Arc::new(ProcSource::new(&options.proc_root, &options.sys_root));
        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
        Self {
            platform: proc_source.clone(),
            resources: proc_source,
            resolver: Arc::new(SystemResolver),
            gpu: gpu::select(std::env::consts::OS, runner),
        }
    }
}
