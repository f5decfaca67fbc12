//! In-memory sources for exercising probes without a real host.
//!
//! Every query answers from a public field, so a test can make any single
//! source succeed, fail, or report the platform as unsupported.

use super::{
    AddressFamily, BatteryReading, CommandRunner, CpuCounts, DiskUsageReading, HostResolver,
    InterfaceAddressReading, InterfaceStatsReading, MemoryReading, OsIdentity, PartitionReading,
    PlatformQuery, ResourceQuery, SecsLeft, SourceError, SourceResult, Sources,
};
use crate::metrics::gpu::GpuQuery;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted outcome of one mocked query
#[derive(Debug, Clone, PartialEq)]
pub enum Mocked<T> {
    Ok(T),
    /// Fails as a transient read error
    Fail(String),
    /// Fails as unsupported on this platform
    Unsupported,
    /// Panics inside the query
    Panic,
}

impl<T: Clone> Mocked<T> {
    fn get(&self, what: &'static str) -> SourceResult<T> {
        match self {
            Mocked::Ok(value) => Ok(value.clone()),
            Mocked::Fail(detail) => Err(SourceError::parse(what, detail.clone())),
            Mocked::Unsupported => Err(SourceError::Unsupported(what)),
            Mocked::Panic => panic!("mocked {} query panicked", what),
        }
    }
}

/// Mocked platform metadata, resource statistics and resolver
#[derive(Debug, Clone)]
pub struct MockSource {
    pub os: Mocked<OsIdentity>,
    pub cpu_model: Mocked<String>,
    pub cpu_counts: Mocked<CpuCounts>,
    pub cpu_percent: Mocked<f64>,
    pub memory: Mocked<MemoryReading>,
    /// Usage per path; paths without an entry fail
    pub disk_usage: HashMap<PathBuf, DiskUsageReading>,
    pub partitions: Mocked<Vec<PartitionReading>>,
    pub interface_addresses: Mocked<Vec<InterfaceAddressReading>>,
    pub interface_stats: Mocked<HashMap<String, InterfaceStatsReading>>,
    pub boot_time: Mocked<i64>,
    pub load_average: Mocked<(f64, f64, f64)>,
    pub battery: Mocked<Option<BatteryReading>>,
    /// Readings per sensor group; unknown groups yield no readings
    pub temperatures: Mocked<HashMap<String, Vec<f64>>>,
    pub hostname: Mocked<String>,
    pub resolved: Mocked<IpAddr>,
}

impl MockSource {
    /// A laptop-like Linux host where every query succeeds.
    pub fn healthy() -> Self {
        const GIB: u64 = 1024 * 1024 * 1024;

        let mut disk_usage = HashMap::new();
        disk_usage.insert(
            PathBuf::from("/"),
            DiskUsageReading {
                total: 500 * GIB,
                used: 200 * GIB,
                free: 300 * GIB,
                percent: 40.0,
            },
        );
        disk_usage.insert(
            PathBuf::from("/boot/efi"),
            DiskUsageReading {
                total: 512 * 1024 * 1024,
                used: 64 * 1024 * 1024,
                free: 448 * 1024 * 1024,
                percent: 12.5,
            },
        );

        let mut interface_stats = HashMap::new();
        interface_stats.insert(
            "lo".to_string(),
            InterfaceStatsReading { is_up: true },
        );
        interface_stats.insert(
            "eth0".to_string(),
            InterfaceStatsReading { is_up: true },
        );

        let mut temperatures = HashMap::new();
        temperatures.insert("coretemp".to_string(), vec![54.0, 51.0, 53.0]);

        Self {
            os: Mocked::Ok(OsIdentity {
                system: "Linux".into(),
                version: "#1 SMP PREEMPT_DYNAMIC".into(),
                release: "6.8.0-45-generic".into(),
                architecture: ("64bit".into(), "ELF".into()),
            }),
            cpu_model: Mocked::Ok("Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz".into()),
            cpu_counts: Mocked::Ok(CpuCounts {
                physical: Some(4),
                logical: Some(8),
            }),
            cpu_percent: Mocked::Ok(12.5),
            memory: Mocked::Ok(MemoryReading {
                total: 8 * GIB,
                available: 4 * GIB,
                used: 4 * GIB,
                percent: 50.0,
            }),
            disk_usage,
            partitions: Mocked::Ok(vec![
                PartitionReading {
                    device: "/dev/nvme0n1p2".into(),
                    mountpoint: "/".into(),
                    fstype: "ext4".into(),
                },
                PartitionReading {
                    device: "/dev/nvme0n1p1".into(),
                    mountpoint: "/boot/efi".into(),
                    fstype: "vfat".into(),
                },
            ]),
            interface_addresses: Mocked::Ok(vec![
                InterfaceAddressReading {
                    interface: "lo".into(),
                    family: AddressFamily::Ipv4,
                    address: "127.0.0.1".into(),
                    netmask: Some("255.0.0.0".into()),
                    broadcast: None,
                },
                InterfaceAddressReading {
                    interface: "eth0".into(),
                    family: AddressFamily::Ipv4,
                    address: "192.168.1.20".into(),
                    netmask: Some("255.255.255.0".into()),
                    broadcast: Some("192.168.1.255".into()),
                },
                InterfaceAddressReading {
                    interface: "eth0".into(),
                    family: AddressFamily::Link,
                    address: "52:54:00:12:34:56".into(),
                    netmask: None,
                    broadcast: Some("ff:ff:ff:ff:ff:ff".into()),
                },
            ]),
            interface_stats: Mocked::Ok(interface_stats),
            boot_time: Mocked::Ok(1_700_000_000),
            load_average: Mocked::Ok((0.52, 0.58, 0.59)),
            battery: Mocked::Ok(Some(BatteryReading {
                percent: 81.0,
                power_plugged: false,
                secs_left: SecsLeft::Seconds(5400),
            })),
            temperatures: Mocked::Ok(temperatures),
            hostname: Mocked::Ok("testhost".into()),
            resolved: Mocked::Ok(IpAddr::from([192, 168, 1, 20])),
        }
    }
}

impl PlatformQuery for MockSource {
    fn os_identity(&self) -> SourceResult<OsIdentity> {
        self.os.get("os identity")
    }
}

impl ResourceQuery for MockSource {
    fn cpu_model(&self) -> SourceResult<String> {
        self.cpu_model.get("cpu model")
    }

    fn cpu_counts(&self) -> SourceResult<CpuCounts> {
        self.cpu_counts.get("cpu counts")
    }

    fn cpu_percent(&self, _window: Duration) -> SourceResult<f64> {
        self.cpu_percent.get("cpu utilization")
    }

    fn memory(&self) -> SourceResult<MemoryReading> {
        self.memory.get("memory")
    }

    fn disk_usage(&self, path: &Path) -> SourceResult<DiskUsageReading> {
        self.disk_usage.get(path).copied().ok_or_else(|| {
            SourceError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not mounted"),
            )
        })
    }

    fn partitions(&self) -> SourceResult<Vec<PartitionReading>> {
        self.partitions.get("partitions")
    }

    fn interface_addresses(&self) -> SourceResult<Vec<InterfaceAddressReading>> {
        self.interface_addresses.get("interface addresses")
    }

    fn interface_stats(&self) -> SourceResult<HashMap<String, InterfaceStatsReading>> {
        self.interface_stats.get("interface statistics")
    }

    fn boot_time(&self) -> SourceResult<i64> {
        self.boot_time.get("boot time")
    }

    fn load_average(&self) -> SourceResult<(f64, f64, f64)> {
        self.load_average.get("load average")
    }

    fn battery(&self) -> SourceResult<Option<BatteryReading>> {
        self.battery.get("battery")
    }

    fn temperatures(&self, group: &str) -> SourceResult<Vec<f64>> {
        let groups = self.temperatures.get("temperatures")?;
        Ok(groups.get(group).cloned().unwrap_or_default())
    }
}

impl HostResolver for MockSource {
    fn hostname(&self) -> SourceResult<String> {
        self.hostname.get("hostname")
    }

    fn resolve(&self, host: &str) -> SourceResult<IpAddr> {
        self.resolved.get("address").map_err(|e| match e {
            SourceError::Parse { detail, .. } => SourceError::Resolve {
                host: host.to_string(),
                detail,
            },
            other => other,
        })
    }
}

/// Command runner with canned output per program, recording every call
#[derive(Debug, Default)]
pub struct MockRunner {
    outputs: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, program: &str, stdout: &str) -> Self {
        self.outputs
            .insert(program.to_string(), Ok(stdout.to_string()));
        self
    }

    pub fn with_failure(mut self, program: &str, detail: &str) -> Self {
        self.outputs
            .insert(program.to_string(), Err(detail.to_string()));
        self
    }

    /// Programs run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, _args: &[&str]) -> SourceResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(program.to_string());
        }
        match self.outputs.get(program) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(detail)) => Err(SourceError::Command {
                program: program.to_string(),
                detail: detail.clone(),
            }),
            None => Err(SourceError::Command {
                program: program.to_string(),
                detail: "not installed".to_string(),
            }),
        }
    }
}

/// Bundle a mocked host with a GPU strategy.
pub fn sources(source: MockSource, gpu: Arc<dyn GpuQuery>) -> Sources {
    let source = Arc::new(source);
    Sources {
        platform: source.clone(),
        resources: source.clone(),
        resolver: source,
        gpu,
    }
}
