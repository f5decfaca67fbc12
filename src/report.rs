//! The assembled host report and the per-family value types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Marker rendered in place of a field that could not be read.
pub const UNAVAILABLE: &str = "Unavailable";

/// Metric families, in the order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Os,
    Cpu,
    Memory,
    Disk,
    Partitions,
    Network,
    Interfaces,
    Uptime,
    Battery,
    Temperature,
    Gpu,
}

impl Family {
    pub const ALL: [Family; 11] = [
        Family::Os,
        Family::Cpu,
        Family::Memory,
        Family::Disk,
        Family::Partitions,
        Family::Network,
        Family::Interfaces,
        Family::Uptime,
        Family::Battery,
        Family::Temperature,
        Family::Gpu,
    ];

    /// Report key for this family
    pub fn name(self) -> &'static str {
        match self {
            Family::Os => "OS",
            Family::Cpu => "CPU",
            Family::Memory => "Memory",
            Family::Disk => "Disk",
            Family::Partitions => "Disk Partitions",
            Family::Network => "Network",
            Family::Interfaces => "Network Interfaces",
            Family::Uptime => "Uptime",
            Family::Battery => "Battery",
            Family::Temperature => "CPU Temperature",
            Family::Gpu => "GPU",
        }
    }

    /// Text substituted for the family when its data could not be obtained
    pub fn placeholder(self) -> &'static str {
        match self {
            Family::Os => "OS information not available",
            Family::Cpu => "CPU information not available",
            Family::Memory => "Memory information not available",
            Family::Disk => "Disk information not available",
            Family::Partitions => "Partition information not available",
            Family::Network => "Network information not available",
            Family::Interfaces => "Interface information not available",
            Family::Uptime => "Uptime information not available",
            Family::Battery => "Battery information not available",
            Family::Temperature => "CPU temperature not available",
            Family::Gpu => "GPU information not available",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialize `None` as the unavailable marker instead of `null`.
fn or_unavailable<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(UNAVAILABLE),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsInfo {
    pub system: String,
    pub version: String,
    pub release: String,
    /// Word width and binary format, e.g. `("64bit", "ELF")`
    pub architecture: (String, String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    pub model: String,
    #[serde(serialize_with = "or_unavailable")]
    pub physical_cores: Option<usize>,
    #[serde(serialize_with = "or_unavailable")]
    pub logical_cores: Option<usize>,
    /// Utilization over the sampling window (%)
    pub usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryInfo {
    pub total: String,
    pub available: String,
    pub used: String,
    pub usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskInfo {
    pub total: String,
    pub free: String,
    pub used: String,
    pub usage: f64,
}

/// One mounted partition. Usage figures are `None` when the mount point
/// could not be queried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionInfo {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    #[serde(serialize_with = "or_unavailable")]
    pub total: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub used: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub free: Option<String>,
    #[serde(serialize_with = "or_unavailable")]
    pub usage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfo {
    pub hostname: String,
    #[serde(serialize_with = "or_unavailable")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceInfo {
    pub interface: String,
    pub family: String,
    pub address: String,
    pub netmask: Option<String>,
    pub broadcast: Option<String>,
    pub is_up: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UptimeInfo {
    pub boot_time: String,
    /// 1, 5 and 15 minute load averages
    pub load_average: [f64; 3],
}

/// Remaining battery time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Minutes(u32),
    /// Running on external power
    Unlimited,
    /// Discharging but no rate is reported
    Unknown,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Minutes(m) => write!(f, "{} min", m),
            TimeLeft::Unlimited => f.write_str("Unlimited"),
            TimeLeft::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for TimeLeft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeLeft::Minutes(m) => serializer.serialize_u32(*m),
            TimeLeft::Unlimited => serializer.serialize_str("Unlimited"),
            TimeLeft::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryInfo {
    pub percentage: f64,
    pub plugged: bool,
    pub time_left: TimeLeft,
}

/// Value stored under one family key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FamilyValue {
    Os(OsInfo),
    Cpu(CpuInfo),
    Memory(MemoryInfo),
    Disk(DiskInfo),
    Partitions(Vec<PartitionInfo>),
    Network(NetworkInfo),
    Interfaces(Vec<InterfaceInfo>),
    Uptime(UptimeInfo),
    Battery(BatteryInfo),
    /// Degrees Celsius
    Temperature(f64),
    Gpu(Vec<String>),
    /// Explanatory text standing in for a family's normal value
    Placeholder(String),
}

impl FamilyValue {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FamilyValue::Placeholder(_))
    }

    pub fn as_placeholder(&self) -> Option<&str> {
        match self {
            FamilyValue::Placeholder(text) => Some(text),
            _ => None,
        }
    }
}

/// Point-in-time host report: family values in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<(Family, FamilyValue)>,
}

impl Report {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a family value. A family already present is replaced in place,
    /// so each family appears at most once.
    pub(crate) fn insert(&mut self, family: Family, value: FamilyValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == family) {
            entry.1 = value;
        } else {
            self.entries.push((family, value));
        }
    }

    pub fn get(&self, family: Family) -> Option<&FamilyValue> {
        self.entries
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, family: Family) -> bool {
        self.get(family).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Family, &FamilyValue)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    /// Family keys in collection order
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(f, _)| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (family, value) in &self.entries {
            map.serialize_entry(family.name(), value)?;
        }
        map.end()
    }
}
