//! Host source backed by /proc, /sys and a few libc calls.

use super::{
    sys, BatteryReading, CpuCounts, DiskUsageReading, InterfaceAddressReading,
    InterfaceStatsReading, MemoryReading, OsIdentity, PartitionReading, PlatformQuery,
    ResourceQuery, SecsLeft, SourceError, SourceResult,
};
use crate::units::round_percent;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::trace;

/// Raw CPU time values from /proc/stat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }
}

/// Reads host state from procfs/sysfs mounted at configurable roots.
#[derive(Debug, Clone)]
pub struct ProcSource {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl Default for ProcSource {
    fn default() -> Self {
        Self::new("/proc", "/sys")
    }
}

impl ProcSource {
    pub fn new(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    fn read_proc(&self, name: &str) -> SourceResult<String> {
        read_file(&self.proc_root.join(name))
    }

    fn read_cpu_times(&self) -> SourceResult<CpuTimes> {
        let stat = self.read_proc("stat")?;
        stat.lines()
            .find(|line| line.starts_with("cpu "))
            .map(parse_cpu_line)
            .ok_or_else(|| SourceError::parse("/proc/stat", "no aggregate cpu line"))
    }

    fn power_supplies(&self) -> SourceResult<Vec<PathBuf>> {
        list_dir(&self.sys_root.join("class/power_supply"))
    }
}

fn linux_only(what: &'static str) -> SourceResult<()> {
    if cfg!(target_os = "linux") {
        Ok(())
    } else {
        Err(SourceError::Unsupported(what))
    }
}

fn read_file(path: &Path) -> SourceResult<String> {
    fs::read_to_string(path).map_err(|e| SourceError::io(path, e))
}

/// Read a single-value sysfs attribute, trimmed.
fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}

fn read_attr_u64(dir: &Path, name: &str) -> Option<u64> {
    read_attr(dir, name).and_then(|s| s.parse().ok())
}

/// Directory entries sorted by path, so enumeration order is stable.
fn list_dir(path: &Path) -> SourceResult<Vec<PathBuf>> {
    let entries = fs::read_dir(path).map_err(|e| SourceError::io(path, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(|e| SourceError::io(path, e))?.path());
    }
    paths.sort();
    Ok(paths)
}

pub(crate) fn parse_cpu_line(line: &str) -> CpuTimes {
    let parts: Vec<u64> = line
        .split_whitespace()
        .skip(1) // Skip "cpu" or "cpuN"
        .filter_map(|s| s.parse().ok())
        .collect();

    CpuTimes {
        user: *parts.first().unwrap_or(&0),
        nice: *parts.get(1).unwrap_or(&0),
        system: *parts.get(2).unwrap_or(&0),
        idle: *parts.get(3).unwrap_or(&0),
        iowait: *parts.get(4).unwrap_or(&0),
        irq: *parts.get(5).unwrap_or(&0),
        softirq: *parts.get(6).unwrap_or(&0),
        steal: *parts.get(7).unwrap_or(&0),
    }
}

/// Busy percentage between two /proc/stat samples
pub(crate) fn calculate_utilization(prev: &CpuTimes, curr: &CpuTimes) -> f64 {
    let total_delta = curr.total().saturating_sub(prev.total());
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = curr.idle_total().saturating_sub(prev.idle_total());
    100.0 * (1.0 - (idle_delta as f64 / total_delta as f64))
}

/// Model name plus physical and logical core counts from /proc/cpuinfo
pub(crate) fn parse_cpuinfo(content: &str) -> (String, Option<usize>, usize) {
    let mut model: Option<String> = None;
    let mut fallback_model: Option<String> = None;
    let mut logical = 0;
    let mut cores: HashSet<(String, String)> = HashSet::new();
    let mut physical_id: Option<String> = None;

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "processor" if value.chars().all(|c| c.is_ascii_digit()) => logical += 1,
            "model name" if model.is_none() => model = Some(value.to_string()),
            "Hardware" | "Processor" | "cpu model" if fallback_model.is_none() => {
                fallback_model = Some(value.to_string())
            }
            "physical id" => physical_id = Some(value.to_string()),
            "core id" => {
                let package = physical_id.clone().unwrap_or_default();
                cores.insert((package, value.to_string()));
            }
            _ => {}
        }
    }

    let physical = if cores.is_empty() {
        None
    } else {
        Some(cores.len())
    };
    (
        model.or(fallback_model).unwrap_or_default(),
        physical,
        logical,
    )
}

pub(crate) fn parse_meminfo(content: &str) -> SourceResult<MemoryReading> {
    let mut fields: HashMap<&str, u64> = HashMap::new();
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        // Values are reported in KiB
        let value = parts[1].parse::<u64>().unwrap_or(0).saturating_mul(1024);
        fields.insert(parts[0].trim_end_matches(':'), value);
    }

    let total = *fields
        .get("MemTotal")
        .ok_or_else(|| SourceError::parse("/proc/meminfo", "missing MemTotal"))?;
    let free = fields.get("MemFree").copied().unwrap_or(0);
    let buffers = fields.get("Buffers").copied().unwrap_or(0);
    let cached = fields
        .get("Cached")
        .copied()
        .unwrap_or(0)
        .saturating_add(fields.get("SReclaimable").copied().unwrap_or(0));
    let reclaimable = free.saturating_add(buffers).saturating_add(cached);
    let available = fields
        .get("MemAvailable")
        .copied()
        .unwrap_or(reclaimable);

    let used = match total.checked_sub(reclaimable) {
        Some(used) => used,
        None => total.saturating_sub(free),
    };

    let percent = if total > 0 {
        round_percent(100.0 * total.saturating_sub(available) as f64 / total as f64)
    } else {
        0.0
    };

    Ok(MemoryReading {
        total,
        available,
        used,
        percent,
    })
}

pub(crate) fn parse_btime(stat: &str) -> Option<i64> {
    stat.lines()
        .find(|line| line.starts_with("btime "))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

pub(crate) fn parse_loadavg(content: &str) -> SourceResult<(f64, f64, f64)> {
    let parts: Vec<f64> = content
        .split_whitespace()
        .take(3)
        .filter_map(|s| s.parse().ok())
        .collect();

    match parts.as_slice() {
        [one, five, fifteen] => Ok((*one, *five, *fifteen)),
        _ => Err(SourceError::parse("/proc/loadavg", content.trim().to_string())),
    }
}

/// Filesystem types backed by a device (no `nodev` marker)
pub(crate) fn parse_filesystems(content: &str) -> HashSet<String> {
    let mut types: HashSet<String> = content
        .lines()
        .filter(|line| !line.starts_with("nodev"))
        .filter_map(|line| line.split_whitespace().next())
        .map(|s| s.to_string())
        .collect();
    // zfs registers as nodev but lives on real disks
    types.insert("zfs".to_string());
    types
}

/// Decode the octal escapes the kernel uses in /proc/mounts (`\040` etc.)
pub(crate) fn unescape_mount(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits.iter().fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(value) = u8::try_from(value) {
                    out.push(value);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub(crate) fn parse_mounts(content: &str, physical: &HashSet<String>) -> Vec<PartitionReading> {
    content
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }
            let fstype = parts[2];
            if !physical.contains(fstype) {
                return None;
            }
            Some(PartitionReading {
                device: unescape_mount(parts[0]),
                mountpoint: unescape_mount(parts[1]),
                fstype: fstype.to_string(),
            })
        })
        .collect()
}

/// Usage figures from statvfs block counts
pub(crate) fn usage_from_blocks(
    fragment_size: u64,
    blocks: u64,
    blocks_free: u64,
    blocks_available: u64,
) -> DiskUsageReading {
    let total = blocks * fragment_size;
    let free = blocks_available * fragment_size;
    let used = blocks.saturating_sub(blocks_free) * fragment_size;
    let percent = if used + free > 0 {
        round_percent(100.0 * used as f64 / (used + free) as f64)
    } else {
        0.0
    };
    DiskUsageReading {
        total,
        used,
        free,
        percent,
    }
}

/// Binary format of the build target, as `platform.architecture` reports it
fn binary_format() -> &'static str {
    if cfg!(target_os = "windows") {
        "WindowsPE"
    } else if cfg!(target_vendor = "apple") {
        "Mach-O"
    } else {
        "ELF"
    }
}

impl PlatformQuery for ProcSource {
    fn os_identity(&self) -> SourceResult<OsIdentity> {
        let architecture = (format!("{}bit", usize::BITS), binary_format().to_string());
        // Fields that cannot be read stay empty
        let uname = sys::uname().unwrap_or_default();
        let system = if uname.sysname.is_empty() {
            capitalize(std::env::consts::OS)
        } else {
            uname.sysname
        };
        Ok(OsIdentity {
            system,
            version: uname.version,
            release: uname.release,
            architecture,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ResourceQuery for ProcSource {
    fn cpu_model(&self) -> SourceResult<String> {
        linux_only("cpu model")?;
        let cpuinfo = self.read_proc("cpuinfo")?;
        let (model, _, _) = parse_cpuinfo(&cpuinfo);
        if model.is_empty() {
            // Same fallback as the kernel's machine name
            return Ok(sys::uname().map(|u| u.machine).unwrap_or_default());
        }
        Ok(model)
    }

    fn cpu_counts(&self) -> SourceResult<CpuCounts> {
        linux_only("cpu counts")?;
        let (physical, logical) = match self.read_proc("cpuinfo") {
            Ok(cpuinfo) => {
                let (_, physical, logical) = parse_cpuinfo(&cpuinfo);
                (physical, Some(logical).filter(|&n| n > 0))
            }
            Err(e) => {
                trace!("cpuinfo unreadable: {}", e);
                (None, None)
            }
        };
        Ok(CpuCounts {
            physical,
            logical: logical.or_else(sys::online_cpus),
        })
    }

    fn cpu_percent(&self, window: Duration) -> SourceResult<f64> {
        linux_only("cpu utilization")?;
        let before = self.read_cpu_times()?;
        std::thread::sleep(window);
        let after = self.read_cpu_times()?;
        Ok(round_percent(calculate_utilization(&before, &after)))
    }

    fn memory(&self) -> SourceResult<MemoryReading> {
        linux_only("memory statistics")?;
        parse_meminfo(&self.read_proc("meminfo")?)
    }

    fn disk_usage(&self, path: &Path) -> SourceResult<DiskUsageReading> {
        linux_only("disk usage")?;
        let stats = sys::statvfs(path).map_err(|e| SourceError::io(path, e))?;
        Ok(usage_from_blocks(
            stats.fragment_size,
            stats.blocks,
            stats.blocks_free,
            stats.blocks_available,
        ))
    }

    fn partitions(&self) -> SourceResult<Vec<PartitionReading>> {
        linux_only("partition listing")?;
        let physical = parse_filesystems(&self.read_proc("filesystems")?);
        let mounts = self
            .read_proc("self/mounts")
            .or_else(|_| self.read_proc("mounts"))?;
        Ok(parse_mounts(&mounts, &physical))
    }

    fn interface_addresses(&self) -> SourceResult<Vec<InterfaceAddressReading>> {
        linux_only("interface addresses")?;
        sys::interface_addresses().map_err(|e| SourceError::io("getifaddrs", e))
    }

    fn interface_stats(&self) -> SourceResult<HashMap<String, InterfaceStatsReading>> {
        linux_only("interface statistics")?;
        let mut stats = HashMap::new();
        for dir in list_dir(&self.sys_root.join("class/net"))? {
            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            stats.insert(name, read_interface_stats(&dir));
        }
        Ok(stats)
    }

    fn boot_time(&self) -> SourceResult<i64> {
        linux_only("boot time")?;
        let stat = self.read_proc("stat")?;
        parse_btime(&stat).ok_or_else(|| SourceError::parse("/proc/stat", "missing btime"))
    }

    fn load_average(&self) -> SourceResult<(f64, f64, f64)> {
        linux_only("load average")?;
        parse_loadavg(&self.read_proc("loadavg")?)
    }

    fn battery(&self) -> SourceResult<Option<BatteryReading>> {
        linux_only("battery status")?;
        let supplies = match self.power_supplies() {
            Ok(supplies) => supplies,
            // No power_supply class means no battery
            Err(SourceError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };
        read_battery(&supplies)
    }

    fn temperatures(&self, group: &str) -> SourceResult<Vec<f64>> {
        linux_only("temperature sensors")?;
        for dir in list_dir(&self.sys_root.join("class/hwmon"))? {
            if read_attr(&dir, "name").as_deref() == Some(group) {
                return read_hwmon_temperatures(&dir);
            }
        }
        Ok(Vec::new())
    }
}

fn read_interface_stats(dir: &Path) -> InterfaceStatsReading {
    const IFF_UP: u32 = 0x1;
    let is_up = match read_attr(dir, "flags")
        .and_then(|f| u32::from_str_radix(f.trim_start_matches("0x"), 16).ok())
    {
        Some(flags) => flags & IFF_UP != 0,
        None => read_attr(dir, "operstate").as_deref() == Some("up"),
    };
    InterfaceStatsReading { is_up }
}

fn read_battery(supplies: &[PathBuf]) -> SourceResult<Option<BatteryReading>> {
    let mut battery_dir: Option<&PathBuf> = None;
    let mut mains_online: Option<bool> = None;

    for dir in supplies {
        match read_attr(dir, "type").as_deref() {
            Some("Battery") if battery_dir.is_none() => battery_dir = Some(dir),
            Some("Mains") | Some("USB") => {
                let online = read_attr_u64(dir, "online") == Some(1);
                mains_online = Some(mains_online.unwrap_or(false) || online);
            }
            _ => {}
        }
    }

    let Some(dir) = battery_dir else {
        return Ok(None);
    };

    let energy_now = read_attr_u64(dir, "energy_now").or_else(|| read_attr_u64(dir, "charge_now"));
    let energy_full =
        read_attr_u64(dir, "energy_full").or_else(|| read_attr_u64(dir, "charge_full"));
    let power_now = read_attr_u64(dir, "power_now").or_else(|| read_attr_u64(dir, "current_now"));

    let percent = match (energy_now, energy_full) {
        (Some(now), Some(full)) if full > 0 => 100.0 * now as f64 / full as f64,
        _ => read_attr(dir, "capacity")
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(SourceError::Missing("battery capacity"))?,
    };

    let status = read_attr(dir, "status").unwrap_or_default().to_lowercase();
    let power_plugged = match mains_online {
        Some(online) => online,
        None => status != "discharging",
    };

    let secs_left = if power_plugged {
        SecsLeft::Unlimited
    } else {
        match (energy_now, power_now) {
            (Some(now), Some(rate)) if rate > 0 => SecsLeft::Seconds(now * 3600 / rate),
            _ => SecsLeft::Unknown,
        }
    };

    Ok(Some(BatteryReading {
        percent,
        power_plugged,
        secs_left,
    }))
}

/// Readings of every `temp*_input` in sensor order. Inputs that cannot be
/// read or parsed are skipped. Older kernels keep the inputs under `device/`.
fn read_hwmon_temperatures(dir: &Path) -> SourceResult<Vec<f64>> {
    let mut inputs = temperature_inputs(dir)?;
    if inputs.is_empty() {
        let device = dir.join("device");
        if device.is_dir() {
            inputs = temperature_inputs(&device)?;
        }
    }

    let readings = inputs
        .into_iter()
        .filter_map(|(_, path)| {
            let raw = match read_file(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    trace!("Skipping sensor: {}", e);
                    return None;
                }
            };
            match raw.trim().parse::<f64>() {
                Ok(millidegrees) => Some(millidegrees / 1000.0),
                Err(_) => {
                    trace!("Skipping sensor {}: bad value {:?}", path.display(), raw.trim());
                    None
                }
            }
        })
        .collect();
    Ok(readings)
}

fn temperature_inputs(dir: &Path) -> SourceResult<Vec<(u32, PathBuf)>> {
    let mut inputs: Vec<(u32, PathBuf)> = list_dir(dir)?
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let index = name.strip_prefix("temp")?.strip_suffix("_input")?;
            Some((index.parse().ok()?, path.clone()))
        })
        .collect();
    inputs.sort_by_key(|(index, _)| *index);
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CPUINFO: &str = "\
processor\t: 0
model name\t: Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz
physical id\t: 0
core id\t\t: 0

processor\t: 1
model name\t: Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz
physical id\t: 0
core id\t\t: 1

processor\t: 2
model name\t: Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz
physical id\t: 0
core id\t\t: 0

processor\t: 3
model name\t: Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz
physical id\t: 0
core id\t\t: 1
";

    const MEMINFO: &str = "\
MemTotal:       16000000 kB
MemFree:         4000000 kB
MemAvailable:    8000000 kB
Buffers:          500000 kB
Cached:          3000000 kB
SReclaimable:     500000 kB
SwapTotal:       2000000 kB
";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_cpuinfo_counts() {
        let (model, physical, logical) = parse_cpuinfo(CPUINFO);
        assert_eq!(model, "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz");
        assert_eq!(physical, Some(2));
        assert_eq!(logical, 4);
    }

    #[test]
    fn test_parse_cpuinfo_without_topology() {
        let arm = "processor\t: 0\nBogoMIPS\t: 38.40\n\nprocessor\t: 1\nHardware\t: BCM2835\n";
        let (model, physical, logical) = parse_cpuinfo(arm);
        assert_eq!(model, "BCM2835");
        assert_eq!(physical, None);
        assert_eq!(logical, 2);
    }

    #[test]
    fn test_calculate_utilization() {
        let prev = parse_cpu_line("cpu  100 0 100 800 0 0 0 0 0 0");
        let curr = parse_cpu_line("cpu  150 0 150 900 0 0 0 0 0 0");
        assert_eq!(calculate_utilization(&prev, &curr), 50.0);
        assert_eq!(calculate_utilization(&curr, &curr), 0.0);
    }

    #[test]
    fn test_parse_meminfo() {
        let reading = parse_meminfo(MEMINFO).unwrap();
        assert_eq!(reading.total, 16_000_000 * 1024);
        assert_eq!(reading.available, 8_000_000 * 1024);
        assert_eq!(reading.used, 8_000_000 * 1024);
        assert_eq!(reading.percent, 50.0);
    }

    #[test]
    fn test_parse_meminfo_saturates_corrupt_values() {
        let content = "MemTotal: 18446744073709551615 kB\nMemFree: 18446744073709551615 kB\nCached: 18446744073709551615 kB\n";
        let reading = parse_meminfo(content).unwrap();
        assert_eq!(reading.total, u64::MAX);
        assert_eq!(reading.available, u64::MAX);
        assert_eq!(reading.used, 0);
    }

    #[test]
    fn test_parse_meminfo_requires_total() {
        assert!(matches!(
            parse_meminfo("MemFree: 10 kB\n"),
            Err(SourceError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_loadavg() {
        assert_eq!(
            parse_loadavg("0.52 0.58 0.59 1/467 12345\n").unwrap(),
            (0.52, 0.58, 0.59)
        );
        assert!(parse_loadavg("garbage").is_err());
    }

    #[test]
    fn test_parse_btime() {
        let stat = "cpu  1 2 3 4\nctxt 100\nbtime 1700000000\nprocesses 5\n";
        assert_eq!(parse_btime(stat), Some(1_700_000_000));
        assert_eq!(parse_btime("cpu 1 2 3\n"), None);
    }

    #[test]
    fn test_parse_mounts_keeps_physical_filesystems() {
        let filesystems = "nodev\tsysfs\nnodev\tproc\n\text4\n\tvfat\nnodev\ttmpfs\n";
        let mounts = "\
sysfs /sys sysfs rw,nosuid 0 0
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
/dev/nvme0n1p1 /boot/efi vfat rw 0 0
tmpfs /run tmpfs rw 0 0
/dev/sdb1 /media/usb\\040stick vfat rw 0 0
";
        let physical = parse_filesystems(filesystems);
        let partitions = parse_mounts(mounts, &physical);
        let mountpoints: Vec<&str> = partitions.iter().map(|p| p.mountpoint.as_str()).collect();
        assert_eq!(mountpoints, vec!["/", "/boot/efi", "/media/usb stick"]);
        assert_eq!(partitions[0].device, "/dev/nvme0n1p2");
        assert_eq!(partitions[0].fstype, "ext4");
    }

    #[test]
    fn test_unescape_mount() {
        assert_eq!(unescape_mount("/mnt/a\\040b"), "/mnt/a b");
        assert_eq!(unescape_mount("/plain"), "/plain");
        assert_eq!(unescape_mount("/trailing\\04"), "/trailing\\04");
    }

    #[test]
    fn test_usage_from_blocks() {
        let usage = usage_from_blocks(4096, 1000, 400, 300);
        assert_eq!(usage.total, 4096 * 1000);
        assert_eq!(usage.used, 4096 * 600);
        assert_eq!(usage.free, 4096 * 300);
        assert_eq!(usage.percent, 66.7);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_proc_source_reads_fake_tree() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        write(proc_dir.path(), "meminfo", MEMINFO);
        write(proc_dir.path(), "cpuinfo", CPUINFO);
        write(proc_dir.path(), "loadavg", "1.00 0.50 0.25 1/100 42\n");
        write(
            proc_dir.path(),
            "stat",
            "cpu  100 0 100 800 0 0 0 0 0 0\nbtime 1700000000\n",
        );

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        assert_eq!(source.memory().unwrap().percent, 50.0);
        assert_eq!(source.load_average().unwrap(), (1.0, 0.5, 0.25));
        assert_eq!(source.boot_time().unwrap(), 1_700_000_000);
        assert_eq!(
            source.cpu_counts().unwrap(),
            CpuCounts {
                physical: Some(2),
                logical: Some(4)
            }
        );
        // Identical samples: nothing elapsed
        assert_eq!(source.cpu_percent(Duration::ZERO).unwrap(), 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_battery_from_sysfs() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let root = sys_dir.path();
        write(root, "class/power_supply/AC/type", "Mains\n");
        write(root, "class/power_supply/AC/online", "0\n");
        write(root, "class/power_supply/BAT0/type", "Battery\n");
        write(root, "class/power_supply/BAT0/status", "Discharging\n");
        write(root, "class/power_supply/BAT0/energy_now", "30000000\n");
        write(root, "class/power_supply/BAT0/energy_full", "60000000\n");
        write(root, "class/power_supply/BAT0/power_now", "15000000\n");

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        let battery = source.battery().unwrap().unwrap();
        assert_eq!(battery.percent, 50.0);
        assert!(!battery.power_plugged);
        assert_eq!(battery.secs_left, SecsLeft::Seconds(7200));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_battery_on_ac_is_unlimited() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let root = sys_dir.path();
        write(root, "class/power_supply/ADP1/type", "Mains\n");
        write(root, "class/power_supply/ADP1/online", "1\n");
        write(root, "class/power_supply/BAT1/type", "Battery\n");
        write(root, "class/power_supply/BAT1/capacity", "87\n");
        write(root, "class/power_supply/BAT1/status", "Charging\n");

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        let battery = source.battery().unwrap().unwrap();
        assert_eq!(battery.percent, 87.0);
        assert!(battery.power_plugged);
        assert_eq!(battery.secs_left, SecsLeft::Unlimited);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_no_power_supply_means_no_battery() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        assert_eq!(source.battery().unwrap(), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_hwmon_temperatures_in_sensor_order() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let root = sys_dir.path();
        write(root, "class/hwmon/hwmon0/name", "acpitz\n");
        write(root, "class/hwmon/hwmon0/temp1_input", "27800\n");
        write(root, "class/hwmon/hwmon3/name", "coretemp\n");
        write(root, "class/hwmon/hwmon3/temp10_input", "51000\n");
        write(root, "class/hwmon/hwmon3/temp2_input", "48000\n");
        write(root, "class/hwmon/hwmon3/temp1_input", "52500\n");

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        assert_eq!(
            source.temperatures("coretemp").unwrap(),
            vec![52.5, 48.0, 51.0]
        );
        assert!(source.temperatures("k10temp").unwrap().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unreadable_sensor_is_skipped() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let root = sys_dir.path();
        write(root, "class/hwmon/hwmon3/name", "coretemp\n");
        // A directory where a reading is expected fails with EISDIR
        fs::create_dir_all(root.join("class/hwmon/hwmon3/temp1_input")).unwrap();
        write(root, "class/hwmon/hwmon3/temp2_input", "48000\n");
        write(root, "class/hwmon/hwmon3/temp3_input", "garbage\n");

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        assert_eq!(source.temperatures("coretemp").unwrap(), vec![48.0]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_sensor_inputs_under_device_dir() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let root = sys_dir.path();
        write(root, "class/hwmon/hwmon1/name", "coretemp\n");
        write(root, "class/hwmon/hwmon1/device/temp2_input", "45000\n");
        write(root, "class/hwmon/hwmon1/device/temp1_input", "47000\n");

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        assert_eq!(source.temperatures("coretemp").unwrap(), vec![47.0, 45.0]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_interface_stats_from_sysfs() {
        let proc_dir = TempDir::new().unwrap();
        let sys_dir = TempDir::new().unwrap();
        let root = sys_dir.path();
        write(root, "class/net/eth0/flags", "0x1003\n");
        write(root, "class/net/wlan0/operstate", "down\n");

        let source = ProcSource::new(proc_dir.path(), sys_dir.path());
        let stats = source.interface_stats().unwrap();
        assert!(stats["eth0"].is_up);
        assert!(!stats["wlan0"].is_up);
    }
}
