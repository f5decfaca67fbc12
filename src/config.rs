//! Command-line configuration and collection options.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Which metric families a collection pass covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// OS, CPU, memory, disk, network and battery
    Minimal,
    /// Adds partitions, interfaces, uptime/load, temperature and GPU
    #[default]
    Extended,
}

/// Presentation adapter for the finished report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Indented JSON on stdout
    #[default]
    Console,
    /// Interactive terminal page
    Page,
}

/// One-shot host telemetry report
#[derive(Debug, Clone, Parser)]
#[command(name = "hostreport")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// How to present the report
    #[arg(short, long, value_enum, default_value_t = OutputMode::Console)]
    pub output: OutputMode,

    /// Family set to collect
    #[arg(long, value_enum, default_value_t = Variant::Extended)]
    pub variant: Variant,

    /// CPU utilization sampling window in milliseconds
    #[arg(long, default_value_t = default_sample_ms())]
    pub sample_ms: u64,

    /// Volume reported in the Disk family
    #[arg(long, default_value = "/")]
    pub root_volume: PathBuf,

    /// hwmon sensor group read for CPU temperature
    #[arg(long, default_value_t = default_sensor_group())]
    pub sensor_group: String,

    /// Path to /proc filesystem (for testing/containers)
    #[arg(long, default_value = "/proc")]
    pub proc_root: PathBuf,

    /// Path to /sys filesystem (for testing/containers)
    #[arg(long, default_value = "/sys")]
    pub sys_root: PathBuf,

    /// Run probes concurrently instead of one after another
    #[arg(long)]
    pub parallel: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn default_sample_ms() -> u64 {
    1000
}

fn default_sensor_group() -> String {
    "coretemp".to_string()
}

impl Config {
    /// Parse configuration from CLI arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            variant: self.variant,
            cpu_sample_window: Duration::from_millis(self.sample_ms),
            root_volume: self.root_volume.clone(),
            sensor_group: self.sensor_group.clone(),
            proc_root: self.proc_root.clone(),
            sys_root: self.sys_root.clone(),
            parallel: self.parallel,
        }
    }
}

/// Settings for one collection pass
#[derive(Debug, Clone, PartialEq)]
pub struct CollectOptions {
    pub variant: Variant,
    pub cpu_sample_window: Duration,
    pub root_volume: PathBuf,
    pub sensor_group: String,
    pub proc_root: PathBuf,
    pub sys_root: PathBuf,
    pub parallel: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            cpu_sample_window: Duration::from_millis(default_sample_ms()),
            root_volume: PathBuf::from("/"),
            sensor_group: default_sensor_group(),
            proc_root: PathBuf::from("/proc"),
            sys_root: PathBuf::from("/sys"),
            parallel: false,
        }
    }
}
