//! Host telemetry collection.
//!
//! A collection pass probes a fixed set of metric families (OS, CPU,
//! memory, disks, network, uptime, battery, temperature, GPU) and assembles
//! them into a [`Report`] of human-readable values. A family that cannot be
//! measured becomes a short placeholder string instead of failing the pass.

pub mod assembler;
pub mod config;
pub mod console;
pub mod display;
pub mod metrics;
pub mod report;
pub mod source;
pub mod units;

pub use assembler::Assembler;
pub use config::{CollectOptions, Config, OutputMode, Variant};
pub use metrics::ProbeContext;
pub use report::{Family, FamilyValue, Report};
pub use source::Sources;

/// Collect an extended report from this host with default settings.
pub fn collect_report() -> Report {
    let options = CollectOptions::default();
    collect_report_with(&Sources::system(&options), &options)
}

/// Collect a report from the given sources, one family after another.
pub fn collect_report_with(sources: &Sources, options: &CollectOptions) -> Report {
    Assembler::new(ProbeContext::new(sources.clone(), options.clone())).collect()
}
