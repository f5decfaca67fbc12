//! End-to-end collection against mocked hosts.

use hostreport::metrics::gpu;
use hostreport::source::mock::{self, MockRunner, MockSource, Mocked};
use hostreport::source::CommandRunner;
use hostreport::{
    collect_report_with, console, Assembler, CollectOptions, Family, FamilyValue, ProbeContext,
    Variant,
};
use serde_json::{json, Value};
use std::sync::Arc;

const LSPCI: &str = "00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620 (rev 07)\n";

fn options(variant: Variant) -> CollectOptions {
    CollectOptions {
        variant,
        ..CollectOptions::default()
    }
}

fn linux_sources(source: MockSource) -> hostreport::Sources {
    let runner: Arc<dyn CommandRunner> = Arc::new(MockRunner::new().with_output("lspci", LSPCI));
    mock::sources(source, gpu::select("linux", runner))
}

fn to_json(report: &hostreport::Report) -> Value {
    let mut out = Vec::new();
    console::render(report, &mut out).unwrap();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn test_repeated_collection_has_same_keys() {
    let sources = linux_sources(MockSource::healthy());
    let options = options(Variant::Extended);

    let first = collect_report_with(&sources, &options);
    let second = collect_report_with(&sources, &options);
    assert_eq!(first.keys(), second.keys());
    assert_eq!(first.len(), 11);
}

#[test]
fn test_battery_failure_leaves_other_families_intact() {
    let healthy = collect_report_with(
        &linux_sources(MockSource::healthy()),
        &options(Variant::Extended),
    );

    for failure in [Mocked::Fail("read error".into()), Mocked::Panic] {
        let mut source = MockSource::healthy();
        source.battery = failure;
        let report = collect_report_with(&linux_sources(source), &options(Variant::Extended));

        assert_eq!(report.keys(), healthy.keys());
        assert_eq!(
            report.get(Family::Battery),
            Some(&FamilyValue::Placeholder(
                "Battery information not available".into()
            ))
        );
        for family in Family::ALL.into_iter().filter(|f| *f != Family::Battery) {
            assert_eq!(report.get(family), healthy.get(family), "{} changed", family);
        }
    }
}

#[test]
fn test_placeholders_are_plain_strings() {
    let mut source = MockSource::healthy();
    source.temperatures = Mocked::Fail("hwmon gone".into());
    source.memory = Mocked::Unsupported;

    let json = to_json(&collect_report_with(
        &linux_sources(source),
        &options(Variant::Extended),
    ));
    assert_eq!(json["CPU Temperature"], json!("CPU temperature not available"));
    assert_eq!(json["Memory"], json!("Memory information not available"));
}

#[test]
fn test_no_partitions_is_empty_list() {
    let mut source = MockSource::healthy();
    source.partitions = Mocked::Ok(Vec::new());

    let json = to_json(&collect_report_with(
        &linux_sources(source),
        &options(Variant::Extended),
    ));
    assert_eq!(json["Disk Partitions"], json!([]));
}

#[test]
fn test_gpu_absent_on_unsupported_platform() {
    let runner = Arc::new(MockRunner::new().with_output("lspci", LSPCI));
    let sources = mock::sources(
        MockSource::healthy(),
        gpu::select("macos", runner.clone()),
    );

    let report = collect_report_with(&sources, &options(Variant::Extended));
    assert!(!report.contains(Family::Gpu));
    assert_eq!(report.len(), 10);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_gpu_listed_on_linux() {
    let report = collect_report_with(
        &linux_sources(MockSource::healthy()),
        &options(Variant::Extended),
    );
    assert_eq!(
        report.get(Family::Gpu),
        Some(&FamilyValue::Gpu(vec![
            "Intel Corporation UHD Graphics 620 (rev 07)".into()
        ]))
    );
}

#[test]
fn test_missing_gpu_utility_is_placeholder() {
    let runner: Arc<dyn CommandRunner> = Arc::new(MockRunner::new());
    let sources = mock::sources(MockSource::healthy(), gpu::select("windows", runner));

    let json = to_json(&collect_report_with(&sources, &options(Variant::Extended)));
    assert_eq!(json["GPU"], json!("GPU information not available"));
}

#[test]
fn test_memory_end_to_end() {
    let json = to_json(&collect_report_with(
        &linux_sources(MockSource::healthy()),
        &options(Variant::Minimal),
    ));
    assert_eq!(
        json["Memory"],
        json!({
            "total": "8.00 GB",
            "available": "4.00 GB",
            "used": "4.00 GB",
            "usage": 50.0,
        })
    );
}

#[test]
fn test_minimal_variant_is_subset() {
    let sources = linux_sources(MockSource::healthy());
    let minimal = collect_report_with(&sources, &options(Variant::Minimal));
    let extended = collect_report_with(&sources, &options(Variant::Extended));

    assert_eq!(
        minimal.keys(),
        vec!["OS", "CPU", "Memory", "Disk", "Network", "Battery"]
    );
    for key in minimal.keys() {
        assert!(extended.keys().contains(&key));
    }
}

#[test]
fn test_unresolvable_hostname_keeps_hostname() {
    let mut source = MockSource::healthy();
    source.resolved = Mocked::Fail("no hosts entry".into());

    let json = to_json(&collect_report_with(
        &linux_sources(source),
        &options(Variant::Minimal),
    ));
    assert_eq!(
        json["Network"],
        json!({"hostname": "testhost", "ip_address": "Unavailable"})
    );
}

#[tokio::test]
async fn test_concurrent_collection_matches_sequential() {
    let mut source = MockSource::healthy();
    source.cpu_counts = Mocked::Panic;
    let assembler = Assembler::new(ProbeContext::new(
        linux_sources(source),
        options(Variant::Extended),
    ));

    let sequential = assembler.collect();
    let concurrent = assembler.collect_concurrent().await;
    assert_eq!(sequential.keys(), concurrent.keys());
    assert_eq!(sequential.get(Family::Cpu), concurrent.get(Family::Cpu));
}
