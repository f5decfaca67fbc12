//! Runs the probes for a variant and assembles their results into a report.

use crate::metrics::{self, ProbeContext, ProbeError, ProbeResult};
use crate::report::{Family, FamilyValue, Report};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Assembles one report per call; holds no state between passes.
pub struct Assembler {
    ctx: Arc<ProbeContext>,
}

impl Assembler {
    pub fn new(ctx: ProbeContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Probe every family of the configured variant, one after another.
    pub fn collect(&self) -> Report {
        let started = Instant::now();
        let mut report = Report::new();

        for &family in metrics::families(self.ctx.options.variant) {
            let result = run_isolated(family, &self.ctx);
            apply(&mut report, family, result);
        }

        info!(
            "Collected {} families in {:.2?}",
            report.len(),
            started.elapsed()
        );
        report
    }

    /// Probe every family on the blocking pool at once.
    ///
    /// Families land in the same order as [`collect`](Self::collect) so
    /// both modes produce identical key sequences.
    pub async fn collect_concurrent(&self) -> Report {
        let started = Instant::now();
        let families = metrics::families(self.ctx.options.variant);
        let mut tasks = JoinSet::new();

        for (index, &family) in families.iter().enumerate() {
            let ctx = Arc::clone(&self.ctx);
            tasks.spawn_blocking(move || (index, run_isolated(family, &ctx)));
        }

        let mut results: Vec<Option<ProbeResult>> = families.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!("Probe task failed to join: {}", e),
            }
        }

        let mut report = Report::new();
        for (&family, result) in families.iter().zip(results) {
            let result = result
                .unwrap_or_else(|| Err(ProbeError::unavailable("probe task did not complete")));
            apply(&mut report, family, result);
        }

        info!(
            "Collected {} families concurrently in {:.2?}",
            report.len(),
            started.elapsed()
        );
        report
    }
}

/// Run one probe, turning a panic into an unavailable result.
fn run_isolated(family: Family, ctx: &ProbeContext) -> ProbeResult {
    debug!("Probing {}", family);
    panic::catch_unwind(AssertUnwindSafe(|| metrics::run(family, ctx))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "probe panicked".to_string());
        Err(ProbeError::Unavailable(reason))
    })
}

fn apply(report: &mut Report, family: Family, result: ProbeResult) {
    match result {
        Ok(value) => report.insert(family, value),
        Err(ProbeError::Unsupported) => {
            debug!("{} not supported here, omitting", family);
        }
        Err(ProbeError::Unavailable(reason)) => {
            warn!("{} unavailable: {}", family, reason);
            report.insert(family, FamilyValue::Placeholder(family.placeholder().to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::metrics::test_support::context;
    use crate::source::mock::{MockSource, Mocked};

    fn assembler(source: MockSource, variant: Variant) -> Assembler {
        let mut ctx = context(source);
        ctx.options.variant = variant;
        Assembler::new(ctx)
    }

    #[test]
    fn test_extended_keys_in_order() {
        let report = assembler(MockSource::healthy(), Variant::Extended).collect();
        // GPU is unsupported in the test context and left out
        assert_eq!(
            report.keys(),
            vec![
                "OS",
                "CPU",
                "Memory",
                "Disk",
                "Disk Partitions",
                "Network",
                "Network Interfaces",
                "Uptime",
                "Battery",
                "CPU Temperature",
            ]
        );
    }

    #[test]
    fn test_minimal_keys() {
        let report = assembler(MockSource::healthy(), Variant::Minimal).collect();
        assert_eq!(
            report.keys(),
            vec!["OS", "CPU", "Memory", "Disk", "Network", "Battery"]
        );
    }

    #[test]
    fn test_panicking_probe_becomes_placeholder() {
        let mut source = MockSource::healthy();
        source.memory = Mocked::Panic;

        let report = assembler(source, Variant::Minimal).collect();
        assert_eq!(report.len(), 6);
        assert_eq!(
            report.get(Family::Memory).and_then(FamilyValue::as_placeholder),
            Some(Family::Memory.placeholder())
        );
        assert!(!report.get(Family::Cpu).unwrap().is_placeholder());
    }

    #[test]
    fn test_unsupported_family_is_omitted() {
        let mut source = MockSource::healthy();
        source.boot_time = Mocked::Unsupported;

        let report = assembler(source, Variant::Extended).collect();
        assert!(!report.contains(Family::Uptime));
        assert!(report.contains(Family::Temperature));
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let mut source = MockSource::healthy();
        source.battery = Mocked::Panic;
        let assembler = assembler(source, Variant::Extended);

        let sequential = assembler.collect();
        let concurrent = assembler.collect_concurrent().await;
        assert_eq!(sequential.keys(), concurrent.keys());
        assert_eq!(
            concurrent.get(Family::Battery).and_then(FamilyValue::as_placeholder),
            Some("Battery information not available")
        );
    }
}
