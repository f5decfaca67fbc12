//! GPU listing through a per-platform strategy.
//!
//! Linux asks `lspci`, Windows asks `nvidia-smi`. Every other platform gets
//! [`UnsupportedGpuQuery`] and the GPU family is left out of the report.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::FamilyValue;
use crate::source::{CommandRunner, SourceError, SourceResult};
use std::sync::Arc;
use tracing::debug;

/// Lists GPU devices as descriptive strings
pub trait GpuQuery: Send + Sync {
    fn list_gpus(&self) -> SourceResult<Vec<String>>;
}

/// Pick the strategy for an OS family (`linux`, `windows`, ...).
pub fn select(os_family: &str, runner: Arc<dyn CommandRunner>) -> Arc<dyn GpuQuery> {
    match os_family.to_ascii_lowercase().as_str() {
        "linux" => {
            debug!("Using lspci for GPU listing");
            Arc::new(LspciGpuQuery { runner })
        }
        "windows" => {
            debug!("Using nvidia-smi for GPU listing");
            Arc::new(NvidiaSmiGpuQuery { runner })
        }
        other => {
            debug!("No GPU listing on {}", other);
            Arc::new(UnsupportedGpuQuery)
        }
    }
}

pub struct LspciGpuQuery {
    runner: Arc<dyn CommandRunner>,
}

impl GpuQuery for LspciGpuQuery {
    fn list_gpus(&self) -> SourceResult<Vec<String>> {
        let output = self.runner.run("lspci", &[])?;
        Ok(parse_lspci(&output))
    }
}

pub struct NvidiaSmiGpuQuery {
    runner: Arc<dyn CommandRunner>,
}

impl GpuQuery for NvidiaSmiGpuQuery {
    fn list_gpus(&self) -> SourceResult<Vec<String>> {
        let output = self.runner.run(
            "nvidia-smi",
            &["--query-gpu=name,memory.total", "--format=csv,noheader,nounits"],
        )?;
        parse_nvidia_smi(&output)
    }
}

pub struct UnsupportedGpuQuery;

impl GpuQuery for UnsupportedGpuQuery {
    fn list_gpus(&self) -> SourceResult<Vec<String>> {
        Err(SourceError::Unsupported("GPU listing"))
    }
}

const DISPLAY_CLASSES: [&str; 3] = [
    "VGA compatible controller",
    "3D controller",
    "Display controller",
];

/// Device descriptions of display-class lines in `lspci` output.
///
/// Format: `00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620 (rev 07)`
pub(crate) fn parse_lspci(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (_slot, rest) = line.split_once(' ')?;
            let (class, device) = rest.split_once(": ")?;
            let class = class.trim();
            // Class may carry a programming interface suffix, e.g. "[0300]"
            DISPLAY_CLASSES
                .iter()
                .any(|c| class.starts_with(c))
                .then(|| device.trim().to_string())
        })
        .collect()
}

/// `name, memory.total` CSV rows (MiB) from `nvidia-smi`
pub(crate) fn parse_nvidia_smi(output: &str) -> SourceResult<Vec<String>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.rsplit_once(',') {
            Some((name, memory)) => {
                let memory: u64 = memory
                    .trim()
                    .parse()
                    .map_err(|_| SourceError::parse("nvidia-smi output", line.to_string()))?;
                Ok(format!("{} ({} MB)", name.trim(), memory))
            }
            None => Ok(line.to_string()),
        })
        .collect()
}

pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let gpus = ctx.sources.gpu.list_gpus()?;
    if gpus.is_empty() {
        return Err(ProbeError::unavailable("no GPU detected"));
    }
    Ok(FamilyValue::Gpu(gpus))
}
