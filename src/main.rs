//! hostreport - collect a snapshot of host telemetry and print it.

use anyhow::Result;
use hostreport::{console, display, Assembler, Config, OutputMode, ProbeContext, Sources};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("hostreport={}", config.log_level()).parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = config.collect_options();
    debug!("Collecting with {:?}", options);

    let assembler = Assembler::new(ProbeContext::new(Sources::system(&options), options.clone()));
    let report = if options.parallel {
        assembler.collect_concurrent().await
    } else {
        // The CPU sampling window blocks; keep it off the async workers.
        tokio::task::spawn_blocking(move || assembler.collect()).await?
    };

    match config.output {
        OutputMode::Console => console::render(&report, std::io::stdout().lock())?,
        OutputMode::Page => display::run_page(&report)?,
    }

    Ok(())
}
