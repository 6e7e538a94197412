mod cli;
mod config;
mod telemetry;

use anyhow::{Context, Result};
use asset_inventory::{
    assemble, commit_snapshot, load_workbook, publish_document, Clock, FixedClock,
    SnapshotOutcome, SystemClock,
};
use std::path::Path;
use tracing::{error, info};

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    if cli.generate_config {
        println!("{}", Config::example_toml());
        return Ok(());
    }

    telemetry::init_tracing(cli.is_debug_enabled());
    info!(version = env!("CARGO_PKG_VERSION"), "Starting inventory export");

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    run(&config)
}

/// Read, assemble and write the document, then publish and snapshot it.
///
/// Only reading and writing are fatal. Publish and snapshot failures are
/// logged and the local document is kept.
fn run(config: &Config) -> Result<()> {
    let input = Path::new(&config.input.workbook);
    let tables = load_workbook(input)
        .with_context(|| format!("Failed to read workbook: {}", input.display()))?;

    let run_instant = SystemClock.now();
    let assembly = assemble(&tables, &config.transform, &FixedClock(run_instant));

    let output = Path::new(&config.output.path);
    let document = assembly
        .document
        .write_to(output)
        .with_context(|| format!("Failed to write document: {}", output.display()))?;

    info!(
        path = %output.display(),
        users = assembly.document.ausers.len(),
        assets = assembly.document.assets.len(),
        skipped_links = assembly.link_errors.len(),
        "Inventory document written"
    );

    if let Some(target) = config.publish_target() {
        match publish_document(&target, &document) {
            Ok(response) => info!(
                status = response.status,
                body = %response.body,
                "Inventory document published"
            ),
            Err(e) => error!(error = %e, url = %target.url, "Failed to publish inventory document"),
        }
    }

    if let Some(target) = config.snapshot_target(output, run_instant) {
        match commit_snapshot(&target) {
            Ok(SnapshotOutcome::Unchanged) => info!("Snapshot skipped, document unchanged"),
            Ok(SnapshotOutcome::Committed { pushed }) => {
                info!(pushed, message = %target.message, "Snapshot committed")
            }
            Err(e) => error!(error = %e, "Failed to snapshot inventory document"),
        }
    }

    Ok(())
}
