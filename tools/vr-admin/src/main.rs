//! VR-Admin: Volunteer-Roster admin CLI.

use anyhow::{Context, Result};
use clap::Parser;

use vr_02_membership::MembershipConfig;
use vr_admin::cli::Args;
use vr_admin::{runner, snapshot};
use vr_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON.
    let telemetry = TelemetryConfig {
        service_name: "vr-admin".to_string(),
        ..TelemetryConfig::from_env()
    };
    init_telemetry(&telemetry).context("initializing logging")?;

    let db = snapshot::load(&args.snapshot)?;
    let result = runner::run(&args.command, db, MembershipConfig::from_env()).await?;

    println!("{}", serde_json::to_string_pretty(&result.output)?);

    if args.command.is_mutation() && !args.dry_run {
        snapshot::save(&args.snapshot, &result.snapshot)?;
    }
    Ok(())
}
