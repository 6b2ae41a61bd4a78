//! Profile maintenance commands

use anyhow::Context;
use clap::Args;
use log::info;
use std::path::Path;

use icp_core::{inspect_profile, reset_to_phase_one, ProfileId, DEFAULT_PROFILE_ID};

use crate::integration;

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Company profile to inspect
    #[clap(long, default_value = DEFAULT_PROFILE_ID)]
    pub profile_id: ProfileId,

    /// Print the result as JSON
    #[clap(long)]
    pub json: bool,
}

/// Arguments for the reset-phase command
#[derive(Args)]
pub struct ResetPhaseArgs {
    /// Company profile to reset
    #[clap(long, default_value = DEFAULT_PROFILE_ID)]
    pub profile_id: ProfileId,
}

/// Implementation of the inspect command
pub fn execute_inspect(args: &InspectArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let store = integration::open_store(config)?;
    info!("Fetching company profile: {}", args.profile_id);
    let inspection = inspect_profile(&store, args.profile_id)
        .with_context(|| format!("failed to inspect company profile {}", args.profile_id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("Company profile found: {}", args.profile_id);
    println!("Report keys: {}", inspection.report_keys.join(", "));
    match &inspection.phase_data_keys {
        None => {
            println!("No phase_data found in company_report");
            return Ok(());
        }
        Some(keys) => println!("Phase data keys: {}", keys.join(", ")),
    }
    println!("phase_2_icp_report exists? {}", inspection.has_icp_report);
    println!("phase_2_icp_creation exists? {}", inspection.has_icp_creation);
    println!("phase_2 exists? {}", inspection.has_phase_2);
    if let Some(count) = inspection.icp_count {
        println!("ICP Count: {count}");
    }
    Ok(())
}

/// Implementation of the reset-phase command
pub fn execute_reset_phase(args: &ResetPhaseArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let store = integration::open_store(config)?;
    println!("Resetting phase for company profile: {}", args.profile_id);
    reset_to_phase_one(&store, args.profile_id)
        .with_context(|| format!("failed to reset company profile {}", args.profile_id))?;
    println!("Successfully reset project to Phase 1. User can now regenerate ICPs.");
    Ok(())
}
