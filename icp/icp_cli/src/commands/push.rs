//! ICP push command
//!
//! Builds the `company_report` update and writes it with one request.

use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

use icp_core::ops::load_icp_data;
use icp_core::{
    push_icp_report, ProfileId, ReportUpdate, WriteMode, DEFAULT_PROFILE_ID,
    DEFAULT_WORKFLOW_STATUS,
};

use crate::integration;

/// Arguments for the push-icp command
#[derive(Args)]
pub struct PushIcpArgs {
    /// Company profile to update
    #[clap(long, default_value = DEFAULT_PROFILE_ID)]
    pub profile_id: ProfileId,

    /// JSON file shaped like {"icp_reports": [...]}; the embedded snapshot is used otherwise
    #[clap(long)]
    pub payload: Option<PathBuf>,

    /// Workflow status written into the report
    #[clap(long, default_value = DEFAULT_WORKFLOW_STATUS)]
    pub status: String,

    /// Keep the rest of the existing report instead of overwriting it
    #[clap(long)]
    pub merge: bool,

    /// Print the request body instead of sending it
    #[clap(long)]
    pub dry_run: bool,
}

/// Implementation of the push-icp command
pub fn execute_push_icp(args: &PushIcpArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let data = load_icp_data(args.payload.as_deref()).with_context(|| match &args.payload {
        Some(path) => format!("could not load ICP payload from {}", path.display()),
        None => "could not load embedded ICP payload".to_string(),
    })?;
    let update = ReportUpdate::new(data).with_status(args.status.as_str());
    let mode = if args.merge {
        WriteMode::Merge
    } else {
        WriteMode::Replace
    };

    if args.dry_run {
        let body = update.to_row_patch()?;
        println!("PATCH company_profiles where id = {}", args.profile_id);
        if mode == WriteMode::Merge {
            println!(
                "Merge mode: the stored company_report is read first and only \
                 phase_data.phase_2_icp_report and workflow_status from the body below are set in it"
            );
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        println!("Dry run! ICP Count: {}", update.icp().count());
        return Ok(());
    }

    let store = integration::open_store(config)?;
    let summary = push_icp_report(&store, args.profile_id, &update, mode)
        .with_context(|| format!("failed to update company profile {}", args.profile_id))?;

    println!("Updated! ICP Count: {}", summary.icp_count);
    Ok(())
}
