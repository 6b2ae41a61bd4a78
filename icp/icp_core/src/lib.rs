//! # ICP Core
//!
//! `icp_core` holds everything needed to write Ideal Customer Profile (ICP)
//! reports into the `company_profiles` table of a hosted PostgREST database.
//!
//! ## Crate Structure
//!
//! - **error**: Error type shared by every operation
//! - **id**: Strongly-typed company profile identifier
//! - **payload**: ICP report payload and the `company_report` column value
//! - **report_path**: Dotted paths into nested JSON reports
//! - **config**: Store configuration from TOML and the environment
//! - **store**: The `ProfileStore` seam with REST and in-memory backends
//! - **ops**: Push, inspect and reset operations built on a store

pub mod config;
pub mod error;
pub mod id;
pub mod ops;
pub mod payload;
pub mod report_path;
pub mod store;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use id::{ProfileId, DEFAULT_PROFILE_ID};
pub use ops::{
    inspect_profile, push_icp_report, reset_to_phase_one, ProfileInspection, PushSummary,
    WriteMode,
};
pub use payload::{IcpData, IcpReport, ReportUpdate, DEFAULT_WORKFLOW_STATUS};
pub use report_path::ReportPath;
pub use store::{MemoryStore, ProfileStore, RestStore, UpdateOutcome};
