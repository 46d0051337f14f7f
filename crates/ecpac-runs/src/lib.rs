//! Run planning for ecpac.
//!
//! A run is laid out on disk as planned filesystem entries that are shown
//! to the user before anything is written.

pub mod fsplan;
pub mod plan;
pub mod store;
pub mod types;

pub use fsplan::{FsPlan, FsPlanKind};
pub use plan::{PlanError, PlannedJob, RunPlan};
pub use store::{ManifestStore, StoreError};
pub use types::{JobRecord, RunManifest, RunStatus};
