mod apply;
mod collision;
mod config;
mod error;
mod metadata;
mod pipeline;
mod planner;
mod record;
mod sanitize;
pub mod transform;

pub use apply::{refresh_records, rename_records, ApplyResult, RenameOutcome, RenameStatus};
pub use collision::resolve_collisions;
pub use config::{load_job, parse_job, RenameJob};
pub use error::RenameError;
pub use metadata::{ChainedMetadataProvider, Metadata, MetadataMap, MetadataProvider, NoMetadata};
pub use pipeline::{run_item_by_item, Progress, Transformation};
pub use planner::{apply_plan, generate_plan, plan_records, PlanOptions, RenamePlan, RenameStats};
pub use record::{split_name, FileRecord, PlanDelta};
pub use sanitize::check_file_name;
