use crate::apply::{rename_records, ApplyResult};
use crate::collision::resolve_collisions;
use crate::config::RenameJob;
use crate::error::RenameError;
use crate::metadata::MetadataProvider;
use crate::pipeline::{run_item_by_item, Progress};
use crate::record::FileRecord;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Files are taken as they are; folders are listed.
    pub inputs: Vec<PathBuf>,
    pub recursive: bool,
    pub include_hidden: bool,
    /// Also plan the sub-folders found while listing.
    pub include_folders: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameStats {
    pub scanned: usize,
    pub skipped_hidden: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub invalid: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub job: RenameJob,
    pub records: Vec<FileRecord>,
    pub stats: RenameStats,
}

/// Discovers the inputs, runs the job over them and resolves collisions.
pub fn generate_plan(
    options: &PlanOptions,
    job: &RenameJob,
    provider: &dyn MetadataProvider,
    progress: &mut Progress<'_>,
) -> Result<RenamePlan> {
    let mut stats = RenameStats::default();
    let paths = discover(options, &mut stats)?;

    let records = paths
        .par_iter()
        .map(|path| FileRecord::from_path(path, provider))
        .collect::<Result<Vec<_>, RenameError>>()
        .context("failed to read discovered files")?;

    let records = plan_records(records, job, progress)
        .with_context(|| format!("{} job cannot run", job.transformation().name()))?;

    for record in &records {
        if !record.is_name_changed() {
            stats.unchanged += 1;
        } else if record.is_valid() {
            stats.changed += 1;
        } else {
            stats.invalid += 1;
        }
    }

    Ok(RenamePlan {
        job: job.clone(),
        records,
        stats,
    })
}

/// Runs `job` over records that are already built, then resolves collisions.
pub fn plan_records(
    records: Vec<FileRecord>,
    job: &RenameJob,
    progress: &mut Progress<'_>,
) -> Result<Vec<FileRecord>, RenameError> {
    let records = run_item_by_item(job.transformation(), records, progress)?;
    Ok(resolve_collisions(records, progress))
}

/// Renames everything the plan changes.
///
/// See [`rename_records`] for the order files and folders are moved in.
pub fn apply_plan(plan: &RenamePlan, progress: &mut Progress<'_>) -> ApplyResult {
    let result = rename_records(&plan.records, progress);
    log::debug!(
        "applied plan: {} renamed, {} failed, {} invalid",
        result.renamed,
        result.failed,
        result.invalid
    );
    result
}

/// Sorted, de-duplicated paths to plan.
fn discover(options: &PlanOptions, stats: &mut RenameStats) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    for input in &options.inputs {
        let meta = std::fs::metadata(input)
            .map_err(|_| RenameError::NotFound(input.clone()))
            .with_context(|| format!("input does not exist: {}", input.display()))?;
        if !meta.is_dir() {
            stats.scanned += 1;
            out.push(input.clone());
            continue;
        }

        let max_depth = if options.recursive { usize::MAX } else { 1 };
        let mut walker = WalkDir::new(input)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry =
                entry.with_context(|| format!("failed to walk folder: {}", input.display()))?;
            let is_dir = entry.file_type().is_dir();

            if is_hidden(entry.path()) && !options.include_hidden {
                stats.skipped_hidden += 1;
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }
            if is_dir && !options.include_folders {
                continue;
            }

            stats.scanned += 1;
            out.push(entry.into_path());
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
