use crate::error::RenameError;
use crate::metadata::MetadataProvider;
use crate::pipeline::Progress;
use crate::record::FileRecord;
use crate::sanitize::check_file_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RenameStatus {
    Renamed,
    NotNeeded,
    Invalid(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOutcome {
    pub original_path: PathBuf,
    /// Same as `original_path` unless the rename happened.
    pub new_path: PathBuf,
    pub status: RenameStatus,
}

impl RenameOutcome {
    fn unchanged(record: &FileRecord, status: RenameStatus) -> Self {
        Self {
            original_path: record.absolute_path.clone(),
            new_path: record.absolute_path.clone(),
            status,
        }
    }

    pub fn success(&self) -> bool {
        self.status == RenameStatus::Renamed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    pub outcomes: Vec<RenameOutcome>,
    pub renamed: usize,
    pub not_needed: usize,
    pub invalid: usize,
    pub failed: usize,
}

impl ApplyResult {
    fn from_outcomes(outcomes: Vec<RenameOutcome>) -> Self {
        let mut result = Self::default();
        for outcome in &outcomes {
            match outcome.status {
                RenameStatus::Renamed => result.renamed += 1,
                RenameStatus::NotNeeded => result.not_needed += 1,
                RenameStatus::Invalid(_) => result.invalid += 1,
                RenameStatus::Failed(_) => result.failed += 1,
            }
        }
        result.outcomes = outcomes;
        result
    }
}

#[derive(Debug, Clone)]
struct StagedRename {
    index: usize,
    original_path: PathBuf,
    target_path: PathBuf,
    temp_path: PathBuf,
}

/// Applies every changed, valid record to disk.
///
/// Files go first, then folders from the deepest level up, so a folder is
/// only moved once nothing below it still has to be renamed. Within each of
/// those rounds, sources are first moved aside to temporary names in their own
/// folder and then moved to their targets, so swaps and chains work.
///
/// An item whose target is held by a file that is not itself being moved is
/// rejected before anything is touched, as is every item that depends on it.
/// A failing item is put back where it was and reported; the rest of the
/// batch continues. Existing files are never overwritten. Outcomes follow
/// the order of `records`.
pub fn rename_records(records: &[FileRecord], progress: &mut Progress<'_>) -> ApplyResult {
    let total = records.len();
    let mut step = 0usize;
    progress.report(0, total);

    let mut outcomes: Vec<Option<RenameOutcome>> = vec![None; total];
    let mut files = Vec::new();
    let mut folders_by_depth = BTreeMap::<usize, Vec<StagedRename>>::new();

    for (index, record) in records.iter().enumerate() {
        match plan_target(record) {
            Ok(Some(target_path)) => {
                let entry = StagedRename {
                    index,
                    original_path: record.absolute_path.clone(),
                    temp_path: temp_path_for(&record.absolute_path, index),
                    target_path,
                };
                if record.is_folder {
                    let depth = record.absolute_path.components().count();
                    folders_by_depth.entry(depth).or_default().push(entry);
                } else {
                    files.push(entry);
                }
                continue;
            }
            Ok(None) => {
                outcomes[index] = Some(RenameOutcome::unchanged(record, RenameStatus::NotNeeded));
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", record.absolute_path.display());
                outcomes[index] = Some(RenameOutcome::unchanged(
                    record,
                    RenameStatus::Invalid(err.to_string()),
                ));
            }
        }
        step += 1;
        progress.report(step, total);
    }

    let mut finish = |index: usize, outcome: RenameOutcome| {
        outcomes[index] = Some(outcome);
        step += 1;
        progress.report(step, total);
    };
    for round in std::iter::once(files).chain(folders_by_depth.into_values().rev()) {
        apply_round(round, &mut finish);
    }

    progress.report(0, total);
    ApplyResult::from_outcomes(outcomes.into_iter().flatten().collect())
}

fn apply_round(mut queued: Vec<StagedRename>, finish: &mut dyn FnMut(usize, RenameOutcome)) {
    while let Some((position, reason)) = blocked_entry(&queued) {
        let entry = queued.remove(position);
        let reason = failure(&entry.original_path, &entry.target_path, reason.to_string());
        finish(entry.index, failed(&entry, &entry.original_path, reason));
    }

    let mut staged = Vec::with_capacity(queued.len());
    for entry in queued {
        match fs::rename(&entry.original_path, &entry.temp_path) {
            Ok(()) => staged.push(entry),
            Err(err) => {
                let reason = failure(&entry.original_path, &entry.target_path, err.to_string());
                finish(entry.index, failed(&entry, &entry.original_path, reason));
            }
        }
    }

    for entry in staged {
        let outcome = match finalize(&entry) {
            Ok(()) => {
                log::info!(
                    "renamed {} -> {}",
                    entry.original_path.display(),
                    entry.target_path.display()
                );
                RenameOutcome {
                    original_path: entry.original_path.clone(),
                    new_path: entry.target_path.clone(),
                    status: RenameStatus::Renamed,
                }
            }
            Err((reason, left_at)) => failed(&entry, &left_at, reason),
        };
        finish(entry.index, outcome);
    }
}

/// First queued entry that could only be moved by overwriting something.
///
/// A target counts as free when nothing is there or when another queued entry
/// moves away from it. Removing a blocked entry can block the entries that
/// were waiting for its path, so callers ask again until this returns `None`.
fn blocked_entry(queued: &[StagedRename]) -> Option<(usize, &'static str)> {
    let vacated: HashSet<&Path> = queued.iter().map(|e| e.original_path.as_path()).collect();
    let mut claimed = HashSet::with_capacity(queued.len());

    for (position, entry) in queued.iter().enumerate() {
        let target = entry.target_path.as_path();
        if !claimed.insert(target) {
            return Some((position, "another record has the same target"));
        }
        if exists(target) && !vacated.contains(target) && !is_case_change(entry) {
            return Some((position, "target already exists"));
        }
    }
    None
}

/// `a.jpg -> A.jpg` finds its own source on case-insensitive file systems.
fn is_case_change(entry: &StagedRename) -> bool {
    entry.original_path.to_string_lossy().to_lowercase()
        == entry.target_path.to_string_lossy().to_lowercase()
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Builds fresh records for every renamed entry of `result`.
pub fn refresh_records(
    result: &ApplyResult,
    provider: &dyn MetadataProvider,
) -> Result<Vec<FileRecord>, RenameError> {
    result
        .outcomes
        .iter()
        .filter(|outcome| outcome.success())
        .map(|outcome| FileRecord::from_path(&outcome.new_path, provider))
        .collect()
}

/// `Ok(None)` when nothing has to happen on disk.
fn plan_target(record: &FileRecord) -> Result<Option<PathBuf>, RenameError> {
    if !record.is_name_changed() {
        return Ok(None);
    }
    if !record.is_valid() {
        return Err(RenameError::InvalidArgument(format!(
            "planned name {:?} is blank",
            record.planned_name()
        )));
    }

    let file_name = record.planned_file_name();
    check_file_name(&file_name)?;

    let parent = record.absolute_path.parent().ok_or_else(|| {
        RenameError::InvalidArgument(format!(
            "{} has no parent folder",
            record.absolute_path.display()
        ))
    })?;
    let target = parent.join(file_name);
    if target == record.absolute_path {
        return Ok(None);
    }
    Ok(Some(target))
}

/// Moves a staged entry to its target, or back to its original path.
///
/// On failure, returns the reason and the path the file was left at. When the
/// original path has been taken in the meantime the file stays at its
/// temporary name.
fn finalize(entry: &StagedRename) -> Result<(), (String, PathBuf)> {
    let attempt = if exists(&entry.target_path) {
        Err("target already exists".to_string())
    } else {
        fs::rename(&entry.temp_path, &entry.target_path).map_err(|err| err.to_string())
    };

    let Err(reason) = attempt else {
        return Ok(());
    };
    let reason = failure(&entry.original_path, &entry.target_path, reason);
    if exists(&entry.original_path) {
        log::warn!(
            "{} is taken, leaving {}",
            entry.original_path.display(),
            entry.temp_path.display()
        );
        return Err((
            format!(
                "{reason}; original path is taken, file left at {}",
                entry.temp_path.display()
            ),
            entry.temp_path.clone(),
        ));
    }
    if let Err(err) = fs::rename(&entry.temp_path, &entry.original_path) {
        return Err((
            format!(
                "{reason}; could not restore from {}: {err}",
                entry.temp_path.display()
            ),
            entry.temp_path.clone(),
        ));
    }
    Err((reason, entry.original_path.clone()))
}

fn failure(from: &Path, to: &Path, reason: String) -> String {
    let err = RenameError::RenameFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        reason,
    };
    log::warn!("{err}");
    err.to_string()
}

fn failed(entry: &StagedRename, left_at: &Path, reason: String) -> RenameOutcome {
    RenameOutcome {
        original_path: entry.original_path.clone(),
        new_path: left_at.to_path_buf(),
        status: RenameStatus::Failed(reason),
    }
}

/// Hidden sibling of `original_path`, short enough for any source name.
fn temp_path_for(original_path: &Path, index: usize) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let parent = original_path.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!(".batch_renamer_tmp_{now}_{index}"))
}
