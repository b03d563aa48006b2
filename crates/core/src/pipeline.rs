use crate::error::RenameError;
use crate::record::{FileRecord, PlanDelta};

/// Optional `(current, total)` progress callback.
///
/// Invoked synchronously on the caller's thread; a caller that wants to stay
/// responsive pumps its own event loop from inside the callback.
#[derive(Default)]
pub struct Progress<'a> {
    callback: Option<&'a mut dyn FnMut(usize, usize)>,
}

impl<'a> Progress<'a> {
    pub fn new(callback: &'a mut dyn FnMut(usize, usize)) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn none() -> Self {
        Self { callback: None }
    }

    pub fn report(&mut self, current: usize, total: usize) {
        if let Some(callback) = self.callback.as_mut() {
            callback(current, total);
        }
    }
}

/// A single naming rule.
///
/// Hooks return a [`PlanDelta`] which the pipeline merges into the record;
/// the default for every hook is to keep the record as it is.
pub trait Transformation {
    fn name(&self) -> &'static str;

    /// Rejects configurations that can never produce a name. Runs before any
    /// record is touched.
    fn validate(&self) -> Result<(), RenameError> {
        Ok(())
    }

    /// Reorders the whole batch before the per-item phases.
    fn arrange(&self, _records: &mut [FileRecord]) {}

    fn preprocess(&self, _record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        PlanDelta::keep()
    }

    fn process(&self, record: &FileRecord, index: usize, batch: &[FileRecord]) -> PlanDelta;

    fn postprocess(&self, _record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        PlanDelta::keep()
    }
}

type Hook<'t> = dyn Fn(&FileRecord, usize, &[FileRecord]) -> PlanDelta + 't;

/// Drives `transformation` over `records` in three item-by-item phases.
///
/// Every phase reports `(0, total)` before it starts, `(n, total)` after each
/// item and `(0, total)` once more when it ends.
pub fn run_item_by_item(
    transformation: &dyn Transformation,
    mut records: Vec<FileRecord>,
    progress: &mut Progress<'_>,
) -> Result<Vec<FileRecord>, RenameError> {
    transformation.validate()?;
    if records.is_empty() {
        return Ok(records);
    }

    log::debug!(
        "running {} over {} records",
        transformation.name(),
        records.len()
    );

    transformation.arrange(&mut records);
    let records = run_phase(records, progress, &|r, i, b| {
        transformation.preprocess(r, i, b)
    });
    let records = run_phase(records, progress, &|r, i, b| transformation.process(r, i, b));
    let records = run_phase(records, progress, &|r, i, b| {
        transformation.postprocess(r, i, b)
    });

    log::debug!(
        "{} changed {} of {} records",
        transformation.name(),
        records.iter().filter(|r| r.is_name_changed()).count(),
        records.len()
    );
    Ok(records)
}

fn run_phase(
    records: Vec<FileRecord>,
    progress: &mut Progress<'_>,
    hook: &Hook<'_>,
) -> Vec<FileRecord> {
    let total = records.len();
    progress.report(0, total);

    let mut deltas = Vec::with_capacity(total);
    for (index, record) in records.iter().enumerate() {
        deltas.push(hook(record, index, &records));
        progress.report(index + 1, total);
    }

    progress.report(0, total);
    records
        .into_iter()
        .zip(deltas)
        .map(|(record, delta)| record.with_plan(delta))
        .collect()
}
