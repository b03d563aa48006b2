use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Key the batch is ordered by before numbers are handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortSource {
    #[default]
    FileName,
    FilePath,
    FileSize,
    FsCreated,
    FsModified,
    ContentCreated,
    ImageWidth,
    ImageHeight,
}

impl SortSource {
    /// Missing values sort as `0` so the order stays total.
    fn compare(self, a: &FileRecord, b: &FileRecord) -> Ordering {
        match self {
            Self::FileName => a.original_file_name().cmp(&b.original_file_name()),
            Self::FilePath => a.absolute_path.cmp(&b.absolute_path),
            Self::FileSize => a.size_bytes.cmp(&b.size_bytes),
            Self::FsCreated => time_key(a.fs_created_at).total_cmp(&time_key(b.fs_created_at)),
            Self::FsModified => time_key(a.fs_modified_at).total_cmp(&time_key(b.fs_modified_at)),
            Self::ContentCreated => content_key(a).total_cmp(&content_key(b)),
            Self::ImageWidth => width_key(a).cmp(&width_key(b)),
            Self::ImageHeight => height_key(a).cmp(&height_key(b)),
        }
    }
}

fn time_key(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

fn content_key(record: &FileRecord) -> f64 {
    time_key(record.metadata.as_ref().and_then(|m| m.content_created_at))
}

fn width_key(record: &FileRecord) -> i64 {
    record.metadata.as_ref().and_then(|m| m.width).unwrap_or(0)
}

fn height_key(record: &FileRecord) -> i64 {
    record.metadata.as_ref().and_then(|m| m.height).unwrap_or(0)
}

/// Replaces names with zero-padded counter values in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceGenerator {
    pub start_number: i64,
    pub step_value: i64,
    /// Minimum digit count.
    pub padding: usize,
    pub sort_source: SortSource,
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self {
            start_number: 1,
            step_value: 1,
            padding: 1,
            sort_source: SortSource::FileName,
        }
    }
}

impl Transformation for SequenceGenerator {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn arrange(&self, records: &mut [FileRecord]) {
        let source = self.sort_source;
        records.sort_by(|a, b| source.compare(a, b));
    }

    fn process(&self, _record: &FileRecord, index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let value = self
            .start_number
            .saturating_add((index as i64).saturating_mul(self.step_value));
        PlanDelta::name(format!("{value:0width$}", width = self.padding))
    }
}
