use super::date_format::{format_moment, CombineFormat, DateFormat, TimeFormat};
use super::{place, ItemPositionWithReplacement};
use crate::error::RenameError;
use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Pattern accepted for [`DateTimeSource::Custom`].
pub const CUSTOM_DATE_TIME_PATTERN: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeSource {
    FsCreated,
    FsModified,
    #[default]
    ContentCreated,
    Now,
    Custom,
}

/// Builds the name from a point in time taken from the file, its metadata,
/// the clock or a fixed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTimeFormat {
    pub position: ItemPositionWithReplacement,
    pub date_format: DateFormat,
    pub time_format: TimeFormat,
    pub combine_format: CombineFormat,
    pub source: DateTimeSource,
    pub use_uppercase_am_pm: bool,
    /// `YYYYMMDD_HHMMSS`, read when `source` is `custom`.
    pub custom_date_time: String,
    pub name_separator: String,
    pub use_fallback: bool,
    /// Epoch seconds used when the source has no value.
    pub fallback_timestamp: Option<f64>,
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        Self {
            position: ItemPositionWithReplacement::Replace,
            date_format: DateFormat::default(),
            time_format: TimeFormat::default(),
            combine_format: CombineFormat::default(),
            source: DateTimeSource::default(),
            use_uppercase_am_pm: true,
            custom_date_time: String::new(),
            name_separator: "_".to_string(),
            use_fallback: false,
            fallback_timestamp: None,
        }
    }
}

impl DateTimeFormat {
    fn resolve(&self, record: &FileRecord) -> Option<DateTime<Local>> {
        let primary = match self.source {
            DateTimeSource::FsCreated => record.fs_created_at.and_then(local_from_epoch),
            DateTimeSource::FsModified => record.fs_modified_at.and_then(local_from_epoch),
            DateTimeSource::ContentCreated => content_created_at(record).and_then(local_from_epoch),
            DateTimeSource::Now => Some(Local::now()),
            DateTimeSource::Custom => parse_custom(&self.custom_date_time).ok(),
        };
        if primary.is_some() || !self.use_fallback {
            return primary;
        }

        if let Some(fallback) = self.fallback_timestamp {
            return local_from_epoch(fallback);
        }
        [
            record.fs_created_at,
            record.fs_modified_at,
            content_created_at(record),
        ]
        .into_iter()
        .flatten()
        .filter(|seconds| *seconds != 0.0)
        .min_by(f64::total_cmp)
        .and_then(local_from_epoch)
    }
}

impl Transformation for DateTimeFormat {
    fn name(&self) -> &'static str {
        "date_time"
    }

    fn validate(&self) -> Result<(), RenameError> {
        if self.source == DateTimeSource::Custom {
            parse_custom(&self.custom_date_time)?;
        }
        Ok(())
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let Some(moment) = self.resolve(record) else {
            log::debug!(
                "no timestamp for {}, keeping name",
                record.absolute_path.display()
            );
            return PlanDelta::keep();
        };
        let Some(stamp) = format_moment(
            &moment,
            self.date_format,
            self.time_format,
            self.combine_format,
            self.use_uppercase_am_pm,
        ) else {
            return PlanDelta::keep();
        };

        PlanDelta::name(place(
            &stamp,
            &record.original_name,
            &self.name_separator,
            self.position,
        ))
    }
}

fn content_created_at(record: &FileRecord) -> Option<f64> {
    record.metadata.as_ref().and_then(|m| m.content_created_at)
}

/// Zero and non-finite values count as missing.
fn local_from_epoch(seconds: f64) -> Option<DateTime<Local>> {
    if !seconds.is_finite() || seconds == 0.0 {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos).map(|utc| utc.with_timezone(&Local))
}

fn parse_custom(value: &str) -> Result<DateTime<Local>, RenameError> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), CUSTOM_DATE_TIME_PATTERN)
        .map_err(|err| {
            RenameError::InvalidArgument(format!("custom date-time {value:?}: {err}"))
        })?;
    Local.from_local_datetime(&naive).earliest().ok_or_else(|| {
        RenameError::InvalidArgument(format!("custom date-time {value:?} does not exist locally"))
    })
}
