use crate::pipeline::Transformation;
use crate::transform::{
    AddText, ChangeCase, ChangeExtension, DateTimeFormat, ImageDimensions, ParentFolders,
    RemoveText, ReplaceText, SequenceGenerator, Truncate,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One rename job: the transformation to run and its settings.
///
/// In TOML the transformation is picked with a `mode` key and its settings
/// sit next to it:
///
/// ```toml
/// mode = "add_text"
/// text = "trip_"
/// position = "begin"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenameJob {
    AddText(AddText),
    RemoveText(RemoveText),
    ReplaceText(ReplaceText),
    ChangeCase(ChangeCase),
    Truncate(Truncate),
    ChangeExtension(ChangeExtension),
    ParentFolders(ParentFolders),
    ImageDimensions(ImageDimensions),
    DateTime(DateTimeFormat),
    Sequence(SequenceGenerator),
}

impl RenameJob {
    pub fn transformation(&self) -> &dyn Transformation {
        match self {
            Self::AddText(t) => t,
            Self::RemoveText(t) => t,
            Self::ReplaceText(t) => t,
            Self::ChangeCase(t) => t,
            Self::Truncate(t) => t,
            Self::ChangeExtension(t) => t,
            Self::ParentFolders(t) => t,
            Self::ImageDimensions(t) => t,
            Self::DateTime(t) => t,
            Self::Sequence(t) => t,
        }
    }
}

pub fn parse_job(raw: &str) -> Result<RenameJob> {
    toml::from_str::<RenameJob>(raw).context("failed to parse rename job")
}

pub fn load_job(path: &Path) -> Result<RenameJob> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read job file: {}", path.display()))?;
    parse_job(&raw).with_context(|| format!("invalid job file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{load_job, parse_job, RenameJob};
    use crate::transform::{
        CaseKind, DateFormat, DateOrder, DateTimeSource, ItemPosition,
        ItemPositionWithReplacement, Separator, SortSource, TimeFormat, YearDigits,
    };
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_mode_and_settings() {
        let job = parse_job(
            r#"
            mode = "add_text"
            text = "trip_"
            position = "end"
            "#,
        )
        .expect("parse");
        let RenameJob::AddText(add) = &job else {
            panic!("unexpected job: {job:?}");
        };
        assert_eq!(add.text, "trip_");
        assert_eq!(add.position, ItemPosition::End);
        assert_eq!(job.transformation().name(), "add_text");
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let job = parse_job(r#"mode = "sequence""#).expect("parse");
        let RenameJob::Sequence(sequence) = job else {
            panic!("unexpected job");
        };
        assert_eq!(sequence.start_number, 1);
        assert_eq!(sequence.step_value, 1);
        assert_eq!(sequence.sort_source, SortSource::FileName);

        let job = parse_job("mode = \"change_case\"\ncase_kind = \"screaming_snake\"")
            .expect("parse");
        assert_eq!(
            job,
            RenameJob::ChangeCase(crate::transform::ChangeCase {
                capitalize: false,
                case_kind: CaseKind::ScreamingSnake,
            })
        );
    }

    #[test]
    fn parses_nested_date_time_formats() {
        let job = parse_job(
            r#"
            mode = "date_time"
            position = "begin"
            source = "fs_modified"
            time_format = "unused"
            use_fallback = true
            fallback_timestamp = 1700000000

            [date_format.pattern]
            order = "dmy"
            year = "short"
            separator = "dashed"
            "#,
        )
        .expect("parse");
        let RenameJob::DateTime(date_time) = job else {
            panic!("unexpected job");
        };
        assert_eq!(date_time.position, ItemPositionWithReplacement::Begin);
        assert_eq!(date_time.source, DateTimeSource::FsModified);
        assert_eq!(date_time.time_format, TimeFormat::Unused);
        assert_eq!(
            date_time.date_format,
            DateFormat::Pattern {
                order: DateOrder::Dmy,
                year: YearDigits::Short,
                separator: Separator::Dashed,
            }
        );
        assert_eq!(date_time.fallback_timestamp, Some(1_700_000_000.0));
        assert!(date_time.use_fallback);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = parse_job(r#"mode = "shuffle""#).expect_err("must fail");
        assert!(format!("{err:#}").contains("shuffle"));
    }

    #[test]
    fn load_job_reads_file_and_reports_path() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("job.toml");
        fs::write(&path, "mode = \"change_extension\"\nnew_extension = \"png\"\n")
            .expect("write job");

        let job = load_job(&path).expect("load");
        assert_eq!(job.transformation().name(), "change_extension");

        let missing = temp.path().join("missing.toml");
        let err = load_job(&missing).expect_err("must fail");
        assert!(err.to_string().contains("missing.toml"));
    }
}
