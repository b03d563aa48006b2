use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncateMode {
    #[default]
    TrimWhitespace,
    RemoveFromStart,
    RemoveFromEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Truncate {
    pub symbol_count: usize,
    pub mode: TruncateMode,
}

impl Transformation for Truncate {
    fn name(&self) -> &'static str {
        "truncate"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let name = record.original_name.as_str();
        let length = name.chars().count();

        // An empty result is allowed here; the executor refuses to apply it.
        let next = match self.mode {
            TruncateMode::TrimWhitespace => name.trim().to_string(),
            _ if self.symbol_count == 0 => return PlanDelta::keep(),
            _ if self.symbol_count >= length => String::new(),
            TruncateMode::RemoveFromStart => name.chars().skip(self.symbol_count).collect(),
            TruncateMode::RemoveFromEnd => name.chars().take(length - self.symbol_count).collect(),
        };
        PlanDelta::name(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{Truncate, TruncateMode};
    use crate::transform::test_support::{record, run_one};

    fn truncate(symbol_count: usize, mode: TruncateMode) -> Truncate {
        Truncate { symbol_count, mode }
    }

    #[test]
    fn trim_whitespace_ignores_symbol_count() {
        let result = run_one(
            &truncate(3, TruncateMode::TrimWhitespace),
            record("  name  ", ".txt"),
        );
        assert_eq!(result.planned_name(), "name");
    }

    #[test]
    fn removes_symbols_from_chosen_end() {
        let start = run_one(
            &truncate(4, TruncateMode::RemoveFromStart),
            record("IMG_0001", ".jpg"),
        );
        let end = run_one(
            &truncate(5, TruncateMode::RemoveFromEnd),
            record("IMG_0001", ".jpg"),
        );
        assert_eq!(start.planned_name(), "0001");
        assert_eq!(end.planned_name(), "IMG");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let result = run_one(
            &truncate(1, TruncateMode::RemoveFromEnd),
            record("写真a", ".jpg"),
        );
        assert_eq!(result.planned_name(), "写真");
    }

    #[test]
    fn zero_count_is_no_op() {
        let result = run_one(
            &truncate(0, TruncateMode::RemoveFromStart),
            record("abc", ".txt"),
        );
        assert!(!result.is_name_changed());
    }

    #[test]
    fn count_at_or_over_length_yields_empty_invalid_name() {
        let result = run_one(
            &truncate(3, TruncateMode::RemoveFromEnd),
            record("abc", ".txt"),
        );
        assert_eq!(result.planned_name(), "");
        assert!(!result.is_valid());
    }
}
