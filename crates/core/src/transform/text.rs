use super::{place, ItemPosition, ItemPositionExtended};
use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddText {
    pub text: String,
    pub position: ItemPosition,
}

impl Transformation for AddText {
    fn name(&self) -> &'static str {
        "add_text"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        PlanDelta::name(place(
            &self.text,
            &record.original_name,
            "",
            self.position.into(),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveText {
    pub text: String,
    pub position: ItemPosition,
}

impl Transformation for RemoveText {
    fn name(&self) -> &'static str {
        "remove_text"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        if self.text.is_empty() {
            return PlanDelta::keep();
        }

        let name = record.original_name.as_str();
        let stripped = match self.position {
            ItemPosition::Begin => name.strip_prefix(self.text.as_str()),
            ItemPosition::End => name.strip_suffix(self.text.as_str()),
        };
        PlanDelta::name(stripped.unwrap_or(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceText {
    pub position: ItemPositionExtended,
    pub text_to_replace: String,
    pub new_value: String,
}

impl Transformation for ReplaceText {
    fn name(&self) -> &'static str {
        "replace_text"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        if self.text_to_replace.is_empty() {
            return PlanDelta::keep();
        }

        let name = record.original_name.as_str();
        let replaced = match self.position {
            ItemPositionExtended::Begin => name.replacen(&self.text_to_replace, &self.new_value, 1),
            ItemPositionExtended::End => {
                let reversed = reverse(name).replacen(
                    &reverse(&self.text_to_replace),
                    &reverse(&self.new_value),
                    1,
                );
                reverse(&reversed)
            }
            ItemPositionExtended::Everywhere => name.replace(&self.text_to_replace, &self.new_value),
        };
        PlanDelta::name(replaced)
    }
}

fn reverse(value: &str) -> String {
    value.chars().rev().collect()
}
