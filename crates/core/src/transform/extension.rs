use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};

/// Replaces the extension. A blank value removes it; a missing leading dot is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeExtension {
    pub new_extension: String,
}

impl Transformation for ChangeExtension {
    fn name(&self) -> &'static str {
        "change_extension"
    }

    fn process(&self, _record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let value = self.new_extension.as_str();
        let next = if value.trim().is_empty() {
            String::new()
        } else if value.starts_with('.') {
            value.to_string()
        } else {
            format!(".{value}")
        };
        PlanDelta::extension(next)
    }
}
