use super::{place, ItemPosition};
use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};

/// Adds the names of the folders containing the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentFolders {
    pub position: ItemPosition,
    /// Sign is ignored.
    pub parent_count: i64,
    pub separator: String,
}

impl Default for ParentFolders {
    fn default() -> Self {
        Self {
            position: ItemPosition::Begin,
            parent_count: 1,
            separator: "_".to_string(),
        }
    }
}

impl Transformation for ParentFolders {
    fn name(&self) -> &'static str {
        "parent_folders"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let count = self.parent_count.unsigned_abs() as usize;
        if count == 0 {
            return PlanDelta::keep();
        }

        let path = record.absolute_path.to_string_lossy();
        let parents = parent_segments(&path);
        if parents.is_empty() {
            return PlanDelta::keep();
        }

        let nearest = &parents[parents.len().saturating_sub(count)..];
        let joined = nearest.join(&self.separator);
        PlanDelta::name(place(
            &joined,
            &record.original_name,
            &self.separator,
            self.position.into(),
        ))
    }
}

/// Folder names between the root and the final segment, in path order.
fn parent_segments(path: &str) -> Vec<String> {
    let normalized = path.replace('\\', "/");
    let mut segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

    // Last segment is the file itself.
    segments.pop();
    if !normalized.starts_with('/') && segments.first().is_some_and(|s| s.ends_with(':')) {
        segments.remove(0);
    }

    segments.into_iter().map(str::to_string).collect()
}
