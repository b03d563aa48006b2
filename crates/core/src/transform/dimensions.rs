use super::{place, ItemPositionWithReplacement};
use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSide {
    #[default]
    Width,
    Height,
}

/// Adds `<left><sep><right>` image dimensions, e.g. `4000x3000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDimensions {
    pub position: ItemPositionWithReplacement,
    pub left_side: DimensionSide,
    pub right_side: DimensionSide,
    pub dimension_separator: String,
    pub name_separator: String,
}

impl Default for ImageDimensions {
    fn default() -> Self {
        Self {
            position: ItemPositionWithReplacement::Begin,
            left_side: DimensionSide::Width,
            right_side: DimensionSide::Height,
            dimension_separator: "x".to_string(),
            name_separator: "_".to_string(),
        }
    }
}

impl Transformation for ImageDimensions {
    fn name(&self) -> &'static str {
        "image_dimensions"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let Some((width, height)) = record.metadata.as_ref().and_then(|m| m.dimensions()) else {
            return PlanDelta::keep();
        };

        let side = |side: DimensionSide| match side {
            DimensionSide::Width => width.abs(),
            DimensionSide::Height => height.abs(),
        };
        let value = format!(
            "{}{}{}",
            side(self.left_side),
            self.dimension_separator,
            side(self.right_side)
        );
        PlanDelta::name(place(
            &value,
            &record.original_name,
            &self.name_separator,
            self.position,
        ))
    }
}
