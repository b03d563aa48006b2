mod case;
mod date_format;
mod datetime;
mod dimensions;
mod extension;
mod parents;
mod sequence;
mod text;
mod truncate;

pub use case::{convert_case, CaseKind, ChangeCase};
pub use date_format::{
    Clock, CombineFormat, CombineOrder, DateFormat, DateOrder, Separator, TimeFormat, YearDigits,
};
pub use datetime::{DateTimeFormat, DateTimeSource};
pub use dimensions::{DimensionSide, ImageDimensions};
pub use extension::ChangeExtension;
pub use parents::ParentFolders;
pub use sequence::{SequenceGenerator, SortSource};
pub use text::{AddText, RemoveText, ReplaceText};
pub use truncate::{Truncate, TruncateMode};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPosition {
    #[default]
    Begin,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPositionExtended {
    #[default]
    Begin,
    End,
    Everywhere,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPositionWithReplacement {
    #[default]
    Begin,
    End,
    Replace,
}

/// Puts `value` before or after `name`, or instead of it.
fn place(value: &str, name: &str, separator: &str, position: ItemPositionWithReplacement) -> String {
    match position {
        ItemPositionWithReplacement::Begin => format!("{value}{separator}{name}"),
        ItemPositionWithReplacement::End => format!("{name}{separator}{value}"),
        ItemPositionWithReplacement::Replace => value.to_string(),
    }
}

impl From<ItemPosition> for ItemPositionWithReplacement {
    fn from(position: ItemPosition) -> Self {
        match position {
            ItemPosition::Begin => Self::Begin,
            ItemPosition::End => Self::End,
        }
    }
}
