use crate::pipeline::Transformation;
use crate::record::{FileRecord, PlanDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
    Upper,
    Lower,
    #[default]
    Title,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeCase {
    pub capitalize: bool,
    pub case_kind: CaseKind,
}

impl Transformation for ChangeCase {
    fn name(&self) -> &'static str {
        "change_case"
    }

    fn process(&self, record: &FileRecord, _index: usize, _batch: &[FileRecord]) -> PlanDelta {
        let mut next = convert_case(&record.original_name, self.case_kind);
        if self.capitalize {
            next = upper_first(&next);
        }
        PlanDelta::name(next)
    }
}

/// Converts `input` to `kind`. Blank input yields an empty string.
pub fn convert_case(input: &str, kind: CaseKind) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    match kind {
        CaseKind::Upper => input.to_uppercase(),
        CaseKind::Lower => input.to_lowercase(),
        CaseKind::Camel => {
            let words = words(input);
            let mut out = String::new();
            for (i, word) in words.iter().enumerate() {
                if i == 0 {
                    out.push_str(&word.to_lowercase());
                } else {
                    out.push_str(&capitalize_word(word));
                }
            }
            out
        }
        CaseKind::Pascal => words(input).iter().map(|w| capitalize_word(w)).collect(),
        CaseKind::Snake => words(input).join("_").to_lowercase(),
        CaseKind::ScreamingSnake => words(input).join("_").to_uppercase(),
        CaseKind::Kebab => words(input).join("-").to_lowercase(),
        CaseKind::Title => title_case(&words(input).join(" ")),
    }
}

/// Splits on `_`, `-`, `.` and whitespace, dropping empty tokens.
fn words(input: &str) -> Vec<&str> {
    input
        .split(|c: char| matches!(c, '_' | '-' | '.') || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect()
}

/// First character upper-cased, the rest lower-cased.
fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every run of letters starts upper-case and continues lower-case; any
/// non-letter (digits included) starts a new run.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
