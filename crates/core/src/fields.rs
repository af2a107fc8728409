//! Registration form fields and the answers submitted against them.
//!
//! A form's question list is an ordered array of [`Field`]s. Visitors answer
//! with a JSON object keyed by field id; [`collect_answers`] sanitizes every
//! value according to its field kind and reports the first field that fails
//! a required or membership check.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::sanitize::{clamp_int, clean_email, clean_line, clean_phone, clean_text};

/// Maximum label length.
pub const LABEL_MAX: usize = 120;

/// Maximum help text length.
pub const HELP_MAX: usize = 200;

/// Maximum length of a single choice option.
pub const OPTION_MAX: usize = 80;

/// Maximum number of options on a choice field.
pub const MAX_OPTIONS: usize = 80;

/// Minimum number of options on a choice field.
pub const MIN_OPTIONS: usize = 2;

/// Maximum length of a free text answer.
pub const ANSWER_TEXT_MAX: usize = 2000;

/// Questions shown per page of the public registration form.
pub const QUESTIONS_PER_PAGE: usize = 6;

/// Bounds applied to numeric field limits.
const NUMBER_LIMIT: i64 = 999_999;

// ---------------------------------------------------------------------------
// Field kinds
// ---------------------------------------------------------------------------

/// Input kind of a form field.
///
/// `checkbox` is accepted on input as an alias of [`FieldKind::Multiselect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Number,
    Date,
    Select,
    Radio,
    #[serde(alias = "checkbox")]
    Multiselect,
    Textarea,
}

impl FieldKind {
    /// Whether the field offers a fixed list of options.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Multiselect)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Multiselect => "multiselect",
            Self::Textarea => "textarea",
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A persisted form question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

/// Admin-supplied field definition, before sanitizing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldInput {
    /// Existing id to preserve (whole-array saves). Ignored by the editor's
    /// add operation, which always mints a new id.
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: Option<FieldKind>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

/// Mint a new field id (`q_` followed by 12 hex characters).
pub fn new_field_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("q_{}", &raw[..12])
}

impl Field {
    /// Sanitize and validate an admin field definition under the given id.
    pub fn from_input(id: String, input: &FieldInput) -> Result<Self, CoreError> {
        let id = clean_line(&id, 60);
        if id.is_empty() {
            return Err(CoreError::Validation("Field id must not be empty".into()));
        }

        let label = clean_line(&input.label, LABEL_MAX);
        if label.is_empty() {
            return Err(CoreError::Validation("Field label is required".into()));
        }

        let kind = input.kind.unwrap_or(FieldKind::Text);
        let help = clean_line(input.help.as_deref().unwrap_or(""), HELP_MAX);

        let options = if kind.is_choice() {
            let options: Vec<String> = input
                .options
                .iter()
                .map(|o| clean_line(o, OPTION_MAX))
                .filter(|o| !o.is_empty())
                .take(MAX_OPTIONS)
                .collect();
            if options.len() < MIN_OPTIONS {
                return Err(CoreError::Validation(format!(
                    "Field '{label}' needs at least {MIN_OPTIONS} options"
                )));
            }
            options
        } else {
            Vec::new()
        };

        let (min, max) = if kind == FieldKind::Number {
            let min = input.min.map(|v| clamp_int(Some(v), -NUMBER_LIMIT, NUMBER_LIMIT, 0));
            let max = input.max.map(|v| clamp_int(Some(v), -NUMBER_LIMIT, NUMBER_LIMIT, 0));
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    return Err(CoreError::Validation(format!(
                        "Field '{label}' has min {lo} greater than max {hi}"
                    )));
                }
            }
            (min, max)
        } else {
            (None, None)
        };

        Ok(Self {
            id,
            label,
            kind,
            required: input.required,
            help,
            options,
            min,
            max,
        })
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// A sanitized answer. Multiselect fields produce a list, everything else a
/// single string (empty when unanswered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Many(Vec<String>),
    One(String),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Many(values) => values.is_empty(),
            Answer::One(value) => value.is_empty(),
        }
    }
}

/// The first field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidField {
    pub field_id: String,
    pub reason: String,
}

impl From<InvalidField> for CoreError {
    fn from(err: InvalidField) -> Self {
        CoreError::Validation(format!("Field '{}': {}", err.field_id, err.reason))
    }
}

fn scalar_text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Sanitize one raw answer according to its field.
///
/// Values that cannot be salvaged (malformed email, phone with too few
/// digits, unparseable date) collapse to an empty answer, so they only fail
/// when the field is required. Choice values outside the field's options
/// are always rejected.
pub fn normalize_answer(field: &Field, raw: Option<&Value>) -> Result<Answer, InvalidField> {
    let invalid = |reason: &str| InvalidField {
        field_id: field.id.clone(),
        reason: reason.to_string(),
    };

    let answer = match field.kind {
        FieldKind::Multiselect => {
            let picked: Vec<String> = match raw {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|v| clean_line(&scalar_text(Some(v)), OPTION_MAX))
                    .filter(|v| !v.is_empty())
                    .collect(),
                other => {
                    let single = clean_line(&scalar_text(other), OPTION_MAX);
                    if single.is_empty() {
                        Vec::new()
                    } else {
                        vec![single]
                    }
                }
            };
            if let Some(bad) = picked.iter().find(|v| !field.options.contains(v)) {
                return Err(invalid(&format!("'{bad}' is not one of the options")));
            }
            let mut unique = Vec::with_capacity(picked.len());
            for value in picked {
                if !unique.contains(&value) {
                    unique.push(value);
                }
            }
            Answer::Many(unique)
        }
        FieldKind::Select | FieldKind::Radio => {
            let value = clean_line(&scalar_text(raw), OPTION_MAX);
            if !value.is_empty() && !field.options.contains(&value) {
                return Err(invalid(&format!("'{value}' is not one of the options")));
            }
            Answer::One(value)
        }
        FieldKind::Email => Answer::One(clean_email(&scalar_text(raw)).unwrap_or_default()),
        FieldKind::Phone => Answer::One(clean_phone(&scalar_text(raw)).unwrap_or_default()),
        FieldKind::Number => {
            let text = scalar_text(raw);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Answer::One(String::new())
            } else {
                let n = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| invalid("must be a number"))?;
                if let Some(min) = field.min {
                    if n < min as f64 {
                        return Err(invalid(&format!("must be at least {min}")));
                    }
                }
                if let Some(max) = field.max {
                    if n > max as f64 {
                        return Err(invalid(&format!("must be at most {max}")));
                    }
                }
                Answer::One(trimmed.to_string())
            }
        }
        FieldKind::Date => {
            let text = clean_line(&scalar_text(raw), 10);
            let valid = chrono::NaiveDate::parse_from_str(&text, "%Y-%m-%d").is_ok();
            Answer::One(if valid { text } else { String::new() })
        }
        FieldKind::Textarea => Answer::One(clean_text(&scalar_text(raw), ANSWER_TEXT_MAX, true)),
        FieldKind::Text => Answer::One(clean_line(&scalar_text(raw), ANSWER_TEXT_MAX)),
    };

    if field.required && answer.is_empty() {
        let reason = match field.kind {
            FieldKind::Multiselect => "select at least one option",
            FieldKind::Select | FieldKind::Radio => "choose an option",
            FieldKind::Email => "a valid email is required",
            FieldKind::Phone => "a valid phone number is required",
            _ => "this field is required",
        };
        return Err(invalid(reason));
    }

    Ok(answer)
}

/// Validate and sanitize answers for `fields`, in order.
///
/// The returned map has exactly one key per field id; keys in `raw` that do
/// not belong to any field are dropped.
pub fn collect_answers(
    fields: &[Field],
    raw: &serde_json::Map<String, Value>,
) -> Result<BTreeMap<String, Answer>, InvalidField> {
    let mut answers = BTreeMap::new();
    for field in fields {
        let answer = normalize_answer(field, raw.get(&field.id))?;
        answers.insert(field.id.clone(), answer);
    }
    Ok(answers)
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Split fields into pages of `per_page` (at least one page, even when empty).
pub fn paginate_fields(fields: &[Field], per_page: usize) -> Vec<&[Field]> {
    let per_page = per_page.max(1);
    if fields.is_empty() {
        return vec![fields];
    }
    fields.chunks(per_page).collect()
}

/// Validate one page of the registration form.
///
/// Returns the first invalid field on that page, if any.
pub fn validate_page(
    fields: &[Field],
    page: usize,
    per_page: usize,
    raw: &serde_json::Map<String, Value>,
) -> Result<Option<InvalidField>, CoreError> {
    let pages = paginate_fields(fields, per_page);
    let slice = pages.get(page).ok_or_else(|| {
        CoreError::Validation(format!(
            "Page {page} out of range (form has {} pages)",
            pages.len()
        ))
    })?;
    Ok(slice
        .iter()
        .find_map(|field| normalize_answer(field, raw.get(&field.id)).err()))
}

// ---------------------------------------------------------------------------
// Admin view
// ---------------------------------------------------------------------------

/// An answer paired with its question label for the admin detail view.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledAnswer {
    pub field_id: String,
    pub label: String,
    pub value: Value,
}

/// Order stored answers by the form's current field order.
///
/// Keys without a matching field (deleted or renamed questions) go last,
/// sorted by id, and use the raw id as their label.
pub fn labeled_answers(
    fields: &[Field],
    answers: &serde_json::Map<String, Value>,
) -> Vec<LabeledAnswer> {
    let index: HashMap<&str, (usize, &str)> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.as_str(), (i, f.label.as_str())))
        .collect();

    let mut rows: Vec<(usize, LabeledAnswer)> = answers
        .iter()
        .map(|(key, value)| {
            let (order, label) = index
                .get(key.as_str())
                .map(|(i, label)| (*i, (*label).to_string()))
                .unwrap_or((usize::MAX, key.clone()));
            (
                order,
                LabeledAnswer {
                    field_id: key.clone(),
                    label,
                    value: value.clone(),
                },
            )
        })
        .collect();

    rows.sort_by(|(a_order, a), (b_order, b)| {
        a_order.cmp(b_order).then_with(|| a.field_id.cmp(&b.field_id))
    });
    rows.into_iter().map(|(_, row)| row).collect()
}
