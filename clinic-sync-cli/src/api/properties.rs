//! Property value codec
//!
//! Bidirectional mapping between tabular cells and Notion's typed property
//! payloads. Encoding is total: a value that cannot be represented for the
//! target kind is omitted, never an error, so one bad field cannot abort a
//! row or a sync. Decoding likewise never fails; property types without a
//! flattened form pass through as raw JSON.

use serde_json::{Value, json};

use super::schema::PropertyKind;
use crate::table::CellValue;

/// String forms accepted as "checked" for checkbox columns.
const TRUE_WORDS: [&str; 5] = ["true", "1", "y", "yes", "t"];

/// Encode one cell for a property of the given kind.
///
/// Returns `None` when the property must be omitted from the payload:
/// null-equivalent input (missing, NaN, blank string), failed numeric
/// coercion, an empty multi-select list, or a kind with no upload
/// representation. Omission is the canonical "no data" form — an explicit
/// empty value is never sent.
pub fn encode(value: &CellValue, kind: &PropertyKind) -> Option<Value> {
    if value.is_null() {
        return None;
    }
    match kind {
        PropertyKind::Title => Some(json!({ "title": [text_span(value)] })),
        PropertyKind::RichText => Some(json!({ "rich_text": [text_span(value)] })),
        PropertyKind::Number => value.as_f64().map(|n| json!({ "number": n })),
        PropertyKind::Checkbox => Some(json!({ "checkbox": checkbox_value(value) })),
        // Unknown option names are auto-created by the destination
        PropertyKind::Select => Some(json!({ "select": { "name": value.to_string() } })),
        PropertyKind::MultiSelect => {
            let names = option_names(value);
            if names.is_empty() {
                return None;
            }
            let options: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
            Some(json!({ "multi_select": options }))
        }
        PropertyKind::Date => Some(json!({ "date": { "start": iso_date_string(value) } })),
        // status and everything unmodeled has no upload representation
        PropertyKind::Status | PropertyKind::Other(_) => None,
    }
}

fn text_span(value: &CellValue) -> Value {
    json!({ "type": "text", "text": { "content": value.to_string() } })
}

fn checkbox_value(value: &CellValue) -> bool {
    match value {
        CellValue::String(s) => TRUE_WORDS.contains(&s.trim().to_lowercase().as_str()),
        other => other.is_truthy(),
    }
}

/// Option names for a multi-select cell: sequences contribute one name per
/// non-null element, scalars are split on commas. Names are trimmed and
/// empty segments dropped, preserving order.
fn option_names(value: &CellValue) -> Vec<String> {
    match value {
        CellValue::List(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| item.to_string().trim().to_string())
            .collect(),
        scalar => scalar
            .to_string()
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Render a cell as an ISO-8601 date value: instants keep their full
/// date-time and offset, calendar dates stay date-only, strings pass
/// through unchanged (the API accepts both forms).
fn iso_date_string(value: &CellValue) -> String {
    match value {
        CellValue::DateTime(dt) => dt.to_rfc3339(),
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode one typed property value into a flat cell.
pub fn decode(prop: &Value) -> CellValue {
    let Some(tag) = prop.get("type").and_then(Value::as_str) else {
        return CellValue::Json(prop.clone());
    };
    match PropertyKind::from_tag(tag) {
        PropertyKind::Title => plain_text(prop.get("title")),
        PropertyKind::RichText => plain_text(prop.get("rich_text")),
        PropertyKind::Number => match prop.get("number") {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            _ => CellValue::Null,
        },
        PropertyKind::Select => option_name(prop.get("select")),
        PropertyKind::Status => option_name(prop.get("status")),
        PropertyKind::Date => decode_date(prop.get("date")),
        _ => CellValue::Json(prop.clone()),
    }
}

/// Concatenation of all text spans' plain text, in order.
fn plain_text(spans: Option<&Value>) -> CellValue {
    let text: String = spans
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|span| span.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    CellValue::String(text)
}

fn option_name(option: Option<&Value>) -> CellValue {
    match option.and_then(|o| o.get("name")).and_then(Value::as_str) {
        Some(name) => CellValue::String(name.to_string()),
        None => CellValue::Null,
    }
}

/// A date with an end becomes a range; a bare start flattens to its
/// string; an unset date is null.
fn decode_date(date: Option<&Value>) -> CellValue {
    let Some(date) = date.filter(|d| !d.is_null()) else {
        return CellValue::Null;
    };
    let start = date.get("start").and_then(Value::as_str).map(str::to_string);
    let end = date.get("end").and_then(Value::as_str).map(str::to_string);
    let time_zone = date
        .get("time_zone")
        .and_then(Value::as_str)
        .map(str::to_string);
    match (start, end) {
        (start, Some(end)) => CellValue::DateRange {
            start,
            end: Some(end),
            time_zone,
        },
        (Some(start), None) => CellValue::String(start),
        (None, None) => CellValue::Null,
    }
}
