//! Best-effort field extraction from OpenBD payloads
//!
//! OpenBD records mix a flat `summary` block with deeply nested ONIX
//! structures, and the same field may appear as a single object, a list of
//! objects, or a scalar depending on the record. Every function here is
//! total: a wrong type anywhere degrades to "fragment omitted", never a
//! panic or error.

use super::BookMetadata;
use serde_json::Value;

/// Normalize a whole OpenBD response body.
///
/// The body is a JSON array keyed by the queried ISBNs; a missing, empty, or
/// null first element means the record does not exist.
pub fn parse_payload(payload: &Value) -> Option<BookMetadata> {
    let item = payload.as_array()?.first()?;
    if item.is_null() {
        return None;
    }

    Some(BookMetadata {
        title: extract_title(item),
        text: extract_text(item),
        subjects: extract_subjects(item),
    })
}

/// Extract a title: the flat `summary.title` wins, else the first non-empty
/// string found on the ONIX `TitleDetail` path.
pub fn extract_title(item: &Value) -> Option<String> {
    summary_field(item, "title").or_else(|| onix_title(item))
}

/// Extract descriptive text: `summary.description`/`summary.content` first,
/// then every ONIX `TextContent` element, joined with blank lines.
pub fn extract_text(item: &Value) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(summary_text) =
        summary_field(item, "description").or_else(|| summary_field(item, "content"))
    {
        parts.push(summary_text);
    }

    let text_content = item
        .get("onix")
        .and_then(|onix| onix.get("CollateralDetail"))
        .and_then(|detail| detail.get("TextContent"));
    for entry in as_list(text_content) {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        // Either a `Text` field (scalar or `{content}` wrapper), or the text
        // nested under `TextContent`/`content` directly.
        let fragment = if let Some(text) = entry.get("Text") {
            wrapped_string(text)
        } else {
            entry
                .get("TextContent")
                .and_then(scalar_string)
                .or_else(|| entry.get("content").and_then(scalar_string))
        };
        if let Some(fragment) = fragment {
            parts.push(fragment);
        }
    }

    let text = parts.join("\n\n").trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract subject labels in source order.
///
/// Each entry prefers a code-like field (`SubjectCode`, `SubjectCodeValue`,
/// `Code`), then a heading-like field (`SubjectHeadingText`, `Text`,
/// `SubjectHeading`). Entries contributing neither are skipped.
pub fn extract_subjects(item: &Value) -> Vec<String> {
    let subjects = item
        .get("onix")
        .and_then(|onix| onix.get("DescriptiveDetail"))
        .and_then(|detail| detail.get("Subject"));

    let mut labels = Vec::new();
    for entry in as_list(subjects) {
        let Some(entry) = entry.as_object() else {
            continue;
        };

        let code = ["SubjectCode", "SubjectCodeValue", "Code"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(scalar_string));
        if let Some(code) = code {
            labels.push(code);
            continue;
        }

        let heading = ["SubjectHeadingText", "Text", "SubjectHeading"]
            .iter()
            .find_map(|key| entry.get(*key).and_then(scalar_string));
        if let Some(heading) = heading {
            labels.push(heading);
        }
    }
    labels
}

/// Non-empty string field from the flat `summary` block
fn summary_field(item: &Value, key: &str) -> Option<String> {
    item.get("summary")
        .and_then(|summary| summary.get(key))
        .and_then(scalar_string)
}

/// Walk `onix.DescriptiveDetail.TitleDetail`, where both `TitleDetail` and
/// its `TitleElement` children may be a single object or a list, and
/// `TitleText` may wrap its string in a further `content`/`Text` field.
fn onix_title(item: &Value) -> Option<String> {
    let title_detail = item
        .get("onix")
        .and_then(|onix| onix.get("DescriptiveDetail"))
        .and_then(|detail| detail.get("TitleDetail"));

    for detail in as_list(title_detail) {
        for element in as_list(detail.get("TitleElement")) {
            if let Some(title) = element.get("TitleText").and_then(wrapped_string) {
                return Some(title);
            }
        }
    }
    None
}

/// A string that may be given directly or wrapped in `{content}` / `{Text}`
fn wrapped_string(value: &Value) -> Option<String> {
    if let Some(object) = value.as_object() {
        object
            .get("content")
            .and_then(scalar_string)
            .or_else(|| object.get("Text").and_then(scalar_string))
    } else {
        scalar_string(value)
    }
}

/// Non-empty scalar as a string; numbers are stringified (subject codes
/// appear both ways in the wild)
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize an optional object-or-list field to a list of elements
fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_first_element_is_not_found() {
        assert_eq!(parse_payload(&json!([null])), None);
        assert_eq!(parse_payload(&json!([])), None);
        assert_eq!(parse_payload(&json!({})), None);
    }

    #[test]
    fn test_summary_title_wins() {
        let payload = json!([{
            "summary": {"title": "Summary Title"},
            "onix": {"DescriptiveDetail": {"TitleDetail": {
                "TitleElement": {"TitleText": {"content": "Onix Title"}}
            }}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Summary Title"));
    }

    #[test]
    fn test_onix_title_from_single_object() {
        let payload = json!([{
            "onix": {"DescriptiveDetail": {"TitleDetail": {
                "TitleElement": {"TitleText": {"content": "Deep Title"}}
            }}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Deep Title"));
    }

    #[test]
    fn test_onix_title_from_lists_and_plain_string() {
        let payload = json!([{
            "onix": {"DescriptiveDetail": {"TitleDetail": [
                {"TitleElement": [{"NoTitleHere": true}]},
                {"TitleElement": [{"TitleText": "Plain Title"}]}
            ]}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Plain Title"));
    }

    #[test]
    fn test_empty_title_strings_are_skipped() {
        let payload = json!([{
            "summary": {"title": ""},
            "onix": {"DescriptiveDetail": {"TitleDetail": {
                "TitleElement": [
                    {"TitleText": ""},
                    {"TitleText": {"Text": "Fallback Title"}}
                ]
            }}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Fallback Title"));
    }

    #[test]
    fn test_title_absent_when_both_strategies_fail() {
        let payload = json!([{"summary": {}}]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.title, None);
    }

    #[test]
    fn test_text_concatenates_summary_and_collateral() {
        let payload = json!([{
            "summary": {"description": "First part"},
            "onix": {"CollateralDetail": {"TextContent": [
                {"Text": {"content": "Second part"}},
                {"Text": "Third part"},
                {"TextContent": "Fourth part"}
            ]}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(
            meta.text.as_deref(),
            Some("First part\n\nSecond part\n\nThird part\n\nFourth part")
        );
    }

    #[test]
    fn test_text_single_object_normalized_to_list() {
        let payload = json!([{
            "onix": {"CollateralDetail": {"TextContent": {"Text": "Only part"}}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.text.as_deref(), Some("Only part"));
    }

    #[test]
    fn test_empty_text_becomes_absent() {
        let payload = json!([{
            "summary": {"description": ""},
            "onix": {"CollateralDetail": {"TextContent": []}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.text, None);
    }

    #[test]
    fn test_subject_codes_preferred_over_headings() {
        let payload = json!([{
            "onix": {"DescriptiveDetail": {"Subject": [
                {"SubjectCode": "913"},
                {"SubjectHeadingText": "Fiction"}
            ]}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.subjects, vec!["913", "Fiction"]);
    }

    #[test]
    fn test_subject_alternative_field_names() {
        let payload = json!([{
            "onix": {"DescriptiveDetail": {"Subject": [
                {"SubjectCodeValue": "007"},
                {"Code": 42},
                {"Text": "Essays"},
                {"SubjectHeading": "History"},
                {"Irrelevant": "skipped"}
            ]}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.subjects, vec!["007", "42", "Essays", "History"]);
    }

    #[test]
    fn test_single_subject_normalized_to_list() {
        let payload = json!([{
            "onix": {"DescriptiveDetail": {"Subject": {"SubjectCode": "913"}}}
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.subjects, vec!["913"]);
    }

    #[test]
    fn test_no_subject_field_yields_empty_list() {
        let payload = json!([{"summary": {"title": "T"}}]);
        let meta = parse_payload(&payload).unwrap();
        assert!(meta.subjects.is_empty());
    }

    #[test]
    fn test_wrong_types_degrade_without_panicking() {
        // Strings where objects are expected, numbers where lists are
        // expected: every fragment is dropped, nothing aborts.
        let payload = json!([{
            "summary": "not an object",
            "onix": {
                "DescriptiveDetail": {
                    "TitleDetail": 7,
                    "Subject": ["just a string", 12, null]
                },
                "CollateralDetail": {"TextContent": [null, 3, ["nested"]]}
            }
        }]);
        let meta = parse_payload(&payload).unwrap();
        assert_eq!(meta.title, None);
        assert_eq!(meta.text, None);
        assert!(meta.subjects.is_empty());
    }

    #[test]
    fn test_non_object_item_yields_empty_record() {
        let meta = parse_payload(&json!(["garbage"])).unwrap();
        assert_eq!(meta, BookMetadata::default());
    }
}
