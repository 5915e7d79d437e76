//! Extraction of structure from free-text model replies.
//!
//! Two modes. Label extraction pulls `LABEL: value` lines out of a
//! prose reply; an absent label is not an error, it tells the caller to
//! fall back to the original field. JSON extraction recovers a JSON
//! document from a reply that may wrap it in explanatory prose or
//! markdown fences; failure here is terminal for the caller.

use std::collections::HashMap;

use anyhow::{bail, Result};
use regex::Regex;

/// Extract labeled fields from reply text.
///
/// For each label, captures the text between `LABEL:` (case-insensitive,
/// first occurrence) and the next known label or end of text, trimmed.
/// Labels that are missing, or whose capture trims to empty, are absent
/// from the result.
pub fn extract_labels(text: &str, labels: &[&str]) -> HashMap<String, String> {
    let mut captures = HashMap::new();
    if labels.is_empty() {
        return captures;
    }

    let alternation = labels
        .iter()
        .map(|label| regex::escape(label))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&format!(r"(?i)\b({alternation})\s*:"))
        .expect("escaped label alternation is a valid pattern");

    let hits: Vec<_> = re.captures_iter(text).collect();

    for (i, hit) in hits.iter().enumerate() {
        let label = hit.get(1).map(|m| m.as_str().to_uppercase());
        let Some(label) = label else { continue };
        if captures.contains_key(&label) {
            continue; // first occurrence wins
        }

        let value_start = hit.get(0).map(|m| m.end()).unwrap_or(0);
        let value_end = hits
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());

        let value = text[value_start..value_end].trim();
        if !value.is_empty() {
            captures.insert(label, value.to_string());
        }
    }

    captures
}

/// Recover a JSON document from reply text.
///
/// Direct parse first (after stripping markdown code fences); on failure,
/// greedy bracket matching from the earliest opening bracket to the last
/// matching close. Anything else is a parse error.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let stripped = strip_code_fences(text);

    if let Ok(value) = serde_json::from_str(stripped) {
        return Ok(value);
    }

    // Whichever bracket opens first owns the document; an object with
    // a nested array must not be misread as that array.
    let array_first = match (stripped.find('['), stripped.find('{')) {
        (Some(arr), Some(obj)) => arr < obj,
        (Some(_), None) => true,
        _ => false,
    };
    let candidates = if array_first {
        [('[', ']'), ('{', '}')]
    } else {
        [('{', '}'), ('[', ']')]
    };

    for (open, close) in candidates {
        if let Some(candidate) = greedy_slice(stripped, open, close) {
            if let Ok(value) = serde_json::from_str(candidate) {
                return Ok(value);
            }
        }
    }

    bail!("no parseable JSON document in reply")
}

/// Strip markdown code fences from a reply.
fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

fn greedy_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &[&str] = &["TITLE", "DESCRIPTION", "SUMMARY"];

    #[test]
    fn test_extracts_all_labels() {
        let reply = "TITLE: Foo\nDESCRIPTION: Bar";
        let captures = extract_labels(reply, &["TITLE", "DESCRIPTION"]);
        assert_eq!(captures["TITLE"], "Foo");
        assert_eq!(captures["DESCRIPTION"], "Bar");
    }

    #[test]
    fn test_absent_label_is_absent_not_error() {
        let reply = "TITLE: Foo\nSome trailing prose.";
        let captures = extract_labels(reply, &["TITLE", "DESCRIPTION"]);
        assert_eq!(captures["TITLE"], "Foo\nSome trailing prose.");
        assert!(!captures.contains_key("DESCRIPTION"));
    }

    #[test]
    fn test_capture_stops_at_next_label() {
        let reply = "TITLE: United stun City\nDESCRIPTION: Late winner.\nSUMMARY: A derby for the ages,\nover two lines.";
        let captures = extract_labels(reply, LABELS);
        assert_eq!(captures["TITLE"], "United stun City");
        assert_eq!(captures["DESCRIPTION"], "Late winner.");
        assert_eq!(captures["SUMMARY"], "A derby for the ages,\nover two lines.");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let reply = "title: lower\ndescription: case";
        let captures = extract_labels(reply, &["TITLE", "DESCRIPTION"]);
        assert_eq!(captures["TITLE"], "lower");
        assert_eq!(captures["DESCRIPTION"], "case");
    }

    #[test]
    fn test_empty_capture_is_absent() {
        let reply = "TITLE:\nDESCRIPTION: Bar";
        let captures = extract_labels(reply, &["TITLE", "DESCRIPTION"]);
        assert!(!captures.contains_key("TITLE"));
        assert_eq!(captures["DESCRIPTION"], "Bar");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let reply = "TITLE: first\nTITLE: second";
        let captures = extract_labels(reply, &["TITLE"]);
        assert_eq!(captures["TITLE"], "first");
    }

    #[test]
    fn test_direct_json_parse() {
        let value = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_json_in_code_fence() {
        let value = extract_json("```json\n[{\"q\": \"x\"}]\n```").unwrap();
        assert_eq!(value[0]["q"], "x");
    }

    #[test]
    fn test_json_array_wrapped_in_prose() {
        let reply = "Here are your items:\n[{\"fact\": \"one\"}, {\"fact\": \"two\"}]\nEnjoy!";
        let value = extract_json(reply).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_object_wrapped_in_prose() {
        let reply = "Sure! {\"title\": \"Tip\"} — let me know if you need more.";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["title"], "Tip");
    }

    #[test]
    fn test_object_with_nested_array_recovers_the_object() {
        let reply = r#"Sure! {"title": "Tip", "benefits": ["focus"], "content": "C"} done"#;
        let value = extract_json(reply).unwrap();
        assert!(value.is_object());
        assert_eq!(value["benefits"][0], "focus");
    }

    #[test]
    fn test_array_before_object_recovers_the_array() {
        let reply = r#"Items: [{"fact": "one"}] and a note {"ignored": true}"#;
        let value = extract_json(reply).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_unparseable_reply_is_error() {
        assert!(extract_json("I cannot help with that.").is_err());
        assert!(extract_json("broken { json").is_err());
    }
}
