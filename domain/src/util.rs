//! Helpers for pulling structured payloads out of free-form model output.

use regex::Regex;
use std::sync::LazyLock;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[jJ][sS][oO][nN]\n(\{.*\})\n```").expect("static regex"));
static JSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<json>(.*)</json>").expect("static regex"));
static RESULT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<result>(.*)</result>").expect("static regex"));

/// Locate the JSON document in a model response.
///
/// Handles, in order: a response that is entirely a fenced block, an
/// embedded ```` ```json ```` block, a `<json>` tag, and finally leading
/// chit-chat before the first `{` or `[`. The returned slice is not
/// validated; the caller parses it.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();

    if text.len() >= 10
        && (text.starts_with("```json") || text.starts_with("```JSON"))
        && text.ends_with("```")
    {
        return text[7..text.len() - 3].trim();
    }
    if text.len() >= 6 && text.starts_with("```") && text.ends_with("```") {
        return text[3..text.len() - 3].trim();
    }

    if let Some(body) = JSON_FENCE.captures(text).and_then(|c| c.get(1)) {
        return body.as_str();
    }
    if let Some(body) = JSON_TAG.captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }

    let text = text.trim_end_matches('`');
    match (text.find('{'), text.find('[')) {
        (Some(curly), Some(square)) => &text[curly.min(square)..],
        (Some(start), None) | (None, Some(start)) => &text[start..],
        (None, None) => text,
    }
}

/// Contents of the last `<result>` block, trimmed.
pub fn extract_result_tag(text: &str) -> Option<&str> {
    let start = text.rfind("<result>")?;
    RESULT_TAG
        .captures(&text[start..])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        assert_eq!(extract_json(r#" {"a": 1} "#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_whole_fence() {
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), r#"{"a": 1}"#);
        assert_eq!(extract_json("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_embedded_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json(text), r#"{"a": 1}"#);
    }

    #[test]
    fn test_json_tag() {
        let text = "<thinking>hmm {not json}</thinking>\n<json>\n{\"inspectFiles\": []}\n</json>";
        assert_eq!(extract_json(text), r#"{"inspectFiles": []}"#);
    }

    #[test]
    fn test_leading_chit_chat() {
        assert_eq!(extract_json("Sure! {\"a\": [1]}"), r#"{"a": [1]}"#);
        assert_eq!(extract_json("List: [1, {\"b\": 2}]``"), r#"[1, {"b": 2}]"#);
    }

    #[test]
    fn test_result_tag() {
        let text = "<thinking>x</thinking>\n<result>\n  The answer\n</result>";
        assert_eq!(extract_result_tag(text), Some("The answer"));
    }

    #[test]
    fn test_result_tag_uses_last() {
        let text = "<result>draft</result> then <result>final</result>";
        assert_eq!(extract_result_tag(text), Some("final"));
    }

    #[test]
    fn test_result_tag_missing() {
        assert_eq!(extract_result_tag("no tags here"), None);
        assert_eq!(extract_result_tag("<result> unterminated"), None);
    }
}
