use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    /// Regex for trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Regex for JavaScript string concatenation ("str1" + "str2")
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();
}

/// Extract the JSON object embedded in free-form model output.
///
/// Best-effort by design, not a schema validator. The fragment between the
/// first `{` and the last `}` is parsed directly, then with quick syntax
/// fixes, then through `llm_json` repair. `None` means the caller should
/// apply its own defaults.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let fragment = &text[start..=end];

    // Fast path: the fragment is already valid JSON
    if let Some(obj) = parse_object(fragment) {
        return Some(obj);
    }

    // Quick fixes for the two most common LLM mistakes
    let fixed = fix_trailing_commas(&fix_js_string_concatenation(fragment));
    if let Some(obj) = parse_object(&fixed) {
        return Some(obj);
    }

    // Last resort: full repair pass
    if let Some(repaired) = repair_json(fragment) {
        if let Some(obj) = parse_object(&repaired) {
            return Some(obj);
        }
    }

    tracing::warn!(
        "Failed to extract JSON object from model output (first 200 chars): {}",
        fragment.chars().take(200).collect::<String>()
    );
    None
}

fn parse_object(fragment: &str) -> Option<Value> {
    serde_json::from_str::<Value>(fragment)
        .ok()
        .filter(Value::is_object)
}

/// Fix trailing commas in JSON (common LLM mistake)
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Fix JavaScript string concatenation which is invalid in JSON
///
/// LLMs sometimes output: `"str1" + "str2"` which is invalid JSON.
/// This merges them into: `"str1str2"`
pub fn fix_js_string_concatenation(json_str: &str) -> String {
    JS_STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

/// Attempt to repair JSON using the llm_json crate.
///
/// The repair routine is guarded against panics; failure yields None.
fn repair_json(json_str: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let obj = extract_json_object(r#"{"classification": "spam", "confidence": 0.9}"#).unwrap();
        assert_eq!(obj["classification"], "spam");
    }

    #[test]
    fn test_extract_embedded_object() {
        let text = "Sure! Here is my verdict: {\"classification\": \"toxic\"} hope that helps";
        let obj = extract_json_object(text).unwrap();
        assert_eq!(obj["classification"], "toxic");
    }

    #[test]
    fn test_extract_spans_first_and_last_brace() {
        // Nested objects still parse because the span covers both braces
        let text = r#"{"outer": {"inner": 1}}"#;
        let obj = extract_json_object(text).unwrap();
        assert_eq!(obj["outer"]["inner"], 1);
    }

    #[test]
    fn test_extract_no_braces_returns_none() {
        assert!(extract_json_object("no json here at all").is_none());
        assert!(extract_json_object("").is_none());
    }

    #[test]
    fn test_extract_inverted_braces_returns_none() {
        assert!(extract_json_object("} backwards {").is_none());
    }

    #[test]
    fn test_extract_non_object_returns_none() {
        assert!(extract_json_object("} [1, 2, 3] {").is_none());
    }

    #[test]
    fn test_extract_repairs_trailing_comma() {
        let obj = extract_json_object(r#"{"classification": "safe", "confidence": 0.8,}"#).unwrap();
        assert_eq!(obj["classification"], "safe");
    }

    #[test]
    fn test_extract_repairs_string_concat() {
        let obj = extract_json_object(r#"{"reasoning": "part1" + "part2"}"#).unwrap();
        assert_eq!(obj["reasoning"], "part1part2");
    }

    #[test]
    fn test_fix_trailing_commas() {
        let input = r#"{"name": "John", "age": 30,}"#;
        assert_eq!(fix_trailing_commas(input), r#"{"name": "John", "age": 30}"#);

        let input2 = r#"{"items": [1, 2, 3,]}"#;
        assert_eq!(fix_trailing_commas(input2), r#"{"items": [1, 2, 3]}"#);
    }

    #[test]
    fn test_fix_js_string_concatenation() {
        let input = r#"{"text": "hello" + "world"}"#;
        assert_eq!(fix_js_string_concatenation(input), r#"{"text": "helloworld"}"#);

        let input2 = r#"{"text": "hello"   +   "world"}"#;
        assert_eq!(
            fix_js_string_concatenation(input2),
            r#"{"text": "helloworld"}"#
        );
    }
}
