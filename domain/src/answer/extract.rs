//! Answer extraction from raw model replies.
//!
//! Models rarely answer with a bare token. Extraction picks the part of the
//! reply that carries the answer, in this order:
//!
//! 1. **JSON**: `{"answer": "B", "confidence": 0.8}` (embedded JSON is accepted)
//! 2. **Labelled line**: `Final answer: 42` or `Answer - Paris`
//! 3. **First non-empty line**, clipped to [`MAX_ANSWER_BYTES`]

use crate::core::string::clip;

/// Upper bound for a free-form extracted answer
pub const MAX_ANSWER_BYTES: usize = 256;

const LABELS: [&str; 2] = ["final answer", "answer"];

/// Extract the answer-bearing part of a raw reply.
///
/// # Examples
///
/// ```
/// use quorum_domain::extract_answer;
///
/// assert_eq!(extract_answer(r#"{"answer": "B", "confidence": 0.9}"#), "B");
/// assert_eq!(extract_answer("Let me think.\nFinal answer: 42\n"), "42");
/// assert_eq!(extract_answer("\n  Paris\nbecause..."), "Paris");
/// assert_eq!(extract_answer("   "), "");
/// ```
pub fn extract_answer(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if let Some(answer) = json_answer(raw) {
        return answer;
    }

    for label in LABELS {
        if let Some(answer) = labelled_answer(raw, label) {
            return answer;
        }
    }

    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| clip(line, MAX_ANSWER_BYTES).to_string())
        .unwrap_or_default()
}

fn json_answer(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let parsed: serde_json::Value = serde_json::from_str(&raw[start..=end]).ok()?;
    let answer = match parsed.get("answer")? {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!answer.is_empty()).then_some(answer)
}

/// Find `<label> [:|-] <answer>` anywhere in the text (case-insensitive)
/// and return the rest of that line.
fn labelled_answer(raw: &str, label: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `raw`
    let lowered = raw.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lowered[from..].find(label) {
        let after = from + pos + label.len();
        let rest = &raw[after..];
        let trimmed = rest.trim_start_matches([' ', '\t']);
        if let Some(value) = trimmed.strip_prefix([':', '-']) {
            let line = value.lines().next().unwrap_or("").trim();
            if !line.is_empty() {
                return Some(clip(line, MAX_ANSWER_BYTES).to_string());
            }
        }
        from = after;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_answer_variants() {
        assert_eq!(extract_answer(r#"{"answer": " paris "}"#), "paris");
        assert_eq!(extract_answer(r#"{"answer": 42}"#), "42");
        assert_eq!(extract_answer(r#"{"answer": true}"#), "true");
        assert_eq!(
            extract_answer(r#"Sure! {"answer": "C", "predicted_majority": "C"} done"#),
            "C"
        );
    }

    #[test]
    fn test_json_without_answer_falls_through() {
        assert_eq!(extract_answer(r#"{"result": 1}"#), r#"{"result": 1}"#);
    }

    #[test]
    fn test_final_answer_preferred_over_answer() {
        let raw = "The answer depends.\nFinal Answer: 7";
        assert_eq!(extract_answer(raw), "7");
    }

    #[test]
    fn test_answer_label_with_dash() {
        assert_eq!(extract_answer("reasoning...\nANSWER - B. because"), "B. because");
    }

    #[test]
    fn test_label_without_separator_is_ignored() {
        // "answer" appears but is never followed by ':' or '-'
        assert_eq!(
            extract_answer("I answer questions\nsecond line"),
            "I answer questions"
        );
    }

    #[test]
    fn test_first_line_is_clipped() {
        let long = "x".repeat(400);
        assert_eq!(extract_answer(&long).len(), MAX_ANSWER_BYTES);
    }
}
