use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::input::read_input;

/// Submitted answers keyed by question id. Values are the chosen option index
/// as a string (e.g. `"2"`), the way the quiz UI posts them.
pub type AnswerSet = HashMap<String, String>;

/// Parse a submitted answer into an option index.
///
/// Reads an optional sign and the leading run of decimal digits after any
/// leading whitespace; whatever follows the digits is ignored ("2.0" is 2,
/// "1abc" is 1). No digits, or a negative non-zero value, is not an index.
/// "-0" is 0.
pub fn parse_answer_index(value: &str) -> Option<usize> {
    let s = value.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    // Overflow is never a valid option index
    let index: usize = rest[..digits].parse().ok()?;
    if negative && index != 0 {
        return None;
    }
    Some(index)
}

/// Parse an answer set from a JSON object of string values.
pub fn parse_answer_set(json: &str) -> Result<AnswerSet> {
    serde_json::from_str(json)
        .context("Answers must be a JSON object mapping question ids to option index strings")
}

/// Load an answer set from a file, or from stdin when the path is `-`.
pub fn load_answer_set(path: &Path) -> Result<AnswerSet> {
    let content = read_input(path).context("Failed to read answers file")?;
    parse_answer_set(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_index_plain() {
        assert_eq!(parse_answer_index("0"), Some(0));
        assert_eq!(parse_answer_index("3"), Some(3));
    }

    #[test]
    fn test_parse_answer_index_trims_whitespace() {
        assert_eq!(parse_answer_index(" 2 "), Some(2));
    }

    #[test]
    fn test_parse_answer_index_rejects_garbage() {
        assert_eq!(parse_answer_index(""), None);
        assert_eq!(parse_answer_index("   "), None);
        assert_eq!(parse_answer_index("abc"), None);
        assert_eq!(parse_answer_index("-1"), None);
        assert_eq!(parse_answer_index("-"), None);
        assert_eq!(parse_answer_index(".5"), None);
        assert_eq!(parse_answer_index("x1"), None);
        assert_eq!(parse_answer_index("99999999999999999999999999"), None);
    }

    #[test]
    fn test_parse_answer_index_reads_leading_digits() {
        assert_eq!(parse_answer_index("1abc"), Some(1));
        assert_eq!(parse_answer_index("2.0"), Some(2));
        assert_eq!(parse_answer_index("1e3"), Some(1));
        assert_eq!(parse_answer_index(" 3x"), Some(3));
        assert_eq!(parse_answer_index("+1"), Some(1));
        assert_eq!(parse_answer_index("007"), Some(7));
    }

    #[test]
    fn test_parse_answer_index_negative_zero() {
        assert_eq!(parse_answer_index("-0"), Some(0));
        assert_eq!(parse_answer_index("-00"), Some(0));
    }

    #[test]
    fn test_parse_answer_set() {
        let answers = parse_answer_set(r#"{"q1": "1", "q2": "0"}"#).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers["q1"], "1");
    }

    #[test]
    fn test_parse_answer_set_rejects_numbers() {
        assert!(parse_answer_set(r#"{"q1": 1}"#).is_err());
    }

    #[test]
    fn test_load_answer_set_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, r#"{"q3": "3"}"#).unwrap();

        let answers = load_answer_set(&path).unwrap();
        assert_eq!(answers["q3"], "3");
    }

    #[test]
    fn test_load_answer_set_missing_file() {
        let err = load_answer_set(Path::new("/nonexistent/answers.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read answers file"));
    }
}
