//! Prompt construction and response parsing for summaries and tags.

use regex::Regex;
use std::sync::OnceLock;

use notewise_core::{defaults, Error, Result};

/// System prompt for summary generation.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You summarize personal notes. \
Answer in the same language as the note. \
Return only the summary text, with no heading, label, or quotation marks.";

/// System prompt for tag generation.
pub const TAGS_SYSTEM_PROMPT: &str = "You assign topic tags to personal notes. \
Tags are short nouns or noun phrases in the note's language. \
Respond with a JSON object of the form {\"tags\": [\"tag\", ...]}.";

/// Build the user prompt for a summary.
pub fn summary_prompt(title: &str, content: &str, sentences: usize) -> String {
    let mut prompt = format!(
        "Summarize the following note in at most {} sentences.\n\n",
        sentences
    );
    if !title.trim().is_empty() {
        prompt.push_str(&format!("Title: {}\n\n", title.trim()));
    }
    prompt.push_str(content.trim());
    prompt
}

/// Build the user prompt for tag generation.
pub fn tags_prompt(title: &str, content: &str, max_tags: usize) -> String {
    let mut prompt = format!(
        "Suggest between 1 and {} tags for the following note.\n\n",
        max_tags
    );
    if !title.trim().is_empty() {
        prompt.push_str(&format!("Title: {}\n\n", title.trim()));
    }
    prompt.push_str(content.trim());
    prompt
}

fn think_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("think regex is valid"))
}

fn summary_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i:summary|요약)\s*[:：]\s*").expect("summary label regex is valid")
    })
}

fn hashtag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#([\p{L}\p{N}_-]+)").expect("hashtag regex is valid"))
}

/// Strip reasoning blocks some models leak into their answer.
fn strip_thinking(raw: &str) -> String {
    think_block().replace_all(raw, "").trim().to_string()
}

/// Extract the summary text from a model response.
pub fn parse_summary(raw: &str) -> Result<String> {
    let text = strip_thinking(raw);
    let text = summary_label().replace(&text, "");
    let text = text
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .trim();

    if text.is_empty() {
        return Err(Error::Serialization(
            "Model returned an empty summary".to_string(),
        ));
    }
    Ok(text.to_string())
}

/// Extract, normalize, and dedupe tags from a model response.
///
/// Accepts `{"tags": [...]}`, a bare JSON array, `#hashtags`, or a comma /
/// newline separated list.
pub fn parse_tags(raw: &str, max_tags: usize) -> Result<Vec<String>> {
    let text = strip_thinking(raw);

    let candidates: Vec<String> = match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Object(map)) => map
            .get("tags")
            .and_then(|v| v.as_array())
            .map(|items| json_strings(items))
            .unwrap_or_default(),
        Ok(serde_json::Value::Array(items)) => json_strings(&items),
        _ if hashtag().is_match(&text) => hashtag()
            .captures_iter(&text)
            .map(|c| c[1].to_string())
            .collect(),
        _ => text
            .split(|c: char| c == ',' || c == '\n' || c == '、')
            .map(|s| s.trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace()))
            .map(str::to_string)
            .collect(),
    };

    let mut tags: Vec<String> = Vec::new();
    for candidate in candidates {
        if tags.len() >= max_tags {
            break;
        }
        let Some(tag) = normalize_tag(&candidate) else {
            continue;
        };
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    if tags.is_empty() {
        return Err(Error::Serialization(format!(
            "No tags found in model response ({} bytes)",
            raw.len()
        )));
    }
    Ok(tags)
}

fn json_strings(items: &[serde_json::Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect()
}

/// Trim, drop `#` and quotes, lowercase, join words with `-`.
fn normalize_tag(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_start_matches('#')
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '.' | '`'))
        .trim();

    let tag = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();

    if tag.is_empty() || tag.chars().count() > defaults::MAX_TAG_CHARS {
        return None;
    }
    Some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_includes_title_and_limit() {
        let prompt = summary_prompt("회의록", "  본문  ", 3);
        assert!(prompt.contains("at most 3 sentences"));
        assert!(prompt.contains("Title: 회의록"));
        assert!(prompt.ends_with("본문"));
    }

    #[test]
    fn test_prompt_skips_blank_title() {
        let prompt = tags_prompt("  ", "content", 5);
        assert!(!prompt.contains("Title:"));
        assert!(prompt.contains("1 and 5 tags"));
    }

    #[test]
    fn test_parse_summary_plain() {
        assert_eq!(parse_summary("  간단한 요약입니다.  ").unwrap(), "간단한 요약입니다.");
    }

    #[test]
    fn test_parse_summary_strips_label_quotes_and_thinking() {
        let raw = "<think>let me think\nabout it</think>\n요약: \"회의에서 일정을 확정했다.\"";
        assert_eq!(parse_summary(raw).unwrap(), "회의에서 일정을 확정했다.");

        assert_eq!(parse_summary("Summary: done.").unwrap(), "done.");
    }

    #[test]
    fn test_parse_summary_empty_is_parse_error() {
        let err = parse_summary("<think>hmm</think>  ").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_parse_tags_json_object() {
        let tags = parse_tags(r#"{"tags": ["Rust", "Machine Learning", "rust"]}"#, 5).unwrap();
        assert_eq!(tags, vec!["rust", "machine-learning"]);
    }

    #[test]
    fn test_parse_tags_json_array() {
        let tags = parse_tags(r#"["회의", "일정", 3]"#, 5).unwrap();
        assert_eq!(tags, vec!["회의", "일정"]);
    }

    #[test]
    fn test_parse_tags_hashtags() {
        let tags = parse_tags("Tags: #여행 #Budget #여행", 5).unwrap();
        assert_eq!(tags, vec!["여행", "budget"]);
    }

    #[test]
    fn test_parse_tags_comma_and_bullets() {
        let tags = parse_tags("- work\n- project plan, Q3", 5).unwrap();
        assert_eq!(tags, vec!["work", "project-plan", "q3"]);
    }

    #[test]
    fn test_parse_tags_truncates_to_max() {
        let tags = parse_tags("a, b, c, d, e, f", 3).unwrap();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_tags_drops_overlong() {
        let long = "x".repeat(defaults::MAX_TAG_CHARS + 1);
        let tags = parse_tags(&format!("{}, ok", long), 5).unwrap();
        assert_eq!(tags, vec!["ok"]);
    }

    #[test]
    fn test_parse_tags_empty_object_is_parse_error() {
        let err = parse_tags(r#"{"labels": ["a"]}"#, 5).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
