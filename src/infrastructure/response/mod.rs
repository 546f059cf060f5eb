use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Remove model reasoning tags and collapse blank runs from a text answer
pub fn clean_llm_response(response: &str) -> String {
    let cleaned = THINK_TAG_PATTERN.replace_all(response, "");
    let cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "");

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(cleaned.trim(), "\n\n")
        .to_string()
}

/// Cleaned response with any markdown code fence around the JSON removed
pub fn extract_json_payload(response: &str) -> String {
    strip_code_fence(&clean_llm_response(response))
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"));

    match body {
        Some(stripped) => stripped.trim().trim_end_matches("```").trim().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        assert_eq!(
            clean_llm_response("<think>Skaičiuoju</think>Galutinis atsakymas"),
            "Galutinis atsakymas"
        );
        assert_eq!(clean_llm_response("<think />Atsakymas"), "Atsakymas");
    }

    #[test]
    fn test_clean_reasoning_and_newlines() {
        let input = "<reasoning>vidinis</reasoning>Eilutė 1\n\n\n\nEilutė 2";
        assert_eq!(clean_llm_response(input), "Eilutė 1\n\nEilutė 2");
    }

    #[test]
    fn test_extract_json_from_fence() {
        let input = "```json\n{\"strengths\": []}\n```";
        assert_eq!(extract_json_payload(input), "{\"strengths\": []}");

        let bare = "```\n[1, 2]\n```";
        assert_eq!(extract_json_payload(bare), "[1, 2]");
    }

    #[test]
    fn test_extract_json_passthrough() {
        assert_eq!(extract_json_payload("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
