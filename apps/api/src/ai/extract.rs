//! Best-effort recovery of a `ResumeContent` from a model reply.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::content::{ResumeContent, MAX_SKILL_LEVEL};

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fence pattern is valid")
    })
}

/// The body of the first fenced code block, or the whole reply trimmed.
fn strip_json_fences(reply: &str) -> &str {
    fence_pattern()
        .captures(reply)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| reply.trim())
}

/// The span from the first `{` to the last `}`, for replies that wrap the
/// object in prose.
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parses the reply as a resume document. `None` when no candidate parses,
/// in which case callers fall back to the raw text.
pub fn extract_resume(reply: &str) -> Option<ResumeContent> {
    let candidate = strip_json_fences(reply);
    let parsed = serde_json::from_str::<ResumeContent>(candidate)
        .ok()
        .or_else(|| serde_json::from_str(outer_object(candidate)?).ok())?;

    let mut content = parsed.normalize();
    for skill in &mut content.skills {
        skill.level = skill.level.map(|level| level.min(MAX_SKILL_LEVEL));
    }
    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "Here you go:\n```\n{\"key\": \"value\"}\n```\nGood luck!";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extracts_fenced_resume_and_assigns_ids() {
        let reply = "```json\n{\"personalInfo\":{\"firstName\":\"Ada\",\"lastName\":\"L\",\
                     \"email\":\"a@x.io\"},\
                     \"skills\":[{\"name\":\"Rust\",\"level\":9},{\"name\":\"Go\"}]}\n```";
        let content = extract_resume(reply).unwrap();
        assert_eq!(content.personal_info.first_name, "Ada");
        assert_eq!(content.skills.len(), 2);
        assert_eq!(content.skills[0].level, Some(MAX_SKILL_LEVEL));
        assert!(content.skills.iter().all(|s| !s.id.is_empty()));
        assert_ne!(content.skills[0].id, content.skills[1].id);
    }

    #[test]
    fn test_extracts_object_surrounded_by_prose() {
        let reply =
            "Sure! {\"experience\":[{\"company\":\"Acme\",\"position\":\"Dev\"}]} Hope it helps.";
        let content = extract_resume(reply).unwrap();
        assert_eq!(content.experience[0].company, "Acme");
    }

    #[test]
    fn test_plain_text_is_not_a_resume() {
        assert!(extract_resume("I cannot produce JSON right now.").is_none());
    }

    #[test]
    fn test_wrong_field_types_are_not_a_resume() {
        assert!(extract_resume("{\"skills\": \"Rust, Go\"}").is_none());
    }
}
