use serde_json::Value;

use super::GroupingResult;
use crate::error::AttemptError;

const FENCE: &str = "```";

pub fn build_prompt(file_names: &[String], criteria: &str) -> String {
    format!(
        "Organize the following list of file names into meaningful folder groups based on the provided criteria.\n\
         Criteria: {}\n\
         Files: {}\n\n\
         Respond in JSON format with folder names as keys and lists of file names as values.",
        criteria,
        file_names.join(", ")
    )
}

/// Remove a surrounding markdown code fence. Only strips when the text both
/// opens and closes with a fence; the opening fence may carry a language
/// tag such as `json`.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if text.len() < 2 * FENCE.len() || !text.starts_with(FENCE) || !text.ends_with(FENCE) {
        return text;
    }

    let inner = &text[FENCE.len()..text.len() - FENCE.len()];
    let tag_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
        .unwrap_or(inner.len());
    inner[tag_len..].trim()
}

/// Parse a (possibly fenced) response into a grouping. The payload must be
/// an object whose values are arrays of strings.
pub fn parse_grouping(raw: &str) -> Result<GroupingResult, AttemptError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(AttemptError::Structure(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut result = GroupingResult::default();
    for (group, files) in object {
        let Value::Array(items) = files else {
            return Err(AttemptError::Structure(format!(
                "group '{}' is {}, expected an array of file names",
                group,
                json_kind(&files)
            )));
        };

        let mut names = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(name) => names.push(name),
                other => {
                    return Err(AttemptError::Structure(format!(
                        "group '{}' lists {}, expected a file name",
                        group,
                        json_kind(&other)
                    )))
                }
            }
        }
        result.push(group, names);
    }

    Ok(result)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_criteria_and_comma_joined_names() {
        let names = vec!["a.png".to_string(), "b.txt".to_string()];
        let prompt = build_prompt(&names, "by type");
        assert!(prompt.contains("Criteria: by type\n"));
        assert!(prompt.contains("Files: a.png, b.txt\n"));
        assert!(prompt.contains("JSON"));
    }

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n{\"A\": [\"x\"]}\n```";
        assert_eq!(strip_code_fence(raw), "{\"A\": [\"x\"]}");
    }

    #[test]
    fn test_strip_bare_fence_and_outer_whitespace() {
        let raw = "  \n```\n{}\n```\n ";
        assert_eq!(strip_code_fence(raw), "{}");
    }

    #[test]
    fn test_unfenced_text_is_left_alone() {
        assert_eq!(strip_code_fence(" {\"A\": []} "), "{\"A\": []}");
        // Opening fence without a closing one is not stripped.
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
        assert_eq!(strip_code_fence("```"), "```");
    }

    #[test]
    fn test_parse_keeps_group_order() {
        let raw = "```json\n{\"Zeta\": [\"z.txt\"], \"Alpha\": [\"a.txt\", \"b.txt\"]}\n```";
        let result = parse_grouping(raw).unwrap();
        let groups: Vec<&str> = result.iter().map(|(name, _)| name).collect();
        assert_eq!(groups, vec!["Zeta", "Alpha"]);
        assert_eq!(
            result.get("Alpha").unwrap(),
            &["a.txt".to_string(), "b.txt".to_string()]
        );
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            parse_grouping("Sure! Here are your folders"),
            Err(AttemptError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(matches!(
            parse_grouping("[\"a.txt\"]"),
            Err(AttemptError::Structure(_))
        ));
        assert!(matches!(
            parse_grouping("{\"Docs\": \"a.txt\"}"),
            Err(AttemptError::Structure(_))
        ));
        assert!(matches!(
            parse_grouping("{\"Docs\": [1, 2]}"),
            Err(AttemptError::Structure(_))
        ));
    }

    #[test]
    fn test_parse_empty_object_is_empty_grouping() {
        assert!(parse_grouping("{}").unwrap().is_empty());
    }
}
