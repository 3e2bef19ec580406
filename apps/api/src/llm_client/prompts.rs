// Shared prompt constants and prompt-building utilities.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every structured-extraction prompt so the completion can be
/// deserialized directly.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Joins a skill list for prompt display, or a placeholder when empty.
pub fn skill_list(skills: &[String]) -> String {
    if skills.is_empty() {
        "(none listed)".to_string()
    } else {
        skills.join(", ")
    }
}

/// Fills `{name}` placeholders in a template in a single pass.
/// Substituted values are never rescanned, so a value containing `{other}`
/// stays literal. Unknown placeholders are left as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });

        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_list_joins_with_commas() {
        let skills = vec!["Rust".to_string(), "SQL".to_string()];
        assert_eq!(skill_list(&skills), "Rust, SQL");
        assert_eq!(skill_list(&[]), "(none listed)");
    }

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let out = fill("{name} applies; {name} waits for {company}", &[
            ("name", "Ada"),
            ("company", "Initech"),
        ]);
        assert_eq!(out, "Ada applies; Ada waits for Initech");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{a} {b}", &[("a", "1")]), "1 {b}");
    }

    #[test]
    fn test_fill_does_not_expand_placeholders_inside_values() {
        let out = fill(
            "Resume: {resume}\nJD: {description}",
            &[("resume", "I wrote {description}"), ("description", "Build compilers")],
        );
        assert_eq!(out, "Resume: I wrote {description}\nJD: Build compilers");
    }

    #[test]
    fn test_fill_keeps_json_braces_in_templates() {
        let out = fill("{\n  \"jobs\": []\n}\n{json_only}", &[("json_only", "JSON only.")]);
        assert_eq!(out, "{\n  \"jobs\": []\n}\nJSON only.");
    }
}
