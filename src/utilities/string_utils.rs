//! String utility functions shared across the planning and evaluation paths.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").unwrap());

/// Number of words kept when summarizing a task output for logs.
const SUMMARY_WORDS: usize = 10;

/// Errors raised while interpolating `{placeholder}` templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    /// A `{variable}` in the template has no entry in the inputs map.
    #[error("Template variable '{0}' not found in inputs dictionary")]
    MissingVariable(String),

    /// The template references variables but the inputs map is empty.
    #[error("Inputs dictionary cannot be empty when interpolating variables")]
    EmptyInputs,
}

/// Interpolate `{placeholder}` variables in a template string.
///
/// Only placeholders matching `{variable_name}` are substituted, where
/// `variable_name` starts with a letter/underscore and contains only
/// alphanumerics, underscores, and hyphens. Doubled braces (`{{`, `}}`)
/// escape literal braces and survive as single braces.
///
/// # Errors
/// Returns an error if a referenced variable is missing from `inputs`.
pub fn interpolate_only(
    input_string: Option<&str>,
    inputs: &HashMap<String, String>,
) -> Result<String, InterpolationError> {
    let input = match input_string {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(String::new()),
    };

    if !input.contains('{') && !input.contains('}') {
        return Ok(input.to_string());
    }

    // Protect escaped braces before scanning for variables.
    let masked = input.replace("{{", "\u{0}").replace("}}", "\u{1}");

    let variables: Vec<String> = VARIABLE_PATTERN
        .captures_iter(&masked)
        .map(|cap| cap[1].to_string())
        .collect();

    if !variables.is_empty() && inputs.is_empty() {
        return Err(InterpolationError::EmptyInputs);
    }

    if let Some(missing) = variables.iter().find(|v| !inputs.contains_key(*v)) {
        return Err(InterpolationError::MissingVariable(missing.clone()));
    }

    let mut result = masked;
    for var in &variables {
        if let Some(value) = inputs.get(var) {
            let placeholder = format!("{{{}}}", var);
            result = result.replace(&placeholder, value);
        }
    }

    Ok(result.replace('\u{0}', "{").replace('\u{1}', "}"))
}

/// Map a destination name to a filesystem-safe token.
///
/// Every non-alphanumeric character becomes an underscore, so
/// "Paris, France" becomes "Paris__France". Runs are not collapsed; the
/// result round-trips predictably into report filenames.
pub fn sanitize_destination(destination: &str) -> String {
    destination
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Remove markdown code-fence markers from LLM output.
///
/// Completion backends frequently wrap whole sections in ```` ```markdown ````
/// fences; left in place they would corrupt the assembled report structure.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```markdown", "").replace("```", "")
}

/// First words of a text, for one-line log summaries.
pub fn brief_summary(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(SUMMARY_WORDS).collect();
    if words.is_empty() {
        return String::new();
    }
    let mut summary = words.join(" ");
    if text.split_whitespace().nth(SUMMARY_WORDS).is_some() {
        summary.push_str("...");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_basic() {
        let result = interpolate_only(
            Some("Trip to {destination} from {start_date}"),
            &inputs(&[("destination", "Paris"), ("start_date", "2025-06-01")]),
        )
        .unwrap();
        assert_eq!(result, "Trip to Paris from 2025-06-01");
    }

    #[test]
    fn test_interpolate_missing_variable() {
        let result = interpolate_only(Some("Hello {name}!"), &inputs(&[("other", "x")]));
        assert_eq!(
            result,
            Err(InterpolationError::MissingVariable("name".to_string()))
        );
    }

    #[test]
    fn test_interpolate_empty_inputs() {
        let result = interpolate_only(Some("Hello {name}!"), &HashMap::new());
        assert_eq!(result, Err(InterpolationError::EmptyInputs));
    }

    #[test]
    fn test_interpolate_no_placeholders() {
        let result = interpolate_only(Some("plain text"), &HashMap::new()).unwrap();
        assert_eq!(result, "plain text");
    }

    #[test]
    fn test_interpolate_escaped_braces() {
        let result = interpolate_only(
            Some("literal {{braces}} and {value}"),
            &inputs(&[("value", "v")]),
        )
        .unwrap();
        assert_eq!(result, "literal {braces} and v");
    }

    #[test]
    fn test_interpolate_none_input() {
        assert_eq!(interpolate_only(None, &HashMap::new()).unwrap(), "");
    }

    #[test]
    fn test_sanitize_destination() {
        assert_eq!(sanitize_destination("Paris, France"), "Paris__France");
        assert_eq!(sanitize_destination("Tokyo"), "Tokyo");
        assert_eq!(sanitize_destination("Rio de Janeiro"), "Rio_de_Janeiro");
    }

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```markdown\n## Transportation\ncontent\n```";
        assert_eq!(strip_code_fences(fenced), "\n## Transportation\ncontent\n");
        assert_eq!(strip_code_fences("no fences"), "no fences");
    }

    #[test]
    fn test_brief_summary_truncates() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        assert_eq!(
            brief_summary(text),
            "one two three four five six seven eight nine ten..."
        );
    }

    #[test]
    fn test_brief_summary_short_text() {
        assert_eq!(brief_summary("just a few words"), "just a few words");
        assert_eq!(brief_summary(""), "");
    }
}
