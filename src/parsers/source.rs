use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*[^\n]*\n(.*?)```").expect("fence pattern is valid")
});
static EXPORT_NAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*export\s+default\s+[A-Za-z_$][\w$]*\s*;?\s*$")
        .expect("export pattern is valid")
});

/// Isolate source code from a generation response
///
/// Takes the longest fenced block when fences are present, then drops any
/// prose after the last module export.
pub fn clean_generated(response: &str) -> String {
    let code = extract_fenced(response).unwrap_or_else(|| strip_stray_fences(response));
    trim_after_export(&code).trim().to_string()
}

/// The longest fenced code block, if the response contains any
pub fn extract_fenced(response: &str) -> Option<String> {
    FENCED_BLOCK
        .captures_iter(response)
        .map(|c| c[1].to_string())
        .max_by_key(|block| block.len())
}

/// Remove unmatched fence lines, such as a truncated response's opening fence
fn strip_stray_fences(response: &str) -> String {
    response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop trailing text after the last recognised export
///
/// `export default Name;` ends the module on that line. For
/// `export default function ...` the module ends at the last line that
/// starts with a closing brace.
pub fn trim_after_export(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    if let Some(idx) = lines.iter().rposition(|l| EXPORT_NAME_LINE.is_match(l)) {
        return lines[..=idx].join("\n");
    }

    if let Some(export_idx) = lines.iter().rposition(|l| l.contains("export default")) {
        let end = lines
            .iter()
            .enumerate()
            .skip(export_idx)
            .filter(|(_, l)| l.starts_with('}'))
            .map(|(i, _)| i)
            .last();
        if let Some(end) = end {
            return lines[..=end].join("\n");
        }
    }

    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced() {
        let response = "Here you go:\n```jsx\nconst A = () => null;\nexport default A;\n```\nEnjoy!";
        assert_eq!(
            clean_generated(response),
            "const A = () => null;\nexport default A;"
        );
    }

    #[test]
    fn test_longest_fence_wins() {
        let response = "```bash\nnpm i\n```\n\n```javascript\nfunction Page() {\n  return null;\n}\nexport default Page;\n```";
        assert!(clean_generated(response).starts_with("function Page()"));
    }

    #[test]
    fn test_unterminated_fence() {
        let response = "```jsx\nexport default function Page() {\n  return <div />;\n}";
        assert_eq!(
            clean_generated(response),
            "export default function Page() {\n  return <div />;\n}"
        );
    }

    #[test]
    fn test_trailing_prose_after_export_name() {
        let code = "const Card = () => <div />;\n\nexport default Card;\n\nThis component renders a card.";
        assert_eq!(
            trim_after_export(code),
            "const Card = () => <div />;\n\nexport default Card;"
        );
    }

    #[test]
    fn test_trailing_prose_after_export_function() {
        let code = "export default function Header() {\n  return <header />;\n}\n\nNotes: uses Tailwind.";
        assert_eq!(
            trim_after_export(code),
            "export default function Header() {\n  return <header />;\n}"
        );
    }

    #[test]
    fn test_no_export_kept_as_is() {
        assert_eq!(trim_after_export("const x = 1;"), "const x = 1;");
    }
}
