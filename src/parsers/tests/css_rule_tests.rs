use crate::parsers::css;

const SHEET: &str = r#"
:root { --brand: #6366F1; --radius-lg: 12px; }
body { background-color: #0f172a; color: #e2e8f0; font-family: Inter, sans-serif; font-size: 14px; }
.card { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 16px;
        box-shadow: 0 1px 2px rgba(0,0,0,0.2); }
.btn { background-color: #6366f1; color: #FFFFFF; padding: 8px 12px; margin-top: 4px; }
.muted { color: inherit; border-color: transparent; }
a { color: #e2e8f0; }
"#;

#[cfg(test)]
mod rule_tests {
    use super::*;

    #[test]
    fn test_custom_properties() {
        let props = css::custom_properties(SHEET);
        assert_eq!(
            props,
            vec![
                ("--brand".to_string(), "#6366f1".to_string()),
                ("--radius-lg".to_string(), "12px".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_colors_skip_longhands_and_keywords() {
        assert_eq!(
            css::text_colors(SHEET),
            vec!["#e2e8f0", "#ffffff", "#e2e8f0"]
        );
    }

    #[test]
    fn test_background_colors() {
        assert_eq!(
            css::background_colors(SHEET),
            vec!["#0f172a", "#1e293b", "#6366f1"]
        );
    }

    #[test]
    fn test_border_colors() {
        assert_eq!(css::border_colors(SHEET), vec!["#334155"]);
    }

    #[test]
    fn test_typography_and_spacing() {
        assert_eq!(css::font_families(SHEET), vec!["inter, sans-serif"]);
        assert_eq!(css::font_sizes(SHEET), vec!["14px"]);
        assert_eq!(css::spacing(SHEET), vec!["16px", "8px 12px", "4px"]);
        assert_eq!(css::radii(SHEET), vec!["12px"]);
        assert_eq!(css::shadows(SHEET), vec!["0 1px 2px rgba(0,0,0,0.2)"]);
    }
}

#[cfg(test)]
mod extraction_tests {
    use super::*;

    #[test]
    fn test_extract_counts() {
        let extraction = css::extract(SHEET);
        assert_eq!(extraction.text_colors.get("#e2e8f0"), Some(&2));
        assert_eq!(extraction.text_colors.get("#ffffff"), Some(&1));
        assert_eq!(extraction.background_colors.len(), 3);
        assert_eq!(extraction.custom_properties.len(), 2);
    }

    #[test]
    fn test_empty_sheet() {
        assert!(css::extract("").is_empty());
    }

    #[test]
    fn test_merge() {
        let mut a = css::extract("p { color: #111111; }");
        let b = css::extract("h1 { color: #111111; } h2 { color: #222222; }");
        a.merge(&b);
        assert_eq!(a.text_colors.get("#111111"), Some(&2));
        assert_eq!(a.text_colors.get("#222222"), Some(&1));
    }
}
