use crate::parsers::html;

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let page = r#"<html><head><title> Task  Board </title></head>
            <body><h1>Tasks</h1><p>Hello, world!</p>
            <a href="/projects">Projects</a><a>No href</a></body></html>"#;
        let result = html::parse(page);
        assert_eq!(result.title.as_deref(), Some("Task Board"));
        assert_eq!(result.content, "Tasks Hello, world! Projects No href");
        assert_eq!(result.headings, vec!["Tasks"]);
        assert_eq!(result.links, vec!["/projects"]);
    }

    #[test]
    fn test_parse_empty_document() {
        let result = html::parse("");
        assert!(result.title.is_none());
        assert_eq!(result.content, "");
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_excerpt() {
        let result = html::parse("<body><p>abcdefghij</p></body>");
        assert_eq!(result.excerpt(4), "abcd");
    }

    #[test]
    fn test_inline_styles() {
        let page = "<html><head><style>body { color: #111; }</style></head>\
                    <body><style>.card { padding: 8px; }</style></body></html>";
        let css = html::extract_inline_styles(page);
        assert!(css.contains("color: #111"));
        assert!(css.contains("padding: 8px"));
    }
}

#[cfg(test)]
mod sidebar_tests {
    use super::*;

    #[test]
    fn test_no_sidebar() {
        assert!(html::detect_sidebar("<body><main>content</main></body>").is_none());
    }

    #[test]
    fn test_static_aside() {
        let info = html::detect_sidebar(r#"<body><aside class="panel">Links</aside></body>"#)
            .expect("aside is a sidebar");
        assert_eq!(info.selector, "aside.panel");
        assert!(!info.collapsible);
    }

    #[test]
    fn test_collapsible_by_class() {
        let info = html::detect_sidebar(
            r#"<body><div id="app-sidebar" class="sidebar collapsible">x</div></body>"#,
        )
        .expect("sidebar detected");
        assert_eq!(info.selector, "div#app-sidebar");
        assert!(info.collapsible);
    }

    #[test]
    fn test_collapsible_by_toggle_button() {
        let info = html::detect_sidebar(
            r#"<body><header><button aria-label="Toggle sidebar">=</button></header>
               <aside>Links</aside></body>"#,
        )
        .expect("sidebar detected");
        assert!(info.collapsible);
    }

    #[test]
    fn test_header_nav_is_not_a_sidebar() {
        let page = r#"<body><header><nav class="top">a</nav></header><main></main></body>"#;
        assert!(html::detect_sidebar(page).is_none());

        let page = r#"<body><header>h</header><nav class="side">a</nav></body>"#;
        let info = html::detect_sidebar(page).expect("standalone nav is a sidebar");
        assert_eq!(info.selector, "nav.side");
    }
}
