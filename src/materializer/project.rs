//! Fixed manifests and the files derived from design tokens.
//!
//! Every function here is pure, so rewriting a project with the same inputs
//! produces byte-identical files.

use crate::tokens::{DesignTokenSet, Theme};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// One scaffold file: path relative to the project root plus contents
pub type ProjectFile = (&'static str, String);

pub fn package_json(package_name: &str) -> String {
    let manifest = json!({
        "name": package_name,
        "private": true,
        "version": "0.1.0",
        "type": "module",
        "scripts": {
            "dev": "vite",
            "build": "vite build",
            "preview": "vite preview"
        },
        "dependencies": {
            "react": "^18.3.1",
            "react-dom": "^18.3.1",
            "react-router-dom": "^6.26.2"
        },
        "devDependencies": {
            "@vitejs/plugin-react": "^4.3.1",
            "autoprefixer": "^10.4.20",
            "postcss": "^8.4.47",
            "tailwindcss": "^3.4.13",
            "vite": "^5.4.8"
        }
    });
    pretty(&manifest)
}

pub fn index_html(title: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{}</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.jsx"></script>
  </body>
</html>
"#,
        title
    )
}

pub const MAIN_JSX: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';
import './index.css';

ReactDOM.createRoot(document.getElementById('root')).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#;

pub const VITE_CONFIG: &str = r#"import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
});
"#;

pub const POSTCSS_CONFIG: &str = r#"export default {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
};
"#;

/// Theme colors keyed by their Tailwind name
fn theme_colors(tokens: &DesignTokenSet) -> BTreeMap<&'static str, String> {
    let mut colors = BTreeMap::new();
    let mut put = |name: &'static str, value: Option<&String>| {
        if let Some(v) = value {
            colors.insert(name, v.clone());
        }
    };
    put("background", tokens.page_background().map(str::to_string).as_ref());
    put(
        "surface",
        match tokens.theme {
            Theme::Dark => tokens.backgrounds.light.as_ref(),
            Theme::Light => tokens.backgrounds.dark.as_ref(),
        },
    );
    put("foreground", tokens.text.primary.as_ref());
    put("muted", tokens.text.secondary.as_ref());
    put("primary", tokens.accents.primary.as_ref());
    put("secondary", tokens.accents.secondary.as_ref());
    put("border", tokens.borders.first());
    colors
}

pub fn tailwind_config(tokens: &DesignTokenSet) -> String {
    let mut extend = Map::new();

    let colors: Map<String, Value> = theme_colors(tokens)
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v)))
        .collect();
    if !colors.is_empty() {
        extend.insert("colors".to_string(), Value::Object(colors));
    }
    if !tokens.font_families.is_empty() {
        let stack: Vec<String> = tokens.font_families[0]
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            .filter(|f| !f.is_empty())
            .collect();
        extend.insert("fontFamily".to_string(), json!({ "sans": stack }));
    }
    if let Some(radius) = tokens.radii.first() {
        extend.insert("borderRadius".to_string(), json!({ "DEFAULT": radius }));
    }
    if let Some(shadow) = tokens.shadows.first() {
        extend.insert("boxShadow".to_string(), json!({ "DEFAULT": shadow }));
    }

    let dark_mode = match tokens.theme {
        Theme::Dark => "class",
        Theme::Light => "media",
    };

    format!(
        "/** @type {{import('tailwindcss').Config}} */\nexport default {{\n  content: ['./index.html', './src/**/*.{{js,jsx}}'],\n  darkMode: '{}',\n  theme: {{\n    extend: {},\n  }},\n  plugins: [],\n}};\n",
        dark_mode,
        indent(&pretty(&Value::Object(extend)), 4)
    )
}

pub fn index_css(tokens: &DesignTokenSet) -> String {
    let mut out = String::from("@tailwind base;\n@tailwind components;\n@tailwind utilities;\n");

    let mut vars: Vec<(String, String)> = tokens
        .custom_properties
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    for (name, value) in theme_colors(tokens) {
        vars.push((format!("--color-{}", name), value));
    }

    if !vars.is_empty() {
        out.push_str("\n:root {\n");
        for (name, value) in &vars {
            out.push_str(&format!("  {}: {};\n", name, value));
        }
        out.push_str("}\n");
    }

    let colors = theme_colors(tokens);
    let mut body = Vec::new();
    if let Some(bg) = colors.get("background") {
        body.push(format!("  background-color: {};", bg));
    }
    if let Some(fg) = colors.get("foreground") {
        body.push(format!("  color: {};", fg));
    }
    if let Some(font) = tokens.font_families.first() {
        body.push(format!("  font-family: {};", font));
    }
    if !body.is_empty() {
        out.push_str(&format!("\nbody {{\n{}\n}}\n", body.join("\n")));
    }

    out
}

pub fn tokens_json(tokens: &DesignTokenSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tokens).map(|s| s + "\n")
}

/// Every scaffold file except the router and barrel
pub fn scaffold(
    package_name: &str,
    title: &str,
    tokens: &DesignTokenSet,
) -> Result<Vec<ProjectFile>, serde_json::Error> {
    Ok(vec![
        ("package.json", package_json(package_name)),
        ("index.html", index_html(title)),
        ("vite.config.js", VITE_CONFIG.to_string()),
        ("postcss.config.js", POSTCSS_CONFIG.to_string()),
        ("tailwind.config.js", tailwind_config(tokens)),
        ("src/main.jsx", MAIN_JSX.to_string()),
        ("src/index.css", index_css(tokens)),
        ("src/theme/tokens.json", tokens_json(tokens)?),
    ])
}

fn pretty(value: &Value) -> String {
    // a Value always serializes
    serde_json::to_string_pretty(value).unwrap_or_default() + "\n"
}

fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.trim_end()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
