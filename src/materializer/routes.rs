//! Route table derivation and the router entry file.

use std::collections::HashSet;

/// One router entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub component: String,
}

/// Route path for a page component name
///
/// `Projects` maps to `/projects`, `Task…Detail` to `/tasks/:id`, `Tasks` to
/// `/tasks`, and everything else to `/`.
pub fn route_for(name: &str) -> &'static str {
    if name.contains("Projects") {
        "/projects"
    } else if name.contains("Task") && name.contains("Detail") {
        "/tasks/:id"
    } else if name.contains("Tasks") {
        "/tasks"
    } else {
        "/"
    }
}

/// Build the route table for a set of page names
///
/// Names are visited in sorted order with `Home` pages first; the first
/// name claiming a path keeps it and later claimants are dropped.
pub fn derive_routes(names: &[String]) -> Vec<Route> {
    let mut ordered: Vec<&String> = names.iter().collect();
    ordered.sort_by(|a, b| {
        (!a.starts_with("Home"), a.as_str()).cmp(&(!b.starts_with("Home"), b.as_str()))
    });
    ordered.dedup();

    let mut claimed = HashSet::new();
    let mut routes = Vec::new();
    for name in ordered {
        let path = route_for(name);
        if !claimed.insert(path) {
            ::log::warn!("Route {} already taken; {} is not routed", path, name);
            continue;
        }
        routes.push(Route {
            path: path.to_string(),
            component: name.clone(),
        });
    }

    routes.sort_by_key(|r| route_rank(&r.path));
    routes
}

fn route_rank(path: &str) -> (usize, String) {
    (path.matches('/').count(), path.to_string())
}

/// Source of `src/App.jsx` for a route table
pub fn render_app(routes: &[Route]) -> String {
    let mut out = String::from("import { BrowserRouter, Routes, Route } from 'react-router-dom';\n");

    let mut imported: Vec<&str> = routes.iter().map(|r| r.component.as_str()).collect();
    imported.sort();
    for name in &imported {
        out.push_str(&format!("import {} from './pages/{}';\n", name, name));
    }

    out.push_str("\nexport default function App() {\n  return (\n    <BrowserRouter>\n      <Routes>\n");
    if routes.is_empty() {
        out.push_str("        <Route path=\"/\" element={<div className=\"p-8\">No pages generated</div>} />\n");
    }
    for route in routes {
        out.push_str(&format!(
            "        <Route path=\"{}\" element={{<{} />}} />\n",
            route.path, route.component
        ));
    }
    out.push_str("      </Routes>\n    </BrowserRouter>\n  );\n}\n");
    out
}
