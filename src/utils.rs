use std::collections::HashSet;

/// Convert a page path to a sanitized file stem
pub fn path_slug(path: &str) -> String {
    let path = strip_query(path);
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "index".to_string();
    }

    let name = trimmed.replace(['/', ':', '?', '&', '=', '#', '%', '.'], "_");

    // Limit filename length
    truncate_chars(&name, 100)
}

/// Make slugs unique by suffixing repeats with `_2`, `_3`, ...
///
/// The first occurrence keeps its slug.
pub fn unique_slugs<I>(slugs: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut taken = HashSet::new();
    slugs
        .into_iter()
        .map(|slug| {
            let mut candidate = slug.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{}_{}", slug, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Convert a page path to a PascalCase page component name
///
/// Id-like segments become `Detail` and singularize the segment before them,
/// so `/tasks/42` names `TaskDetailPage`. Names are valid JS identifiers:
/// one that would start with a digit gets a `Page` prefix.
pub fn page_name(path: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for segment in strip_query(path).split('/').filter(|s| !s.is_empty()) {
        if is_id_segment(segment) {
            if let Some(prev) = parts.last_mut() {
                *prev = singularize(prev);
            }
            parts.push("Detail".to_string());
        } else {
            parts.push(pascal_case(segment));
        }
    }

    let base = parts.concat();
    let base = base.strip_suffix("Page").unwrap_or(&base);
    if base.is_empty() {
        "HomePage".to_string()
    } else if base.starts_with(|c: char| c.is_ascii_alphabetic()) {
        format!("{}Page", base)
    } else {
        format!("Page{}Page", base)
    }
}

/// PascalCase a dashed, underscored or spaced identifier
pub fn pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// npm package name derived from the target URL host
pub fn package_name(target_url: &str) -> String {
    let host = url::Url::parse(target_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();

    let name: String = host
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let name = name.trim_matches('-');

    if name.is_empty() {
        "generated-app".to_string()
    } else {
        format!("{}-clone", name)
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn is_id_segment(segment: &str) -> bool {
    if segment.starts_with(':') || segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    segment.len() >= 8
        && segment.chars().any(|c| c.is_ascii_digit())
        && segment.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn singularize(word: &str) -> String {
    if word.len() > 1 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}
