pub mod css;
pub mod dom;
pub mod html;
pub mod source;

#[cfg(test)]
mod tests;

/// Result of parsing a captured HTML document
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Document title (if any)
    pub title: Option<String>,
    /// Whitespace-normalized body text
    pub content: String,
    /// Text of h1-h3 headings, in document order
    pub headings: Vec<String>,
    /// Raw href values of every link
    pub links: Vec<String>,
}

impl ParseResult {
    /// The first `max_chars` characters of body text
    pub fn excerpt(&self, max_chars: usize) -> String {
        crate::utils::truncate_chars(&self.content, max_chars)
    }
}
