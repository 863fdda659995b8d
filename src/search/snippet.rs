//! Snippet extraction around a match / 摘要片段

use super::matcher::Span;

pub const HIGHLIGHT_OPEN: &str = "<mark>";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";
pub const ELLIPSIS: &str = "…";

/// Char-boundary table for slicing a text by char offsets / 字符边界索引
pub struct TextIndex<'a> {
    text: &'a str,
    bounds: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());
        Self { text, bounds }
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `start..end` in chars, clamped to the text
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.text[self.bounds[start]..self.bounds[end]]
    }
}

/// Escape `& < > " '` for HTML output / HTML转义
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Context window `[a, b)` around `span`
fn window(len: usize, span: Span, radius: usize) -> (usize, usize) {
    (span.start.saturating_sub(radius), (span.end + radius).min(len))
}

/// Escaped context with the match wrapped in the highlight marker / 高亮摘要
pub fn highlight_html(index: &TextIndex<'_>, span: Span, radius: usize) -> String {
    let len = index.len();
    let (a, b) = window(len, span, radius);
    format!(
        "{}{}{}{}{}{}{}",
        if a > 0 { ELLIPSIS } else { "" },
        escape_html(index.slice(a, span.start)),
        HIGHLIGHT_OPEN,
        escape_html(index.slice(span.start, span.end)),
        HIGHLIGHT_CLOSE,
        escape_html(index.slice(span.end, b)),
        if b < len { ELLIPSIS } else { "" },
    )
}

/// Unescaped context around `span`, used by ranked search / 纯文本摘要
pub fn plain(index: &TextIndex<'_>, span: Span, radius: usize) -> String {
    let len = index.len();
    let (a, b) = window(len, span, radius);
    format!(
        "{}{}{}",
        if a > 0 { ELLIPSIS } else { "" },
        index.slice(a, b),
        if b < len { ELLIPSIS } else { "" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_five() {
        assert_eq!(escape_html(r#"a&b<c>d"e'f"#), "a&amp;b&lt;c&gt;d&quot;e&#39;f");
    }

    #[test]
    fn test_highlight_whole_text_no_ellipsis() {
        let index = TextIndex::new("pay net 30");
        let html = highlight_html(&index, Span { start: 4, end: 7 }, 50);
        assert_eq!(html, "pay <mark>net</mark> 30");
    }

    #[test]
    fn test_highlight_truncated_both_sides() {
        let index = TextIndex::new("0123456789abcdef");
        let html = highlight_html(&index, Span { start: 7, end: 9 }, 3);
        assert_eq!(html, "…456<mark>78</mark>9ab…");
    }

    #[test]
    fn test_script_context_is_escaped() {
        let text = "see <script>alert('x')</script> net 30";
        let index = TextIndex::new(text);
        let start = text.find("net").unwrap();
        let html = highlight_html(&index, Span { start, end: start + 3 }, 50);
        assert_eq!(
            html,
            "see &lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; <mark>net</mark> 30"
        );
        assert_eq!(html.matches("<mark>").count(), 1);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_matched_text_is_escaped_too() {
        let index = TextIndex::new("a<b>c");
        let html = highlight_html(&index, Span { start: 1, end: 4 }, 0);
        assert_eq!(html, "…<mark>&lt;b&gt;</mark>…");
    }

    #[test]
    fn test_multibyte_context() {
        let index = TextIndex::new("ááá net ééé");
        let html = highlight_html(&index, Span { start: 4, end: 7 }, 2);
        assert_eq!(html, "…á <mark>net</mark> é…");
    }

    #[test]
    fn test_plain_snippet() {
        let index = TextIndex::new("alpha beta gamma");
        assert_eq!(plain(&index, Span { start: 6, end: 10 }, 2), "…a beta g…");
        assert_eq!(plain(&index, Span { start: 0, end: 5 }, 90), "alpha beta gamma");
    }
}
