//! Case-insensitive substring matching on char offsets / 大小写不敏感匹配

/// Half-open match range in chars / 匹配范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Lowercase `s` char by char / 逐字符转小写
///
/// Chars whose lowercase form is more than one char are kept as-is, so the
/// result has exactly as many chars as the input and offsets carry over.
pub fn fold_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

/// Every non-overlapping occurrence of `needle` in `haystack`, left to right / 查找所有不重叠匹配
///
/// Both arguments are expected to be folded already. Scanning resumes at the end
/// of each match.
pub fn find_all(haystack: &str, needle: &str) -> Vec<Span> {
    let mut out = Vec::new();
    if needle.is_empty() {
        return out;
    }
    let needle_chars = needle.chars().count();

    let mut byte_pos = 0;
    let mut char_pos = 0;
    while let Some(found) = haystack[byte_pos..].find(needle) {
        let start_byte = byte_pos + found;
        let start = char_pos + haystack[byte_pos..start_byte].chars().count();
        let end = start + needle_chars;
        out.push(Span { start, end });
        byte_pos = start_byte + needle.len();
        char_pos = end;
    }
    out
}

/// Number of non-overlapping occurrences / 匹配次数
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
