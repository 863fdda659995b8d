//! Query parsing: phrase mode vs term mode / 查询解析

use once_cell::sync::Lazy;
use regex::Regex;

use super::matcher::fold_case;

static PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("phrase pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// A double-quoted substring, matched as one contiguous unit
    Phrase,
    /// Whitespace-separated terms, each matched on its own
    Terms,
}

/// A parsed search query / 解析后的查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: QueryMode,
    /// Terms as typed
    pub terms: Vec<String>,
    /// Case-folded terms, same order as `terms`
    pub folded: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        let (mode, terms): (QueryMode, Vec<String>) = match PHRASE.captures(query) {
            Some(caps) => (QueryMode::Phrase, vec![caps[1].to_string()]),
            None => (
                QueryMode::Terms,
                query.split_whitespace().map(str::to_string).collect(),
            ),
        };
        let folded = terms.iter().map(|t| fold_case(t)).collect();
        Self { mode, terms, folded }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
