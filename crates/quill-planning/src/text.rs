use regex::Regex;

/// Compiles a pattern that is known at compile time.
///
/// Only used to initialise `LazyLock` statics; an invalid pattern is a
/// programming error caught by the first test touching it.
pub fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Built-in pattern is invalid ({pattern}): {err}"),
    }
}

/// Whether `term` occurs in `haystack`.
///
/// ASCII terms must sit on word boundaries so "then" does not fire inside
/// "authentication"; CJK terms match anywhere. Both sides are expected to be
/// lowercase already.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if !term.is_ascii() {
        return haystack.contains(term);
    }
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(|letter| letter.is_ascii_alphanumeric())
            && !after.is_some_and(|letter| letter.is_ascii_alphanumeric())
    })
}

/// Every term from `table` present in `haystack`, in table order.
pub fn matched_terms(haystack: &str, table: &[&'static str]) -> Vec<&'static str> {
    table
        .iter()
        .copied()
        .filter(|term| contains_term(haystack, term))
        .collect()
}

/// Whether any term from `table` is present in `haystack`.
pub fn contains_any(haystack: &str, table: &[&str]) -> bool {
    table.iter().any(|term| contains_term(haystack, term))
}

/// First `limit` characters of `text`, with an ellipsis when cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_owned();
    }
    let mut cut: String = trimmed.chars().take(limit).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_terms_respect_word_boundaries() {
        assert!(contains_term("first do this, then that", "then"));
        assert!(!contains_term("fix authentication", "then"));
        assert!(contains_term("把title加粗", "title"));
    }

    #[test]
    fn test_cjk_terms_match_anywhere() {
        assert!(contains_term("请把所有标题加粗", "所有"));
        assert!(!contains_term("请把标题加粗", "所有"));
    }

    #[test]
    fn test_matched_terms_keeps_table_order() {
        let table = ["首先", "然后", "最后"];
        assert_eq!(matched_terms("最后检查，首先排版", &table), vec!["首先", "最后"]);
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("统一全文字体", 4), "统一全文…");
        assert_eq!(truncate_chars("  short ", 10), "short");
    }
}
