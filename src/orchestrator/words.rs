//! Client-side word-limit enforcement.

/// Cap `caption` at `limit` whitespace-delimited words.
///
/// Captions within the limit are returned unchanged. Longer ones keep the
/// first `limit` words, single-space joined, followed by `ellipsis`.
pub fn enforce_word_limit(caption: &str, limit: u32, ellipsis: &str) -> String {
    let limit = limit as usize;
    let words: Vec<&str> = caption.split_whitespace().collect();
    if words.len() <= limit {
        return caption.to_string();
    }
    format!("{}{}", words[..limit].join(" "), ellipsis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_words_cut_to_fifteen() {
        let caption = "a b c d e f g h i j k l m n o p";
        assert_eq!(
            enforce_word_limit(caption, 15, "..."),
            "a b c d e f g h i j k l m n o..."
        );
    }

    #[test]
    fn test_within_limit_is_untouched() {
        let caption = "  a  dog\ton a beach ";
        assert_eq!(enforce_word_limit(caption, 5, "..."), caption);
    }

    #[test]
    fn test_collapses_whitespace_when_truncating() {
        assert_eq!(enforce_word_limit("one\ntwo   three four", 2, "…"), "one two…");
    }
}
