pub const DEFAULT_WORDS_AROUND: usize = 10;

const FALLBACK_CHARS: usize = 200;

/// Window of `words_around` tokens either side of `target` inside `text`.
///
/// The anchor is the first token containing the target's first token
/// (case-insensitive). When no token contains it the window starts at
/// the beginning of `text`. When `target` does not occur in `text` at all
/// the first 200 characters of `text` are returned instead.
pub fn context_window(text: &str, target: &str, words_around: usize) -> String {
    let text_lower = text.to_lowercase();
    let target_lower = target.to_lowercase();

    if !text_lower.contains(&target_lower) {
        return text.chars().take(FALLBACK_CHARS).collect();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let target_words: Vec<&str> = target_lower.split_whitespace().collect();

    let word_index = target_words
        .first()
        .and_then(|first| {
            words
                .iter()
                .position(|w| w.to_lowercase().contains(first))
        })
        .unwrap_or(0);

    let start = word_index.saturating_sub(words_around);
    let end = (word_index + target_words.len() + words_around).min(words.len());

    words[start..end].join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_around_single_token() {
        let text = "A B C D E F TARGET G H I J K L";
        assert_eq!(context_window(text, "TARGET", 2), "E F TARGET G H");
    }

    #[test]
    fn window_clamps_at_edges() {
        assert_eq!(context_window("TARGET G H", "target", 5), "TARGET G H");
        assert_eq!(context_window("A B TARGET", "TARGET", 1), "B TARGET");
    }

    #[test]
    fn multi_token_target_widens_window() {
        let text = "one two Call 555 123 4567 now three four";
        assert_eq!(
            context_window(text, "555 123 4567", 1),
            "Call 555 123 4567 now"
        );
    }

    #[test]
    fn anchor_uses_containment_not_equality() {
        let text = "x y z Phone:555-123-4567 after";
        assert_eq!(context_window(text, "555-123-4567", 1), "z Phone:555-123-4567 after");
    }

    #[test]
    fn missing_target_falls_back_to_prefix() {
        let text = "w".repeat(300);
        assert_eq!(context_window(&text, "absent", 10).len(), 200);
        assert_eq!(context_window("short text", "absent", 10), "short text");
    }

    #[test]
    fn unanchored_target_starts_at_document_start() {
        // No first token to anchor on, so the window opens at token 0.
        assert_eq!(context_window("a b c d e", "", 2), "a b");
        assert_eq!(context_window("a b c d e", " ", 1), "a");
    }
}
