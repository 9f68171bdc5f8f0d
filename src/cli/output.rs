//! Output formatting utilities for the CLI.

use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters rather than bytes so cached values with multi-byte
/// text never split inside a code point.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_strings_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_truncate_long_strings() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("🦀🦀🦀🦀🦀", 4), "🦀...");
        assert_eq!(truncate("ééé", 3), "ééé");
    }
}
