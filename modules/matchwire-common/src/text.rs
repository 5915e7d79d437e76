//! Character-budget enforcement for mobile UI fields.

use std::borrow::Cow;

/// Marker appended when a string is cut to fit its budget.
pub const ELLIPSIS: &str = "...";

/// Fit a string into `max_chars` characters.
///
/// Strings at or under the budget pass through unchanged. Longer strings
/// are cut to `max_chars - 3` characters and `"..."` is appended, so the
/// result is exactly `max_chars` characters long. Counts characters, not
/// bytes, and never splits a UTF-8 scalar. Idempotent at a fixed budget.
///
/// Budgets smaller than the ellipsis itself are not meaningful; the
/// smallest budget used anywhere in the system is 45.
pub fn fit_to_budget(s: &str, max_chars: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_chars {
        return Cow::Borrowed(s);
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string_passes_through_unchanged() {
        let s = "A short headline.";
        assert!(matches!(fit_to_budget(s, 120), Cow::Borrowed(_)));
        assert_eq!(fit_to_budget(s, 120), s);
    }

    #[test]
    fn test_exact_budget_passes_through() {
        let s = "x".repeat(120);
        assert_eq!(fit_to_budget(&s, 120), s.as_str());
    }

    #[test]
    fn test_long_string_cut_to_exact_budget_with_ellipsis() {
        let s = "B".repeat(400);
        let fitted = fit_to_budget(&s, 120);
        assert_eq!(fitted.chars().count(), 120);
        assert!(fitted.ends_with("..."));
        assert!(fitted.starts_with(&"B".repeat(117)));
    }

    #[test]
    fn test_idempotent_at_same_budget() {
        let s = "C".repeat(500);
        let once = fit_to_budget(&s, 300).into_owned();
        let twice = fit_to_budget(&once, 300);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 4 chars, 12 bytes
        let s = "日本語文";
        assert_eq!(fit_to_budget(s, 4), s);

        let long = "日".repeat(50);
        let fitted = fit_to_budget(&long, 10);
        assert_eq!(fitted.chars().count(), 10);
        assert!(fitted.ends_with("..."));
    }
}
