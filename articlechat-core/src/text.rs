use regex::Regex;
use std::sync::OnceLock;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Shape check only; the value is forwarded verbatim regardless.
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// A question can be submitted only if something is left after trimming.
pub fn is_submittable(question: &str) -> bool {
    !question.trim().is_empty()
}

pub fn looks_like_email(value: &str) -> bool {
    email_re().is_match(value.trim())
}

/// Single-line, length-capped rendering of user text for logs and status lines.
pub fn preview_text(text: &str) -> String {
    const MAX: usize = 80;
    let flat = whitespace_re().replace_all(text.trim(), " ");
    if flat.chars().count() <= MAX {
        return flat.into_owned();
    }

    flat.chars().take(MAX).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_questions_are_not_submittable() {
        assert!(!is_submittable(""));
        assert!(!is_submittable("   \n\t"));
        assert!(is_submittable("  hi "));
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.com"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("not an email"));
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview_text(" hello\n  world "), "hello world");
        let long = "x".repeat(200);
        let p = preview_text(&long);
        assert_eq!(p.chars().count(), 81);
        assert!(p.ends_with('…'));
    }
}
