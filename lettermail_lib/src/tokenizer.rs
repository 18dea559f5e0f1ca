use deunicode::deunicode;

/// Drops one outer pair of parentheses. Both must be present.
pub fn strip_parens(input: &str) -> &str {
    match input.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) => inner,
        None => input,
    }
}

/// Prepares raw input for matching. Returns `None` when nothing but
/// whitespace is left.
pub fn sanitize(input: &str, transliterate: bool) -> Option<String> {
    let stripped = strip_parens(input);
    let sanitized = if transliterate {
        deunicode(stripped)
    } else {
        stripped.to_string()
    };
    if sanitized.trim().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Keeps word characters, whitespace and `-#&/`, plus `.` when `keep_dot`.
pub fn strip_chars(value: &str, keep_dot: bool) -> String {
    let kept: String = value
        .chars()
        .filter(|ch| {
            ch.is_alphanumeric()
                || *ch == '_'
                || ch.is_whitespace()
                || matches!(ch, '-' | '#' | '&' | '/')
                || (keep_dot && *ch == '.')
        })
        .collect();
    kept.trim().to_string()
}

/// "SAN jose" -> "San Jose"
pub fn capitalize_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|ch| ch.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
