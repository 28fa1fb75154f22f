/// Quotes `s` for safe use as one word in a POSIX shell command line.
///
/// Words made only of characters the shell never interprets are returned
/// unchanged; everything else is wrapped in single quotes with embedded
/// single quotes spliced in as `'"'"'`.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-' | '_')
        })
    {
        return s.to_owned();
    }

    let mut result = String::with_capacity(s.len() + 2);
    result.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            result.push_str("'\"'\"'");
        } else {
            result.push(ch);
        }
    }
    result.push('\'');
    result
}

/// Quotes every word of `argv` and joins them with single spaces.
pub fn join_argv<S: AsRef<str>>(argv: &[S]) -> String {
    argv.iter()
        .map(|word| shell_quote(word.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
