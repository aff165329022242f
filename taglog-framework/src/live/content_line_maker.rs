use unicode_width::UnicodeWidthChar;

/// the text up to the first line break
pub fn first_line(content: &str) -> &str {
    let line = content.split('\n').next().unwrap_or("");
    line.strip_suffix('\r').unwrap_or(line)
}

// length in bytes of the escape sequence starting at `s[0] == '\x1b'`
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'[') => {
            // CSI: parameters, then one final byte in @..~
            let mut i = 2;
            while let Some(&b) = bytes.get(i) {
                i += 1;
                if (0x40..=0x7e).contains(&b) {
                    break;
                }
            }
            i
        }
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
        None => 1,
    }
}

/// columns the text occupies, ignoring escape sequences
pub fn display_width(content: &str) -> usize {
    let mut width = 0;
    let mut rest = content;
    while let Some(c) = rest.chars().next() {
        if c == '\x1b' {
            rest = &rest[escape_len(rest)..];
            continue;
        }
        width += c.width().unwrap_or(0);
        rest = &rest[c.len_utf8()..];
    }
    width
}

/// cut the text to at most `width` columns, keeping escape sequences intact
///
/// When styled text is cut, a reset is appended so the style does not leak
/// into whatever is drawn next.
pub fn truncate_to_width(content: &str, width: usize) -> String {
    if display_width(content) <= width {
        return content.to_string();
    }

    let mut result = String::with_capacity(content.len());
    let mut used = 0;
    let mut styled = false;
    let mut rest = content;
    while let Some(c) = rest.chars().next() {
        if c == '\x1b' {
            let len = escape_len(rest);
            result.push_str(&rest[..len]);
            rest = &rest[len..];
            styled = true;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        result.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if styled {
        result.push_str("\x1b[0m");
    }
    result
}

// escape sequences stay, every other control character goes
fn sanitize_control_chars(content: &str) -> String {
    content
        .chars()
        .filter(|&c| c == '\x1b' || !c.is_control())
        .collect()
}

/// single-line status text fitted into `width` columns
pub fn fit_single_line(content: &str, width: usize) -> String {
    truncate_to_width(&sanitize_control_chars(first_line(content)), width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("hello\nworld"), "hello");
        assert_eq!(first_line("hello\r\nworld"), "hello");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn test_display_width_ignores_escapes() {
        assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(display_width("plain"), 5);
    }

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_truncate_short_content() {
        assert_eq!(truncate_to_width("hi", 5), "hi");
    }

    #[test]
    fn test_truncate_exact_width() {
        assert_eq!(truncate_to_width("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_content() {
        assert_eq!(truncate_to_width("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn test_truncate_does_not_split_wide_chars() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
    }

    #[test]
    fn test_truncate_styled_content_resets() {
        let cut = truncate_to_width("\x1b[31mhello world\x1b[0m", 5);
        assert_eq!(cut, "\x1b[31mhello\x1b[0m");
        assert_eq!(display_width(&cut), 5);
    }

    #[test]
    fn test_fit_single_line_drops_control_chars() {
        let fitted = fit_single_line("\t\t\t\tabcdefghijkl", 10);
        assert_eq!(fitted, "abcdefghij");
        assert_eq!(fit_single_line("abc\rZZ", 10), "abcZZ");
        assert_eq!(fit_single_line("a\x07b\x08c", 10), "abc");
    }

    #[test]
    fn test_fit_single_line_keeps_styles() {
        let fitted = fit_single_line("\x1b[31m\tred\x1b[0m", 10);
        assert_eq!(fitted, "\x1b[31mred\x1b[0m");
        assert_eq!(display_width(&fitted), 3);
    }

    #[test]
    fn test_fit_single_line_multiline() {
        assert_eq!(fit_single_line("hello world\nsecond line", 5), "hello");
        assert_eq!(fit_single_line("short\nsecond line", 80), "short");
    }
}
