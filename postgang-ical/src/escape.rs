//! Text escaping for iCalendar TEXT values (RFC 5545 §3.3.11).

/// Returns the two-character escape sequence for `c`, or `None` if the
/// character is written verbatim.
///
/// Newlines map to the textual literal `\n`, never to an actual line break.
pub fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '\\' => Some("\\\\"),
        ';' => Some("\\;"),
        ',' => Some("\\,"),
        '\n' => Some("\\n"),
        _ => None,
    }
}

/// Escapes every character of `text`.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match escape_char(c) {
            Some(seq) => out.push_str(seq),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_text("hello, world"), "hello\\, world");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_text("back\\slash"), "back\\\\slash");
        assert_eq!(escape_text("semi;colon"), "semi\\;colon");
    }

    #[test]
    fn identity_outside_special_set() {
        let safe = "Posten kommer onsdag 12. januar: æøå 日本語 🤖";
        assert_eq!(escape_text(safe), safe);
    }

    #[test]
    fn newline_is_textual_escape() {
        let escaped = escape_text("a\nb");
        assert!(!escaped.contains('\n'));
        assert_eq!(escaped, "a\\nb");
    }
}
