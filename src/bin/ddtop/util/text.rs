/// Word-wraps every line of `text` separately, so explicit line breaks in
/// multi-line messages survive. Right-aligned table rows keep their leading
/// padding when they already fit.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.chars().count() <= width {
            lines.push(paragraph.to_string());
        } else {
            wrap_words(paragraph, width, &mut lines);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_words(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    match max_len {
        0 => String::new(),
        _ if s.chars().count() <= max_len => s.to_string(),
        _ => {
            let mut out: String = s.chars().take(max_len - 1).collect();
            out.push('…');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_lines_verbatim() {
        let result = wrap("  Bond of      2", 20);
        assert_eq!(result, vec!["  Bond of      2"]);
    }

    #[test]
    fn wrap_breaks_long_paragraphs() {
        let result = wrap("the quick brown fox", 10);
        assert_eq!(result, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn wrap_preserves_line_breaks() {
        let result = wrap("first line\nsecond", 40);
        assert_eq!(result, vec!["first line", "second"]);
    }

    #[test]
    fn wrap_empty_text() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_short() {
        assert_eq!(truncate("exclusions", 10), "exclusions");
    }

    #[test]
    fn truncate_long() {
        assert_eq!(truncate("Virtual site 3fad", 8), "Virtual…");
    }

    #[test]
    fn truncate_to_one() {
        assert_eq!(truncate("Angle", 1), "…");
    }
}
