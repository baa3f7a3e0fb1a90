use super::links::is_line_break;

/// Remove markdown bold/italics, keeping the emphasized text.
///
/// A run of one to three `*`/`_` characters wraps the text and must be
/// repeated exactly to close it. The wrapped text must start and end with a
/// non-whitespace character, be at least two characters long and stay on one
/// line.
#[must_use]
pub fn strip_emphasis(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if let Some((inner_start, inner_end, end)) = emphasis_at(&chars, i) {
            out.extend(&chars[inner_start..inner_end]);
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Match emphasis opening at `start`: `(inner_start, inner_end, end)`.
fn emphasis_at(chars: &[char], start: usize) -> Option<(usize, usize, usize)> {
    let run = chars[start..]
        .iter()
        .take(3)
        .take_while(|c| is_delimiter(**c))
        .count();

    // Longest delimiter first, shortest inner text first.
    for len in (1..=run).rev() {
        let delimiter = &chars[start..start + len];
        let inner_start = start + len;
        match chars.get(inner_start) {
            Some(c) if !c.is_whitespace() => {}
            _ => continue,
        }
        for last in inner_start + 1..chars.len() {
            let c = chars[last];
            if is_line_break(c) {
                break;
            }
            if !c.is_whitespace() && chars[last + 1..].starts_with(delimiter) {
                return Some((inner_start, last + 1, last + 1 + len));
            }
        }
    }
    None
}

fn is_delimiter(c: char) -> bool {
    c == '*' || c == '_'
}
