//! Lenient number parsing
//!
//! Accepts plain decimals (`-12.5`), thousands-separated notation
//! (`123,456.7`) and the full-width forms of digits, signs and separators
//! (`＋１２３，４５６．７８９`).

/// Map full-width digits, signs, separators and spaces to their ASCII forms.
pub fn normalize_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => {
                char::from_u32(c as u32 - 0xFF10 + '0' as u32).unwrap_or(c)
            }
            '\u{FF0B}' => '+',
            '\u{FF0D}' | '\u{2212}' => '-',
            '\u{FF0C}' => ',',
            '\u{FF0E}' => '.',
            '\u{3000}' => ' ',
            c => c,
        })
        .collect()
}

/// Parse `text` as a number. Returns `None` for empty or malformed input.
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized = normalize_width(text);
    let trimmed = normalized.trim();
    if !is_number_literal(trimmed) {
        return None;
    }
    let plain: String = trimmed.chars().filter(|c| *c != ',').collect();
    plain.parse().ok()
}

/// `[+-]? int? (. digits)?` where `int` is either plain digits or groups of
/// three separated by commas. At least one digit is required.
fn is_number_literal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let int_ok = if int.contains(',') {
        let mut groups = int.split(',');
        let head = groups.next().unwrap_or_default();
        (1..=3).contains(&head.len())
            && all_digits(head)
            && groups.all(|group| group.len() == 3 && all_digits(group))
    } else {
        all_digits(int)
    };
    let frac_ok = frac.is_none_or(|frac| !frac.is_empty() && all_digits(frac));
    let has_digit = !int.is_empty() || frac.is_some_and(|f| !f.is_empty());
    int_ok && frac_ok && has_digit
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Number of digits after the decimal point in the shortest representation of
/// `n`.
pub fn decimal_places(n: f64) -> u32 {
    let repr = n.to_string();
    repr.split_once('.')
        .map_or(0, |(_, frac)| frac.len() as u32)
}

/// Render a number the way messages show it: no trailing `.0`.
pub fn format_number(n: f64) -> String {
    n.to_string()
}
