//! Answer normalization.
//!
//! Every strategy votes on the output of [`normalize_answer`], so two agents
//! saying `"**B.** because..."` and `"Answer: b"` land in the same bucket.
//!
//! Stages, in order:
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | Markup | `` `**B**` `` | `B` |
//! | Answer label | `Answer: B`, `The answer is 42` | `B`, `42` |
//! | Choice letter | `B.`, `(c)`, `d) Paris` | `B`, `C`, `D` |
//! | Leading number | `$1,200.50 total`, `-0.0`, `.5` | `1200.5`, `0`, `0.5` |
//! | Free form | `  New   YORK city. ` | `new york city` |
//!
//! The function is idempotent: a canonical token normalizes to itself.

/// Characters trimmed from both ends before detection
const EDGE_MARKUP: [char; 6] = ['"', '\'', '*', '_', '“', '”'];

/// Characters trimmed from the start only (headings, quotes)
const LEADING_MARKUP: [char; 2] = ['#', '>'];

/// Labels that introduce an answer; longest first
const ANSWER_LABELS: [&str; 6] = [
    "the final answer is",
    "final answer is",
    "the answer is",
    "final answer",
    "answer is",
    "answer",
];

const CURRENCY: [char; 3] = ['$', '€', '£'];

/// Bound on re-normalization passes; real inputs settle in two or three
const MAX_PASSES: usize = 8;

/// Normalize raw model text into a canonical, comparable answer token.
///
/// # Examples
///
/// ```
/// use quorum_domain::normalize_answer;
///
/// assert_eq!(normalize_answer("Answer: b"), "B");
/// assert_eq!(normalize_answer("**C.** Because the..."), "C");
/// assert_eq!(normalize_answer("The answer is 1,024."), "1024");
/// assert_eq!(normalize_answer("  Paris  "), "paris");
///
/// let once = normalize_answer("(d) none of the above");
/// assert_eq!(normalize_answer(&once), once);
/// ```
pub fn normalize_answer(raw: &str) -> String {
    let mut current = normalize_once(raw);
    for _ in 0..MAX_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_once(raw: &str) -> String {
    let cleaned = strip_markup(raw);
    let text = strip_answer_labels(&cleaned);
    if text.is_empty() {
        return String::new();
    }
    if let Some(letter) = choice_letter(text) {
        return letter.to_string();
    }
    if let Some(number) = leading_number(text) {
        return number;
    }
    free_form(text)
}

fn strip_markup(raw: &str) -> String {
    let without_emphasis = raw.replace("**", "").replace("__", "").replace('`', "");
    without_emphasis
        .trim_start_matches(|c: char| c.is_whitespace() || LEADING_MARKUP.contains(&c))
        .trim_matches(|c: char| c.is_whitespace() || EDGE_MARKUP.contains(&c))
        .to_string()
}

fn strip_answer_labels(mut text: &str) -> &str {
    loop {
        let next = strip_answer_label(text);
        if next.len() == text.len() {
            return text;
        }
        text = next;
    }
}

fn strip_answer_label(text: &str) -> &str {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lowered = text.to_ascii_lowercase();
    for label in ANSWER_LABELS {
        if !lowered.starts_with(label) {
            continue;
        }
        let rest = &text[label.len()..];
        let after = rest.trim_start();
        if let Some(value) = after.strip_prefix([':', '-']) {
            return value.trim_start();
        }
        if label.ends_with(" is") && rest.starts_with(char::is_whitespace) {
            return after;
        }
    }
    text
}

/// `B`, `B.`, `B)`, `B:`, `(B)` optionally followed by whitespace and text
fn choice_letter(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;

    let (letter, rest) = if first == '(' {
        let letter = chars.next()?;
        if chars.next()? != ')' {
            return None;
        }
        (letter, chars.as_str())
    } else {
        let rest = chars.as_str();
        match rest.chars().next() {
            None => (first, rest),
            Some(c @ ('.' | ')' | ':')) => (first, &rest[c.len_utf8()..]),
            Some(_) => return None,
        }
    };

    let letter = letter.to_ascii_uppercase();
    if !('A'..='D').contains(&letter) {
        return None;
    }
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(letter)
    } else {
        None
    }
}

fn leading_number(text: &str) -> Option<String> {
    let token = text.split_whitespace().next()?;
    let token = token.trim_start_matches(|c: char| c == '(' || CURRENCY.contains(&c));

    let (negative, body) = match token.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let body = body.trim_start_matches(CURRENCY);

    let (numerator, consumed) = scan_decimal(body)?;
    let mut canonical = numerator.clone();
    if let Some(denominator) = body[consumed..].strip_prefix('/')
        && let Some((denominator, _)) = scan_decimal(denominator)
        && denominator != "0"
    {
        canonical = format!("{}/{}", canonical, denominator);
    }

    if negative && numerator != "0" {
        canonical.insert(0, '-');
    }
    Some(canonical)
}

/// Scan `1,234.50`-style decimals. Returns the canonical digits and the
/// number of bytes consumed.
fn scan_decimal(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    let next_is_digit = |i: usize| bytes.get(i + 1).is_some_and(u8::is_ascii_digit);

    let mut int_part = String::new();
    let mut frac_part = String::new();
    let mut seen_dot = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b @ b'0'..=b'9' if seen_dot => frac_part.push(b as char),
            b @ b'0'..=b'9' => int_part.push(b as char),
            b',' if !seen_dot && !int_part.is_empty() && next_is_digit(i) => {}
            b'.' if !seen_dot && next_is_digit(i) => seen_dot = true,
            _ => break,
        }
        i += 1;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    let frac_part = frac_part.trim_end_matches('0');
    let canonical = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    };
    Some((canonical, i))
}

fn free_form(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '.' | '+' | '#') {
                c
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('.').trim_end().to_string()
}
