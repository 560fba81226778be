//! Text and number coercion helpers shared by the importer and exporters.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::types::HeaderKey;

/// Lowercase a header and drop every non-alphanumeric character.
///
/// `"Contribution_Score"`, `"contribution score"` and `"CONTRIBUTION-SCORE"`
/// all map to `"contributionscore"`.
pub fn normalize_header_key<T: AsRef<str>>(header: T) -> HeaderKey {
    header
        .as_ref()
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Same as [`normalize_header_key`] but keeps letter case.
pub fn normalize_header_key_case_sensitive<T: AsRef<str>>(header: T) -> HeaderKey {
    header
        .as_ref()
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect()
}

/// Parse the leading integer of `raw`, ignoring surrounding whitespace.
///
/// Trailing garbage after the digits is ignored (`"8/10"` -> 8, `"1.9"` -> 1).
/// Returns `None` when no digit is found.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let mut end = 0usize;
    for (idx, ch) in trimmed.char_indices() {
        let is_sign = idx == 0 && (ch == '-' || ch == '+');
        if is_sign || ch.is_ascii_digit() {
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    let prefix = &trimmed[..end];
    if !prefix.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<i64>().ok()
}

/// Parse the leading decimal number of `raw`, ignoring surrounding whitespace.
///
/// Accepts an optional sign, fraction, and exponent. Returns `None` when no
/// digit is found or the value is not finite.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0usize;
    let mut digits = 0usize;

    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Case-insensitive ordering that compares embedded digit runs numerically.
///
/// `"file2"` sorts before `"file10"`, and `"Doc_A"` equals `"doc_a"`.
/// Punctuation and whitespace sort before digits, digits before letters.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut left_chars = left.chars().peekable();
    let mut right_chars = right.chars().peekable();

    loop {
        match (left_chars.peek().copied(), right_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digit_run(&mut left_chars);
                let r_run = take_digit_run(&mut right_chars);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                left_chars.next();
                right_chars.next();
                let ordering = char_class(l)
                    .cmp(&char_class(r))
                    .then_with(|| l.to_lowercase().cmp(r.to_lowercase()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Collation class: punctuation and whitespace, then digits, then everything else.
fn char_class(ch: char) -> u8 {
    if ch.is_whitespace() || ch.is_ascii_punctuation() {
        0
    } else if ch.is_ascii_digit() {
        1
    } else {
        2
    }
}

fn take_digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(ch) = chars.peek().copied() {
        if !ch.is_ascii_digit() {
            break;
        }
        run.push(ch);
        chars.next();
    }
    run
}

fn compare_digit_runs(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}
