//! Subject code recognition: 2–4 uppercase letters, 2–4 digits and an
//! optional lowercase `c` marking the remote offering of the subject.

/// Returns the leftmost subject code in `text`.
pub fn find_subject_code(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    (0..bytes.len()).find_map(|start| match_code_at(bytes, start).map(|end| &text[start..end]))
}

/// Returns the subject code that `text` starts with, if any.
pub fn subject_code_prefix(text: &str) -> Option<&str> {
    match_code_at(text.as_bytes(), 0).map(|end| &text[..end])
}

/// Whether `code` is, in its entirety, the remote variant of a subject code
/// (for example `ENW492c`).
pub fn is_remote_code(code: &str) -> bool {
    let code = code.trim();
    let bytes = code.as_bytes();
    match_code_at(bytes, 0) == Some(bytes.len()) && code.ends_with('c')
}

/// Matches a code starting at `start`, returning the exclusive end offset.
/// Letter runs are tried longest first, as a backtracking regex would.
fn match_code_at(bytes: &[u8], start: usize) -> Option<usize> {
    let letters = count_while(bytes, start, 4, |b| b.is_ascii_uppercase());
    (2..=letters).rev().find_map(|len| {
        let digit_start = start + len;
        let digits = count_while(bytes, digit_start, 4, |b| b.is_ascii_digit());
        if digits < 2 {
            return None;
        }
        let mut end = digit_start + digits;
        if bytes.get(end) == Some(&b'c') {
            end += 1;
        }
        Some(end)
    })
}

fn count_while(bytes: &[u8], from: usize, max: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes
        .iter()
        .skip(from)
        .take(max)
        .take_while(|b| pred(**b))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_leftmost_code() {
        assert_eq!(find_subject_code("PRN231 at BE-305"), Some("PRN231"));
        assert_eq!(find_subject_code("View: SWP391- at DE-C201"), Some("SWP391"));
        assert_eq!(find_subject_code("ENW492c at Online"), Some("ENW492c"));
        assert_eq!(find_subject_code("Slot 1"), None);
    }

    #[test]
    fn backtracks_over_long_letter_runs() {
        // Five capitals: the match starts one letter in.
        assert_eq!(find_subject_code("ABCDE123"), Some("BCDE123"));
        // Digits are capped at four.
        assert_eq!(find_subject_code("MAE10199"), Some("MAE1019"));
    }

    #[test]
    fn prefix_must_start_the_text() {
        assert_eq!(subject_code_prefix("PRN231-"), Some("PRN231"));
        assert_eq!(subject_code_prefix(" PRN231"), None);
        assert_eq!(subject_code_prefix("View PRN231"), None);
    }

    #[test]
    fn remote_codes_need_trailing_lowercase_c() {
        assert!(is_remote_code("PMG201c"));
        assert!(is_remote_code(" ENW492c "));
        assert!(!is_remote_code("PMG201"));
        assert!(!is_remote_code("PMG201C"));
        assert!(!is_remote_code("xPMG201c"));
    }
}
