/// Judge status description that counts as a pass.
pub(crate) const ACCEPTED: &str = "Accepted";

/// Canonical comparable form of captured output: CRLF becomes LF, then
/// surrounding whitespace is trimmed.
pub(crate) fn normalize(text: &str) -> String {
    let mut unified = text.replace("\r\n", "\n");
    // "\r\r\n" leaves a fresh CRLF behind after one pass.
    while unified.contains("\r\n") {
        unified = unified.replace("\r\n", "\n");
    }
    unified.trim().to_string()
}

/// A test case passes only when the normalized outputs are equal and the
/// judge itself reported `Accepted`.
pub(crate) fn outputs_match(stdout: &str, expected: &str, status_description: &str) -> bool {
    status_description == ACCEPTED && normalize(stdout) == normalize(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_and_lf_normalize_identically() {
        assert_eq!(normalize("1\r\n2\r\n"), normalize("1\n2\n"));
        assert_eq!(normalize("  hello world \n\n"), "hello world");
    }

    #[test]
    fn normalize_is_idempotent() {
        for sample in ["", "  a\r\nb  ", "\r\n\r\nx\r\n", "tab\t\r\n", "a\r\r\nb"] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn interior_whitespace_is_significant() {
        assert_ne!(normalize("1 2"), normalize("1  2"));
        assert_ne!(normalize("a\n\nb"), normalize("a\nb"));
    }

    #[test]
    fn matching_text_needs_accepted_status() {
        assert!(outputs_match("42\r\n", "42", "Accepted"));
        assert!(!outputs_match("42", "42", "Runtime Error (NZEC)"));
        assert!(!outputs_match("42", "42", "accepted"));
        assert!(!outputs_match("41", "42", "Accepted"));
    }
}
