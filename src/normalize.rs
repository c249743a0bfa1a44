//! Query and title canonicalization.
//!
//! Both the dataset titles and the user's queries go through [`normalize`]
//! so that they can be compared as plain strings. Anything outside
//! `a-z`, `0-9` and the ASCII space is dropped rather than replaced, which
//! means `"don't"` becomes `"dont"` and `"sci-fi"` becomes `"scifi"`.

/// Lowercases `raw` and keeps only `a-z`, `0-9` and spaces.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().chars().filter(|c| is_kept(*c)).collect()
}

/// Splits a normalized string into tokens on single spaces.
///
/// Empty tokens are preserved, so an empty string yields one empty token and
/// joining the tokens back with `' '` reproduces the input.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ')
}

fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("The Matrix: Reloaded!"), "the matrix reloaded");
        assert_eq!(normalize("Don't Look Up"), "dont look up");
        assert_eq!(normalize("Sci-Fi 2049"), "scifi 2049");
    }

    #[test]
    fn drops_accents_and_symbols() {
        assert_eq!(normalize("Amélie"), "amlie");
        assert_eq!(normalize("€$%&*"), "");
        assert_eq!(normalize("\tTab\nNewline"), "tabnewline");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["", "  double  space ", "WALL·E", "İstanbul", "Se7en", "...", "ÅÄÖ abc"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn empty_string_has_one_empty_token() {
        let t: Vec<&str> = tokens("").collect();
        assert_eq!(t, vec![""]);
    }

    #[test]
    fn tokens_keep_empty_segments() {
        let t: Vec<&str> = tokens("a  b ").collect();
        assert_eq!(t, vec!["a", "", "b", ""]);
    }
}
