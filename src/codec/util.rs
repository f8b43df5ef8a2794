//! Shared small parsing utilities used by both codecs.

/// Splits `input` on `delim`, preserving empty tokens, except that an empty
/// `input` always yields an empty vector (never `[""]`).
pub fn split<'a>(input: &'a str, delim: &str) -> Vec<&'a str> {
    if input.is_empty() {
        return Vec::new();
    }
    input.split(delim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_vec() {
        assert_eq!(split("", " "), Vec::<&str>::new());
    }

    #[test]
    fn missing_delimiter_yields_whole_input() {
        assert_eq!(split("hello", " "), vec!["hello"]);
    }

    #[test]
    fn preserves_empty_tokens() {
        assert_eq!(split("a,,b", ","), vec!["a", "", "b"]);
    }

    #[test]
    fn splits_on_every_occurrence() {
        assert_eq!(split("a b c", " "), vec!["a", "b", "c"]);
    }
}
