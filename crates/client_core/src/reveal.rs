//! Character-reveal sequencing for already-received answers.

/// Iterator over every char-boundary prefix of `text`, shortest first.
///
/// Yields one prefix per character, so a caller pacing the items with a
/// fixed delay reproduces a typewriter disclosure of the full string. The
/// empty prefix is not included.
pub fn prefixes(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices().map(move |(idx, ch)| &text[..idx + ch.len_utf8()])
}

#[cfg(test)]
mod tests {
    use super::prefixes;

    #[test]
    fn yields_every_prefix_in_order() {
        let steps: Vec<&str> = prefixes("abc").collect();
        assert_eq!(steps, vec!["a", "ab", "abc"]);
    }

    #[test]
    fn respects_utf8_char_boundaries() {
        let answer = "Bébé ☕";
        let steps: Vec<&str> = prefixes(answer).collect();
        assert_eq!(steps.len(), answer.chars().count());
        assert!(steps.iter().all(|step| answer.starts_with(step)));
        assert_eq!(steps.last().copied(), Some(answer));
    }

    #[test]
    fn each_step_strictly_extends_the_previous() {
        let steps: Vec<&str> = prefixes("well-child visit").collect();
        for window in steps.windows(2) {
            assert!(window[1].starts_with(window[0]));
            assert!(window[1].len() > window[0].len());
        }
    }

    #[test]
    fn empty_answer_reveals_nothing() {
        assert_eq!(prefixes("").count(), 0);
    }
}
