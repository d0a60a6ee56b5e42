/// Split `text` into pieces of at most `max_chars` characters.
///
/// Splits prefer the last newline inside the window and fall back to a hard
/// cut on a character boundary.
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some((cut, _)) = rest.char_indices().nth(max_chars) else {
            chunks.push(rest);
            break;
        };
        let window = &rest[..cut];
        let split = match window.rfind('\n') {
            Some(nl) if nl > 0 => nl + 1,
            _ => cut,
        };
        chunks.push(&rest[..split]);
        rest = &rest[split..];
    }

    chunks
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("", 5, &[])]
    #[case("hello", 5, &["hello"])]
    #[case("hello world", 5, &["hello", " worl", "d"])]
    #[case("ab\ncdef", 5, &["ab\n", "cdef"])]
    #[case("\nabcdef", 3, &["\nab", "cde", "f"])]
    fn splits(#[case] text: &str, #[case] max: usize, #[case] expected: &[&str]) {
        assert_eq!(chunk_message(text, max), expected);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "ありがとう".repeat(500);
        let chunks = chunk_message(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks.concat(), text);
    }
}
