/// Replace `${VAR}` and `${VAR:-default}` placeholders in raw config text.
///
/// Unset variables without a default are left as-is so the parse error (or
/// validation error) points at the placeholder.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder untouched.
            out.push_str(&rest[start..]);
            return out;
        };

        let expr = &after[..end];
        let (name, default) = match expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (expr, None),
        };

        match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => match default {
                Some(default) => out.push_str(default),
                None => out.push_str(&rest[start..start + 2 + end + 1]),
            },
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn lookup(name: &str) -> Option<String> {
        match name {
            "LINE_TOKEN" => Some("abc".into()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[rstest]
    #[case("token = \"${LINE_TOKEN}\"", "token = \"abc\"")]
    #[case("${MISSING}", "${MISSING}")]
    #[case("${MISSING:-fallback}", "fallback")]
    #[case("${LINE_TOKEN:-fallback}", "abc")]
    #[case("${EMPTY:-fallback}", "fallback")]
    #[case("a ${LINE_TOKEN} b ${LINE_TOKEN}", "a abc b abc")]
    #[case("${}", "${}")]
    #[case("open ${LINE_TOKEN", "open ${LINE_TOKEN")]
    #[case("plain text", "plain text")]
    fn substitutes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(substitute_env_with(input, lookup), expected);
    }
}
