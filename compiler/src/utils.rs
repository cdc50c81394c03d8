/// Quotes `text` the way it would appear in a JSON document, for messages.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Joins names as `a, b and c` for diagnostics.
pub fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names.into_iter().map(|n| quote(n.as_ref())).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(Vec::<&str>::new()), "");
        assert_eq!(join_names(["hash"]), "\"hash\"");
        assert_eq!(join_names(["hash", "increment", "primary"]), "\"hash\", \"increment\" and \"primary\"");
    }
}
