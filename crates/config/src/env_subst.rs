/// Replace `${ENV_VAR}` placeholders in config text with process env values.
///
/// `${VAR:-fallback}` uses `fallback` when `VAR` is unset or empty.
/// Unresolvable variables without a fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Placeholder substitution against an arbitrary lookup.
pub fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated: emit the remainder literally.
            result.push_str(&rest[start..]);
            return result;
        };

        let body = &after[..end];
        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body, None),
        };

        match lookup(name).filter(|v| !v.is_empty() || fallback.is_none()) {
            Some(value) if !name.is_empty() => result.push_str(&value),
            _ => match fallback {
                Some(fallback) if !name.is_empty() => result.push_str(fallback),
                _ => {
                    result.push_str("${");
                    result.push_str(body);
                    result.push('}');
                },
            },
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "PD_ROUTING_KEY" => Some("r-key-1".into()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_with("routing_key = \"${PD_ROUTING_KEY}\"", lookup),
            "routing_key = \"r-key-1\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_with("${PDNOTIFY_NONEXISTENT_XYZ}", lookup),
            "${PDNOTIFY_NONEXISTENT_XYZ}"
        );
    }

    #[test]
    fn uses_fallback_for_unset_or_empty() {
        assert_eq!(substitute_with("${MISSING:-Graylog}", lookup), "Graylog");
        assert_eq!(substitute_with("${EMPTY:-x}", lookup), "x");
        assert_eq!(substitute_with("${EMPTY}", lookup), "");
        assert_eq!(substitute_with("${PD_ROUTING_KEY:-x}", lookup), "r-key-1");
    }

    #[test]
    fn malformed_placeholders_stay_literal() {
        assert_eq!(substitute_with("a ${unterminated", lookup), "a ${unterminated");
        assert_eq!(substitute_with("${}", lookup), "${}");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_with("plain $text", lookup), "plain $text");
    }
}
