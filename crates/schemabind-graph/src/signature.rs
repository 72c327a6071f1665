//! Function signature parsing
//!
//! The catalog reports a function's arguments as a single
//! `name type, name type, ...` string and its return type as a type
//! name with an optional trailing `[]` array marker.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("argument '{token}' does not split into name and type")]
    MalformedArgument { token: String },
}

/// Split an argument-list string into ordered (name, type) pairs.
///
/// An empty string is a zero-argument function. Any token that does
/// not consist of exactly a name and a type makes the whole signature
/// malformed; callers isolate the failure to that one function.
pub fn parse_arguments(args: &str) -> Result<Vec<(String, String)>, SignatureError> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(", ")
        .map(|token| {
            let mut parts = token.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(ty), None) => Ok((name.to_string(), ty.to_string())),
                _ => Err(SignatureError::MalformedArgument {
                    token: token.to_string(),
                }),
            }
        })
        .collect()
}

/// Detect a trailing `[]` array marker on a type string.
pub fn split_array_suffix(type_name: &str) -> (bool, &str) {
    match type_name.strip_suffix("[]") {
        Some(base) => (true, base),
        None => (false, type_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordered_pairs() {
        let args = parse_arguments("user_id uuid, roles role_type[]").unwrap();
        assert_eq!(
            args,
            vec![
                ("user_id".to_string(), "uuid".to_string()),
                ("roles".to_string(), "role_type[]".to_string()),
            ]
        );
    }

    #[test]
    fn empty_string_is_zero_arguments() {
        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments("   ").unwrap().is_empty());
    }

    #[test]
    fn rejects_tokens_without_name_and_type() {
        assert!(parse_arguments("uuid").is_err());
        assert!(parse_arguments("x character varying").is_err());
        assert!(parse_arguments("a int4, uuid").is_err());
    }

    #[test]
    fn array_suffix_detection() {
        assert_eq!(split_array_suffix("role_type[]"), (true, "role_type"));
        assert_eq!(split_array_suffix("uuid"), (false, "uuid"));
    }
}
