//! Identifier casing for generated routes.

/// Lower the first character of an entity name to derive its route name.
/// e.g. "Post" -> "post", "UserProfile" -> "userProfile"
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_only_first_char() {
        assert_eq!(lower_first("Post"), "post");
        assert_eq!(lower_first("UserProfile"), "userProfile");
        assert_eq!(lower_first("already"), "already");
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(lower_first(""), "");
    }
}
