use std::path::{Component, Path};

/// Turn a group name from the classification service into a single safe
/// folder name under the target root. Returns `None` when nothing usable
/// is left.
///
/// With `strict` off only path separators, NUL and `.`/`..` are refused;
/// with it on, characters that are invalid on common filesystems and
/// control characters are dropped as well.
pub fn folder_name(group: &str, strict: bool) -> Option<String> {
    let cleaned: String = group
        .chars()
        .filter(|&c| {
            if matches!(c, '/' | '\\' | '\0') {
                return false;
            }
            !strict || !(c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*'))
        })
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return None;
    }

    let mut components = Path::new(cleaned).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(cleaned.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(folder_name("Images", true).as_deref(), Some("Images"));
        assert_eq!(
            folder_name("  Tax Documents 2023 ", true).as_deref(),
            Some("Tax Documents 2023")
        );
    }

    #[test]
    fn test_traversal_is_flattened_or_rejected() {
        assert_eq!(folder_name("..", true), None);
        assert_eq!(folder_name("/..", true), None);
        assert_eq!(folder_name("../etc", true).as_deref(), Some("..etc"));
        assert_eq!(folder_name("/abs/path", false).as_deref(), Some("abspath"));
        assert_eq!(folder_name("a\\b", false).as_deref(), Some("ab"));
    }

    #[test]
    fn test_strict_drops_reserved_characters() {
        assert_eq!(folder_name("What? Now*", true).as_deref(), Some("What Now"));
        assert_eq!(folder_name("What? Now*", false).as_deref(), Some("What? Now*"));
        assert_eq!(folder_name("\"|\"", true), None);
    }

    #[test]
    fn test_empty_names_are_rejected() {
        assert_eq!(folder_name("", true), None);
        assert_eq!(folder_name("   ", false), None);
        assert_eq!(folder_name(".", true), None);
    }
}
