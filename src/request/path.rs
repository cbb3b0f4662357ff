use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value for use as (part of) a single path segment
pub fn encode_path_value(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Replace the first `{name}` placeholder in `template` with the encoded value.
///
/// Returns `None` when the template has no such placeholder.
pub fn substitute(template: &str, name: &str, value: &str) -> Option<String> {
    let pattern = ["{", name, "}"].concat();
    if !template.contains(&pattern) {
        return None;
    }
    Some(template.replacen(&pattern, &encode_path_value(value), 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_replaces_once() {
        let url = substitute("https://api.test/pets/{id}/{id}", "id", "42").unwrap();
        assert_eq!(url, "https://api.test/pets/42/{id}");
    }

    #[test]
    fn test_substitute_keeps_literal_safe_values() {
        let url = substitute("https://api.test/users/{user}", "user", "jane.doe-1_x~").unwrap();
        assert_eq!(url, "https://api.test/users/jane.doe-1_x~");
    }

    #[test]
    fn test_substitute_encodes_reserved_characters() {
        let url = substitute("https://api.test/files/{path}", "path", "a/b c?d#e").unwrap();
        assert_eq!(url, "https://api.test/files/a%2Fb%20c%3Fd%23e");
    }

    #[test]
    fn test_substitute_missing_placeholder() {
        assert_eq!(substitute("https://api.test/pets", "id", "1"), None);
    }

    #[test]
    fn test_encode_unicode() {
        assert_eq!(encode_path_value("café"), "caf%C3%A9");
    }
}
