use std::sync::LazyLock;

use regex::{NoExpand, Regex};

static HEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head>").expect("a valid regex"));

/// Point relative links of an HTML document at the host that served it.
///
/// Inserts `<base href="//host">` right after the first `<head>`; documents
/// without one are returned unchanged.
pub fn inject_base(document: &str, host: &str) -> String {
    let replacement = format!("<head><base href=\"//{}\">", host);
    HEAD.replacen(document, 1, NoExpand(replacement.as_str())).into_owned()
}
