//! The outgoing request description produced by the builder

use url::Url;

use crate::constants::{CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, CONTENT_TYPE_MULTIPART};
use crate::models::{FileAttachment, HttpMethod};

/// Which encoding the request payload uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Json,
    UrlEncodedForm,
    Multipart,
}

/// One named part of a multipart payload
#[derive(Clone, Debug, PartialEq)]
pub enum MultipartPart {
    Text { name: String, value: String },
    File { name: String, attachment: FileAttachment },
    /// The merged JSON body, sent as an `application/json` blob
    Json { name: String, text: String },
}

impl MultipartPart {
    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. }
            | MultipartPart::File { name, .. }
            | MultipartPart::Json { name, .. } => name,
        }
    }
}

/// Encoded request payload
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    Json(String),
    UrlEncoded(String),
    Multipart(Vec<MultipartPart>),
}

impl Payload {
    pub fn kind(&self) -> BodyKind {
        match self {
            Payload::None => BodyKind::None,
            Payload::Json(_) => BodyKind::Json,
            Payload::UrlEncoded(_) => BodyKind::UrlEncodedForm,
            Payload::Multipart(_) => BodyKind::Multipart,
        }
    }

    /// Content type announced for this payload. Multipart boundaries are
    /// added by the transport.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Payload::None => None,
            Payload::Json(_) => Some(CONTENT_TYPE_JSON),
            Payload::UrlEncoded(_) => Some(CONTENT_TYPE_FORM),
            Payload::Multipart(_) => Some(CONTENT_TYPE_MULTIPART),
        }
    }

    /// Human readable rendition for the request preview
    pub fn display_text(&self) -> Option<String> {
        match self {
            Payload::None => None,
            Payload::Json(text) | Payload::UrlEncoded(text) => Some(text.clone()),
            Payload::Multipart(parts) => {
                let lines: Vec<String> = parts
                    .iter()
                    .map(|part| match part {
                        MultipartPart::Text { name, value } => format!("{}: {}", name, value),
                        MultipartPart::File { name, attachment } => format!(
                            "{}: <file {} ({} bytes, {})>",
                            name,
                            attachment.file_name,
                            attachment.bytes.len(),
                            attachment.content_type
                        ),
                        MultipartPart::Json { name, text } => {
                            format!("{} ({}):\n{}", name, CONTENT_TYPE_JSON, text)
                        }
                    })
                    .collect();
                Some(lines.join("\n"))
            }
        }
    }
}

/// A fully formed outgoing request.
///
/// While augmenters run, `url` holds the path-substituted template; once the
/// builder returns it is the final URL including the query string.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDraft {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub payload: Payload,
}

impl RequestDraft {
    pub fn body_kind(&self) -> BodyKind {
        self.payload.kind()
    }

    pub fn parsed_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    /// `host[:port]` of the target, port only when explicit
    pub fn host(&self) -> String {
        self.parsed_url().map(|url| host_of(&url)).unwrap_or_default()
    }

    /// First header with the given name, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) fn host_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(url: &str) -> RequestDraft {
        RequestDraft {
            method: HttpMethod::GET,
            url: url.to_string(),
            query: Vec::new(),
            headers: vec![("X-Trace".to_string(), "abc".to_string())],
            payload: Payload::None,
        }
    }

    #[test]
    fn test_host_with_explicit_port() {
        assert_eq!(draft("http://localhost:8080/a").host(), "localhost:8080");
        assert_eq!(draft("https://api.test:443/a").host(), "api.test");
        assert_eq!(draft("https://api.test/a").host(), "api.test");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        assert_eq!(draft("https://api.test").header("x-trace"), Some("abc"));
        assert_eq!(draft("https://api.test").header("accept"), None);
    }

    #[test]
    fn test_multipart_display_lists_parts() {
        let payload = Payload::Multipart(vec![
            MultipartPart::Text {
                name: "a".into(),
                value: "1".into(),
            },
            MultipartPart::File {
                name: "upload".into(),
                attachment: FileAttachment::new("notes.txt", b"hello".to_vec()),
            },
        ]);
        assert_eq!(payload.kind(), BodyKind::Multipart);
        assert_eq!(
            payload.display_text().unwrap(),
            "a: 1\nupload: <file notes.txt (5 bytes, text/plain)>"
        );
    }
}
