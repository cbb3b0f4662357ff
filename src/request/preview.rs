//! HTTP/1.1-style rendition of a draft, shown before it is sent

use super::draft::{host_of, RequestDraft};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestPreview {
    /// Request line, Host, Content-Type and headers
    pub head: String,
    /// Payload text, if the request has one
    pub body: Option<String>,
    /// `host[:port]`, also used as the `<base>` for HTML responses
    pub host: String,
}

impl RequestPreview {
    pub fn of(draft: &RequestDraft) -> Result<Self, url::ParseError> {
        let url = draft.parsed_url()?;
        let host = host_of(&url);

        let mut path = url.path().to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        let search = url.query().map(|q| format!("?{}", q)).unwrap_or_default();

        let mut head = format!(
            "{} {}{} HTTP/1.1\nHost: {}",
            draft.method.as_str(),
            path,
            search,
            host
        );
        if let Some(content_type) = draft.payload.content_type() {
            head.push_str("\nContent-Type: ");
            head.push_str(content_type);
        }
        for (name, value) in &draft.headers {
            head.push('\n');
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
        }

        Ok(RequestPreview {
            head,
            body: draft.payload.display_text(),
            host,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use crate::request::Payload;

    #[test]
    fn test_preview_head() {
        let draft = RequestDraft {
            method: HttpMethod::POST,
            url: "http://localhost:8080/pets?limit=5&sig=abc".to_string(),
            query: vec![
                ("limit".into(), "5".into()),
                ("sig".into(), "abc".into()),
            ],
            headers: vec![
                ("X-Trace".into(), "t1".into()),
                ("Authorization".into(), "Bearer tok".into()),
            ],
            payload: Payload::UrlEncoded("a=1".into()),
        };

        let preview = RequestPreview::of(&draft).unwrap();
        assert_eq!(
            preview.head,
            "POST /pets?limit=5&sig=abc HTTP/1.1\n\
             Host: localhost:8080\n\
             Content-Type: application/x-www-form-urlencoded\n\
             X-Trace: t1\n\
             Authorization: Bearer tok"
        );
        assert_eq!(preview.body.as_deref(), Some("a=1"));
        assert_eq!(preview.host, "localhost:8080");
    }

    #[test]
    fn test_preview_root_path() {
        let draft = RequestDraft {
            method: HttpMethod::GET,
            url: "https://api.test".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            payload: Payload::None,
        };
        let preview = RequestPreview::of(&draft).unwrap();
        assert_eq!(preview.head, "GET / HTTP/1.1\nHost: api.test");
        assert!(preview.body.is_none());
    }
}
