//! Response rendering - turns a received response into something to display
//!
//! The renderer sniffs the content type, pretty-prints JSON, highlights
//! XML/HTML/text and substitutes a fixed advisory for transport failures.

pub mod highlight;
pub mod html;

use serde_json::Value;
use tracing::debug;

use crate::constants::TRANSPORT_FAILURE_ADVISORY;
pub use highlight::{highlight, highlight_auto, Highlighted, Language, StyledLine, StyledSpan};

/// What came back from the server, or status 0 if nothing did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: String,
    /// `host[:port]` the request was sent to
    pub host: String,
}

impl ResponseSnapshot {
    /// The request never reached the server
    pub fn transport_failure(host: impl Into<String>) -> Self {
        ResponseSnapshot {
            status: 0,
            status_text: String::from("error"),
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }

    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.status_text)
    }

    /// Headers as `Name: value` lines, in received order
    pub fn raw_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderedBody {
    Highlighted(Highlighted),
    /// HTML document with its `<base>` set, shown inert as highlighted source
    Html(Highlighted),
    /// Transport failure notice
    Advisory(String),
    /// The response arrived but could not be interpreted
    Failure(String),
}

impl RenderedBody {
    pub fn text(&self) -> &str {
        match self {
            RenderedBody::Highlighted(h) | RenderedBody::Html(h) => &h.text,
            RenderedBody::Advisory(text) | RenderedBody::Failure(text) => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub status_line: String,
    pub headers: Highlighted,
    pub body: RenderedBody,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn render(&self, response: &ResponseSnapshot) -> RenderResult {
        RenderResult {
            status_line: response.status_line(),
            headers: highlight(Language::Http, &response.raw_headers()),
            body: self.render_body(response),
        }
    }

    fn render_body(&self, response: &ResponseSnapshot) -> RenderedBody {
        if response.is_transport_failure() {
            return RenderedBody::Advisory(TRANSPORT_FAILURE_ADVISORY.to_string());
        }

        let content_type = response
            .content_type
            .as_deref()
            .unwrap_or("text")
            .to_ascii_lowercase();

        if content_type.contains("json") {
            match pretty_json(&response.body) {
                Ok(text) => RenderedBody::Highlighted(highlight(Language::Json, &text)),
                Err(e) => {
                    debug!(error = %e, "response claimed JSON but did not parse");
                    RenderedBody::Failure(format!("Unexpected error: {}", e))
                }
            }
        } else if content_type.contains("xml") {
            RenderedBody::Highlighted(highlight(Language::Xml, &response.body))
        } else if content_type.contains("html") {
            let document = html::inject_base(&response.body, &response.host);
            RenderedBody::Html(highlight(Language::Html, &document))
        } else {
            RenderedBody::Highlighted(highlight_auto(&response.body))
        }
    }
}

/// Two-space indented, key order preserved
fn pretty_json(text: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    serde_json::to_string_pretty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: Option<&str>, body: &str) -> ResponseSnapshot {
        ResponseSnapshot {
            status: 200,
            status_text: "OK".to_string(),
            headers: content_type
                .map(|ct| vec![("Content-Type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            content_type: content_type.map(String::from),
            body: body.to_string(),
            host: "api.test".to_string(),
        }
    }

    #[test]
    fn test_json_is_pretty_printed_in_order() {
        let result = ResponseRenderer.render(&response(
            Some("application/json; charset=utf-8"),
            r#"{"b":1,"a":{"c":[1,2]}}"#,
        ));
        assert_eq!(result.status_line, "200 OK");
        match &result.body {
            RenderedBody::Highlighted(h) => {
                assert_eq!(h.language, Some(Language::Json));
                assert_eq!(
                    h.text,
                    "{\n  \"b\": 1,\n  \"a\": {\n    \"c\": [\n      1,\n      2\n    ]\n  }\n}"
                );
            }
            other => panic!("expected highlighted JSON, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_json() {
        let result = ResponseRenderer.render(&response(Some("application/json"), r#"{"a":1}"#));
        assert_eq!(result.body.text(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        let result = ResponseRenderer.render(&response(Some("Application/JSON"), "[]"));
        assert_eq!(result.body.text(), "[]");
    }

    #[test]
    fn test_malformed_json_is_a_render_failure() {
        let result = ResponseRenderer.render(&response(Some("application/json"), "{oops"));
        match result.body {
            RenderedBody::Failure(message) => assert!(message.starts_with("Unexpected error: ")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_xml_is_verbatim() {
        let body = "<pet><name>rex</name></pet>";
        let result = ResponseRenderer.render(&response(Some("application/xml"), body));
        match result.body {
            RenderedBody::Highlighted(h) => {
                assert_eq!(h.language, Some(Language::Xml));
                assert_eq!(h.text, body);
            }
            other => panic!("expected XML, got {:?}", other),
        }
    }

    #[test]
    fn test_html_gets_base() {
        let result = ResponseRenderer.render(&response(
            Some("text/html"),
            "<html><head><title>t</title></head></html>",
        ));
        match result.body {
            RenderedBody::Html(h) => assert_eq!(
                h.text,
                "<html><head><base href=\"//api.test\"><title>t</title></head></html>"
            ),
            other => panic!("expected HTML, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_content_type_is_text() {
        let result = ResponseRenderer.render(&response(None, "hello"));
        match result.body {
            RenderedBody::Highlighted(h) => assert_eq!(h.text, "hello"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_failure_ignores_body() {
        let mut snapshot = ResponseSnapshot::transport_failure("api.test");
        snapshot.body = "{\"a\":1}".to_string();
        snapshot.content_type = Some("application/json".to_string());

        let result = ResponseRenderer.render(&snapshot);
        assert_eq!(result.status_line, "0 error");
        assert_eq!(result.body, RenderedBody::Advisory(TRANSPORT_FAILURE_ADVISORY.to_string()));
    }

    #[test]
    fn test_headers_block() {
        let mut snapshot = response(Some("text/plain"), "x");
        snapshot.headers.push(("X-Rate-Limit".to_string(), "10".to_string()));
        let result = ResponseRenderer.render(&snapshot);
        assert_eq!(result.headers.text, "Content-Type: text/plain\nX-Rate-Limit: 10");
    }
}
