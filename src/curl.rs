use crate::models::HttpMethod;
use crate::request::{MultipartPart, Payload, RequestDraft};

/// Single-quote a value for a POSIX shell
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Render a built request as an equivalent cURL command
pub fn to_curl(draft: &RequestDraft) -> String {
    let mut parts = vec!["curl".to_string()];

    // Method
    if draft.method != HttpMethod::GET {
        parts.push(format!("-X {}", draft.method.as_str()));
    }

    // URL
    parts.push(quote(&draft.url));

    // Headers
    for (name, value) in &draft.headers {
        parts.push(format!("-H {}", quote(&format!("{}: {}", name, value))));
    }

    // Body
    match &draft.payload {
        Payload::None => {}
        Payload::Json(text) | Payload::UrlEncoded(text) => {
            if let Some(content_type) = draft.payload.content_type() {
                parts.push(format!("-H {}", quote(&format!("Content-Type: {}", content_type))));
            }
            parts.push(format!("-d {}", quote(text)));
        }
        Payload::Multipart(multipart) => {
            for part in multipart {
                let form = match part {
                    MultipartPart::Text { name, value } => format!("{}={}", name, value),
                    MultipartPart::File { name, attachment } => format!(
                        "{}=@{};type={}",
                        name, attachment.file_name, attachment.content_type
                    ),
                    MultipartPart::Json { name, text } => {
                        format!("{}={};type=application/json", name, text)
                    }
                };
                parts.push(format!("-F {}", quote(&form)));
            }
        }
    }

    parts.join(" \\\n  ")
}
