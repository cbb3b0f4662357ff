//! HTTP client wrapper - sends drafts and captures raw responses

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::warn;

use crate::constants::{CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, UNKNOWN_STATUS_TEXT};
use crate::models::HttpMethod;
use crate::render::ResponseSnapshot;
use crate::request::{MultipartPart, Payload, RequestDraft};

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::GET => Method::GET,
        HttpMethod::POST => Method::POST,
        HttpMethod::PUT => Method::PUT,
        HttpMethod::PATCH => Method::PATCH,
        HttpMethod::DELETE => Method::DELETE,
        HttpMethod::HEAD => Method::HEAD,
        HttpMethod::OPTIONS => Method::OPTIONS,
    }
}

fn multipart_form(parts: &[MultipartPart]) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartPart::File { name, attachment } => {
                let file = Part::bytes(attachment.bytes.clone())
                    .file_name(attachment.file_name.clone())
                    .mime_str(attachment.content_type.as_ref())?;
                form.part(name.clone(), file)
            }
            MultipartPart::Json { name, text } => {
                let blob = Part::text(text.clone())
                    .file_name(format!("{}.json", name))
                    .mime_str(CONTENT_TYPE_JSON)?;
                form.part(name.clone(), blob)
            }
        };
    }
    Ok(form)
}

/// Translate a draft into a reqwest request, headers in draft order
pub fn build_request(
    client: &reqwest::Client,
    draft: &RequestDraft,
) -> Result<reqwest::RequestBuilder, reqwest::Error> {
    let mut req_builder = client.request(method_of(draft.method), &draft.url);

    for (name, value) in &draft.headers {
        req_builder = req_builder.header(name.as_str(), value.as_str());
    }

    req_builder = match &draft.payload {
        Payload::None => req_builder,
        Payload::Json(text) => req_builder
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(text.clone()),
        Payload::UrlEncoded(text) => req_builder
            .header(CONTENT_TYPE, CONTENT_TYPE_FORM)
            .body(text.clone()),
        Payload::Multipart(parts) => req_builder.multipart(multipart_form(parts)?),
    };

    Ok(req_builder)
}

/// Send a draft. Never fails: anything that keeps the request from
/// completing is reported as a status 0 snapshot.
pub async fn execute_draft(client: &reqwest::Client, draft: &RequestDraft) -> ResponseSnapshot {
    let host = draft.host();

    let req_builder = match build_request(client, draft) {
        Ok(req_builder) => req_builder,
        Err(e) => {
            warn!(error = %e, url = %draft.url, "could not build request");
            return ResponseSnapshot::transport_failure(host);
        }
    };

    let resp = match req_builder.send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(
                error = %e,
                timeout = e.is_timeout(),
                connect = e.is_connect(),
                "request failed"
            );
            return ResponseSnapshot::transport_failure(host);
        }
    };

    let status = resp.status();
    let headers: Vec<(String, String)> = resp
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).to_string(),
            )
        })
        .collect();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    match resp.text().await {
        Ok(body) => ResponseSnapshot {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or(UNKNOWN_STATUS_TEXT)
                .to_string(),
            headers,
            content_type,
            body,
            host,
        },
        Err(e) => {
            warn!(error = %e, "error reading body");
            ResponseSnapshot::transport_failure(host)
        }
    }
}

/// Create an HTTP client with the given request timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
