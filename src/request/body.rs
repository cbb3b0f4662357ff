//! Payload resolution: which encoding wins given the collected fields

use serde_json::{Map, Value};

use super::draft::{MultipartPart, Payload};
use crate::models::FileAttachment;

/// The JSON body accumulated from `body` and `model` fields
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonBody {
    /// Name of the first field that contributed, used as the multipart part name
    part_name: Option<String>,
    object: Map<String, Value>,
}

impl JsonBody {
    /// Store a non-object fragment under the field's name
    pub fn insert(&mut self, field: &str, value: Value) {
        self.touch(field);
        self.object.insert(field.to_string(), value);
    }

    /// Shallow-merge an object's keys, last write wins
    pub fn merge(&mut self, field: &str, object: Map<String, Value>) {
        self.touch(field);
        for (key, value) in object {
            self.object.insert(key, value);
        }
    }

    fn touch(&mut self, field: &str) {
        if self.part_name.is_none() {
            self.part_name = Some(field.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    pub fn object(&self) -> &Map<String, Value> {
        &self.object
    }

    /// Two-space indented JSON text
    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(&self.object).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Pick the payload encoding.
///
/// JSON with form values or files goes multipart with the JSON as one blob
/// part; form values alone are url-encoded; any file forces multipart; JSON
/// alone is sent as `application/json`. An empty JSON object counts as absent.
pub fn resolve_payload(
    json: JsonBody,
    form: Vec<(String, String)>,
    files: Vec<(String, FileAttachment)>,
) -> Payload {
    let has_json = !json.is_empty();

    if !has_json && form.is_empty() && files.is_empty() {
        return Payload::None;
    }

    if has_json && form.is_empty() && files.is_empty() {
        return Payload::Json(json.to_text());
    }

    if !has_json && files.is_empty() {
        return Payload::UrlEncoded(encode_form(&form));
    }

    let mut parts = Vec::with_capacity(form.len() + files.len() + 1);
    for (name, value) in form {
        parts.push(MultipartPart::Text { name, value });
    }
    for (name, attachment) in files {
        parts.push(MultipartPart::File { name, attachment });
    }
    if has_json {
        let text = json.to_text();
        let name = json.part_name.unwrap_or_else(|| String::from("body"));
        parts.push(MultipartPart::Json { name, text });
    }
    Payload::Multipart(parts)
}

/// `application/x-www-form-urlencoded` serialization, order preserved
pub fn encode_form(pairs: &[(String, String)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}
