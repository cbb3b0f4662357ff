use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a field's value is placed in the outgoing request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Path,
    Query,
    Header,
    Form,
    File,
    /// JSON fragment; objects merge into the body, other values sit under the field name
    Body,
    /// JSON object whose keys are merged into the body object
    Model,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Path => "path",
            FieldKind::Query => "query",
            FieldKind::Header => "header",
            FieldKind::Form => "form",
            FieldKind::File => "file",
            FieldKind::Body => "body",
            FieldKind::Model => "model",
        }
    }
}

/// A binary attachment captured from a `file` field
#[derive(Clone, Debug, PartialEq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_mime(&file_name);
        FileAttachment {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an attachment from disk, keeping only the file name
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(FileAttachment::new(file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> mime::Mime {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => mime::APPLICATION_JSON,
        "txt" | "log" => mime::TEXT_PLAIN,
        "csv" => mime::TEXT_CSV,
        "xml" => mime::TEXT_XML,
        "html" | "htm" => mime::TEXT_HTML,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        "pdf" => mime::APPLICATION_PDF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Current value of a field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(FileAttachment),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::File(_) => false,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A declared parameter field of an operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial value shown in the form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDeclaration {
            name: name.into(),
            kind,
            required: false,
            description: None,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A field declaration together with its value, as read from the form
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub declaration: FieldDeclaration,
    pub value: FieldValue,
}

impl Field {
    pub fn new(declaration: FieldDeclaration, value: impl Into<FieldValue>) -> Self {
        Field {
            declaration,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn kind(&self) -> FieldKind {
        self.declaration.kind
    }
}

/// An explorable API operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub method: HttpMethod,
    /// URL template, possibly with `{name}` path placeholders
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}
