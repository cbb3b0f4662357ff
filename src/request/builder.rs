//! Turns the form's field declarations into a [`RequestDraft`]

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::body::{resolve_payload, JsonBody};
use super::draft::RequestDraft;
use super::error::{ExploreError, FieldError};
use super::path;
use crate::auth::Augment;
use crate::models::{Field, FieldKind, FieldValue, FileAttachment, HttpMethod, Operation};

/// Builds drafts for one operation
#[derive(Debug)]
pub struct RequestBuilder {
    method: HttpMethod,
    url_template: String,
    augmenters: Vec<Box<dyn Augment>>,
}

impl RequestBuilder {
    pub fn new(method: HttpMethod, url_template: impl Into<String>) -> Self {
        RequestBuilder {
            method,
            url_template: url_template.into(),
            augmenters: Vec::new(),
        }
    }

    pub fn for_operation(operation: &Operation) -> Self {
        Self::new(operation.method, operation.url.clone())
    }

    /// Register an augmenter; they run in registration order
    pub fn augment_with(mut self, augmenter: impl Augment + 'static) -> Self {
        self.augmenters.push(Box::new(augmenter));
        self
    }

    pub fn with_augmenter(mut self, augmenter: Box<dyn Augment>) -> Self {
        self.augmenters.push(augmenter);
        self
    }

    /// Scan the fields in order and assemble the request.
    ///
    /// Every invalid field is reported; nothing is produced unless all are valid.
    pub fn build(&self, fields: &[Field]) -> Result<RequestDraft, ExploreError> {
        let mut errors = Vec::new();
        let mut url = self.url_template.clone();
        let mut query = Vec::new();
        let mut headers = Vec::new();
        let mut form = Vec::new();
        let mut files = Vec::new();
        let mut json = JsonBody::default();

        for field in fields {
            let name = field.name();

            if field.value.is_empty() {
                if field.declaration.required {
                    errors.push(FieldError::Missing {
                        field: name.to_string(),
                    });
                } else if field.kind() == FieldKind::Path {
                    // An unfilled placeholder would be sent as `%7Bname%7D`
                    if let Some(substituted) = path::substitute(&url, name, "") {
                        url = substituted;
                    }
                }
                continue;
            }

            match field.kind() {
                FieldKind::File => files.push((name.to_string(), attachment_of(name, &field.value))),
                FieldKind::Path => match path::substitute(&url, name, &text_of(&field.value)) {
                    Some(substituted) => url = substituted,
                    None => warn!(field = name, "no placeholder for path field"),
                },
                FieldKind::Query => query.push((name.to_string(), text_of(&field.value))),
                FieldKind::Header => headers.push((name.to_string(), text_of(&field.value))),
                FieldKind::Form => form.push((name.to_string(), text_of(&field.value))),
                FieldKind::Body => match serde_json::from_str::<Value>(&text_of(&field.value)) {
                    Ok(Value::Object(object)) => json.merge(name, object),
                    Ok(value) => json.insert(name, value),
                    Err(e) => errors.push(invalid_json(name, e.to_string())),
                },
                FieldKind::Model => match serde_json::from_str::<Value>(&text_of(&field.value)) {
                    Ok(Value::Object(object)) => json.merge(name, object),
                    Ok(_) => errors.push(invalid_json(name, "expected a JSON object".to_string())),
                    Err(e) => errors.push(invalid_json(name, e.to_string())),
                },
            }
        }

        if !errors.is_empty() {
            debug!(count = errors.len(), "validation failed");
            return Err(ExploreError::Validation(errors));
        }

        let mut draft = RequestDraft {
            method: self.method,
            url,
            query,
            headers,
            payload: resolve_payload(json, form, files),
        };

        for augmenter in &self.augmenters {
            let extra = augmenter.augment(&draft);
            draft.headers.extend(extra.headers);
            draft.query.extend(extra.params);
        }

        draft.url = finalize_url(&draft.url, &draft.query)?;
        Ok(draft)
    }
}

fn invalid_json(field: &str, message: String) -> FieldError {
    FieldError::InvalidJson {
        field: field.to_string(),
        message,
    }
}

fn text_of(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::File(file) => String::from_utf8_lossy(&file.bytes).to_string(),
    }
}

/// A text value on a file field is sent as the file's contents
fn attachment_of(name: &str, value: &FieldValue) -> FileAttachment {
    match value {
        FieldValue::File(file) => file.clone(),
        FieldValue::Text(text) => FileAttachment::new(name, text.as_bytes().to_vec()),
    }
}

/// Parse the substituted template and append the query in order
fn finalize_url(base: &str, query: &[(String, String)]) -> Result<String, ExploreError> {
    let mut url = Url::parse(base).map_err(|source| ExploreError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Augmentation, BearerAuth};
    use crate::models::FieldDeclaration;
    use crate::request::{BodyKind, MultipartPart, Payload};
    use serde_json::json;

    fn field(name: &str, kind: FieldKind, value: &str) -> Field {
        Field::new(FieldDeclaration::new(name, kind), value)
    }

    fn required(name: &str, kind: FieldKind, value: &str) -> Field {
        Field::new(FieldDeclaration::new(name, kind).required(), value)
    }

    #[derive(Debug)]
    struct Signer;

    impl Augment for Signer {
        fn augment(&self, draft: &RequestDraft) -> Augmentation {
            Augmentation {
                headers: vec![("X-Signed-Headers".into(), draft.headers.len().to_string())],
                params: vec![("sig".into(), "abc".into())],
            }
        }
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/pets/{id}");
        let fields = vec![
            required("id", FieldKind::Path, ""),
            field("limit", FieldKind::Query, "10"),
            required("X-Tenant", FieldKind::Header, ""),
            field("model", FieldKind::Model, "{not json"),
        ];

        let err = builder.build(&fields).unwrap_err();
        let names: Vec<&str> = err.field_errors().iter().map(|e| e.field()).collect();
        assert_eq!(names, vec!["id", "X-Tenant", "model"]);
        assert!(matches!(err.field_errors()[2], FieldError::InvalidJson { .. }));
    }

    #[test]
    fn test_empty_optional_fields_are_skipped() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/pets");
        let fields = vec![
            field("limit", FieldKind::Query, ""),
            field("X-Trace", FieldKind::Header, ""),
        ];
        let draft = builder.build(&fields).unwrap();
        assert_eq!(draft.url, "https://api.test/pets");
        assert!(draft.query.is_empty());
        assert!(draft.headers.is_empty());
        assert_eq!(draft.body_kind(), BodyKind::None);
    }

    #[test]
    fn test_path_query_and_headers_in_order() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/users/{user}/pets");
        let fields = vec![
            field("b", FieldKind::Query, "2"),
            required("user", FieldKind::Path, "jane doe"),
            field("X-One", FieldKind::Header, "1"),
            field("a", FieldKind::Query, "x y"),
            field("X-Two", FieldKind::Header, "2"),
        ];
        let draft = builder.build(&fields).unwrap();
        assert_eq!(draft.url, "https://api.test/users/jane%20doe/pets?b=2&a=x+y");
        assert_eq!(
            draft.headers,
            vec![
                ("X-One".to_string(), "1".to_string()),
                ("X-Two".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_template_query_is_kept() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/search?v=2");
        let draft = builder
            .build(&[field("q", FieldKind::Query, "cats")])
            .unwrap();
        assert_eq!(draft.url, "https://api.test/search?v=2&q=cats");
    }

    #[test]
    fn test_body_fields_merge_last_wins() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/pets");
        let fields = vec![
            field("pet", FieldKind::Model, r#"{"name": "rex", "age": 2}"#),
            field("tag", FieldKind::Body, r#""good""#),
            field("extra", FieldKind::Model, r#"{"age": 3}"#),
        ];
        let draft = builder.build(&fields).unwrap();
        match &draft.payload {
            Payload::Json(text) => {
                let value: Value = serde_json::from_str(text).unwrap();
                assert_eq!(value, json!({"name": "rex", "age": 3, "tag": "good"}));
            }
            other => panic!("expected JSON, got {:?}", other),
        }
        assert_eq!(draft.payload.content_type(), Some("application/json"));
    }

    #[test]
    fn test_body_objects_merge_keys() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/pets");
        let fields = vec![
            field("first", FieldKind::Body, r#"{"a": 1, "b": 1}"#),
            field("second", FieldKind::Body, r#"{"b": 2}"#),
        ];
        let draft = builder.build(&fields).unwrap();
        match &draft.payload {
            Payload::Json(text) => {
                let value: Value = serde_json::from_str(text).unwrap();
                assert_eq!(value, json!({"a": 1, "b": 2}));
            }
            other => panic!("expected JSON, got {:?}", other),
        }
    }

    #[test]
    fn test_body_scalars_and_arrays_keep_field_name() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/pets");
        let fields = vec![
            field("tags", FieldKind::Body, r#"["a", "b"]"#),
            field("pet", FieldKind::Body, r#"{"name": "rex"}"#),
            field("count", FieldKind::Body, "3"),
        ];
        let draft = builder.build(&fields).unwrap();
        match &draft.payload {
            Payload::Json(text) => {
                let value: Value = serde_json::from_str(text).unwrap();
                assert_eq!(value, json!({"tags": ["a", "b"], "name": "rex", "count": 3}));
            }
            other => panic!("expected JSON, got {:?}", other),
        }
    }

    #[test]
    fn test_body_that_is_not_json_is_invalid() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/pets");
        let err = builder
            .build(&[field("name", FieldKind::Body, "rex")])
            .unwrap_err();
        assert!(matches!(
            err.field_errors(),
            [FieldError::InvalidJson { field, .. }] if field == "name"
        ));
    }

    #[test]
    fn test_empty_optional_path_is_removed() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/pets/{id}");
        let draft = builder
            .build(&[field("id", FieldKind::Path, "")])
            .unwrap();
        assert_eq!(draft.url, "https://api.test/pets/");
    }

    #[test]
    fn test_model_must_be_object() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/pets");
        let err = builder
            .build(&[field("pet", FieldKind::Model, "[1, 2]")])
            .unwrap_err();
        assert_eq!(
            err.field_errors(),
            &[FieldError::InvalidJson {
                field: "pet".into(),
                message: "expected a JSON object".into()
            }]
        );
    }

    #[test]
    fn test_form_only_is_url_encoded() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/login");
        let draft = builder.build(&[field("a", FieldKind::Form, "1")]).unwrap();
        assert_eq!(draft.body_kind(), BodyKind::UrlEncodedForm);
        assert_eq!(draft.payload, Payload::UrlEncoded("a=1".into()));
        assert_eq!(
            draft.payload.content_type(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_file_and_json_make_multipart() {
        let builder = RequestBuilder::new(HttpMethod::POST, "https://api.test/upload");
        let file = FileAttachment::new("photo.png", vec![137, 80, 78, 71]);
        let fields = vec![
            Field::new(
                FieldDeclaration::new("photo", FieldKind::File),
                FieldValue::File(file.clone()),
            ),
            field("meta", FieldKind::Model, r#"{"title": "cat"}"#),
        ];
        let draft = builder.build(&fields).unwrap();
        assert_eq!(draft.body_kind(), BodyKind::Multipart);
        match &draft.payload {
            Payload::Multipart(parts) => {
                assert_eq!(
                    parts[0],
                    MultipartPart::File {
                        name: "photo".into(),
                        attachment: file
                    }
                );
                assert_eq!(parts[1].name(), "meta");
                assert!(matches!(parts[1], MultipartPart::Json { .. }));
            }
            other => panic!("expected multipart, got {:?}", other),
        }
    }

    #[test]
    fn test_augmenters_append_after_user_values() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/pets")
            .augment_with(BearerAuth::new("tok"))
            .augment_with(Signer);
        let fields = vec![
            field("X-Trace", FieldKind::Header, "t1"),
            field("limit", FieldKind::Query, "5"),
        ];
        let draft = builder.build(&fields).unwrap();
        assert_eq!(
            draft.headers,
            vec![
                ("X-Trace".to_string(), "t1".to_string()),
                ("Authorization".to_string(), "Bearer tok".to_string()),
                ("X-Signed-Headers".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(draft.url, "https://api.test/pets?limit=5&sig=abc");
    }

    #[test]
    fn test_augmenters_do_not_run_on_invalid_input() {
        let builder = RequestBuilder::new(HttpMethod::GET, "https://api.test/pets")
            .augment_with(Signer);
        let result = builder.build(&[required("q", FieldKind::Query, "")]);
        assert!(matches!(result, Err(ExploreError::Validation(_))));
    }

    #[test]
    fn test_invalid_url() {
        let builder = RequestBuilder::new(HttpMethod::GET, "/relative/{id}");
        let err = builder
            .build(&[field("id", FieldKind::Path, "1")])
            .unwrap_err();
        assert!(matches!(err, ExploreError::InvalidUrl { .. }));
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = RequestBuilder::new(HttpMethod::PUT, "https://api.test/pets/{id}")
            .augment_with(Signer);
        let fields = vec![
            field("id", FieldKind::Path, "7"),
            field("X-A", FieldKind::Header, "a"),
            field("q", FieldKind::Query, "1"),
            field("pet", FieldKind::Model, r#"{"b": 1, "a": 2}"#),
        ];
        assert_eq!(builder.build(&fields).unwrap(), builder.build(&fields).unwrap());
    }
}
