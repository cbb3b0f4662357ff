//! Request construction - from declared form fields to an outgoing request
//!
//! Pure logic, no I/O: the builder validates fields, resolves the payload
//! encoding and runs the authentication augmenters.

pub mod body;
pub mod builder;
pub mod draft;
pub mod error;
pub mod path;
pub mod preview;

pub use builder::RequestBuilder;
pub use draft::{BodyKind, MultipartPart, Payload, RequestDraft};
pub use error::{ExploreError, FieldError};
pub use preview::RequestPreview;
