//! Authentication augmenters
//!
//! An augmenter sees the draft right before its URL is finalised and
//! contributes extra headers and query parameters. They are appended after
//! the user-declared ones and are not validated.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::ApiKeyRegistry;
use crate::request::RequestDraft;

/// Headers and query parameters contributed by an augmenter
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Augmentation {
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl Augmentation {
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Augmentation {
            headers: vec![(name.into(), value.into())],
            params: Vec::new(),
        }
    }

    pub fn param(name: impl Into<String>, value: impl Into<String>) -> Self {
        Augmentation {
            headers: Vec::new(),
            params: vec![(name.into(), value.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.params.is_empty()
    }
}

/// Hook invoked with the draft just before URL construction
pub trait Augment: Send + Sync + std::fmt::Debug {
    fn augment(&self, draft: &RequestDraft) -> Augmentation;
}

fn basic_credentials(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    format!("Basic {}", encoded)
}

/// Where an API key goes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPlacement {
    /// `Authorization: Basic base64(key:)`
    #[default]
    Basic,
    Header(String),
    Query(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyAuth {
    key: String,
    placement: KeyPlacement,
}

impl ApiKeyAuth {
    pub fn new(key: impl Into<String>, placement: KeyPlacement) -> Self {
        ApiKeyAuth {
            key: key.into(),
            placement,
        }
    }

    /// Look a key up by name in the registry
    pub fn from_registry(
        registry: &ApiKeyRegistry,
        name: &str,
        placement: KeyPlacement,
    ) -> Option<Self> {
        registry.get(name).map(|key| ApiKeyAuth::new(key, placement))
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("key", &"[REDACTED]")
            .field("placement", &self.placement)
            .finish()
    }
}

impl Augment for ApiKeyAuth {
    fn augment(&self, _draft: &RequestDraft) -> Augmentation {
        if self.key.is_empty() {
            return Augmentation::default();
        }
        match &self.placement {
            KeyPlacement::Basic => {
                Augmentation::header("Authorization", basic_credentials(&self.key, ""))
            }
            KeyPlacement::Header(name) => Augmentation::header(name, &self.key),
            KeyPlacement::Query(name) => Augmentation::param(name, &self.key),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        BearerAuth {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Augment for BearerAuth {
    fn augment(&self, _draft: &RequestDraft) -> Augmentation {
        if self.token.is_empty() {
            return Augmentation::default();
        }
        Augmentation::header("Authorization", format!("Bearer {}", self.token))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        BasicAuth {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Augment for BasicAuth {
    fn augment(&self, _draft: &RequestDraft) -> Augmentation {
        if self.username.is_empty() && self.password.is_empty() {
            return Augmentation::default();
        }
        Augmentation::header(
            "Authorization",
            basic_credentials(&self.username, &self.password),
        )
    }
}

/// Source of the API key typed or selected in the auth panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Selected by name from the configured registry
    Registry(String),
    Manual(String),
}

/// Authentication settings read from the dedicated auth inputs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthSettings {
    #[default]
    None,
    /// Chosen interactively, never read from config
    #[serde(skip)]
    ApiKey(ApiKeySource),
    Bearer(String),
    Basic { username: String, password: String },
}

impl AuthSettings {
    pub fn label(&self) -> &'static str {
        match self {
            AuthSettings::None => "None",
            AuthSettings::ApiKey(_) => "API key",
            AuthSettings::Bearer(_) => "Bearer",
            AuthSettings::Basic { .. } => "Basic",
        }
    }

    /// Strategy for these settings, if any applies
    pub fn augmenter(
        &self,
        registry: &ApiKeyRegistry,
        placement: &KeyPlacement,
    ) -> Option<Box<dyn Augment>> {
        match self {
            AuthSettings::None => None,
            AuthSettings::ApiKey(ApiKeySource::Registry(name)) => {
                ApiKeyAuth::from_registry(registry, name, placement.clone())
                    .map(|auth| Box::new(auth) as Box<dyn Augment>)
            }
            AuthSettings::ApiKey(ApiKeySource::Manual(key)) => {
                Some(Box::new(ApiKeyAuth::new(key, placement.clone())))
            }
            AuthSettings::Bearer(token) => Some(Box::new(BearerAuth::new(token))),
            AuthSettings::Basic { username, password } => {
                Some(Box::new(BasicAuth::new(username, password)))
            }
        }
    }
}
