//! Catalogue types and error definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uri::{self, Segment};

/// Errors that can occur during catalogue operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A project with the same derived key already exists.
    #[error("project key '{0}' already exists")]
    DuplicateProjectKey(String),

    /// Another endpoint in the project has the same URI key.
    #[error("endpoint key '{key}' already exists in project '{project}'")]
    DuplicateEndpointKey { project: String, key: String },

    /// The URI definition was empty or produced no segments.
    #[error("endpoint URI definition is empty")]
    EmptyDefinition,

    /// The derived project key is below the minimum length.
    #[error("project key '{0}' is too short (minimum 3 characters)")]
    KeyTooShort(String),

    /// The base URL host was empty.
    #[error("project host must not be empty")]
    EmptyHost,

    /// The base URL port was zero.
    #[error("project port must be non-zero")]
    InvalidPort,

    /// The composed base URL does not parse.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// An unrecognized protocol name.
    #[error("unknown protocol '{0}' (expected http or https)")]
    UnknownProtocol(String),

    /// An unrecognized HTTP method name.
    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),

    /// No project with the given key exists.
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    /// No endpoint with the given identity exists in the project.
    /// Indicates a stale reference upstream, not a recoverable condition.
    #[error("no endpoint created at {created} in project '{project}'")]
    EndpointNotFound {
        project: String,
        created: DateTime<Utc>,
    },

    /// No endpoint with the given URI key exists in the project.
    #[error("no endpoint with URI key '{key}' in project '{project}'")]
    EndpointKeyNotFound { project: String, key: String },
}

/// Result type for catalogue operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Base URL protocol. Serialized with the trailing `://` for compatibility
/// with the stored catalogue format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "http://")]
    Http,
    #[serde(rename = "https://")]
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http://"),
            Protocol::Https => write!(f, "https://"),
        }
    }
}

impl FromStr for Protocol {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches("://") {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(CatalogError::UnknownProtocol(other.to_string())),
        }
    }
}

/// Base address shared by all endpoints of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrl {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

impl BaseUrl {
    /// The base address string, `<protocol><host>:<port>`.
    pub fn base(&self) -> String {
        format!("{}{}:{}", self.protocol, self.host, self.port)
    }

    /// Resolve an endpoint definition against this base address.
    pub fn endpoint_url(&self, definition: &str) -> String {
        format!("{}{}", self.base(), definition)
    }

    /// Semantic validation: non-empty host, non-zero port, parseable URL.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.host.trim().is_empty() {
            return Err(CatalogError::EmptyHost);
        }
        if self.port == 0 {
            return Err(CatalogError::InvalidPort);
        }
        let base = self.base();
        url::Url::parse(&base).map_err(|e| CatalogError::InvalidBaseUrl {
            url: base,
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// The HTTP methods an endpoint can declare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Options,
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// All supported methods, in declaration order.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Options,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    /// The canonical uppercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPTIONS" => Ok(HttpMethod::Options),
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(CatalogError::UnknownMethod(other.to_string())),
        }
    }
}

/// A partial per-method overlay applied by [`MethodSet::merge`].
pub type MethodPatch = BTreeMap<HttpMethod, bool>;

/// Mapping from HTTP method to enabled flag.
///
/// Stored as a map so the wire format matches the original catalogue
/// (`{"OPTIONS": false, "GET": true, ...}`). Methods absent from a loaded
/// map read as disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodSet(BTreeMap<HttpMethod, bool>);

impl Default for MethodSet {
    fn default() -> Self {
        Self(HttpMethod::ALL.iter().map(|m| (*m, false)).collect())
    }
}

impl MethodSet {
    /// A set with the given methods enabled and all others disabled.
    pub fn with_enabled(methods: &[HttpMethod]) -> Self {
        let mut set = Self::default();
        set.apply_allow(methods);
        set
    }

    /// Whether a method is enabled.
    pub fn is_enabled(&self, method: HttpMethod) -> bool {
        self.0.get(&method).copied().unwrap_or(false)
    }

    /// Set a single method flag.
    pub fn set(&mut self, method: HttpMethod, enabled: bool) {
        self.0.insert(method, enabled);
    }

    /// Overwrite every flag from an allow-list: a method is enabled exactly
    /// when it appears in `allowed`.
    pub fn apply_allow(&mut self, allowed: &[HttpMethod]) {
        for method in HttpMethod::ALL {
            self.0.insert(method, allowed.contains(&method));
        }
    }

    /// Overwrite only the flags present in the patch, leaving others intact.
    pub fn merge(&mut self, patch: &MethodPatch) {
        for (method, enabled) in patch {
            self.0.insert(*method, *enabled);
        }
    }

    /// The enabled methods, in declaration order.
    pub fn enabled(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(|m| self.is_enabled(*m))
            .collect()
    }
}

/// A parsed endpoint URI: the raw definition, its canonical key, and the
/// tokenized breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriTemplate {
    pub definition: String,
    pub key: String,
    pub breakdown: Vec<Segment>,
}

impl UriTemplate {
    /// Parse a raw definition. Empty definitions are a validation error;
    /// anything else tokenizes (permissively) to a non-empty breakdown.
    pub fn parse(definition: &str) -> CatalogResult<Self> {
        let breakdown = uri::tokenize(definition);
        if breakdown.is_empty() {
            return Err(CatalogError::EmptyDefinition);
        }
        let key = uri::derive_key(&breakdown);
        Ok(Self {
            definition: definition.to_string(),
            key,
            breakdown,
        })
    }
}

/// A single API route entry owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub uri: UriTemplate,
    pub methods: MethodSet,
    /// Creation timestamp; doubles as the stable identity for updates.
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl Endpoint {
    pub fn new(uri: UriTemplate, methods: MethodSet) -> Self {
        Self {
            uri,
            methods,
            created: Utc::now(),
            updated: None,
        }
    }
}

/// Field-list-driven endpoint update. Unknown fields are rejected at
/// deserialization rather than merged blindly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointPatch {
    /// Replacement URI definition (re-tokenized and re-validated).
    pub definition: Option<String>,
    /// Per-method flag overrides; methods not listed keep their flag.
    pub methods: Option<MethodPatch>,
}

impl EndpointPatch {
    pub fn is_empty(&self) -> bool {
        self.definition.is_none() && self.methods.is_none()
    }
}

/// Field-list-driven project update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    /// New display name; re-derives the project key.
    pub name: Option<String>,
    pub protocol: Option<Protocol>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.protocol.is_none()
            && self.host.is_none()
            && self.port.is_none()
    }
}

/// A named collection of endpoints sharing a base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Derived identifier, unique across the catalogue.
    pub key: String,
    pub url: BaseUrl,
    pub endpoints: Vec<Endpoint>,
}

impl Project {
    /// Duplicate predicate for endpoint URI keys (case-sensitive).
    ///
    /// In edit mode, pass the edited endpoint's `created` identity so its
    /// own existing key is not reported as a duplicate.
    pub fn has_duplicate_key(
        &self,
        candidate: &str,
        editing: Option<DateTime<Utc>>,
    ) -> bool {
        self.endpoints
            .iter()
            .any(|e| e.uri.key == candidate && editing != Some(e.created))
    }

    /// Find an endpoint by its URI key.
    pub fn endpoint_by_key(&self, uri_key: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.uri.key == uri_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_round_trip() {
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("https://".parse::<Protocol>().unwrap(), Protocol::Https);
        assert!("ftp".parse::<Protocol>().is_err());

        let json = serde_json::to_string(&Protocol::Https).unwrap();
        assert_eq!(json, "\"https://\"");
    }

    #[test]
    fn test_endpoint_url_composition() {
        let url = BaseUrl {
            protocol: Protocol::Http,
            host: "api.example.com".to_string(),
            port: 8080,
        };
        assert_eq!(
            url.endpoint_url("/users/[id]"),
            "http://api.example.com:8080/users/[id]"
        );
    }

    #[test]
    fn test_base_url_validation() {
        let mut url = BaseUrl {
            protocol: Protocol::Http,
            host: "localhost".to_string(),
            port: 3000,
        };
        assert!(url.validate().is_ok());

        url.host = "  ".to_string();
        assert!(matches!(url.validate(), Err(CatalogError::EmptyHost)));

        url.host = "localhost".to_string();
        url.port = 0;
        assert!(matches!(url.validate(), Err(CatalogError::InvalidPort)));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert!("get".parse::<HttpMethod>().is_err());
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_set_default_all_disabled() {
        let set = MethodSet::default();
        for method in HttpMethod::ALL {
            assert!(!set.is_enabled(method));
        }
        assert!(set.enabled().is_empty());
    }

    #[test]
    fn test_method_set_apply_allow_overwrites_everything() {
        let mut set = MethodSet::default();
        set.set(HttpMethod::Post, true);

        set.apply_allow(&[HttpMethod::Get, HttpMethod::Head, HttpMethod::Options]);

        assert!(set.is_enabled(HttpMethod::Get));
        assert!(set.is_enabled(HttpMethod::Head));
        assert!(set.is_enabled(HttpMethod::Options));
        assert!(!set.is_enabled(HttpMethod::Post));
        assert!(!set.is_enabled(HttpMethod::Put));
        assert!(!set.is_enabled(HttpMethod::Delete));
        assert!(!set.is_enabled(HttpMethod::Patch));
    }

    #[test]
    fn test_method_set_merge_is_partial() {
        let mut set = MethodSet::default();
        set.set(HttpMethod::Post, true);

        let patch: MethodPatch = [(HttpMethod::Get, true)].into_iter().collect();
        set.merge(&patch);

        assert!(set.is_enabled(HttpMethod::Get));
        assert!(set.is_enabled(HttpMethod::Post));
        assert!(!set.is_enabled(HttpMethod::Put));
    }

    #[test]
    fn test_method_set_wire_format() {
        let set = MethodSet::with_enabled(&[HttpMethod::Get]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["GET"], serde_json::json!(true));
        assert_eq!(json["OPTIONS"], serde_json::json!(false));
    }

    #[test]
    fn test_uri_template_parse() {
        let uri = UriTemplate::parse("/users/[id]").unwrap();
        assert_eq!(uri.key, "/users/");
        assert_eq!(uri.breakdown.len(), 3);

        assert!(matches!(
            UriTemplate::parse(""),
            Err(CatalogError::EmptyDefinition)
        ));
    }

    #[test]
    fn test_endpoint_patch_rejects_unknown_fields() {
        let raw = r#"{"definition": "/x", "nonsense": 1}"#;
        assert!(serde_json::from_str::<EndpointPatch>(raw).is_err());

        let raw = r#"{"methods": {"GET": true}}"#;
        let patch: EndpointPatch = serde_json::from_str(raw).unwrap();
        assert_eq!(patch.methods.unwrap()[&HttpMethod::Get], true);
    }
}
