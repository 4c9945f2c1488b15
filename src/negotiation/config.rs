//! Negotiation configuration and its validation.
//!
//! # Responsibilities
//! - Normalize a bare version list into a full configuration
//! - Validate supported versions and policy flags
//! - Bind the default error factory to the validated version list
//!
//! # Design Decisions
//! - Validation fails fast with the first offending field; nothing is coerced
//! - `null` fields count as absent
//! - The resulting `NegotiationConfig` is immutable

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::negotiation::error::{DefaultErrorFactory, ErrorFactory, VersionError};
use crate::negotiation::matcher::SupportedVersion;

/// Configuration errors, reported at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Arguments should contain a list of supported versions")]
    MissingVersions,

    #[error("versions should be a list of strings")]
    VersionsNotList,

    #[error("versions should contain at least one version")]
    EmptyVersions,

    #[error("Version {0} is not a valid semver string")]
    InvalidVersion(String),

    #[error("{0} should be a boolean")]
    NotBoolean(&'static str),

    #[error("generateError should be a function")]
    NotCallable,

    #[error("Route version should be a string")]
    RouteVersionNotString,
}

/// Validated, immutable negotiation settings.
#[derive(Debug, Clone)]
pub struct NegotiationConfig {
    versions: Arc<[SupportedVersion]>,
    is_mandatory: bool,
    send_reply: bool,
    send_version_header: bool,
    generate_error: ErrorFactory,
}

impl NegotiationConfig {
    /// Configuration with default policy for a bare version list.
    pub fn new<I, S>(versions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder(versions).build()
    }

    pub fn builder<I, S>(versions: I) -> NegotiationConfigBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NegotiationConfigBuilder::new(versions)
    }

    pub fn versions(&self) -> &[SupportedVersion] {
        &self.versions
    }

    pub fn is_mandatory(&self) -> bool {
        self.is_mandatory
    }

    pub fn send_reply(&self) -> bool {
        self.send_reply
    }

    pub fn send_version_header(&self) -> bool {
        self.send_version_header
    }

    pub fn error_factory(&self) -> &ErrorFactory {
        &self.generate_error
    }
}

/// Builder for `NegotiationConfig`.
#[derive(Debug, Clone)]
pub struct NegotiationConfigBuilder {
    versions: Vec<String>,
    is_mandatory: bool,
    send_reply: bool,
    send_version_header: bool,
    generate_error: Option<ErrorFactory>,
}

impl NegotiationConfigBuilder {
    pub fn new<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            versions: versions.into_iter().map(|v| v.as_ref().to_string()).collect(),
            is_mandatory: false,
            send_reply: true,
            send_version_header: true,
            generate_error: None,
        }
    }

    /// Read options from dynamic input: a bare array of versions, or an object
    /// with `versions`, `isMandatory`, `sendReply`, `sendVersionHeader`.
    pub fn from_value(args: &Value) -> Result<Self, ConfigError> {
        let options = match args {
            Value::Array(_) => {
                let mut wrapped = Map::new();
                wrapped.insert("versions".to_string(), args.clone());
                wrapped
            }
            Value::Object(map) => map.clone(),
            _ => return Err(ConfigError::MissingVersions),
        };

        let versions = match field(&options, "versions") {
            None => return Err(ConfigError::MissingVersions),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| match entry {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(ConfigError::InvalidVersion(other.to_string())),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ConfigError::VersionsNotList),
        };
        if let Some(invalid) = versions.iter().find(|v| SupportedVersion::parse(v).is_none()) {
            return Err(ConfigError::InvalidVersion(invalid.clone()));
        }

        let mut builder = Self::new(versions);
        if let Some(send_reply) = boolean(&options, "sendReply")? {
            builder.send_reply = send_reply;
        }
        if let Some(is_mandatory) = boolean(&options, "isMandatory")? {
            builder.is_mandatory = is_mandatory;
        }
        if let Some(send_version_header) = boolean(&options, "sendVersionHeader")? {
            builder.send_version_header = send_version_header;
        }
        // Data can never be callable; custom factories go through `generate_error`.
        if field(&options, "generateError").is_some() {
            return Err(ConfigError::NotCallable);
        }

        Ok(builder)
    }

    /// Require the client to name a version.
    pub fn mandatory(mut self, is_mandatory: bool) -> Self {
        self.is_mandatory = is_mandatory;
        self
    }

    /// Reply with a JSON error (`true`) or forward the error (`false`).
    pub fn send_reply(mut self, send_reply: bool) -> Self {
        self.send_reply = send_reply;
        self
    }

    pub fn send_version_header(mut self, send_version_header: bool) -> Self {
        self.send_version_header = send_version_header;
        self
    }

    pub fn generate_error<F>(mut self, f: F) -> Self
    where
        F: Fn() -> VersionError + Send + Sync + 'static,
    {
        self.generate_error = Some(ErrorFactory::custom(f));
        self
    }

    pub fn build(self) -> Result<NegotiationConfig, ConfigError> {
        if self.versions.is_empty() {
            return Err(ConfigError::EmptyVersions);
        }

        let versions = self
            .versions
            .iter()
            .map(|raw| SupportedVersion::parse(raw).ok_or_else(|| ConfigError::InvalidVersion(raw.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let generate_error = self
            .generate_error
            .unwrap_or_else(|| ErrorFactory::Default(DefaultErrorFactory::new(&versions)));

        Ok(NegotiationConfig {
            versions: versions.into(),
            is_mandatory: self.is_mandatory,
            send_reply: self.send_reply,
            send_version_header: self.send_version_header,
            generate_error,
        })
    }
}

/// Validate dynamic input into a full configuration.
pub fn validate_args(args: &Value) -> Result<NegotiationConfig, ConfigError> {
    NegotiationConfigBuilder::from_value(args)?.build()
}

fn field<'a>(options: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    options.get(name).filter(|v| !v.is_null())
}

fn boolean(options: &Map<String, Value>, name: &'static str) -> Result<Option<bool>, ConfigError> {
    match field(options, name) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ConfigError::NotBoolean(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(args: Value) -> String {
        validate_args(&args).unwrap_err().to_string()
    }

    #[test]
    fn test_bare_list_becomes_versions() {
        let config = validate_args(&json!(["1.0.0"])).unwrap();
        let versions: Vec<_> = config.versions().iter().map(|v| v.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0"]);
    }

    #[test]
    fn test_defaults() {
        let config = validate_args(&json!({"versions": ["1.0.0"]})).unwrap();
        assert!(config.send_reply());
        assert!(!config.is_mandatory());
        assert!(config.send_version_header());
        assert!(config.error_factory().is_default());
    }

    #[test]
    fn test_supplied_flags() {
        let config = validate_args(&json!({
            "versions": ["1.0.0"],
            "sendReply": false,
            "isMandatory": true,
            "sendVersionHeader": false
        }))
        .unwrap();
        assert!(!config.send_reply());
        assert!(config.is_mandatory());
        assert!(!config.send_version_header());
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(message(json!("1.0.0")), "Arguments should contain a list of supported versions");
        assert_eq!(message(json!({"isMandatary": true})), "Arguments should contain a list of supported versions");
        assert_eq!(message(json!({"versions": "1.0.0"})), "versions should be a list of strings");
        assert_eq!(message(json!([])), "versions should contain at least one version");
    }

    #[test]
    fn test_invalid_versions_are_named() {
        assert_eq!(message(json!(["a.b.c"])), "Version a.b.c is not a valid semver string");
        assert_eq!(message(json!(["1.0.0", "2"])), "Version 2 is not a valid semver string");
        assert_eq!(message(json!([1])), "Version 1 is not a valid semver string");
    }

    #[test]
    fn test_non_boolean_flags() {
        for name in ["sendReply", "isMandatory", "sendVersionHeader"] {
            let mut args = json!({"versions": ["1.0.0"]});
            args[name] = json!("true");
            assert_eq!(message(args), format!("{name} should be a boolean"));
        }
    }

    #[test]
    fn test_null_fields_are_absent() {
        let config = validate_args(&json!({"versions": ["1.0.0"], "sendReply": null})).unwrap();
        assert!(config.send_reply());
    }

    #[test]
    fn test_generate_error_from_data_is_rejected() {
        assert_eq!(
            message(json!({"versions": ["1.0.0"], "generateError": "function"})),
            "generateError should be a function"
        );
    }

    #[test]
    fn test_builder_with_custom_factory() {
        let config = NegotiationConfig::builder(["1.0.0"])
            .send_reply(false)
            .generate_error(|| VersionError::new("custom error"))
            .build()
            .unwrap();
        assert!(!config.error_factory().is_default());
        assert_eq!(config.error_factory().generate().message(), "custom error");
    }

    #[test]
    fn test_default_factory_bound_to_versions() {
        let config = NegotiationConfig::new(["1.0.0", "2.0.0"]).unwrap();
        let error = config.error_factory().generate();
        assert_eq!(error.detail(), Some("Supported Versions: [1.0.0,2.0.0]"));
    }
}
