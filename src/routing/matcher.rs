//! Exact-version route matching.
//!
//! # Responsibilities
//! - Validate a route's target version eagerly, at construction
//! - Compare the negotiated version against the target
//! - Report whether the route handles the request or defers to the next one
//!
//! # Design Decisions
//! - Equality is by semantic version value; identical strings short-circuit
//! - A request without a negotiated version never matches

use std::fmt;

use semver::Version;
use serde_json::Value;

use crate::negotiation::config::ConfigError;
use crate::negotiation::matcher::parse_version;
use crate::negotiation::RequestVersion;
use crate::observability::metrics;

/// What a versioned route does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Handle the request with this route.
    Continue,
    /// Skip to the next route registered for this path.
    Delegate,
}

impl RouteDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDecision::Continue => "continue",
            RouteDecision::Delegate => "delegate",
        }
    }
}

/// The single version a route serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteVersion {
    raw: String,
    version: Version,
}

impl RouteVersion {
    pub fn new(version: &str) -> Result<Self, ConfigError> {
        let parsed = parse_version(version).ok_or_else(|| ConfigError::InvalidVersion(version.to_string()))?;
        Ok(Self {
            raw: version.to_string(),
            version: parsed,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Decide whether this route handles a request negotiated to `matched`.
    pub fn decide(&self, matched: Option<&str>) -> RouteDecision {
        let decision = match matched {
            Some(m) if m == self.raw => RouteDecision::Continue,
            Some(m) if parse_version(m).as_ref() == Some(&self.version) => RouteDecision::Continue,
            _ => RouteDecision::Delegate,
        };
        metrics::record_route_decision(decision.as_str());
        decision
    }

    /// Decide from the context attached by the negotiation middleware.
    pub fn decide_for(&self, context: Option<&RequestVersion>) -> RouteDecision {
        self.decide(context.and_then(|c| c.matched.as_deref()))
    }
}

impl TryFrom<&Value> for RouteVersion {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Self::new(s),
            _ => Err(ConfigError::RouteVersionNotString),
        }
    }
}

impl std::str::FromStr for RouteVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for RouteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_route_version() {
        assert_eq!(
            RouteVersion::new("a.b.c").unwrap_err().to_string(),
            "Version a.b.c is not a valid semver string"
        );
        assert_eq!(
            RouteVersion::try_from(&json!({"foo": "bar"})).unwrap_err(),
            ConfigError::RouteVersionNotString
        );
        assert!(RouteVersion::try_from(&json!("1.0.0")).is_ok());
    }

    #[test]
    fn test_exact_match_continues() {
        let route = RouteVersion::new("1.0.0").unwrap();
        assert_eq!(route.decide(Some("1.0.0")), RouteDecision::Continue);
        assert_eq!(route.decide(Some("v1.0.0")), RouteDecision::Continue);
    }

    #[test]
    fn test_mismatch_delegates() {
        let route = RouteVersion::new("1.0.0").unwrap();
        assert_eq!(route.decide(Some("2.0.0")), RouteDecision::Delegate);
        assert_eq!(route.decide(Some("1.0.1")), RouteDecision::Delegate);
        assert_eq!(route.decide(Some(">=1.0.0")), RouteDecision::Delegate);
        assert_eq!(route.decide(None), RouteDecision::Delegate);
    }

    #[test]
    fn test_decide_for_context() {
        let route: RouteVersion = "2.0.0".parse().unwrap();
        let context = RequestVersion {
            requested: Some("^2.0.0".into()),
            matched: Some("2.0.0".into()),
        };
        assert_eq!(route.decide_for(Some(&context)), RouteDecision::Continue);
        assert_eq!(route.decide_for(None), RouteDecision::Delegate);
    }
}
