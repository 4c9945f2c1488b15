//! Negotiation failures and how they are answered.
//!
//! # Responsibilities
//! - Define the per-request failure value (`VersionError`)
//! - Build the default error from the supported version list
//! - Either reply with a JSON body or forward the error to the
//!   surrounding error-handling stage
//!
//! # Design Decisions
//! - The default factory formats its detail once, at configuration time
//! - Forwarded errors ride in the response extensions so an outer layer
//!   can re-render them; the built-in rendering is status (or 500) plus
//!   the plain-text message

use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::negotiation::matcher::SupportedVersion;

/// A negotiation failure produced by an error factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct VersionError {
    status: Option<StatusCode>,
    message: String,
    detail: Option<String>,
}

impl VersionError {
    /// An error with a message and no status or detail.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The status a renderer should use: the error's own, or 500.
    pub fn status_or_default(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Rendering used by the error-handling stage when nothing outside re-renders the error.
impl IntoResponse for VersionError {
    fn into_response(self) -> Response {
        let status = self.status_or_default();
        let body = self.message.clone();
        let mut response = (status, body).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// JSON body sent when the middleware replies directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&VersionError> for ErrorBody {
    fn from(error: &VersionError) -> Self {
        Self {
            status_code: error.status_or_default().as_u16(),
            title: error.message.clone(),
            detail: error.detail.clone(),
        }
    }
}

/// Default factory: `400 Invalid Version` listing every supported version.
#[derive(Debug, Clone)]
pub struct DefaultErrorFactory {
    detail: Arc<str>,
}

impl DefaultErrorFactory {
    pub const TITLE: &'static str = "Invalid Version";

    pub fn new(versions: &[SupportedVersion]) -> Self {
        let listed = versions
            .iter()
            .map(SupportedVersion::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            detail: format!("Supported Versions: [{listed}]").into(),
        }
    }

    pub fn generate(&self) -> VersionError {
        VersionError::new(Self::TITLE)
            .with_status(StatusCode::BAD_REQUEST)
            .with_detail(&*self.detail)
    }
}

type CustomFactory = Arc<dyn Fn() -> VersionError + Send + Sync>;

/// Produces the error for a failed negotiation.
#[derive(Clone)]
pub enum ErrorFactory {
    Default(DefaultErrorFactory),
    Custom(CustomFactory),
}

impl ErrorFactory {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn() -> VersionError + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn generate(&self) -> VersionError {
        match self {
            Self::Default(factory) => factory.generate(),
            Self::Custom(f) => f(),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

impl fmt::Debug for ErrorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default(factory) => f.debug_tuple("Default").field(factory).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Answer a failed negotiation according to the reply policy.
pub fn respond(factory: &ErrorFactory, send_reply: bool) -> Response {
    let error = factory.generate();
    if send_reply {
        reply(&error)
    } else {
        forward(error)
    }
}

/// Send the JSON error body; the request ends here.
pub fn reply(error: &VersionError) -> Response {
    (error.status_or_default(), Json(ErrorBody::from(error))).into_response()
}

/// Hand the error to the error-handling stage without writing a reply body of our own.
pub fn forward(error: VersionError) -> Response {
    error.into_response()
}
