//! Built-in handlers served by the binary.

use axum::{routing::get, Json};
use serde::Serialize;

use crate::negotiation::{ConfigError, NegotiationConfig, RequestVersion};
use crate::routing::VersionedRoute;

/// Echo the negotiated versions back to the client.
pub async fn echo(version: RequestVersion) -> Json<RequestVersion> {
    Json(version)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    pub served_by: String,
    pub message: String,
}

/// One greeting route per supported version.
pub fn greeting(config: &NegotiationConfig) -> Result<VersionedRoute, ConfigError> {
    config.versions().iter().try_fold(VersionedRoute::new(), |routes, supported| {
        let served_by = supported.as_str().to_string();
        routes.version(
            supported.as_str(),
            get(move || {
                let served_by = served_by.clone();
                async move {
                    let message = format!("Hello from API version {served_by}");
                    Json(Greeting { served_by, message })
                }
            }),
        )
    })
}
