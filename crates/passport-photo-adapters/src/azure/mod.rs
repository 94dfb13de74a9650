//! REST clients for the Azure perception services.
//!
//! One blocking `reqwest` client is built at startup and shared by the three
//! service clients; each implements one of the core gateway ports.

mod client;
mod content_safety;
mod face;
mod vision;

use std::sync::Arc;

use anyhow::Result;
use passport_photo_core::Gateways;
use tracing::info;

pub use client::{defaults, ClientSettings, HttpClient};
pub use content_safety::AzureContentSafetyClient;
pub use face::AzureFaceClient;
pub use vision::AzureVisionClient;

use crate::credentials::AzureCredentials;

/// Builds the three gateway clients from credentials and transport settings.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub fn gateways(credentials: &AzureCredentials, settings: ClientSettings) -> Result<Gateways> {
    let http = HttpClient::new(settings)?;
    info!(
        timeout = ?settings.timeout,
        max_retries = settings.max_retries,
        "Azure gateway clients ready"
    );
    Ok(Gateways::new(
        Arc::new(AzureFaceClient::new(
            http.clone(),
            &credentials.faces.endpoint,
            credentials.faces.key.clone(),
        )),
        Arc::new(AzureContentSafetyClient::new(
            http.clone(),
            &credentials.moderation.endpoint,
            credentials.moderation.key.clone(),
        )),
        Arc::new(AzureVisionClient::new(
            http,
            &credentials.vision.endpoint,
            credentials.vision.key.clone(),
        )),
    ))
}
