//! Azure AI Content Safety image client.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use passport_photo_core::domain::{ModerationCategory, ModerationResult};
use passport_photo_core::{ContentModerator, GatewayError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{join_url, parse_json, HttpClient, KEY_HEADER};

const SERVICE: &str = "moderation";
const ANALYZE_PATH: &str = "contentsafety/image:analyze?api-version=2023-10-01";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    image: ImageData<'a>,
}

#[derive(Serialize)]
struct ImageData<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    categories_analysis: Vec<CategoryAnalysis>,
}

#[derive(Debug, Deserialize)]
struct CategoryAnalysis {
    category: String,
    severity: Option<u32>,
}

fn wire_name(category: ModerationCategory) -> &'static str {
    match category {
        ModerationCategory::Hate => "Hate",
        ModerationCategory::SelfHarm => "SelfHarm",
        ModerationCategory::Sexual => "Sexual",
        ModerationCategory::Violence => "Violence",
    }
}

impl AnalyzeResponse {
    /// Picks out the four categories. Every one must be present with a
    /// severity.
    fn into_result(self) -> Result<ModerationResult, GatewayError> {
        let mut result = ModerationResult::default();
        for category in ModerationCategory::ALL {
            let name = wire_name(category);
            let entry = self
                .categories_analysis
                .iter()
                .find(|c| c.category == name)
                .ok_or_else(|| GatewayError::Response {
                    service: SERVICE,
                    message: format!("category `{name}` missing from categoriesAnalysis"),
                })?;
            let severity = entry.severity.ok_or_else(|| GatewayError::Response {
                service: SERVICE,
                message: format!("category `{name}` has no severity"),
            })?;
            result.set(category, severity);
        }
        Ok(result)
    }
}

/// Client for the Content Safety `image:analyze` operation.
#[derive(Debug, Clone)]
pub struct AzureContentSafetyClient {
    http: HttpClient,
    url: String,
    key: String,
}

impl AzureContentSafetyClient {
    /// Creates a client for the resource at `endpoint`.
    #[must_use]
    pub fn new(http: HttpClient, endpoint: &str, key: impl Into<String>) -> Self {
        Self {
            http,
            url: join_url(endpoint, ANALYZE_PATH),
            key: key.into(),
        }
    }
}

impl ContentModerator for AzureContentSafetyClient {
    fn analyze_image(&self, image: &[u8]) -> Result<ModerationResult, GatewayError> {
        let content = STANDARD.encode(image);
        let request = AnalyzeRequest {
            image: ImageData { content: &content },
        };
        let response = self.http.send(SERVICE, |client| {
            client
                .post(&self.url)
                .header(KEY_HEADER, &self.key)
                .json(&request)
        })?;
        let result = parse_json::<AnalyzeResponse>(SERVICE, response)?.into_result()?;
        debug!(?result, "moderation severities");
        Ok(result)
    }
}
