//! Azure AI Vision Image Analysis 4.0 client, tags only.

use passport_photo_core::domain::{Tag, TagSet};
use passport_photo_core::{GatewayError, ImageTagger};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use super::client::{join_url, parse_json, HttpClient, KEY_HEADER};

const SERVICE: &str = "vision";
const ANALYZE_PATH: &str =
    "computervision/imageanalysis:analyze?api-version=2023-10-01&features=tags&language=en";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    tags_result: TagsResult,
}

#[derive(Debug, Deserialize)]
struct TagsResult {
    values: Vec<WireTag>,
}

#[derive(Debug, Deserialize)]
struct WireTag {
    name: String,
    confidence: f64,
}

impl From<AnalyzeResponse> for TagSet {
    fn from(response: AnalyzeResponse) -> Self {
        response
            .tags_result
            .values
            .into_iter()
            .map(|t| Tag::new(t.name, t.confidence))
            .collect()
    }
}

/// Client for the Image Analysis `analyze` operation.
#[derive(Debug, Clone)]
pub struct AzureVisionClient {
    http: HttpClient,
    url: String,
    key: String,
}

impl AzureVisionClient {
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

impl ImageTagger for AzureVisionClient {
    fn tag_image(&self, image: &[u8]) -> Result<TagSet, GatewayError> {
        let response = self.http.send(SERVICE, |client| {
            client
                .post(&self.url)
                .header(KEY_HEADER, &self.key)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(image.to_vec())
        })?;
        let tags = TagSet::from(parse_json::<AnalyzeResponse>(SERVICE, response)?);
        debug!(count = tags.len(), "tags received");
        Ok(tags)
    }
}
