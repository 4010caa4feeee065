use std::time::Instant;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use petpal_core::{Classification, ClassifierOptions, Delegate, Frame, ImageClassifier};

/// Remote image-classification service.
///
/// `POST {base_url}/classify` with the frame base64-encoded alongside the
/// classifier options; the service answers with categories ranked by score.
pub struct HttpClassifier {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyRequest<'a> {
    model_asset_path: &'a str,
    delegate: Delegate,
    max_results: u32,
    score_threshold: f32,
    image: ImagePayload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagePayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    classifications: Vec<Classification>,
}

#[async_trait]
impl ImageClassifier for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn initialize(&self) -> Result<()> {
        let response = self
            .authorize(self.client.get(format!("{}/health", self.base_url)))
            .send()
            .await
            .context("Classifier health check failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Classifier health check returned {}", status);
        }
        info!(base_url = %self.base_url, "Mood classifier ready");
        Ok(())
    }

    async fn classify(
        &self,
        frame: &Frame,
        options: &ClassifierOptions,
    ) -> Result<Vec<Classification>> {
        let start = Instant::now();

        let body = ClassifyRequest {
            model_asset_path: &options.model_asset_path,
            delegate: options.delegate,
            max_results: options.max_results,
            score_threshold: options.score_threshold,
            image: ImagePayload {
                mime_type: frame.mime_type.clone(),
                data: STANDARD.encode(&frame.bytes),
            },
        };

        debug!(
            bytes = frame.bytes.len(),
            delegate = ?options.delegate,
            "Sending frame to classifier"
        );

        let response = self
            .authorize(self.client.post(format!("{}/classify", self.base_url)))
            .json(&body)
            .send()
            .await
            .context("Classifier HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("Classifier returned {}: {}", status, error_body);
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .context("Failed to parse classifier response")?;

        debug!(
            results = parsed.classifications.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Classifier responded"
        );
        Ok(parsed.classifications)
    }
}
