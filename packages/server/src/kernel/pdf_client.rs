use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use crate::common::CoreError;
use crate::domains::documents::renderer::PageConfig;
use crate::kernel::BasePdfRenderer;

/// HTML-to-PDF conversion service client
///
/// Talks to a stateless conversion service (Gotenberg-style) over HTTP. The
/// service owns retry policy; this client makes exactly one attempt.
pub struct PdfServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ConvertRequest<'a> {
    html: &'a str,
    page: &'a PageConfig,
}

impl PdfServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BasePdfRenderer for PdfServiceClient {
    async fn render(&self, html: &str, page: &PageConfig) -> Result<Vec<u8>, CoreError> {
        let url = format!("{}/convert/html", self.base_url);
        debug!("Rendering {} bytes of HTML via {}", html.len(), url);

        let response = self
            .client
            .post(&url)
            .json(&ConvertRequest { html, page })
            .send()
            .await
            .map_err(|e| CoreError::RenderFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("PDF conversion failed {}: {}", status, body);
            return Err(CoreError::RenderFailure(format!(
                "conversion service returned {status}: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoreError::RenderFailure(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
