use std::sync::Arc;
use std::time::Duration;

use crate::wire::{ExtractRequest, ExtractResponse, ResolveRequest, ResolveResponse};
use crate::{ClientSettings, EngineEvent, RequestError, RestaurantRecord, SearchError, SearchPhase};

/// Receives engine events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink that forwards events over an mpsc sender; a closed receiver just
/// drops the event.
pub struct MpscEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl MpscEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for MpscEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Builds the shared HTTP client with the configured timeouts.
pub fn build_http_client(settings: &ClientSettings) -> Result<reqwest::Client, RequestError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| RequestError::Network(err.to_string()))
}

/// The two remote calls a single search is made of, behind a trait so the
/// retry policy can be exercised against a scripted backend.
#[async_trait::async_trait]
pub trait ExtractionApi: Send + Sync {
    async fn resolve(&self, name: &str, location: &str) -> Result<ResolveResponse, RequestError>;
    async fn extract(&self, url: &str) -> Result<ExtractResponse, RequestError>;
}

#[derive(Debug, Clone)]
pub struct HttpExtractionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExtractionApi {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<T>(&self, path: &str, body: &impl serde::Serialize) -> Result<T, RequestError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::HttpStatus(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| RequestError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ExtractionApi for HttpExtractionApi {
    async fn resolve(&self, name: &str, location: &str) -> Result<ResolveResponse, RequestError> {
        self.post_json("/search", &ResolveRequest { name, location })
            .await
    }

    async fn extract(&self, url: &str) -> Result<ExtractResponse, RequestError> {
        self.post_json("/extract", &ExtractRequest { url }).await
    }
}

/// Single-search orchestrator: resolve the name/location pair, extract at
/// the resolved URL, and retry extraction once if the first attempt comes
/// back empty.
pub struct ExtractionClient {
    api: Arc<dyn ExtractionApi>,
    retry_delay: Duration,
}

impl ExtractionClient {
    pub fn new(api: Arc<dyn ExtractionApi>, retry_delay: Duration) -> Self {
        Self { api, retry_delay }
    }

    pub async fn resolve_and_extract(
        &self,
        name: &str,
        location: &str,
        sink: &dyn EventSink,
    ) -> Result<RestaurantRecord, SearchError> {
        sink.emit(EngineEvent::SearchProgress {
            phase: SearchPhase::Resolving,
        });
        let resolved = self.api.resolve(name, location).await?;

        if resolved.not_found {
            return Err(SearchError::NotFound(not_found_message(resolved.error)));
        }
        let Some(url) = resolved.url.filter(|url| !url.is_empty()) else {
            return Err(SearchError::NotFound(not_found_message(resolved.error)));
        };

        if resolved.dineout_only {
            // Dine-in-only venues are never extracted.
            return Ok(RestaurantRecord {
                name: name.to_string(),
                location: location.to_string(),
                source_url: Some(url),
                dineout_only: true,
                extraction: None,
            });
        }

        sink.emit(EngineEvent::SearchProgress {
            phase: SearchPhase::Extracting,
        });
        let mut extraction = self.api.extract(&url).await?;

        if extraction.is_empty() {
            // One best-effort retry at the same URL. The second result
            // stands even if it is still empty; there is no third attempt.
            sink.emit(EngineEvent::SearchProgress {
                phase: SearchPhase::Retrying,
            });
            tokio::time::sleep(self.retry_delay).await;
            extraction = self.api.extract(&url).await?;
        }

        Ok(RestaurantRecord {
            name: name.to_string(),
            location: location.to_string(),
            source_url: Some(url),
            dineout_only: false,
            extraction: Some(extraction),
        })
    }
}

fn not_found_message(error: Option<String>) -> String {
    error
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| "Restaurant not found".to_string())
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::Timeout;
    }
    RequestError::Network(err.to_string())
}
