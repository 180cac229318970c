//! Caption generation against a resolved backend.
//!
//! # Responsibilities
//! - Encode the image once and send one request for every requested style
//! - Map timeouts, transport failures and failure statuses to TrackerError
//! - Reject responses missing a requested style
//! - Enforce word limits on every caption regardless of the backend
//!
//! # Design Decisions
//! - One call per generation, never one per style
//! - No automatic retries; the result's `recovery` tells the caller what to do

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::config::GenerationConfig;
use crate::discovery::transport::{endpoint, http_client};
use crate::discovery::DiscoveryClient;
use crate::error::{TrackerError, TrackerResult};
use crate::observability::metrics;
use crate::orchestrator::image::encode_image;
use crate::orchestrator::result::{Caption, GenerateRequestBody, GenerateResponseBody, GenerationResult};
use crate::orchestrator::styles::{CaptionStyle, StyleSelection, WordLimits};
use crate::orchestrator::words::enforce_word_limit;

const COLD_START_HINT: &str = "the backend may be cold-starting, try again in about 60 seconds";

pub struct CaptionOrchestrator {
    http: Client,
    config: GenerationConfig,
}

impl CaptionOrchestrator {
    pub fn new(config: GenerationConfig) -> TrackerResult<Self> {
        let http = http_client(config.use_system_proxy)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Configured defaults with per-style overrides.
    pub fn word_limits(
        &self,
        overrides: impl IntoIterator<Item = (CaptionStyle, u32)>,
    ) -> TrackerResult<WordLimits> {
        WordLimits::with_overrides(&self.config.word_limits, overrides)
    }

    /// Generate captions on `backend_url`. Never fails; see [`GenerationResult`].
    pub async fn generate_captions(
        &self,
        backend_url: &str,
        image: &[u8],
        styles: &StyleSelection,
        word_limits: &WordLimits,
    ) -> GenerationResult {
        let start = Instant::now();
        match self.try_generate(backend_url, image, styles, word_limits).await {
            Ok(captions) => {
                tracing::info!(
                    backend = %backend_url,
                    styles = captions.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Captions generated"
                );
                metrics::record_generation("success", start);
                GenerationResult::succeeded(captions)
            }
            Err(e) => {
                tracing::warn!(backend = %backend_url, error = %e, kind = e.error_type(), "Caption generation failed");
                metrics::record_generation(e.error_type(), start);
                GenerationResult::failed(&e)
            }
        }
    }

    /// Generate against whatever `discovery` resolved. `NoBackend` unless it is
    /// connected or manual.
    pub async fn generate_with(
        &self,
        discovery: &DiscoveryClient,
        image: &[u8],
        styles: &StyleSelection,
        word_limits: &WordLimits,
    ) -> GenerationResult {
        match discovery.backend_url() {
            Some(url) => self.generate_captions(url, image, styles, word_limits).await,
            None => GenerationResult::failed(&TrackerError::NoBackend),
        }
    }

    async fn try_generate(
        &self,
        backend_url: &str,
        image: &[u8],
        styles: &StyleSelection,
        word_limits: &WordLimits,
    ) -> TrackerResult<BTreeMap<CaptionStyle, Caption>> {
        if backend_url.trim().is_empty() {
            return Err(TrackerError::NoBackend);
        }
        if styles.expected().is_empty() {
            return Err(TrackerError::InvalidRequest("at least one style is required".to_string()));
        }

        let body = GenerateRequestBody {
            image: encode_image(image)?,
            styles: styles.wire_names(),
            word_limits: word_limits.to_wire(),
        };

        let url = endpoint(backend_url, &self.config.endpoint_path);
        let secs = self.config.timeout_secs;
        tracing::debug!(url = %url, styles = ?body.styles, "Sending generation request");

        let response = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| TrackerError::from_transport(&e, secs, COLD_START_HINT))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Backend {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        let parsed: GenerateResponseBody = response
            .json()
            .await
            .map_err(|e| TrackerError::from_transport(&e, secs, COLD_START_HINT))?;

        if !parsed.success {
            return Err(TrackerError::Backend {
                status: status.as_u16(),
                message: parsed.error.unwrap_or_else(|| "backend reported failure".to_string()),
            });
        }

        self.post_process(parsed.captions, styles, word_limits)
    }

    /// Keep requested styles only, require all of them, cap each at its limit.
    fn post_process(
        &self,
        mut returned: HashMap<String, Caption>,
        styles: &StyleSelection,
        word_limits: &WordLimits,
    ) -> TrackerResult<BTreeMap<CaptionStyle, Caption>> {
        let expected = styles.expected();

        let missing: Vec<String> = expected
            .iter()
            .filter(|style| !returned.contains_key(style.as_str()))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(TrackerError::PartialResult { missing });
        }

        let mut captions = BTreeMap::new();
        for style in expected {
            let Some(raw) = returned.remove(style.as_str()) else {
                continue;
            };
            let limit = word_limits
                .get(style)
                .unwrap_or_else(|| self.default_limit(style));
            captions.insert(
                style,
                Caption {
                    caption: enforce_word_limit(&raw.caption, limit, &self.config.ellipsis),
                },
            );
        }

        if !returned.is_empty() {
            tracing::debug!(extra = ?returned.keys().collect::<Vec<_>>(), "Ignoring unrequested captions");
        }
        Ok(captions)
    }

    fn default_limit(&self, style: CaptionStyle) -> u32 {
        let defaults = &self.config.word_limits;
        match style {
            CaptionStyle::Short => defaults.short,
            CaptionStyle::Technical => defaults.technical,
            CaptionStyle::HumanFriendly => defaults.human_friendly,
        }
    }
}
