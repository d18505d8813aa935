//! The enrichment collaborator: one provider, three calls, one timeout.

use crate::llm::{CompletionRequest, EnrichError, LlmConfig, LlmProvider, OpenAiCompatibleClient};
use crate::merge::{apply_fact_sheet, apply_suggestions, apply_topics};
use crate::prompts::{fact_sheet_request, suggestion_request, topic_request};
use crate::suggestions::{parse_json, FactSheet, Suggestions};
use schemagraph_core::fields::{BusinessFields, BusinessKind, Topic};
use schemagraph_core::GenerationRequest;
use std::time::Duration;
use tracing::{debug, warn};

/// Wraps a provider with a per-call timeout.
///
/// `try_*` methods surface every failure as an [`EnrichError`]. The plain
/// methods degrade to "nothing suggested" with a warning, so callers can
/// always proceed with the user's own fields.
pub struct Enricher {
    provider: Box<dyn LlmProvider>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(provider: Box<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// An HTTP-backed enricher configured from the environment.
    pub fn from_env() -> Result<Self, EnrichError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    pub fn from_config(config: LlmConfig) -> Result<Self, EnrichError> {
        let timeout = config.timeout();
        Ok(Self::new(Box::new(OpenAiCompatibleClient::new(config)?), timeout))
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, EnrichError> {
        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| EnrichError::Timeout(self.timeout.as_secs()))??;
        debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "completion received"
        );
        Ok(response.content)
    }

    // ------------------------------------------------------------------------
    // Business suggestions
    // ------------------------------------------------------------------------

    pub async fn try_suggest(&self, business: &BusinessFields) -> Result<Suggestions, EnrichError> {
        let request = suggestion_request(&business.name, &business.website_url, business_type(business));
        parse_json(&self.complete(request).await?)
    }

    pub async fn suggest(&self, business: &BusinessFields) -> Suggestions {
        self.try_suggest(business).await.unwrap_or_else(|e| {
            warn!(error = %e, business = %business.name, "enrichment failed; continuing without suggestions");
            Suggestions::default()
        })
    }

    // ------------------------------------------------------------------------
    // Fact sheets
    // ------------------------------------------------------------------------

    pub async fn try_extract_fact_sheet(&self, text: &str) -> Result<FactSheet, EnrichError> {
        parse_json(&self.complete(fact_sheet_request(text)).await?)
    }

    pub async fn extract_fact_sheet(&self, text: &str) -> FactSheet {
        self.try_extract_fact_sheet(text).await.unwrap_or_else(|e| {
            warn!(error = %e, "fact sheet extraction failed; nothing auto-filled");
            FactSheet::default()
        })
    }

    // ------------------------------------------------------------------------
    // Topic links
    // ------------------------------------------------------------------------

    /// Wikidata/Wikipedia links for topic names. No call is made for an empty list.
    pub async fn try_suggest_topics(&self, topics: &[String], business: &BusinessFields) -> Result<Vec<Topic>, EnrichError> {
        if topics.is_empty() {
            return Ok(Vec::new());
        }
        let request = topic_request(topics, &business.name, business_type(business));
        parse_json(&self.complete(request).await?)
    }

    pub async fn suggest_topics(&self, topics: &[String], business: &BusinessFields) -> Vec<Topic> {
        self.try_suggest_topics(topics, business).await.unwrap_or_else(|e| {
            warn!(error = %e, "topic lookup failed; topics left unlinked");
            Vec::new()
        })
    }

    // ------------------------------------------------------------------------
    // Whole requests
    // ------------------------------------------------------------------------

    /// Fill a request's empty business fields from suggestions, then link any
    /// topics still missing a Wikidata id.
    pub async fn enrich_request(&self, mut request: GenerationRequest) -> GenerationRequest {
        let suggestions = self.suggest(&request.business).await;
        apply_suggestions(&mut request.business, &suggestions);

        let unlinked: Vec<String> = request
            .business
            .knows_about
            .iter()
            .filter(|t| t.wikidata_id.trim().is_empty() && !t.name.trim().is_empty())
            .map(|t| t.name.clone())
            .collect();
        if !unlinked.is_empty() {
            let topics = self.suggest_topics(&unlinked, &request.business).await;
            apply_topics(&mut request.business, &topics);
        }
        request
    }

    /// Pre-fill a request from fact-sheet text.
    pub async fn prefill_from_fact_sheet(&self, mut request: GenerationRequest, text: &str) -> GenerationRequest {
        let sheet = self.extract_fact_sheet(text).await;
        debug!(facts = sheet.filled_fields(), "fact sheet extracted");
        apply_fact_sheet(&mut request, &sheet);
        request
    }
}

fn business_type(business: &BusinessFields) -> &str {
    match business.schema_subtype.as_deref().map(str::trim) {
        Some(subtype) if !subtype.is_empty() => subtype,
        _ => match business.kind {
            BusinessKind::Local => "local business",
            BusinessKind::Organization => "organization",
        },
    }
}
